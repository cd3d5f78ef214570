//! WebDriver-backed page driver (chromedriver over `thirtyfour`).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thirtyfour::error::WebDriverError;
use thirtyfour::prelude::*;
use thirtyfour::{ChromeCapabilities, ChromiumLikeCapabilities};
use tracing::{debug, info, warn};

use crate::{
    errors::ActionError,
    locator::Locator,
    primitives::{PageDriver, SessionFactory},
};

/// Where and how browser sessions are started.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebDriverSettings {
    /// WebDriver server endpoint
    pub url: String,

    pub headless: bool,

    pub window_width: u32,

    pub window_height: u32,

    /// Extra Chrome command line switches
    pub chrome_args: Vec<String>,
}

impl Default for WebDriverSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:9515".to_string(),
            headless: true,
            window_width: 1366,
            window_height: 900,
            chrome_args: Vec::new(),
        }
    }
}

fn driver_error(context: &str) -> impl Fn(WebDriverError) -> ActionError + '_ {
    move |err| ActionError::Driver(format!("{}: {}", context, err))
}

fn to_by(locator: &Locator) -> By {
    match locator {
        Locator::Id(v) => By::Id(v.as_str()),
        Locator::Name(v) => By::Name(v.as_str()),
        Locator::ClassName(v) => By::ClassName(v.as_str()),
        Locator::LinkText(v) => By::LinkText(v.as_str()),
        Locator::XPath(v) => By::XPath(v.as_str()),
        Locator::Css(v) => By::Css(v.as_str()),
        Locator::Tag(v) => By::Tag(v.as_str()),
    }
}

/// One chromedriver session.
pub struct WebDriverPage {
    driver: WebDriver,
    closed: AtomicBool,
}

impl WebDriverPage {
    pub fn new(driver: WebDriver) -> Self {
        Self {
            driver,
            closed: AtomicBool::new(false),
        }
    }

    fn ensure_open(&self) -> Result<(), ActionError> {
        if self.closed.load(Ordering::SeqCst) {
            Err(ActionError::SessionClosed)
        } else {
            Ok(())
        }
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<WebElement>, ActionError> {
        self.ensure_open()?;
        self.driver
            .find_all(to_by(locator))
            .await
            .map_err(driver_error("find elements"))
    }

    async fn first(&self, locator: &Locator) -> Result<WebElement, ActionError> {
        self.find_all(locator)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ActionError::ElementNotFound(locator.to_string()))
    }
}

#[async_trait]
impl PageDriver for WebDriverPage {
    async fn navigate(&self, url: &str) -> Result<(), ActionError> {
        self.ensure_open()?;
        self.driver
            .goto(url)
            .await
            .map_err(|err| ActionError::Navigation(format!("{}: {}", url, err)))
    }

    async fn count(&self, locator: &Locator) -> Result<usize, ActionError> {
        Ok(self.find_all(locator).await?.len())
    }

    async fn is_clickable(&self, locator: &Locator) -> Result<bool, ActionError> {
        match self.find_all(locator).await?.into_iter().next() {
            Some(element) => element
                .is_clickable()
                .await
                .map_err(driver_error("clickability check")),
            None => Ok(false),
        }
    }

    async fn click(&self, locator: &Locator) -> Result<(), ActionError> {
        let element = self.first(locator).await?;
        element
            .click()
            .await
            .map_err(|err| ActionError::NotClickable(format!("{}: {}", locator, err)))
    }

    async fn script_click(&self, locator: &Locator, index: usize) -> Result<(), ActionError> {
        let element = self
            .find_all(locator)
            .await?
            .into_iter()
            .nth(index)
            .ok_or_else(|| ActionError::ElementNotFound(format!("{}[{}]", locator, index)))?;
        let handle = element.to_json().map_err(driver_error("element handle"))?;
        self.driver
            .execute("arguments[0].click();", vec![handle])
            .await
            .map_err(driver_error("script click"))?;
        Ok(())
    }

    async fn clear(&self, locator: &Locator) -> Result<(), ActionError> {
        let element = self.first(locator).await?;
        element.clear().await.map_err(driver_error("clear"))
    }

    async fn type_text(&self, locator: &Locator, text: &str) -> Result<(), ActionError> {
        let element = self.first(locator).await?;
        element.send_keys(text).await.map_err(driver_error("send keys"))
    }

    async fn press_enter(&self, locator: &Locator) -> Result<(), ActionError> {
        let element = self.first(locator).await?;
        element
            .send_keys(Key::Enter)
            .await
            .map_err(driver_error("send enter"))
    }

    async fn scroll_into_view(&self, locator: &Locator) -> Result<(), ActionError> {
        let element = self.first(locator).await?;
        element
            .scroll_into_view()
            .await
            .map_err(driver_error("scroll into view"))
    }

    async fn attribute(
        &self,
        locator: &Locator,
        name: &str,
    ) -> Result<Option<String>, ActionError> {
        let element = self.first(locator).await?;
        element.attr(name).await.map_err(driver_error("read attribute"))
    }

    async fn value(&self, locator: &Locator) -> Result<Option<String>, ActionError> {
        let element = self.first(locator).await?;
        element.value().await.map_err(driver_error("read value"))
    }

    async fn texts(&self, locator: &Locator) -> Result<Vec<String>, ActionError> {
        let mut texts = Vec::new();
        for element in self.find_all(locator).await? {
            texts.push(element.text().await.map_err(driver_error("read text"))?);
        }
        Ok(texts)
    }

    async fn dialog_text(&self) -> Result<Option<String>, ActionError> {
        self.ensure_open()?;
        // chromedriver answers "no such alert" as an error
        match self.driver.get_alert_text().await {
            Ok(text) => Ok(Some(text)),
            Err(err) => {
                debug!(error = %err, "no alert present");
                Ok(None)
            }
        }
    }

    async fn accept_dialog(&self) -> Result<(), ActionError> {
        self.ensure_open()?;
        self.driver
            .accept_alert()
            .await
            .map_err(|err| ActionError::DialogMissing(err.to_string()))
    }

    async fn current_url(&self) -> Result<String, ActionError> {
        self.ensure_open()?;
        self.driver
            .current_url()
            .await
            .map(|url| url.to_string())
            .map_err(driver_error("current url"))
    }

    async fn screenshot(&self, path: &Path) -> Result<(), ActionError> {
        self.ensure_open()?;
        self.driver
            .screenshot(path)
            .await
            .map_err(driver_error("screenshot"))
    }

    async fn close(&self) -> Result<(), ActionError> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        info!("closing browser session");
        self.driver
            .clone()
            .quit()
            .await
            .map_err(driver_error("quit session"))
    }
}

/// Starts Chrome sessions against a running chromedriver.
pub struct WebDriverSessionFactory {
    settings: WebDriverSettings,
}

impl WebDriverSessionFactory {
    pub fn new(settings: WebDriverSettings) -> Self {
        Self { settings }
    }

    fn capabilities(&self) -> Result<ChromeCapabilities, ActionError> {
        let mut caps = DesiredCapabilities::chrome();
        let mut args = vec![format!(
            "--window-size={},{}",
            self.settings.window_width, self.settings.window_height
        )];
        if self.settings.headless {
            args.push("--headless=new".to_string());
            args.push("--disable-gpu".to_string());
        }
        args.extend(self.settings.chrome_args.iter().cloned());
        for arg in &args {
            caps.add_arg(arg).map_err(driver_error("chrome capabilities"))?;
        }
        Ok(caps)
    }
}

#[async_trait]
impl SessionFactory for WebDriverSessionFactory {
    async fn open(&self) -> Result<Arc<dyn PageDriver>, ActionError> {
        let caps = self.capabilities()?;
        info!(
            url = %self.settings.url,
            headless = self.settings.headless,
            "starting browser session"
        );
        let driver = WebDriver::new(self.settings.url.as_str(), caps)
            .await
            .map_err(|err| {
                warn!(url = %self.settings.url, error = %err, "webdriver unavailable");
                ActionError::Driver(format!("could not start session: {}", err))
            })?;
        Ok(Arc::new(WebDriverPage::new(driver)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_target_local_chromedriver() {
        let settings = WebDriverSettings::default();
        assert_eq!(settings.url, "http://localhost:9515");
        assert!(settings.headless);
    }

    #[test]
    fn capabilities_include_window_and_headless_args() {
        let factory = WebDriverSessionFactory::new(WebDriverSettings {
            chrome_args: vec!["--no-sandbox".to_string()],
            ..WebDriverSettings::default()
        });
        let caps = factory.capabilities().unwrap();
        let args = caps.args();
        assert!(args.contains(&"--window-size=1366,900".to_string()));
        assert!(args.contains(&"--headless=new".to_string()));
        assert!(args.contains(&"--no-sandbox".to_string()));
    }
}
