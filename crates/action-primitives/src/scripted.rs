//! In-memory page with scripted behaviour.
//!
//! `ScriptedPage` implements [`PageDriver`] over a table of elements keyed by
//! [`Locator`]. Clicks and keystrokes can trigger reactions (dialogs opening,
//! elements appearing) so whole flows can be exercised without a browser.
//! Every interaction is recorded as a [`PageEvent`].

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::{
    errors::ActionError,
    locator::Locator,
    primitives::{PageDriver, SessionFactory},
};

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

#[derive(Clone, Debug)]
pub struct ScriptedElement {
    pub text: String,
    pub value: Option<String>,
    pub attributes: HashMap<String, String>,
    pub clickable: bool,
    pub intercepts_clicks: bool,
}

impl Default for ScriptedElement {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedElement {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            value: None,
            attributes: HashMap::new(),
            clickable: true,
            intercepts_clicks: false,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn readonly(self) -> Self {
        self.with_attr("readonly", "true")
    }

    pub fn not_clickable(mut self) -> Self {
        self.clickable = false;
        self
    }

    /// Native clicks fail as if another element covered this one.
    pub fn intercepts_clicks(mut self) -> Self {
        self.intercepts_clicks = true;
        self
    }
}

/// Side effects applied when a scripted trigger fires.
#[derive(Clone, Debug, Default)]
pub struct Reaction {
    dialogs: Vec<String>,
    reveal: Vec<(Locator, ScriptedElement)>,
    remove: Vec<Locator>,
    url: Option<String>,
}

impl Reaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dialog(mut self, text: impl Into<String>) -> Self {
        self.dialogs.push(text.into());
        self
    }

    pub fn reveal(mut self, locator: Locator, element: ScriptedElement) -> Self {
        self.reveal.push((locator, element));
        self
    }

    pub fn remove(mut self, locator: Locator) -> Self {
        self.remove.push(locator);
        self
    }

    pub fn navigate(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Recorded interaction.
#[derive(Clone, Debug, PartialEq)]
pub enum PageEvent {
    Navigate(String),
    Click(Locator),
    ScriptClick(Locator, usize),
    Clear(Locator),
    Type(Locator, String),
    Enter(Locator),
    Scroll(Locator),
    AcceptDialog(String),
    Screenshot(PathBuf),
    Close,
}

#[derive(Default)]
struct PageState {
    url: String,
    navigation_error: Option<String>,
    elements: HashMap<Locator, Vec<ScriptedElement>>,
    dialogs: VecDeque<String>,
    click_reactions: HashMap<Locator, VecDeque<Reaction>>,
    input_reactions: Vec<(Locator, String, Reaction)>,
    events: Vec<PageEvent>,
    closed: bool,
    close_calls: usize,
}

impl PageState {
    fn apply(&mut self, reaction: Reaction) {
        for locator in reaction.remove {
            self.elements.remove(&locator);
        }
        for (locator, element) in reaction.reveal {
            self.elements.entry(locator).or_default().push(element);
        }
        self.dialogs.extend(reaction.dialogs);
        if let Some(url) = reaction.url {
            self.url = url;
        }
    }

    fn ensure_open(&self) -> Result<(), ActionError> {
        if self.closed {
            Err(ActionError::SessionClosed)
        } else {
            Ok(())
        }
    }

    /// A dialog blocks every element interaction until accepted.
    fn ensure_interactive(&self) -> Result<(), ActionError> {
        self.ensure_open()?;
        match self.dialogs.front() {
            Some(text) => Err(ActionError::Driver(format!(
                "unexpected alert open: {}",
                text
            ))),
            None => Ok(()),
        }
    }

    fn first_mut(&mut self, locator: &Locator) -> Result<&mut ScriptedElement, ActionError> {
        self.elements
            .get_mut(locator)
            .and_then(|matches| matches.first_mut())
            .ok_or_else(|| ActionError::ElementNotFound(locator.to_string()))
    }

    fn first(&self, locator: &Locator) -> Result<&ScriptedElement, ActionError> {
        self.elements
            .get(locator)
            .and_then(|matches| matches.first())
            .ok_or_else(|| ActionError::ElementNotFound(locator.to_string()))
    }

    fn fire_click(&mut self, locator: &Locator) {
        let next = self
            .click_reactions
            .get_mut(locator)
            .and_then(|queue| queue.pop_front());
        if let Some(reaction) = next {
            self.apply(reaction);
        }
    }

    fn fire_input(&mut self, locator: &Locator, current: &str) {
        let position = self.input_reactions.iter().position(|(target, value, _)| {
            target == locator && value.eq_ignore_ascii_case(current)
        });
        if let Some(index) = position {
            let (_, _, reaction) = self.input_reactions.remove(index);
            self.apply(reaction);
        }
    }
}

/// Scripted [`PageDriver`]. Clones share state.
#[derive(Clone, Default)]
pub struct ScriptedPage {
    state: Arc<Mutex<PageState>>,
}

impl ScriptedPage {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, PageState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn with_element(self, locator: Locator, element: ScriptedElement) -> Self {
        self.add_element(locator, element);
        self
    }

    /// Add another element matching `locator` (after any existing matches).
    pub fn add_element(&self, locator: Locator, element: ScriptedElement) {
        self.state().elements.entry(locator).or_default().push(element);
    }

    pub fn remove_element(&self, locator: &Locator) {
        self.state().elements.remove(locator);
    }

    /// Queue `reaction` for the next not-yet-reacted click on `locator`.
    pub fn on_click(self, locator: Locator, reaction: Reaction) -> Self {
        self.state()
            .click_reactions
            .entry(locator)
            .or_default()
            .push_back(reaction);
        self
    }

    /// Fire `reaction` once, when the field value equals `value` (ignoring case).
    pub fn on_input(self, locator: Locator, value: impl Into<String>, reaction: Reaction) -> Self {
        self.state()
            .input_reactions
            .push((locator, value.into(), reaction));
        self
    }

    pub fn failing_navigation(self, reason: impl Into<String>) -> Self {
        self.state().navigation_error = Some(reason.into());
        self
    }

    pub fn push_dialog(&self, text: impl Into<String>) {
        self.state().dialogs.push_back(text.into());
    }

    pub fn pending_dialogs(&self) -> usize {
        self.state().dialogs.len()
    }

    pub fn events(&self) -> Vec<PageEvent> {
        self.state().events.clone()
    }

    pub fn clicked(&self, locator: &Locator) -> usize {
        self.state()
            .events
            .iter()
            .filter(|event| match event {
                PageEvent::Click(target) | PageEvent::ScriptClick(target, _) => target == locator,
                _ => false,
            })
            .count()
    }

    pub fn accepted_dialogs(&self) -> Vec<String> {
        self.state()
            .events
            .iter()
            .filter_map(|event| match event {
                PageEvent::AcceptDialog(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn value_of(&self, locator: &Locator) -> Option<String> {
        self.state()
            .elements
            .get(locator)
            .and_then(|matches| matches.first())
            .and_then(|element| element.value.clone())
    }

    pub fn close_count(&self) -> usize {
        self.state().close_calls
    }

    pub fn is_closed(&self) -> bool {
        self.state().closed
    }
}

#[async_trait]
impl PageDriver for ScriptedPage {
    async fn navigate(&self, url: &str) -> Result<(), ActionError> {
        let mut state = self.state();
        state.ensure_open()?;
        state.events.push(PageEvent::Navigate(url.to_string()));
        if let Some(reason) = state.navigation_error.clone() {
            return Err(ActionError::Navigation(reason));
        }
        state.url = url.to_string();
        Ok(())
    }

    async fn count(&self, locator: &Locator) -> Result<usize, ActionError> {
        let state = self.state();
        state.ensure_open()?;
        Ok(state.elements.get(locator).map(Vec::len).unwrap_or(0))
    }

    async fn is_clickable(&self, locator: &Locator) -> Result<bool, ActionError> {
        let state = self.state();
        state.ensure_open()?;
        Ok(state
            .elements
            .get(locator)
            .and_then(|matches| matches.first())
            .map(|element| element.clickable)
            .unwrap_or(false))
    }

    async fn click(&self, locator: &Locator) -> Result<(), ActionError> {
        let mut state = self.state();
        state.ensure_interactive()?;
        let element = state.first(locator)?;
        if !element.clickable || element.intercepts_clicks {
            return Err(ActionError::NotClickable(locator.to_string()));
        }
        state.events.push(PageEvent::Click(locator.clone()));
        state.fire_click(locator);
        Ok(())
    }

    async fn script_click(&self, locator: &Locator, index: usize) -> Result<(), ActionError> {
        let mut state = self.state();
        state.ensure_interactive()?;
        let exists = state
            .elements
            .get(locator)
            .map(|matches| index < matches.len())
            .unwrap_or(false);
        if !exists {
            return Err(ActionError::ElementNotFound(format!("{}[{}]", locator, index)));
        }
        state
            .events
            .push(PageEvent::ScriptClick(locator.clone(), index));
        state.fire_click(locator);
        Ok(())
    }

    async fn clear(&self, locator: &Locator) -> Result<(), ActionError> {
        let mut state = self.state();
        state.ensure_interactive()?;
        state.first_mut(locator)?.value = Some(String::new());
        state.events.push(PageEvent::Clear(locator.clone()));
        Ok(())
    }

    async fn type_text(&self, locator: &Locator, text: &str) -> Result<(), ActionError> {
        let mut state = self.state();
        state.ensure_interactive()?;
        let element = state.first_mut(locator)?;
        let mut current = element.value.take().unwrap_or_default();
        current.push_str(text);
        element.value = Some(current.clone());
        state
            .events
            .push(PageEvent::Type(locator.clone(), text.to_string()));
        state.fire_input(locator, &current);
        Ok(())
    }

    async fn press_enter(&self, locator: &Locator) -> Result<(), ActionError> {
        let mut state = self.state();
        state.ensure_interactive()?;
        state.first(locator)?;
        state.events.push(PageEvent::Enter(locator.clone()));
        Ok(())
    }

    async fn scroll_into_view(&self, locator: &Locator) -> Result<(), ActionError> {
        let mut state = self.state();
        state.ensure_interactive()?;
        state.first(locator)?;
        state.events.push(PageEvent::Scroll(locator.clone()));
        Ok(())
    }

    async fn attribute(
        &self,
        locator: &Locator,
        name: &str,
    ) -> Result<Option<String>, ActionError> {
        let state = self.state();
        state.ensure_open()?;
        let element = state.first(locator)?;
        if name == "value" {
            return Ok(element.value.clone());
        }
        Ok(element.attributes.get(name).cloned())
    }

    async fn value(&self, locator: &Locator) -> Result<Option<String>, ActionError> {
        let state = self.state();
        state.ensure_open()?;
        Ok(state.first(locator)?.value.clone())
    }

    async fn texts(&self, locator: &Locator) -> Result<Vec<String>, ActionError> {
        let state = self.state();
        state.ensure_open()?;
        Ok(state
            .elements
            .get(locator)
            .map(|matches| matches.iter().map(|element| element.text.clone()).collect())
            .unwrap_or_default())
    }

    async fn dialog_text(&self) -> Result<Option<String>, ActionError> {
        let state = self.state();
        state.ensure_open()?;
        Ok(state.dialogs.front().cloned())
    }

    async fn accept_dialog(&self) -> Result<(), ActionError> {
        let mut state = self.state();
        state.ensure_open()?;
        let text = state
            .dialogs
            .pop_front()
            .ok_or_else(|| ActionError::DialogMissing("no alert open".to_string()))?;
        state.events.push(PageEvent::AcceptDialog(text));
        Ok(())
    }

    async fn current_url(&self) -> Result<String, ActionError> {
        let state = self.state();
        state.ensure_open()?;
        Ok(state.url.clone())
    }

    async fn screenshot(&self, path: &Path) -> Result<(), ActionError> {
        {
            let mut state = self.state();
            state.ensure_open()?;
            state.events.push(PageEvent::Screenshot(path.to_path_buf()));
        }
        tokio::fs::write(path, PNG_SIGNATURE)
            .await
            .map_err(|err| ActionError::Internal(format!("screenshot write failed: {}", err)))
    }

    async fn close(&self) -> Result<(), ActionError> {
        let mut state = self.state();
        state.close_calls += 1;
        if !state.closed {
            state.closed = true;
            state.events.push(PageEvent::Close);
        }
        Ok(())
    }
}

/// Hands out the same scripted page for every session request.
pub struct ScriptedSessionFactory {
    page: ScriptedPage,
    opened: AtomicUsize,
}

impl ScriptedSessionFactory {
    pub fn new(page: ScriptedPage) -> Self {
        Self {
            page,
            opened: AtomicUsize::new(0),
        }
    }

    pub fn page(&self) -> &ScriptedPage {
        &self.page
    }

    pub fn sessions_opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionFactory for ScriptedSessionFactory {
    async fn open(&self) -> Result<Arc<dyn PageDriver>, ActionError> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(self.page.clone()))
    }
}
