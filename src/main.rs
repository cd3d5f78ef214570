use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    autoplant_cli::cli::run().await
}
