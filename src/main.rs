use anyhow::Result;
use voicechat::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
