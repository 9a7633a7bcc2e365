use anyhow::Context;
use movienotes_core::init_logging;
use movienotes_server::{config::Settings, start_server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load configuration")?;
    init_logging(&settings.log.level, settings.log.dir.as_deref()).map_err(anyhow::Error::msg)?;

    start_server(settings).await
}
