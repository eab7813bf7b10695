use anyhow::Result;

use crate::api;
use crate::core::{AppConfig, logging};

pub async fn run(host: String, port: String) -> Result<()> {
    // Install the subscriber first so missing credentials get reported
    logging::init(api::LOG_FILTER);

    let config = AppConfig::from_env();
    api::serve(host, port, config).await
}
