use std::sync::Arc;

use crosspost_engine::Importer;
use crosspost_types::ImportResult;
use eyre::Result;
use tracing::info;
use url::Url;

use crate::config::Config;

pub async fn handle_fetch_command(url: Url) -> Result<()> {
    let config = Config::load().await?;
    let importer = Importer::new(Arc::new(super::transport(&config)));

    info!("📖 Fetching work from: {}", url);
    let result = importer.import_work(url.as_str()).await;
    println!("{}", serde_json::to_string_pretty(&result)?);

    match result {
        ImportResult::Success { .. } => Ok(()),
        ImportResult::Error { message } => Err(eyre::eyre!(message)),
    }
}
