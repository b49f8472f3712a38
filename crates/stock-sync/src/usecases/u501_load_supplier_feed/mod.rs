pub mod feed_downloader;
pub mod feed_parser;

use contracts::domain::a001_supplier_feed::FeedRecord;
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u501_load_supplier_feed::LoadSupplierFeed;
use std::path::Path;

use crate::shared::config::FeedConfig;

/// Загрузить фид поставщика: из локального файла, если он задан, иначе по URL
pub async fn load_feed(
    client: &reqwest::Client,
    config: &FeedConfig,
    local: Option<&Path>,
) -> anyhow::Result<Vec<FeedRecord>> {
    tracing::info!("{}: {}", LoadSupplierFeed::full_name(), LoadSupplierFeed::display_name());

    let file = match local {
        Some(path) => {
            feed_downloader::read_local(path, config.entry.as_deref(), &config.extension)?
        }
        None => {
            let archive = feed_downloader::download(client, &config.url).await?;
            feed_downloader::extract(archive, config.entry.as_deref(), &config.extension)?
        }
    };

    feed_parser::parse_feed(&file, config.header_row, config.delimiter)
}
