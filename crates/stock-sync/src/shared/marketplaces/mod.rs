pub mod ozon;
pub mod yandex_market;

#[cfg(test)]
pub mod mock;

use async_trait::async_trait;
use contracts::domain::a002_marketplace_listing::CatalogPage;
use contracts::enums::MarketplaceType;
use contracts::usecases::u502_sync_marketplace_stocks::{PriceUpdate, StockUpdate};
use serde::de::DeserializeOwned;

use crate::shared::config::TargetConfig;
use crate::shared::error::SyncError;

const HTTP_TIMEOUT_SECS: u64 = 30;

/// Трейт для клиента маркетплейса
///
/// Каждый вызов делает ровно один HTTP-запрос без повторов; политика повторов
/// принадлежит вызывающему коду.
#[async_trait]
pub trait MarketplaceClient: Send + Sync {
    fn marketplace(&self) -> MarketplaceType;

    /// Получить страницу каталога. Пустой `cursor` означает первую страницу.
    async fn fetch_catalog_page(&self, cursor: &str) -> Result<CatalogPage, SyncError>;

    /// Отправить пакет остатков
    async fn update_stocks(&self, chunk: Vec<StockUpdate>) -> Result<(), SyncError>;

    /// Отправить пакет цен
    async fn update_prices(&self, chunk: Vec<PriceUpdate>) -> Result<(), SyncError>;
}

/// Создать клиента по настройкам подключения
pub fn build_client(target: &TargetConfig) -> Result<Box<dyn MarketplaceClient>, SyncError> {
    let http = http_client()?;
    let client: Box<dyn MarketplaceClient> = match target.marketplace {
        MarketplaceType::Ozon => Box::new(ozon::OzonApiClient::new(http, target)),
        MarketplaceType::YandexMarket => {
            Box::new(yandex_market::YandexMarketApiClient::new(http, target))
        }
    };
    Ok(client)
}

pub fn http_client() -> Result<reqwest::Client, SyncError> {
    Ok(reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()?)
}

/// Проверить статус ответа и разобрать JSON-тело
pub(crate) async fn read_json<T: DeserializeOwned>(
    marketplace: MarketplaceType,
    response: reqwest::Response,
) -> Result<T, SyncError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SyncError::Api {
            marketplace: marketplace.display_name(),
            status: status.as_u16(),
            body,
        });
    }

    let body = response.text().await?;
    tracing::debug!(
        "{} API response preview: {}",
        marketplace.display_name(),
        preview(&body)
    );

    serde_json::from_str::<T>(&body).map_err(|e| {
        SyncError::protocol(format!(
            "Failed to parse {} API JSON: {}. Response: {}",
            marketplace.display_name(),
            e,
            preview(&body)
        ))
    })
}

fn preview(body: &str) -> String {
    let head: String = body.chars().take(500).collect();
    if head.len() < body.len() {
        format!("{}...", head)
    } else {
        head
    }
}
