use async_trait::async_trait;
use contracts::domain::a002_marketplace_listing::{CatalogPage, ListingId, PageContinuation};
use contracts::enums::MarketplaceType;
use contracts::usecases::u502_sync_marketplace_stocks::{PriceUpdate, StockUpdate};
use serde::{Deserialize, Serialize};

use super::{read_json, MarketplaceClient};
use crate::shared::config::TargetConfig;
use crate::shared::error::SyncError;

const DEFAULT_BASE_URL: &str = "https://api-seller.ozon.ru";

/// HTTP-клиент для работы с OZON Seller API
pub struct OzonApiClient {
    client: reqwest::Client,
    base_url: String,
    client_id: String,
    api_key: String,
    page_size: usize,
}

impl OzonApiClient {
    pub fn new(client: reqwest::Client, target: &TargetConfig) -> Self {
        Self {
            client,
            base_url: target
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            client_id: target.account_id.clone(),
            api_key: target.api_key.clone(),
            page_size: target.page_size(),
        }
    }

    async fn post<B: Serialize + ?Sized, R: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, SyncError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("POST {} Client-Id: {} Api-Key: ****", url, self.client_id);

        let response = self
            .client
            .post(&url)
            .header("Client-Id", &self.client_id)
            .header("Api-Key", &self.api_key)
            .json(body)
            .send()
            .await?;

        read_json(MarketplaceType::Ozon, response).await
    }
}

#[async_trait]
impl MarketplaceClient for OzonApiClient {
    fn marketplace(&self) -> MarketplaceType {
        MarketplaceType::Ozon
    }

    /// Список товаров через POST /v3/product/list
    async fn fetch_catalog_page(&self, cursor: &str) -> Result<CatalogPage, SyncError> {
        let request = OzonProductListRequest {
            filter: OzonProductListFilter {
                visibility: "ALL".to_string(),
            },
            last_id: cursor.to_string(),
            limit: self.page_size,
        };
        let response: OzonProductListResponse = self.post("/v3/product/list", &request).await?;
        Ok(response.into())
    }

    /// Остатки через POST /v1/product/import/stocks
    async fn update_stocks(&self, chunk: Vec<StockUpdate>) -> Result<(), SyncError> {
        let request = OzonStocksRequest::from(chunk.as_slice());
        let response: OzonImportResponse =
            self.post("/v1/product/import/stocks", &request).await?;
        response.log_rejected("stock");
        Ok(())
    }

    /// Цены через POST /v1/product/import/prices
    async fn update_prices(&self, chunk: Vec<PriceUpdate>) -> Result<(), SyncError> {
        let request = OzonPricesRequest::from(chunk.as_slice());
        let response: OzonImportResponse =
            self.post("/v1/product/import/prices", &request).await?;
        response.log_rejected("price");
        Ok(())
    }
}

// ============================================================================
// Request/Response structures для OZON API
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct OzonProductListRequest {
    pub filter: OzonProductListFilter,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub last_id: String,
    pub limit: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct OzonProductListFilter {
    pub visibility: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OzonProductListResponse {
    pub result: OzonProductListResult,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OzonProductListResult {
    #[serde(default)]
    pub items: Vec<OzonProductListItem>,
    pub total: usize,
    #[serde(default)]
    pub last_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OzonProductListItem {
    #[serde(default)]
    pub product_id: i64,
    pub offer_id: String,
}

impl From<OzonProductListResponse> for CatalogPage {
    fn from(response: OzonProductListResponse) -> Self {
        let result = response.result;
        CatalogPage {
            listing_ids: result
                .items
                .into_iter()
                .map(|item| ListingId(item.offer_id))
                .collect(),
            continuation: PageContinuation::Total {
                total: result.total,
                last_id: result.last_id,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OzonStocksRequest {
    pub stocks: Vec<OzonStockItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OzonStockItem {
    pub offer_id: String,
    pub stock: u32,
}

impl From<&[StockUpdate]> for OzonStocksRequest {
    fn from(chunk: &[StockUpdate]) -> Self {
        Self {
            stocks: chunk
                .iter()
                .map(|s| OzonStockItem {
                    offer_id: s.listing_id.to_string(),
                    stock: s.quantity,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OzonPricesRequest {
    pub prices: Vec<OzonPriceItem>,
}

/// Цена передаётся строкой, старая цена сбрасывается
#[derive(Debug, Clone, Serialize)]
pub struct OzonPriceItem {
    pub auto_action_enabled: String,
    pub currency_code: String,
    pub offer_id: String,
    pub old_price: String,
    pub price: String,
}

impl From<&[PriceUpdate]> for OzonPricesRequest {
    fn from(chunk: &[PriceUpdate]) -> Self {
        Self {
            prices: chunk
                .iter()
                .map(|p| OzonPriceItem {
                    auto_action_enabled: "UNKNOWN".to_string(),
                    currency_code: p.currency.clone(),
                    offer_id: p.listing_id.to_string(),
                    old_price: "0".to_string(),
                    price: p.price.to_string(),
                })
                .collect(),
        }
    }
}

/// Ответ на импорт остатков и цен: построчный результат
#[derive(Debug, Clone, Deserialize, Default)]
pub struct OzonImportResponse {
    #[serde(default)]
    pub result: Vec<OzonImportResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OzonImportResult {
    #[serde(default)]
    pub offer_id: String,
    #[serde(default)]
    pub updated: bool,
    #[serde(default)]
    pub errors: Vec<OzonImportError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OzonImportError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

impl OzonImportResponse {
    /// Ozon принимает пакет целиком, но может отклонить отдельные строки
    fn log_rejected(&self, kind: &str) -> usize {
        let rejected: Vec<&OzonImportResult> =
            self.result.iter().filter(|r| !r.updated).collect();
        for item in &rejected {
            let reasons: Vec<String> = item
                .errors
                .iter()
                .map(|e| format!("{}: {}", e.code, e.message))
                .collect();
            tracing::warn!(
                "Ozon rejected {} update for {}: {}",
                kind,
                item.offer_id,
                reasons.join("; ")
            );
        }
        rejected.len()
    }
}
