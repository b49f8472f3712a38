use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use contracts::domain::a002_marketplace_listing::{CatalogPage, ListingId, PageContinuation};
use contracts::enums::MarketplaceType;
use contracts::usecases::u502_sync_marketplace_stocks::{PriceUpdate, StockUpdate};
use serde::{Deserialize, Serialize};

use super::{read_json, MarketplaceClient};
use crate::shared::config::TargetConfig;
use crate::shared::error::SyncError;

const DEFAULT_BASE_URL: &str = "https://api.partner.market.yandex.ru";

/// HTTP-клиент для работы с Yandex Market Partner API (одна кампания)
pub struct YandexMarketApiClient {
    client: reqwest::Client,
    base_url: String,
    campaign_id: String,
    token: String,
    page_size: usize,
}

impl YandexMarketApiClient {
    pub fn new(client: reqwest::Client, target: &TargetConfig) -> Self {
        Self {
            client,
            base_url: target
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            campaign_id: target.account_id.clone(),
            token: target.api_key.clone(),
            page_size: target.page_size(),
        }
    }

    fn campaign_url(&self, path: &str) -> String {
        format!("{}/campaigns/{}/{}", self.base_url, self.campaign_id, path)
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        tracing::debug!("{} {} Authorization: Bearer ****", method, url);
        self.client
            .request(method, url)
            .bearer_auth(&self.token)
            .header("Accept", "application/json")
    }
}

#[async_trait]
impl MarketplaceClient for YandexMarketApiClient {
    fn marketplace(&self) -> MarketplaceType {
        MarketplaceType::YandexMarket
    }

    /// Endpoint: GET /campaigns/{campaignId}/offer-mapping-entries
    async fn fetch_catalog_page(&self, cursor: &str) -> Result<CatalogPage, SyncError> {
        #[derive(Serialize)]
        struct QueryParams<'a> {
            limit: usize,
            #[serde(skip_serializing_if = "Option::is_none")]
            page_token: Option<&'a str>,
        }

        let url = self.campaign_url("offer-mapping-entries");
        let response = self
            .request(reqwest::Method::GET, &url)
            .query(&QueryParams {
                limit: self.page_size,
                page_token: Some(cursor).filter(|c| !c.is_empty()),
            })
            .send()
            .await?;

        let data: YandexOfferMappingEntriesResponse =
            read_json(MarketplaceType::YandexMarket, response).await?;
        Ok(data.into())
    }

    /// Endpoint: PUT /campaigns/{campaignId}/offers/stocks
    async fn update_stocks(&self, chunk: Vec<StockUpdate>) -> Result<(), SyncError> {
        let request = YandexStocksRequest::from(chunk.as_slice());
        let url = self.campaign_url("offers/stocks");
        let response = self
            .request(reqwest::Method::PUT, &url)
            .json(&request)
            .send()
            .await?;

        let _: YandexStatusResponse = read_json(MarketplaceType::YandexMarket, response).await?;
        Ok(())
    }

    /// Endpoint: POST /campaigns/{campaignId}/offer-prices/updates
    async fn update_prices(&self, chunk: Vec<PriceUpdate>) -> Result<(), SyncError> {
        let request = YandexPricesRequest::from(chunk.as_slice());
        let url = self.campaign_url("offer-prices/updates");
        let response = self
            .request(reqwest::Method::POST, &url)
            .json(&request)
            .send()
            .await?;

        let _: YandexStatusResponse = read_json(MarketplaceType::YandexMarket, response).await?;
        Ok(())
    }
}

// ============================================================================
// Request/Response structures для Yandex Market API
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct YandexOfferMappingEntriesResponse {
    pub result: YandexOfferMappingEntriesResult,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YandexOfferMappingEntriesResult {
    #[serde(default)]
    pub paging: YandexPaging,
    #[serde(rename = "offerMappingEntries", default)]
    pub offer_mapping_entries: Vec<YandexOfferMappingEntry>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct YandexPaging {
    #[serde(rename = "nextPageToken", default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YandexOfferMappingEntry {
    pub offer: YandexOffer,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YandexOffer {
    #[serde(rename = "shopSku")]
    pub shop_sku: String,
}

impl From<YandexOfferMappingEntriesResponse> for CatalogPage {
    fn from(response: YandexOfferMappingEntriesResponse) -> Self {
        let result = response.result;
        CatalogPage {
            listing_ids: result
                .offer_mapping_entries
                .into_iter()
                .map(|entry| ListingId(entry.offer.shop_sku))
                .collect(),
            continuation: PageContinuation::Cursor(result.paging.next_page_token),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct YandexStocksRequest {
    pub skus: Vec<YandexSkuStock>,
}

#[derive(Debug, Clone, Serialize)]
pub struct YandexSkuStock {
    pub sku: String,
    #[serde(rename = "warehouseId")]
    pub warehouse_id: Option<serde_json::Value>,
    pub items: Vec<YandexStockItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct YandexStockItem {
    pub count: u32,
    #[serde(rename = "type")]
    pub stock_type: String,
    #[serde(rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

fn format_updated_at(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// API ждёт числовой ID склада; нечисловое значение передаётся как есть
fn warehouse_value(warehouse_id: &str) -> serde_json::Value {
    match warehouse_id.trim().parse::<i64>() {
        Ok(id) => serde_json::Value::from(id),
        Err(_) => serde_json::Value::from(warehouse_id),
    }
}

impl From<&[StockUpdate]> for YandexStocksRequest {
    fn from(chunk: &[StockUpdate]) -> Self {
        Self {
            skus: chunk
                .iter()
                .map(|s| YandexSkuStock {
                    sku: s.listing_id.to_string(),
                    warehouse_id: s.warehouse_id.as_deref().map(warehouse_value),
                    items: vec![YandexStockItem {
                        count: s.quantity,
                        stock_type: "FIT".to_string(),
                        updated_at: s.updated_at.as_ref().map(format_updated_at),
                    }],
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct YandexPricesRequest {
    pub offers: Vec<YandexOfferPrice>,
}

#[derive(Debug, Clone, Serialize)]
pub struct YandexOfferPrice {
    pub id: String,
    pub price: YandexPrice,
}

#[derive(Debug, Clone, Serialize)]
pub struct YandexPrice {
    pub value: u64,
    #[serde(rename = "currencyId")]
    pub currency_id: String,
}

impl From<&[PriceUpdate]> for YandexPricesRequest {
    fn from(chunk: &[PriceUpdate]) -> Self {
        Self {
            offers: chunk
                .iter()
                .map(|p| YandexOfferPrice {
                    id: p.listing_id.to_string(),
                    price: YandexPrice {
                        value: p.price,
                        currency_id: p.currency.clone(),
                    },
                })
                .collect(),
        }
    }
}

/// Ответ на обновление: `{"status": "OK"}`
#[derive(Debug, Clone, Deserialize, Default)]
pub struct YandexStatusResponse {
    #[serde(default)]
    pub status: Option<String>,
}
