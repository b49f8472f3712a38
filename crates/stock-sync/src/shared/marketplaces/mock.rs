//! In-memory `MarketplaceClient` for unit tests.
//!
//! Serves scripted catalog pages keyed by the cursor they answer and records
//! every submitted chunk. A chunk index can be marked as failing to test
//! partial dispatch.

use async_trait::async_trait;
use contracts::domain::a002_marketplace_listing::CatalogPage;
use contracts::enums::MarketplaceType;
use contracts::usecases::u502_sync_marketplace_stocks::{PriceUpdate, StockUpdate};
use std::collections::HashMap;
use std::sync::Mutex;

use super::MarketplaceClient;
use crate::shared::error::SyncError;

pub struct MockMarketplaceClient {
    marketplace: MarketplaceType,
    pages: HashMap<String, CatalogPage>,
    pub requested_cursors: Mutex<Vec<String>>,
    pub stock_chunks: Mutex<Vec<Vec<StockUpdate>>>,
    pub price_chunks: Mutex<Vec<Vec<PriceUpdate>>>,
    fail_stock_chunk: Option<usize>,
}

impl MockMarketplaceClient {
    pub fn new(marketplace: MarketplaceType) -> Self {
        Self {
            marketplace,
            pages: HashMap::new(),
            requested_cursors: Mutex::new(Vec::new()),
            stock_chunks: Mutex::new(Vec::new()),
            price_chunks: Mutex::new(Vec::new()),
            fail_stock_chunk: None,
        }
    }

    /// Страница, которую вернёт запрос с данным курсором
    pub fn with_page(mut self, cursor: &str, page: CatalogPage) -> Self {
        self.pages.insert(cursor.to_string(), page);
        self
    }

    /// Пакет остатков с этим номером (с нуля) вернёт ошибку 500
    pub fn failing_stock_chunk(mut self, index: usize) -> Self {
        self.fail_stock_chunk = Some(index);
        self
    }

    pub fn sent_stocks(&self) -> Vec<Vec<StockUpdate>> {
        self.stock_chunks.lock().unwrap().clone()
    }

    pub fn sent_prices(&self) -> Vec<Vec<PriceUpdate>> {
        self.price_chunks.lock().unwrap().clone()
    }

    pub fn cursors(&self) -> Vec<String> {
        self.requested_cursors.lock().unwrap().clone()
    }
}

#[async_trait]
impl MarketplaceClient for MockMarketplaceClient {
    fn marketplace(&self) -> MarketplaceType {
        self.marketplace
    }

    async fn fetch_catalog_page(&self, cursor: &str) -> Result<CatalogPage, SyncError> {
        self.requested_cursors
            .lock()
            .unwrap()
            .push(cursor.to_string());
        self.pages
            .get(cursor)
            .cloned()
            .ok_or_else(|| SyncError::Api {
                marketplace: "Mock",
                status: 404,
                body: format!("no page for cursor {:?}", cursor),
            })
    }

    async fn update_stocks(&self, chunk: Vec<StockUpdate>) -> Result<(), SyncError> {
        let mut sent = self.stock_chunks.lock().unwrap();
        if self.fail_stock_chunk == Some(sent.len()) {
            return Err(SyncError::Api {
                marketplace: "Mock",
                status: 500,
                body: "internal error".to_string(),
            });
        }
        sent.push(chunk);
        Ok(())
    }

    async fn update_prices(&self, chunk: Vec<PriceUpdate>) -> Result<(), SyncError> {
        self.price_chunks.lock().unwrap().push(chunk);
        Ok(())
    }
}
