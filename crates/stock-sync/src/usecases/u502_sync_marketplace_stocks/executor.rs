use super::batch_dispatcher::dispatch;
use super::paginator::fetch_all_listing_ids;
use super::reconciler::reconcile;
use crate::shared::config::TargetConfig;
use crate::shared::error::SyncError;
use crate::shared::marketplaces::MarketplaceClient;
use chrono::{DateTime, SubsecRound, Utc};
use contracts::domain::a001_supplier_feed::FeedRecord;
use contracts::usecases::u502_sync_marketplace_stocks::{PriceMode, StockUpdate, SyncResult};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// Параметры выгрузки для одного подключения
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub target: String,
    pub warehouse_id: Option<String>,
    pub stock_chunk_size: usize,
    pub price_chunk_size: usize,
    pub price_mode: PriceMode,
    /// Сверить и посчитать, но ничего не отправлять
    pub dry_run: bool,
    /// Фиксированная отметка времени остатков; по умолчанию берётся момент
    /// запуска, и тогда повторные выгрузки отличаются только `updated_at`
    pub updated_at: Option<DateTime<Utc>>,
}

impl SyncSettings {
    pub fn from_target(target: &TargetConfig) -> Self {
        Self {
            target: target.name.clone(),
            warehouse_id: target.warehouse_id.clone(),
            stock_chunk_size: target.stock_chunk_size(),
            price_chunk_size: target.price_chunk_size(),
            price_mode: if target.sync_prices {
                PriceMode::update(target.marketplace.currency_code())
            } else {
                PriceMode::Skip
            },
            dry_run: false,
            updated_at: None,
        }
    }
}

/// Executor для UseCase выгрузки остатков и цен в одно подключение
pub struct SyncExecutor {
    client: Arc<dyn MarketplaceClient>,
    settings: SyncSettings,
}

impl SyncExecutor {
    pub fn new(client: Arc<dyn MarketplaceClient>, settings: SyncSettings) -> Self {
        Self { client, settings }
    }

    /// Каталог → сверка с фидом → пакеты остатков → пакеты цен
    ///
    /// Первая ошибка прерывает выгрузку подключения. Отправленные до неё
    /// пакеты остаются в силе; повторный запуск безопасен, так как остатки
    /// и цены передаются абсолютными значениями.
    pub async fn sync(&self, feed: &[FeedRecord]) -> Result<SyncResult, SyncError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "sync",
            connection = %self.settings.target,
            marketplace = self.client.marketplace().code(),
            %run_id
        );
        self.run(feed).instrument(span).await
    }

    async fn run(&self, feed: &[FeedRecord]) -> Result<SyncResult, SyncError> {
        let settings = &self.settings;
        let marketplace = self.client.marketplace();
        tracing::info!(
            "Starting {} sync: {} feed records",
            marketplace.display_name(),
            feed.len()
        );

        let listing_ids = fetch_all_listing_ids(self.client.as_ref()).await?;
        let reconciliation = reconcile(feed, &listing_ids, &settings.price_mode)?;
        tracing::info!(
            "Reconciled: {} stock updates ({} not in feed), {} price updates",
            reconciliation.stocks.len(),
            reconciliation.orphans,
            reconciliation.prices.len()
        );
        match settings.price_mode.currency() {
            Some(currency) => tracing::debug!("Prices are sent in {}", currency),
            None => tracing::debug!("Price sync disabled for this target"),
        }

        let updated_at = settings
            .updated_at
            .unwrap_or_else(|| Utc::now().trunc_subsecs(0));
        let stocks: Vec<StockUpdate> = reconciliation
            .stocks
            .into_iter()
            .map(|mut stock| {
                stock.warehouse_id = settings.warehouse_id.clone();
                stock.updated_at = Some(updated_at);
                stock
            })
            .collect();
        let prices = reconciliation.prices;

        let (stock_chunks, price_chunks) = if settings.dry_run {
            tracing::info!("Dry run: nothing is sent");
            (0, 0)
        } else {
            let client = self.client.as_ref();
            let stock_chunks = dispatch(&stocks, settings.stock_chunk_size, |chunk| {
                client.update_stocks(chunk)
            })
            .await?;
            tracing::info!("Stocks sent in {} chunks", stock_chunks);

            let price_chunks = dispatch(&prices, settings.price_chunk_size, |chunk| {
                client.update_prices(chunk)
            })
            .await?;
            tracing::info!("Prices sent in {} chunks", price_chunks);
            (stock_chunks, price_chunks)
        };

        let applied: Vec<StockUpdate> = stocks
            .iter()
            .filter(|stock| stock.is_in_stock())
            .cloned()
            .collect();

        Ok(SyncResult {
            target: settings.target.clone(),
            marketplace,
            listings: listing_ids.len(),
            applied,
            all: stocks,
            prices,
            stock_chunks,
            price_chunks,
            dry_run: settings.dry_run,
        })
    }
}
