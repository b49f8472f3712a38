use contracts::domain::a001_supplier_feed::FeedRecord;
use contracts::domain::a002_marketplace_listing::ListingId;
use contracts::usecases::u502_sync_marketplace_stocks::{PriceMode, PriceUpdate, StockUpdate};
use std::collections::BTreeSet;

use super::price_normalizer::normalize_price;
use super::quantity_classifier::classify_quantity;
use crate::shared::error::SyncError;

/// Результат сверки фида с каталогом
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reconciliation {
    pub stocks: Vec<StockUpdate>,
    pub prices: Vec<PriceUpdate>,
    /// Артикулы каталога, которых нет в фиде (обнулены)
    pub orphans: usize,
}

/// Сопоставить строки фида с артикулами каталога
///
/// Каждый артикул каталога получает ровно один остаток: найденные в фиде —
/// в порядке фида, остальные — нулевой остаток в порядке сортировки.
/// Строки фида без артикула на маркетплейсе пропускаются. Первая строка с
/// неразборчивым количеством или ценой прерывает всю сверку.
pub fn reconcile(
    feed: &[FeedRecord],
    listing_ids: &BTreeSet<ListingId>,
    price_mode: &PriceMode,
) -> Result<Reconciliation, SyncError> {
    let mut remaining = listing_ids.clone();
    let mut stocks = Vec::with_capacity(listing_ids.len());
    let mut prices = Vec::new();

    for record in feed {
        let Some(listing_id) = remaining.take(record.code.as_str()) else {
            continue;
        };

        let quantity = classify_quantity(&record.code, &record.quantity)?;
        if let PriceMode::Update { currency } = price_mode {
            prices.push(PriceUpdate {
                listing_id: listing_id.clone(),
                price: normalize_price(&record.code, &record.price)?,
                currency: currency.clone(),
            });
        }
        stocks.push(StockUpdate::new(listing_id, quantity));
    }

    let orphans = remaining.len();
    stocks.extend(
        remaining
            .into_iter()
            .map(|listing_id| StockUpdate::new(listing_id, 0)),
    );

    Ok(Reconciliation {
        stocks,
        prices,
        orphans,
    })
}
