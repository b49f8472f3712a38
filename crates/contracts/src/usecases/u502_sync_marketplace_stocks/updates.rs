use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::a002_marketplace_listing::ListingId;

/// Новое значение остатка для одного артикула
///
/// Значение абсолютное, а не дельта: повторная отправка того же пакета
/// безопасна.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockUpdate {
    pub listing_id: ListingId,
    pub quantity: u32,

    /// Склад продавца, если маркетплейс его требует
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warehouse_id: Option<String>,

    /// Момент, на который актуален остаток (одинаковый для всей выгрузки)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl StockUpdate {
    pub fn new(listing_id: ListingId, quantity: u32) -> Self {
        Self {
            listing_id,
            quantity,
            warehouse_id: None,
            updated_at: None,
        }
    }

    /// Есть ли товар в наличии
    pub fn is_in_stock(&self) -> bool {
        self.quantity != 0
    }
}

/// Новая цена для одного артикула, в целых рублях
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceUpdate {
    pub listing_id: ListingId,
    pub price: u64,
    pub currency: String,
}
