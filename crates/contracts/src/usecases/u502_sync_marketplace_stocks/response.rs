use serde::{Deserialize, Serialize};

use super::updates::{PriceUpdate, StockUpdate};
use crate::enums::MarketplaceType;

/// Итог синхронизации одного подключения
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResult {
    /// Имя подключения из конфигурации
    pub target: String,
    pub marketplace: MarketplaceType,

    /// Количество артикулов в каталоге маркетплейса
    pub listings: usize,

    /// Остатки с ненулевым количеством
    pub applied: Vec<StockUpdate>,

    /// Все отправленные остатки, включая обнулённые
    pub all: Vec<StockUpdate>,

    pub prices: Vec<PriceUpdate>,

    pub stock_chunks: usize,
    pub price_chunks: usize,

    /// Пакеты не отправлялись
    pub dry_run: bool,
}

impl SyncResult {
    /// Количество артикулов, выгруженных с нулевым остатком
    pub fn out_of_stock(&self) -> usize {
        self.all.len() - self.applied.len()
    }
}
