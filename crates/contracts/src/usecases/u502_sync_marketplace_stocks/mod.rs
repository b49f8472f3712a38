pub mod request;
pub mod response;
pub mod updates;

pub use request::PriceMode;
pub use response::SyncResult;
pub use updates::{PriceUpdate, StockUpdate};

use crate::usecases::common::UseCaseMetadata;

pub struct SyncMarketplaceStocks;

impl UseCaseMetadata for SyncMarketplaceStocks {
    fn usecase_index() -> &'static str {
        "u502"
    }

    fn usecase_name() -> &'static str {
        "sync_marketplace_stocks"
    }

    fn display_name() -> &'static str {
        "Выгрузка остатков и цен на маркетплейс"
    }

    fn description() -> &'static str {
        "Сверка фида поставщика с каталогом маркетплейса и пакетное обновление остатков и цен"
    }
}
