use crate::usecases::common::UseCaseMetadata;

pub struct LoadSupplierFeed;

impl UseCaseMetadata for LoadSupplierFeed {
    fn usecase_index() -> &'static str {
        "u501"
    }

    fn usecase_name() -> &'static str {
        "load_supplier_feed"
    }

    fn display_name() -> &'static str {
        "Загрузка остатков поставщика"
    }

    fn description() -> &'static str {
        "Скачивание архива с остатками поставщика и разбор выгрузки в строки фида"
    }
}
