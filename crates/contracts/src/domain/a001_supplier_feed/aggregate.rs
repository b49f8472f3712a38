use serde::{Deserialize, Serialize};

/// Строка файла остатков поставщика
///
/// Все поля хранятся как есть, в виде строк из выгрузки: классификация
/// количества и нормализация цены выполняются при сверке с каталогом.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedRecord {
    /// Код товара у поставщика, совпадает с артикулом на маркетплейсе
    #[serde(rename = "Код")]
    pub code: String,

    /// Количество: число, `">10"` или произвольный текст
    #[serde(rename = "Количество")]
    pub quantity: String,

    /// Цена в формате поставщика, например `5'990.00 руб.`
    #[serde(rename = "Цена")]
    pub price: String,
}

impl FeedRecord {
    pub fn new(
        code: impl Into<String>,
        quantity: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            quantity: quantity.into(),
            price: price.into(),
        }
    }
}
