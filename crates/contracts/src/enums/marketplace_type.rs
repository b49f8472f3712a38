use serde::{Deserialize, Serialize};

/// Маркетплейсы, в которые выгружаются остатки и цены
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketplaceType {
    Ozon,
    YandexMarket,
}

impl MarketplaceType {
    /// Получить код маркетплейса
    pub fn code(&self) -> &'static str {
        match self {
            MarketplaceType::Ozon => "mp-ozon",
            MarketplaceType::YandexMarket => "mp-ym",
        }
    }

    /// Получить человекочитаемое название
    pub fn display_name(&self) -> &'static str {
        match self {
            MarketplaceType::Ozon => "Ozon",
            MarketplaceType::YandexMarket => "Яндекс Маркет",
        }
    }

    /// Код валюты, который маркетплейс ждёт в обновлении цен
    pub fn currency_code(&self) -> &'static str {
        match self {
            MarketplaceType::Ozon => "RUB",
            MarketplaceType::YandexMarket => "RUR",
        }
    }
}

impl std::fmt::Display for MarketplaceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
