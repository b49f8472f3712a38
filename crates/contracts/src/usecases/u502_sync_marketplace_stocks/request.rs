use serde::{Deserialize, Serialize};

/// Нужно ли формировать обновления цен при сверке
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PriceMode {
    /// Только остатки
    #[default]
    Skip,

    /// Остатки и цены в указанной валюте
    Update { currency: String },
}

impl PriceMode {
    pub fn update(currency: impl Into<String>) -> Self {
        Self::Update {
            currency: currency.into(),
        }
    }

    pub fn currency(&self) -> Option<&str> {
        match self {
            Self::Skip => None,
            Self::Update { currency } => Some(currency),
        }
    }
}
