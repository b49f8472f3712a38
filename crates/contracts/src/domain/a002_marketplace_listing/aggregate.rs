use serde::{Deserialize, Serialize};

// ============================================================================
// ID Type
// ============================================================================

/// Артикул товара в каталоге маркетплейса (offer_id / shopSku)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(pub String);

impl ListingId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ListingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ListingId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ListingId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::borrow::Borrow<str> for ListingId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Pagination
// ============================================================================

/// Признак продолжения каталога после очередной страницы
///
/// Маркетплейсы используют разные идиомы пагинации: Яндекс отдаёт курсор,
/// пустой на последней странице, а Ozon — общее количество товаров и
/// `last_id` для следующего запроса.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageContinuation {
    /// Курсор следующей страницы; `None` или пустая строка означает конец каталога
    Cursor(Option<String>),

    /// Общее число товаров и `last_id` для следующего запроса
    Total { total: usize, last_id: String },
}

/// Одна страница каталога
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPage {
    pub listing_ids: Vec<ListingId>,
    pub continuation: PageContinuation,
}
