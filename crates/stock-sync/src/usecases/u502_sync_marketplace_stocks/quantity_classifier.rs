use crate::shared::error::SyncError;

/// Поставщик не сообщает точный остаток выше десяти штук
const MANY_SENTINEL: &str = ">10";
const MANY_STOCK: u32 = 100;

/// Единственный экземпляр держим как витринный и не выставляем на продажу
const LAST_ITEM: &str = "1";

/// Перевести количество из фида в остаток для маркетплейса
///
/// Правила закрытые и проверяются по порядку: `">10"` → 100, `"1"` → 0,
/// иначе целое число как есть. Ошибка содержит код товара для отчёта.
pub fn classify_quantity(code: &str, raw: &str) -> Result<u32, SyncError> {
    let value = raw.trim();
    match value {
        MANY_SENTINEL => Ok(MANY_STOCK),
        LAST_ITEM => Ok(0),
        _ => value.parse::<u32>().map_err(|_| SyncError::InvalidQuantity {
            code: code.to_string(),
            raw: raw.to_string(),
        }),
    }
}
