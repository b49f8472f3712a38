use crate::shared::error::SyncError;

/// Преобразует цену из формата "5'990.00 руб." в 5990
///
/// Берётся часть до первой точки (копейки и хвост после них отбрасываются),
/// из неё удаляется всё, кроме цифр. Если цифр не осталось, это ошибка, а не ноль.
pub fn normalize_price(code: &str, raw: &str) -> Result<u64, SyncError> {
    let invalid = || SyncError::InvalidPrice {
        code: code.to_string(),
        raw: raw.to_string(),
    };

    let whole = raw.split('.').next().unwrap_or_default();
    let digits: String = whole.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Err(invalid());
    }
    digits.parse::<u64>().map_err(|_| invalid())
}
