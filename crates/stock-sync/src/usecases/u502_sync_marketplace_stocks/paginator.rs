use contracts::domain::a002_marketplace_listing::{ListingId, PageContinuation};
use std::collections::{BTreeSet, HashSet};

use crate::shared::error::SyncError;
use crate::shared::marketplaces::MarketplaceClient;

/// Получить все артикулы каталога, страница за страницей
///
/// Обе идиомы пагинации обрабатываются одним циклом по `PageContinuation`.
/// Курсор, который уже запрашивался (повтор или цикл страниц), считается
/// ошибкой протокола, а не поводом повторить запрос. Ошибки транспорта
/// пробрасываются как есть.
pub async fn fetch_all_listing_ids(
    client: &dyn MarketplaceClient,
) -> Result<BTreeSet<ListingId>, SyncError> {
    let marketplace = client.marketplace().display_name();
    let mut listing_ids = BTreeSet::new();
    let mut received = 0usize;
    let mut cursor = String::new();
    let mut requested: HashSet<String> = HashSet::from([cursor.clone()]);
    let mut pages = 0usize;

    loop {
        let page = client.fetch_catalog_page(&cursor).await?;
        pages += 1;
        let batch_size = page.listing_ids.len();
        received += batch_size;
        listing_ids.extend(page.listing_ids);

        tracing::debug!(
            "{} catalog page {}: {} items, {} received so far",
            marketplace,
            pages,
            batch_size,
            received
        );

        let next = match page.continuation {
            PageContinuation::Cursor(None) => break,
            PageContinuation::Cursor(Some(next)) if next.is_empty() => break,
            PageContinuation::Cursor(Some(next)) => next,
            PageContinuation::Total { total, last_id } => {
                if received == total {
                    break;
                }
                if received > total {
                    return Err(SyncError::protocol(format!(
                        "{} catalog returned {} items, more than reported total {}",
                        marketplace, received, total
                    )));
                }
                if batch_size == 0 {
                    return Err(SyncError::protocol(format!(
                        "{} catalog returned an empty page with {} of {} items received",
                        marketplace, received, total
                    )));
                }
                last_id
            }
        };

        if !requested.insert(next.clone()) {
            return Err(SyncError::protocol(format!(
                "{} catalog returned page cursor {:?} that was already requested",
                marketplace, next
            )));
        }
        cursor = next;
    }

    tracing::info!(
        "{} catalog: {} listings in {} pages",
        marketplace,
        listing_ids.len(),
        pages
    );
    Ok(listing_ids)
}
