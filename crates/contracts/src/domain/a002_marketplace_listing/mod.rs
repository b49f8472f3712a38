pub mod aggregate;

pub use aggregate::{CatalogPage, ListingId, PageContinuation};
