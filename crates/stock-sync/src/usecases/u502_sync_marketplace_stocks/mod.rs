pub mod batch_dispatcher;
pub mod executor;
pub mod paginator;
pub mod price_normalizer;
pub mod quantity_classifier;
pub mod reconciler;

pub use executor::SyncExecutor;
