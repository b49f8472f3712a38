pub mod aggregate;

pub use aggregate::FeedRecord;
