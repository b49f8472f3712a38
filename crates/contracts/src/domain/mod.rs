pub mod a001_supplier_feed;
pub mod a002_marketplace_listing;
