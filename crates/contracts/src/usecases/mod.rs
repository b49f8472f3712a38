pub mod common;
pub mod u501_load_supplier_feed;
pub mod u502_sync_marketplace_stocks;
