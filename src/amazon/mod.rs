// Amazon adapter
// Order-history entities, their field mappers, and the session-gated fetch

pub mod actions;
pub mod export;
pub mod models;

pub use actions::{fetch_orders, fetch_orders_with, AmazonSession};
pub use export::ExportSession;
pub use models::{
    AmazonItem, AmazonItemEntity, AmazonOrder, AmazonOrderEntity, AmazonOrders, VendorAmount,
};
