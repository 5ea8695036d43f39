// YNAB Memo - Core Library
// Normalizes vendor order history into records that ledger memos are built from

pub mod amazon;
pub mod config;
pub mod errors;
pub mod memo;
pub mod records;

// Re-export commonly used types
pub use amazon::{
    fetch_orders, fetch_orders_with, AmazonItem, AmazonItemEntity, AmazonOrder,
    AmazonOrderEntity, AmazonOrders, AmazonSession, ExportSession, VendorAmount,
};
pub use errors::{FetchError, MappingError, RecordError};
pub use memo::{memo_for_transaction, order_memo, summarize_order, MemoFormat};
pub use records::{
    FallbackPolicy, FieldMap, FieldMapper, Item, ItemMapper, Items, MappingOutcome, ObjectType,
    Order, OrderMapper, Orders, RecordSource, Transaction,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
