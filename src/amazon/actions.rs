// 🔑 Amazon Actions - session-gated order fetch

use tracing::info;

use super::models::{AmazonOrder, AmazonOrderEntity, AmazonOrders};
use crate::errors::FetchError;
use crate::records::{FallbackPolicy, Orders};

/// AmazonSession - the order-history client this layer delegates to
///
/// Paging, retries and rate limits are the session's business.
pub trait AmazonSession {
    fn is_authenticated(&self) -> bool;

    /// Raw orders, in the order the vendor returns them
    fn order_history(&self) -> anyhow::Result<Vec<AmazonOrderEntity>>;
}

/// Fetch and normalize the order history of an authenticated session
pub fn fetch_orders<S: AmazonSession + ?Sized>(session: &S) -> Result<AmazonOrders, FetchError> {
    fetch_orders_with(session, FallbackPolicy::default())
}

/// Same as `fetch_orders`, with an explicit fallback policy for orders whose
/// mapping fails
pub fn fetch_orders_with<S: AmazonSession + ?Sized>(
    session: &S,
    policy: FallbackPolicy,
) -> Result<AmazonOrders, FetchError> {
    if !session.is_authenticated() {
        return Err(FetchError::Unauthenticated);
    }

    let entities = session.order_history().map_err(FetchError::Vendor)?;
    info!(count = entities.len(), "fetched amazon order history");

    let orders = Orders::from_entities::<AmazonOrder>(entities, policy)?;
    Ok(orders)
}
