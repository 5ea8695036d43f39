// 📦 Order Records
// An order is built from a vendor entity (through its mapper) or from an
// already-normalized map. Nested items are normalized one by one when the
// items collection is validated.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;
use url::Url;

use super::{
    resolve_fields, validate, FallbackPolicy, FieldMap, FieldMapper, ItemMapper, Items,
    ObjectType, RecordSource,
};
use crate::errors::RecordError;

// ============================================================================
// ORDER
// ============================================================================

/// Normalized order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,

    /// Date the order was placed
    pub record_date: NaiveDate,

    pub total: Decimal,

    #[serde(default)]
    pub link: Option<Url>,

    #[serde(default)]
    pub items: Option<Items>,
}

impl Order {
    /// Build and validate an order.
    ///
    /// `items` in the resolved field map may hold vendor item entities or
    /// normalized item maps; each is resolved through `M::Items`.
    pub fn create<M: OrderMapper>(
        source: RecordSource<M::Entity>,
        policy: FallbackPolicy,
    ) -> Result<Self, RecordError> {
        let mut fields = resolve_fields::<M>(source, policy)?;
        let raw_items = fields.remove("items");

        let mut order: Order = validate(ObjectType::Order, fields)?;
        order.items = match raw_items {
            None | Some(Value::Null) => None,
            Some(Value::Array(values)) => Some(Items::from_values::<M::Items>(values, policy)?),
            Some(other) => {
                return Err(RecordError::validation(
                    ObjectType::Order,
                    format!("`items` must be a sequence, got {}", other),
                ))
            }
        };

        debug!(
            vendor = M::VENDOR,
            order = %order.id,
            items = order.item_count(),
            "validated order"
        );
        Ok(order)
    }

    /// Validate an already-normalized map without any vendor in play.
    ///
    /// Nested items must be normalized item maps as well. Vendor-shaped items
    /// are rejected here since there is no item mapper to resolve them; use
    /// `Order::create` with `RecordSource::Normalized` to accept both shapes.
    pub fn from_fields(mut fields: FieldMap) -> Result<Self, RecordError> {
        let raw_items = fields.remove("items");
        let mut order: Order = validate(ObjectType::Order, fields)?;

        if let Some(raw_items) = raw_items.filter(|value| !value.is_null()) {
            let items = validate_items(raw_items)?;
            order.items = Some(items);
        }

        Ok(order)
    }

    pub fn items(&self) -> impl Iterator<Item = &super::Item> {
        self.items.iter().flat_map(|items| items.iter())
    }

    pub fn item_count(&self) -> usize {
        self.items.as_ref().map_or(0, Items::len)
    }
}

fn validate_items(raw_items: Value) -> Result<Items, RecordError> {
    let Value::Array(values) = raw_items else {
        return Err(RecordError::validation(
            ObjectType::Order,
            "`items` must be a sequence",
        ));
    };

    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value(value)
                .map_err(|err| RecordError::validation(ObjectType::Item, err.to_string()))
                .map_err(|err| err.at(ObjectType::Item, index))
        })
        .collect()
}

/// Order mappers name the item mapper used for their nested items
pub trait OrderMapper: FieldMapper + Sized {
    type Items: ItemMapper;

    fn create_order(entity: Self::Entity) -> Result<Order, RecordError> {
        Order::create::<Self>(RecordSource::Vendor(entity), FallbackPolicy::default())
    }
}

// ============================================================================
// ORDERS (collection root)
// ============================================================================

/// Ordered collection of validated orders
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Orders(Vec<Order>);

impl Orders {
    pub fn new(orders: Vec<Order>) -> Self {
        Orders(orders)
    }

    pub fn from_sources<M: OrderMapper>(
        sources: impl IntoIterator<Item = RecordSource<M::Entity>>,
        policy: FallbackPolicy,
    ) -> Result<Self, RecordError> {
        sources
            .into_iter()
            .enumerate()
            .map(|(index, source)| {
                Order::create::<M>(source, policy).map_err(|err| err.at(ObjectType::Order, index))
            })
            .collect()
    }

    pub fn from_entities<M: OrderMapper>(
        entities: impl IntoIterator<Item = M::Entity>,
        policy: FallbackPolicy,
    ) -> Result<Self, RecordError> {
        Self::from_sources::<M>(entities.into_iter().map(RecordSource::Vendor), policy)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Order> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Order> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<Order> {
        self.0
    }

    pub fn find(&self, id: &str) -> Option<&Order> {
        self.0.iter().find(|order| order.id == id)
    }

    /// Ids that occur more than once, in order of their second appearance
    pub fn duplicate_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut repeated = Vec::new();

        for order in &self.0 {
            let id = order.id.as_str();
            if !seen.insert(id) && !repeated.contains(&id) {
                repeated.push(id);
            }
        }

        repeated
    }
}

impl FromIterator<Order> for Orders {
    fn from_iter<I: IntoIterator<Item = Order>>(iter: I) -> Self {
        Orders(iter.into_iter().collect())
    }
}

impl IntoIterator for Orders {
    type Item = Order;
    type IntoIter = std::vec::IntoIter<Order>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Orders {
    type Item = &'a Order;
    type IntoIter = std::slice::Iter<'a, Order>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ============================================================================
// TESTS
// ============================================================================
