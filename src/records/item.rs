// 🛒 Item Records - one purchased line of an order

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;
use url::Url;

use super::{resolve_fields, validate, FallbackPolicy, FieldMap, FieldMapper, ObjectType, RecordSource};
use crate::errors::RecordError;

// ============================================================================
// ITEM
// ============================================================================

/// Normalized line item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub id: Option<String>,

    pub description: String,

    /// Unit price; non-negative by convention, not enforced
    pub price: Decimal,

    #[serde(default)]
    pub quantity: Option<u32>,

    #[serde(default)]
    pub taxable: Option<bool>,

    #[serde(default)]
    pub link: Option<Url>,
}

impl Item {
    /// Build and validate an item from a vendor entity or a normalized map
    pub fn create<M: FieldMapper>(
        source: RecordSource<M::Entity>,
        policy: FallbackPolicy,
    ) -> Result<Self, RecordError> {
        let fields = resolve_fields::<M>(source, policy)?;
        let item: Item = validate(ObjectType::Item, fields)?;
        debug!(vendor = M::VENDOR, description = %item.description, "validated item");
        Ok(item)
    }

    /// Validate an already-normalized field map
    pub fn from_fields(fields: FieldMap) -> Result<Self, RecordError> {
        validate(ObjectType::Item, fields)
    }
}

/// Item mappers get `create_item` for free
pub trait ItemMapper: FieldMapper + Sized {
    fn create_item(entity: Self::Entity) -> Result<Item, RecordError> {
        Item::create::<Self>(RecordSource::Vendor(entity), FallbackPolicy::default())
    }
}

// ============================================================================
// ITEMS (collection root)
// ============================================================================

/// Ordered collection of validated items
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Items(Vec<Item>);

impl Items {
    pub fn new(items: Vec<Item>) -> Self {
        Items(items)
    }

    /// Validate every source independently, keeping source order
    pub fn from_sources<M: ItemMapper>(
        sources: impl IntoIterator<Item = RecordSource<M::Entity>>,
        policy: FallbackPolicy,
    ) -> Result<Self, RecordError> {
        sources
            .into_iter()
            .enumerate()
            .map(|(index, source)| {
                Item::create::<M>(source, policy).map_err(|err| err.at(ObjectType::Item, index))
            })
            .collect()
    }

    /// Validate untyped values; each one may be a vendor entity or a normalized map
    pub fn from_values<M: ItemMapper>(
        values: Vec<Value>,
        policy: FallbackPolicy,
    ) -> Result<Self, RecordError> {
        values
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                RecordSource::<M::Entity>::detect(ObjectType::Item, value)
                    .and_then(|source| Item::create::<M>(source, policy))
                    .map_err(|err| err.at(ObjectType::Item, index))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<Item> {
        self.0
    }

    /// Ids that occur more than once, in order of their second appearance.
    /// Duplicates are allowed; this is a diagnostic only.
    pub fn duplicate_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut repeated = Vec::new();

        for id in self.0.iter().filter_map(|item| item.id.as_deref()) {
            if !seen.insert(id) && !repeated.contains(&id) {
                repeated.push(id);
            }
        }

        repeated
    }
}

impl FromIterator<Item> for Items {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        Items(iter.into_iter().collect())
    }
}

impl IntoIterator for Items {
    type Item = Item;
    type IntoIter = std::vec::IntoIter<Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Items {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ============================================================================
// TESTS
// ============================================================================
