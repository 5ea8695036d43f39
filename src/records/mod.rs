// 🧱 Record Framework
// Vendor entity → field map → validated record
//
// Every vendor adapter supplies one FieldMapper per record type. The mapper
// only renames and converts fields; validation is shared and is driven by
// the serde shape of the normalized record.

pub mod item;
pub mod order;
pub mod transaction;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::warn;

use crate::errors::{MappingError, RecordError};

pub use item::{Item, ItemMapper, Items};
pub use order::{Order, OrderMapper, Orders};
pub use transaction::Transaction;

/// Normalized field name → value
pub type FieldMap = Map<String, Value>;

// ============================================================================
// OBJECT TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectType {
    Item,
    Order,
    Transaction,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Item => "item",
            ObjectType::Order => "order",
            ObjectType::Transaction => "transaction",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// FIELD MAPPING
// ============================================================================

/// FieldMapper - per-vendor capability: raw entity → normalized field map
///
/// `map_fields` must be pure: it borrows the entity and returns the same map
/// for the same input.
pub trait FieldMapper {
    /// Raw vendor entity this mapper understands
    type Entity: Serialize + DeserializeOwned;

    /// Vendor name (e.g. "amazon")
    const VENDOR: &'static str;

    /// Which normalized record this mapper produces
    const OBJECT_TYPE: ObjectType;

    fn map_fields(entity: &Self::Entity) -> Result<FieldMap, MappingError>;

    /// Run the mapping and tag the outcome instead of short-circuiting
    fn try_map(entity: &Self::Entity) -> MappingOutcome {
        match Self::map_fields(entity) {
            Ok(fields) => MappingOutcome::Mapped(fields),
            Err(reason) => MappingOutcome::Failed(reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MappingOutcome {
    Mapped(FieldMap),
    Failed(MappingError),
}

impl MappingOutcome {
    pub fn is_mapped(&self) -> bool {
        matches!(self, MappingOutcome::Mapped(_))
    }
}

/// What to do when a vendor entity cannot be mapped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Log the failure and validate the raw entity as-is
    #[default]
    PassThrough,
    /// Return the mapping failure to the caller
    Strict,
}

/// Input to record construction
#[derive(Debug, Clone, PartialEq)]
pub enum RecordSource<E> {
    /// Raw vendor entity, goes through the mapper
    Vendor(E),
    /// Already in the normalized shape, the mapper is skipped
    Normalized(FieldMap),
}

impl<E: DeserializeOwned> RecordSource<E> {
    /// Classify an untyped value: anything that reads as the vendor entity is
    /// treated as one, any other object is taken as already normalized.
    pub fn detect(object: ObjectType, value: Value) -> Result<Self, RecordError> {
        match value {
            Value::Object(fields) => {
                match serde_json::from_value::<E>(Value::Object(fields.clone())) {
                    Ok(entity) => Ok(RecordSource::Vendor(entity)),
                    Err(_) => Ok(RecordSource::Normalized(fields)),
                }
            }
            other => Err(RecordError::validation(
                object,
                format!("expected an object, got {}", other),
            )),
        }
    }
}

/// Turn a record source into the field map that validation runs against
pub fn resolve_fields<M: FieldMapper>(
    source: RecordSource<M::Entity>,
    policy: FallbackPolicy,
) -> Result<FieldMap, RecordError> {
    let entity = match source {
        RecordSource::Normalized(fields) => return Ok(fields),
        RecordSource::Vendor(entity) => entity,
    };

    match M::try_map(&entity) {
        MappingOutcome::Mapped(fields) => Ok(fields),
        MappingOutcome::Failed(reason) => match policy {
            FallbackPolicy::Strict => Err(RecordError::Mapping {
                vendor: M::VENDOR,
                object: M::OBJECT_TYPE,
                source: reason,
            }),
            FallbackPolicy::PassThrough => {
                warn!(
                    vendor = M::VENDOR,
                    object = %M::OBJECT_TYPE,
                    error = %reason,
                    "field mapping failed, validating raw entity"
                );
                raw_fields(M::OBJECT_TYPE, &entity)
            }
        },
    }
}

fn raw_fields<E: Serialize>(object: ObjectType, entity: &E) -> Result<FieldMap, RecordError> {
    match serde_json::to_value(entity) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(other) => Err(RecordError::validation(
            object,
            format!("expected an object, got {}", other),
        )),
        Err(err) => Err(RecordError::validation(object, err.to_string())),
    }
}

/// Field-level validation: the map must deserialize into the record type
pub(crate) fn validate<R: DeserializeOwned>(
    object: ObjectType,
    fields: FieldMap,
) -> Result<R, RecordError> {
    serde_json::from_value(Value::Object(fields))
        .map_err(|err| RecordError::validation(object, err.to_string()))
}

/// Build a field map from (name, value) pairs
pub(crate) fn field_map<'a>(pairs: impl IntoIterator<Item = (&'a str, Value)>) -> FieldMap {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
