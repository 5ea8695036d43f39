// 🅰️ Amazon Models
// Vendor entities as the order-history client hands them over, plus the
// field mappers that translate them into normalized records.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::errors::MappingError;
use crate::records::{field_map, FieldMap, FieldMapper, ItemMapper, ObjectType, OrderMapper, Orders};

pub const VENDOR: &str = "amazon";

// ============================================================================
// VENDOR ENTITIES
// ============================================================================

/// Money as Amazon reports it: a number or a display string ("$1,299.00")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VendorAmount {
    Number(f64),
    Text(String),
}

impl VendorAmount {
    /// Exact decimal value, or None if the amount is not numeric.
    ///
    /// Numbers go through their shortest decimal form, so `10.99` stays
    /// `10.99` rather than the binary expansion of the float.
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            VendorAmount::Number(value) => Decimal::from_str(&value.to_string()).ok(),
            VendorAmount::Text(text) => {
                let cleaned = text.trim().replace(|c: char| c == '$' || c == ',', "");
                Decimal::from_str(&cleaned).ok()
            }
        }
    }
}

impl fmt::Display for VendorAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VendorAmount::Number(value) => write!(f, "{}", value),
            VendorAmount::Text(text) => f.write_str(text),
        }
    }
}

/// One item of an Amazon order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmazonItemEntity {
    pub title: String,

    #[serde(default)]
    pub price: Option<VendorAmount>,

    #[serde(default)]
    pub link: Option<String>,

    #[serde(default)]
    pub quantity: Option<u32>,
}

/// One Amazon order with its items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmazonOrderEntity {
    pub order_number: String,

    #[serde(default)]
    pub order_placed_date: Option<NaiveDate>,

    #[serde(default)]
    pub grand_total: Option<VendorAmount>,

    #[serde(default)]
    pub order_details_link: Option<String>,

    #[serde(default)]
    pub items: Vec<AmazonItemEntity>,
}

// ============================================================================
// FIELD MAPPERS
// ============================================================================

/// Amazon item → normalized item
pub struct AmazonItem;

impl FieldMapper for AmazonItem {
    type Entity = AmazonItemEntity;
    const VENDOR: &'static str = VENDOR;
    const OBJECT_TYPE: ObjectType = ObjectType::Item;

    fn map_fields(entity: &AmazonItemEntity) -> Result<FieldMap, MappingError> {
        // Absent price means free (e.g. promotional add-ons)
        let price = match &entity.price {
            Some(raw) => raw.to_decimal().ok_or_else(|| MappingError::InvalidAmount {
                field: "price",
                value: raw.to_string(),
            })?,
            None => Decimal::new(0, 2),
        };

        Ok(field_map([
            ("description", Value::from(entity.title.clone())),
            ("price", Value::from(price.to_string())),
            ("link", Value::from(entity.link.clone())),
            ("quantity", Value::from(entity.quantity)),
        ]))
    }
}

impl ItemMapper for AmazonItem {}

/// Amazon order → normalized order
pub struct AmazonOrder;

impl FieldMapper for AmazonOrder {
    type Entity = AmazonOrderEntity;
    const VENDOR: &'static str = VENDOR;
    const OBJECT_TYPE: ObjectType = ObjectType::Order;

    fn map_fields(entity: &AmazonOrderEntity) -> Result<FieldMap, MappingError> {
        let raw_total = entity
            .grand_total
            .as_ref()
            .ok_or(MappingError::MissingField("grand_total"))?;
        let total = raw_total
            .to_decimal()
            .ok_or_else(|| MappingError::InvalidAmount {
                field: "grand_total",
                value: raw_total.to_string(),
            })?;

        // Items stay in vendor shape; the items collection normalizes them
        let items = serde_json::to_value(&entity.items).map_err(|err| MappingError::Encode {
            field: "items",
            message: err.to_string(),
        })?;

        Ok(field_map([
            ("id", Value::from(entity.order_number.clone())),
            (
                "record_date",
                Value::from(entity.order_placed_date.map(|date| date.to_string())),
            ),
            ("total", Value::from(total.to_string())),
            ("link", Value::from(entity.order_details_link.clone())),
            ("items", items),
        ]))
    }
}

impl OrderMapper for AmazonOrder {
    type Items = AmazonItem;
}

/// Normalized collection of Amazon orders
pub type AmazonOrders = Orders;

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RecordError;
    use crate::records::{FallbackPolicy, Items, Order, RecordSource};
    use serde_json::json;

    fn mock_amazon_order() -> AmazonOrderEntity {
        AmazonOrderEntity {
            order_number: "123".to_string(),
            order_placed_date: NaiveDate::from_ymd_opt(2022, 1, 1),
            grand_total: Some(VendorAmount::Number(100.00)),
            order_details_link: None,
            items: Vec::new(),
        }
    }

    fn mock_amazon_item(title: &str, price: Option<VendorAmount>) -> AmazonItemEntity {
        AmazonItemEntity {
            title: title.to_string(),
            price,
            link: None,
            quantity: None,
        }
    }

    #[test]
    fn test_create_order() {
        let order = AmazonOrder::create_order(mock_amazon_order()).unwrap();

        assert_eq!(order.id, "123");
        assert_eq!(order.record_date, NaiveDate::from_ymd_opt(2022, 1, 1).unwrap());
        assert_eq!(order.total, Decimal::new(10000, 2));
        assert!(order.link.is_none());
        assert_eq!(order.item_count(), 0);
        assert!(order.items.is_some());
    }

    #[test]
    fn test_create_order_with_link_and_items() {
        let mut entity = mock_amazon_order();
        entity.grand_total = Some(VendorAmount::Text("$1,299.99".to_string()));
        entity.order_details_link =
            Some("https://www.amazon.com/gp/your-account/order-details?orderID=123".to_string());
        entity.items = vec![
            mock_amazon_item("Desk", Some(VendorAmount::Text("1,249.99".to_string()))),
            mock_amazon_item("Chair Mat", Some(VendorAmount::Number(50.0))),
        ];

        let order = AmazonOrder::create_order(entity).unwrap();

        assert_eq!(order.total, Decimal::new(129999, 2));
        assert_eq!(
            order.link.as_ref().map(|l| l.as_str()),
            Some("https://www.amazon.com/gp/your-account/order-details?orderID=123")
        );
        let titles: Vec<&str> = order.items().map(|i| i.description.as_str()).collect();
        assert_eq!(titles, vec!["Desk", "Chair Mat"]);
        assert_eq!(order.items().next().unwrap().price, Decimal::new(124999, 2));
    }

    #[test]
    fn test_float_total_has_no_drift() {
        let mut entity = mock_amazon_order();
        entity.grand_total = Some(VendorAmount::Number(10.99));

        let order = AmazonOrder::create_order(entity).unwrap();

        assert_eq!(order.total, Decimal::new(1099, 2));
        assert_eq!(order.total.to_string(), "10.99");
    }

    #[test]
    fn test_item_without_price_defaults_to_zero() {
        let item = AmazonItem::create_item(mock_amazon_item("Free Sample", None)).unwrap();

        assert_eq!(item.price, Decimal::new(0, 2));
        assert_eq!(item.price.to_string(), "0.00");
        assert_eq!(item.description, "Free Sample");
    }

    #[test]
    fn test_item_fields() {
        let mut entity = mock_amazon_item("Protein Bars", Some(VendorAmount::Text("$24.00".into())));
        entity.quantity = Some(12);
        entity.link = Some("https://www.amazon.com/dp/B000000002".to_string());

        let item = AmazonItem::create_item(entity).unwrap();

        assert_eq!(item.price, Decimal::new(2400, 2));
        assert_eq!(item.quantity, Some(12));
        assert_eq!(item.id, None);
        assert_eq!(item.taxable, None);
        assert!(item.link.is_some());
    }

    #[test]
    fn test_items_from_mixed_sources() {
        let normalized = field_map([("description", json!("Gift Wrap")), ("price", json!("3.99"))]);
        let sources = vec![
            RecordSource::Vendor(mock_amazon_item("Notebook", Some(VendorAmount::Number(6.5)))),
            RecordSource::Normalized(normalized),
            RecordSource::Vendor(mock_amazon_item("Sticker", None)),
        ];

        let items = Items::from_sources::<AmazonItem>(sources, FallbackPolicy::Strict).unwrap();

        let names: Vec<&str> = items.iter().map(|i| i.description.as_str()).collect();
        assert_eq!(names, vec!["Notebook", "Gift Wrap", "Sticker"]);
        assert_eq!(items.get(0).unwrap().price, Decimal::new(65, 1));
        assert_eq!(items.get(2).unwrap().price, Decimal::ZERO);
    }

    #[test]
    fn test_items_from_sources_reports_failing_index() {
        let sources = vec![
            RecordSource::Vendor(mock_amazon_item("Notebook", None)),
            RecordSource::Vendor(mock_amazon_item("Pen", Some(VendorAmount::Text("free".into())))),
        ];

        let err = Items::from_sources::<AmazonItem>(sources, FallbackPolicy::Strict).unwrap_err();

        assert!(matches!(err, RecordError::Element { index: 1, .. }));
    }

    #[test]
    fn test_mapping_failure_passes_raw_entity_through() {
        let mut entity = mock_amazon_order();
        entity.grand_total = Some(VendorAmount::Text("N/A".to_string()));

        assert!(!AmazonOrder::try_map(&entity).is_mapped());

        // Raw vendor shape has no `id`, so the outer validation fails
        let err = AmazonOrder::create_order(entity).unwrap_err();
        match err {
            RecordError::Validation { object, message } => {
                assert_eq!(object, ObjectType::Order);
                assert!(message.contains("id"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_strict_policy_reports_mapping_failure() {
        let mut entity = mock_amazon_order();
        entity.grand_total = None;

        let err = Order::create::<AmazonOrder>(RecordSource::Vendor(entity), FallbackPolicy::Strict)
            .unwrap_err();

        match err {
            RecordError::Mapping { vendor, source, .. } => {
                assert_eq!(vendor, "amazon");
                assert_eq!(source, MappingError::MissingField("grand_total"));
            }
            other => panic!("expected mapping error, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_item_price_fails_order() {
        let mut entity = mock_amazon_order();
        entity.items = vec![
            mock_amazon_item("Fine", None),
            mock_amazon_item("Broken", Some(VendorAmount::Text("free!".to_string()))),
        ];

        let err = Order::create::<AmazonOrder>(RecordSource::Vendor(entity), FallbackPolicy::Strict)
            .unwrap_err();

        match err {
            RecordError::Element { object, index, source } => {
                assert_eq!(object, ObjectType::Item);
                assert_eq!(index, 1);
                assert!(matches!(*source, RecordError::Mapping { .. }));
            }
            other => panic!("expected element error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_placed_date_fails_validation() {
        let mut entity = mock_amazon_order();
        entity.order_placed_date = None;

        let err = AmazonOrder::create_order(entity).unwrap_err();
        assert!(matches!(err, RecordError::Validation { object: ObjectType::Order, .. }));
    }

    #[test]
    fn test_entity_deserializes_from_client_json() {
        let entity: AmazonOrderEntity = serde_json::from_value(serde_json::json!({
            "order_number": "112-0000000-0000001",
            "order_placed_date": "2023-11-24",
            "grand_total": 42.5,
            "order_details_link": null,
            "items": [{"title": "Batteries", "price": "9.99", "quantity": 2}]
        }))
        .unwrap();

        assert_eq!(entity.grand_total, Some(VendorAmount::Number(42.5)));
        assert_eq!(entity.items[0].price, Some(VendorAmount::Text("9.99".to_string())));
        assert_eq!(entity.items[0].quantity, Some(2));
    }
}
