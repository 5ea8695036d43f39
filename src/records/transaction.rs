// 💳 Transaction Records - ledger side of the match

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{validate, FieldMap, ObjectType};
use crate::errors::RecordError;

/// Ledger transaction, optionally linked to a vendor order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub record_date: NaiveDate,
    pub amount: Decimal,

    #[serde(default)]
    pub order_id: Option<String>,
}

impl Transaction {
    pub fn new(
        id: impl Into<String>,
        record_date: NaiveDate,
        amount: Decimal,
        order_id: Option<String>,
    ) -> Self {
        Transaction {
            id: id.into(),
            record_date,
            amount,
            order_id,
        }
    }

    pub fn from_fields(fields: FieldMap) -> Result<Self, RecordError> {
        validate(ObjectType::Transaction, fields)
    }

    /// True when the transaction is associated with an order
    pub fn is_ordered(&self) -> bool {
        self.order_id.is_some()
    }
}
