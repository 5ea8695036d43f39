// 📂 Order History Export Session
// Serves order history from a local Amazon export instead of a live client
//
// Supported inputs:
// - JSON: array of order entities as the order-history client emits them
// - CSV:  "Retail.OrderHistory" report from Amazon's data export, one row
//         per line item

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

use super::actions::AmazonSession;
use super::models::{AmazonItemEntity, AmazonOrderEntity, VendorAmount};

const PRODUCT_URL: &str = "https://www.amazon.com/dp/";
const ORDER_DETAILS_URL: &str = "https://www.amazon.com/gp/your-account/order-details?orderID=";

/// Cell values the export writes in place of an amount
const NOT_AVAILABLE: &[&str] = &["not available", "not applicable", "n/a"];

#[derive(Debug, Clone, Default)]
pub struct ExportSession {
    orders: Vec<AmazonOrderEntity>,
    authenticated: bool,
}

impl ExportSession {
    /// Session holding the given orders
    pub fn from_orders(orders: Vec<AmazonOrderEntity>) -> Self {
        ExportSession {
            orders,
            authenticated: true,
        }
    }

    /// Session that was never signed in
    pub fn signed_out() -> Self {
        ExportSession::default()
    }

    /// Load an export, picking the format from the file extension
    pub fn open(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "json" => Self::from_json(path),
            "csv" => Self::from_csv(path),
            _ => bail!("Unsupported export format: {}", path.display()),
        }
    }

    pub fn from_json(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open file: {}", path.display()))?;

        let orders: Vec<AmazonOrderEntity> = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse JSON from {}", path.display()))?;

        debug!(orders = orders.len(), path = %path.display(), "loaded json export");
        Ok(Self::from_orders(orders))
    }

    pub fn from_csv(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open file: {}", path.display()))?;

        Self::from_csv_reader(file)
            .with_context(|| format!("Failed to load order history from {}", path.display()))
    }

    /// Group CSV rows into orders, keeping the first-seen order of order ids
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut orders: Vec<PendingOrder> = Vec::new();
        let mut by_id: HashMap<String, usize> = HashMap::new();

        for (line_num, result) in reader.deserialize::<OrderHistoryRow>().enumerate() {
            // +2: 1-indexed plus header row
            let line = line_num + 2;
            let row = result.with_context(|| format!("Failed to parse CSV line {}", line))?;

            let placed = parse_order_date(&row.order_date).with_context(|| {
                format!("Invalid Order Date {:?} on line {}", row.order_date, line)
            })?;

            let index = match by_id.get(&row.order_id) {
                Some(&index) => index,
                None => {
                    orders.push(PendingOrder::new(&row.order_id, placed));
                    by_id.insert(row.order_id.clone(), orders.len() - 1);
                    orders.len() - 1
                }
            };

            orders[index].add_row(row);
        }

        let orders: Vec<AmazonOrderEntity> =
            orders.into_iter().map(PendingOrder::finish).collect();
        debug!(orders = orders.len(), "loaded csv export");

        Ok(Self::from_orders(orders))
    }

    pub fn orders(&self) -> &[AmazonOrderEntity] {
        &self.orders
    }
}

impl AmazonSession for ExportSession {
    fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    fn order_history(&self) -> Result<Vec<AmazonOrderEntity>> {
        Ok(self.orders.clone())
    }
}

// ============================================================================
// CSV ROWS
// ============================================================================

#[derive(Debug, Deserialize)]
struct OrderHistoryRow {
    #[serde(rename = "Order ID")]
    order_id: String,

    #[serde(rename = "Order Date")]
    order_date: String,

    #[serde(rename = "Total Owed", default)]
    total_owed: String,

    #[serde(rename = "Product Name", default)]
    product_name: String,

    #[serde(rename = "Unit Price", default)]
    unit_price: String,

    #[serde(rename = "Quantity", default)]
    quantity: String,

    #[serde(rename = "ASIN", default)]
    asin: String,
}

/// Order being assembled from its rows
struct PendingOrder {
    entity: AmazonOrderEntity,
    /// Running sum of "Total Owed"; Err keeps the first unparseable value
    total: std::result::Result<Decimal, String>,
}

impl PendingOrder {
    fn new(order_id: &str, placed: NaiveDate) -> Self {
        PendingOrder {
            entity: AmazonOrderEntity {
                order_number: order_id.to_string(),
                order_placed_date: Some(placed),
                grand_total: None,
                order_details_link: Some(format!("{}{}", ORDER_DETAILS_URL, order_id)),
                items: Vec::new(),
            },
            total: Ok(Decimal::ZERO),
        }
    }

    fn add_row(&mut self, row: OrderHistoryRow) {
        if let Ok(sum) = self.total.clone() {
            if let Some(owed) = export_amount(&row.total_owed) {
                self.total = match owed.to_decimal() {
                    Some(amount) => Ok(sum + amount),
                    None => Err(row.total_owed.clone()),
                };
            }
        }

        let price = export_amount(&row.unit_price);

        let link = if row.asin.is_empty() {
            None
        } else {
            Some(format!("{}{}", PRODUCT_URL, row.asin))
        };

        self.entity.items.push(AmazonItemEntity {
            title: row.product_name,
            price,
            link,
            quantity: row.quantity.parse().ok(),
        });
    }

    fn finish(self) -> AmazonOrderEntity {
        // An unparseable total is handed on as-is; the order mapper rejects it
        let grand_total = match self.total {
            Ok(sum) => sum.to_string(),
            Err(raw) => raw,
        };

        AmazonOrderEntity {
            grand_total: Some(VendorAmount::Text(grand_total)),
            ..self.entity
        }
    }
}

/// Empty and not-available cells carry no amount
fn export_amount(raw: &str) -> Option<VendorAmount> {
    let unavailable = NOT_AVAILABLE
        .iter()
        .any(|sentinel| raw.eq_ignore_ascii_case(sentinel));

    if raw.is_empty() || unavailable {
        None
    } else {
        Some(VendorAmount::Text(raw.to_string()))
    }
}

/// "2024-03-05T18:22:10Z" or "2024-03-05"
fn parse_order_date(raw: &str) -> Result<NaiveDate> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp.date_naive());
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(Into::into)
}

// ============================================================================
// TESTS
// ============================================================================
