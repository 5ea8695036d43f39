// 📝 YNAB Memo Summaries
// Short item lists for the memo field of the matching ledger transaction
//
// Rules:
// - single item: the description alone
// - several items: comma separated (plain) or a numbered list (markdown)
// - quantity only when greater than 1, as "(n)"
// - casing is kept exactly as the vendor wrote it
// - Amazon branding is dropped from the front of a description
// - descriptions are kept under 50 characters

use serde::{Deserialize, Serialize};

use crate::records::{Item, Order, Orders, Transaction};

/// YNAB rejects memos longer than this (in characters)
pub const YNAB_MEMO_LIMIT: usize = 500;

/// Longest description kept in a summary, quantity suffix excluded
pub const DESCRIPTION_LIMIT: usize = 50;

/// Longest first
const BRAND_PREFIXES: &[&str] = &["Amazon Essentials", "Amazon Basics", "AmazonBasics", "Amazon"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MemoFormat {
    #[default]
    Plain,
    Markdown,
}

/// "Protein Bars (12)" or "Dog Costume"
pub fn item_label(item: &Item) -> String {
    let description = truncate(strip_branding(&item.description), DESCRIPTION_LIMIT);

    match item.quantity {
        Some(quantity) if quantity > 1 => format!("{} ({})", description, quantity),
        _ => description,
    }
}

/// "Amazon Basics HDMI Cable" -> "HDMI Cable"; a bare brand name is left alone
fn strip_branding(description: &str) -> &str {
    for brand in BRAND_PREFIXES {
        let Some(rest) = description.strip_prefix(brand) else {
            continue;
        };
        if !rest.starts_with(char::is_whitespace) {
            continue;
        }

        let rest = rest.trim_start();
        if !rest.is_empty() {
            return rest;
        }
    }

    description
}

pub fn summarize_order(order: &Order, format: MemoFormat) -> String {
    let labels: Vec<String> = order.items().map(item_label).collect();

    match labels.as_slice() {
        [] => format!("Order {}", order.id),
        [single] => single.clone(),
        many => match format {
            MemoFormat::Plain => many.join(", "),
            MemoFormat::Markdown => many
                .iter()
                .enumerate()
                .map(|(i, label)| format!("{}. {}", i + 1, label))
                .collect::<Vec<_>>()
                .join("\n"),
        },
    }
}

/// Summary plus the order link, cut down to the YNAB memo limit.
/// The link is kept whole; the summary is shortened instead.
pub fn order_memo(order: &Order, format: MemoFormat) -> String {
    let summary = summarize_order(order, format);

    let Some(link) = order.link.as_ref().map(|l| l.as_str()) else {
        return truncate(&summary, YNAB_MEMO_LIMIT);
    };

    let link_len = link.chars().count();
    if link_len + 1 >= YNAB_MEMO_LIMIT {
        return truncate(link, YNAB_MEMO_LIMIT);
    }

    let budget = YNAB_MEMO_LIMIT - link_len - 1;
    format!("{}\n{}", truncate(&summary, budget), link)
}

/// Memo for a transaction that points at one of `orders`
pub fn memo_for_transaction(
    transaction: &Transaction,
    orders: &Orders,
    format: MemoFormat,
) -> Option<String> {
    let order_id = transaction.order_id.as_deref()?;
    orders.find(order_id).map(|order| order_memo(order, format))
}

fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    if limit == 0 {
        return String::new();
    }

    let mut shortened: String = text.chars().take(limit - 1).collect();
    shortened.push('…');
    shortened
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Items;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use url::Url;

    fn create_test_item(description: &str, quantity: Option<u32>) -> Item {
        Item {
            id: None,
            description: description.to_string(),
            price: Decimal::new(100, 2),
            quantity,
            taxable: None,
            link: None,
        }
    }

    fn create_test_order(items: Vec<Item>, link: Option<&str>) -> Order {
        Order {
            id: "123".to_string(),
            record_date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            total: Decimal::new(10000, 2),
            link: link.map(|l| Url::parse(l).unwrap()),
            items: Some(Items::new(items)),
        }
    }

    #[test]
    fn test_single_item_has_no_prefix() {
        let order = create_test_order(vec![create_test_item("Barrel of Maple Syrup", Some(1))], None);

        assert_eq!(summarize_order(&order, MemoFormat::Plain), "Barrel of Maple Syrup");
        assert_eq!(summarize_order(&order, MemoFormat::Markdown), "Barrel of Maple Syrup");
    }

    #[test]
    fn test_single_item_with_quantity() {
        let order = create_test_order(vec![create_test_item("Protein Bars", Some(12))], None);

        assert_eq!(summarize_order(&order, MemoFormat::Plain), "Protein Bars (12)");
    }

    #[test]
    fn test_plain_list() {
        let order = create_test_order(
            vec![
                create_test_item("Dog Costume", None),
                create_test_item("Facepaint", Some(2)),
                create_test_item("Popcorn-shaped Purse", Some(1)),
            ],
            None,
        );

        assert_eq!(
            summarize_order(&order, MemoFormat::Plain),
            "Dog Costume, Facepaint (2), Popcorn-shaped Purse"
        );
    }

    #[test]
    fn test_markdown_list() {
        let order = create_test_order(
            vec![
                create_test_item("Dog Costume", None),
                create_test_item("Facepaint", Some(2)),
                create_test_item("Popcorn-shaped Purse", None),
            ],
            None,
        );

        assert_eq!(
            summarize_order(&order, MemoFormat::Markdown),
            "1. Dog Costume\n2. Facepaint (2)\n3. Popcorn-shaped Purse"
        );
    }

    #[test]
    fn test_branding_is_dropped() {
        let order = create_test_order(
            vec![
                create_test_item("Amazon Basics AA Batteries", Some(48)),
                create_test_item("Amazon Essentials Crew Socks", None),
                create_test_item("Amazon Echo Dot", None),
                create_test_item("Amazonite Bracelet", None),
                create_test_item("Amazon", None),
            ],
            None,
        );

        assert_eq!(
            summarize_order(&order, MemoFormat::Plain),
            "AA Batteries (48), Crew Socks, Echo Dot, Amazonite Bracelet, Amazon"
        );
    }

    #[test]
    fn test_long_description_is_capped() {
        let cable = "Amazon Basics High-Speed HDMI Cable, 6 Feet, 2-Pack, Supports Ethernet, 3D, 4K Video";
        let order = create_test_order(vec![create_test_item(cable, Some(2))], None);

        let summary = summarize_order(&order, MemoFormat::Plain);

        assert_eq!(summary, "High-Speed HDMI Cable, 6 Feet, 2-Pack, Supports E… (2)");
        assert_eq!(summary.trim_end_matches(" (2)").chars().count(), DESCRIPTION_LIMIT);
    }

    #[test]
    fn test_order_without_items() {
        let mut order = create_test_order(Vec::new(), None);
        assert_eq!(summarize_order(&order, MemoFormat::Plain), "Order 123");

        order.items = None;
        assert_eq!(summarize_order(&order, MemoFormat::Plain), "Order 123");
    }

    #[test]
    fn test_memo_appends_link() {
        let order = create_test_order(
            vec![create_test_item("USB-C Cable", None)],
            Some("https://www.amazon.com/gp/your-account/order-details?orderID=123"),
        );

        assert_eq!(
            order_memo(&order, MemoFormat::Plain),
            "USB-C Cable\nhttps://www.amazon.com/gp/your-account/order-details?orderID=123"
        );
    }

    #[test]
    fn test_long_memo_is_truncated_keeping_link() {
        let items = (0..60)
            .map(|i| create_test_item(&format!("Replacement Part {}", i), None))
            .collect();
        let link = "https://www.amazon.com/gp/your-account/order-details?orderID=123";
        let order = create_test_order(items, Some(link));

        let memo = order_memo(&order, MemoFormat::Plain);

        assert_eq!(memo.chars().count(), YNAB_MEMO_LIMIT);
        assert!(memo.ends_with(link));
        assert!(memo.contains("…\n"));
    }

    #[test]
    fn test_memo_for_transaction() {
        let orders = Orders::new(vec![create_test_order(
            vec![create_test_item("Desk Lamp", None)],
            None,
        )]);
        let date = NaiveDate::from_ymd_opt(2022, 1, 2).unwrap();

        let ordered = Transaction::new("tx-1", date, Decimal::new(-10000, 2), Some("123".into()));
        assert_eq!(
            memo_for_transaction(&ordered, &orders, MemoFormat::Plain).as_deref(),
            Some("Desk Lamp")
        );

        let unknown = Transaction::new("tx-2", date, Decimal::new(-500, 2), Some("999".into()));
        assert_eq!(memo_for_transaction(&unknown, &orders, MemoFormat::Plain), None);

        let unordered = Transaction::new("tx-3", date, Decimal::new(-500, 2), None);
        assert_eq!(memo_for_transaction(&unordered, &orders, MemoFormat::Plain), None);
    }
}
