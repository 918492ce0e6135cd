//! Plain-text receipt preview.

use chrono::DateTime;

use crate::models::{StoreInfo, Transaction};

const RECEIPT_WIDTH: usize = 32;

/// Rupiah with dot thousands separators and no decimals, e.g. `Rp 25.000`.
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-Rp {grouped}")
    } else {
        format!("Rp {grouped}")
    }
}

fn qty(value: f64) -> String {
    if (value.round() - value).abs() < f64::EPSILON {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

/// `TRX` plus the last 8 digits of the sale's millisecond timestamp; falls
/// back to the id when the timestamp is missing.
pub fn display_number(transaction: &Transaction) -> String {
    let millis = transaction
        .created_at
        .as_deref()
        .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
        .map(|dt| dt.timestamp_millis().to_string());

    match millis {
        Some(ms) => {
            let start = ms.len().saturating_sub(8);
            format!("TRX{}", &ms[start..])
        }
        None => {
            let id: String = transaction
                .id
                .chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .take(8)
                .collect();
            format!("TRX{}", id.to_uppercase())
        }
    }
}

fn pair(label: &str, value: &str) -> String {
    let used = label.chars().count() + value.chars().count();
    if used < RECEIPT_WIDTH {
        format!("{label}{}{value}", " ".repeat(RECEIPT_WIDTH - used))
    } else {
        format!("{label}\n{value:>width$}", width = RECEIPT_WIDTH)
    }
}

fn center(text: &str) -> String {
    let len = text.chars().count();
    if len >= RECEIPT_WIDTH {
        return text.to_string();
    }
    format!("{}{text}", " ".repeat((RECEIPT_WIDTH - len) / 2))
}

pub fn render(transaction: &Transaction, store: &StoreInfo) -> String {
    let rule = "-".repeat(RECEIPT_WIDTH);
    let mut out: Vec<String> = Vec::new();

    out.push(center(&store.name));
    out.push(center(&store.address));
    out.push(center(&store.phone));
    out.push(rule.clone());
    out.push(pair("No", &display_number(transaction)));
    out.push(pair("Date", &transaction.date.format("%d/%m/%Y").to_string()));
    out.push(pair("Cashier", &transaction.cashier_name));
    out.push(pair("Payment", &transaction.payment_method.to_string()));
    out.push(rule.clone());

    for item in &transaction.items {
        out.push(item.menu_name.clone());
        out.push(pair(
            &format!(
                "  {} x {}",
                qty(f64::from(item.quantity)),
                format_currency(item.price)
            ),
            &format_currency(item.subtotal),
        ));
    }

    out.push(rule.clone());
    let subtotal = if transaction.subtotal > 0.0 {
        transaction.subtotal
    } else {
        transaction.items.iter().map(|i| i.subtotal).sum()
    };
    out.push(pair("Subtotal", &format_currency(subtotal)));
    if transaction.discount_amount > 0.0 {
        let label = match &transaction.discount_reason {
            Some(reason) => format!("Discount ({reason})"),
            None => "Discount".to_string(),
        };
        out.push(pair(&label, &format!("-{}", format_currency(transaction.discount_amount))));
    }
    out.push(pair("TOTAL", &format_currency(transaction.total)));
    out.push(rule);
    out.push(center("Thank you for your visit!"));

    out.join("\n")
}
