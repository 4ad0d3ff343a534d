//! Utility functions and helpers

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Format a number with thousands separators
pub fn format_number<T: ToString>(n: T, separator: &str) -> String {
    let s = n.to_string();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };
    let mut result = String::new();
    let mut count = 0;
    for c in digits.chars().rev() {
        if count == 3 {
            result.push_str(&separator.chars().rev().collect::<String>());
            count = 0;
        }
        result.push(c);
        count += 1;
    }
    format!("{}{}", sign, result.chars().rev().collect::<String>())
}

/// Format a money amount with grouping and a fixed number of decimal places
pub fn format_amount(amount: Decimal, decimal_places: u32, separator: &str) -> String {
    let rounded =
        amount.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let abs = rounded.abs();
    let whole = abs.trunc();
    let grouped = format_number(whole, separator);
    let text = if decimal_places == 0 {
        grouped
    } else {
        let fraction = (abs - whole) * Decimal::from(10u64.pow(decimal_places));
        format!(
            "{}.{:0width$}",
            grouped,
            fraction.trunc().to_u64().unwrap_or_default(),
            width = decimal_places as usize
        )
    };
    if negative {
        format!("-{}", text)
    } else {
        text
    }
}

/// Escape text for embedding in HTML content or attribute values
pub fn escape_html(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a unique ID
///
/// Millisecond timestamp plus a process-wide counter, so ids minted in the
/// same millisecond still differ.
pub fn generate_id() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let seq = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{:x}-{:x}", now, seq)
}
