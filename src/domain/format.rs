//! Currency and percentage formatting for display.
//!
//! INR uses Indian grouping: the last three integer digits form one group
//! and everything to the left is grouped in pairs (12,34,567.50). Every other
//! currency uses three-digit grouping. Amounts are always shown with two
//! decimals and the minus sign goes before the currency symbol.

use crate::domain::currency::CurrencyCode;

const NOT_AVAILABLE: &str = "-";
const LAKH: f64 = 100_000.0;
const CRORE: f64 = 10_000_000.0;

pub fn format_currency(amount: f64, currency: CurrencyCode) -> String {
    if !amount.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let (negative, int_part, frac_part) = split_fixed(amount);
    let grouped = match currency {
        CurrencyCode::Inr => group_indian(&int_part),
        _ => group_thousands(&int_part),
    };
    format!(
        "{}{}{}.{}",
        if negative { "-" } else { "" },
        currency.symbol(),
        grouped,
        frac_part
    )
}

/// Signed percentage with two decimals, e.g. `+20.00%`. Zero is unsigned.
pub fn format_percent(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let (negative, int_part, frac_part) = split_fixed(value);
    let sign = if negative {
        "-"
    } else if int_part == "0" && frac_part == "00" {
        ""
    } else {
        "+"
    };
    format!("{}{}.{}%", sign, int_part, frac_part)
}

/// Lakh/crore abbreviation for large INR amounts: `₹12.35 L`, `₹1.20 Cr`.
/// Amounts under one lakh fall back to [`format_currency`].
pub fn format_compact_inr(amount: f64) -> String {
    if !amount.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let abs = amount.abs();
    let (scaled, suffix) = if abs >= CRORE {
        (abs / CRORE, "Cr")
    } else if abs >= LAKH {
        (abs / LAKH, "L")
    } else {
        return format_currency(amount, CurrencyCode::Inr);
    };
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}{}{:.2} {}", sign, CurrencyCode::Inr.symbol(), scaled, suffix)
}

/// Rounds to two decimals and returns (negative, integer digits, fraction digits).
/// A value that rounds to zero is never negative.
fn split_fixed(value: f64) -> (bool, String, String) {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let is_zero = int_part.bytes().chain(frac_part.bytes()).all(|b| b == b'0');
    (
        value < 0.0 && !is_zero,
        int_part.to_string(),
        frac_part.to_string(),
    )
}

fn group_thousands(digits: &str) -> String {
    group_from_right(digits, 3, 3)
}

fn group_indian(digits: &str) -> String {
    group_from_right(digits, 3, 2)
}

/// Inserts commas: the rightmost group has `first` digits, the rest `rest`.
fn group_from_right(digits: &str, first: usize, rest: usize) -> String {
    if digits.len() <= first {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - first);
    let mut groups: Vec<&str> = Vec::with_capacity(head.len() / rest + 2);
    let mut end = head.len();
    while end > rest {
        groups.push(&head[end - rest..end]);
        end -= rest;
    }
    groups.push(&head[..end]);
    groups.reverse();
    groups.push(tail);
    groups.join(",")
}
