use colored::Colorize;
use std::fmt;

use crate::domain::EntryKind;

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Section,
}

fn apply_style(kind: MessageKind, message: impl fmt::Display) -> String {
    let text = message.to_string();
    match kind {
        MessageKind::Info => text,
        MessageKind::Success => format!("[ok] {text}").bright_green().to_string(),
        MessageKind::Warning => format!("[!] {text}").bright_yellow().to_string(),
        MessageKind::Error => format!("[x] {text}").bright_red().to_string(),
        MessageKind::Section => format!("=== {} ===", text.trim()).bold().to_string(),
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let formatted = apply_style(kind, message);
    match kind {
        MessageKind::Section => println!("\n{formatted}"),
        _ => println!("{formatted}"),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// `$1,234.50`; negative values render as `-$1,234.50`.
pub fn money(amount: f64) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let sign = if amount < 0.0 && format!("{:.2}", amount.abs()) != "0.00" {
        "-"
    } else {
        ""
    };
    format!("{sign}${}", group_thousands(amount.abs()))
}

/// Listing amount: `+` for income, `-` for expenses.
pub fn signed_money(kind: EntryKind, amount: f64) -> String {
    let sign = match kind {
        EntryKind::Income => '+',
        EntryKind::Expense => '-',
    };
    let amount = if amount.is_finite() { amount.abs() } else { 0.0 };
    format!("{sign}${}", group_thousands(amount))
}

pub fn colored_money(kind: EntryKind, amount: f64) -> String {
    let text = signed_money(kind, amount);
    match kind {
        EntryKind::Income => text.green().to_string(),
        EntryKind::Expense => text.red().to_string(),
    }
}

fn group_thousands(amount: f64) -> String {
    let fixed = format!("{amount:.2}");
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let digits = whole.len();
    let mut grouped = String::with_capacity(digits + digits / 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (digits - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{grouped}.{cents}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_groups_thousands() {
        assert_eq!(money(0.0), "$0.00");
        assert_eq!(money(999.5), "$999.50");
        assert_eq!(money(1000.0), "$1,000.00");
        assert_eq!(money(1234567.891), "$1,234,567.89");
        assert_eq!(money(-1000.0), "-$1,000.00");
        assert_eq!(money(-0.001), "$0.00");
    }

    #[test]
    fn listing_amounts_carry_the_kind_sign() {
        assert_eq!(signed_money(EntryKind::Expense, 100.0), "-$100.00");
        assert_eq!(signed_money(EntryKind::Income, 1000.0), "+$1,000.00");
        assert_eq!(signed_money(EntryKind::Income, f64::NAN), "+$0.00");
    }
}
