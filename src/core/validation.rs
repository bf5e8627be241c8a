//! Form-layer checks applied before user input reaches the ledger store.

use chrono::NaiveDate;

use crate::core::errors::{BudgetError, Result};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a strictly positive amount (income, bills, expenses, deposits).
pub fn parse_amount(field: &str, raw: &str) -> Result<f64> {
    let value = parse_number(field, raw)?;
    if value <= 0.0 {
        return Err(BudgetError::invalid(format!(
            "{} must be greater than zero",
            field
        )));
    }
    Ok(value)
}

/// Parses an amount that may be zero (essentials expected/actual).
pub fn parse_non_negative(field: &str, raw: &str) -> Result<f64> {
    let value = parse_number(field, raw)?;
    if value < 0.0 {
        return Err(BudgetError::invalid(format!("{} cannot be negative", field)));
    }
    Ok(value)
}

/// Returns the trimmed text, rejecting empty input.
pub fn require_text(field: &str, raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(BudgetError::invalid(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
        BudgetError::invalid(format!("invalid date `{}` (use YYYY-MM-DD)", raw.trim()))
    })
}

/// Rejects NaN and infinities handed to calculations.
pub fn ensure_finite(field: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(BudgetError::invalid(format!("{} must be a finite number", field)))
    }
}

fn parse_number(field: &str, raw: &str) -> Result<f64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    let value = cleaned
        .parse::<f64>()
        .map_err(|_| BudgetError::invalid(format!("{} must be a number, got `{}`", field, raw)))?;
    ensure_finite(field, value)
}
