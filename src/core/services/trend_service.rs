use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::ServiceResult;
use crate::core::errors::BudgetError;
use crate::domain::TrendSource;

/// Longest window accepted by [`TrendService::trend`], roughly a century.
pub const MAX_TREND_DAYS: u32 = 36_500;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub daily: f64,
    pub cumulative: f64,
}

pub struct TrendService;

impl TrendService {
    /// Daily and running totals over `[today - days, today]`, one point per calendar day.
    ///
    /// Days without entries are zero-filled; entries outside the window are ignored and do
    /// not seed the running total. Windows longer than [`MAX_TREND_DAYS`] or reaching before
    /// the earliest representable date are rejected.
    pub fn trend<T: TrendSource>(
        entries: &[T],
        days: u32,
        today: NaiveDate,
    ) -> ServiceResult<Vec<TrendPoint>> {
        if days > MAX_TREND_DAYS {
            return Err(BudgetError::invalid(format!(
                "trend window is limited to {} days, got {}",
                MAX_TREND_DAYS, days
            )));
        }
        let start = today
            .checked_sub_signed(Duration::days(i64::from(days)))
            .ok_or_else(|| {
                BudgetError::invalid(format!("{} days before {} is out of range", days, today))
            })?;
        let mut daily: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for entry in entries {
            let date = entry.trend_date();
            if date >= start && date <= today {
                *daily.entry(date).or_insert(0.0) += entry.trend_amount();
            }
        }

        let mut cumulative = 0.0;
        Ok(start
            .iter_days()
            .take(days as usize + 1)
            .map(|date| {
                let amount = daily.get(&date).copied().unwrap_or(0.0);
                cumulative += amount;
                TrendPoint {
                    date,
                    daily: amount,
                    cumulative,
                }
            })
            .collect())
    }
}
