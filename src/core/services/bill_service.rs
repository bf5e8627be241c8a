use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::ServiceResult;
use crate::core::errors::BudgetError;
use crate::domain::{BillEntry, BillStatus, LedgerSnapshot};

pub const DEFAULT_UPCOMING_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusTotals {
    pub count: usize,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BillStatusBreakdown {
    pub paid: StatusTotals,
    pub unpaid: StatusTotals,
}

pub struct BillService;

impl BillService {
    /// Unpaid bills whose due date is strictly before `today`, earliest first.
    pub fn overdue_bills(snapshot: &LedgerSnapshot, today: NaiveDate) -> Vec<BillEntry> {
        Self::unpaid_matching(snapshot, |bill| bill.due_date < today)
    }

    /// Unpaid bills due within `[today, today + horizon_days]`, earliest first.
    ///
    /// Negative horizons count as zero; horizons past the last representable date are
    /// rejected.
    pub fn upcoming_bills(
        snapshot: &LedgerSnapshot,
        today: NaiveDate,
        horizon_days: i64,
    ) -> ServiceResult<Vec<BillEntry>> {
        let horizon = Duration::try_days(horizon_days.max(0))
            .and_then(|span| today.checked_add_signed(span))
            .ok_or_else(|| {
                BudgetError::invalid(format!("{} days after {} is out of range", horizon_days, today))
            })?;
        Ok(Self::unpaid_matching(snapshot, |bill| {
            bill.due_date >= today && bill.due_date <= horizon
        }))
    }

    pub fn bill_status_breakdown(snapshot: &LedgerSnapshot) -> BillStatusBreakdown {
        snapshot
            .bills
            .iter()
            .fold(BillStatusBreakdown::default(), |mut acc, bill| {
                let slot = match bill.status {
                    BillStatus::Paid => &mut acc.paid,
                    BillStatus::Unpaid => &mut acc.unpaid,
                };
                slot.count += 1;
                slot.total += bill.amount_due;
                acc
            })
    }

    fn unpaid_matching<F>(snapshot: &LedgerSnapshot, predicate: F) -> Vec<BillEntry>
    where
        F: Fn(&BillEntry) -> bool,
    {
        let mut bills: Vec<BillEntry> = snapshot
            .bills
            .iter()
            .filter(|bill| bill.is_unpaid() && predicate(bill))
            .cloned()
            .collect();
        bills.sort_by_key(|bill| bill.due_date);
        bills
    }
}
