//! Allocation targets, actual spend, and variance helpers for the 50/30/20 rule.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::errors::{BudgetError, Result};
use crate::core::validation::ensure_finite;
use crate::domain::LedgerSnapshot;

use super::ServiceResult;

const RATIO_TOLERANCE: f64 = 1e-9;

/// Share of income assigned to each bucket. The three ratios always sum to one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllocationRule {
    essentials: f64,
    non_essentials: f64,
    savings: f64,
}

impl AllocationRule {
    pub const FIFTY_THIRTY_TWENTY: AllocationRule = AllocationRule {
        essentials: 0.5,
        non_essentials: 0.3,
        savings: 0.2,
    };

    pub fn new(essentials: f64, non_essentials: f64, savings: f64) -> Result<Self> {
        for (name, ratio) in [
            ("essentials ratio", essentials),
            ("non-essentials ratio", non_essentials),
            ("savings ratio", savings),
        ] {
            if !ratio.is_finite() || !(0.0..=1.0).contains(&ratio) {
                return Err(BudgetError::invalid(format!(
                    "{} must be between 0 and 1, got {}",
                    name, ratio
                )));
            }
        }
        let sum = essentials + non_essentials + savings;
        if (sum - 1.0).abs() > RATIO_TOLERANCE {
            return Err(BudgetError::invalid(format!(
                "allocation ratios must sum to 1, got {:.4}",
                sum
            )));
        }
        Ok(Self {
            essentials,
            non_essentials,
            savings,
        })
    }

    pub fn essentials(&self) -> f64 {
        self.essentials
    }

    pub fn non_essentials(&self) -> f64 {
        self.non_essentials
    }

    pub fn savings(&self) -> f64 {
        self.savings
    }

    /// Applies the ratios without validating `income`.
    pub fn apply(&self, income: f64) -> Allocations {
        Allocations {
            essentials_target: income * self.essentials,
            non_essentials_target: income * self.non_essentials,
            savings_target: income * self.savings,
        }
    }
}

impl Default for AllocationRule {
    fn default() -> Self {
        Self::FIFTY_THIRTY_TWENTY
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Allocations {
    pub essentials_target: f64,
    pub non_essentials_target: f64,
    pub savings_target: f64,
}

impl Allocations {
    pub fn total(&self) -> f64 {
        self.essentials_target + self.non_essentials_target + self.savings_target
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Actuals {
    pub essentials: f64,
    pub non_essentials: f64,
    pub savings: f64,
}

/// Target against actual for one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryLine {
    pub target: f64,
    pub actual: f64,
    /// `actual - target`; positive means the bucket overshot its target.
    pub difference: f64,
    pub percentage_of_income: f64,
}

impl SummaryLine {
    fn new(target: f64, actual: f64, income: f64) -> Self {
        Self {
            target,
            actual,
            difference: actual - target,
            percentage_of_income: percentage(actual, income),
        }
    }

    pub fn variance(&self) -> Variance {
        Variance::between(self.actual, self.target)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetSummary {
    pub total_income: f64,
    pub essentials: SummaryLine,
    pub non_essentials: SummaryLine,
    pub savings: SummaryLine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarianceDirection {
    Over,
    Under,
}

/// Signed distance of an actual amount from its target, as a percentage of the target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Variance {
    pub percent: f64,
    pub direction: VarianceDirection,
}

impl Variance {
    /// Computes the variance of `actual` against `target`. A zero target yields 0%.
    pub fn between(actual: f64, target: f64) -> Self {
        let percent = if target == 0.0 {
            0.0
        } else {
            (actual - target) / target * 100.0
        };
        let direction = if percent > 0.0 {
            VarianceDirection::Over
        } else {
            VarianceDirection::Under
        };
        Self { percent, direction }
    }

    pub fn severity(&self) -> VarianceSeverity {
        VarianceSeverity::from_percent(self.percent)
    }
}

impl fmt::Display for Variance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.direction {
            VarianceDirection::Over => "Over",
            VarianceDirection::Under => "Under",
        };
        write!(f, "{} by {:.1}%", label, self.percent.abs())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarianceSeverity {
    OnTrack,
    Warning,
    Critical,
}

impl VarianceSeverity {
    pub fn from_percent(percent: f64) -> Self {
        let magnitude = percent.abs();
        if magnitude <= 10.0 {
            VarianceSeverity::OnTrack
        } else if magnitude <= 20.0 {
            VarianceSeverity::Warning
        } else {
            VarianceSeverity::Critical
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VarianceSeverity::OnTrack => "on track",
            VarianceSeverity::Warning => "warning",
            VarianceSeverity::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyIndicators {
    pub savings_rate: f64,
    pub expense_ratio: f64,
    /// Absolute gap between income and everything spent or saved.
    pub unallocated: f64,
}

/// Stateless budgeting utilities that operate over [`LedgerSnapshot`] values.
pub struct BudgetService;

impl BudgetService {
    /// Targets for `total_income` under the 50/30/20 rule.
    pub fn allocations(total_income: f64) -> ServiceResult<Allocations> {
        Self::allocations_with(&AllocationRule::default(), total_income)
    }

    pub fn allocations_with(rule: &AllocationRule, total_income: f64) -> ServiceResult<Allocations> {
        let income = ensure_finite("income", total_income)?;
        if income < 0.0 {
            return Err(BudgetError::invalid("income cannot be negative"));
        }
        Ok(rule.apply(income))
    }

    pub fn total_income(snapshot: &LedgerSnapshot) -> f64 {
        snapshot.total_income()
    }

    pub fn actuals(snapshot: &LedgerSnapshot) -> Actuals {
        Actuals {
            essentials: snapshot.total_essentials(),
            non_essentials: snapshot.total_non_essentials(),
            savings: snapshot.total_savings(),
        }
    }

    pub fn summary(snapshot: &LedgerSnapshot) -> BudgetSummary {
        Self::summary_with(snapshot, &AllocationRule::default())
    }

    pub fn summary_with(snapshot: &LedgerSnapshot, rule: &AllocationRule) -> BudgetSummary {
        let income = snapshot.total_income();
        let targets = rule.apply(income);
        let actuals = Self::actuals(snapshot);
        BudgetSummary {
            total_income: income,
            essentials: SummaryLine::new(targets.essentials_target, actuals.essentials, income),
            non_essentials: SummaryLine::new(
                targets.non_essentials_target,
                actuals.non_essentials,
                income,
            ),
            savings: SummaryLine::new(targets.savings_target, actuals.savings, income),
        }
    }

    pub fn variance(actual: f64, target: f64) -> ServiceResult<Variance> {
        let actual = ensure_finite("actual", actual)?;
        let target = ensure_finite("target", target)?;
        Ok(Variance::between(actual, target))
    }

    pub fn variance_severity(percent: f64) -> VarianceSeverity {
        VarianceSeverity::from_percent(percent)
    }

    pub fn key_indicators(snapshot: &LedgerSnapshot) -> KeyIndicators {
        let income = snapshot.total_income();
        let expenses = snapshot.total_expenses();
        let savings = snapshot.total_savings();
        KeyIndicators {
            savings_rate: percentage(savings, income),
            expense_ratio: percentage(expenses, income),
            unallocated: (expenses + savings - income).abs(),
        }
    }
}

/// `part / whole * 100`, or 0 when `whole` is 0.
pub(crate) fn percentage(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}
