use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::LedgerSnapshot;

use super::budget_service::{percentage, AllocationRule, Variance};

const COMPONENT_MAX: f64 = 25.0;
/// Months of expenses an emergency fund should cover before it scores full marks.
const EMERGENCY_FUND_MONTHS: f64 = 3.0;
const EXPENSE_RATIO_CEILING: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthBand {
    Excellent,
    Good,
    NeedsImprovement,
    Critical,
}

impl HealthBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            HealthBand::Excellent
        } else if score >= 60.0 {
            HealthBand::Good
        } else if score >= 40.0 {
            HealthBand::NeedsImprovement
        } else {
            HealthBand::Critical
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            HealthBand::Excellent => "Excellent financial health!",
            HealthBand::Good => "Good financial management",
            HealthBand::NeedsImprovement => "Needs improvement",
            HealthBand::Critical => "Critical - Review budget immediately",
        }
    }
}

impl fmt::Display for HealthBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HealthBand::Excellent => "Excellent",
            HealthBand::Good => "Good",
            HealthBand::NeedsImprovement => "Needs improvement",
            HealthBand::Critical => "Critical",
        };
        f.write_str(label)
    }
}

/// Four components worth up to 25 points each.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthScore {
    pub savings_rate: f64,
    pub budget_adherence: f64,
    pub emergency_fund: f64,
    pub expense_control: f64,
    pub total: f64,
    pub band: HealthBand,
}

pub struct HealthService;

impl HealthService {
    pub fn health_score(snapshot: &LedgerSnapshot) -> HealthScore {
        Self::health_score_with(snapshot, &AllocationRule::default())
    }

    pub fn health_score_with(snapshot: &LedgerSnapshot, rule: &AllocationRule) -> HealthScore {
        let income = snapshot.total_income();
        let savings = snapshot.total_savings();
        let expenses = snapshot.total_expenses();
        let savings_target_pct = rule.savings() * 100.0;

        let savings_rate = percentage(savings, income);
        let savings_component = if savings_target_pct == 0.0 {
            COMPONENT_MAX
        } else {
            (savings_rate / savings_target_pct * COMPONENT_MAX).min(COMPONENT_MAX)
        };

        let variance = Variance::between(savings, rule.apply(income).savings_target);
        let adherence_component =
            (COMPONENT_MAX - variance.percent.abs() / 10.0 * COMPONENT_MAX).max(0.0);

        let emergency_component = if expenses == 0.0 {
            0.0
        } else {
            (savings / (EMERGENCY_FUND_MONTHS * expenses) * COMPONENT_MAX).min(COMPONENT_MAX)
        };

        let expense_ratio = percentage(expenses, income);
        let expense_component = if expense_ratio <= EXPENSE_RATIO_CEILING {
            COMPONENT_MAX
        } else {
            (COMPONENT_MAX - (expense_ratio - EXPENSE_RATIO_CEILING) / 20.0 * COMPONENT_MAX)
                .max(0.0)
        };

        let total = (savings_component
            + adherence_component
            + emergency_component
            + expense_component)
            .clamp(0.0, 100.0);

        HealthScore {
            savings_rate: savings_component,
            budget_adherence: adherence_component,
            emergency_fund: emergency_component,
            expense_control: expense_component,
            total,
            band: HealthBand::from_score(total),
        }
    }

    pub fn recommendations(snapshot: &LedgerSnapshot) -> Vec<String> {
        Self::recommendations_with(snapshot, &AllocationRule::default())
    }

    /// Fixed advice rules evaluated in order; a single affirmation when none fire.
    pub fn recommendations_with(snapshot: &LedgerSnapshot, rule: &AllocationRule) -> Vec<String> {
        let income = snapshot.total_income();
        let targets = rule.apply(income);
        let savings = snapshot.total_savings();
        let mut advice = Vec::new();

        if percentage(savings, income) < rule.savings() * 100.0 {
            advice.push(format!(
                "Increase your savings rate to reach the {:.0}% target",
                rule.savings() * 100.0
            ));
        }
        if snapshot.total_essentials() > targets.essentials_target {
            advice.push(format!(
                "Review essential expenses - you're over the {:.0}% target",
                rule.essentials() * 100.0
            ));
        }
        if snapshot.total_non_essentials() > targets.non_essentials_target {
            advice.push(format!(
                "Reduce non-essential spending to stay within {:.0}% budget",
                rule.non_essentials() * 100.0
            ));
        }
        if snapshot.has_unpaid_bills() {
            advice.push("Pay outstanding bills to avoid late fees".to_string());
        }
        if savings < EMERGENCY_FUND_MONTHS * snapshot.total_expenses() {
            advice.push("Build emergency fund to cover 3-6 months of expenses".to_string());
        }

        if advice.is_empty() {
            advice.push("Great job! Your budget is well-balanced".to_string());
        }
        advice
    }
}
