pub mod bill_service;
pub mod budget_service;
pub mod health_service;
pub mod insight_service;
pub mod report_service;
pub mod trend_service;

pub use bill_service::{BillService, BillStatusBreakdown, StatusTotals, DEFAULT_UPCOMING_DAYS};
pub use budget_service::{
    Actuals, AllocationRule, Allocations, BudgetService, BudgetSummary, KeyIndicators,
    SummaryLine, Variance, VarianceDirection, VarianceSeverity,
};
pub use health_service::{HealthBand, HealthScore, HealthService};
pub use insight_service::{
    CalendarEvent, EssentialBreakdown, EventKind, InsightService, IntegrityIssue, MonthlyTotals,
};
pub use report_service::ReportService;
pub use trend_service::{TrendPoint, TrendService, MAX_TREND_DAYS};

use crate::core::errors::BudgetError;

pub type ServiceResult<T> = Result<T, BudgetError>;
