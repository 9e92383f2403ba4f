pub mod dashboard_service;

pub use dashboard_service::DashboardService;
pub use dash_core::{
    BudgetUtilization, CategoryShare, EntitlementNotice, EntitlementResult, PeriodSummary,
};
