// handlers/protected/dashboard.rs - GET /api/dashboard/summary handler

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::rbac::{Role, DASHBOARD_VIEW};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_accounts: u32,
    pub pending_reconciliations: u32,
    pub completed_today: u32,
    pub alerts: u32,
    pub last_updated_utc: DateTime<Utc>,
}

impl DashboardSummary {
    /// Fixed figures per role; there is no reconciliation data behind them.
    pub fn for_role(role: Role, now: DateTime<Utc>) -> Self {
        let (total_accounts, pending_reconciliations, completed_today, alerts) = match role {
            Role::Admin => (256, 9, 48, 1),
            Role::User => (128, 14, 32, 3),
        };
        Self {
            total_accounts,
            pending_reconciliations,
            completed_today,
            alerts,
            last_updated_utc: now,
        }
    }
}

/// GET /api/dashboard/summary
///
/// ```json
/// {
///   "totalAccounts": 128,
///   "pendingReconciliations": 14,
///   "completedToday": 32,
///   "alerts": 3,
///   "lastUpdatedUtc": "2025-01-01T12:00:00Z"
/// }
/// ```
pub async fn summary_get(auth_user: AuthUser) -> ApiResult<DashboardSummary> {
    auth_user.require_permission(DASHBOARD_VIEW)?;

    Ok(ApiResponse::success(DashboardSummary::for_role(
        auth_user.role(),
        Utc::now(),
    )))
}
