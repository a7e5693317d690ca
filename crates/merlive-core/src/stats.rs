//! Allocation statistics and their projection into chart series
//!
//! The allocation-stats endpoint returns three independent sections. Each
//! one may be missing without invalidating the others; a missing section
//! becomes an empty series (or `None` for the summary) and the renderer
//! draws a placeholder for that panel only.

use crate::envelope::open_envelope;
use crate::error::{InvalidCountError, ProjectionError};
use serde::Deserialize;
use serde_json::Value;

/// Label the server uses for users without a role
pub const NO_ROLE_LABEL: &str = "No Role";

/// Users assigned to one role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleUserCount {
    /// Role name
    pub role_name: String,
    /// Number of users holding the role
    pub count: u64,
}

/// Permissions granted to one role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePermissionCount {
    /// Role name
    pub name: String,
    /// Number of permissions granted
    pub permission_count: u64,
}

/// System-wide totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryTotals {
    /// All users
    pub total_users: u64,
    /// All roles
    pub total_roles: u64,
    /// All permissions
    pub total_permissions: u64,
}

/// One labeled numeric series ready for a chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Series {
    /// Chart title
    pub title: String,
    /// `(label, value)` points in payload order
    pub points: Vec<(String, u64)>,
}

impl Series {
    /// `true` when the chart should show a placeholder
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of all values, saturating at `u64::MAX`
    #[must_use]
    pub fn total(&self) -> u64 {
        self.points.iter().fold(0u64, |acc, (_, v)| acc.saturating_add(*v))
    }

    /// Largest value, 0 for an empty series
    #[must_use]
    pub fn max_value(&self) -> u64 {
        self.points.iter().map(|(_, v)| *v).max().unwrap_or(0)
    }

    /// Labels only
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.points.iter().map(|(l, _)| l.as_str())
    }

    /// Values only
    pub fn values(&self) -> impl Iterator<Item = u64> + '_ {
        self.points.iter().map(|(_, v)| *v)
    }
}

/// Typed allocation statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllocationStats {
    /// Users per role
    pub users_by_role: Vec<RoleUserCount>,
    /// Permissions per role
    pub permissions_by_role: Vec<RolePermissionCount>,
    /// Totals; `None` when the payload had no summary section
    pub summary: Option<SummaryTotals>,
}

impl AllocationStats {
    /// Pie chart series: share of users per role
    #[must_use]
    pub fn users_by_role_series(&self) -> Series {
        Series {
            title: "Users by role".to_string(),
            points: self
                .users_by_role
                .iter()
                .map(|r| (r.role_name.clone(), r.count))
                .collect(),
        }
    }

    /// Bar chart series: permission count per role
    #[must_use]
    pub fn permissions_by_role_series(&self) -> Series {
        Series {
            title: "Permissions by role".to_string(),
            points: self
                .permissions_by_role
                .iter()
                .map(|r| (r.name.clone(), r.permission_count))
                .collect(),
        }
    }

    /// Bar chart series: users, roles, permissions totals
    ///
    /// Empty when there is no summary section.
    #[must_use]
    pub fn summary_series(&self) -> Series {
        let points = self
            .summary
            .map(|s| {
                vec![
                    ("Users".to_string(), s.total_users),
                    ("Roles".to_string(), s.total_roles),
                    ("Permissions".to_string(), s.total_permissions),
                ]
            })
            .unwrap_or_default();
        Series {
            title: "Allocation summary".to_string(),
            points,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStats {
    #[serde(default)]
    users_by_role: Option<Vec<RawUsersByRole>>,
    #[serde(default)]
    permissions_by_role: Option<Vec<RawPermissionsByRole>>,
    #[serde(default)]
    summary: Option<RawSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawUsersByRole {
    #[serde(default)]
    role_name: Option<String>,
    #[serde(default)]
    count: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPermissionsByRole {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    permission_count: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSummary {
    #[serde(default)]
    total_users: Value,
    #[serde(default)]
    total_roles: Value,
    #[serde(default)]
    total_permissions: Value,
}

/// Coerce a JSON count into `u64`
///
/// Accepts integers, integral floats and numeric strings. A missing or
/// null value counts as 0.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn coerce_count(field: &'static str, label: &str, value: &Value) -> Result<u64, InvalidCountError> {
    let invalid = || InvalidCountError {
        field,
        label: label.to_string(),
        value: value.to_string(),
    };
    match value {
        Value::Null => Ok(0),
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                return Ok(v);
            }
            match n.as_f64() {
                Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => Ok(f as u64),
                _ => Err(invalid()),
            }
        }
        Value::String(s) => s.trim().parse::<u64>().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

/// Project an allocation-stats response into [`AllocationStats`]
///
/// Fails with `NoData` when `EC != 0` or `DT` is missing. Individual
/// sections may be absent; counts that cannot be coerced fail the whole
/// projection with `InvalidCount`.
pub fn project_stats(payload: &Value) -> Result<AllocationStats, ProjectionError> {
    let data = open_envelope(payload)?;
    let raw = RawStats::deserialize(data).map_err(|e| ProjectionError::MalformedStats(e.to_string()))?;

    let users_by_role = raw
        .users_by_role
        .unwrap_or_default()
        .into_iter()
        .map(|row| -> Result<RoleUserCount, InvalidCountError> {
            let role_name = row.role_name.unwrap_or_else(|| NO_ROLE_LABEL.to_string());
            let count = coerce_count("count", &role_name, &row.count)?;
            Ok(RoleUserCount { role_name, count })
        })
        .collect::<Result<Vec<_>, InvalidCountError>>()?;

    let permissions_by_role = raw
        .permissions_by_role
        .unwrap_or_default()
        .into_iter()
        .map(|row| -> Result<RolePermissionCount, InvalidCountError> {
            let name = row.name.unwrap_or_else(|| NO_ROLE_LABEL.to_string());
            let permission_count = coerce_count("permissionCount", &name, &row.permission_count)?;
            Ok(RolePermissionCount {
                name,
                permission_count,
            })
        })
        .collect::<Result<Vec<_>, InvalidCountError>>()?;

    let summary = raw
        .summary
        .map(|s| -> Result<SummaryTotals, InvalidCountError> {
            Ok(SummaryTotals {
                total_users: coerce_count("totalUsers", "summary", &s.total_users)?,
                total_roles: coerce_count("totalRoles", "summary", &s.total_roles)?,
                total_permissions: coerce_count("totalPermissions", "summary", &s.total_permissions)?,
            })
        })
        .transpose()?;

    if users_by_role.is_empty() {
        tracing::debug!("Stats payload has no usersByRole rows");
    }
    if permissions_by_role.is_empty() {
        tracing::debug!("Stats payload has no permissionsByRole rows");
    }
    if summary.is_none() {
        tracing::debug!("Stats payload has no summary");
    }

    Ok(AllocationStats {
        users_by_role,
        permissions_by_role,
        summary,
    })
}
