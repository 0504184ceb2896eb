//! Service health value reported by `GET /health`.

use serde::Serialize;

/// Overall service status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    Degraded,
}

/// Reachability of the vehicle store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseStatus {
    Connected,
    Unreachable,
}

/// Result of a single health check. Computed on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub status: ServiceStatus,
    pub database: DatabaseStatus,
}

impl HealthStatus {
    pub const fn up() -> Self {
        Self {
            status: ServiceStatus::Healthy,
            database: DatabaseStatus::Connected,
        }
    }

    pub const fn down() -> Self {
        Self {
            status: ServiceStatus::Degraded,
            database: DatabaseStatus::Unreachable,
        }
    }

    pub fn is_up(&self) -> bool {
        self.status == ServiceStatus::Healthy
    }
}
