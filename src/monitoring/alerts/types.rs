//! Alert storage types

use crate::monitoring::types::Alert;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};

/// Alert history and statistics behind a single lock
#[derive(Debug, Default)]
pub(super) struct AlertStorage {
    pub history: VecDeque<Alert>,
    pub stats: AlertStats,
}

/// Alert statistics
#[derive(Debug, Default, Clone, Serialize)]
pub struct AlertStats {
    /// Total alerts raised, including those evicted from history
    pub total_alerts: u64,
    pub alerts_by_severity: HashMap<String, u64>,
    pub acknowledged: u64,
    pub failed_notifications: u64,
    pub last_alert: Option<chrono::DateTime<chrono::Utc>>,
}
