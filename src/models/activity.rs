//! Activity log entries shown in the dispatch console.

use serde::{Deserialize, Serialize};

/// How prominently a log line should be displayed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Notice,
    Alert,
    Success,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub time: String,
    pub message: String,
    pub severity: Severity,
}
