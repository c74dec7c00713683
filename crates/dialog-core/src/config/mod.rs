//! Correlation policies
//!
//! Real traces do not always follow the textbook role assignment of
//! transaction ids, so the few places where the engine has to pick a
//! convention are exposed here.
//!
//! ```rust
//! use sigflow_dialog_core::config::{CorrelationConfig, ErrorProbeOrder};
//!
//! let config = CorrelationConfig::default()
//!     .with_error_probe_order(ErrorProbeOrder::DtidFirst)
//!     .with_orphan_errors();
//! assert!(config.report_orphan_errors);
//! ```

use serde::{Deserialize, Serialize};

/// Order in which a ReturnError/Reject probes the pending set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorProbeOrder {
    /// Probe `OTID:invoke` before `DTID:invoke`
    #[default]
    OtidFirst,
    /// Probe `DTID:invoke` before `OTID:invoke`, for traces with swapped roles
    DtidFirst,
}

impl ErrorProbeOrder {
    /// Transaction ids to probe, in order
    pub fn probes<'a>(self, otid: &'a str, dtid: &'a str) -> [&'a str; 2] {
        match self {
            ErrorProbeOrder::OtidFirst => [otid, dtid],
            ErrorProbeOrder::DtidFirst => [dtid, otid],
        }
    }
}

/// Which DTID a dialogue keeps when several packets supply one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DtidPolicy {
    /// The first non-empty DTID in capture order
    #[default]
    FirstSeen,
    /// The last non-empty DTID in capture order
    LastSeen,
}

/// Configuration for one correlation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationConfig {
    pub error_probe_order: ErrorProbeOrder,
    pub dtid_policy: DtidPolicy,
    /// Report ReturnError/Reject components that match no pending Invoke
    pub report_orphan_errors: bool,
}

impl CorrelationConfig {
    pub fn with_error_probe_order(mut self, order: ErrorProbeOrder) -> Self {
        self.error_probe_order = order;
        self
    }

    pub fn with_dtid_policy(mut self, policy: DtidPolicy) -> Self {
        self.dtid_policy = policy;
        self
    }

    pub fn with_orphan_errors(mut self) -> Self {
        self.report_orphan_errors = true;
        self
    }
}
