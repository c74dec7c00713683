//! Correlation keys

use std::fmt;

/// `(transaction id, invoke id)` pair identifying one outstanding Invoke.
///
/// Either part may be empty; such keys still correlate, all anonymous
/// invokes of a transaction sharing one key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InvokeKey {
    pub tid: String,
    pub invoke_id: String,
}

impl InvokeKey {
    pub fn new(tid: &str, invoke_id: &str) -> Self {
        Self {
            tid: tid.to_string(),
            invoke_id: invoke_id.to_string(),
        }
    }
}

impl fmt::Display for InvokeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tid, self.invoke_id)
    }
}
