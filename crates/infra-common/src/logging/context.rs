use std::collections::BTreeMap;
use std::fmt;
use tracing::{Level, Span};

/// Context attached to the logs of one unit of work, e.g. a correlation pass
#[derive(Debug, Clone)]
pub struct LogContext {
    /// Component that is generating the log
    pub component: String,
    /// Operation being performed
    pub operation: Option<String>,
    /// Additional fields, rendered in key order
    pub fields: BTreeMap<String, String>,
}

impl LogContext {
    pub fn new<S: Into<String>>(component: S) -> Self {
        LogContext {
            component: component.into(),
            operation: None,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_operation<S: Into<String>, T: Into<String>>(component: S, operation: T) -> Self {
        LogContext {
            component: component.into(),
            operation: Some(operation.into()),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field<S: Into<String>, T: Into<String>>(mut self, key: S, value: T) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Create a span carrying this context. Extra fields are folded into a
    /// single `ctx` field since span field names must be static.
    pub fn span(&self, level: Level) -> Span {
        let operation = self.operation.as_deref().unwrap_or("-");
        let ctx = self.to_string();
        let component = self.component.as_str();
        match level {
            Level::TRACE => tracing::trace_span!("sigflow", component, operation, ctx = %ctx),
            Level::DEBUG => tracing::debug_span!("sigflow", component, operation, ctx = %ctx),
            Level::INFO => tracing::info_span!("sigflow", component, operation, ctx = %ctx),
            Level::WARN => tracing::warn_span!("sigflow", component, operation, ctx = %ctx),
            _ => tracing::error_span!("sigflow", component, operation, ctx = %ctx),
        }
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.component)?;

        if let Some(op) = &self.operation {
            write!(f, "[{}]", op)?;
        }

        for (key, value) in &self.fields {
            write!(f, "[{}={}]", key, value)?;
        }

        Ok(())
    }
}

/// Run `f` inside the span of `context`
pub fn with_context<F, R>(context: &LogContext, level: Level, f: F) -> R
where
    F: FnOnce() -> R,
{
    let span = context.span(level);
    let _guard = span.enter();
    f()
}
