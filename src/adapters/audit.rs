use crate::core::AuditSink;

pub const AUDIT_TARGET: &str = "fine_collection::audit";

/// Writes audit lines to the tracing subscriber under the `fine_collection::audit` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, line: &str) {
        tracing::info!(target: AUDIT_TARGET, "{}", line);
    }
}

impl<T: AuditSink + ?Sized> AuditSink for std::sync::Arc<T> {
    fn record(&self, line: &str) {
        (**self).record(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Collected(Mutex<Vec<String>>);

    impl AuditSink for Collected {
        fn record(&self, line: &str) {
            self.0.lock().unwrap().push(line.to_string());
        }
    }

    #[test]
    fn test_shared_sink_records_through_arc() {
        let inner = Arc::new(Collected::default());
        let shared: Arc<dyn AuditSink> = inner.clone();
        shared.record("Sent fine notification");
        assert_eq!(*inner.0.lock().unwrap(), vec!["Sent fine notification"]);
    }

    #[test]
    fn test_tracing_sink_never_fails_without_subscriber() {
        TracingAuditSink.record("Sent fine notification");
    }
}
