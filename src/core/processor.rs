use crate::core::fine_calculator::calculate_fine;
use crate::core::renderer::{render_audit_line, render_notification};
use crate::domain::model::{NotificationMessage, ProcessedViolation, SpeedingViolation, VehicleInfo};
use crate::domain::ports::{AuditSink, NotificationDispatcher, VehicleRegistry};
use crate::utils::error::{FineError, Result};
use std::future::Future;
use std::time::Duration;

pub const DEFAULT_EMAIL_FROM: &str = "noreply@cfca.gov";

#[derive(Debug, Clone)]
pub struct ProcessorSettings {
    pub email_from: String,
    pub lookup_timeout: Option<Duration>,
    pub dispatch_timeout: Option<Duration>,
}

impl Default for ProcessorSettings {
    fn default() -> Self {
        Self {
            email_from: DEFAULT_EMAIL_FROM.to_string(),
            lookup_timeout: None,
            dispatch_timeout: None,
        }
    }
}

/// Runs one violation through fine, owner lookup, rendering, dispatch and audit, in that order.
pub struct ViolationProcessor<R: VehicleRegistry, D: NotificationDispatcher, A: AuditSink> {
    registry: R,
    dispatcher: D,
    audit: A,
    settings: ProcessorSettings,
}

async fn within<T, F>(limit: Option<Duration>, call: F) -> std::result::Result<Result<T>, Duration>
where
    F: Future<Output = Result<T>>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| limit),
        None => Ok(call.await),
    }
}

impl<R: VehicleRegistry, D: NotificationDispatcher, A: AuditSink> ViolationProcessor<R, D, A> {
    pub fn new(registry: R, dispatcher: D, audit: A) -> Self {
        Self::with_settings(registry, dispatcher, audit, ProcessorSettings::default())
    }

    pub fn with_settings(registry: R, dispatcher: D, audit: A, settings: ProcessorSettings) -> Self {
        Self {
            registry,
            dispatcher,
            audit,
            settings,
        }
    }

    pub async fn process(&self, violation: &SpeedingViolation) -> Result<ProcessedViolation> {
        let result = self.run_steps(violation).await;
        if let Err(e) = &result {
            tracing::warn!(
                license_number = %violation.license_number,
                road_id = %violation.road_id,
                category = ?e.category(),
                "Violation not processed: {}",
                e
            );
        }
        result
    }

    async fn run_steps(&self, violation: &SpeedingViolation) -> Result<ProcessedViolation> {
        let fine = calculate_fine(violation.excess_speed);
        let fine_text = fine.description();
        tracing::debug!(
            license_number = %violation.license_number,
            excess_speed = violation.excess_speed,
            "Calculated fine: {}",
            fine_text
        );

        let vehicle = self.lookup_owner(&violation.license_number).await?;

        let message = render_notification(violation, &vehicle, &fine_text, &self.settings.email_from)?;
        let audit_line = render_audit_line(violation, &vehicle, &fine_text)?;

        self.dispatch(&message).await?;
        self.audit.record(&audit_line);

        Ok(ProcessedViolation {
            license_number: violation.license_number.clone(),
            fine,
            recipient: message.metadata.email_to,
        })
    }

    async fn lookup_owner(&self, license_number: &str) -> Result<VehicleInfo> {
        tracing::debug!(license_number, "Looking up vehicle owner");
        let lookup = self.registry.get_vehicle_info(license_number);

        match within(self.settings.lookup_timeout, lookup).await {
            Ok(Ok(vehicle)) => Ok(vehicle),
            Ok(Err(FineError::Enrichment { reason, .. })) => Err(FineError::Enrichment {
                license_number: license_number.to_string(),
                reason,
            }),
            Ok(Err(other)) => Err(FineError::Enrichment {
                license_number: license_number.to_string(),
                reason: other.to_string(),
            }),
            Err(limit) => Err(FineError::Enrichment {
                license_number: license_number.to_string(),
                reason: format!("registry did not answer within {:?}", limit),
            }),
        }
    }

    async fn dispatch(&self, message: &NotificationMessage) -> Result<()> {
        let recipient = &message.metadata.email_to;
        tracing::debug!(recipient = %recipient, subject = %message.metadata.subject, "Dispatching notification");

        match within(self.settings.dispatch_timeout, self.dispatcher.send(message)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(FineError::Dispatch { reason, .. })) => Err(FineError::Dispatch {
                recipient: recipient.clone(),
                reason,
            }),
            Ok(Err(other)) => Err(FineError::Dispatch {
                recipient: recipient.clone(),
                reason: other.to_string(),
            }),
            Err(limit) => Err(FineError::Dispatch {
                recipient: recipient.clone(),
                reason: format!("no acknowledgement within {:?}", limit),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Fine;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::{Arc, Mutex};
    use tokio_test::{assert_err, assert_ok};

    #[derive(Clone, Default)]
    struct Journal {
        events: Arc<Mutex<Vec<String>>>,
        sent: Arc<Mutex<Vec<NotificationMessage>>>,
        audit: Arc<Mutex<Vec<String>>>,
    }

    impl Journal {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
        fn sent(&self) -> Vec<NotificationMessage> {
            self.sent.lock().unwrap().clone()
        }
        fn audit(&self) -> Vec<String> {
            self.audit.lock().unwrap().clone()
        }
    }

    struct MockRegistry {
        journal: Journal,
        owner: Option<VehicleInfo>,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl VehicleRegistry for MockRegistry {
        async fn get_vehicle_info(&self, license_number: &str) -> Result<VehicleInfo> {
            self.journal.events.lock().unwrap().push(format!("lookup {}", license_number));
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.owner.clone().ok_or_else(|| FineError::Enrichment {
                license_number: license_number.to_string(),
                reason: "404 Not Found".to_string(),
            })
        }
    }

    struct MockDispatcher {
        journal: Journal,
        fail: bool,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl NotificationDispatcher for MockDispatcher {
        async fn send(&self, message: &NotificationMessage) -> Result<()> {
            self.journal.events.lock().unwrap().push("dispatch".to_string());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(FineError::Dispatch {
                    recipient: message.metadata.email_to.clone(),
                    reason: "binding rejected message".to_string(),
                });
            }
            self.journal.sent.lock().unwrap().push(message.clone());
            Ok(())
        }
    }

    struct MockAudit {
        journal: Journal,
    }

    impl AuditSink for MockAudit {
        fn record(&self, line: &str) {
            self.journal.events.lock().unwrap().push("audit".to_string());
            self.journal.audit.lock().unwrap().push(line.to_string());
        }
    }

    type TestProcessor = ViolationProcessor<MockRegistry, MockDispatcher, MockAudit>;

    fn processor(
        journal: &Journal,
        owner: Option<VehicleInfo>,
        dispatch_fails: bool,
        settings: ProcessorSettings,
    ) -> TestProcessor {
        ViolationProcessor::with_settings(
            MockRegistry {
                journal: journal.clone(),
                owner,
                delay: None,
            },
            MockDispatcher {
                journal: journal.clone(),
                fail: dispatch_fails,
                delay: None,
            },
            MockAudit {
                journal: journal.clone(),
            },
            settings,
        )
    }

    fn violation(excess_speed: u32) -> SpeedingViolation {
        SpeedingViolation {
            license_number: "AB-123-C".to_string(),
            road_id: "A1".to_string(),
            excess_speed,
            timestamp: NaiveDate::from_ymd_opt(2024, 5, 1)
                .and_then(|d| d.and_hms_opt(14, 30, 0))
                .unwrap(),
        }
    }

    fn doe() -> Option<VehicleInfo> {
        Some(VehicleInfo::new("J. Doe", "j@x.com"))
    }

    #[tokio::test]
    async fn test_low_tier_violation_is_notified_and_audited() {
        let journal = Journal::default();
        let processor = processor(&journal, doe(), false, ProcessorSettings::default());

        let outcome = assert_ok!(processor.process(&violation(10)).await);
        assert_eq!(outcome.fine, Fine::Amount(73));
        assert_eq!(outcome.recipient, "j@x.com");

        let sent = journal.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].metadata.subject, "Speeding violation on the A1");
        assert_eq!(sent[0].metadata.email_to, "j@x.com");
        assert_eq!(sent[0].metadata.email_from, "noreply@cfca.gov");
        assert!(sent[0].body.contains("EUR 73.00"));

        let audit = journal.audit();
        assert_eq!(audit.len(), 1);
        for expected in ["J. Doe", "AB-123-C", "10", "A1", "Fine: EUR 73.00."] {
            assert!(audit[0].contains(expected), "missing {:?}", expected);
        }
    }

    #[tokio::test]
    async fn test_steps_run_in_order() {
        let journal = Journal::default();
        let processor = processor(&journal, doe(), false, ProcessorSettings::default());

        assert_ok!(processor.process(&violation(10)).await);
        assert_eq!(journal.events(), vec!["lookup AB-123-C", "dispatch", "audit"]);
    }

    #[tokio::test]
    async fn test_extreme_violation_still_dispatched() {
        let journal = Journal::default();
        let processor = processor(&journal, doe(), false, ProcessorSettings::default());

        let outcome = assert_ok!(processor.process(&violation(60)).await);
        assert_eq!(outcome.fine, Fine::Undetermined);

        let sent = journal.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].body.contains("Fine: to be decided by the prosecutor."));
        assert!(journal.audit()[0].contains("Fine: to be decided by the prosecutor."));
    }

    #[tokio::test]
    async fn test_registry_failure_stops_before_dispatch() {
        let journal = Journal::default();
        let processor = processor(&journal, None, false, ProcessorSettings::default());

        let err = assert_err!(processor.process(&violation(10)).await);
        assert!(matches!(err, FineError::Enrichment { ref license_number, .. } if license_number == "AB-123-C"));
        assert_eq!(journal.events(), vec!["lookup AB-123-C"]);
        assert!(journal.sent().is_empty());
        assert!(journal.audit().is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_failure_leaves_no_audit_line() {
        let journal = Journal::default();
        let processor = processor(&journal, doe(), true, ProcessorSettings::default());

        let err = assert_err!(processor.process(&violation(10)).await);
        assert!(matches!(err, FineError::Dispatch { ref recipient, .. } if recipient == "j@x.com"));
        assert_eq!(journal.events(), vec!["lookup AB-123-C", "dispatch"]);
        assert!(journal.audit().is_empty());
    }

    #[tokio::test]
    async fn test_render_failure_stops_before_dispatch() {
        let journal = Journal::default();
        let processor = processor(
            &journal,
            Some(VehicleInfo::new("J. Doe", "")),
            false,
            ProcessorSettings::default(),
        );

        let err = assert_err!(processor.process(&violation(10)).await);
        assert!(matches!(err, FineError::Formatting { .. }));
        assert!(journal.sent().is_empty());
        assert!(journal.audit().is_empty());
    }

    #[tokio::test]
    async fn test_slow_registry_times_out() {
        let journal = Journal::default();
        let settings = ProcessorSettings {
            lookup_timeout: Some(Duration::from_millis(20)),
            ..ProcessorSettings::default()
        };
        let mut processor = processor(&journal, doe(), false, settings);
        processor.registry.delay = Some(Duration::from_millis(500));

        let err = assert_err!(processor.process(&violation(10)).await);
        assert!(matches!(err, FineError::Enrichment { .. }));
        assert!(journal.sent().is_empty());
        assert!(journal.audit().is_empty());
    }

    #[tokio::test]
    async fn test_slow_dispatch_times_out() {
        let journal = Journal::default();
        let settings = ProcessorSettings {
            dispatch_timeout: Some(Duration::from_millis(20)),
            ..ProcessorSettings::default()
        };
        let mut processor = processor(&journal, doe(), false, settings);
        processor.dispatcher.delay = Some(Duration::from_millis(500));

        let err = assert_err!(processor.process(&violation(10)).await);
        assert!(matches!(err, FineError::Dispatch { .. }));
        assert!(journal.audit().is_empty());
    }

    #[tokio::test]
    async fn test_custom_sender_address() {
        let journal = Journal::default();
        let settings = ProcessorSettings {
            email_from: "fines@example.org".to_string(),
            ..ProcessorSettings::default()
        };
        let processor = processor(&journal, doe(), false, settings);

        assert_ok!(processor.process(&violation(3)).await);
        assert_eq!(journal.sent()[0].metadata.email_from, "fines@example.org");
        assert!(journal.sent()[0].body.contains("EUR 27.00"));
    }
}
