use crate::core::processor::ViolationProcessor;
use crate::domain::model::{ProcessedViolation, SpeedingViolation};
use crate::domain::ports::{AuditSink, NotificationDispatcher, VehicleRegistry};
use crate::utils::error::FineError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

#[derive(Debug)]
pub struct FailedViolation {
    pub license_number: String,
    pub error: FineError,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub processed: Vec<ProcessedViolation>,
    pub failed: Vec<FailedViolation>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.processed.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Processes independent violations concurrently, each on its own task.
pub struct FineCollectionEngine<R, D, A>
where
    R: VehicleRegistry + 'static,
    D: NotificationDispatcher + 'static,
    A: AuditSink + 'static,
{
    processor: Arc<ViolationProcessor<R, D, A>>,
    max_concurrent: usize,
}

impl<R, D, A> FineCollectionEngine<R, D, A>
where
    R: VehicleRegistry + 'static,
    D: NotificationDispatcher + 'static,
    A: AuditSink + 'static,
{
    pub fn new(processor: ViolationProcessor<R, D, A>, max_concurrent: usize) -> Self {
        Self {
            processor: Arc::new(processor),
            max_concurrent: max_concurrent.max(1),
        }
    }

    pub async fn run(&self, violations: Vec<SpeedingViolation>) -> BatchReport {
        tracing::info!(
            "Processing {} violation(s), at most {} at a time",
            violations.len(),
            self.max_concurrent
        );

        let permits = Arc::new(Semaphore::new(self.max_concurrent));
        let mut tasks = JoinSet::new();
        let mut licenses = HashMap::new();

        for violation in violations {
            let processor = Arc::clone(&self.processor);
            let permits = Arc::clone(&permits);
            let license_number = violation.license_number.clone();
            let handle = tasks.spawn(async move {
                let Ok(_permit) = permits.acquire_owned().await else {
                    return (
                        violation.license_number,
                        Err(FineError::TaskError {
                            message: "concurrency limiter closed".to_string(),
                        }),
                    );
                };
                let outcome = processor.process(&violation).await;
                (violation.license_number, outcome)
            });
            licenses.insert(handle.id(), license_number);
        }

        let mut report = BatchReport::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(processed))) => report.processed.push(processed),
                Ok((license_number, Err(error))) => {
                    report.failed.push(FailedViolation {
                        license_number,
                        error,
                    })
                }
                Err(e) => {
                    let license_number = licenses.remove(&e.id()).unwrap_or_default();
                    tracing::error!("Violation task for {} aborted: {}", license_number, e);
                    report.failed.push(FailedViolation {
                        license_number,
                        error: FineError::TaskError {
                            message: e.to_string(),
                        },
                    });
                }
            }
        }

        tracing::info!(
            "Finished batch: {} processed, {} failed",
            report.processed.len(),
            report.failed.len()
        );
        report
    }
}
