use crate::core::{EmailMetadata, NotificationDispatcher, NotificationMessage};
use crate::utils::error::{FineError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

pub const DEFAULT_OPERATION: &str = "create";

#[derive(Debug, Serialize)]
struct BindingRequest<'a> {
    operation: &'a str,
    data: &'a str,
    metadata: &'a EmailMetadata,
}

/// Sends notifications through an HTTP output binding (for instance a `sendmail` SMTP binding).
///
/// The binding's answer is the acknowledgement: any 2xx status means the
/// message was accepted, anything else is a dispatch failure.
#[derive(Debug, Clone)]
pub struct HttpBindingDispatcher {
    client: Client,
    endpoint: String,
    operation: String,
}

impl HttpBindingDispatcher {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self::with_operation(client, endpoint, DEFAULT_OPERATION)
    }

    pub fn with_operation(
        client: Client,
        endpoint: impl Into<String>,
        operation: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            operation: operation.into(),
        }
    }
}

#[async_trait]
impl NotificationDispatcher for HttpBindingDispatcher {
    async fn send(&self, message: &NotificationMessage) -> Result<()> {
        let recipient = &message.metadata.email_to;
        let request = BindingRequest {
            operation: &self.operation,
            data: &message.body,
            metadata: &message.metadata,
        };

        tracing::debug!("Invoking output binding at: {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| FineError::Dispatch {
                recipient: recipient.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        tracing::debug!("Binding response status: {}", status);
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(FineError::Dispatch {
                recipient: recipient.clone(),
                reason: if detail.is_empty() {
                    format!("binding answered {}", status)
                } else {
                    format!("binding answered {}: {}", status, detail)
                },
            });
        }

        Ok(())
    }
}
