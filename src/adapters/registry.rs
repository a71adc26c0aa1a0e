use crate::core::{VehicleInfo, VehicleRegistry};
use crate::utils::error::{FineError, Result};
use async_trait::async_trait;
use reqwest::Client;
use url::Url;

/// Vehicle registry reached over HTTP: `GET {endpoint}/vehicleinfo/{license number}`.
#[derive(Debug, Clone)]
pub struct HttpVehicleRegistry {
    client: Client,
    endpoint: Url,
}

impl HttpVehicleRegistry {
    pub fn new(client: Client, endpoint: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| FineError::InvalidConfigValueError {
            field: "registry.endpoint".to_string(),
            value: endpoint.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;
        if endpoint.cannot_be_a_base() {
            return Err(FineError::InvalidConfigValueError {
                field: "registry.endpoint".to_string(),
                value: endpoint.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }
        Ok(Self { client, endpoint })
    }

    fn vehicle_url(&self, license_number: &str) -> Url {
        let mut url = self.endpoint.clone();
        // Checked in `new`.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("vehicleinfo").push(license_number);
        }
        url
    }

    fn failure(license_number: &str, reason: impl ToString) -> FineError {
        FineError::Enrichment {
            license_number: license_number.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl VehicleRegistry for HttpVehicleRegistry {
    async fn get_vehicle_info(&self, license_number: &str) -> Result<VehicleInfo> {
        let url = self.vehicle_url(license_number);
        tracing::debug!("Requesting vehicle info from: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Self::failure(license_number, e))?;

        let status = response.status();
        tracing::debug!("Registry response status: {}", status);
        if !status.is_success() {
            return Err(Self::failure(license_number, format!("registry answered {}", status)));
        }

        response
            .json::<VehicleInfo>()
            .await
            .map_err(|e| Self::failure(license_number, format!("unreadable registry response: {}", e)))
    }
}
