//! Upload of the finished routes as a Mapbox dataset.
//!
//! The pipeline only knows about [`FeatureExporter`]; the network client lives
//! here so everything else can be tested offline.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{config::MapboxCredentials, geojson::Feature};

pub const MAPBOX_API_URL: &str = "https://api.mapbox.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub dataset_id: String,
    pub uploaded: usize,
    /// feature id and error message, nothing here is retried
    pub failed: Vec<(String, String)>,
}

pub trait FeatureExporter {
    fn export(&self, name: &str, features: &[Feature]) -> Result<ExportReport>;
}

#[derive(Debug, Serialize)]
struct CreateDatasetRequest<'a> {
    name: &'a str,
    description: String,
}

#[derive(Debug, Deserialize)]
struct DatasetResponse {
    id: String,
}

// reqwest errors print the request url, and ours carries the access token
fn without_token(e: reqwest::Error) -> anyhow::Error {
    anyhow::Error::new(e.without_url())
}

pub struct MapboxExporter {
    client: Client,
    credentials: MapboxCredentials,
    base_url: String,
}

impl MapboxExporter {
    pub fn new(credentials: MapboxCredentials) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to create HTTP client")?;
        Ok(MapboxExporter {
            client,
            credentials,
            base_url: MAPBOX_API_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn datasets_url(&self) -> String {
        format!("{}/datasets/v1/{}", self.base_url, self.credentials.username)
    }

    pub fn feature_url(&self, dataset_id: &str, feature_id: &str) -> String {
        format!("{}/{}/features/{}", self.datasets_url(), dataset_id, feature_id)
    }

    async fn create_dataset(&self, name: &str) -> Result<String> {
        let request = CreateDatasetRequest {
            name,
            description: format!(
                "Google location history exported motorcycle routes for {}",
                self.credentials.username
            ),
        };
        let response = self
            .client
            .post(self.datasets_url())
            .query(&[("access_token", &self.credentials.token)])
            .json(&request)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(without_token)?;
        let dataset: DatasetResponse = response.json().await.map_err(without_token)?;
        Ok(dataset.id)
    }

    async fn upload_feature(&self, dataset_id: &str, feature: &Feature) -> Result<()> {
        self.client
            .put(self.feature_url(dataset_id, &feature.id))
            .query(&[("access_token", &self.credentials.token)])
            .json(feature)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(without_token)?;
        Ok(())
    }

    async fn export_async(&self, name: &str, features: &[Feature]) -> Result<ExportReport> {
        let dataset_id = self
            .create_dataset(name)
            .await
            .context("failed to create Mapbox dataset")?;
        info!("Created Mapbox dataset {dataset_id}");

        let mut report = ExportReport {
            dataset_id,
            ..Default::default()
        };
        for feature in features {
            match self.upload_feature(&report.dataset_id, feature).await {
                Ok(()) => report.uploaded += 1,
                Err(e) => {
                    error!("Failed to upload feature {}: {e}", feature.id);
                    report.failed.push((feature.id.clone(), e.to_string()));
                }
            }
        }
        info!(
            "Uploaded {} of {} features to dataset {}",
            report.uploaded,
            features.len(),
            report.dataset_id
        );
        Ok(report)
    }
}

impl FeatureExporter for MapboxExporter {
    fn export(&self, name: &str, features: &[Feature]) -> Result<ExportReport> {
        let runtime = tokio::runtime::Runtime::new().context("failed to start runtime")?;
        runtime.block_on(self.export_async(name, features))
    }
}
