// src/register/rundeck.rs

use serde::Deserialize;
use tracing::debug;

use crate::config::model::RundeckSection;
use crate::errors::FabdeckError;
use crate::register::JobServer;

/// Rundeck HTTP API client (token auth only).
///
/// Job upserts go through the jobs-import endpoint with
/// `dupeOption=update`, which gives create-or-replace semantics keyed by
/// (project, job name).
pub struct RundeckClient {
    client: reqwest::Client,
    base_url: String,
    api_version: u32,
    token: String,
}

#[derive(Debug, Deserialize)]
struct ImportResponse {
    #[serde(default)]
    succeeded: Vec<ImportedJob>,
    #[serde(default)]
    failed: Vec<ImportedJob>,
}

#[derive(Debug, Deserialize)]
struct ImportedJob {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JobListing {
    id: String,
}

impl RundeckClient {
    pub fn new(base_url: impl Into<String>, api_version: u32, token: impl Into<String>) -> Self {
        RundeckClient {
            client: reqwest::Client::new(),
            base_url: trim_trailing_slash(base_url.into()),
            api_version,
            token: token.into(),
        }
    }

    /// Build a client from the `[rundeck]` config section, resolving the
    /// API token (inline value or environment variable).
    pub fn from_config(section: &RundeckSection) -> Result<Self, FabdeckError> {
        let token = section.resolve_token()?;
        Ok(Self::new(section.url.clone(), section.api_version, token))
    }

    fn api_url(&self, rest: &str) -> String {
        format!("{}/api/{}/{}", self.base_url, self.api_version, rest)
    }

    fn registration_error(name: &str, reason: impl Into<String>) -> FabdeckError {
        FabdeckError::Registration {
            job: name.to_string(),
            reason: reason.into(),
        }
    }
}

fn trim_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

impl JobServer for RundeckClient {
    async fn upsert_job(
        &self,
        project: &str,
        name: &str,
        document_yaml: &str,
    ) -> Result<String, FabdeckError> {
        let url = self.api_url(&format!("project/{project}/jobs/import"));
        debug!(%url, job = %name, "importing job definition");

        let response = self
            .client
            .post(&url)
            .query(&[("format", "yaml"), ("dupeOption", "update")])
            .header("X-Rundeck-Auth-Token", &self.token)
            .header("Accept", "application/json")
            .header("Content-Type", "application/yaml")
            .body(document_yaml.to_string())
            .send()
            .await
            .map_err(|e| Self::registration_error(name, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::registration_error(
                name,
                format!("server returned {status}: {body}"),
            ));
        }

        let parsed: ImportResponse = response
            .json()
            .await
            .map_err(|e| Self::registration_error(name, format!("bad import response: {e}")))?;

        if let Some(failure) = parsed.failed.first() {
            let reason = failure
                .error
                .clone()
                .unwrap_or_else(|| "import rejected".to_string());
            return Err(Self::registration_error(name, reason));
        }

        parsed
            .succeeded
            .into_iter()
            .find_map(|job| job.id)
            .ok_or_else(|| Self::registration_error(name, "import response carried no job id"))
    }

    async fn fetch_job(
        &self,
        project: &str,
        name: &str,
    ) -> Result<Option<String>, FabdeckError> {
        let url = self.api_url(&format!("project/{project}/jobs"));
        let listing: Vec<JobListing> = self
            .client
            .get(&url)
            .query(&[("jobExactFilter", name)])
            .header("X-Rundeck-Auth-Token", &self.token)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| Self::registration_error(name, e.to_string()))?
            .json()
            .await
            .map_err(|e| Self::registration_error(name, format!("bad job listing: {e}")))?;

        let Some(job) = listing.first() else {
            return Ok(None);
        };

        let url = self.api_url(&format!("job/{}", job.id));
        let body = self
            .client
            .get(&url)
            .query(&[("format", "yaml")])
            .header("X-Rundeck-Auth-Token", &self.token)
            .header("Accept", "application/yaml")
            .send()
            .await
            .map_err(|e| Self::registration_error(name, e.to_string()))?
            .text()
            .await
            .map_err(|e| Self::registration_error(name, e.to_string()))?;

        Ok(Some(body))
    }
}
