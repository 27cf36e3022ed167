// src/register/mod.rs

//! Job registration.
//!
//! [`JobServer`] is the seam to the external orchestration server:
//! create-or-replace keyed by (project, job name), so re-running discovery
//! is idempotent. [`rundeck`] implements it over the Rundeck HTTP API;
//! tests substitute an in-memory implementation.

pub mod rundeck;

use std::future::Future;

use tracing::{error, info};

use crate::compile::document::JobDocument;
use crate::errors::FabdeckError;

pub use rundeck::RundeckClient;

/// The job-server API the registrar consumes.
pub trait JobServer {
    /// Create the job if absent, replace it if present. Returns the job id.
    fn upsert_job(
        &self,
        project: &str,
        name: &str,
        document_yaml: &str,
    ) -> impl Future<Output = Result<String, FabdeckError>> + Send;

    /// Fetch a stored job document, if any. Used for verification.
    fn fetch_job(
        &self,
        project: &str,
        name: &str,
    ) -> impl Future<Output = Result<Option<String>, FabdeckError>> + Send;
}

/// Outcome counts for one registration batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistrationReport {
    pub registered: usize,
    pub failed: usize,
}

/// Submit compiled documents against one project.
pub struct Registrar<'a, S: JobServer> {
    server: &'a S,
    project: &'a str,
}

impl<'a, S: JobServer> Registrar<'a, S> {
    pub fn new(server: &'a S, project: &'a str) -> Registrar<'a, S> {
        Registrar { server, project }
    }

    /// Register every document, in discovery order.
    ///
    /// Per-document failures are logged and counted; they never abort the
    /// rest of the batch.
    pub async fn register_all(&self, documents: &[JobDocument]) -> RegistrationReport {
        let mut report = RegistrationReport::default();

        for document in documents {
            match self.register_one(document).await {
                Ok(id) => {
                    info!(job = %document.name, id = %id, "job registered");
                    report.registered += 1;
                }
                Err(err) => {
                    error!(job = %document.name, error = %err, "job registration failed");
                    report.failed += 1;
                }
            }
        }

        report
    }

    async fn register_one(&self, document: &JobDocument) -> Result<String, FabdeckError> {
        let yaml = document.to_yaml()?;
        self.server
            .upsert_job(self.project, &document.name, &yaml)
            .await
    }
}
