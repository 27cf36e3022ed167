use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use fabdeck::compile::{CompileContext, JobDocument};
use fabdeck::discover::introspect;
use fabdeck::discover::payload::DiscoveryPayload;
use fabdeck::errors::FabdeckError;
use fabdeck::register::{JobServer, Registrar, RegistrationReport};

/// In-memory job server: create-or-replace keyed by (project, name), with a
/// stable id per key and an optional set of names that always fail.
#[derive(Default)]
struct InMemoryJobServer {
    state: Mutex<ServerState>,
    failing: HashSet<String>,
}

#[derive(Default)]
struct ServerState {
    jobs: HashMap<(String, String), (String, String)>,
    submissions: Vec<String>,
    next_id: usize,
}

impl InMemoryJobServer {
    fn failing(names: &[&str]) -> Self {
        InMemoryJobServer {
            failing: names.iter().map(|s| s.to_string()).collect(),
            ..InMemoryJobServer::default()
        }
    }

    fn job_count(&self) -> usize {
        self.state.lock().unwrap().jobs.len()
    }

    fn submissions(&self) -> Vec<String> {
        self.state.lock().unwrap().submissions.clone()
    }

    fn id_of(&self, project: &str, name: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .jobs
            .get(&(project.to_string(), name.to_string()))
            .map(|(id, _)| id.clone())
    }
}

impl JobServer for InMemoryJobServer {
    async fn upsert_job(
        &self,
        project: &str,
        name: &str,
        document_yaml: &str,
    ) -> Result<String, FabdeckError> {
        if self.failing.contains(name) {
            return Err(FabdeckError::Registration {
                job: name.to_string(),
                reason: "simulated server rejection".to_string(),
            });
        }

        let mut state = self.state.lock().unwrap();
        state.submissions.push(name.to_string());
        let key = (project.to_string(), name.to_string());
        let id = match state.jobs.get(&key) {
            Some((existing, _)) => existing.clone(),
            None => {
                state.next_id += 1;
                format!("job-{}", state.next_id)
            }
        };
        state.jobs.insert(key, (id.clone(), document_yaml.to_string()));
        Ok(id)
    }

    async fn fetch_job(
        &self,
        project: &str,
        name: &str,
    ) -> Result<Option<String>, FabdeckError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .jobs
            .get(&(project.to_string(), name.to_string()))
            .map(|(_, yaml)| yaml.clone()))
    }
}

fn compile_fixture() -> Vec<JobDocument> {
    // Snapshot shaped like a realistic task-automation file: a decorated
    // scheduled task, a documented task with one argument, and a wrapped
    // task with a defaulted argument and a monthly schedule.
    let payload: DiscoveryPayload = serde_json::from_str(
        r#"{
            "one": {
                "code_name": "wrapper",
                "name": "wrapper",
                "wrapped": {
                    "code_name": "one",
                    "name": "one",
                    "doc": "Task one.",
                    "schedule": "30 * * * *",
                    "argspec": {"args": []}
                }
            },
            "two": {
                "code_name": "two",
                "name": "two",
                "doc": "Task\n    two.",
                "argspec": {"args": ["arg1"]}
            },
            "three": {
                "code_name": "three",
                "name": "three",
                "doc": "Take three.",
                "schedule": "@monthly",
                "argspec": {"args": ["c", "d"], "defaults": [1]}
            }
        }"#,
    )
    .expect("valid payload");

    let ctx = CompileContext::new("/srv/fabric", "/srv/fabricenv/bin/fab");
    introspect(&payload)
        .into_iter()
        .map(|d| ctx.compile(&d.expect("introspectable")).expect("compilable"))
        .collect()
}

#[tokio::test]
async fn registering_twice_is_idempotent() {
    let server = InMemoryJobServer::default();
    let documents = compile_fixture();
    let registrar = Registrar::new(&server, "fabric");

    let first = registrar.register_all(&documents).await;
    assert_eq!(first, RegistrationReport { registered: 3, failed: 0 });
    let id_before = server.id_of("fabric", "one").expect("registered");

    let second = registrar.register_all(&documents).await;
    assert_eq!(second.registered, 3);
    assert_eq!(server.job_count(), 3, "re-runs must not duplicate jobs");
    assert_eq!(server.id_of("fabric", "one").as_ref(), Some(&id_before));
}

#[tokio::test]
async fn per_document_failure_does_not_abort_the_batch() {
    let server = InMemoryJobServer::failing(&["two"]);
    let documents = compile_fixture();
    let registrar = Registrar::new(&server, "fabric");

    let report = registrar.register_all(&documents).await;

    assert_eq!(report, RegistrationReport { registered: 2, failed: 1 });
    assert!(server.id_of("fabric", "one").is_some());
    assert!(server.id_of("fabric", "two").is_none());
    assert!(server.id_of("fabric", "three").is_some());
}

#[tokio::test]
async fn submission_order_follows_discovery_order() {
    let server = InMemoryJobServer::default();
    let documents = compile_fixture();

    Registrar::new(&server, "fabric").register_all(&documents).await;

    assert_eq!(server.submissions(), ["one", "two", "three"]);
}

#[tokio::test]
async fn stored_documents_carry_the_expected_yaml() {
    let server = InMemoryJobServer::default();
    let documents = compile_fixture();

    Registrar::new(&server, "fabric").register_all(&documents).await;

    let one = server
        .fetch_job("fabric", "one")
        .await
        .expect("fetch ok")
        .expect("stored");
    assert!(one.contains("minute: '30'"), "got yaml:\n{one}");
    assert!(one.contains("description: Task one."));

    let two = server
        .fetch_job("fabric", "two")
        .await
        .expect("fetch ok")
        .expect("stored");
    let parsed: Vec<JobDocument> = serde_yaml::from_str(&two).expect("parses back");
    assert_eq!(parsed[0].description.as_deref(), Some("Task\n    two."));
    assert!(two.contains("required: true"));

    let three = server
        .fetch_job("fabric", "three")
        .await
        .expect("fetch ok")
        .expect("stored");
    assert!(three.contains("day: '1'"), "got yaml:\n{three}");
    assert!(!three.contains("weekday"), "monthly schedule keeps only dayofmonth");
    assert!(three.contains("value: '1'"));
}
