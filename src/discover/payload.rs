// src/discover/payload.rs

//! JSON contract for the discovery process stdout.
//!
//! Two schemas are accepted behind the same contract:
//!
//! - a JSON array of flat task records (`name`, `path`, `doc`, `schedule?`,
//!   `argspec`) — the shape a companion helper emits after normalizing
//!   tasks on its side;
//! - a JSON object holding the raw namespace snapshot dumped by the inline
//!   introspection script: a nested mapping of name → subtree or callable
//!   record, with decorator metadata left intact for [`crate::discover::introspect`]
//!   to resolve.
//!
//! `schedule` may be a raw cron string or an already-structured block
//! (forward-compatible schema), and may be absent entirely. An empty object
//! is accepted as "unscheduled" for compatibility with parser scripts that
//! always emit the key.

use indexmap::IndexMap;
use serde::de;
use serde::{Deserialize, Deserializer};

use crate::schedule::StructuredSchedule;

/// Everything a discovery process may print on stdout.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DiscoveryPayload {
    /// Flat, pre-normalized task records.
    Tasks(Vec<TaskRecord>),
    /// Raw namespace snapshot (top-level mapping of the task-automation
    /// file). Entry order is preserved so discovery order is deterministic.
    Snapshot(IndexMap<String, NamespaceNode>),
}

/// One pre-normalized task record from a flat payload.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskRecord {
    pub name: String,
    #[serde(default)]
    pub path: Vec<String>,
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(default)]
    pub schedule: Option<RawSchedule>,
    pub argspec: ArgSpec,
}

/// A schedule value as found on a task: a cron string to translate, a block
/// that is already in the job server's structured shape, or the empty-object
/// sentinel legacy parser scripts emit for unscheduled tasks.
#[derive(Debug, Clone)]
pub enum RawSchedule {
    Cron(String),
    Structured(StructuredSchedule),
    Unscheduled,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScheduleRepr {
    Cron(String),
    Structured(StructuredSchedule),
    Object(serde_json::Map<String, serde_json::Value>),
}

impl<'de> Deserialize<'de> for RawSchedule {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = RawScheduleRepr::deserialize(d)?;
        Ok(match raw {
            RawScheduleRepr::Cron(s) => RawSchedule::Cron(s),
            RawScheduleRepr::Structured(s) => RawSchedule::Structured(s),
            RawScheduleRepr::Object(map) if map.is_empty() => RawSchedule::Unscheduled,
            RawScheduleRepr::Object(_) => {
                return Err(de::Error::custom(
                    "schedule object is neither empty nor a structured schedule",
                ));
            }
        })
    }
}

/// Declared-signature record, mirroring the introspection output of the
/// task-automation runtime: positional names in declaration order, optional
/// variadic/keyword catch-all names, and a defaults list that right-aligns
/// onto the trailing args.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArgSpec {
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub varargs: Option<String>,
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default)]
    pub defaults: Option<Vec<serde_json::Value>>,
}

/// One node of the namespace snapshot: a nested namespace or a leaf task.
///
/// Callable records are tried first; they always carry `code_name`, which a
/// plain namespace mapping never does.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NamespaceNode {
    Task(CallableRecord),
    Namespace(IndexMap<String, NamespaceNode>),
}

/// Raw dump of one callable, decorator metadata included.
///
/// `wrapped` is the decorator back-reference chain; `closure` maps captured
/// enclosing variables to the callables they hold (only populated for
/// generic wrapper functions). `argspec` is absent when the runtime could
/// not introspect the signature (native callables).
#[derive(Debug, Clone, Deserialize)]
pub struct CallableRecord {
    pub code_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(default)]
    pub schedule: Option<RawSchedule>,
    #[serde(default)]
    pub argspec: Option<ArgSpec>,
    #[serde(default)]
    pub wrapped: Option<Box<CallableRecord>>,
    #[serde(default)]
    pub closure: IndexMap<String, CallableRecord>,
}
