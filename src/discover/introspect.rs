// src/discover/introspect.rs

//! Normalization of discovery payloads into [`TaskDescriptor`]s.
//!
//! Flat payloads are already normalized and map across directly. Namespace
//! snapshots carry raw decorator metadata, so each leaf callable has to be
//! resolved to its canonical form first:
//!
//! 1. follow the `wrapped` back-reference chain until none remains
//!    (undoing stacked decorators);
//! 2. if the innermost callable is a generic wrapper (recognized by its
//!    code object name), recover the original from its captured enclosing
//!    variables, preferring `func` over `fn`.

use indexmap::IndexMap;

use crate::discover::descriptor::{ParameterSpec, TaskDescriptor};
use crate::discover::payload::{
    CallableRecord, DiscoveryPayload, NamespaceNode, RawSchedule, TaskRecord,
};
use crate::errors::FabdeckError;

/// Code-object name used by generic decorator factories; the original
/// function lives in the wrapper's closure.
const GENERIC_WRAPPER_CODE_NAME: &str = "inner_decorator";

/// Normalize a discovery payload into task descriptors.
///
/// Per-task failures (uninspectable signatures) surface as `Err` entries so
/// the caller can decide whether to skip or abort; order follows the
/// payload.
pub fn introspect(payload: &DiscoveryPayload) -> Vec<Result<TaskDescriptor, FabdeckError>> {
    match payload {
        DiscoveryPayload::Tasks(records) => {
            records.iter().map(|r| Ok(descriptor_from_record(r))).collect()
        }
        DiscoveryPayload::Snapshot(root) => {
            let mut out = Vec::new();
            walk(root, &mut Vec::new(), &mut out);
            out
        }
    }
}

fn descriptor_from_record(record: &TaskRecord) -> TaskDescriptor {
    TaskDescriptor {
        name: record.name.clone(),
        path: record.path.clone(),
        doc: record.doc.clone(),
        params: ParameterSpec::from_argspec(&record.argspec),
        schedule: normalize_schedule(record.schedule.clone()),
    }
}

/// Collapse the unscheduled sentinel so descriptors carry `None` for every
/// flavor of "no schedule".
fn normalize_schedule(schedule: Option<RawSchedule>) -> Option<RawSchedule> {
    match schedule {
        Some(RawSchedule::Unscheduled) | None => None,
        other => other,
    }
}

fn walk(
    namespace: &IndexMap<String, NamespaceNode>,
    path: &mut Vec<String>,
    out: &mut Vec<Result<TaskDescriptor, FabdeckError>>,
) {
    for (key, node) in namespace {
        match node {
            NamespaceNode::Namespace(children) => {
                path.push(key.clone());
                walk(children, path, out);
                path.pop();
            }
            NamespaceNode::Task(record) => {
                out.push(descriptor_from_callable(key, path, record));
            }
        }
    }
}

fn descriptor_from_callable(
    key: &str,
    path: &[String],
    record: &CallableRecord,
) -> Result<TaskDescriptor, FabdeckError> {
    let resolved = resolve(record);

    let name = resolved
        .name
        .clone()
        .unwrap_or_else(|| key.to_string());

    let argspec = resolved
        .argspec
        .as_ref()
        .ok_or_else(|| FabdeckError::UninspectableTask {
            task: name.clone(),
            reason: "signature could not be introspected".to_string(),
        })?;

    Ok(TaskDescriptor {
        name,
        path: path.to_vec(),
        doc: resolved.doc.clone(),
        params: ParameterSpec::from_argspec(argspec),
        schedule: normalize_schedule(resolved.schedule.clone()),
    })
}

/// Resolve a raw callable record to the canonical underlying callable.
fn resolve(record: &CallableRecord) -> &CallableRecord {
    let mut current = record;
    while let Some(inner) = &current.wrapped {
        current = inner;
    }
    if current.code_name == GENERIC_WRAPPER_CODE_NAME {
        if let Some(original) = current
            .closure
            .get("func")
            .or_else(|| current.closure.get("fn"))
        {
            return original;
        }
    }
    current
}
