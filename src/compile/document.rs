// src/compile/document.rs

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::FabdeckError;
use crate::schedule::StructuredSchedule;

/// One job-definition document, in the server's YAML import shape.
///
/// Field order matches the serialized document: `name`, `schedule`,
/// `loglevel`, `description`, `group`, `sequence`, `options`. Optional
/// fields are omitted entirely rather than serialized as null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDocument {
    /// Job name; the server keys create-or-replace on (project, name).
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub schedule: Option<StructuredSchedule>,
    pub loglevel: String,
    /// Docstring, verbatim. Never a synthesized placeholder.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    /// Namespace path joined by `/`; absent for top-level tasks.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub group: Option<String>,
    pub sequence: Sequence,
    #[serde(skip_serializing_if = "IndexMap::is_empty", default)]
    pub options: IndexMap<String, JobOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
    pub keepgoing: bool,
    pub strategy: String,
    pub commands: Vec<CommandStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandStep {
    pub exec: String,
}

/// One entry of the options block: required when the parameter has no
/// default, otherwise carrying the string-coerced default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobOption {
    Required { required: bool },
    Value { value: String },
}

impl JobOption {
    pub fn required() -> JobOption {
        JobOption::Required { required: true }
    }

    pub fn value(value: impl Into<String>) -> JobOption {
        JobOption::Value {
            value: value.into(),
        }
    }
}

impl JobDocument {
    /// Serialize as the single-element YAML list the server's job import
    /// expects.
    pub fn to_yaml(&self) -> Result<String, FabdeckError> {
        Ok(serde_yaml::to_string(&[self])?)
    }
}
