// src/discover/descriptor.rs

use crate::discover::payload::{ArgSpec, RawSchedule};

/// Normalized parameter signature of one task.
///
/// Invariant: the defaulted subset is always a contiguous suffix of `args`
/// (defaults right-align onto the trailing parameters).
#[derive(Debug, Clone)]
pub struct ParameterSpec {
    args: Vec<String>,
    defaults: Vec<serde_json::Value>,
    pub varargs: bool,
    pub keywords: bool,
}

impl ParameterSpec {
    pub fn from_argspec(spec: &ArgSpec) -> ParameterSpec {
        ParameterSpec {
            args: spec.args.clone(),
            defaults: spec.defaults.clone().unwrap_or_default(),
            varargs: spec.varargs.is_some(),
            keywords: spec.keywords.is_some(),
        }
    }

    /// Declared parameter names, in declaration order.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// The default value for `name`, coerced to its plain string form, or
    /// `None` when the parameter is required.
    pub fn default_for(&self, name: &str) -> Option<String> {
        let idx = self.args.iter().position(|a| a == name)?;
        let first_defaulted = self.args.len().checked_sub(self.defaults.len())?;
        if idx < first_defaulted {
            return None;
        }
        Some(coerce_default(&self.defaults[idx - first_defaulted]))
    }
}

/// String-coerce a default value the way the job document expects: scalars
/// become their bare textual form, null becomes the empty string.
fn coerce_default(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// One discovered task, normalized and ready for document compilation.
#[derive(Debug, Clone)]
pub struct TaskDescriptor {
    pub name: String,
    /// Namespace segments traversed to reach the task; empty for top-level.
    pub path: Vec<String>,
    /// Docstring, verbatim (embedded newlines and indentation included).
    pub doc: Option<String>,
    pub params: ParameterSpec,
    pub schedule: Option<RawSchedule>,
}

impl TaskDescriptor {
    /// Fully-qualified invocation name: namespace segments and the task
    /// name joined by `.` (e.g. `deploy.web.restart`).
    pub fn dotted_name(&self) -> String {
        let mut segments = self.path.clone();
        segments.push(self.name.clone());
        segments.join(".")
    }
}
