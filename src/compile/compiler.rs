// src/compile/compiler.rs

use std::path::PathBuf;

use indexmap::IndexMap;

use crate::compile::document::{CommandStep, JobDocument, JobOption, Sequence};
use crate::discover::descriptor::TaskDescriptor;
use crate::discover::payload::RawSchedule;
use crate::errors::FabdeckError;
use crate::schedule;

/// Project-relative paths needed to build an absolute invocation command.
#[derive(Debug, Clone)]
pub struct CompileContext {
    /// Checked-out task-automation source tree.
    pub fabric_path: PathBuf,
    /// Task runner binary inside the interpreter environment.
    pub fab_bin: PathBuf,
}

impl CompileContext {
    pub fn new(fabric_path: impl Into<PathBuf>, fab_bin: impl Into<PathBuf>) -> CompileContext {
        CompileContext {
            fabric_path: fabric_path.into(),
            fab_bin: fab_bin.into(),
        }
    }

    /// Compile one task descriptor into a job document.
    ///
    /// The only failure mode is an unparseable attached cron schedule,
    /// which propagates so the caller can skip that task without touching
    /// the rest of the batch.
    pub fn compile(&self, task: &TaskDescriptor) -> Result<JobDocument, FabdeckError> {
        let schedule = match &task.schedule {
            None | Some(RawSchedule::Unscheduled) => None,
            Some(RawSchedule::Structured(s)) => Some(s.clone()),
            Some(RawSchedule::Cron(raw)) => schedule::translate(raw)?,
        };

        let group = if task.path.is_empty() {
            None
        } else {
            Some(task.path.join("/"))
        };

        Ok(JobDocument {
            name: task.name.clone(),
            schedule,
            loglevel: "INFO".to_string(),
            description: task.doc.clone(),
            group,
            sequence: Sequence {
                keepgoing: false,
                strategy: "node-first".to_string(),
                commands: vec![CommandStep {
                    exec: self.exec_command(task),
                }],
            },
            options: self.options(task),
        })
    }

    /// Build the execution command line:
    /// `cd <tree> && <fab> <dotted>[:a=${option.a},b=${option.b}]`.
    ///
    /// The `${option.*}` tokens are the job server's own templating syntax
    /// and are passed through verbatim.
    fn exec_command(&self, task: &TaskDescriptor) -> String {
        let mut cmd = format!(
            "cd {} && {} {}",
            self.fabric_path.display(),
            self.fab_bin.display(),
            task.dotted_name()
        );
        if !task.params.is_empty() {
            let substitutions: Vec<String> = task
                .params
                .args()
                .iter()
                .map(|arg| format!("{arg}=${{option.{arg}}}"))
                .collect();
            cmd.push(':');
            cmd.push_str(&substitutions.join(","));
        }
        cmd
    }

    /// Options block, keyed in declared parameter order.
    fn options(&self, task: &TaskDescriptor) -> IndexMap<String, JobOption> {
        let mut options = IndexMap::new();
        for arg in task.params.args() {
            let option = match task.params.default_for(arg) {
                Some(value) => JobOption::value(value),
                None => JobOption::required(),
            };
            options.insert(arg.clone(), option);
        }
        options
    }
}
