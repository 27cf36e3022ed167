// src/compile/mod.rs

//! Job document compilation.
//!
//! Maps one normalized task descriptor into the complete job-definition
//! document the job server stores:
//!
//! - [`document`] defines the serializable document shape (field order is
//!   significant to the server's YAML import).
//! - [`compiler`] builds documents: invocation command line, options block
//!   and schedule translation.

pub mod compiler;
pub mod document;

pub use compiler::CompileContext;
pub use document::{CommandStep, JobDocument, JobOption, Sequence};
