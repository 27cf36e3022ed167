// src/discover/mod.rs

//! Task discovery.
//!
//! This module is responsible for obtaining task definitions out of a
//! foreign task-automation source tree:
//!
//! - [`payload`] defines the JSON contract the discovery process prints on
//!   stdout (flat descriptor records, or a raw namespace snapshot).
//! - [`introspect`] walks a namespace snapshot, unwraps decorator layers and
//!   normalizes every task into a [`descriptor::TaskDescriptor`].
//! - [`runner`] owns the external process invocation, its timeout, and the
//!   translation of process failures into operator-visible errors.

pub mod descriptor;
pub mod introspect;
pub mod payload;
pub mod runner;

pub use descriptor::{ParameterSpec, TaskDescriptor};
pub use introspect::introspect;
pub use payload::{DiscoveryPayload, RawSchedule};
pub use runner::run_discovery;
