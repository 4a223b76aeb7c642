/*
 * job/mod.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Render job pipeline: stages, context, supervision.
 */

//! Render job pipeline.
//!
//! The job machinery has four pieces:
//!
//! - [`JobStage`] implementations under [`stages`] - the five standard
//!   transformation steps
//! - [`JobPipeline`] - a validated stage sequence with cancellation
//!   polls and progress reporting at every boundary
//! - [`JobContext`] - the owned per-job activation frame
//! - [`JobSupervisor`] - the only component that converts errors into
//!   job status transitions

pub mod cancellation;
pub mod context;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod stages;
pub mod supervisor;
pub mod traits;

pub use cancellation::Cancellation;
pub use context::JobContext;
pub use data::{JobData, JobDataKind, RenderRequest};
pub use error::{JobError, PipelineValidationError};
pub use pipeline::JobPipeline;
pub use progress::{NoopSink, ProgressSink, TracingSink};
pub use supervisor::JobSupervisor;
pub use traits::{JobStage, ProgressSpan};
