/*
 * job/traits.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * JobStage trait definition.
 */

//! Job stage trait.
//!
//! [`JobStage`] is the interface every pipeline stage implements.
//! Stages transform [`JobData`] from one form to another and declare
//! their input/output kinds, enabling runtime validation of pipeline
//! composition, plus the slice of the progress scale they span.
//!
//! Stages hold configuration but no mutable state between runs - all
//! mutable state lives in [`JobContext`]. Conditional behavior
//! (primary vs fallback rendering) lives inside the stage that owns
//! it, not in pipeline construction.

use async_trait::async_trait;

use super::context::JobContext;
use super::data::{JobData, JobDataKind};
use super::error::JobError;

/// The slice of the job's progress scale one stage covers.
///
/// `on_start` is reported when the stage begins, `on_complete` when it
/// finishes. Adjacent stages share boundary values; the context
/// suppresses non-increasing reports so each boundary is observed
/// exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSpan {
    pub on_start: u8,
    pub on_complete: u8,
}

/// A single stage in the render job pipeline.
///
/// # Thread Safety
///
/// Stages must be `Send + Sync`: multiple jobs run concurrently, each
/// holding the shared stage list.
///
/// # Cancellation
///
/// The pipeline polls the job's cancellation token before each stage;
/// stages themselves run to completion once started.
#[async_trait]
pub trait JobStage: Send + Sync {
    /// Human-readable name for logging and error messages.
    fn name(&self) -> &str;

    /// What input type this stage expects.
    fn input_kind(&self) -> JobDataKind;

    /// What output type this stage produces.
    fn output_kind(&self) -> JobDataKind;

    /// The progress slice this stage spans.
    fn progress(&self) -> ProgressSpan;

    /// Run the stage.
    ///
    /// Non-fatal issues go to `ctx` as job warnings; an `Err` return
    /// fails the whole job.
    async fn run(&self, input: JobData, ctx: &mut JobContext) -> Result<JobData, JobError>;
}
