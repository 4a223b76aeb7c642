/*
 * job/pipeline.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * JobPipeline: validated stage sequences.
 */

//! Pipeline execution.
//!
//! A [`JobPipeline`] holds the stages of one render job and runs them
//! in order. Stage chains are checked once, at construction: every
//! stage must consume exactly the kind its predecessor produces, so a
//! miswired pipeline is rejected before any job touches it and `run`
//! never has to re-verify the chain.
//!
//! Execution polls the cancellation token between stages and reports
//! each stage's progress span through the context. Since the poll sits
//! on the boundary, a cancellation requested at or before a boundary
//! fails the job right there, while one arriving after the final stage
//! started no longer interrupts it.

use super::context::JobContext;
use super::data::{JobData, JobDataKind};
use super::error::{JobError, PipelineValidationError};
use super::traits::JobStage;

/// The stages of one render job, checked to compose.
///
/// Holds only the stage list; the pipeline's input and output kinds
/// are those of its first and last stage, which construction
/// guarantees exist.
pub struct JobPipeline {
    stages: Vec<Box<dyn JobStage>>,
}

impl JobPipeline {
    /// Check a stage chain and wrap it into a pipeline.
    ///
    /// Walks the chain with a cursor over the produced kind: each
    /// stage must accept what the stage before it emits. An empty
    /// chain or a kind break anywhere in it is a
    /// [`PipelineValidationError`].
    pub fn new(stages: Vec<Box<dyn JobStage>>) -> Result<Self, PipelineValidationError> {
        let mut iter = stages.iter();
        let Some(first) = iter.next() else {
            return Err(PipelineValidationError::Empty);
        };

        let mut upstream = first;
        for stage in iter {
            if upstream.output_kind() != stage.input_kind() {
                return Err(PipelineValidationError::TypeMismatch {
                    stage_a: upstream.name().to_string(),
                    stage_b: stage.name().to_string(),
                    output: upstream.output_kind(),
                    input: stage.input_kind(),
                });
            }
            upstream = stage;
        }

        Ok(Self { stages })
    }

    /// The kind the first stage consumes.
    pub fn expected_input(&self) -> JobDataKind {
        self.stages[0].input_kind()
    }

    /// The kind the last stage produces.
    pub fn expected_output(&self) -> JobDataKind {
        self.stages[self.stages.len() - 1].output_kind()
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run the job's stages in order.
    ///
    /// Rejects input of the wrong kind, then feeds each stage's output
    /// into the next. The cancellation token is polled before every
    /// stage; a fired token surfaces as `Err(JobError::Cancelled)` at
    /// that boundary.
    pub async fn run(&self, input: JobData, ctx: &mut JobContext) -> Result<JobData, JobError> {
        if input.kind() != self.expected_input() {
            return Err(JobError::unexpected_input(
                "pipeline",
                self.expected_input(),
                input.kind(),
            ));
        }

        let mut data = input;

        for stage in &self.stages {
            if ctx.is_cancelled() {
                return Err(JobError::Cancelled);
            }

            let span = stage.progress();
            ctx.advance_progress(stage.name(), span.on_start).await?;

            tracing::debug!(stage = stage.name(), job = %ctx.job.id, "Running stage");
            data = stage.run(data, ctx).await?;

            ctx.advance_progress(stage.name(), span.on_complete).await?;
        }

        Ok(data)
    }
}

impl std::fmt::Debug for JobPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JobPipeline({})", self.stage_names().join(" -> "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::job::traits::ProgressSpan;

    struct TestStage {
        name: &'static str,
        input: JobDataKind,
        output: JobDataKind,
    }

    #[async_trait]
    impl JobStage for TestStage {
        fn name(&self) -> &str {
            self.name
        }

        fn input_kind(&self) -> JobDataKind {
            self.input
        }

        fn output_kind(&self) -> JobDataKind {
            self.output
        }

        fn progress(&self) -> ProgressSpan {
            ProgressSpan {
                on_start: 10,
                on_complete: 25,
            }
        }

        async fn run(&self, input: JobData, _ctx: &mut JobContext) -> Result<JobData, JobError> {
            Ok(input)
        }
    }

    #[test]
    fn test_empty_pipeline_rejected() {
        let stages: Vec<Box<dyn JobStage>> = vec![];
        assert!(matches!(
            JobPipeline::new(stages),
            Err(PipelineValidationError::Empty)
        ));
    }

    #[test]
    fn test_valid_composition() {
        let stages: Vec<Box<dyn JobStage>> = vec![
            Box::new(TestStage {
                name: "load",
                input: JobDataKind::RenderRequest,
                output: JobDataKind::LoadedIssue,
            }),
            Box::new(TestStage {
                name: "decide",
                input: JobDataKind::LoadedIssue,
                output: JobDataKind::DecidedIssue,
            }),
        ];

        let pipeline = JobPipeline::new(stages).unwrap();
        assert_eq!(pipeline.expected_input(), JobDataKind::RenderRequest);
        assert_eq!(pipeline.expected_output(), JobDataKind::DecidedIssue);
        assert_eq!(pipeline.stage_names(), vec!["load", "decide"]);
    }

    #[test]
    fn test_kind_break_rejected() {
        let stages: Vec<Box<dyn JobStage>> = vec![
            Box::new(TestStage {
                name: "load",
                input: JobDataKind::RenderRequest,
                output: JobDataKind::LoadedIssue,
            }),
            Box::new(TestStage {
                name: "render",
                // Wrong: should expect LoadedIssue
                input: JobDataKind::ComposedDocument,
                output: JobDataKind::RenderedArtifact,
            }),
        ];

        let result = JobPipeline::new(stages);
        let Err(PipelineValidationError::TypeMismatch {
            stage_a,
            stage_b,
            output,
            input,
        }) = result
        else {
            panic!("expected type mismatch");
        };
        assert_eq!(stage_a, "load");
        assert_eq!(stage_b, "render");
        assert_eq!(output, JobDataKind::LoadedIssue);
        assert_eq!(input, JobDataKind::ComposedDocument);
    }

    #[test]
    fn test_kind_break_reported_at_first_offender() {
        // Three stages, break between the second and third
        let stages: Vec<Box<dyn JobStage>> = vec![
            Box::new(TestStage {
                name: "load",
                input: JobDataKind::RenderRequest,
                output: JobDataKind::LoadedIssue,
            }),
            Box::new(TestStage {
                name: "decide",
                input: JobDataKind::LoadedIssue,
                output: JobDataKind::DecidedIssue,
            }),
            Box::new(TestStage {
                name: "persist",
                input: JobDataKind::RenderedArtifact,
                output: JobDataKind::PersistedArtifact,
            }),
        ];

        let Err(PipelineValidationError::TypeMismatch { stage_a, stage_b, .. }) =
            JobPipeline::new(stages)
        else {
            panic!("expected type mismatch");
        };
        assert_eq!(stage_a, "decide");
        assert_eq!(stage_b, "persist");
    }

    #[test]
    fn test_debug_shows_stage_chain() {
        let stages: Vec<Box<dyn JobStage>> = vec![
            Box::new(TestStage {
                name: "load",
                input: JobDataKind::RenderRequest,
                output: JobDataKind::LoadedIssue,
            }),
            Box::new(TestStage {
                name: "decide",
                input: JobDataKind::LoadedIssue,
                output: JobDataKind::DecidedIssue,
            }),
        ];
        let pipeline = JobPipeline::new(stages).unwrap();
        assert_eq!(format!("{:?}", pipeline), "JobPipeline(load -> decide)");
    }

    // Run-loop behavior (cancellation at boundaries, progress
    // sequences) is covered by the supervisor integration tests.
}
