/*
 * job/supervisor.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Render job supervisor: drives one job to a terminal state.
 */

//! Render job supervisor.
//!
//! [`JobSupervisor::process`] drives one job through
//! load -> decide -> compose -> render -> persist and is the only
//! code that converts pipeline errors into job status transitions.
//! Stages return values or errors; the supervisor records the first
//! fatal error, attaches the decision summary, flips the issue status
//! and persists the terminal row.
//!
//! One call per job. Multiple jobs may be in flight concurrently,
//! each with its own context and cancellation token; nothing is
//! shared between them except the repository and the renderer
//! adapter. Work inside a single job is never parallelized.

use std::path::PathBuf;
use std::sync::Arc;

use super::cancellation::Cancellation;
use super::context::JobContext;
use super::data::{JobData, RenderRequest};
use super::pipeline::JobPipeline;
use super::progress::ProgressSink;
use super::stages::{ComposeStage, DecideStage, LoadStage, PersistStage, RenderStage};
use super::traits::JobStage;
use crate::model::{IssueStatus, RenderJob};
use crate::renderer::PagedMediaRenderer;
use crate::repository::Repository;

pub struct JobSupervisor {
    repository: Arc<dyn Repository>,
    renderer: Arc<dyn PagedMediaRenderer>,
    output_dir: PathBuf,
}

impl JobSupervisor {
    pub fn new(
        repository: Arc<dyn Repository>,
        renderer: Arc<dyn PagedMediaRenderer>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            repository,
            renderer,
            output_dir: output_dir.into(),
        }
    }

    /// The standard five-stage pipeline.
    ///
    /// Construction cannot fail: the stage chain is statically known
    /// to compose.
    fn standard_pipeline() -> JobPipeline {
        let stages: Vec<Box<dyn JobStage>> = vec![
            Box::new(LoadStage),
            Box::new(DecideStage),
            Box::new(ComposeStage),
            Box::new(RenderStage),
            Box::new(PersistStage),
        ];
        JobPipeline::new(stages).expect("standard pipeline composes")
    }

    /// Drive one job to a terminal state and return the terminal row.
    ///
    /// Never panics across a job boundary: every outcome, including
    /// repository failures during teardown, ends in a terminal row
    /// being returned (persisted best-effort).
    pub async fn process(
        &self,
        job: RenderJob,
        sink: Arc<dyn ProgressSink>,
        cancellation: Cancellation,
    ) -> RenderJob {
        let request = RenderRequest {
            issue_id: job.issue_id.clone(),
            template_pack_id: job.template_pack_id.clone(),
        };

        tracing::info!(
            job = %job.id,
            issue = %request.issue_id,
            pack = %request.template_pack_id,
            renderer = ?job.renderer,
            "Processing render job"
        );

        let mut ctx = JobContext::new(
            self.repository.clone(),
            self.renderer.clone(),
            self.output_dir.clone(),
            job,
        )
        .with_sink(sink)
        .with_cancellation(cancellation);

        ctx.job.begin();
        self.persist_row(&ctx.job).await;
        self.set_issue_status(&request.issue_id, IssueStatus::Processing)
            .await;

        let pipeline = Self::standard_pipeline();
        let result = pipeline.run(JobData::RenderRequest(request.clone()), &mut ctx).await;

        match result.map(JobData::into_persisted_artifact) {
            Ok(Some(artifact)) => {
                ctx.job.summary = ctx.summary.take();
                ctx.job.complete(artifact.path.display().to_string());
                ctx.sink.update("complete", 100);
                self.persist_row(&ctx.job).await;
                self.set_issue_status(&request.issue_id, IssueStatus::Completed)
                    .await;
                tracing::info!(job = %ctx.job.id, "Render job completed");
            }
            Ok(None) => {
                ctx.job.fail("Pipeline produced no artifact");
                self.persist_row(&ctx.job).await;
                self.set_issue_status(&request.issue_id, IssueStatus::Failed)
                    .await;
            }
            Err(err) => {
                tracing::error!(job = %ctx.job.id, error = %err, "Render job failed");
                ctx.job.fail(err.to_string());
                self.persist_row(&ctx.job).await;
                self.set_issue_status(&request.issue_id, IssueStatus::Failed)
                    .await;
            }
        }

        ctx.job
    }

    /// Best-effort row persistence during teardown; a failure here is
    /// logged and never overwrites the job's first recorded error.
    async fn persist_row(&self, job: &RenderJob) {
        if let Err(err) = self.repository.upsert_job(job).await {
            tracing::error!(job = %job.id, error = %err, "Failed to persist job row");
        }
    }

    async fn set_issue_status(&self, issue_id: &str, status: IssueStatus) {
        if let Err(err) = self.repository.set_issue_status(issue_id, status).await {
            tracing::error!(issue = issue_id, error = %err, "Failed to update issue status");
        }
    }
}
