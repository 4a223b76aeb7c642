/*
 * job/context.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Job execution context (the "activation frame" pattern).
 */

//! Job execution context.
//!
//! [`JobContext`] is the owned context passed to all pipeline stages.
//! All data is owned or behind `Arc` - no lifetime parameters - so it
//! works cleanly with async and with one spawned task per job.
//!
//! The context carries the job's working copy; the supervisor is the
//! only code that drives it to a terminal state.

use std::path::PathBuf;
use std::sync::Arc;

use super::cancellation::Cancellation;
use super::error::JobError;
use super::progress::{NoopSink, ProgressSink};
use crate::model::{DecisionSummary, RenderJob};
use crate::renderer::PagedMediaRenderer;
use crate::repository::Repository;

/// Owned context for one job's pipeline run.
pub struct JobContext {
    // === Shared collaborators ===
    pub repository: Arc<dyn Repository>,
    pub renderer: Arc<dyn PagedMediaRenderer>,

    // === Owned data ===
    /// Directory artifacts are written into.
    pub output_dir: PathBuf,
    /// Working copy of the job row. Persisted on every progress
    /// boundary and at the terminal transition.
    pub job: RenderJob,
    /// Decision summary produced by the decide stage, attached to the
    /// job on completion.
    pub summary: Option<DecisionSummary>,

    // === Observation & control ===
    pub sink: Arc<dyn ProgressSink>,
    pub cancellation: Cancellation,
}

impl JobContext {
    pub fn new(
        repository: Arc<dyn Repository>,
        renderer: Arc<dyn PagedMediaRenderer>,
        output_dir: PathBuf,
        job: RenderJob,
    ) -> Self {
        Self {
            repository,
            renderer,
            output_dir,
            job,
            summary: None,
            sink: Arc::new(NoopSink),
            cancellation: Cancellation::new(),
        }
    }

    /// Set a custom progress sink.
    pub fn with_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Set a custom cancellation token (for controller integration).
    pub fn with_cancellation(mut self, token: Cancellation) -> Self {
        self.cancellation = token;
        self
    }

    /// Check if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Report a progress boundary: raises the job row, notifies the
    /// sink, persists. Non-increasing reports are suppressed so every
    /// observed boundary value is strictly greater than the last.
    pub async fn advance_progress(&mut self, stage: &str, percent: u8) -> Result<(), JobError> {
        if percent <= self.job.progress {
            return Ok(());
        }
        self.job.advance_progress(percent);
        self.sink.update(stage, percent);
        self.repository.upsert_job(&self.job).await?;
        Ok(())
    }

    /// Record a non-fatal finding on the job.
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.job.add_warning(warning);
    }
}

impl std::fmt::Debug for JobContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobContext")
            .field("job", &self.job.id)
            .field("issue", &self.job.issue_id)
            .field("output_dir", &self.output_dir)
            .field("progress", &self.job.progress)
            .field("is_cancelled", &self.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RendererKind;
    use crate::renderer::PagedRenderer;
    use crate::repository::InMemoryRepository;

    fn context() -> JobContext {
        JobContext::new(
            Arc::new(InMemoryRepository::new()),
            Arc::new(PagedRenderer::new()),
            PathBuf::from("/tmp/out"),
            RenderJob::new("j1", "i1", "modern", RendererKind::HtmlFallback),
        )
    }

    #[tokio::test]
    async fn test_progress_persists_to_repository() {
        let mut ctx = context();
        ctx.job.begin();
        ctx.advance_progress("load", 10).await.unwrap();
        ctx.advance_progress("load", 25).await.unwrap();

        let stored = ctx
            .repository
            .render_job("j1")
            .await
            .unwrap()
            .expect("job row");
        assert_eq!(stored.progress, 25);
    }

    #[tokio::test]
    async fn test_non_increasing_reports_suppressed() {
        use std::sync::Mutex;

        struct Recording(Mutex<Vec<u8>>);
        impl ProgressSink for Recording {
            fn update(&self, _stage: &str, percent: u8) {
                self.0.lock().unwrap().push(percent);
            }
        }

        let sink = Arc::new(Recording(Mutex::new(Vec::new())));
        let mut ctx = context().with_sink(sink.clone());
        ctx.job.begin();

        ctx.advance_progress("load", 10).await.unwrap();
        ctx.advance_progress("decide", 10).await.unwrap();
        ctx.advance_progress("decide", 50).await.unwrap();
        ctx.advance_progress("compose", 50).await.unwrap();

        assert_eq!(*sink.0.lock().unwrap(), vec![10, 50]);
    }

    #[tokio::test]
    async fn test_cancellation_visible_through_context() {
        let token = Cancellation::new();
        let ctx = context().with_cancellation(token.clone());
        assert!(!ctx.is_cancelled());
        token.cancel();
        assert!(ctx.is_cancelled());
    }
}
