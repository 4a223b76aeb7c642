/*
 * model/job.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Render job record and its status state machine.
 */

//! Render jobs.
//!
//! A [`RenderJob`] is one request to turn an issue into an artifact.
//! Its status walks `Queued -> Processing -> (Completed | Failed)`;
//! terminal states are frozen and further mutations are rejected.
//! Progress is monotonically non-decreasing and reaches exactly 100
//! iff the job completed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which render path the job asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RendererKind {
    /// Headless paged-media engine producing PDF.
    PagedPrimary,
    /// Deterministic standalone HTML artifact.
    HtmlFallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

/// Compact layout summary embedded on a completed job.
///
/// Mirrors what the dashboards surface: the lead article's numbers plus
/// the mean score across all decisions (fallback decisions count at
/// their real score).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionSummary {
    pub font_size: f32,
    pub columns: u8,
    pub score: i32,
    pub warnings: Vec<String>,
    pub average_score: f32,
}

/// One render job, mutated only by the supervisor once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderJob {
    pub id: String,
    pub issue_id: String,
    pub template_pack_id: String,
    pub renderer: RendererKind,
    pub status: JobStatus,
    /// Percent in [0, 100], monotone within the job.
    pub progress: u8,
    pub artifact_path: Option<String>,
    pub error_message: Option<String>,
    pub warnings: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub summary: Option<DecisionSummary>,
}

impl RenderJob {
    pub fn new(
        id: impl Into<String>,
        issue_id: impl Into<String>,
        template_pack_id: impl Into<String>,
        renderer: RendererKind,
    ) -> Self {
        Self {
            id: id.into(),
            issue_id: issue_id.into(),
            template_pack_id: template_pack_id.into(),
            renderer,
            status: JobStatus::Queued,
            progress: 0,
            artifact_path: None,
            error_message: None,
            warnings: Vec::new(),
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            summary: None,
        }
    }

    /// Whether the job reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self.status, JobStatus::Completed | JobStatus::Failed)
    }

    /// Move `Queued -> Processing` and stamp `started_at`.
    ///
    /// No-op if the job is already terminal.
    pub fn begin(&mut self) {
        if self.is_terminal() {
            return;
        }
        self.status = JobStatus::Processing;
        self.started_at = Some(Utc::now());
    }

    /// Raise progress to `percent`. Regressions are ignored, and a
    /// terminal job's progress is frozen. 100 is reserved for
    /// [`RenderJob::complete`].
    pub fn advance_progress(&mut self, percent: u8) {
        if self.is_terminal() {
            return;
        }
        let percent = percent.min(99);
        if percent > self.progress {
            self.progress = percent;
        }
    }

    /// Terminal success: records the artifact, pins progress at 100.
    pub fn complete(&mut self, artifact_path: impl Into<String>) {
        if self.is_terminal() {
            return;
        }
        self.status = JobStatus::Completed;
        self.progress = 100;
        self.artifact_path = Some(artifact_path.into());
        self.completed_at = Some(Utc::now());
    }

    /// Terminal failure: records the first error message and leaves
    /// progress where it was.
    pub fn fail(&mut self, message: impl Into<String>) {
        if self.is_terminal() {
            return;
        }
        self.status = JobStatus::Failed;
        if self.error_message.is_none() {
            self.error_message = Some(message.into());
        }
        self.completed_at = Some(Utc::now());
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> RenderJob {
        RenderJob::new("j1", "2025-07", "modern", RendererKind::PagedPrimary)
    }

    #[test]
    fn test_new_job_is_queued() {
        let job = job();
        assert_eq!(job.status, JobStatus::Queued);
        assert_eq!(job.progress, 0);
        assert!(!job.is_terminal());
    }

    #[test]
    fn test_progress_is_monotone() {
        let mut job = job();
        job.begin();
        job.advance_progress(25);
        job.advance_progress(10);
        assert_eq!(job.progress, 25);
        job.advance_progress(70);
        assert_eq!(job.progress, 70);
    }

    #[test]
    fn test_progress_caps_below_100_until_completion() {
        let mut job = job();
        job.begin();
        job.advance_progress(100);
        assert_eq!(job.progress, 99);
        job.complete("out/x.pdf");
        assert_eq!(job.progress, 100);
    }

    #[test]
    fn test_complete_is_terminal() {
        let mut job = job();
        job.begin();
        job.complete("out/x.pdf");
        assert_eq!(job.status, JobStatus::Completed);
        assert!(job.completed_at.is_some());

        // Terminal states are frozen
        job.fail("too late");
        assert_eq!(job.status, JobStatus::Completed);
        assert!(job.error_message.is_none());
    }

    #[test]
    fn test_fail_keeps_progress_and_first_error() {
        let mut job = job();
        job.begin();
        job.advance_progress(50);
        job.fail("Job was cancelled");
        job.fail("later error");

        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.progress, 50);
        assert_eq!(job.error_message.as_deref(), Some("Job was cancelled"));
        assert!(job.progress < 100);
    }
}
