/*
 * job/stages/persist.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Persist stage: write the artifact under its derived name.
 */

//! Persist stage.
//!
//! Writes the artifact bytes into the output directory under
//! `{issue_id}-{slug(pack_name)}-{epoch_ms}.{ext}`. The millisecond
//! timestamp keeps concurrent jobs from colliding; no further
//! coordination on filenames is attempted. A write failure here is
//! fatal - there is nothing left to fall back to.

use async_trait::async_trait;
use chrono::Utc;

use crate::job::context::JobContext;
use crate::job::data::{JobData, JobDataKind, PersistedArtifact};
use crate::job::error::JobError;
use crate::job::traits::{JobStage, ProgressSpan};

pub struct PersistStage;

#[async_trait]
impl JobStage for PersistStage {
    fn name(&self) -> &str {
        "persist"
    }

    fn input_kind(&self) -> JobDataKind {
        JobDataKind::RenderedArtifact
    }

    fn output_kind(&self) -> JobDataKind {
        JobDataKind::PersistedArtifact
    }

    fn progress(&self) -> ProgressSpan {
        ProgressSpan {
            on_start: 85,
            on_complete: 95,
        }
    }

    async fn run(&self, input: JobData, ctx: &mut JobContext) -> Result<JobData, JobError> {
        let Some(artifact) = input.into_rendered_artifact() else {
            return Err(JobError::stage_error(self.name(), "unexpected input"));
        };

        let filename = format!(
            "{}-{}-{}.{}",
            artifact.issue_id,
            slug(&artifact.pack_name),
            Utc::now().timestamp_millis(),
            artifact.extension
        );
        let path = ctx.output_dir.join(filename);

        tokio::fs::create_dir_all(&ctx.output_dir).await?;
        tokio::fs::write(&path, &artifact.bytes).await?;

        tracing::info!(
            path = %path.display(),
            bytes = artifact.bytes.len(),
            "Artifact written"
        );

        Ok(JobData::PersistedArtifact(PersistedArtifact { path }))
    }
}

/// Lowercase with runs of whitespace collapsed to `-`.
pub fn slug(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
