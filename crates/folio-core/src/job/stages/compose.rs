/*
 * job/stages/compose.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Compose stage: assemble the paged-media document.
 */

//! Compose stage.
//!
//! Hands the decided articles to the template composer and copies the
//! composition warnings onto the job row.

use async_trait::async_trait;

use crate::compose;
use crate::job::context::JobContext;
use crate::job::data::{ComposedDocument, JobData, JobDataKind};
use crate::job::error::JobError;
use crate::job::traits::{JobStage, ProgressSpan};

pub struct ComposeStage;

#[async_trait]
impl JobStage for ComposeStage {
    fn name(&self) -> &str {
        "compose"
    }

    fn input_kind(&self) -> JobDataKind {
        JobDataKind::DecidedIssue
    }

    fn output_kind(&self) -> JobDataKind {
        JobDataKind::ComposedDocument
    }

    fn progress(&self) -> ProgressSpan {
        ProgressSpan {
            on_start: 50,
            on_complete: 70,
        }
    }

    async fn run(&self, input: JobData, ctx: &mut JobContext) -> Result<JobData, JobError> {
        let Some(decided) = input.into_decided_issue() else {
            return Err(JobError::stage_error(self.name(), "unexpected input"));
        };

        let template = compose::compose(&decided.issue, &decided.articles, &decided.pack);

        for warning in &template.metadata.warnings {
            ctx.add_warning(warning.clone());
        }

        tracing::info!(
            issue = %decided.issue.id,
            articles = decided.articles.len(),
            estimated_pages = template.metadata.page_count,
            "Composed document"
        );

        Ok(JobData::ComposedDocument(ComposedDocument {
            issue_id: decided.issue.id,
            pack_name: decided.pack.name,
            template,
        }))
    }
}
