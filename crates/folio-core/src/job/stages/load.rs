/*
 * job/stages/load.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Load stage: resolve issue, articles and pack from the repository.
 */

//! Load stage.
//!
//! Resolves the job's issue, its articles and the named template pack.
//! Both identifiers must resolve here, before any decision is taken;
//! a miss fails the job. Articles come back ordered by the issue's
//! section order, then insertion; unknown sections sort last.

use async_trait::async_trait;

use crate::error::FolioError;
use crate::job::context::JobContext;
use crate::job::data::{JobData, JobDataKind, LoadedIssue};
use crate::job::error::JobError;
use crate::job::traits::{JobStage, ProgressSpan};
use crate::packs;

pub struct LoadStage;

#[async_trait]
impl JobStage for LoadStage {
    fn name(&self) -> &str {
        "load"
    }

    fn input_kind(&self) -> JobDataKind {
        JobDataKind::RenderRequest
    }

    fn output_kind(&self) -> JobDataKind {
        JobDataKind::LoadedIssue
    }

    fn progress(&self) -> ProgressSpan {
        ProgressSpan {
            on_start: 10,
            on_complete: 25,
        }
    }

    async fn run(&self, input: JobData, ctx: &mut JobContext) -> Result<JobData, JobError> {
        let Some(request) = input.into_render_request() else {
            return Err(JobError::stage_error(self.name(), "unexpected input"));
        };

        let issue = ctx
            .repository
            .issue(&request.issue_id)
            .await?
            .ok_or_else(|| FolioError::IssueNotFound(request.issue_id.clone()))?;

        let mut articles = ctx.repository.articles_for_issue(&request.issue_id).await?;
        if articles.is_empty() {
            return Err(FolioError::EmptyIssue(request.issue_id.clone()).into());
        }

        // Repository packs take precedence over the built-ins so a
        // stored edit of "modern" wins over the shipped one.
        let pack = match ctx.repository.template_pack(&request.template_pack_id).await? {
            Some(pack) => pack,
            None => packs::builtin(&request.template_pack_id)
                .ok_or_else(|| FolioError::PackNotFound(request.template_pack_id.clone()))?,
        };

        // Section order, then insertion; unknown sections last.
        articles.sort_by_key(|a| issue.section_index(&a.section).unwrap_or(usize::MAX));

        tracing::info!(
            issue = %issue.id,
            articles = articles.len(),
            pack = %pack.name,
            "Loaded issue data"
        );

        Ok(JobData::LoadedIssue(LoadedIssue {
            issue,
            articles,
            pack,
        }))
    }
}
