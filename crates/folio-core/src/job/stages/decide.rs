/*
 * job/stages/decide.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Decide stage: one layout decision per article.
 */

//! Decide stage.
//!
//! Runs the analyzer and the decision engine over every article and
//! records the job's decision summary (lead article numbers plus the
//! mean score). Exactly one decision is produced per article per job.

use async_trait::async_trait;

use crate::analyzer;
use crate::decision;
use crate::job::context::JobContext;
use crate::job::data::{DecidedIssue, JobData, JobDataKind};
use crate::job::error::JobError;
use crate::job::traits::{JobStage, ProgressSpan};
use crate::model::DecisionSummary;

pub struct DecideStage;

#[async_trait]
impl JobStage for DecideStage {
    fn name(&self) -> &str {
        "decide"
    }

    fn input_kind(&self) -> JobDataKind {
        JobDataKind::LoadedIssue
    }

    fn output_kind(&self) -> JobDataKind {
        JobDataKind::DecidedIssue
    }

    fn progress(&self) -> ProgressSpan {
        ProgressSpan {
            on_start: 25,
            on_complete: 50,
        }
    }

    async fn run(&self, input: JobData, ctx: &mut JobContext) -> Result<JobData, JobError> {
        let Some(loaded) = input.into_loaded_issue() else {
            return Err(JobError::stage_error(self.name(), "unexpected input"));
        };

        let mut decided = Vec::with_capacity(loaded.articles.len());
        for article in loaded.articles {
            let metrics = analyzer::analyze(&article);
            let layout = decision::decide(&metrics, &loaded.pack.variants, &loaded.pack.rules);
            tracing::debug!(
                article = %article.id,
                variant = %layout.variant.id,
                score = layout.score,
                font = layout.font_size,
                columns = layout.column_count,
                "Layout decided"
            );
            decided.push((article, layout));
        }

        ctx.summary = summarize(&decided);

        Ok(JobData::DecidedIssue(DecidedIssue {
            issue: loaded.issue,
            pack: loaded.pack,
            articles: decided,
        }))
    }
}

fn summarize(
    decided: &[(crate::model::Article, decision::LayoutDecision)],
) -> Option<DecisionSummary> {
    let (_, first) = decided.first()?;
    let total: i32 = decided.iter().map(|(_, d)| d.score).sum();
    Some(DecisionSummary {
        font_size: first.font_size,
        columns: first.column_count,
        score: first.score,
        warnings: first.warnings.clone(),
        average_score: total as f32 / decided.len() as f32,
    })
}
