/*
 * job/stages/render.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Render stage: primary renderer with in-job fallback.
 */

//! Render stage.
//!
//! Dispatches on the job's renderer selector. The primary path runs
//! the paged-media adapter (initialize, validate, render); any failure
//! there downgrades the same job to the HTML fallback with a warning
//! rather than failing it. Only the explicit selector skips the
//! primary entirely.

use async_trait::async_trait;

use crate::compose::GeneratedTemplate;
use crate::job::context::JobContext;
use crate::job::data::{ComposedDocument, JobData, JobDataKind, RenderedArtifact};
use crate::job::error::JobError;
use crate::job::traits::{JobStage, ProgressSpan};
use crate::model::RendererKind;
use crate::renderer::{fallback, PdfOptions, RenderError, RenderOutcome};

/// Warning recorded when the primary path downgrades to HTML.
const DOWNGRADE_WARNING: &str =
    "PDF rendering unavailable in this environment, generated HTML preview instead";

pub struct RenderStage;

#[async_trait]
impl JobStage for RenderStage {
    fn name(&self) -> &str {
        "render"
    }

    fn input_kind(&self) -> JobDataKind {
        JobDataKind::ComposedDocument
    }

    fn output_kind(&self) -> JobDataKind {
        JobDataKind::RenderedArtifact
    }

    fn progress(&self) -> ProgressSpan {
        ProgressSpan {
            on_start: 70,
            on_complete: 85,
        }
    }

    async fn run(&self, input: JobData, ctx: &mut JobContext) -> Result<JobData, JobError> {
        let Some(doc) = input.into_composed_document() else {
            return Err(JobError::stage_error(self.name(), "unexpected input"));
        };

        let artifact = match ctx.job.renderer {
            RendererKind::HtmlFallback => html_artifact(&doc),
            RendererKind::PagedPrimary => match primary(&doc.template, ctx).await {
                Ok(outcome) => {
                    for warning in outcome.warnings {
                        ctx.add_warning(warning);
                    }
                    RenderedArtifact {
                        issue_id: doc.issue_id.clone(),
                        pack_name: doc.pack_name.clone(),
                        bytes: outcome.bytes,
                        extension: "pdf",
                        page_count: outcome.page_count,
                    }
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Primary renderer failed, falling back to HTML");
                    ctx.add_warning(DOWNGRADE_WARNING);
                    html_artifact(&doc)
                }
            },
        };

        Ok(JobData::RenderedArtifact(artifact))
    }
}

/// Run the primary paged-media path end to end.
async fn primary(
    template: &GeneratedTemplate,
    ctx: &mut JobContext,
) -> Result<RenderOutcome, RenderError> {
    ctx.renderer.initialize().await?;

    let report = ctx.renderer.validate(template).await?;
    for warning in &report.warnings {
        ctx.add_warning(warning.clone());
    }
    if !report.ok {
        return Err(RenderError::Validation(report.errors.join("; ")));
    }

    ctx.renderer.render(template, &PdfOptions::default()).await
}

fn html_artifact(doc: &ComposedDocument) -> RenderedArtifact {
    RenderedArtifact {
        issue_id: doc.issue_id.clone(),
        pack_name: doc.pack_name.clone(),
        bytes: fallback::emit(&doc.template).into_bytes(),
        extension: "html",
        page_count: None,
    }
}
