/*
 * render.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Render command implementation
 */

//! Render command implementation.
//!
//! Wires an in-memory repository, the paged-media renderer adapter
//! and a render job supervisor around one intake document, then
//! drives a single job to completion. Ctrl-C requests cooperative
//! cancellation; the job fails at the next stage boundary unless the
//! artifact is already on disk.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use folio_core::intake;
use folio_core::job::{Cancellation, JobSupervisor, TracingSink};
use folio_core::model::{JobStatus, RenderJob, RendererKind};
use folio_core::renderer::{PagedMediaRenderer, PagedRenderer};
use folio_core::repository::{InMemoryRepository, Repository};

/// Arguments for the render command
#[derive(Debug)]
pub struct RenderArgs {
    /// Path to the intake JSON document
    pub input: String,
    /// Template pack id or pack JSON path
    pub pack: String,
    /// "paged" or "fallback"
    pub renderer: String,
    /// Output directory
    pub output_dir: String,
    /// Suppress console output
    pub quiet: bool,
}

/// Execute the render command
pub async fn execute(args: RenderArgs) -> Result<()> {
    let renderer_kind = parse_renderer(&args.renderer)?;

    let json = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read intake document {}", args.input))?;
    let parsed = intake::parse_issue(&json).context("Invalid intake document")?;

    for warning in &parsed.warnings {
        tracing::warn!("{warning}");
    }

    let repository = Arc::new(InMemoryRepository::with_builtin_packs());

    // A pack argument that points at a file loads a custom pack; any
    // other value has to name a stored (built-in) pack.
    let pack_id = if Path::new(&args.pack).is_file() {
        let pack_json = std::fs::read_to_string(&args.pack)
            .with_context(|| format!("Failed to read template pack {}", args.pack))?;
        let pack = intake::parse_pack(&pack_json).context("Invalid template pack")?;
        let id = pack.id.clone();
        repository
            .store_pack(pack)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to store template pack: {e}"))?;
        id
    } else {
        args.pack.clone()
    };

    let issue_id = parsed.issue.id.clone();
    let article_count = parsed.articles.len();
    repository
        .store_issue(parsed.issue, parsed.articles)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to store issue: {e}"))?;

    if !args.quiet {
        info!(
            issue = %issue_id,
            articles = article_count,
            pack = %pack_id,
            "Starting render job"
        );
    }

    let renderer = Arc::new(PagedRenderer::new());
    let supervisor = JobSupervisor::new(repository, renderer.clone(), args.output_dir.clone());

    let cancellation = Cancellation::new();
    let ctrl_c_token = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Cancellation requested");
            ctrl_c_token.cancel();
        }
    });

    let job = RenderJob::new(
        format!("cli-{issue_id}"),
        issue_id,
        pack_id,
        renderer_kind,
    );
    let done = supervisor
        .process(job, Arc::new(TracingSink::new()), cancellation)
        .await;

    if let Err(err) = renderer.close().await {
        tracing::debug!(error = %err, "Renderer close failed");
    }

    for warning in &done.warnings {
        tracing::warn!("{warning}");
    }

    match done.status {
        JobStatus::Completed => {
            let artifact = done.artifact_path.as_deref().unwrap_or("<none>");
            if !args.quiet {
                info!(artifact = artifact, "Render job completed");
                println!("{artifact}");
            }
            Ok(())
        }
        _ => anyhow::bail!(
            "Render job failed: {}",
            done.error_message.as_deref().unwrap_or("unknown error")
        ),
    }
}

fn parse_renderer(value: &str) -> Result<RendererKind> {
    match value {
        "paged" | "pdf" => Ok(RendererKind::PagedPrimary),
        "fallback" | "html" => Ok(RendererKind::HtmlFallback),
        other => anyhow::bail!("Unknown renderer '{other}' (expected 'paged' or 'fallback')"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_renderer() {
        assert_eq!(parse_renderer("paged").unwrap(), RendererKind::PagedPrimary);
        assert_eq!(parse_renderer("pdf").unwrap(), RendererKind::PagedPrimary);
        assert_eq!(
            parse_renderer("fallback").unwrap(),
            RendererKind::HtmlFallback
        );
        assert!(parse_renderer("docx").is_err());
    }
}
