/*
 * renderer/paged.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Subprocess adapter for an external paged-media engine.
 */

//! Subprocess adapter for the external paged-media engine.
//!
//! The adapter drives a `pagedjs-cli`-compatible binary: the document
//! is staged into a temp file, the engine is spawned per render, and
//! the produced PDF is read back. There is no long-lived process to
//! babysit; "initialized" means the binary has been located.
//!
//! # Finding the engine
//!
//! [`PagedRenderer`] searches in this order:
//! 1. `FOLIO_PAGED_RENDERER` environment variable - either a direct
//!    path to the binary or an installation directory containing it
//! 2. System PATH via `which`
//!
//! A failed render marks the adapter cold again, so the next use
//! re-runs discovery transparently.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::process::Command;
use tokio::sync::Mutex;

use super::{
    validate_template, PagedMediaRenderer, PdfOptions, RenderError, RenderOutcome,
    ValidationReport,
};
use crate::compose::GeneratedTemplate;

/// Environment variable overriding renderer discovery.
pub const RENDERER_ENV: &str = "FOLIO_PAGED_RENDERER";

/// Binary looked up on PATH when the env var is unset.
const DEFAULT_BINARY: &str = "pagedjs-cli";

/// Hard per-render timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

static PAGE_COUNT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s+pages?").unwrap());

pub struct PagedRenderer {
    binary: Mutex<Option<PathBuf>>,
    timeout: Duration,
}

impl Default for PagedRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PagedRenderer {
    pub fn new() -> Self {
        Self {
            binary: Mutex::new(None),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Adapter with a custom per-render timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            binary: Mutex::new(None),
            timeout,
        }
    }

    /// Locate the engine binary: env var first, then PATH.
    pub fn find_binary() -> Option<PathBuf> {
        if let Ok(configured) = std::env::var(RENDERER_ENV) {
            let path = PathBuf::from(&configured);
            if path.is_file() {
                return Some(path);
            }
            if path.is_dir() {
                let in_dir = path.join(DEFAULT_BINARY);
                if in_dir.is_file() {
                    return Some(in_dir);
                }
            }
        }

        which::which(DEFAULT_BINARY).ok()
    }

    /// Resolve and cache the binary, re-running discovery when cold.
    async fn ensure_initialized(&self) -> Result<PathBuf, RenderError> {
        let mut binary = self.binary.lock().await;
        if let Some(path) = binary.as_ref() {
            return Ok(path.clone());
        }
        let found = Self::find_binary().ok_or_else(|| {
            RenderError::NotAvailable(format!(
                "no '{DEFAULT_BINARY}' on PATH and {RENDERER_ENV} is not set"
            ))
        })?;
        tracing::info!(binary = %found.display(), "Paged-media renderer located");
        *binary = Some(found.clone());
        Ok(found)
    }

    /// Drop the cached binary so the next use reinitializes.
    async fn mark_cold(&self) {
        *self.binary.lock().await = None;
    }
}

#[async_trait]
impl PagedMediaRenderer for PagedRenderer {
    async fn initialize(&self) -> Result<(), RenderError> {
        self.ensure_initialized().await.map(|_| ())
    }

    async fn validate(
        &self,
        template: &GeneratedTemplate,
    ) -> Result<ValidationReport, RenderError> {
        Ok(validate_template(template))
    }

    async fn render(
        &self,
        template: &GeneratedTemplate,
        options: &PdfOptions,
    ) -> Result<RenderOutcome, RenderError> {
        let binary = self.ensure_initialized().await?;
        let started = Instant::now();

        // Stage the document; the directory cleans itself up on drop.
        let workdir = tempfile::Builder::new().prefix("folio-render-").tempdir()?;
        let input = workdir.path().join("document.html");
        let output = workdir.path().join("document.pdf");
        tokio::fs::write(&input, &template.html).await?;

        let mut cmd = Command::new(&binary);
        cmd.arg(&input).arg("-o").arg(&output);
        if !options.prefer_css_page_size {
            cmd.args(["--page-size", options.format.as_str()]);
        }
        if options.landscape {
            cmd.arg("--landscape");
        }
        cmd.kill_on_drop(true);

        let result = tokio::time::timeout(self.timeout, cmd.output()).await;
        let process_output = match result {
            Ok(Ok(output)) => output,
            Ok(Err(err)) => {
                self.mark_cold().await;
                return Err(RenderError::Io(err));
            }
            Err(_elapsed) => {
                self.mark_cold().await;
                return Err(RenderError::Timeout(self.timeout.as_secs()));
            }
        };

        if !process_output.status.success() {
            self.mark_cold().await;
            let stderr = String::from_utf8_lossy(&process_output.stderr);
            let first_line = stderr.lines().next().unwrap_or("no diagnostic output");
            return Err(RenderError::Internal(format!(
                "exit status {}: {first_line}",
                process_output.status
            )));
        }

        let bytes = tokio::fs::read(&output).await.map_err(|_| {
            RenderError::Internal("renderer reported success but wrote no PDF".to_string())
        })?;

        let stdout = String::from_utf8_lossy(&process_output.stdout);
        let page_count = PAGE_COUNT_RE
            .captures(&stdout)
            .and_then(|c| c[1].parse().ok());

        Ok(RenderOutcome {
            bytes,
            page_count,
            warnings: Vec::new(),
            render_ms: started.elapsed().as_millis() as u64,
        })
    }

    async fn close(&self) -> Result<(), RenderError> {
        self.mark_cold().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count_parsing() {
        let captures = PAGE_COUNT_RE.captures("Rendering ... 12 pages total").unwrap();
        assert_eq!(&captures[1], "12");
        assert!(PAGE_COUNT_RE.captures("no counts here").is_none());
        let captures = PAGE_COUNT_RE.captures("rendered 1 page").unwrap();
        assert_eq!(&captures[1], "1");
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let renderer = PagedRenderer::new();
        renderer.close().await.unwrap();
        renderer.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_validate_delegates_to_lexical_checks() {
        use crate::compose::TemplateMetadata;

        let renderer = PagedRenderer::new();
        let template = GeneratedTemplate {
            html: "<img src=\"\"/>".to_string(),
            css: "body { }".to_string(),
            metadata: TemplateMetadata {
                page_count: 1,
                decisions: Vec::new(),
                warnings: Vec::new(),
            },
        };
        let report = renderer.validate(&template).await.unwrap();
        assert!(!report.ok);
    }
}
