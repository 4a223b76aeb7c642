/*
 * renderer/mod.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Paged-media renderer interface and document validation.
 */

//! Paged-media renderer adapter.
//!
//! [`PagedMediaRenderer`] is the uniform seam over the external
//! renderer process. The engine behind it is opaque: it consumes one
//! HTML document (CSS already embedded) and returns PDF bytes. The
//! adapter must tolerate concurrent `render` calls or serialize them
//! internally; renders are independent either way.
//!
//! [`validate_template`] is the shared pre-flight check used by
//! adapters: purely lexical, no PDF produced.

mod error;
pub mod fallback;
mod paged;

pub use error::RenderError;
pub use paged::{PagedRenderer, RENDERER_ENV};

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::compose::GeneratedTemplate;

/// Output page format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageFormat {
    A4,
    Letter,
    A3,
}

impl PageFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageFormat::A4 => "A4",
            PageFormat::Letter => "Letter",
            PageFormat::A3 => "A3",
        }
    }
}

/// Options handed to the external renderer.
#[derive(Debug, Clone)]
pub struct PdfOptions {
    pub format: PageFormat,
    /// Top, right, bottom, left - in millimeters.
    pub margins_mm: [f32; 4],
    pub scale: f32,
    pub landscape: bool,
    /// When set, `@page size` in the document wins over `format`.
    pub prefer_css_page_size: bool,
    pub print_background: bool,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            format: PageFormat::A4,
            margins_mm: [15.0, 15.0, 20.0, 15.0],
            scale: 1.0,
            landscape: false,
            prefer_css_page_size: true,
            print_background: true,
        }
    }
}

/// Result of one successful render.
#[derive(Debug)]
pub struct RenderOutcome {
    pub bytes: Vec<u8>,
    /// Page count reported by the engine, when it reported one.
    pub page_count: Option<usize>,
    pub warnings: Vec<String>,
    pub render_ms: u64,
}

/// Result of pre-flight validation. `ok` iff `errors` is empty.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub ok: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Uniform interface over the external paged-media renderer.
#[async_trait]
pub trait PagedMediaRenderer: Send + Sync {
    /// Start or reuse the external renderer. Idempotent; an adapter
    /// that lost its process reinitializes transparently on next use.
    async fn initialize(&self) -> Result<(), RenderError>;

    /// Pre-flight the document without producing a PDF.
    async fn validate(&self, template: &GeneratedTemplate)
        -> Result<ValidationReport, RenderError>;

    /// Render the document to PDF bytes. Must enforce a hard per-call
    /// timeout and report it as [`RenderError::Timeout`].
    async fn render(
        &self,
        template: &GeneratedTemplate,
        options: &PdfOptions,
    ) -> Result<RenderOutcome, RenderError>;

    /// Release resources. Safe to call multiple times.
    async fn close(&self) -> Result<(), RenderError>;
}

static IMG_SRC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<img[^>]*\ssrc="([^"]*)""#).unwrap());

/// Lexical document checks: image references and stylesheet shape.
pub fn validate_template(template: &GeneratedTemplate) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for capture in IMG_SRC_RE.captures_iter(&template.html) {
        let src = capture[1].trim();
        if src.is_empty() {
            errors.push("Image with empty source".to_string());
        } else if !src.contains("://") && !src.starts_with("data:") && !src.starts_with('/') {
            warnings.push(format!("Image source may not resolve: {src}"));
        }
    }

    // Scoped styles are embedded in the html, the master sheet in css;
    // check both for balanced rule sets.
    for (what, text) in [("master stylesheet", &template.css), ("document", &template.html)] {
        let open = text.matches('{').count();
        let close = text.matches('}').count();
        if open != close {
            errors.push(format!(
                "Unbalanced braces in {what}: {open} opening vs {close} closing"
            ));
        }
    }

    ValidationReport {
        ok: errors.is_empty(),
        errors,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::TemplateMetadata;

    fn template(html: &str, css: &str) -> GeneratedTemplate {
        GeneratedTemplate {
            html: html.to_string(),
            css: css.to_string(),
            metadata: TemplateMetadata {
                page_count: 1,
                decisions: Vec::new(),
                warnings: Vec::new(),
            },
        }
    }

    #[test]
    fn test_valid_template_passes() {
        let t = template(
            "<html><body><img src=\"https://example.org/a.jpg\"/></body></html>",
            "body { color: black; }",
        );
        let report = validate_template(&t);
        assert!(report.ok);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_empty_image_source_is_error() {
        let t = template("<img src=\"\"/>", "body { }");
        let report = validate_template(&t);
        assert!(!report.ok);
        assert_eq!(report.errors, vec!["Image with empty source"]);
    }

    #[test]
    fn test_relative_image_source_is_warning() {
        let t = template("<img src=\"bild.jpg\"/>", "body { }");
        let report = validate_template(&t);
        assert!(report.ok);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_unbalanced_css_is_error() {
        let t = template("<html></html>", "body { color: black;");
        let report = validate_template(&t);
        assert!(!report.ok);
        assert!(report.errors[0].contains("Unbalanced braces"));
    }

    #[test]
    fn test_pdf_options_defaults() {
        let options = PdfOptions::default();
        assert_eq!(options.format, PageFormat::A4);
        assert_eq!(options.margins_mm, [15.0, 15.0, 20.0, 15.0]);
        assert!(options.prefer_css_page_size);
        assert!(options.print_background);
        assert!(!options.landscape);
    }
}
