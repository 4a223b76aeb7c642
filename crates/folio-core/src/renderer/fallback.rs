/*
 * renderer/fallback.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Deterministic HTML fallback artifact.
 */

//! HTML fallback emitter.
//!
//! When the paged-media engine is unavailable or fails, the job still
//! produces an artifact: one standalone HTML file with the master CSS
//! inlined, a diagnostic banner listing every layout decision, and the
//! composed document's body content spliced in. Nothing is fetched -
//! image references stay as URLs - and the output is a pure function
//! of the template.

use std::fmt::Write as _;

use crate::compose::{escape_html, GeneratedTemplate};

const BANNER_CSS: &str = r#".fallback-banner {
  font-family: ui-monospace, "SF Mono", Menlo, monospace;
  font-size: 11px;
  background: #fff8e1;
  border: 1px solid #e0c36a;
  padding: 12px 16px;
  margin-bottom: 24px;
}
.fallback-banner h2 { font-size: 13px; margin-bottom: 8px; }
.fallback-banner table { border-collapse: collapse; width: 100%; }
.fallback-banner th, .fallback-banner td {
  text-align: left;
  padding: 2px 12px 2px 0;
  vertical-align: top;
}
.fallback-banner .warnings { color: #8a6d1d; }
"#;

/// Emit the standalone fallback document.
pub fn emit(template: &GeneratedTemplate) -> String {
    let mut out = String::with_capacity(template.html.len() + template.css.len() + 2048);
    out.push_str("<!DOCTYPE html>\n<html lang=\"de\">\n<head>\n<meta charset=\"utf-8\"/>\n");
    out.push_str("<title>Folio HTML-Vorschau</title>\n<style>\n");
    out.push_str(&template.css);
    out.push_str(BANNER_CSS);
    out.push_str("</style>\n</head>\n<body>\n");
    out.push_str(&banner(template));
    out.push_str(body_content(&template.html));
    out.push_str("\n</body>\n</html>\n");
    out
}

/// Diagnostic banner: one row per layout decision.
fn banner(template: &GeneratedTemplate) -> String {
    let mut out = String::from(
        "<section class=\"fallback-banner\">\n<h2>HTML preview (paged-media renderer unavailable)</h2>\n\
         <table>\n<tr><th>Variant</th><th>Score</th><th>Font</th><th>Columns</th><th>Warnings</th></tr>\n",
    );
    for decision in &template.metadata.decisions {
        let warnings = if decision.warnings.is_empty() {
            "-".to_string()
        } else {
            escape_html(&decision.warnings.join("; "))
        };
        let _ = writeln!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}pt / {}</td><td>{}</td><td class=\"warnings\">{}</td></tr>",
            escape_html(&decision.variant.id),
            decision.score,
            decision.font_size,
            decision.line_height,
            decision.column_count,
            warnings
        );
    }
    let _ = writeln!(
        out,
        "</table>\n<p>Estimated pages: {}</p>\n</section>",
        template.metadata.page_count
    );
    out
}

/// The content between the composed document's `<body>` tags, or the
/// whole input when no wrapper is present.
fn body_content(html: &str) -> &str {
    let Some(open) = html.find("<body") else {
        return html;
    };
    let Some(start) = html[open..].find('>').map(|i| open + i + 1) else {
        return html;
    };
    let end = html.rfind("</body>").unwrap_or(html.len());
    if start <= end { &html[start..end] } else { html }
}
