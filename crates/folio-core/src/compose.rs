/*
 * compose.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Template composer: one paged-media document per issue.
 */

//! Template composer.
//!
//! [`compose`] assembles the cover, table of contents, articles and
//! imprint into one self-contained paged-media document: a single
//! `<style>` with the master CSS in the head, then one `<article>`
//! per input article, each preceded by its scoped style block.
//!
//! Interpolated content strings (titles, authors, captions) are
//! HTML-escaped. `body_html` is interpolated raw: sanitization is the
//! intake collaborator's trust boundary, not re-checked here.

use std::fmt::Write as _;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::analyzer::strip_tags;
use crate::css::emit_article_css;
use crate::decision::LayoutDecision;
use crate::model::{Article, Image, Issue, TemplatePack};

/// Pullquote sentence length bounds, in characters.
const PULLQUOTE_MIN_CHARS: usize = 40;
const PULLQUOTE_MAX_CHARS: usize = 120;

/// First article page in the best-effort TOC numbering.
const TOC_FIRST_PAGE: usize = 3;

static CLOSING_P_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</p>").unwrap());
static SENTENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());

/// The composed document plus its derived metadata.
#[derive(Debug, Clone)]
pub struct GeneratedTemplate {
    /// Complete HTML document (master CSS embedded in the head).
    pub html: String,
    /// The master CSS on its own, for consumers that re-inline it.
    pub css: String,
    pub metadata: TemplateMetadata,
}

#[derive(Debug, Clone)]
pub struct TemplateMetadata {
    /// Estimate only; real pagination is the renderer's business.
    pub page_count: usize,
    /// One decision per article, in article order.
    pub decisions: Vec<LayoutDecision>,
    /// Per-decision warnings in order, then composition warnings.
    pub warnings: Vec<String>,
}

/// Compose the issue document, stamped with the current build time.
pub fn compose(
    issue: &Issue,
    articles: &[(Article, LayoutDecision)],
    pack: &TemplatePack,
) -> GeneratedTemplate {
    compose_at(issue, articles, pack, Utc::now())
}

/// Deterministic composition entry point: everything in the output is
/// a function of the arguments.
pub fn compose_at(
    issue: &Issue,
    articles: &[(Article, LayoutDecision)],
    pack: &TemplatePack,
    built: DateTime<Utc>,
) -> GeneratedTemplate {
    let css = master_css(pack, built);

    let mut warnings: Vec<String> = articles
        .iter()
        .flat_map(|(_, d)| d.warnings.iter().cloned())
        .collect();

    let mut body = String::with_capacity(16 * 1024);
    body.push_str(&cover_section(issue));
    body.push_str(&toc_section(issue, articles, &mut warnings));
    for (article, decision) in articles {
        body.push_str(&article_section(article, decision));
    }
    body.push_str(&imprint_section(issue, pack));

    let mut html = String::with_capacity(body.len() + css.len() + 512);
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"de\">\n<head>\n<meta charset=\"utf-8\"/>\n<title>{}</title>\n<style>\n{}</style>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape_html(&issue.title),
        css,
        body
    );

    let n = articles.len();
    GeneratedTemplate {
        html,
        css,
        metadata: TemplateMetadata {
            page_count: 2 + n.div_ceil(2) + n,
            decisions: articles.iter().map(|(_, d)| d.clone()).collect(),
            warnings,
        },
    }
}

/// Escape HTML special characters in interpolated content.
pub fn escape_html(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&#39;".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

// ============================================================================
// Master CSS
// ============================================================================

/// Stable across packs; only the running head and build date vary.
const MASTER_CSS: &str = r#"* { margin: 0; padding: 0; box-sizing: border-box; }
html { font-size: 10pt; }
body { font-family: "Source Serif 4", Georgia, serif; color: #1a1a1a; }
img { max-width: 100%; object-fit: cover; }
@page {
  size: A4;
  margin: 15mm 15mm 20mm 15mm;
  marks: crop cross;
  bleed: 3mm;
  @top-center {
    content: "__RUNNING_HEAD__";
    font-size: 7pt;
    letter-spacing: 2px;
    text-transform: uppercase;
    color: #666;
  }
  @bottom-center { content: counter(page); font-size: 9pt; }
  @bottom-left { content: "__BUILD_DATE__"; font-size: 6pt; color: #999; }
}
@page :first {
  @top-center { content: none; }
  @bottom-center { content: none; }
  @bottom-left { content: none; }
}
.cover {
  page-break-after: always;
  height: 90vh;
  display: flex;
  flex-direction: column;
  justify-content: flex-end;
}
.cover-gradient {
  height: 55vh;
  background: linear-gradient(135deg, #1a1a2e 0%, #16213e 55%, #0f3460 100%);
  margin-bottom: 18mm;
}
.cover-title { font-size: 42pt; line-height: 1.05; }
.cover-issue { font-size: 12pt; text-transform: uppercase; letter-spacing: 3px; margin-top: 6mm; }
.cover-date { font-size: 10pt; color: #555; }
.toc { page-break-before: always; page-break-after: always; }
.toc-heading { font-size: 24pt; margin-bottom: 10mm; }
.toc-section { font-size: 11pt; text-transform: uppercase; letter-spacing: 2px; margin: 6mm 0 2mm 0; color: #555; }
.toc-entries { list-style: none; }
.toc-entries li { display: flex; baseline-source: first; gap: 4mm; padding: 1.5mm 0; border-bottom: 0.25pt solid #ddd; }
.toc-title { flex: 1; }
.toc-author { color: #777; }
.toc-page { min-width: 8mm; text-align: right; font-variant-numeric: tabular-nums; }
.article { page-break-before: always; }
.article-header { margin-bottom: 6mm; }
.article-dek { color: #444; margin-top: 2mm; }
.article-byline { margin-top: 2mm; color: #777; }
.hero-image { width: 100%; margin-bottom: 5mm; }
.hero-image img { width: 100%; height: 100%; }
figure.inline-image { margin: 3mm 0; }
aside.pullquote { font-style: italic; padding: 4mm 0; border-top: 1pt solid #1a1a1a; border-bottom: 1pt solid #1a1a1a; margin: 4mm 0; }
.imprint { page-break-before: always; font-size: 8pt; color: #444; }
.imprint h2 { font-size: 14pt; color: #1a1a1a; margin-bottom: 6mm; }
.imprint-block { margin-bottom: 4mm; }
.imprint-block h3 { font-size: 8pt; text-transform: uppercase; letter-spacing: 1px; }
@media screen {
  body { max-width: 210mm; margin: 0 auto; padding: 10mm; background: #fff; }
}
"#;

fn master_css(pack: &TemplatePack, built: DateTime<Utc>) -> String {
    MASTER_CSS
        .replace("__RUNNING_HEAD__", &css_string(&pack.name))
        .replace("__BUILD_DATE__", &built.format("%Y-%m-%d").to_string())
}

/// Escape a string for use inside a double-quoted CSS string.
fn css_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

// ============================================================================
// Sections
// ============================================================================

fn cover_section(issue: &Issue) -> String {
    format!(
        "<section class=\"cover\">\n<div class=\"cover-gradient\"></div>\n<h1 class=\"cover-title\">{}</h1>\n<p class=\"cover-issue\">Ausgabe {}</p>\n<p class=\"cover-date\">{}</p>\n</section>\n",
        escape_html(&issue.title),
        escape_html(&issue.id),
        localized_date(issue.date)
    )
}

/// German long-form date for the cover ("1. Juli 2025").
fn localized_date(date: NaiveDate) -> String {
    const MONTHS: [&str; 12] = [
        "Januar",
        "Februar",
        "März",
        "April",
        "Mai",
        "Juni",
        "Juli",
        "August",
        "September",
        "Oktober",
        "November",
        "Dezember",
    ];
    format!(
        "{}. {} {}",
        date.day(),
        MONTHS[date.month0() as usize],
        date.year()
    )
}

/// Table of contents: grouped by section in issue order, unknown
/// sections appended under their own names. Page numbers are a
/// documented best-effort estimate (3, then +1 per article).
fn toc_section(
    issue: &Issue,
    articles: &[(Article, LayoutDecision)],
    warnings: &mut Vec<String>,
) -> String {
    let mut sections: Vec<&str> = issue.sections.iter().map(String::as_str).collect();
    for (article, _) in articles {
        if issue.section_index(&article.section).is_none() {
            if !sections.contains(&article.section.as_str()) {
                sections.push(&article.section);
            }
            warnings.push(format!(
                "Article '{}' references unknown section '{}'",
                article.id, article.section
            ));
        }
    }

    let mut out = String::from("<section class=\"toc\">\n<h2 class=\"toc-heading\">Inhalt</h2>\n");
    let mut page = TOC_FIRST_PAGE;
    for section in sections {
        let entries: Vec<&(Article, LayoutDecision)> = articles
            .iter()
            .filter(|(a, _)| a.section == section)
            .collect();
        if entries.is_empty() {
            continue;
        }
        let _ = writeln!(
            out,
            "<h3 class=\"toc-section\">{}</h3>\n<ol class=\"toc-entries\">",
            escape_html(section)
        );
        for (article, _) in entries {
            let _ = writeln!(
                out,
                "<li><span class=\"toc-title\">{}</span><span class=\"toc-author\">{}</span><span class=\"toc-page\">{}</span></li>",
                escape_html(&article.title),
                escape_html(&article.author),
                page
            );
            page += 1;
        }
        out.push_str("</ol>\n");
    }
    out.push_str("</section>\n");
    out
}

fn article_section(article: &Article, decision: &LayoutDecision) -> String {
    let mut out = String::with_capacity(article.body_html.len() + 2048);
    let _ = writeln!(
        out,
        "<article class=\"article\" id=\"article-{}\">",
        escape_html(&article.id)
    );
    let _ = writeln!(out, "<style>\n{}</style>", emit_article_css(decision, article));

    if decision.hero_height_vh.is_some() {
        if let Some(hero) = article.hero_image() {
            out.push_str(&figure(hero, "hero-image", &article.title));
        }
    }

    out.push_str("<header class=\"article-header\">\n");
    let _ = writeln!(
        out,
        "<h1 class=\"article-title\">{}</h1>",
        escape_html(&article.title)
    );
    if let Some(dek) = &article.dek {
        let _ = writeln!(out, "<p class=\"article-dek\">{}</p>", escape_html(dek));
    }
    let _ = writeln!(
        out,
        "<p class=\"article-byline\">Von {}</p>",
        escape_html(&article.author)
    );
    out.push_str("</header>\n");

    out.push_str("<div class=\"article-body\">\n");
    out.push_str(&interleaved_body(article, decision));
    out.push_str("</div>\n</article>\n");
    out
}

fn figure(image: &Image, class: &str, alt_fallback: &str) -> String {
    let alt = image.caption.as_deref().unwrap_or(alt_fallback);
    let mut out = format!(
        "<figure class=\"{class}\">\n<img src=\"{}\" alt=\"{}\" style=\"object-position: {}\"/>\n",
        escape_html(&image.src),
        escape_html(alt),
        image.object_position()
    );
    if image.caption.is_some() || image.credit.is_some() {
        out.push_str("<figcaption>");
        if let Some(caption) = &image.caption {
            let _ = write!(out, "<span class=\"caption\">{}</span>", escape_html(caption));
        }
        if let Some(credit) = &image.credit {
            let _ = write!(out, " <span class=\"credit\">{}</span>", escape_html(credit));
        }
        out.push_str("</figcaption>\n");
    }
    out.push_str("</figure>\n");
    out
}

/// Body HTML with inline figures and the pullquote interleaved at
/// paragraph boundaries.
fn interleaved_body(article: &Article, decision: &LayoutDecision) -> String {
    let paragraphs = split_paragraphs(&article.body_html);
    let inline = article.inline_images();
    let count = paragraphs.len();

    // Figure slot after paragraph floor(count * (i+1) / (n+1))
    let mut figures_after: Vec<Vec<String>> = vec![Vec::new(); count];
    let mut trailing: Vec<String> = Vec::new();
    for (i, image) in inline.iter().enumerate() {
        let markup = figure(image, "inline-image", &article.title);
        if count == 0 {
            trailing.push(markup);
            continue;
        }
        let pos = (count * (i + 1) / (inline.len() + 1)).min(count - 1);
        figures_after[pos].push(markup);
    }

    let pullquote_at = pullquote_slot(article, decision, count);

    let mut out = String::with_capacity(article.body_html.len() + 1024);
    for (i, paragraph) in paragraphs.iter().enumerate() {
        if let Some((at, text)) = &pullquote_at {
            if *at == i {
                let _ =
                    writeln!(out, "<aside class=\"pullquote\">{}</aside>", escape_html(text));
            }
        }
        out.push_str(paragraph);
        out.push('\n');
        for markup in &figures_after[i] {
            out.push_str(markup);
        }
    }
    for markup in trailing {
        out.push_str(&markup);
    }
    out
}

/// Split at `</p>` boundaries, keeping the closing tag with each
/// paragraph. A trailing fragment without `</p>` is kept as-is.
fn split_paragraphs(body_html: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut last = 0;
    for m in CLOSING_P_RE.find_iter(body_html) {
        parts.push(body_html[last..m.end()].to_string());
        last = m.end();
    }
    let tail = body_html[last..].trim();
    if !tail.is_empty() {
        parts.push(tail.to_string());
    }
    parts
}

/// Where (and what) to pull-quote: the first plaintext sentence of
/// qualifying length, placed at paragraph index `floor(count / 2)`.
fn pullquote_slot(
    article: &Article,
    decision: &LayoutDecision,
    paragraph_count: usize,
) -> Option<(usize, String)> {
    let policy = decision.variant.pullquote?;
    if !policy.allow || paragraph_count < policy.min_paragraph {
        return None;
    }
    let text = strip_tags(&article.body_html);
    let sentence = SENTENCE_RE
        .split(&text)
        .map(str::trim)
        .find(|s| (PULLQUOTE_MIN_CHARS..=PULLQUOTE_MAX_CHARS).contains(&s.chars().count()))?;
    Some((paragraph_count / 2, sentence.to_string()))
}

fn imprint_section(issue: &Issue, pack: &TemplatePack) -> String {
    format!(
        "<section class=\"imprint\">\n<h2>Impressum</h2>\n\
         <div class=\"imprint-block\"><h3>Verlag</h3><p>Folio Verlags GmbH, Hamburg</p></div>\n\
         <div class=\"imprint-block\"><h3>Redaktion</h3><p>Folio Redaktionsteam</p></div>\n\
         <div class=\"imprint-block\"><h3>Ausgabe</h3><p>{} &middot; {}</p></div>\n\
         <div class=\"imprint-block\"><h3>Gestaltung</h3><p>{} (Version {})</p></div>\n\
         <p class=\"imprint-copyright\">&copy; {} Folio Verlags GmbH. Alle Rechte vorbehalten.</p>\n\
         </section>\n",
        escape_html(&issue.title),
        localized_date(issue.date),
        escape_html(&pack.name),
        escape_html(&pack.version),
        issue.date.year()
    )
}
