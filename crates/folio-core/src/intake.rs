/*
 * intake.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Intake JSON parsing and validation.
 */

//! Intake: the one external format the core parses.
//!
//! [`parse_issue`] reads the issue-description JSON (issue metadata,
//! ordered sections, articles with images) into the typed model, and
//! [`parse_pack`] reads a template pack. Validation is strict about
//! shapes the engine depends on (dates, enums, focal points, variant
//! column counts) and lenient about content: a section name not listed
//! on the issue is a warning, not an error, and `body_html` is passed
//! through untouched.
//!
//! Stringly-typed wire values are parsed exactly once here. The rest
//! of the core only ever sees the typed forms.

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::model::{Article, ArticleKind, Image, ImageRole, Issue, IssueStatus, TemplatePack};

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Invalid intake document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid issue date '{value}': expected YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("Article '{article}': invalid focal_point '{value}': {reason}")]
    InvalidFocalPoint {
        article: String,
        value: String,
        reason: String,
    },

    #[error("Article id '{0}' appears more than once in the issue")]
    DuplicateArticle(String),

    #[error("Template pack '{pack}': variant '{variant}' has {columns} columns (allowed: 1-3)")]
    InvalidColumns {
        pack: String,
        variant: String,
        columns: u8,
    },

    #[error("Template pack '{pack}': variant '{variant}': {reason}")]
    InvalidVariant {
        pack: String,
        variant: String,
        reason: String,
    },

    #[error("Template pack '{0}' has no variants")]
    EmptyPack(String),
}

/// A parsed issue plus non-fatal findings.
#[derive(Debug)]
pub struct ParsedIssue {
    pub issue: Issue,
    pub articles: Vec<Article>,
    pub warnings: Vec<String>,
}

// ============================================================================
// Wire shapes
// ============================================================================

#[derive(Debug, Deserialize)]
struct WireDocument {
    issue: WireIssue,
    sections: Vec<String>,
    articles: Vec<WireArticle>,
}

#[derive(Debug, Deserialize)]
struct WireIssue {
    id: String,
    title: String,
    date: String,
}

#[derive(Debug, Deserialize)]
struct WireArticle {
    id: String,
    section: String,
    #[serde(rename = "type")]
    kind: ArticleKind,
    title: String,
    #[serde(default)]
    dek: Option<String>,
    author: String,
    body_html: String,
    #[serde(default)]
    images: Vec<WireImage>,
}

#[derive(Debug, Deserialize)]
struct WireImage {
    src: String,
    role: ImageRole,
    #[serde(default)]
    caption: Option<String>,
    #[serde(default)]
    credit: Option<String>,
    /// Wire form `"x,y"`, both in [0, 1].
    #[serde(default)]
    focal_point: Option<String>,
    #[serde(default)]
    width_px: Option<u32>,
    #[serde(default)]
    height_px: Option<u32>,
    #[serde(default)]
    dpi: Option<u32>,
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse and validate one intake document.
pub fn parse_issue(json: &str) -> Result<ParsedIssue, IntakeError> {
    let doc: WireDocument = serde_json::from_str(json)?;

    let date = NaiveDate::parse_from_str(&doc.issue.date, "%Y-%m-%d").map_err(|_| {
        IntakeError::InvalidDate {
            value: doc.issue.date.clone(),
        }
    })?;

    let issue = Issue {
        id: doc.issue.id,
        title: doc.issue.title,
        date,
        sections: doc.sections,
        status: IssueStatus::Draft,
    };

    let mut warnings = Vec::new();
    let mut seen_ids: Vec<&str> = Vec::new();
    let mut articles = Vec::with_capacity(doc.articles.len());

    for wire in &doc.articles {
        if seen_ids.contains(&wire.id.as_str()) {
            return Err(IntakeError::DuplicateArticle(wire.id.clone()));
        }
        seen_ids.push(&wire.id);

        if issue.section_index(&wire.section).is_none() {
            warnings.push(format!(
                "Article '{}' references unknown section '{}'",
                wire.id, wire.section
            ));
        }

        let mut images = Vec::with_capacity(wire.images.len());
        for img in &wire.images {
            images.push(Image {
                src: img.src.clone(),
                role: img.role,
                caption: img.caption.clone(),
                credit: img.credit.clone(),
                focal_point: img
                    .focal_point
                    .as_deref()
                    .map(|raw| parse_focal_point(&wire.id, raw))
                    .transpose()?,
                width_px: img.width_px,
                height_px: img.height_px,
                dpi: img.dpi,
            });
        }

        articles.push(Article {
            id: wire.id.clone(),
            issue_id: issue.id.clone(),
            section: wire.section.clone(),
            kind: wire.kind,
            title: wire.title.clone(),
            dek: wire.dek.clone(),
            author: wire.author.clone(),
            body_html: wire.body_html.clone(),
            images,
            created_at: Utc::now(),
        });
    }

    Ok(ParsedIssue {
        issue,
        articles,
        warnings,
    })
}

/// Parse `"x,y"` into a normalized pair, both components in [0, 1].
fn parse_focal_point(article: &str, raw: &str) -> Result<(f32, f32), IntakeError> {
    let err = |reason: &str| IntakeError::InvalidFocalPoint {
        article: article.to_string(),
        value: raw.to_string(),
        reason: reason.to_string(),
    };

    let mut parts = raw.split(',');
    let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(err("expected exactly two comma-separated numbers"));
    };
    let x: f32 = x.trim().parse().map_err(|_| err("x is not a number"))?;
    let y: f32 = y.trim().parse().map_err(|_| err("y is not a number"))?;
    if !(0.0..=1.0).contains(&x) || !(0.0..=1.0).contains(&y) {
        return Err(err("components must be within [0, 1]"));
    }
    Ok((x, y))
}

/// Parse and validate a template pack.
///
/// Packs are closed records: unknown keys fail deserialization. The
/// shape checks here keep the decision engine total - a pack that
/// passes intake never produces an unevaluable variant.
pub fn parse_pack(json: &str) -> Result<TemplatePack, IntakeError> {
    let pack: TemplatePack = serde_json::from_str(json)?;

    if pack.variants.is_empty() {
        return Err(IntakeError::EmptyPack(pack.id));
    }

    let mut seen: Vec<&str> = Vec::new();
    for variant in &pack.variants {
        if !(1..=3).contains(&variant.columns) {
            return Err(IntakeError::InvalidColumns {
                pack: pack.id.clone(),
                variant: variant.id.clone(),
                columns: variant.columns,
            });
        }
        let invalid = |reason: &str| IntakeError::InvalidVariant {
            pack: pack.id.clone(),
            variant: variant.id.clone(),
            reason: reason.to_string(),
        };
        if seen.contains(&variant.id.as_str()) {
            return Err(invalid("duplicate variant id"));
        }
        seen.push(&variant.id);

        if let Some(hero) = variant.hero {
            if hero.min_vh > hero.max_vh {
                return Err(invalid("hero min_vh exceeds max_vh"));
            }
        }
        if let Some(body) = variant.body {
            if body.font_min > body.font_max {
                return Err(invalid("body font_min exceeds font_max"));
            }
            if body.leading[0] > body.leading[1] {
                return Err(invalid("leading bounds are reversed"));
            }
        }
    }

    Ok(pack)
}
