/*
 * analyzer.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Article analyzer: measured metrics feeding the decision engine.
 */

//! Article analyzer.
//!
//! [`analyze`] reduces an article to the handful of numbers the
//! decision engine scores against: word and paragraph counts, long
//! paragraph detection, image roles, and a rough line estimate.
//!
//! Tag handling is purely lexical - any `<...>` run is replaced by a
//! space - so malformed HTML never fails analysis, it just degrades
//! the counts.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{Article, Image};

/// Words per estimated rendered line.
const WORDS_PER_LINE: usize = 10;

/// Paragraphs longer than this many words count as "long".
const LONG_PARAGRAPH_WORDS: usize = 100;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static PARAGRAPH_BOUNDARY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</p>|<p[^>]*>").unwrap());
static CLOSING_P_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</p>").unwrap());

/// Measured metrics for one article. Derived, never persisted.
#[derive(Debug, Clone)]
pub struct ArticleMetrics {
    pub word_count: usize,
    pub paragraph_count: usize,
    /// Character count of the stripped, whitespace-collapsed text.
    pub char_count: usize,
    /// First image with the hero role, if any.
    pub hero_image: Option<Image>,
    /// All inline images, in input order.
    pub inline_images: Vec<Image>,
    /// Any single paragraph longer than 100 words.
    pub has_long_paragraphs: bool,
    /// `ceil(word_count / 10)`.
    pub estimated_lines: usize,
}

/// Analyze an article. Total: every input produces a metrics record.
pub fn analyze(article: &Article) -> ArticleMetrics {
    let text = strip_tags(&article.body_html);
    let word_count = text.split_whitespace().filter(|w| !w.is_empty()).count();
    let paragraph_count = CLOSING_P_RE.find_iter(&article.body_html).count();

    let has_long_paragraphs = PARAGRAPH_BOUNDARY_RE
        .split(&article.body_html)
        .any(|fragment| {
            strip_tags(fragment).split_whitespace().count() > LONG_PARAGRAPH_WORDS
        });

    ArticleMetrics {
        word_count,
        paragraph_count,
        char_count: text.chars().count(),
        hero_image: article.hero_image().cloned(),
        inline_images: article.inline_images().into_iter().cloned().collect(),
        has_long_paragraphs,
        estimated_lines: word_count.div_ceil(WORDS_PER_LINE),
    }
}

/// Replace every `<...>` run with a space, then collapse whitespace.
///
/// A `<` with no closing `>` swallows the rest of the input, matching
/// the lenient single-pass scan the rest of the pipeline assumes.
pub fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => {
                in_tag = true;
                out.push(' ');
            }
            '>' if in_tag => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    WHITESPACE_RE.replace_all(out.trim(), " ").into_owned()
}
