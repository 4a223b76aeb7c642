/*
 * css.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Per-article CSS emitter.
 */

//! Per-article CSS emitter.
//!
//! [`emit_article_css`] turns one [`LayoutDecision`] into the CSS
//! fragment scoped to that article's `<article>` container. All sizes
//! derive deterministically from the decided body font size, so two
//! identical decisions always emit byte-identical CSS.

use std::fmt::Write as _;

use crate::decision::LayoutDecision;
use crate::model::Article;

/// Emit the scoped CSS block for one article.
///
/// The fragment is meant to be wrapped in a `<style>` element emitted
/// directly before the article's markup; every selector is prefixed
/// with the article's container id.
pub fn emit_article_css(decision: &LayoutDecision, article: &Article) -> String {
    let scope = format!("#article-{}", article.id);
    let f = decision.font_size;
    let mut css = String::with_capacity(1024);

    // Header block spans all columns and must stay with the body.
    let _ = writeln!(
        css,
        "{scope} .article-title {{\n  font-size: {}pt;\n  line-height: 1.2;\n  column-span: all;\n  break-after: avoid;\n}}",
        scaled(f, 2.8)
    );
    let _ = writeln!(
        css,
        "{scope} .article-dek {{\n  font-size: {}pt;\n  line-height: 1.4;\n  column-span: all;\n}}",
        scaled(f, 1.2)
    );
    let _ = writeln!(
        css,
        "{scope} .article-byline {{\n  font-size: {}pt;\n  text-transform: uppercase;\n  letter-spacing: 0.5px;\n}}",
        scaled(f, 0.9)
    );

    let _ = writeln!(
        css,
        "{scope} .article-body {{\n  font-size: {f}pt;\n  line-height: {};\n  column-count: {};\n  column-gap: 24px;\n  column-fill: balance;\n  hyphens: auto;\n  orphans: 2;\n  widows: 2;\n}}",
        decision.line_height, decision.column_count
    );
    let _ = writeln!(
        css,
        "{scope} .article-body > p:first-of-type::first-letter {{\n  font-size: {}pt;\n  float: left;\n  line-height: 0.9;\n  padding-right: 6px;\n  font-weight: 700;\n}}",
        scaled(f, 3.5)
    );
    let _ = writeln!(
        css,
        "{scope} .article-body p {{\n  margin: 0 0 {}pt 0;\n  break-inside: avoid-column;\n}}",
        scaled(f, 0.8)
    );

    if let Some(vh) = decision.hero_height_vh {
        let _ = writeln!(
            css,
            "{scope} .hero-image {{\n  height: {vh}vh;\n  column-span: all;\n  break-after: avoid;\n}}"
        );
    }

    if decision.variant.allows_pullquote() {
        let span = if decision.column_count > 2 { "2" } else { "all" };
        let _ = writeln!(
            css,
            "{scope} .pullquote {{\n  font-size: {}pt;\n  column-span: {span};\n  break-inside: avoid;\n}}",
            scaled(f, 1.4)
        );
    }

    let _ = writeln!(
        css,
        "{scope} figcaption .caption {{\n  font-size: {}pt;\n  font-style: italic;\n}}",
        scaled(f, 0.85)
    );
    let _ = writeln!(
        css,
        "{scope} figcaption .credit {{\n  font-size: {}pt;\n  text-transform: uppercase;\n}}",
        scaled(f, 0.75)
    );

    css
}

/// `round(font * factor)` as an integer point size.
fn scaled(font: f32, factor: f32) -> i32 {
    (font * factor).round() as i32
}
