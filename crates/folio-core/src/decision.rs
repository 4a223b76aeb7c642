/*
 * decision.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Layout decision engine: scored variant selection per article.
 */

//! Layout decision engine.
//!
//! For one article, [`decide`] evaluates every variant in a template
//! pack against the article's measured metrics and returns the
//! highest-scoring candidate; ties go to the earlier variant. Each
//! candidate starts at 100 and takes fixed additive adjustments, so
//! bonuses can push a score above 100 - that is intentional and only
//! the lower bound is clamped (at 0).
//!
//! The engine is a pure function: values in, one [`LayoutDecision`]
//! out, no I/O.

use crate::analyzer::ArticleMetrics;
use crate::model::{RuleSet, Variant};

/// Multiplier converting `font * leading` into abstract line height
/// units for the overflow estimate.
const LINE_UNIT_FACTOR: f32 = 1.33;

/// Column height (abstract units) beyond which overflow is likely.
const OVERFLOW_THRESHOLD: f32 = 1000.0;

/// Words below which an article is "short" for typography purposes.
const SHORT_WORDS: usize = 300;

/// Words above which an article is "long" for typography purposes.
const LONG_WORDS: usize = 800;

/// The selected variant plus the derived numeric parameters for one
/// article under one pack.
#[derive(Debug, Clone)]
pub struct LayoutDecision {
    /// The winning variant (synthetic single-column for fallbacks).
    pub variant: Variant,
    /// Body font size in pt, rounded to 1 decimal.
    pub font_size: f32,
    /// Unitless line height, rounded to 2 decimals.
    pub line_height: f32,
    /// Hero block height in vh, when the variant has hero bounds and
    /// the article has a hero image.
    pub hero_height_vh: Option<f32>,
    /// Always equals `variant.columns`.
    pub column_count: u8,
    /// Clamped at 0; uncapped above.
    pub score: i32,
    pub warnings: Vec<String>,
}

/// Decide a layout for one article.
///
/// Returns the fallback decision when `variants` is empty or no
/// variant yields a valid candidate.
pub fn decide(metrics: &ArticleMetrics, variants: &[Variant], rules: &RuleSet) -> LayoutDecision {
    let mut best: Option<LayoutDecision> = None;

    for variant in variants {
        let Some(candidate) = evaluate(variant, metrics, rules) else {
            continue;
        };
        // Strict comparison keeps the earlier variant on ties.
        let better = match &best {
            Some(current) => candidate.score > current.score,
            None => true,
        };
        if better {
            best = Some(candidate);
        }
    }

    best.unwrap_or_else(|| fallback_decision(rules))
}

/// Column count best suited to the article's word count.
pub fn optimal_columns(metrics: &ArticleMetrics) -> u8 {
    match metrics.word_count {
        w if w < 200 => 1,
        w if w < 500 => 2,
        _ => 3,
    }
}

/// Evaluate a single variant. `None` for variants the engine cannot
/// score (a column count outside 1..=3).
fn evaluate(variant: &Variant, metrics: &ArticleMetrics, rules: &RuleSet) -> Option<LayoutDecision> {
    if !(1..=3).contains(&variant.columns) {
        return None;
    }

    let words = metrics.word_count;
    let columns = variant.columns;
    let (font_size, line_height) = optimize_typography(variant, metrics, rules);

    let mut score: i32 = 100;
    let mut warnings = Vec::new();

    // Column fit
    if columns > optimal_columns(metrics) {
        score -= 15;
        warnings.push(format!(
            "{columns} columns may be too many for {words} words"
        ));
    }

    // Hero presence vs article length
    let hero_required = rules.images.hero_required_words;
    if variant.hero.is_some() {
        if metrics.hero_image.is_some() {
            if words >= hero_required {
                score += 10;
            } else {
                score -= 5;
            }
        } else if words > hero_required {
            score -= 20;
            warnings.push("Long article would benefit from hero image".to_string());
        }
    }

    // Font clamped against the pack-wide bounds
    if font_size <= rules.typography.font_min {
        score -= 25;
        warnings.push("Font size at minimum limit".to_string());
    }
    if font_size >= rules.typography.font_max {
        score -= 10;
        warnings.push("Font size at maximum limit".to_string());
    }

    // Overflow risk
    let lines_per_column = metrics.estimated_lines.div_ceil(columns as usize);
    let column_height = font_size * line_height * LINE_UNIT_FACTOR * lines_per_column as f32;
    if column_height > OVERFLOW_THRESHOLD {
        score -= 30;
        warnings.push("Text may overflow page boundaries".to_string());
    }

    // Image density
    if metrics.inline_images.len() > columns as usize * rules.images.max_images_per_column {
        score -= 15;
        warnings.push("Too many images for column layout".to_string());
    }

    // Long paragraphs in narrow columns
    if metrics.has_long_paragraphs && columns > 2 {
        score -= 10;
        warnings.push(
            "Long paragraphs in narrow columns may affect readability".to_string(),
        );
    }

    // Pullquote bonus
    if let Some(pq) = variant.pullquote {
        if pq.allow && metrics.paragraph_count >= pq.min_paragraph {
            score += 5;
        }
    }

    let hero_height_vh = variant.hero.and_then(|bounds| {
        metrics.hero_image.as_ref().map(|_| {
            if words >= hero_required {
                bounds.max_vh
            } else {
                bounds.min_vh
            }
        })
    });

    Some(LayoutDecision {
        variant: variant.clone(),
        font_size,
        line_height,
        hero_height_vh,
        column_count: columns,
        score: score.max(0),
        warnings,
    })
}

/// Pick a font size and line height for the variant's bounds.
fn optimize_typography(
    variant: &Variant,
    metrics: &ArticleMetrics,
    rules: &RuleSet,
) -> (f32, f32) {
    let (lo, hi) = variant.font_bounds(rules);
    let (lh_lo, lh_hi) = variant.leading_bounds(rules);

    let mut font = if metrics.word_count < SHORT_WORDS {
        lo + 0.5
    } else if metrics.word_count > LONG_WORDS {
        hi - 0.3
    } else {
        lo + 0.2
    };
    if variant.columns > 2 {
        font = (font - 0.2).max(lo);
    }
    let font = round1(font);

    let t = if hi == lo { 0.0 } else { (font - lo) / (hi - lo) };
    let leading = round2(lh_lo + t * (lh_hi - lh_lo));

    (font, leading)
}

/// Decision used when no variant can be evaluated.
fn fallback_decision(rules: &RuleSet) -> LayoutDecision {
    let variant = Variant {
        id: "fallback".to_string(),
        columns: 1,
        hero: None,
        body: None,
        pullquote: None,
    };
    let column_count = variant.columns.min(2);
    LayoutDecision {
        variant,
        font_size: rules.typography.font_min,
        line_height: rules.typography.line_height_min,
        hero_height_vh: None,
        column_count,
        score: 50,
        warnings: vec!["Using fallback layout decision".to_string()],
    }
}

fn round1(x: f32) -> f32 {
    (x * 10.0).round() / 10.0
}

fn round2(x: f32) -> f32 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        BodyBounds, HeroBounds, Image, ImageRole, ImageRules, LayoutRules, PullquotePolicy,
        TypographyRules,
    };

    fn rules() -> RuleSet {
        RuleSet {
            typography: TypographyRules {
                font_min: 9.5,
                font_max: 12.0,
                line_height_min: 1.3,
                line_height_max: 1.5,
            },
            layout: LayoutRules {
                max_columns: 3,
                min_text_length: 100,
                max_text_length: 25_000,
            },
            images: ImageRules {
                hero_required_words: 300,
                max_images_per_column: 2,
            },
        }
    }

    fn hero_image() -> Image {
        Image {
            src: "https://example.org/hero.jpg".to_string(),
            role: ImageRole::Hero,
            caption: None,
            credit: None,
            focal_point: None,
            width_px: None,
            height_px: None,
            dpi: None,
        }
    }

    fn metrics(words: usize, paragraphs: usize, hero: bool) -> ArticleMetrics {
        ArticleMetrics {
            word_count: words,
            paragraph_count: paragraphs,
            char_count: words * 6,
            hero_image: hero.then(hero_image),
            inline_images: Vec::new(),
            has_long_paragraphs: false,
            estimated_lines: words.div_ceil(10),
        }
    }

    fn variant(id: &str, columns: u8) -> Variant {
        Variant {
            id: id.to_string(),
            columns,
            hero: None,
            body: None,
            pullquote: None,
        }
    }

    #[test]
    fn test_optimal_columns_thresholds() {
        assert_eq!(optimal_columns(&metrics(199, 1, false)), 1);
        assert_eq!(optimal_columns(&metrics(200, 1, false)), 2);
        assert_eq!(optimal_columns(&metrics(499, 1, false)), 2);
        assert_eq!(optimal_columns(&metrics(500, 1, false)), 3);
    }

    /// Short article with a hero image: both candidates land on 80 and
    /// the tie goes to the earlier variant.
    #[test]
    fn test_short_hero_article_prefers_earlier_variant_on_tie() {
        let body = BodyBounds {
            font_min: 9.5,
            font_max: 10.0,
            leading: [1.3, 1.5],
        };
        let a = Variant {
            id: "a".to_string(),
            columns: 2,
            hero: Some(HeroBounds {
                min_vh: 30.0,
                max_vh: 50.0,
            }),
            body: Some(body),
            pullquote: None,
        };
        let b = Variant {
            id: "b".to_string(),
            columns: 3,
            hero: Some(HeroBounds {
                min_vh: 40.0,
                max_vh: 60.0,
            }),
            body: Some(body),
            pullquote: None,
        };

        let m = metrics(120, 5, true);
        let decision = decide(&m, &[a, b], &rules());

        assert_eq!(decision.variant.id, "a");
        // 100 - 15 (columns over optimal) - 5 (hero on short article)
        assert_eq!(decision.score, 80);
        assert_eq!(decision.font_size, 10.0);
        assert_eq!(decision.line_height, 1.5);
        assert_eq!(decision.hero_height_vh, Some(30.0));
        assert_eq!(decision.column_count, 2);
    }

    #[test]
    fn test_long_article_missing_hero_is_penalized() {
        let mut v = variant("hero-led", 2);
        v.hero = Some(HeroBounds {
            min_vh: 30.0,
            max_vh: 50.0,
        });

        let m = metrics(1200, 12, false);
        let decision = decide(&m, &[v], &rules());

        assert!(decision
            .warnings
            .iter()
            .any(|w| w == "Long article would benefit from hero image"));
        assert!(decision.hero_height_vh.is_none());
    }

    #[test]
    fn test_hero_bonus_on_long_article() {
        let mut with_hero = variant("hero-led", 3);
        with_hero.hero = Some(HeroBounds {
            min_vh: 30.0,
            max_vh: 50.0,
        });
        let plain = variant("plain", 3);

        let m = metrics(900, 10, true);
        let decision = decide(&m, &[plain, with_hero], &rules());

        // +10 hero bonus beats the otherwise identical plain variant
        assert_eq!(decision.variant.id, "hero-led");
        assert_eq!(decision.hero_height_vh, Some(50.0));
    }

    #[test]
    fn test_empty_variant_list_falls_back() {
        let m = metrics(400, 6, false);
        let decision = decide(&m, &[], &rules());

        assert_eq!(decision.variant.id, "fallback");
        assert_eq!(decision.score, 50);
        assert_eq!(decision.column_count, 1);
        assert_eq!(decision.font_size, rules().typography.font_min);
        assert_eq!(decision.line_height, rules().typography.line_height_min);
        assert_eq!(decision.warnings, vec!["Using fallback layout decision"]);
    }

    #[test]
    fn test_invalid_columns_fall_back() {
        let m = metrics(400, 6, false);
        let decision = decide(&m, &[variant("zero", 0)], &rules());
        assert_eq!(decision.variant.id, "fallback");
    }

    #[test]
    fn test_long_paragraphs_in_three_columns_warn() {
        let mut m = metrics(600, 4, false);
        m.has_long_paragraphs = true;

        let three = decide(&m, &[variant("three", 3)], &rules());
        assert!(three
            .warnings
            .iter()
            .any(|w| w == "Long paragraphs in narrow columns may affect readability"));

        let two = decide(&m, &[variant("two", 2)], &rules());
        assert!(!two
            .warnings
            .iter()
            .any(|w| w.contains("narrow columns")));
    }

    #[test]
    fn test_column_overage_warning_text() {
        let m = metrics(150, 3, false);
        let decision = decide(&m, &[variant("wide", 3)], &rules());
        assert!(decision
            .warnings
            .iter()
            .any(|w| w == "3 columns may be too many for 150 words"));
    }

    #[test]
    fn test_overflow_warning_on_very_long_single_column() {
        let m = metrics(5000, 40, false);
        let decision = decide(&m, &[variant("single", 1)], &rules());
        assert!(decision
            .warnings
            .iter()
            .any(|w| w == "Text may overflow page boundaries"));
    }

    #[test]
    fn test_image_density_warning() {
        let mut m = metrics(400, 6, false);
        m.inline_images = (0..5)
            .map(|i| Image {
                src: format!("img-{i}"),
                role: ImageRole::Inline,
                caption: None,
                credit: None,
                focal_point: None,
                width_px: None,
                height_px: None,
                dpi: None,
            })
            .collect();

        // 5 inline images > 2 columns * 2 per column
        let decision = decide(&m, &[variant("two", 2)], &rules());
        assert!(decision
            .warnings
            .iter()
            .any(|w| w == "Too many images for column layout"));
    }

    #[test]
    fn test_font_floor_and_ceiling_warnings() {
        // Bounds force the optimized font onto the pack-wide floor
        let mut floor = variant("floor", 2);
        floor.body = Some(BodyBounds {
            font_min: 9.0,
            font_max: 12.0,
            leading: [1.3, 1.5],
        });
        let m = metrics(120, 3, false);
        let decision = decide(&m, &[floor], &rules());
        // lo + 0.5 = 9.5 == rules.font_min
        assert!(decision
            .warnings
            .iter()
            .any(|w| w == "Font size at minimum limit"));

        let mut ceiling = variant("ceiling", 2);
        ceiling.body = Some(BodyBounds {
            font_min: 11.0,
            font_max: 12.3,
            leading: [1.3, 1.5],
        });
        let m = metrics(1000, 10, false);
        let decision = decide(&m, &[ceiling], &rules());
        // hi - 0.3 = 12.0 == rules.font_max
        assert!(decision
            .warnings
            .iter()
            .any(|w| w == "Font size at maximum limit"));
    }

    #[test]
    fn test_font_stays_within_variant_bounds() {
        for words in [50, 120, 300, 450, 799, 801, 2000] {
            for columns in 1..=3u8 {
                let m = metrics(words, 8, false);
                let decision = decide(&m, &[variant("v", columns)], &rules());
                let r = rules().typography;
                assert!(decision.font_size >= r.font_min);
                assert!(decision.font_size <= r.font_max);
                assert_eq!(decision.column_count, columns);
            }
        }
    }

    #[test]
    fn test_narrow_columns_shrink_font() {
        let m = metrics(120, 3, false);
        let two = decide(&m, &[variant("two", 2)], &rules()).font_size;
        let three = decide(&m, &[variant("three", 3)], &rules()).font_size;
        assert!(three < two);
        assert_eq!(round1(two - three), 0.2);
    }

    #[test]
    fn test_pullquote_bonus_requires_paragraphs() {
        let mut v = variant("pq", 1);
        v.pullquote = Some(PullquotePolicy {
            allow: true,
            min_paragraph: 5,
        });

        let short = decide(&metrics(150, 3, false), &[v.clone()], &rules());
        let long = decide(&metrics(150, 6, false), &[v], &rules());
        assert_eq!(long.score - short.score, 5);
    }

    #[test]
    fn test_score_is_clamped_at_zero() {
        let mut m = metrics(5000, 40, false);
        m.has_long_paragraphs = true;
        m.inline_images = (0..20)
            .map(|i| Image {
                src: format!("img-{i}"),
                role: ImageRole::Inline,
                caption: None,
                credit: None,
                focal_point: None,
                width_px: None,
                height_px: None,
                dpi: None,
            })
            .collect();

        let mut v = variant("doomed", 3);
        v.hero = Some(HeroBounds {
            min_vh: 30.0,
            max_vh: 50.0,
        });
        v.body = Some(BodyBounds {
            font_min: 9.5,
            font_max: 9.5,
            leading: [1.3, 1.3],
        });

        let decision = decide(&m, &[v], &rules());
        assert_eq!(decision.score, 0);
    }

    #[test]
    fn test_score_can_exceed_100() {
        let mut v = variant("blessed", 3);
        v.hero = Some(HeroBounds {
            min_vh: 30.0,
            max_vh: 50.0,
        });
        v.body = Some(BodyBounds {
            font_min: 10.0,
            font_max: 11.0,
            leading: [1.3, 1.5],
        });
        v.pullquote = Some(PullquotePolicy {
            allow: true,
            min_paragraph: 2,
        });

        // 600 words: 3 columns is optimal, hero present and long enough
        let decision = decide(&metrics(600, 8, true), &[v], &rules());
        assert_eq!(decision.score, 115);
    }

    #[test]
    fn test_degenerate_font_range_uses_lo_leading() {
        let mut v = variant("fixed", 1);
        v.body = Some(BodyBounds {
            font_min: 10.0,
            font_max: 10.0,
            leading: [1.3, 1.5],
        });
        let decision = decide(&metrics(500, 5, false), &[v], &rules());
        // t defined as 0 when hi == lo
        assert_eq!(decision.line_height, 1.3);
    }
}
