/*
 * packs.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Built-in template packs.
 */

//! Built-in template packs.
//!
//! Two packs ship with the engine: `modern` (restrained, two-column
//! oriented) and `magazine` (denser, up to three columns with
//! pullquotes). Custom packs load from JSON through the intake layer;
//! these are the defaults used when a job names no pack.

use crate::model::{
    BodyBounds, HeroBounds, ImageRules, LayoutRules, PullquotePolicy, RuleSet, TemplatePack,
    TypographyRules, Variant,
};

/// The pack used when a render request names none.
pub const DEFAULT_PACK_ID: &str = "modern";

/// Look up a built-in pack by id.
pub fn builtin(id: &str) -> Option<TemplatePack> {
    match id {
        "modern" => Some(modern()),
        "magazine" => Some(magazine()),
        _ => None,
    }
}

/// Ids of all built-in packs, in presentation order.
pub fn builtin_ids() -> &'static [&'static str] {
    &["modern", "magazine"]
}

/// Modern Pack: generous type, at most two columns.
pub fn modern() -> TemplatePack {
    TemplatePack {
        id: "modern".to_string(),
        name: "Modern Pack".to_string(),
        version: "2.1".to_string(),
        is_active: true,
        variants: vec![
            Variant {
                id: "single-spacious".to_string(),
                columns: 1,
                hero: Some(HeroBounds {
                    min_vh: 35.0,
                    max_vh: 55.0,
                }),
                body: Some(BodyBounds {
                    font_min: 10.0,
                    font_max: 12.0,
                    leading: [1.4, 1.6],
                }),
                pullquote: Some(PullquotePolicy {
                    allow: true,
                    min_paragraph: 4,
                }),
            },
            Variant {
                id: "double-standard".to_string(),
                columns: 2,
                hero: Some(HeroBounds {
                    min_vh: 30.0,
                    max_vh: 45.0,
                }),
                body: None,
                pullquote: Some(PullquotePolicy {
                    allow: true,
                    min_paragraph: 6,
                }),
            },
        ],
        rules: RuleSet {
            typography: TypographyRules {
                font_min: 9.5,
                font_max: 12.0,
                line_height_min: 1.35,
                line_height_max: 1.6,
            },
            layout: LayoutRules {
                max_columns: 2,
                min_text_length: 200,
                max_text_length: 18_000,
            },
            images: ImageRules {
                hero_required_words: 300,
                max_images_per_column: 2,
            },
        },
    }
}

/// Magazine Pack: dense reportage layouts, up to three columns.
pub fn magazine() -> TemplatePack {
    TemplatePack {
        id: "magazine".to_string(),
        name: "Magazine Pack".to_string(),
        version: "1.4".to_string(),
        is_active: true,
        variants: vec![
            Variant {
                id: "double-lead".to_string(),
                columns: 2,
                hero: Some(HeroBounds {
                    min_vh: 40.0,
                    max_vh: 60.0,
                }),
                body: Some(BodyBounds {
                    font_min: 9.0,
                    font_max: 10.5,
                    leading: [1.3, 1.45],
                }),
                pullquote: Some(PullquotePolicy {
                    allow: true,
                    min_paragraph: 5,
                }),
            },
            Variant {
                id: "triple-dense".to_string(),
                columns: 3,
                hero: None,
                body: Some(BodyBounds {
                    font_min: 8.5,
                    font_max: 9.5,
                    leading: [1.25, 1.35],
                }),
                pullquote: Some(PullquotePolicy {
                    allow: true,
                    min_paragraph: 8,
                }),
            },
            Variant {
                id: "single-essay".to_string(),
                columns: 1,
                hero: Some(HeroBounds {
                    min_vh: 30.0,
                    max_vh: 50.0,
                }),
                body: None,
                pullquote: None,
            },
        ],
        rules: RuleSet {
            typography: TypographyRules {
                font_min: 8.5,
                font_max: 11.0,
                line_height_min: 1.25,
                line_height_max: 1.5,
            },
            layout: LayoutRules {
                max_columns: 3,
                min_text_length: 150,
                max_text_length: 25_000,
            },
            images: ImageRules {
                hero_required_words: 400,
                max_images_per_column: 3,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        assert!(builtin("modern").is_some());
        assert!(builtin("magazine").is_some());
        assert!(builtin("nope").is_none());
    }

    #[test]
    fn test_builtin_ids_resolve() {
        for id in builtin_ids() {
            let pack = builtin(id).unwrap();
            assert_eq!(&pack.id, id);
            assert!(!pack.variants.is_empty());
        }
    }

    #[test]
    fn test_pack_invariants() {
        for id in builtin_ids() {
            let pack = builtin(id).unwrap();
            let t = &pack.rules.typography;
            assert!(t.font_min < t.font_max);
            assert!(t.line_height_min < t.line_height_max);
            for variant in &pack.variants {
                assert!((1..=3).contains(&variant.columns));
                if let Some(hero) = variant.hero {
                    assert!(hero.min_vh <= hero.max_vh);
                }
                if let Some(body) = variant.body {
                    assert!(body.font_min <= body.font_max);
                    assert!(body.leading[0] <= body.leading[1]);
                }
            }
        }
    }
}
