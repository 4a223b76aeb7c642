/*
 * model/pack.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Template pack, variant and rule set records.
 */

//! Template packs: the layout recipes the decision engine scores.
//!
//! A pack owns an ordered list of [`Variant`]s and one pack-wide
//! [`RuleSet`]. Variants may omit their typography or hero bounds, in
//! which case the rule set supplies the clamps. Packs are immutable,
//! versioned values: a job loads its pack once and never observes later
//! edits. Toggling `is_active` is a repository write, not a mutation of
//! a cached pack.
//!
//! All records are closed - unknown keys are rejected at intake.

use serde::{Deserialize, Serialize};

/// A bundle of variants and rules defining one visual identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplatePack {
    pub id: String,
    pub name: String,
    pub version: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Ordered: earlier variants win score ties.
    pub variants: Vec<Variant>,
    pub rules: RuleSet,
}

fn default_true() -> bool {
    true
}

/// One layout recipe within a pack.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Variant {
    /// Identity, unique within the pack.
    pub id: String,
    /// Column count, 1..=3.
    pub columns: u8,
    pub hero: Option<HeroBounds>,
    pub body: Option<BodyBounds>,
    pub pullquote: Option<PullquotePolicy>,
}

/// Hero image height bounds, in viewport-height percent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeroBounds {
    pub min_vh: f32,
    pub max_vh: f32,
}

/// Per-variant body typography bounds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BodyBounds {
    /// Minimum body font size in pt.
    pub font_min: f32,
    /// Maximum body font size in pt.
    pub font_max: f32,
    /// Line-height range `[lo, hi]`, unitless.
    pub leading: [f32; 2],
}

/// Pullquote policy for a variant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PullquotePolicy {
    pub allow: bool,
    /// Minimum paragraph count before a pullquote is considered.
    pub min_paragraph: usize,
}

/// Pack-wide clamps used when a variant omits a field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSet {
    pub typography: TypographyRules,
    pub layout: LayoutRules,
    pub images: ImageRules,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypographyRules {
    pub font_min: f32,
    pub font_max: f32,
    pub line_height_min: f32,
    pub line_height_max: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutRules {
    pub max_columns: u8,
    /// Shortest body (in characters) the pack is designed for.
    pub min_text_length: usize,
    /// Longest body (in characters) the pack is designed for.
    pub max_text_length: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageRules {
    /// Word count at which a hero image is expected.
    pub hero_required_words: usize,
    pub max_images_per_column: usize,
}

impl Variant {
    /// Body font bounds, falling back to the pack rules.
    pub fn font_bounds(&self, rules: &RuleSet) -> (f32, f32) {
        match self.body {
            Some(b) => (b.font_min, b.font_max),
            None => (rules.typography.font_min, rules.typography.font_max),
        }
    }

    /// Line-height bounds, falling back to the pack rules.
    pub fn leading_bounds(&self, rules: &RuleSet) -> (f32, f32) {
        match self.body {
            Some(b) => (b.leading[0], b.leading[1]),
            None => (
                rules.typography.line_height_min,
                rules.typography.line_height_max,
            ),
        }
    }

    /// Whether this variant permits a pullquote at all.
    pub fn allows_pullquote(&self) -> bool {
        self.pullquote.map(|p| p.allow).unwrap_or(false)
    }
}
