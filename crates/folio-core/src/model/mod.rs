/*
 * model/mod.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Domain model: issues, articles, images, template packs, render jobs.
 */

//! Domain model for the composition core.
//!
//! These are the entities the pipeline reads and writes:
//!
//! - [`Issue`] / [`Article`] / [`Image`] - the content being laid out
//! - [`TemplatePack`] / [`Variant`] / [`RuleSet`] - the layout recipes
//! - [`RenderJob`] - one render request driven to a terminal state

pub mod issue;
pub mod job;
pub mod pack;

pub use issue::{Article, ArticleKind, Image, ImageRole, Issue, IssueStatus};
pub use job::{DecisionSummary, JobStatus, RenderJob, RendererKind};
pub use pack::{
    BodyBounds, HeroBounds, ImageRules, LayoutRules, PullquotePolicy, RuleSet, TemplatePack,
    TypographyRules, Variant,
};
