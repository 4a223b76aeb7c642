//! Core composition engine for Folio
//!
//! This crate turns a structured magazine issue into a print-ready,
//! paged-media document and drives render jobs to a persisted artifact.
//!
//! # Architecture
//!
//! The pipeline for one job is organized around these pieces:
//!
//! - [`analyzer`] - measures each article (pure)
//! - [`decision`] - scores template-pack variants per article (pure)
//! - [`css`] / [`compose`] - emit the per-article CSS and assemble the
//!   document (pure)
//! - [`job`] - the staged pipeline, progress reporting, cancellation
//!   and the supervisor that owns job state transitions
//! - [`renderer`] - the seam over the external paged-media engine plus
//!   the deterministic HTML fallback
//! - [`repository`] - the narrow storage contract
//!
//! The pure components take values and return values; only the
//! repository, the renderer adapter and artifact writes suspend.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use folio_core::intake;
//! use folio_core::job::{Cancellation, JobSupervisor, TracingSink};
//! use folio_core::model::{RenderJob, RendererKind};
//! use folio_core::renderer::PagedRenderer;
//! use folio_core::repository::{InMemoryRepository, Repository};
//!
//! let parsed = intake::parse_issue(&json)?;
//! let repository = Arc::new(InMemoryRepository::with_builtin_packs());
//! repository.store_issue(parsed.issue, parsed.articles).await?;
//!
//! let supervisor = JobSupervisor::new(
//!     repository,
//!     Arc::new(PagedRenderer::new()),
//!     "out",
//! );
//! let job = RenderJob::new("job-1", "2025-07", "modern", RendererKind::PagedPrimary);
//! let done = supervisor
//!     .process(job, Arc::new(TracingSink::new()), Cancellation::new())
//!     .await;
//! ```

pub mod analyzer;
pub mod compose;
pub mod css;
pub mod decision;
pub mod error;
pub mod intake;
pub mod job;
pub mod model;
pub mod packs;
pub mod renderer;
pub mod repository;

// Re-export commonly used types
pub use analyzer::{analyze, ArticleMetrics};
pub use compose::{compose, GeneratedTemplate, TemplateMetadata};
pub use decision::{decide, LayoutDecision};
pub use error::{FolioError, Result};
pub use job::{Cancellation, JobSupervisor, NoopSink, ProgressSink, TracingSink};
pub use model::{
    Article, ArticleKind, Image, ImageRole, Issue, IssueStatus, JobStatus, RenderJob,
    RendererKind, RuleSet, TemplatePack, Variant,
};
pub use renderer::{PagedMediaRenderer, PagedRenderer, PdfOptions, RenderError};
pub use repository::{InMemoryRepository, Repository, RepositoryError};
