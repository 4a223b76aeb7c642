/*
 * job/data.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Data flowing between job pipeline stages.
 */

//! Data types for the render job pipeline.
//!
//! Everything that flows between stages is a variant of [`JobData`]:
//!
//! 1. [`RenderRequest`] - the job's identifiers (entry point)
//! 2. [`LoadedIssue`] - issue, articles and pack resolved from storage
//! 3. [`DecidedIssue`] - one layout decision per article
//! 4. [`ComposedDocument`] - the assembled paged-media document
//! 5. [`RenderedArtifact`] - artifact bytes ready to persist
//! 6. [`PersistedArtifact`] - the artifact's final path

use std::path::PathBuf;

use crate::compose::GeneratedTemplate;
use crate::decision::LayoutDecision;
use crate::model::{Article, Issue, TemplatePack};

/// Type tag for [`JobData`] variants.
///
/// Used for runtime validation of stage composition without matching
/// on the full data enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobDataKind {
    RenderRequest,
    LoadedIssue,
    DecidedIssue,
    ComposedDocument,
    RenderedArtifact,
    PersistedArtifact,
}

impl std::fmt::Display for JobDataKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            JobDataKind::RenderRequest => "RenderRequest",
            JobDataKind::LoadedIssue => "LoadedIssue",
            JobDataKind::DecidedIssue => "DecidedIssue",
            JobDataKind::ComposedDocument => "ComposedDocument",
            JobDataKind::RenderedArtifact => "RenderedArtifact",
            JobDataKind::PersistedArtifact => "PersistedArtifact",
        };
        write!(f, "{name}")
    }
}

/// All data shapes flowing through the pipeline.
#[derive(Debug)]
pub enum JobData {
    RenderRequest(RenderRequest),
    LoadedIssue(LoadedIssue),
    DecidedIssue(DecidedIssue),
    ComposedDocument(ComposedDocument),
    RenderedArtifact(RenderedArtifact),
    PersistedArtifact(PersistedArtifact),
}

impl JobData {
    /// Get the kind of this data without matching on contents.
    pub fn kind(&self) -> JobDataKind {
        match self {
            Self::RenderRequest(_) => JobDataKind::RenderRequest,
            Self::LoadedIssue(_) => JobDataKind::LoadedIssue,
            Self::DecidedIssue(_) => JobDataKind::DecidedIssue,
            Self::ComposedDocument(_) => JobDataKind::ComposedDocument,
            Self::RenderedArtifact(_) => JobDataKind::RenderedArtifact,
            Self::PersistedArtifact(_) => JobDataKind::PersistedArtifact,
        }
    }

    pub fn into_render_request(self) -> Option<RenderRequest> {
        match self {
            Self::RenderRequest(r) => Some(r),
            _ => None,
        }
    }

    pub fn into_loaded_issue(self) -> Option<LoadedIssue> {
        match self {
            Self::LoadedIssue(l) => Some(l),
            _ => None,
        }
    }

    pub fn into_decided_issue(self) -> Option<DecidedIssue> {
        match self {
            Self::DecidedIssue(d) => Some(d),
            _ => None,
        }
    }

    pub fn into_composed_document(self) -> Option<ComposedDocument> {
        match self {
            Self::ComposedDocument(c) => Some(c),
            _ => None,
        }
    }

    pub fn into_rendered_artifact(self) -> Option<RenderedArtifact> {
        match self {
            Self::RenderedArtifact(r) => Some(r),
            _ => None,
        }
    }

    pub fn into_persisted_artifact(self) -> Option<PersistedArtifact> {
        match self {
            Self::PersistedArtifact(p) => Some(p),
            _ => None,
        }
    }
}

/// The identifiers a job starts from. Both must resolve at load time
/// or the job fails before any decision is taken.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub issue_id: String,
    pub template_pack_id: String,
}

/// Issue, articles and pack as loaded from the repository.
///
/// Articles are ordered by the issue's section order, then insertion;
/// articles with unknown sections come last.
#[derive(Debug)]
pub struct LoadedIssue {
    pub issue: Issue,
    pub articles: Vec<Article>,
    pub pack: TemplatePack,
}

/// One layout decision per article, in article order.
#[derive(Debug)]
pub struct DecidedIssue {
    pub issue: Issue,
    pub pack: TemplatePack,
    pub articles: Vec<(Article, LayoutDecision)>,
}

/// The assembled document plus the identifiers artifact naming needs.
#[derive(Debug)]
pub struct ComposedDocument {
    pub issue_id: String,
    pub pack_name: String,
    pub template: GeneratedTemplate,
}

/// Artifact bytes ready to be written.
#[derive(Debug)]
pub struct RenderedArtifact {
    pub issue_id: String,
    pub pack_name: String,
    pub bytes: Vec<u8>,
    /// `pdf` for the primary path, `html` for the fallback.
    pub extension: &'static str,
    /// Page count reported by the renderer, when it reported one.
    pub page_count: Option<usize>,
}

/// The artifact's final location.
#[derive(Debug)]
pub struct PersistedArtifact {
    pub path: PathBuf,
}
