/*
 * repository.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Repository seam between the core and the storage layer.
 */

//! Repository interface.
//!
//! The core's view of storage is deliberately narrow: look up an
//! issue, its articles, a template pack; upsert a job row. Updates to
//! any single row must be linearizable - the in-memory implementation
//! gets that from a single `RwLock`, a database-backed one from its
//! row locks. No cross-row transactions are required.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::model::{Article, Issue, IssueStatus, RenderJob, TemplatePack};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Repository IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Storage operations the core depends on.
#[async_trait]
pub trait Repository: Send + Sync {
    async fn issue(&self, issue_id: &str) -> Result<Option<Issue>, RepositoryError>;

    /// Articles of an issue, in insertion order.
    async fn articles_for_issue(&self, issue_id: &str)
        -> Result<Vec<Article>, RepositoryError>;

    async fn template_pack(&self, pack_id: &str)
        -> Result<Option<TemplatePack>, RepositoryError>;

    async fn render_job(&self, job_id: &str) -> Result<Option<RenderJob>, RepositoryError>;

    /// Linearizable per-row upsert of a job.
    async fn upsert_job(&self, job: &RenderJob) -> Result<(), RepositoryError>;

    /// Replace an issue and its articles wholesale (re-import semantics).
    async fn store_issue(
        &self,
        issue: Issue,
        articles: Vec<Article>,
    ) -> Result<(), RepositoryError>;

    async fn store_pack(&self, pack: TemplatePack) -> Result<(), RepositoryError>;

    /// Status transition on an issue row. A missing issue is a no-op.
    async fn set_issue_status(
        &self,
        issue_id: &str,
        status: IssueStatus,
    ) -> Result<(), RepositoryError>;
}

/// In-memory repository used by the CLI and tests.
#[derive(Default)]
pub struct InMemoryRepository {
    inner: RwLock<Store>,
}

#[derive(Default)]
struct Store {
    issues: HashMap<String, Issue>,
    articles: HashMap<String, Vec<Article>>,
    packs: HashMap<String, TemplatePack>,
    jobs: HashMap<String, RenderJob>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository pre-seeded with the built-in template packs.
    pub fn with_builtin_packs() -> Self {
        let mut store = Store::default();
        for id in crate::packs::builtin_ids() {
            let pack = crate::packs::builtin(id).expect("builtin pack");
            store.packs.insert(pack.id.clone(), pack);
        }
        Self {
            inner: RwLock::new(store),
        }
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn issue(&self, issue_id: &str) -> Result<Option<Issue>, RepositoryError> {
        Ok(self.inner.read().await.issues.get(issue_id).cloned())
    }

    async fn articles_for_issue(
        &self,
        issue_id: &str,
    ) -> Result<Vec<Article>, RepositoryError> {
        Ok(self
            .inner
            .read()
            .await
            .articles
            .get(issue_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn template_pack(
        &self,
        pack_id: &str,
    ) -> Result<Option<TemplatePack>, RepositoryError> {
        Ok(self.inner.read().await.packs.get(pack_id).cloned())
    }

    async fn render_job(&self, job_id: &str) -> Result<Option<RenderJob>, RepositoryError> {
        Ok(self.inner.read().await.jobs.get(job_id).cloned())
    }

    async fn upsert_job(&self, job: &RenderJob) -> Result<(), RepositoryError> {
        self.inner
            .write()
            .await
            .jobs
            .insert(job.id.clone(), job.clone());
        Ok(())
    }

    async fn store_issue(
        &self,
        issue: Issue,
        articles: Vec<Article>,
    ) -> Result<(), RepositoryError> {
        let mut store = self.inner.write().await;
        store.articles.insert(issue.id.clone(), articles);
        store.issues.insert(issue.id.clone(), issue);
        Ok(())
    }

    async fn store_pack(&self, pack: TemplatePack) -> Result<(), RepositoryError> {
        self.inner
            .write()
            .await
            .packs
            .insert(pack.id.clone(), pack);
        Ok(())
    }

    async fn set_issue_status(
        &self,
        issue_id: &str,
        status: IssueStatus,
    ) -> Result<(), RepositoryError> {
        if let Some(issue) = self.inner.write().await.issues.get_mut(issue_id) {
            issue.status = status;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::model::RendererKind;

    fn issue(id: &str) -> Issue {
        Issue {
            id: id.to_string(),
            title: "T".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            sections: vec!["politik".to_string()],
            status: IssueStatus::Draft,
        }
    }

    #[tokio::test]
    async fn test_issue_roundtrip() {
        let repo = InMemoryRepository::new();
        repo.store_issue(issue("i1"), Vec::new()).await.unwrap();

        assert!(repo.issue("i1").await.unwrap().is_some());
        assert!(repo.issue("i2").await.unwrap().is_none());
        assert!(repo.articles_for_issue("i1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reimport_replaces_articles() {
        let repo = InMemoryRepository::new();
        let a = crate::intake::parse_issue(
            r#"{
                "issue": { "id": "i1", "title": "T", "date": "2025-07-01" },
                "sections": ["politik"],
                "articles": [{
                    "id": "a1", "section": "politik", "type": "news",
                    "title": "Alt", "author": "X", "body_html": "<p>x</p>"
                }]
            }"#,
        )
        .unwrap();
        repo.store_issue(a.issue.clone(), a.articles).await.unwrap();
        assert_eq!(repo.articles_for_issue("i1").await.unwrap().len(), 1);

        // Re-import with no articles replaces wholesale
        repo.store_issue(a.issue, Vec::new()).await.unwrap();
        assert!(repo.articles_for_issue("i1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_job_upsert_and_fetch() {
        let repo = InMemoryRepository::new();
        let mut job = RenderJob::new("j1", "i1", "modern", RendererKind::PagedPrimary);
        repo.upsert_job(&job).await.unwrap();

        job.begin();
        job.advance_progress(25);
        repo.upsert_job(&job).await.unwrap();

        let stored = repo.render_job("j1").await.unwrap().unwrap();
        assert_eq!(stored.progress, 25);
    }

    #[tokio::test]
    async fn test_issue_status_transition() {
        let repo = InMemoryRepository::new();
        repo.store_issue(issue("i1"), Vec::new()).await.unwrap();

        repo.set_issue_status("i1", IssueStatus::Processing)
            .await
            .unwrap();
        assert_eq!(
            repo.issue("i1").await.unwrap().unwrap().status,
            IssueStatus::Processing
        );

        // Missing issue is a quiet no-op
        repo.set_issue_status("missing", IssueStatus::Failed)
            .await
            .unwrap();
    }
}
