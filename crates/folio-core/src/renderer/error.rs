/*
 * renderer/error.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Error types for the renderer adapter.
 */

//! Error types for the renderer adapter.

use thiserror::Error;

/// Errors from the paged-media renderer adapter.
///
/// The render stage treats every variant as a downgrade trigger: the
/// job falls back to the HTML artifact instead of failing.
#[derive(Debug, Error)]
pub enum RenderError {
    /// No renderer binary could be located.
    #[error("Paged-media renderer not available: {0}")]
    NotAvailable(String),

    /// Pre-flight validation rejected the document.
    #[error("Template validation failed: {0}")]
    Validation(String),

    /// The hard per-render timeout elapsed.
    #[error("Render timed out after {0} seconds")]
    Timeout(u64),

    /// The renderer process failed.
    #[error("Renderer failed: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
