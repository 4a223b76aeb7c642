/*
 * job/stages/mod.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * The standard render job stages.
 */

//! The standard render job stages, in pipeline order:
//!
//! load (10-25) -> decide (25-50) -> compose (50-70) ->
//! render (70-85) -> persist (85-95)
//!
//! The supervisor reports 100 when it records completion.

mod compose;
mod decide;
mod load;
mod persist;
mod render;

pub use compose::ComposeStage;
pub use decide::DecideStage;
pub use load::LoadStage;
pub use persist::{slug, PersistStage};
pub use render::RenderStage;
