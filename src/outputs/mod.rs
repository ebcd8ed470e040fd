//! Output generation for a run's results.
//!
//! # Submodules
//!
//! - [`message`]: Renders [`SourceResult`](crate::models::SourceResult)s into
//!   the Markdown text delivered to the chat

pub mod message;
