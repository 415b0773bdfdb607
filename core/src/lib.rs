//! wtlayout core — compile a declarative tab/pane layout document into a
//! single terminal control invocation.
//!
//! Pipeline: `data::node` parses the document, `layout::walker` builds the
//! `Action` tree, `layout::compile` produces the argv and `launch` runs it.

pub mod command;
pub mod data;
pub mod error;
pub mod launch;
pub mod layout;
pub mod sys;
pub mod types;

pub use error::{LayoutError, Result};
