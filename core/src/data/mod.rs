//! Input data — the attributed tree parsed from a layout document, and the
//! template registry that resolves presets against it.

pub mod cmdline;
pub mod node;
pub mod template;
