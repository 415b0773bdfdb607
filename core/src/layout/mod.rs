//! Layout compilation — tree walking, split geometry and command assembly.
//!
//! The `walker` module turns the parsed document into an `Action` tree,
//! resolving presets against lexically scoped templates. The `geometry`
//! module computes split ratios and the split/focus sequence for nested
//! pane groups. The `compile` module assembles tabs and windows into the
//! final token list.

pub mod compile;
pub mod geometry;
pub mod walker;
