//! Action tree — the typed result of walking a layout document.
//!
//! A `Window` holds tabs, a `LayoutTab` holds one `Layout`, and a `Layout`
//! is either a leaf `Pane` or a `PaneGroup` of nested layouts. Panes are
//! materialized left to right and top to bottom, so the first leaf of any
//! group is always the pane that already exists when the group is built.

use crate::error::{LayoutError, Result};


/// Result of walking a single node.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Window(Window),
    Tab(LayoutTab),
    Group(PaneGroup),
    Pane(Pane),
}

impl Action {
    /// Short tag-like name, used in structure error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Window(_) => "window",
            Action::Tab(_) => "tab",
            Action::Group(g) => g.direction.tag(),
            Action::Pane(_) => "pane",
        }
    }

    /// Convert a pane-bearing action into a `Layout`.
    pub fn into_layout(self) -> Result<Layout> {
        match self {
            Action::Pane(p) => Ok(Layout::Pane(p)),
            Action::Group(g) => Ok(Layout::Group(g)),
            other => Err(LayoutError::InvalidStructure(format!(
                "<{}> cannot be nested inside a pane group or tab",
                other.kind()
            ))),
        }
    }
}


/// Orientation of a pane group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutDirection {
    /// Items are inserted from left to right.
    Row,
    /// Items are inserted from top to bottom.
    Column,
}

impl LayoutDirection {
    pub fn tag(self) -> &'static str {
        match self {
            LayoutDirection::Row => "row",
            LayoutDirection::Column => "column",
        }
    }
}


/// 24-bit RGB tab color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabColor(u32);

impl TabColor {
    pub fn new(rgb: u32) -> Option<TabColor> {
        (rgb <= 0xFF_FFFF).then_some(TabColor(rgb))
    }

    /// Parse `#RRGGBB`, `0xRRGGBB` or a plain decimal integer.
    pub fn parse(s: &str) -> Option<TabColor> {
        let s = s.trim();
        let rgb = if let Some(hex) = s.strip_prefix('#') {
            u32::from_str_radix(hex, 16).ok()?
        } else if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            u32::from_str_radix(hex, 16).ok()?
        } else {
            s.parse::<u32>().ok()?
        };
        TabColor::new(rgb)
    }

    pub fn rgb(self) -> u32 {
        self.0
    }

    pub fn to_hex(self) -> String {
        format!("#{:06x}", self.0)
    }
}


/// Leaf pane options, shared by new-tab and split-pane commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pane {
    pub title: Option<String>,
    pub starting_directory: Option<String>,
    pub profile: Option<String>,
    pub process: Option<Vec<String>>,
    pub tab_color: Option<TabColor>,
}

impl Pane {
    /// Option tokens for this pane. The process goes last since everything
    /// after it is passed through to the spawned program.
    pub fn options(&self) -> Vec<String> {
        let mut result = Vec::new();
        if let Some(title) = &self.title {
            result.extend(["--title".to_string(), title.clone()]);
        }
        if let Some(dir) = &self.starting_directory {
            result.extend(["-d".to_string(), dir.clone()]);
        }
        if let Some(profile) = &self.profile {
            result.extend(["-p".to_string(), profile.clone()]);
        }
        if let Some(color) = self.tab_color {
            result.extend(["--tabColor".to_string(), color.to_hex()]);
        }
        if let Some(process) = &self.process {
            result.extend(process.iter().cloned());
        }
        result
    }
}


/// Something that can occupy a slot in a tab or group.
#[derive(Debug, Clone, PartialEq)]
pub enum Layout {
    Pane(Pane),
    Group(PaneGroup),
}

impl Layout {
    /// The deepest leading leaf, i.e. the top-left pane that exists before
    /// any split of this layout happens.
    pub fn root(&self) -> &Pane {
        match self {
            Layout::Pane(p) => p,
            Layout::Group(g) => g.root(),
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Layout::Pane(Pane::default())
    }
}


/// A group of panes or nested groups along one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct PaneGroup {
    direction: LayoutDirection,
    panes: Vec<Layout>,
    /// Share of the group's space per pane, proportional to the total.
    /// When present, `weights.len() == panes.len()` and every weight is > 0.
    weights: Option<Vec<f64>>,
}

impl PaneGroup {
    /// Build a group, rejecting empty groups and malformed weights.
    pub fn new(
        direction: LayoutDirection,
        panes: Vec<Layout>,
        weights: Option<Vec<f64>>,
    ) -> Result<PaneGroup> {
        if panes.is_empty() {
            return Err(LayoutError::InvalidStructure(format!(
                "<{}> must contain at least one pane",
                direction.tag()
            )));
        }
        if let Some(w) = &weights {
            if w.len() != panes.len() {
                return Err(LayoutError::MalformedWeights {
                    reason: format!(
                        "{} weights given for {} panes in <{}>",
                        w.len(),
                        panes.len(),
                        direction.tag()
                    ),
                });
            }
            if let Some(bad) = w.iter().find(|x| !(x.is_finite() && **x > 0.0)) {
                return Err(LayoutError::MalformedWeights {
                    reason: format!("weight {} is not a positive number", bad),
                });
            }
        }
        Ok(PaneGroup {
            direction,
            panes,
            weights,
        })
    }

    pub fn direction(&self) -> LayoutDirection {
        self.direction
    }

    /// Never empty.
    pub fn panes(&self) -> &[Layout] {
        &self.panes
    }

    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    pub fn root(&self) -> &Pane {
        self.panes[0].root()
    }
}


/// A single tab: one pane or one group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutTab {
    pub pane: Layout,
}


/// Ordered top-level tabs; the first opens the window, the rest open as
/// new tabs in it.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    pub tabs: Vec<LayoutTab>,
}

impl Window {
    pub fn new(tabs: Vec<LayoutTab>) -> Result<Window> {
        if tabs.is_empty() {
            return Err(LayoutError::InvalidStructure(
                "<window> must contain at least one tab".into(),
            ));
        }
        Ok(Window { tabs })
    }
}
