//! Split geometry — ratios, creation order and focus bookkeeping for nested
//! pane groups.
//!
//! # Algorithm
//!
//! A group of n panes starts out as a single pane (its first leaf) and is
//! carved up by n-1 split-pane commands, one per adjacent pair, in
//! declaration order. Each split hands the new pane a fraction of the
//! space the current pane still holds:
//!
//! - Without weights, split `i` has `m = n - i` panes left to place and
//!   cedes `(m-1)/m`, so every pane ends with `1/n`.
//! - With weights `w`, split `i` cedes `1 - w[i] / sum(w[i..])`, so pane
//!   `i` ends with `w[i] / sum(w)`.
//!
//! Splitting focuses the new pane. When the pane being left behind is
//! itself a group, focus moves back to it, its own splits run, and focus
//! moves forward again. No move is needed after the last pane, which is
//! still focused.

use crate::layout::compile::Subcommand;
use crate::types::action::{Layout, LayoutDirection, PaneGroup};


/// Decimal digits kept when a ratio is emitted.
pub const RATIO_PRECISION: i32 = 4;


impl LayoutDirection {
    /// Split-pane orientation flag: rows get vertical dividers.
    pub fn split_flag(self) -> &'static str {
        match self {
            LayoutDirection::Row => "-V",
            LayoutDirection::Column => "-H",
        }
    }

    pub fn focus_prev(self) -> &'static str {
        match self {
            LayoutDirection::Row => "left",
            LayoutDirection::Column => "up",
        }
    }

    pub fn focus_next(self) -> &'static str {
        match self {
            LayoutDirection::Row => "right",
            LayoutDirection::Column => "down",
        }
    }
}


/// Fractions ceded to the new pane by each of the `n - 1` splits.
/// Weights whose count differs from `n` are ignored.
pub fn split_ratios(n: usize, weights: Option<&[f64]>) -> Vec<f64> {
    let splits = n.saturating_sub(1);
    match weights.filter(|w| w.len() == n) {
        None => (0..splits)
            .map(|i| {
                let m = (n - i) as f64;
                (m - 1.0) / m
            })
            .collect(),
        Some(w) => (0..splits)
            .map(|i| {
                let remaining: f64 = w[i..].iter().sum();
                1.0 - w[i] / remaining
            })
            .collect(),
    }
}


pub fn round_ratio(ratio: f64) -> f64 {
    let scale = 10f64.powi(RATIO_PRECISION);
    (ratio * scale).round() / scale
}


/// Shortest decimal rendering of the rounded ratio, e.g. `0.75`, `0.6667`.
/// Whole values keep one decimal (`1.0`, `0.0`).
pub fn format_ratio(ratio: f64) -> String {
    let rounded = round_ratio(ratio);
    if rounded.fract() == 0.0 {
        format!("{:.1}", rounded)
    } else {
        format!("{}", rounded)
    }
}


fn subcommand<'a>(tokens: impl IntoIterator<Item = &'a str>) -> Subcommand {
    tokens.into_iter().map(str::to_string).collect()
}


impl PaneGroup {
    pub fn split_ratios(&self) -> Vec<f64> {
        split_ratios(self.panes().len(), self.weights())
    }

    /// Subcommands creating every pane after the first, including the
    /// splits of nested groups.
    pub fn sibling_commands(&self) -> Vec<Subcommand> {
        let direction = self.direction();
        let ratios = self.split_ratios();
        let mut commands = Vec::new();

        let panes = self.panes();
        for (i, current) in panes.iter().enumerate() {
            let next = panes.get(i + 1);

            // Create the next pane before splitting the current one, so
            // positions are final without backtracking.
            if let Some(next) = next {
                let ratio = format_ratio(ratios[i]);
                let mut split = subcommand(["sp", direction.split_flag(), "-s", ratio.as_str()]);
                split.extend(next.root().options());
                commands.push(split);
            }

            if let Layout::Group(nested) = current {
                let nested_commands = nested.sibling_commands();
                if nested_commands.is_empty() {
                    continue;
                }
                if next.is_some() {
                    commands.push(subcommand(["mf", direction.focus_prev()]));
                }
                commands.extend(nested_commands);
                if next.is_some() {
                    commands.push(subcommand(["mf", direction.focus_next()]));
                }
            }
        }

        commands
    }
}


impl Layout {
    /// The first element holds the leading pane's options, which belong to
    /// the enclosing new-tab or split-pane command. Any further elements
    /// are standalone subcommands.
    pub fn options(&self) -> Vec<Subcommand> {
        let mut result = vec![self.root().options()];
        if let Layout::Group(group) = self {
            result.extend(group.sibling_commands());
        }
        result
    }
}
