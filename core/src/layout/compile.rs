//! Command compiler — turns an `Action` tree into the final argv.
//!
//! Tabs and windows are assembled from `Layout::options()`: the leading
//! pane's options are appended to the `nt` (new-tab) subcommand, the
//! sibling splits follow as subcommands of their own. All subcommands are
//! then flattened with the separator token between them.

use tracing::debug;

use crate::error::{LayoutError, Result};
use crate::types::action::{Action, LayoutTab, Window};
use crate::types::config::LayoutSettings;


/// One subcommand's tokens, without separators.
pub type Subcommand = Vec<String>;


/// Flatten subcommands, placing `separator` between consecutive ones but
/// never before the first.
///
/// `[[a, b], [c], [d]]` -> `[a, b, ;, c, ;, d]`
pub fn subcmd_join<I>(separator: &str, commands: I) -> Vec<String>
where
    I: IntoIterator<Item = Subcommand>,
{
    let mut out = Vec::new();
    for (i, command) in commands.into_iter().enumerate() {
        if i > 0 {
            out.push(separator.to_string());
        }
        out.extend(command);
    }
    out
}


impl LayoutTab {
    /// `nt <leading options>` followed by the tab's split subcommands.
    pub fn commands(&self) -> Vec<Subcommand> {
        let mut commands = self.pane.options();
        if let Some(first) = commands.first_mut() {
            first.insert(0, "nt".to_string());
        }
        commands
    }
}


impl Window {
    /// The first tab rides on the `<program> -w <window>` invocation so no
    /// separator precedes it; otherwise the terminal would open a spare tab.
    pub fn commands(&self, settings: &LayoutSettings) -> Vec<Subcommand> {
        let mut commands: Vec<Subcommand> = Vec::new();
        for (i, tab) in self.tabs.iter().enumerate() {
            let mut tab_commands = tab.commands();
            if i == 0 {
                if let Some(first) = tab_commands.first_mut() {
                    let mut head = vec![
                        settings.program.clone(),
                        "-w".to_string(),
                        settings.window.clone(),
                    ];
                    head.append(first);
                    *first = head;
                }
            }
            commands.extend(tab_commands);
        }
        commands
    }
}


/// Compile a walked document into the argv of a single invocation.
///
/// The root must be a window, or a tab which is compiled as a window of
/// one tab.
pub fn compile(action: &Action, settings: &LayoutSettings) -> Result<Vec<String>> {
    let commands = match action {
        Action::Window(window) => window.commands(settings),
        Action::Tab(tab) => Window::new(vec![tab.clone()])?.commands(settings),
        other => {
            return Err(LayoutError::InvalidStructure(format!(
                "document root must be <window> or <tab>, found <{}>",
                other.kind()
            )))
        }
    };
    debug!(subcommands = commands.len(), "compiled layout");
    Ok(subcmd_join(&settings.separator, commands))
}
