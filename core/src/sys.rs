use std::path::Path;

use tracing::{debug, info};

use crate::command::{Command, Response};
use crate::data::node::parse_document;
use crate::data::template::TemplateRegistry;
use crate::error::{LayoutError, Result};
use crate::launch::{current_env, Environment, LaunchPlan, Launcher, ProcessLauncher};
use crate::layout::compile::compile;
use crate::layout::walker::walk;
use crate::types::config::LayoutSettings;


/// Central runtime for wtlayout. Runs a document through
/// parse → walk → compile and hands the result to the launcher.
///
/// Compilation always finishes before the launcher is called, so a broken
/// document never starts a process.
pub struct Sys<L: Launcher = ProcessLauncher> {
    settings: LayoutSettings,
    env: Environment,
    launcher: L,
}


impl Sys<ProcessLauncher> {
    pub fn new(settings: LayoutSettings) -> Sys<ProcessLauncher> {
        Sys::with_launcher(settings, ProcessLauncher)
    }
}


impl<L: Launcher> Sys<L> {
    pub fn with_launcher(settings: LayoutSettings, launcher: L) -> Sys<L> {
        Sys {
            settings,
            env: current_env(),
            launcher,
        }
    }

    /// Replace the environment the launch plan is derived from.
    pub fn with_env(mut self, env: Environment) -> Sys<L> {
        self.env = env;
        self
    }

    /// Return a reference to the current settings.
    pub fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// The single dispatch method.
    pub fn execute(&mut self, cmd: Command) -> Response {
        let result = match cmd {
            Command::Launch { file } => self.cmd_launch(&file),
            Command::Print { file, format } => self
                .cmd_print(&file, format.as_deref())
                .map(|output| Response::Ok { output }),
        };
        result.unwrap_or_else(|e| Response::error(e.to_string()))
    }

    // -----------------------------------------------------------------------
    // Pipeline
    // -----------------------------------------------------------------------

    /// Compile layout document text into the full token list.
    pub fn compile_str(&self, text: &str) -> Result<Vec<String>> {
        let root = parse_document(text)?;
        let action = walk(&root, &mut TemplateRegistry::new())?;
        compile(&action, &self.settings)
    }

    pub fn compile_file(&self, path: &Path) -> Result<Vec<String>> {
        debug!(path = %path.display(), "reading layout");
        let text = std::fs::read_to_string(path).map_err(|source| LayoutError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.compile_str(&text)
    }

    pub fn plan_file(&self, path: &Path) -> Result<LaunchPlan> {
        let tokens = self.compile_file(path)?;
        LaunchPlan::new(tokens, &self.settings, self.env.clone())
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    fn cmd_launch(&mut self, file: &Path) -> Result<Response> {
        let plan = self.plan_file(file)?;
        let code = self.launcher.launch(&plan)?;
        info!(code, "launcher exited");
        if code == 0 {
            Ok(Response::Ok {
                output: String::new(),
            })
        } else {
            Ok(Response::Error {
                message: format!("{} exited with status {}", plan.program, code),
                code: Some(code),
            })
        }
    }

    fn cmd_print(&self, file: &Path, format: Option<&str>) -> Result<String> {
        let plan = self.plan_file(file)?;
        match format {
            Some("json") => serde_json::to_string(&plan.argv())
                .map_err(|e| LayoutError::Launch(format!("cannot encode command: {}", e))),
            _ => plan.command_line(),
        }
    }
}
