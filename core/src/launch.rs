//! Launch — environment cleanup, variable expansion and the single
//! process invocation.

use std::collections::BTreeMap;
use std::process::Command;

use tracing::{debug, info};

use crate::error::{LayoutError, Result};
use crate::types::config::LayoutSettings;


pub type Environment = BTreeMap<String, String>;


/// Variables a virtualenv activation saves and overrides, as
/// `(variable, saved copy)`.
const VENV_OVERRIDES: [(&str, &str); 3] = [
    ("PROMPT", "_OLD_VIRTUAL_PROMPT"),
    ("PYTHONHOME", "_OLD_VIRTUAL_PYTHONHOME"),
    ("PATH", "_OLD_VIRTUAL_PATH"),
];

const VENV_MARKERS: [&str; 2] = ["VIRTUAL_ENV", "VIRTUAL_ENV_PROMPT"];


/// Snapshot of the current process environment.
pub fn current_env() -> Environment {
    std::env::vars().collect()
}


/// Undo a virtualenv activation: restore saved values and drop the
/// activation markers. The terminal would otherwise hand the venv to every
/// pane it spawns.
pub fn sanitize_env(mut env: Environment) -> Environment {
    for (key, saved) in VENV_OVERRIDES {
        if let Some(value) = env.remove(saved) {
            env.insert(key.to_string(), value);
        }
    }
    for key in VENV_MARKERS {
        env.remove(key);
    }
    env
}


/// Expand `$name`, `${name}` and `%name%` from `env`. Unknown variables are
/// left untouched; `$$` and `%%` produce a single literal sigil.
pub fn expand_vars(token: &str, env: &Environment) -> String {
    let mut out = String::with_capacity(token.len());
    let mut rest = token;
    while let Some(pos) = rest.find(|c: char| c == '$' || c == '%') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let (text, tail) = if rest.as_bytes()[pos] == b'%' {
            expand_percent(after, env)
        } else {
            expand_dollar(after, env)
        };
        out.push_str(&text);
        rest = tail;
    }
    out.push_str(rest);
    out
}


fn expand_percent<'a>(after: &'a str, env: &Environment) -> (String, &'a str) {
    if let Some(tail) = after.strip_prefix('%') {
        return ("%".into(), tail);
    }
    match after.find('%') {
        Some(end) => {
            let name = &after[..end];
            let text = env
                .get(name)
                .cloned()
                .unwrap_or_else(|| format!("%{}%", name));
            (text, &after[end + 1..])
        }
        None => (format!("%{}", after), ""),
    }
}


fn expand_dollar<'a>(after: &'a str, env: &Environment) -> (String, &'a str) {
    if let Some(tail) = after.strip_prefix('$') {
        return ("$".into(), tail);
    }
    if let Some(inner) = after.strip_prefix('{') {
        return match inner.find('}') {
            Some(end) => {
                let name = &inner[..end];
                let text = env
                    .get(name)
                    .cloned()
                    .unwrap_or_else(|| format!("${{{}}}", name));
                (text, &inner[end + 1..])
            }
            None => (format!("${}", after), ""),
        };
    }
    let len = after
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_' || *b == b'-')
        .count();
    if len == 0 {
        return ("$".into(), after);
    }
    let name = &after[..len];
    let text = env
        .get(name)
        .cloned()
        .unwrap_or_else(|| format!("${}", name));
    (text, &after[len..])
}


/// Everything needed to run the compiled command once.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchPlan {
    pub program: String,
    pub args: Vec<String>,
    pub env: Environment,
}

impl LaunchPlan {
    /// Build a plan from compiled tokens. The first token is the program.
    pub fn new(tokens: Vec<String>, settings: &LayoutSettings, env: Environment) -> Result<LaunchPlan> {
        let env = if settings.sanitize_env {
            sanitize_env(env)
        } else {
            env
        };
        let tokens: Vec<String> = if settings.expand_vars {
            tokens.iter().map(|t| expand_vars(t, &env)).collect()
        } else {
            tokens
        };
        let mut tokens = tokens.into_iter();
        let program = tokens
            .next()
            .ok_or_else(|| LayoutError::Launch("compiled command is empty".into()))?;
        Ok(LaunchPlan {
            program,
            args: tokens.collect(),
            env,
        })
    }

    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().cloned())
            .collect()
    }

    /// Shell-quoted command line, for display.
    pub fn command_line(&self) -> Result<String> {
        let argv = self.argv();
        shlex::try_join(argv.iter().map(String::as_str))
            .map_err(|e| LayoutError::Launch(format!("cannot quote command line: {}", e)))
    }
}


/// Runs a launch plan.
pub trait Launcher {
    /// Run the plan to completion and return its exit code.
    fn launch(&mut self, plan: &LaunchPlan) -> Result<i32>;
}


/// Spawns the real process with the plan's environment replacing the
/// inherited one.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    fn launch(&mut self, plan: &LaunchPlan) -> Result<i32> {
        info!(program = %plan.program, args = plan.args.len(), "launching");
        let status = Command::new(&plan.program)
            .args(&plan.args)
            .env_clear()
            .envs(&plan.env)
            .status()
            .map_err(|e| LayoutError::Launch(format!("{}: {}", plan.program, e)))?;
        debug!(%status, "process finished");
        Ok(status.code().unwrap_or(1))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn env(pairs: &[(&str, &str)]) -> Environment {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn sanitize_restores_saved_values() {
        let cleaned = sanitize_env(env(&[
            ("PATH", "C:\\venv\\Scripts;C:\\Windows"),
            ("_OLD_VIRTUAL_PATH", "C:\\Windows"),
            ("PROMPT", "(venv) $P$G"),
            ("_OLD_VIRTUAL_PROMPT", "$P$G"),
            ("VIRTUAL_ENV", "C:\\venv"),
            ("VIRTUAL_ENV_PROMPT", "venv"),
            ("HOME", "C:\\Users\\me"),
        ]));
        assert_eq!(
            cleaned,
            env(&[
                ("HOME", "C:\\Users\\me"),
                ("PATH", "C:\\Windows"),
                ("PROMPT", "$P$G"),
            ])
        );
    }

    #[test]
    fn sanitize_without_venv_is_identity() {
        let original = env(&[("PATH", "/usr/bin"), ("PYTHONHOME", "/opt/py")]);
        assert_eq!(sanitize_env(original.clone()), original);
    }

    #[test]
    fn expands_all_variable_forms() {
        let e = env(&[("HOME", "/home/me"), ("USERPROFILE", "C:\\Users\\me")]);
        assert_eq!(expand_vars("$HOME/src", &e), "/home/me/src");
        assert_eq!(expand_vars("${HOME}src", &e), "/home/mesrc");
        assert_eq!(expand_vars("%USERPROFILE%\\src", &e), "C:\\Users\\me\\src");
    }

    #[test]
    fn unknown_variables_are_left_alone() {
        let e = Environment::new();
        assert_eq!(expand_vars("$NOPE ${NOPE} %NOPE%", &e), "$NOPE ${NOPE} %NOPE%");
        assert_eq!(expand_vars("100% done", &e), "100% done");
        assert_eq!(expand_vars("costs $", &e), "costs $");
        assert_eq!(expand_vars("${open", &e), "${open");
    }

    #[test]
    fn doubled_sigils_collapse() {
        assert_eq!(expand_vars("$$ and %%", &Environment::new()), "$ and %");
    }

    #[test]
    fn separator_token_is_not_touched() {
        assert_eq!(expand_vars(";", &Environment::new()), ";");
    }

    #[test]
    fn plan_splits_program_and_expands() {
        let tokens: Vec<String> = ["wt", "-w", "0", "nt", "-d", "$HOME"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let plan = LaunchPlan::new(tokens, &LayoutSettings::default(), env(&[("HOME", "/h")]))
            .unwrap();
        assert_eq!(plan.program, "wt");
        assert_eq!(plan.args, vec!["-w", "0", "nt", "-d", "/h"]);
        assert_eq!(plan.argv()[0], "wt");
    }

    #[test]
    fn plan_respects_disabled_expansion_and_sanitizing() {
        let settings = LayoutSettings {
            expand_vars: false,
            sanitize_env: false,
            ..LayoutSettings::default()
        };
        let e = env(&[("HOME", "/h"), ("VIRTUAL_ENV", "/venv")]);
        let plan = LaunchPlan::new(vec!["wt".into(), "$HOME".into()], &settings, e.clone()).unwrap();
        assert_eq!(plan.args, vec!["$HOME"]);
        assert_eq!(plan.env, e);
    }

    #[test]
    fn empty_plan_is_rejected() {
        let err = LaunchPlan::new(vec![], &LayoutSettings::default(), Environment::new())
            .unwrap_err();
        assert!(matches!(err, LayoutError::Launch(_)));
    }

    #[test]
    fn command_line_quotes_arguments() {
        let plan = LaunchPlan {
            program: "wt".into(),
            args: vec!["nt".into(), "--title".into(), "my tab".into(), ";".into()],
            env: Environment::new(),
        };
        let line = plan.command_line().unwrap();
        assert!(line.starts_with("wt nt --title "));
        assert_eq!(shlex::split(&line), Some(plan.argv()));
    }
}
