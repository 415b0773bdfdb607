//! Command — the typed interface for all wtlayout operations.
//!
//! Commands and responses serialize as tagged JSON so the runtime can be
//! driven by other tools as well as by the CLI.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};


#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "command")]
pub enum Command {
    /// Compile the layout document and run the resulting command.
    #[serde(rename = "launch")]
    Launch {
        file: PathBuf,
    },

    /// Compile the layout document and return the command instead of
    /// running it. `format` is `"json"` for a JSON token array, anything
    /// else for a shell-quoted line.
    #[serde(rename = "print")]
    Print {
        file: PathBuf,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        format: Option<String>,
    },
}


#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status")]
pub enum Response {
    #[serde(rename = "ok")]
    Ok {
        output: String,
    },

    #[serde(rename = "error")]
    Error {
        message: String,
        /// Process exit code to report, when one is known.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<i32>,
    },
}

impl Response {
    pub fn error(message: impl Into<String>) -> Response {
        Response::Error {
            message: message.into(),
            code: None,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launch_round_trip() {
        let cmd = Command::Launch {
            file: PathBuf::from("layouts/dev.xml"),
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"command\":\"launch\""));
        let back: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmd);
    }

    #[test]
    fn print_without_format_omits_field() {
        let cmd = Command::Print {
            file: PathBuf::from("dev.xml"),
            format: None,
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"command\":\"print\""));
        assert!(!json.contains("format"));
    }

    #[test]
    fn print_parses_from_external_json() {
        let cmd: Command =
            serde_json::from_str(r#"{"command":"print","file":"a.xml","format":"json"}"#).unwrap();
        assert_eq!(
            cmd,
            Command::Print {
                file: PathBuf::from("a.xml"),
                format: Some("json".into()),
            }
        );
    }

    #[test]
    fn error_response_round_trip() {
        let resp = Response::Error {
            message: "Unknown tag 'grid'".into(),
            code: Some(1),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"status\":\"error\""));
        let back: Response = serde_json::from_str(&json).unwrap();
        assert_eq!(back, resp);
    }
}
