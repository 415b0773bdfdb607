//! Dry-run tests for the wtlayout binary.
//!
//! Runs the compiled binary against layout files in a temp directory and
//! checks the printed command. Nothing is launched.

use std::path::Path;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;


fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_wtlayout"))
        .args(args)
        .env("WTLAYOUT_CONFIG_DIR", dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run wtlayout binary")
}


fn write(dir: &Path, name: &str, text: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, text).unwrap();
    path.to_string_lossy().into_owned()
}


fn json_tokens(output: &Output) -> Vec<String> {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}


#[test]
fn nested_layout_with_templates() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(
        dir.path(),
        "dev.xml",
        r#"<window>
             <template name="editor">
               <column weights="3 1">
                 <pane directory="${root}" process="nvim ."/>
                 <pane directory="${root}"/>
               </column>
             </template>
             <tab>
               <row weights="2 1">
                 <preset name="editor" root="/src/app"/>
                 <pane title="server" process="cargo run"/>
               </row>
             </tab>
             <tab><pane title="notes"/></tab>
           </window>"#,
    );
    let tokens = json_tokens(&run(dir.path(), &["--dry-run", "--json", &file]));
    assert_eq!(
        tokens,
        vec![
            "wt", "-w", "0", "nt", "-d", "/src/app", "nvim", ".", ";",
            "sp", "-V", "-s", "0.3333", "--title", "server", "cargo", "run", ";",
            "mf", "left", ";",
            "sp", "-H", "-s", "0.25", "-d", "/src/app", ";",
            "mf", "right", ";",
            "nt", "--title", "notes",
        ]
    );
}


#[test]
fn settings_file_changes_program() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "settings.yaml", "program: wt.exe\nwindow: new\n");
    let file = write(dir.path(), "one.xml", "<tab/>");
    let tokens = json_tokens(&run(dir.path(), &["--dry-run", "--json", &file]));
    assert_eq!(tokens, vec!["wt.exe", "-w", "new", "nt"]);
}


#[test]
fn plain_dry_run_prints_a_command_line() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(dir.path(), "one.xml", r#"<tab><pane directory="/tmp"/></tab>"#);
    let output = run(dir.path(), &["--dry-run", &file]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "wt -w 0 nt -d /tmp");
}


#[test]
fn unknown_template_fails_with_message() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(
        dir.path(),
        "bad.xml",
        r#"<window><tab><preset name="missing"/></tab></window>"#,
    );
    let output = run(dir.path(), &["--dry-run", &file]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown preset template name 'missing'"), "{}", stderr);
}


#[test]
fn unknown_tag_fails_with_message() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(dir.path(), "bad.xml", "<window><tab><split/></tab></window>");
    let output = run(dir.path(), &["--dry-run", &file]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown tag 'split'"));
}


#[test]
fn invalid_settings_fail_before_compiling() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "settings.yaml", "program: [oops");
    let file = write(dir.path(), "one.xml", "<tab/>");
    let output = run(dir.path(), &["--dry-run", &file]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Config error"));
}
