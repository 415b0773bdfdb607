//! wtlayout CLI — compile a layout document and open it in the terminal.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use wtlayout_core::command::{Command, Response};
use wtlayout_core::sys::Sys;
use wtlayout_core::types::config::LayoutSettings;


#[derive(Parser, Debug)]
#[command(name = "wtlayout")]
#[command(about = "Open a tab/pane layout described in an XML document", version)]
struct Args {
    /// Layout document to compile
    file: PathBuf,

    /// Print the command instead of running it
    #[arg(long)]
    dry_run: bool,

    /// With --dry-run, print a JSON array of tokens
    #[arg(long, requires = "dry_run")]
    json: bool,

    /// Settings file (default: <config dir>/settings.yaml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}


fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let settings = match load_settings(args.config.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("wtlayout: {}", e);
            process::exit(1);
        }
    };

    debug!(?settings, "settings loaded");

    let cmd = to_command(&args);
    let mut sys = Sys::new(settings);
    let response = sys.execute(cmd);

    match response {
        Response::Ok { output } => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Response::Error { message, code } => {
            eprintln!("wtlayout: {}", message);
            process::exit(code.filter(|c| *c != 0).unwrap_or(1));
        }
    }
}


fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}


fn load_settings(path: Option<&std::path::Path>) -> wtlayout_core::Result<LayoutSettings> {
    match path {
        Some(p) => LayoutSettings::from_file(p),
        None => LayoutSettings::from_default_path(),
    }
}


fn to_command(args: &Args) -> Command {
    if args.dry_run {
        Command::Print {
            file: args.file.clone(),
            format: args.json.then(|| "json".to_string()),
        }
    } else {
        Command::Launch {
            file: args.file.clone(),
        }
    }
}
