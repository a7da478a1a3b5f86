mod agent_mode;

use std::path::{Path, PathBuf};

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

use simulation::game_params::GridParams;

#[derive(Parser, Debug, PartialEq)]
#[command(name = "stackfarm", about = "Headless stacking tile grid driven over JSON lines")]
struct CliArgs {
    /// Read JSON commands from stdin and answer on stdout.
    #[arg(long)]
    agent: bool,

    /// Grid parameters as JSON; defaults are used when omitted.
    #[arg(long, value_name = "FILE")]
    params: Option<PathBuf>,
}

fn load_params(path: Option<&Path>) -> Result<GridParams, String> {
    let Some(path) = path else {
        return Ok(GridParams::default());
    };
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    GridParams::from_json_str(&json)
        .map_err(|e| format!("invalid params in {}: {e}", path.display()))
}

fn main() {
    let args = CliArgs::parse();
    if !args.agent {
        CliArgs::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "only --agent mode is available",
            )
            .exit();
    }

    let params = match load_params(args.params.as_deref()) {
        Ok(params) => params,
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(1);
        }
    };

    #[cfg(not(target_arch = "wasm32"))]
    agent_mode::run_agent_mode(params);
}
