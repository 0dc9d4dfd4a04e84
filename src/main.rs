// SPDX-License-Identifier: MPL-2.0
use error_overlay::app::{self, Flags};
use error_overlay::{config, logging};
use std::path::PathBuf;

const HELP: &str = "\
error_overlay demo

USAGE:
  error_overlay [OPTIONS]

OPTIONS:
  --config-dir <DIR>  Read settings.toml from DIR
  -v, --verbose       Keep console and log output (debug level)
  -h, --help          Print this help
";

fn main() -> iced::Result {
    let mut args = pico_args::Arguments::from_env();

    if args.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }

    let verbose = args.contains(["-v", "--verbose"]);
    let config_dir: Option<PathBuf> = match args.opt_value_from_str("--config-dir") {
        Ok(dir) => dir,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(2);
        }
    };

    let (mut config, warning) = config::load_with_override(config_dir);
    let level = if verbose { "debug" } else { config.logging.level() };
    let log_handle = match logging::init(level) {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("logging disabled: {err}");
            None
        }
    };
    if let Some(warning) = warning {
        tracing::warn!("{warning}");
    }
    if verbose {
        config.console.silence = Some(false);
    }

    app::run(Flags { config, log_handle })
}
