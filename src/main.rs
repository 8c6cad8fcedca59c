mod commands;
mod config;
mod error;
mod selector;

use clap::{ArgAction, CommandFactory, Parser};
use colored::*;
use std::ffi::OsString;
use std::io;

use error::{Error, EXIT_OK};

const NAME: &str = "awsp";
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = NAME)]
#[command(about = "awsp is a tool to switch aws profile.")]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct Cli {
    /// Print help message
    #[arg(short = 'h', action = ArgAction::SetTrue, overrides_with = "help")]
    help: bool,

    /// Print the version of this tool
    #[arg(short = 'v', action = ArgAction::SetTrue, overrides_with = "version")]
    version: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    std::process::exit(run(std::env::args_os()));
}

fn run<I>(args: I) -> i32
where
    I: IntoIterator<Item = OsString>,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            // clap's message already ends with the usage line
            eprint!("{err}");
            return Error::FlagParse(err).exit_code();
        }
    };

    if cli.help {
        eprint!("{}", Cli::command().render_help());
        return EXIT_OK;
    }

    if cli.version {
        eprintln!("{}", format!("{NAME} v{VERSION}").bold());
    }

    match commands::switch::execute(&mut io::stdout().lock()) {
        Ok(_) => EXIT_OK,
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            err.exit_code()
        }
    }
}
