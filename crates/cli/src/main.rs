use clap::{Parser, Subcommand};
use cmd::check;
use colored::Colorize;
use common::util::syslog;
use common::{log_error, log_info};
use std::fmt;
mod cmd;

const BANNER: &str = r"

 █████ ██    ██████████████  ██████████████
██   ████    ██   ██   ██   ████  ███  ██
█████████    ██   ██   ███████  ████   ██
██   ████    ██   ██   ██   ████  ███  ██
██   ██ ██████    ██   ██   ████  ██████ ██

by 34n0@immerda.ch";

#[derive(Debug)]
struct AkCliError {
    message: String,
}

impl fmt::Display for AkCliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", "error:".red().bold(), self.message)
    }
}

#[derive(Debug)]
struct AkCliSuccess {
    message: String,
}

impl fmt::Display for AkCliSuccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", "success:".green().bold(), self.message)
    }
}

#[derive(Debug)]
struct AkCliInfo {
    message: String,
}

impl fmt::Display for AkCliInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", "info:".yellow().bold(), self.message)
    }
}

#[derive(Debug)]
enum AkCliResult {
    Success(Option<AkCliSuccess>),
    Info(AkCliInfo),
    Error(AkCliError),
}

impl fmt::Display for AkCliResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AkCliResult::Success(Some(ref success)) => write!(f, "{success}"),
            AkCliResult::Success(None) => Ok(()),
            AkCliResult::Error(ref error) => write!(f, "{error}"),
            AkCliResult::Info(ref info) => write!(f, "{info}"),
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    arg_required_else_help = true,
    author = "34n0",
    about = BANNER,
)]

struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(about = "Check a username and password against the PAM stack")]
    Check {
        #[clap(long, short)]
        user: Option<String>,
        #[clap(long, short)]
        service: Option<String>,
        #[clap(long)]
        no_resetcreds: bool,
        #[clap(long, short)]
        config: Option<String>,
    },
}

fn main() {
    syslog::init_cli_log().unwrap_or_else(|e| println!("{e:?}: Error initializing cli log:"));

    let cli_res = match Cli::parse().command {
        Some(Command::Check {
            user,
            service,
            no_resetcreds,
            config,
        }) => check::user(user.as_deref(), service, no_resetcreds, config.as_deref()),
        _ => AkCliResult::Success(None),
    };

    match &cli_res {
        AkCliResult::Success(res) => {
            if let Some(res) = res {
                log_info!("{}", &res.message);
            }
        }
        AkCliResult::Error(res) => {
            log_error!("{}", &res.message);
        }
        AkCliResult::Info(res) => {
            log_info!("{}", &res.message);
        }
    }

    println!("{cli_res}");
}
