//! Command-line parsing
//!
//! Usage:
//!   depot-console [OPTIONS] <COMMAND>
//!
//! Arguments are matched by hand in a single pass. Global options may appear anywhere on the
//! line except in the value slot of a command option.

use std::path::PathBuf;

use crate::models::{ActionKind, UserRole};
use crate::utils::validation::{parse_calendar_date, parse_page_number, parse_record_id};
use crate::utils::{ConsoleError, ConsoleResult};

/// Options accepted before or after the command
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalOptions {
    pub config_path: Option<PathBuf>,
    pub token: Option<String>,
    pub api_url: Option<String>,
    pub verbose: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogsArgs {
    pub action: Option<ActionKind>,
    pub from: Option<chrono::NaiveDate>,
    pub to: Option<chrono::NaiveDate>,
    pub search: Option<String>,
    pub page: Option<usize>,
    pub export: bool,
    /// Overrides `views.export_dir`
    pub export_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsersArgs {
    pub search: Option<String>,
    pub page: Option<usize>,
}

/// Fields to change; anything left `None` keeps the current value
#[derive(Debug, Clone, PartialEq)]
pub struct EditArgs {
    pub id: i64,
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateArgs {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Logs(LogsArgs),
    Users(UsersArgs),
    EditUser(EditArgs),
    DeleteUser { id: i64, yes: bool },
    CreateUser(CreateArgs),
    Dashboard,
    WhoAmI,
    InitConfig(PathBuf),
    Help,
    Version,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub global: GlobalOptions,
    pub command: Command,
}

/// Command flags whose next argument is a value, never a global option
const COMMAND_VALUE_FLAGS: [&str; 9] = [
    "--action",
    "--from",
    "--to",
    "--search",
    "--page",
    "--username",
    "--email",
    "--role",
    "--password",
];

/// Parse `args` without the program name
pub fn parse_args(args: &[String]) -> ConsoleResult<Invocation> {
    let mut global = GlobalOptions::default();
    let mut rest: Vec<&str> = Vec::new();
    let mut init_config: Option<PathBuf> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                global.config_path = Some(PathBuf::from(value(args, &mut i, "--config")?));
            }
            "--token" => {
                global.token = Some(value(args, &mut i, "--token")?.to_string());
            }
            "--api-url" => {
                global.api_url = Some(value(args, &mut i, "--api-url")?.to_string());
            }
            "--init-config" => {
                init_config = Some(PathBuf::from(value(args, &mut i, "--init-config")?));
            }
            "--verbose" | "-v" => global.verbose = true,
            "--help" | "-h" => {
                return Ok(Invocation {
                    global,
                    command: Command::Help,
                })
            }
            "--version" | "-V" => {
                return Ok(Invocation {
                    global,
                    command: Command::Version,
                })
            }
            flag if COMMAND_VALUE_FLAGS.contains(&flag) => {
                rest.push(flag);
                if let Some(next) = args.get(i + 1) {
                    rest.push(next.as_str());
                    i += 1;
                }
            }
            other => rest.push(other),
        }
        i += 1;
    }

    if let Some(path) = init_config {
        return Ok(Invocation {
            global,
            command: Command::InitConfig(path),
        });
    }

    let command = match rest.split_first() {
        None => Command::Help,
        Some((&"logs", tail)) => Command::Logs(parse_logs(tail)?),
        Some((&"users", tail)) => parse_users(tail)?,
        Some((&"dashboard", tail)) => {
            no_extra(tail)?;
            Command::Dashboard
        }
        Some((&"whoami", tail)) => {
            no_extra(tail)?;
            Command::WhoAmI
        }
        Some((other, _)) => {
            return Err(ConsoleError::Validation(format!("Unknown command: {}", other)))
        }
    };

    Ok(Invocation { global, command })
}

fn value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> ConsoleResult<&'a str> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| ConsoleError::Validation(format!("{} requires a value", flag)))
}

fn tail_value<'a>(tail: &[&'a str], i: &mut usize, flag: &str) -> ConsoleResult<&'a str> {
    *i += 1;
    tail.get(*i)
        .copied()
        .ok_or_else(|| ConsoleError::Validation(format!("{} requires a value", flag)))
}

fn no_extra(tail: &[&str]) -> ConsoleResult<()> {
    match tail.first() {
        Some(arg) => Err(ConsoleError::Validation(format!("Unexpected argument: {}", arg))),
        None => Ok(()),
    }
}

fn parse_logs(tail: &[&str]) -> ConsoleResult<LogsArgs> {
    let mut args = LogsArgs::default();
    let mut i = 0;
    while i < tail.len() {
        match tail[i] {
            "--action" => {
                args.action = Some(ActionKind::from(tail_value(tail, &mut i, "--action")?))
            }
            "--from" => args.from = Some(parse_calendar_date(tail_value(tail, &mut i, "--from")?)?),
            "--to" => args.to = Some(parse_calendar_date(tail_value(tail, &mut i, "--to")?)?),
            "--search" => args.search = Some(tail_value(tail, &mut i, "--search")?.to_string()),
            "--page" => args.page = Some(parse_page_number(tail_value(tail, &mut i, "--page")?)?),
            "--export" => {
                args.export = true;
                if let Some(dir) = tail.get(i + 1).filter(|next| !next.starts_with('-')) {
                    args.export_dir = Some(PathBuf::from(dir));
                    i += 1;
                }
            }
            other => {
                return Err(ConsoleError::Validation(format!("Unknown argument: {}", other)))
            }
        }
        i += 1;
    }
    Ok(args)
}

fn parse_users(tail: &[&str]) -> ConsoleResult<Command> {
    match tail.split_first() {
        Some((&"edit", rest)) => parse_edit(rest).map(Command::EditUser),
        Some((&"delete", rest)) => {
            let (id, flags) = rest
                .split_first()
                .ok_or_else(|| ConsoleError::Validation("users delete requires an ID".to_string()))?;
            let id = parse_record_id(id)?;
            let mut yes = false;
            for flag in flags {
                match *flag {
                    "--yes" | "-y" => yes = true,
                    other => {
                        return Err(ConsoleError::Validation(format!(
                            "Unknown argument: {}",
                            other
                        )))
                    }
                }
            }
            Ok(Command::DeleteUser { id, yes })
        }
        Some((&"create", rest)) => parse_create(rest).map(Command::CreateUser),
        _ => {
            let mut args = UsersArgs::default();
            let mut i = 0;
            while i < tail.len() {
                match tail[i] {
                    "--search" => {
                        args.search = Some(tail_value(tail, &mut i, "--search")?.to_string())
                    }
                    "--page" => {
                        args.page = Some(parse_page_number(tail_value(tail, &mut i, "--page")?)?)
                    }
                    other => {
                        return Err(ConsoleError::Validation(format!(
                            "Unknown argument: {}",
                            other
                        )))
                    }
                }
                i += 1;
            }
            Ok(Command::Users(args))
        }
    }
}

fn parse_edit(rest: &[&str]) -> ConsoleResult<EditArgs> {
    let (id, tail) = rest
        .split_first()
        .ok_or_else(|| ConsoleError::Validation("users edit requires an ID".to_string()))?;
    let mut args = EditArgs {
        id: parse_record_id(id)?,
        username: None,
        email: None,
        role: None,
        password: None,
    };

    let mut i = 0;
    while i < tail.len() {
        match tail[i] {
            "--username" => args.username = Some(tail_value(tail, &mut i, "--username")?.to_string()),
            "--email" => args.email = Some(tail_value(tail, &mut i, "--email")?.to_string()),
            "--role" => {
                let raw = tail_value(tail, &mut i, "--role")?;
                args.role = Some(raw.parse().map_err(ConsoleError::Validation)?);
            }
            "--password" => args.password = Some(tail_value(tail, &mut i, "--password")?.to_string()),
            other => {
                return Err(ConsoleError::Validation(format!("Unknown argument: {}", other)))
            }
        }
        i += 1;
    }
    Ok(args)
}

fn parse_create(tail: &[&str]) -> ConsoleResult<CreateArgs> {
    let mut username = None;
    let mut email = None;
    let mut password = None;

    let mut i = 0;
    while i < tail.len() {
        match tail[i] {
            "--username" => username = Some(tail_value(tail, &mut i, "--username")?.to_string()),
            "--email" => email = Some(tail_value(tail, &mut i, "--email")?.to_string()),
            "--password" => password = Some(tail_value(tail, &mut i, "--password")?.to_string()),
            other => {
                return Err(ConsoleError::Validation(format!("Unknown argument: {}", other)))
            }
        }
        i += 1;
    }

    match (username, email, password) {
        (Some(username), Some(email), Some(password)) => Ok(CreateArgs {
            username,
            email,
            password,
        }),
        _ => Err(ConsoleError::Validation(
            "users create requires --username, --email and --password".to_string(),
        )),
    }
}

pub fn help_text() -> String {
    format!(
        r#"Depot Console {}

USAGE:
    depot-console [OPTIONS] <COMMAND>

COMMANDS:
    logs [--action KIND] [--from DATE] [--to DATE] [--search TEXT] [--page N] [--export [DIR]]
                            Browse the activity log (admin only). Dates are YYYY-MM-DD.
                            --export writes the whole filtered log as CSV into DIR
                            (default: views.export_dir).
    users [--search TEXT] [--page N]
                            List users (admin only)
    users edit <ID> [--username U] [--email E] [--role R] [--password P]
                            Update a user; the password is kept unless given
    users delete <ID> [--yes]
                            Delete a user, asking for confirmation unless --yes
    users create --username U --email E --password P
                            Create a user
    dashboard               Show stock statistics and the daily activity chart
    whoami                  Show the current user and the screens available to them

OPTIONS:
    --config <PATH>         Configuration file
    --token <TOKEN>         Bearer token (overrides DEPOT_TOKEN)
    --api-url <URL>         API base URL (overrides DEPOT_API_URL)
    --init-config <PATH>    Write a default configuration file and exit
    -v, --verbose           Enable debug logging
    -h, --help              Print this help message
    -V, --version           Print version information

ENVIRONMENT:
    DEPOT_CONFIG        Path to configuration file
    DEPOT_API_URL       API base URL
    DEPOT_TOKEN         Bearer token
    RUST_LOG            Log filter (default: warn)

CONFIGURATION:
    The console looks for configuration files in the following order:
    1. Path given with --config or DEPOT_CONFIG
    2. ./config.yaml, ./config/config.yaml
    3. /etc/depot-console/config.yaml
    4. depot-console/config.yaml under the user config directory"#,
        env!("CARGO_PKG_VERSION")
    )
}
