//! Depot Console - command-line front end for the depot inventory API
//!
//! Renders the activity log, the admin user table and the dashboard as plain-text
//! tables. Logs go to stderr so stdout stays clean for the tables.

use std::env;
use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use config::LogFormat;
use depot_console::cli::{self, Command, CreateArgs, EditArgs, Invocation, LogsArgs, UsersArgs};
use depot_console::models::{ActionKind, NewUser};
use depot_console::services::{
    load_dashboard, visible_screens, ApiClient, Credential, LoadState, LogViewer, Page,
    RecordSource, UserTable,
};
use depot_console::{config, AppConfig, ConsoleError, ConsoleResult};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args: Vec<String> = env::args().skip(1).collect();
    let invocation = match cli::parse_args(&args) {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("{}", e.user_message());
            eprintln!("Run with --help for usage.");
            std::process::exit(2);
        }
    };

    match &invocation.command {
        Command::Help => {
            println!("{}", cli::help_text());
            return Ok(());
        }
        Command::Version => {
            println!("Depot Console {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Command::InitConfig(path) => {
            AppConfig::create_default_config(path)
                .with_context(|| format!("Failed to write configuration to {:?}", path))?;
            println!("Wrote default configuration to {}", path.display());
            return Ok(());
        }
        _ => {}
    }

    // Load configuration first (before logging, so we know log format)
    let mut config = AppConfig::load_from(invocation.global.config_path.as_ref())
        .context("Failed to load configuration")?;
    if let Some(url) = &invocation.global.api_url {
        config.api.base_url = url.clone();
        config.validate().context("Invalid --api-url")?;
    }
    if invocation.global.verbose {
        config.logging.level = "debug".to_string();
    }

    // The guard must be kept alive for the duration of the program
    // to ensure log messages are flushed to files
    let _log_guard = init_logging(&config, invocation.global.verbose);
    debug!("Configuration loaded, API at {}", config.api.base_url);

    let client = ApiClient::new(&config.api).context("Failed to initialize API client")?;
    let credential = Credential::new(
        invocation
            .global
            .token
            .clone()
            .or_else(|| config.api.token.clone())
            .unwrap_or_default(),
    );

    if let Err(e) = run(&invocation, &config, &client, &credential).await {
        info!("Command failed: {}", e);
        eprintln!("Error: {}", e.user_message());
        std::process::exit(1);
    }

    Ok(())
}

async fn run(
    invocation: &Invocation,
    config: &AppConfig,
    source: &dyn RecordSource,
    credential: &Credential,
) -> ConsoleResult<()> {
    match &invocation.command {
        Command::Logs(args) => show_logs(args, config, source, credential).await,
        Command::Users(args) => show_users(args, config, source, credential).await,
        Command::EditUser(args) => edit_user(args, config, source, credential).await,
        Command::DeleteUser { id, yes } => {
            delete_user(*id, *yes, config, source, credential).await
        }
        Command::CreateUser(args) => create_user(args, config, source, credential).await,
        Command::Dashboard => show_dashboard(config, source, credential).await,
        Command::WhoAmI => show_current_user(source, credential).await,
        Command::Help | Command::Version | Command::InitConfig(_) => Ok(()),
    }
}

fn ensure_ready(state: &LoadState) -> ConsoleResult<()> {
    match state {
        LoadState::Failed(err) => Err(err.clone()),
        _ => Ok(()),
    }
}

async fn show_logs(
    args: &LogsArgs,
    config: &AppConfig,
    source: &dyn RecordSource,
    credential: &Credential,
) -> ConsoleResult<()> {
    let mut viewer = LogViewer::new(config.views.log_page_size);
    ensure_ready(viewer.load(source, credential).await)?;

    if let Some(action) = args.action.as_ref().filter(|kind| !kind.is_known()) {
        let kinds = ActionKind::KNOWN;
        let known: Vec<&str> = kinds.iter().map(ActionKind::as_str).collect();
        eprintln!(
            "Note: '{}' is not a known action ({}); matching it verbatim.",
            action,
            known.join(", ")
        );
    }
    viewer.set_action(args.action.clone());
    viewer.set_start(args.from);
    viewer.set_end(args.to);
    if let Some(query) = &args.search {
        viewer.set_query(query.clone());
    }
    if let Some(page) = args.page {
        viewer.go_to_page(page);
    }

    let page = viewer.page();
    if page.is_empty() {
        println!("No log records match.");
    } else {
        println!(
            "{:<20}  {:<16}  {:<18}  {:<10}  {}",
            "TIME", "USER", "ACTION", "ENTITY", "ID"
        );
        for entry in &page.items {
            println!(
                "{:<20}  {:<16}  {:<18}  {:<10}  {}",
                entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                viewer.display_name(entry.user_id),
                entry.action.label(),
                entry.entity,
                entry.entity_id_text()
            );
        }
    }
    print_page_footer(&page);

    if args.export {
        let dir = args
            .export_dir
            .as_deref()
            .unwrap_or(config.views.export_dir.as_path());
        let export = viewer.export_csv();
        let path = export.write_to(dir)?;
        println!("Exported {} entries to {}", export.rows, path.display());
    }

    Ok(())
}

fn print_page_footer<T>(page: &Page<T>) {
    println!(
        "Page {} of {} ({} records)",
        page.number, page.total_pages, page.total_items
    );
}

async fn load_users(
    config: &AppConfig,
    source: &dyn RecordSource,
    credential: &Credential,
) -> ConsoleResult<UserTable> {
    let mut table = UserTable::new(config.views.user_page_size);
    ensure_ready(table.refresh(source, credential).await)?;
    Ok(table)
}

fn print_users(table: &UserTable) {
    let page = table.page();
    if page.is_empty() {
        println!("No users match.");
    } else {
        println!(
            "{:<6}  {:<20}  {:<30}  {:<8}  {}",
            "ID", "USERNAME", "EMAIL", "ROLE", "CREATED"
        );
        for user in &page.items {
            println!(
                "{:<6}  {:<20}  {:<30}  {:<8}  {}",
                user.id,
                user.username,
                user.email,
                user.role,
                user.created_at
                    .map(|t| t.format("%Y-%m-%d").to_string())
                    .unwrap_or_default()
            );
        }
    }
    print_page_footer(&page);
}

async fn show_users(
    args: &UsersArgs,
    config: &AppConfig,
    source: &dyn RecordSource,
    credential: &Credential,
) -> ConsoleResult<()> {
    let mut table = load_users(config, source, credential).await?;
    if let Some(query) = &args.search {
        table.set_search(query.clone());
    }
    if let Some(page) = args.page {
        table.go_to_page(page);
    }
    print_users(&table);
    Ok(())
}

async fn edit_user(
    args: &EditArgs,
    config: &AppConfig,
    source: &dyn RecordSource,
    credential: &Credential,
) -> ConsoleResult<()> {
    let mut table = load_users(config, source, credential).await?;
    let draft = table.open_edit(args.id)?;
    if let Some(username) = &args.username {
        draft.username = username.clone();
    }
    if let Some(email) = &args.email {
        draft.email = email.clone();
    }
    if let Some(role) = &args.role {
        draft.role = role.clone();
    }
    if let Some(password) = &args.password {
        draft.password = password.clone();
    }

    table.submit_edit(source, credential).await?;
    println!("User {} updated.", args.id);
    if let Some(err) = table.state().error() {
        eprintln!("Warning: could not reload users: {}", err.user_message());
    } else {
        print_users(&table);
    }
    Ok(())
}

fn confirm(prompt: &str) -> ConsoleResult<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

async fn delete_user(
    id: i64,
    yes: bool,
    config: &AppConfig,
    source: &dyn RecordSource,
    credential: &Credential,
) -> ConsoleResult<()> {
    let mut table = load_users(config, source, credential).await?;
    let username = table.request_delete(id)?.username.clone();

    let confirmed = yes
        || confirm(&format!("Delete user {} ({})?", username, id)).map_err(|e| {
            ConsoleError::Validation(format!("Could not read confirmation: {}", e))
        })?;
    if !confirmed {
        table.cancel_delete();
        println!("Cancelled.");
        return Ok(());
    }

    table.confirm_delete(source, credential).await?;
    println!("User {} deleted.", username);
    if let Some(err) = table.state().error() {
        eprintln!("Warning: could not reload users: {}", err.user_message());
    }
    Ok(())
}

async fn create_user(
    args: &CreateArgs,
    config: &AppConfig,
    source: &dyn RecordSource,
    credential: &Credential,
) -> ConsoleResult<()> {
    let mut table = UserTable::new(config.views.user_page_size);
    let user = NewUser {
        username: args.username.clone(),
        email: args.email.clone(),
        password: args.password.clone(),
    };
    let created = table.create_user(source, credential, &user).await?;
    println!("Created user {} (id {}).", created.username, created.id);
    Ok(())
}

async fn show_dashboard(
    config: &AppConfig,
    source: &dyn RecordSource,
    credential: &Credential,
) -> ConsoleResult<()> {
    let snapshot = load_dashboard(
        source,
        credential,
        config.views.low_stock_threshold,
        config.views.daily_stats_days,
    )
    .await?;

    for card in snapshot.cards() {
        println!("{:<20} all: {:>6}   mine: {:>6}", card.title, card.all, card.mine);
    }
    println!();

    let bars = snapshot.bars();
    if bars.is_empty() {
        println!("No daily activity recorded.");
    }
    for bar in bars {
        let width = (bar.height_pct / 100.0 * 40.0).round() as usize;
        println!("{}  {:<40}  {}", bar.label, "#".repeat(width), bar.count);
    }
    Ok(())
}

async fn show_current_user(source: &dyn RecordSource, credential: &Credential) -> ConsoleResult<()> {
    let me = source.fetch_current_user(credential).await?;
    println!(
        "{} <{}> (id {}, role {})",
        me.username,
        me.email,
        me.id,
        me.role_label()
    );
    let screens: Vec<String> = visible_screens(me.role.as_ref())
        .iter()
        .map(ToString::to_string)
        .collect();
    println!("Screens: {}", screens.join(", "));
    Ok(())
}

/// Initialize logging based on configuration
///
/// Returns a guard that must be kept alive for file logging to work properly.
fn init_logging(
    config: &AppConfig,
    verbose: bool,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use config::LogTarget;
    use tracing_subscriber::{prelude::*, EnvFilter};

    let env_filter = if verbose {
        EnvFilter::new(&config.logging.level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level))
    };

    let log_config = &config.logging;

    match &log_config.target {
        LogTarget::Console => {
            let subscriber = tracing_subscriber::registry().with(env_filter);
            init_console_logging(subscriber, &log_config.format);
            None
        }
        LogTarget::File => {
            let (writer, guard) = create_file_writer(log_config);
            let subscriber = tracing_subscriber::registry().with(env_filter);
            init_file_logging(subscriber, &log_config.format, writer);
            Some(guard)
        }
        LogTarget::Both => {
            let (writer, guard) = create_file_writer(log_config);
            let subscriber = tracing_subscriber::registry().with(env_filter);
            init_console_logging(
                subscriber.with(file_layer(&log_config.format, writer)),
                &log_config.format,
            );
            Some(guard)
        }
    }
}

/// Create a file writer with optional daily rotation
fn create_file_writer(
    log_config: &config::LoggingConfig,
) -> (
    tracing_appender::non_blocking::NonBlocking,
    tracing_appender::non_blocking::WorkerGuard,
) {
    ensure_log_directory(&log_config.log_dir);

    let file_appender = if log_config.daily_rotation {
        tracing_appender::rolling::daily(&log_config.log_dir, &log_config.log_prefix)
    } else {
        tracing_appender::rolling::never(&log_config.log_dir, &log_config.log_prefix)
    };

    tracing_appender::non_blocking(file_appender)
}

fn ensure_log_directory(dir: &Path) {
    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!("Warning: Failed to create log directory {:?}: {}", dir, e);
    }
}

/// Initialize console logging on stderr
fn init_console_logging<S>(subscriber: S, format: &LogFormat)
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a> + Send + Sync,
{
    use tracing_subscriber::{fmt, prelude::*};

    match format {
        LogFormat::Json => {
            subscriber
                .with(fmt::layer().json().with_target(true).with_writer(io::stderr))
                .init();
        }
        LogFormat::Compact => {
            subscriber
                .with(
                    fmt::layer()
                        .compact()
                        .with_target(false)
                        .with_writer(io::stderr),
                )
                .init();
        }
        LogFormat::Pretty => {
            subscriber
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_thread_ids(false)
                        .with_file(false)
                        .with_line_number(false)
                        .with_writer(io::stderr),
                )
                .init();
        }
    }
}

/// Initialize file-only logging
fn init_file_logging<S>(
    subscriber: S,
    format: &LogFormat,
    writer: tracing_appender::non_blocking::NonBlocking,
) where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a> + Send + Sync,
{
    use tracing_subscriber::prelude::*;

    subscriber.with(file_layer(format, writer)).init();
}

/// File layer in the configured format
fn file_layer<S>(
    format: &LogFormat,
    writer: tracing_appender::non_blocking::NonBlocking,
) -> Box<dyn tracing_subscriber::Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a> + Send + Sync,
{
    use tracing_subscriber::{fmt, Layer};

    match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_writer(writer)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(false)
            .with_ansi(false)
            .with_writer(writer)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .with_target(true)
            .with_ansi(false)
            .with_writer(writer)
            .boxed(),
    }
}
