//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use helpcenter_client::HelpCenterClient;
use helpcenter_shared::{
    AppConfig, ArticleParams, ConfigOverrides, LenientNumber, SearchParams, init_config,
    load_config, load_config_from, resolve_credentials,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::info;

use crate::{console, mcp};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// helpcenter: token-efficient access to Zendesk Help Center articles.
#[derive(Parser)]
#[command(
    name = "helpcenter",
    version,
    about = "Search and read Help Center articles from the console or as MCP tools.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.helpcenter/helpcenter.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Account subdomain.
    #[arg(long, env = "ZENDESK_SUBDOMAIN", global = true)]
    pub subdomain: Option<String>,

    /// Agent email used for API-token authentication.
    #[arg(long, env = "ZENDESK_EMAIL", global = true)]
    pub email: Option<String>,

    /// Default locale for requests that do not name one.
    #[arg(long = "default-locale", env = "ZENDESK_LOCALE", global = true)]
    pub default_locale: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Start the interactive console.
    Console,

    /// Search articles by keyword and print the result.
    Search {
        /// Search keywords.
        query: String,

        /// Locale to search in.
        #[arg(short, long)]
        locale: Option<String>,

        /// Result page (non-numeric values fall back to 1).
        #[arg(long)]
        page: Option<String>,

        /// Results per page (non-numeric values fall back to 20).
        #[arg(long)]
        per_page: Option<String>,
    },

    /// Fetch one article by id and print it.
    Article {
        /// Numeric article id.
        id: u64,

        /// Locale of the translation to fetch.
        #[arg(short, long)]
        locale: Option<String>,
    },

    /// MCP server operations.
    #[command(name = "mcp")]
    Mcp {
        #[command(subcommand)]
        action: McpAction,
    },

    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// MCP server subcommands.
#[derive(Subcommand)]
pub(crate) enum McpAction {
    /// Serve the Help Center tools over stdio.
    Serve,
    /// Print MCP client configuration snippets.
    Config {
        /// Target client: vscode, claude-desktop, or cursor.
        #[arg(long, default_value = "vscode")]
        target: String,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Always logs to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "helpcenter=info",
        1 => "helpcenter=debug",
        _ => "helpcenter=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config = resolved_config(&cli)?;

    match cli.command {
        Command::Console => cmd_console(&config).await,
        Command::Search {
            query,
            locale,
            page,
            per_page,
        } => {
            let params = SearchParams {
                query,
                locale,
                page: page.map(LenientNumber::from),
                per_page: per_page.map(LenientNumber::from),
            };
            cmd_search(&config, params).await
        }
        Command::Article { id, locale } => cmd_article(&config, ArticleParams { id, locale }).await,
        Command::Mcp { action } => match action {
            McpAction::Serve => cmd_mcp_serve(&config).await,
            McpAction::Config { target } => cmd_mcp_config(&config, &target),
        },
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(&config),
        },
    }
}

/// Config file values with flag/env overrides applied.
fn resolved_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    config.apply_overrides(&ConfigOverrides {
        subdomain: cli.subdomain.clone(),
        email: cli.email.clone(),
        locale: cli.default_locale.clone(),
    });
    Ok(config)
}

/// Build the API client. Missing credentials are fatal here.
fn connect(config: &AppConfig) -> Result<HelpCenterClient> {
    let credentials = resolve_credentials(config)?;
    info!(subdomain = credentials.subdomain(), "help center client ready");
    Ok(HelpCenterClient::from_config(config, &credentials)?)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_console(config: &AppConfig) -> Result<()> {
    let client = connect(config)?;
    console::run(&client).await?;
    Ok(())
}

async fn cmd_search(config: &AppConfig, params: SearchParams) -> Result<()> {
    params.validate()?;
    let client = connect(config)?;

    let spinner = Spinner::new(format!("Searching for '{}'", params.query));
    let result = client.search(&params).await;
    spinner.finish();

    print_json(&result?)
}

async fn cmd_article(config: &AppConfig, params: ArticleParams) -> Result<()> {
    let client = connect(config)?;

    let spinner = Spinner::new(format!("Fetching article {}", params.id));
    let result = client.get_article(&params).await;
    spinner.finish();

    print_json(&result?)
}

async fn cmd_mcp_serve(config: &AppConfig) -> Result<()> {
    let client = connect(config)?;
    mcp::serve(client).await
}

fn cmd_mcp_config(config: &AppConfig, target: &str) -> Result<()> {
    let snippet = mcp_config_snippet(config, target)?;
    println!("{}", serde_json::to_string_pretty(&snippet)?);
    Ok(())
}

/// Build the client configuration block for `target`.
fn mcp_config_snippet(config: &AppConfig, target: &str) -> Result<serde_json::Value> {
    let server = serde_json::json!({
        "command": "helpcenter",
        "args": ["mcp", "serve"],
        "env": {
            "ZENDESK_SUBDOMAIN": config.zendesk.subdomain,
            "ZENDESK_EMAIL": config.zendesk.email,
            config.zendesk.api_token_env.clone(): "<your API token>",
        },
    });

    match target {
        "vscode" => {
            let mut server = server;
            server["type"] = serde_json::Value::from("stdio");
            Ok(serde_json::json!({ "servers": { "helpcenter": server } }))
        }
        "claude-desktop" | "cursor" => {
            Ok(serde_json::json!({ "mcpServers": { "helpcenter": server } }))
        }
        _ => Err(eyre!(
            "unknown config target '{target}': expected 'vscode', 'claude-desktop', or 'cursor'"
        )),
    }
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress spinner
// ---------------------------------------------------------------------------

/// Stderr spinner shown while a request is in flight.
struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    fn new(message: String) -> Self {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        bar.set_style(style);
        bar.set_message(message);
        bar.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { bar }
    }

    fn finish(self) {
        self.bar.finish_and_clear();
    }
}
