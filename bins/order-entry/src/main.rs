//! order-entry CLI
//!
//! Talks to the order-entry backend and runs the front end's dev server,
//! preview server and static build.

use clap::{Parser, Subcommand, ValueEnum};
use order_entry_api_client::{ApiConfig, Endpoint};
use order_entry_telemetry::{LogFormat, TelemetryConfig};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

use commands::{build, call, endpoints, lookup, ping, save, serve};

/// Order-entry backend client and front-end tooling
#[derive(Parser)]
#[command(name = "order-entry")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log line format (compact, json)
    #[arg(long, global = true, default_value = "compact")]
    log_format: LogFormat,

    /// Backend base URL (overrides ORDER_ENTRY_API_URL / VITE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON on stdout
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List the configured endpoints and their full URLs
    Endpoints,

    /// Print the full URL for one endpoint key
    Url {
        /// Endpoint key, e.g. LOOKUP_CUSTOMER
        endpoint: Endpoint,
    },

    /// Call the backend connectivity test endpoint
    Ping {
        /// Use POST instead of GET
        #[arg(long)]
        post: bool,
    },

    /// Look up customers
    Customers {
        /// Customer name prefix
        #[arg(short, long)]
        name: Option<String>,

        /// Page number (1-based)
        #[arg(short, long)]
        page: Option<u32>,
    },

    /// Look up products
    Products {
        /// Product name prefix
        #[arg(short, long)]
        name: Option<String>,

        /// Page number (1-based)
        #[arg(short, long)]
        page: Option<u32>,
    },

    /// Save an order read from a JSON file ("-" for stdin)
    Save {
        /// Order JSON file
        file: PathBuf,
    },

    /// Send a raw request to a backend path and print the JSON reply
    Call {
        /// Path appended to the base URL, e.g. /api/test
        path: String,

        /// HTTP method
        #[arg(short = 'X', long, default_value = "GET")]
        method: String,

        /// Extra header as "Name: value" (repeatable)
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,

        /// Request body
        #[arg(short, long)]
        data: Option<String>,
    },

    /// Run the dev server (static root + /api proxy)
    Dev {
        /// Config file (defaults to order-entry.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Port (overrides PORT)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Serve the build output (+ /api proxy)
    Preview {
        /// Config file (defaults to order-entry.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Port (overrides PORT)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Build the static front end into the output directory
    Build {
        /// Config file (defaults to order-entry.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Force a production build
        #[arg(long)]
        production: bool,
    },
}

/// Shared command context
pub struct Context {
    pub api: ApiConfig,
    /// Base URL given with `--api-url`, if any
    pub api_url: Option<String>,
    pub format: OutputFormat,
    pub verbose: bool,
}

impl Context {
    /// Whether to draw spinners and colors
    pub fn interactive(&self) -> bool {
        self.format == OutputFormat::Text
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let telemetry = if cli.verbose {
        TelemetryConfig::verbose()
    } else {
        TelemetryConfig::default()
    };
    if let Err(e) = order_entry_telemetry::init_with_config(telemetry.with_format(cli.log_format)) {
        eprintln!("{} {}", "Warning:".yellow().bold(), e);
    }

    let mut api = ApiConfig::from_env();
    if let Some(url) = &cli.api_url {
        api = api.with_base_url(url.clone());
    }
    let ctx = Context {
        api,
        api_url: cli.api_url,
        format: cli.format,
        verbose: cli.verbose,
    };

    let result = match cli.command {
        Commands::Endpoints => endpoints::list(&ctx),
        Commands::Url { endpoint } => endpoints::url(&ctx, endpoint),
        Commands::Ping { post } => ping::run(&ctx, post).await,
        Commands::Customers { name, page } => lookup::customers(&ctx, name, page).await,
        Commands::Products { name, page } => lookup::products(&ctx, name, page).await,
        Commands::Save { file } => save::run(&ctx, &file).await,
        Commands::Call {
            path,
            method,
            headers,
            data,
        } => call::run(&ctx, &path, &method, &headers, data).await,
        Commands::Dev { config, port } => serve::dev(&ctx, config.as_deref(), port).await,
        Commands::Preview { config, port } => {
            serve::preview(&ctx, config.as_deref(), port).await
        }
        Commands::Build { config, production } => {
            build::run(&ctx, config.as_deref(), production)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
