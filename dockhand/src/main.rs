use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod context;
mod format;
mod prompt;

/// Dockhand - Docker Hub pull assistant
///
/// Logs in with a saved or typed access token, helps pick an image by number,
/// name or search, then pulls (and optionally scans) it with the local engine.
#[derive(Parser, Debug)]
#[command(name = "dockhand")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Control colored output: auto, always, never
    #[arg(long, global = true, default_value = "auto")]
    color: String,

    /// Hub API base URL
    #[arg(long, global = true, env = "DOCKHAND_HUB_URL")]
    hub_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pick an image interactively, pull it and optionally scan it
    Pull {
        /// Image reference; skips repository listing and search
        input: Option<String>,
        /// Require an organization login
        #[arg(long, conflicts_with = "public")]
        org: bool,
        /// Skip login and search public repositories
        #[arg(long)]
        public: bool,
        /// Scan the image after pulling without asking
        #[arg(long)]
        scan: bool,
    },
    /// Log in and optionally save the credentials
    Login {
        /// Save the credentials without asking
        #[arg(long)]
        save: bool,
    },
    /// Search public repositories
    Search {
        /// Search term
        term: String,
        /// Output format: pretty, json, yaml
        #[arg(short, long, default_value = "pretty")]
        format: String,
        /// Limit number of results
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List tags of a repository
    Tags {
        /// Repository (nginx, bitnami/redis)
        repository: String,
        /// Output format: pretty, json, yaml
        #[arg(short, long, default_value = "pretty")]
        format: String,
        /// Limit number of results
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List local images
    Images {
        /// Output format: pretty, json, yaml
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
    /// Remove a local image
    Rmi {
        /// Image reference or ID
        reference: String,
        /// Skip confirmation and remove containers using the image
        #[arg(short, long)]
        force: bool,
    },
    /// Check the local engine, the credential file and the hub
    Doctor {
        /// Output format: pretty, json, yaml
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
    /// Manage the credential file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Write a credential file template
    Init,
    /// Display the credential file with the token masked
    Show {
        /// Output format: pretty, json, yaml
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
    /// Print the credential file location
    Path,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Build context with precedence: defaults > credential file > env vars > CLI flags
    let ctx = context::AppContext::build(
        format::ColorChoice::from(cli.color.as_str()),
        context::VerbosityLevel::from_count(cli.verbose),
        cli.hub_url.as_deref(),
    );

    // RUST_LOG wins over -v and DEBUG
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(ctx.log_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    tracing::debug!(
        hub_url = %ctx.hub_url,
        credentials = %ctx.credentials_path.display(),
        debug = ctx.debug,
        "context built"
    );

    match cli.command {
        Commands::Pull {
            input,
            org,
            public,
            scan,
        } => {
            let policy = commands::pull::LoginPolicy::from_flags(org, public);
            commands::pull::handle_pull(&ctx, policy, scan, input.as_deref()).await;
        }
        Commands::Login { save } => commands::login::handle_login(&ctx, save),
        Commands::Search {
            term,
            format,
            limit,
        } => {
            let fmt = format::OutputFormat::from(format.as_str());
            commands::search::handle_search(&ctx, &term, fmt, limit).await;
        }
        Commands::Tags {
            repository,
            format,
            limit,
        } => {
            let fmt = format::OutputFormat::from(format.as_str());
            commands::tags::handle_tags(&ctx, &repository, fmt, limit).await;
        }
        Commands::Images { format } => {
            let fmt = format::OutputFormat::from(format.as_str());
            commands::images::handle_images(&ctx, fmt);
        }
        Commands::Rmi { reference, force } => {
            commands::images::handle_rmi(&ctx, &reference, force);
        }
        Commands::Doctor { format } => {
            let fmt = format::OutputFormat::from(format.as_str());
            commands::doctor::handle_doctor(&ctx, fmt).await;
        }
        Commands::Config { command } => match command {
            ConfigCommands::Init => commands::config::handle_init(&ctx),
            ConfigCommands::Show { format } => {
                let fmt = format::OutputFormat::from(format.as_str());
                commands::config::handle_show(&ctx, fmt);
            }
            ConfigCommands::Path => commands::config::handle_path(&ctx),
        },
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
        }
    }
}
