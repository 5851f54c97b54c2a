//! Swarmwatch - A terminal watcher for remote search results
//!
//! This is the main entry point for the Swarmwatch client.

use clap::{Parser, Subcommand, ValueEnum};
use log::{error, info};
use resultsync::config::CLIENT_CONFIG_FILE;
use resultsync::{ClientConfig, GroupingMode, HttpRemote, SearchId};
use std::path::PathBuf;
use std::sync::Arc;

mod app;

use app::{Focus, SwarmwatchApp};

#[derive(Debug, Parser)]
#[command(version, about, rename_all = "kebab")]
struct Args {
    /// Client config file (defaults to ~/.config/swarmwatch/client.json)
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the remote base URL
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Grouping of the selected search
    #[arg(long, short = 'g', value_enum)]
    grouping: Option<Grouping>,

    /// Search to watch
    #[arg(long, short = 's', value_name = "SEARCH_ID")]
    search: Option<String>,

    /// Sender to show details for (by-sender grouping)
    #[arg(long, value_name = "SENDER", conflicts_with = "file")]
    sender: Option<String>,

    /// File to show details for (by-file grouping)
    #[arg(long, value_name = "CONTENT_ID")]
    file: Option<String>,

    /// Open the trust list published by this user
    #[arg(long, value_name = "USER")]
    trust_list: Option<String>,

    /// Poll once and exit
    #[arg(long)]
    once: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write the default client config to the config directory
    InitConfig,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Grouping {
    Sender,
    File,
}

impl From<Grouping> for GroupingMode {
    fn from(g: Grouping) -> Self {
        match g {
            Grouping::Sender => GroupingMode::Sender,
            Grouping::File => GroupingMode::File,
        }
    }
}

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    // Bootstrap config directory
    if let Err(e) = config::init() {
        error!("Failed to initialize config directory: {}", e);
    }

    let args = Args::parse();
    if let Err(e) = run(args) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    if let Some(Command::InitConfig) = args.command {
        let path = config::save_json(CLIENT_CONFIG_FILE, &ClientConfig::default())?;
        info!("Wrote default config to {}", path.display());
        return Ok(());
    }

    let mut cfg = ClientConfig::load(args.config.as_deref())?;
    if let Some(url) = args.base_url {
        cfg.base_url = url;
    }
    if let Some(grouping) = args.grouping {
        cfg.default_grouping = grouping.into();
    }

    let remote = Arc::new(HttpRemote::new(cfg.base_url.clone(), cfg.request_timeout()));
    info!("Watching {}", cfg.base_url);

    let mut app = SwarmwatchApp::new(remote, cfg);

    if let Some(search) = args.search {
        let focus = match (args.sender, args.file) {
            (Some(sender), _) => Some(Focus::Sender(sender)),
            (None, Some(content_id)) => Some(Focus::File(content_id)),
            (None, None) => None,
        };
        app.watch(SearchId::new(search), focus);
    }
    if let Some(user) = args.trust_list {
        app.open_trust_list(user);
    }

    if args.once {
        app.tick();
        return Ok(());
    }
    app.run()
}
