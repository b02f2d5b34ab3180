// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! proddb CLI - vendor, product and version catalog with tree selection

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use proddb::commands::{self, product::ProductArgs, version::VersionArgs, CommandContext};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "proddb")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(short, long, env = "PRODDB_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Data directory override
    #[arg(long, env = "PRODDB_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR", global = true, value_parser = clap::builder::FalseyValueParser::new())]
    no_color: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage vendors
    Vendor {
        /// Action: create, list, show, delete
        action: String,

        /// Vendor name or ID
        name: Option<String>,

        /// Description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Manage products
    Product {
        /// Action: create, list, show, delete, export
        action: String,

        /// Product name or ID
        name: Option<String>,

        /// Owning vendor (name or ID)
        #[arg(long)]
        vendor: Option<String>,

        /// Product type (software, hardware, firmware)
        #[arg(long = "type")]
        product_type: Option<String>,

        /// Description
        #[arg(short, long)]
        description: Option<String>,

        /// Selected products (list shows checkboxes, export writes them)
        #[arg(long)]
        select: Vec<String>,

        /// Output file for export (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Manage product versions
    Version {
        /// Action: create, list, show, delete
        action: String,

        /// Version name or ID
        name: Option<String>,

        /// Owning product (name or ID)
        #[arg(long)]
        product: Option<String>,

        /// Release date (YYYY-MM-DD)
        #[arg(long)]
        released: Option<String>,

        /// Description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Manage relationships between versions
    Relationship {
        /// Action: add, remove, list, categories
        action: String,

        /// Source version (name or ID)
        #[arg(long)]
        from: Option<String>,

        /// Target version (name or ID)
        #[arg(long)]
        to: Option<String>,

        /// Relationship category
        #[arg(long)]
        category: Option<String>,

        /// Relationship ID (for remove)
        #[arg(long)]
        id: Option<String>,
    },

    /// Manage identification helpers
    Helper {
        /// Action: add, list, remove, categories
        action: String,

        /// Product version (name or ID)
        #[arg(long = "for", value_name = "VERSION")]
        for_version: Option<String>,

        /// Helper category (cpe, hashes, models, purl, sbom, serial_numbers, skus, uri)
        #[arg(long)]
        category: Option<String>,

        /// Helper data, comma separated where the category takes a list
        #[arg(long)]
        data: Option<String>,

        /// Helper ID (for remove)
        #[arg(long)]
        id: Option<String>,
    },

    /// Print the catalog tree
    Tree {
        /// Toggle a node (ID or name); repeat to replay several clicks
        #[arg(long)]
        select: Vec<String>,
    },

    /// Export the catalog to various formats
    Export {
        /// Output format (dot, json, tree)
        #[arg(short, long, default_value = "tree")]
        format: String,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace the local catalog with the one served by the API
    Pull {
        /// API base URL (defaults to the configured api_url)
        #[arg(long)]
        api_url: Option<String>,
    },

    /// Launch interactive Tree View
    View,

    /// Get or set configuration
    Config {
        /// Configuration key
        key: String,

        /// Value to set (omit to get)
        value: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = proddb::config::load(cli.config.as_deref())?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir.clone_from(dir);
    }

    // Initialize logging; RUST_LOG wins over flags and config
    let level = match cli.verbose {
        0 if cli.quiet => "error",
        0 => config.log_level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_file = cli.config.clone().or_else(proddb::config::default_path);
    tracing::debug!(
        config = ?config_file,
        data_dir = %config.data_dir.display(),
        api_url = %config.api_url,
        "configuration loaded"
    );

    if cli.no_color {
        owo_colors::set_override(false);
    }

    let ctx = CommandContext {
        config,
        config_path: cli.config.clone(),
        json: cli.json,
    };

    // Execute command
    match cli.command {
        Commands::Vendor { action, name, description } => {
            commands::vendor::run(&ctx, &action, name, description)
        }
        Commands::Product { action, name, vendor, product_type, description, select, output } => {
            let args = ProductArgs { vendor, product_type, description, select, output };
            commands::product::run(&ctx, &action, name, args)
        }
        Commands::Version { action, name, product, released, description } => {
            let args = VersionArgs { product, released, description };
            commands::version::run(&ctx, &action, name, args)
        }
        Commands::Relationship { action, from, to, category, id } => {
            commands::relationship::run(&ctx, &action, from, to, category, id)
        }
        Commands::Helper { action, for_version, category, data, id } => {
            commands::helper::run(&ctx, &action, for_version, category, data, id)
        }
        Commands::Tree { select } => commands::tree::run(&ctx, &select),
        Commands::Export { format, output } => commands::export::run(&ctx, &format, output),
        Commands::Pull { api_url } => commands::pull::run(&ctx, api_url),
        Commands::View => commands::view::run(&ctx),
        Commands::Config { key, value } => commands::config::run(&ctx, &key, value),
        Commands::Completions { shell } => commands::completions::run(shell, &mut Cli::command()),
    }
}
