//! Command line interface.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use tracing::info;

use pdfshelf::catalog::{CatalogView, LoadState};
use pdfshelf::config::{load_settings, Settings};
use pdfshelf::render::{format_date, render_page};
use pdfshelf::server;
use pdfshelf::storage::PreferenceStore;
use pdfshelf::CatalogController;

#[derive(Parser)]
#[command(name = "pdfshelf")]
#[command(about = "Browse a JSON manifest of PDF documents", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Manifest location (URL, path relative to --base-url, or local file)
    #[arg(long, env = "PDFSHELF_MANIFEST", global = true)]
    pub manifest: Option<String>,

    /// Base URL for relative manifest locations
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Directory holding the preference and cache database
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Manifest request timeout in milliseconds
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Skip the local manifest cache
    #[arg(long, global = true)]
    pub no_cache: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load the manifest and write the catalog page
    Render {
        /// Free-text search
        #[arg(short, long, default_value = "")]
        query: String,

        /// Category to show ("all" for every category)
        #[arg(short, long, default_value = "all")]
        category: String,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Print matching documents
    List {
        /// Free-text search
        #[arg(short, long, default_value = "")]
        query: String,

        /// Category to show ("all" for every category)
        #[arg(short, long, default_value = "all")]
        category: String,
    },

    /// Print the categories present in the manifest
    Categories,

    /// Show or toggle the color theme
    Theme {
        #[arg(value_enum, default_value_t = PreferenceAction::Show)]
        action: PreferenceAction,
    },

    /// Show or toggle the grid/list layout
    View {
        #[arg(value_enum, default_value_t = PreferenceAction::Show)]
        action: PreferenceAction,
    },

    /// Serve the catalog page locally
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PreferenceAction {
    Show,
    Toggle,
}

impl Cli {
    /// Apply command line overrides on top of configured settings.
    fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref manifest) = self.manifest {
            settings.manifest = manifest.clone();
        }
        if let Some(ref base_url) = self.base_url {
            settings.base_url = Some(base_url.clone());
        }
        if let Some(ref data_dir) = self.data_dir {
            settings.data_dir = data_dir.clone();
        }
        if let Some(timeout) = self.timeout_ms {
            settings.request_timeout_ms = timeout;
        }
        if self.no_cache {
            settings.cache_enabled = false;
        }
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let mut settings = load_settings().await;
    cli.apply_to_settings(&mut settings);

    match cli.command {
        Commands::Render {
            query,
            category,
            out,
        } => cmd_render(&settings, query, category, out).await,
        Commands::List { query, category } => cmd_list(&settings, query, category).await,
        Commands::Categories => cmd_categories(&settings).await,
        Commands::Theme { action } => cmd_theme(&settings, action),
        Commands::View { action } => cmd_view(&settings, action),
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| settings.host.clone());
            let port = port.unwrap_or(settings.port);
            server::serve(&settings, &host, port).await
        }
    }
}

/// Load the catalog with the given filters applied.
async fn load_catalog(settings: &Settings, query: String, category: String) -> Result<CatalogController> {
    let store = settings.open_store();
    let mut controller = settings.build_controller(store)?;
    controller.set_query(query);
    controller.set_category(category);
    controller.load(&mut |_: &CatalogView| {}).await;
    Ok(controller)
}

async fn cmd_render(
    settings: &Settings,
    query: String,
    category: String,
    out: Option<PathBuf>,
) -> Result<()> {
    let controller = load_catalog(settings, query, category).await?;
    let page = render_page(&controller.view());

    match out {
        Some(path) => {
            std::fs::write(&path, page)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("Wrote catalog page to {}", path.display());
        }
        None => println!("{}", page),
    }
    Ok(())
}

async fn cmd_list(settings: &Settings, query: String, category: String) -> Result<()> {
    let controller = load_catalog(settings, query, category).await?;

    if let LoadState::Failed(message) = &controller.state().load_state {
        anyhow::bail!("Gagal memuat data: {}", message);
    }

    let items = controller.filtered();
    for item in &items {
        println!(
            "{}  {}",
            style(&item.title).bold(),
            style(format!("[{}]", item.category)).dim()
        );
        if !item.description.is_empty() {
            println!("    {}", item.description);
        }
        if let Some(url) = item.open_url() {
            println!("    {}", style(url).cyan());
        }
        if let Some(updated) = item.updated_at.as_deref() {
            println!("    {}", style(format_date(updated)).dim());
        }
    }

    let view = controller.view();
    println!();
    println!(
        "{} · diperbarui {}",
        style(view.count_label()).bold(),
        view.updated_label
    );
    Ok(())
}

async fn cmd_categories(settings: &Settings) -> Result<()> {
    let controller = load_catalog(settings, String::new(), "all".to_string()).await?;

    if let LoadState::Failed(message) = &controller.state().load_state {
        anyhow::bail!("Gagal memuat data: {}", message);
    }

    for category in controller.state().categories.values() {
        println!("{}", category);
    }
    Ok(())
}

fn cmd_theme(settings: &Settings, action: PreferenceAction) -> Result<()> {
    let prefs = PreferenceStore::new(settings.open_store());
    let theme = match action {
        PreferenceAction::Show => prefs.theme(),
        PreferenceAction::Toggle => prefs.toggle_theme(),
    };
    println!("{} {}", theme.icon(), theme);
    Ok(())
}

fn cmd_view(settings: &Settings, action: PreferenceAction) -> Result<()> {
    let prefs = PreferenceStore::new(settings.open_store());
    let view_mode = match action {
        PreferenceAction::Show => prefs.view_mode(),
        PreferenceAction::Toggle => prefs.toggle_view_mode(),
    };
    println!("{} {}", view_mode.icon(), view_mode);
    Ok(())
}
