use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use orchestrator::config::{Site, SiteConfig};
use orchestrator::db::Database;
use orchestrator::manifest::{self, tree_render};
use orchestrator::models::{BrandingInput, WEBSITE_SETTINGS};
use orchestrator::{api, branding, install};

#[derive(Parser)]
#[command(name = "orchestrator")]
#[command(about = "Module manifests, fixtures and branding for Chateau Orchestrator")]
struct Cli {
    /// Directory holding the `sites/` tree
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Site to operate on
    #[arg(long, global = true)]
    site: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the site store and its website settings record
    Init,
    /// Load and validate manifests without touching a site
    Validate {
        /// Directory of `*.toml` manifests (defaults to the bundled set)
        #[arg(long)]
        apps: Option<PathBuf>,
    },
    /// Register manifests into the site and seed their fixtures
    Install {
        /// Directory of `*.toml` manifests (defaults to the bundled set)
        #[arg(long)]
        apps: Option<PathBuf>,
    },
    /// Apply Chateau Orchestrator branding to the website settings
    Brand,
    /// Show modules registered in the site
    Modules,
    /// Serve the site's registered modules over HTTP
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value = "8000")]
        port: u16,
    },
}

/// Logs go to stderr so stdout carries only command output.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "orchestrator=info,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let site = Site::resolve(cli.data_dir, cli.site)?;

    match cli.command {
        Commands::Init => {
            let db = Database::open(site.db_path())?;
            db.migrate()?;
            db.ensure_settings(WEBSITE_SETTINGS)?;

            let config_path = site.config_path();
            if !config_path.exists() {
                SiteConfig::default().save(&config_path)?;
            }

            println!("Initialised site {} at {}", site.name, site.dir.display());
        }
        Commands::Validate { apps } => {
            let registry = manifest::load_registry(apps.as_deref())?;
            print!("{}", tree_render::render_registry(&registry));
            println!("{} module(s) valid", registry.len());
        }
        Commands::Install { apps } => {
            let registry = manifest::load_registry(apps.as_deref())?;

            let db = Database::connect(&site.db_path())?;
            db.migrate()?;
            let report = install::install(&db, &registry)?;

            for module in &report.modules {
                println!("Registered {} {}", module.manifest.name, module.manifest.version);
            }
            println!(
                "Fixtures: {} created, {} already present",
                report.inserted_count(),
                report.existing_count()
            );
        }
        Commands::Brand => {
            let report = branding::run(&site, &BrandingInput::default())
                .with_context(|| format!("Branding site {} failed", site.name))?;
            print!("{}", report);
        }
        Commands::Modules => {
            let db = Database::connect(&site.db_path())?;
            let modules = db.get_registered_modules()?;
            let nodes: Vec<_> = modules
                .iter()
                .map(|m| tree_render::manifest_node(&m.manifest))
                .collect();
            print!("{}", tree_render::render_tree(&nodes));
        }
        Commands::Serve { port } => {
            let db = Database::connect(&site.db_path())?;
            db.migrate()?;
            let site_config = SiteConfig::load(&site.config_path())?;

            let app = api::create_router(db, site_config);

            let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
            tracing::info!(
                "Serving site {} on http://127.0.0.1:{}",
                site.name,
                port
            );

            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
