//! CLI entry point for penlog

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "penlog")]
#[command(version)]
#[command(about = "A small static site generator for a personal technical blog", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new blog
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Directory name for the post (defaults to the slugified title)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Start a local server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "8000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Disable file watching and live reload
        #[arg(long)]
        r#static: bool,
    },

    /// Check the front-matter of every post
    Check,

    /// List posts
    List,

    /// Delete the public folder
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        "penlog=debug,info"
    } else {
        "penlog=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing blog in {:?}", target_dir);
            penlog::commands::init::init_site(&target_dir)?;
            println!("Initialized blog in {:?}", target_dir);
        }

        Commands::New { title, path } => {
            let blog = penlog::Blog::new(&base_dir)?;
            let file = penlog::commands::new::create_post(&blog, &title, path.as_deref())?;
            println!("Created: {:?}", file);
        }

        Commands::Generate { watch } => {
            let blog = penlog::Blog::new(&base_dir)?;
            tracing::info!("Generating static files...");
            blog.generate()?;
            println!("Generated successfully!");

            if watch {
                tokio::task::spawn_blocking(move || penlog::commands::generate::watch(&blog))
                    .await??;
            }
        }

        Commands::Server { port, ip, r#static } => {
            let blog = penlog::Blog::new(&base_dir)?;

            tracing::info!("Generating static files...");
            blog.generate()?;

            tracing::info!("Starting server at http://{}:{}", ip, port);
            penlog::server::start(&blog, &ip, port, !r#static).await?;
        }

        Commands::Check => {
            let blog = penlog::Blog::new(&base_dir)?;
            penlog::commands::check::run(&blog)?;
        }

        Commands::List => {
            let blog = penlog::Blog::new(&base_dir)?;
            penlog::commands::list::run(&blog)?;
        }

        Commands::Clean => {
            let blog = penlog::Blog::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            blog.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("penlog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
