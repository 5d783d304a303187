use anyhow::Result;
use clap::{Parser, Subcommand};
use dalbit::{list_posts, list_site, locate_root, run_serve, watch_build};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "dalbit")]
#[command(version = concat!(env!("DALBIT_VERSION"), " ", env!("BUILD_INFO")))]
#[command(about = "Build the RSS feed of a markdown blog.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build the feed.
    Build {
        /// The source directory of the blog.
        #[arg(default_value_t = String::from("."))]
        source: String,
        /// The destination directory. Default dest dir is `build`.
        #[arg(default_value_t = String::from("build"))]
        dest: String,
        /// Enable watching.
        #[arg(short, long)]
        watch: bool,
    },
    /// Serve the feed, rebuilt on every request.
    Serve {
        /// The source directory of the blog.
        #[arg(default_value_t = String::from("."))]
        source: String,
        /// The listen port.
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// List posts, newest first.
    List {
        /// The source directory of the blog.
        #[arg(default_value_t = String::from("."))]
        source: String,
        /// Print posts as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Commands::Build {
            source,
            dest,
            watch,
        } => {
            watch_build(&source, &dest, watch).await?;
        }
        Commands::Serve { source, port } => {
            run_serve(source, port).await?;
        }
        Commands::List { source, json } => list(&source, json)?,
    }

    Ok(())
}

fn list(source: &str, json: bool) -> Result<()> {
    let (root, blog) = locate_root(source)?;
    if json {
        let posts = list_posts(&root, &blog)?;
        println!("{}", serde_json::to_string_pretty(&posts)?);
        return Ok(());
    }

    for line in list_site(&root, &blog)? {
        println!("{line}");
    }
    Ok(())
}
