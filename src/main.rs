mod cli;
mod settings;
mod web;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use settings::Settings;

#[derive(Parser)]
#[command(name = "wikipath", version, about = "Shortest paths between Wikipedia articles")]
struct Cli {
    /// Optional config file (TOML/YAML/JSON), layered under environment variables.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a `.wpindex` artifact from a bzip2 multistream dump.
    Index {
        /// Path to the `...-pages-articles-multistream.xml.bz2` dump.
        dump: PathBuf,
        /// Path to the matching `...-multistream-index.txt` stream index.
        stream_index: PathBuf,
        /// Output path for the built `.wpindex` file.
        #[arg(short, long, default_value = "wikipath.wpindex")]
        output: PathBuf,
        /// Worker thread count; defaults to the configured/CPU count.
        #[arg(short, long)]
        workers: Option<usize>,
    },
    /// Show an article's entry in the index.
    IndexShow {
        wpindex: PathBuf,
        /// The article title to look up.
        title: String,
    },
    /// Load a `.wpindex` into memory and serve shortest-path queries over HTTP.
    Start {
        wpindex: PathBuf,
        #[arg(short, long)]
        listen_addr: Option<String>,
        #[arg(short, long)]
        workers: Option<usize>,
        #[arg(short, long)]
        max_depth: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(s) => s,
        Err(err) => {
            log::error!("loading configuration: {err:#}");
            return ExitCode::from(cli::EXIT_FAILURE);
        }
    };

    match cli.command {
        Command::Index {
            dump,
            stream_index,
            output,
            workers,
        } => cli::run_cli(|| cli::index::run(&dump, &stream_index, &output, workers.unwrap_or(settings.workers))),
        Command::IndexShow { wpindex, title } => cli::run_cli(|| cli::index_show::run(&wpindex, &title)),
        Command::Start {
            wpindex,
            listen_addr,
            workers,
            max_depth,
        } => {
            let listen_addr = listen_addr.unwrap_or(settings.listen_addr.clone());
            let workers = workers.unwrap_or(settings.workers);
            let max_depth = max_depth.or(settings.max_depth);
            match cli::start::run(&wpindex, &listen_addr, workers, max_depth).await {
                Ok(()) => ExitCode::from(cli::EXIT_OK),
                Err(err) => {
                    log::error!("{err:#}");
                    ExitCode::from(cli::EXIT_FAILURE)
                }
            }
        }
    }
}
