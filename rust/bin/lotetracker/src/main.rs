//! lotetracker: batch traceability from the command line.

mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use lote::{LoteSession, QrEncoder, SuggestionField};

use config::{Backend, TrackerConfig};

#[derive(Parser)]
#[command(name = "lotetracker", about = "Batch records and QR labels", version)]
struct Cli {
    /// Config file path (default: ~/.lotetracker/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the storage directory.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Override the storage backend.
    #[arg(long, global = true, value_enum)]
    backend: Option<Backend>,

    /// Override the directory QR images are downloaded to.
    #[arg(long, global = true)]
    export_dir: Option<PathBuf>,

    /// Output format: table or json.
    #[arg(long, short, global = true, default_value = "table")]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a batch and generate its QR code.
    Submit {
        #[arg(long, default_value = "")]
        operator_name: String,
        #[arg(long, default_value = "")]
        operator_code: String,
        #[arg(long, default_value = "")]
        product: String,
        #[arg(long, default_value = "")]
        quantity: String,
        #[arg(long, default_value = "")]
        supplier: String,
        /// Batch date; defaults to now.
        #[arg(long, default_value = "")]
        date: String,
        /// Also write the PNG to the export directory.
        #[arg(long)]
        download: bool,
        /// Print the image as a data URL.
        #[arg(long)]
        data_url: bool,
    },
    /// List the most recent batches, newest first.
    History,
    /// Show one batch and its QR payload.
    Show {
        id: String,
    },
    /// List known products or suppliers matching a query.
    Suggest {
        /// products or suppliers
        #[arg(value_parser = str::parse::<SuggestionField>)]
        field: SuggestionField,
        query: Option<String>,
    },
    /// Write a batch's QR code as PNG (newest batch if no id).
    Download {
        #[arg(long)]
        id: Option<String>,
    },
    /// Quantity totals per product over the history.
    Stats,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();
    let json = match cli.output.as_str() {
        "table" => false,
        "json" => true,
        other => anyhow::bail!("unknown output format '{}', expected table or json", other),
    };

    let config_path = cli.config.clone().unwrap_or_else(TrackerConfig::default_path);
    let mut config = TrackerConfig::load(&config_path)?;
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = dir;
    }
    if let Some(backend) = cli.backend {
        config.storage.backend = backend;
    }
    if let Some(dir) = cli.export_dir {
        config.export.dir = dir;
    }

    let store = config.open_store()?;
    let mut session = LoteSession::new(store, QrEncoder::new(config.qr.size));

    match cli.command {
        Commands::Submit {
            operator_name,
            operator_code,
            product,
            quantity,
            supplier,
            date,
            download,
            data_url,
        } => {
            let raw = lote::RawSubmission {
                operator_name,
                operator_code,
                product_type: product,
                quantity,
                supplier,
                date,
            };
            let opts = commands::batch::SubmitOptions {
                download,
                data_url,
                json,
            };
            commands::batch::submit(&mut session, raw, &config, opts)
        }
        Commands::History => commands::batch::history(&session, json),
        Commands::Show { id } => commands::batch::show(&mut session, &id, json),
        Commands::Suggest { field, query } => commands::suggest::run(
            &session,
            field,
            query.as_deref().unwrap_or(""),
            json,
        ),
        Commands::Download { id } => {
            commands::batch::download(&mut session, id.as_deref(), &config, json)
        }
        Commands::Stats => commands::stats::run(&session, json),
    }
}
