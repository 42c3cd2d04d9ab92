mod commands;
mod config;
mod domain;
mod platform;
mod tools;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "fieldkit", version, about = "Host diagnostics collector with sealed report archiving")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect a fresh diagnostic report and write it to the output directory
    Collect {
        /// Seal the report with the report key and delete the plaintext copy
        #[arg(long)]
        encrypt: bool,

        /// Output directory (overrides config)
        #[arg(long)]
        out_dir: Option<String>,

        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,

        /// Per-probe timeout in seconds (overrides config)
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Path to the report key file (used with --encrypt)
        #[arg(long)]
        key_file: Option<String>,
    },

    /// Display the persisted report without collecting
    Show {
        /// Output directory (overrides config)
        #[arg(long)]
        out_dir: Option<String>,

        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// List this platform's section catalog without running anything
    Sections,

    /// Generate a report key and write it to the key file
    Keygen {
        /// Key file path (overrides config)
        #[arg(long)]
        out: Option<String>,

        /// Overwrite an existing key file
        #[arg(long)]
        force: bool,
    },

    /// Open a sealed report and recover the plaintext
    Decrypt {
        /// Path to the sealed report file
        input: String,

        /// Write the recovered plaintext here instead of stdout
        #[arg(long)]
        out: Option<String>,

        /// Path to the report key file (overrides config)
        #[arg(long)]
        key_file: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Collect {
            encrypt,
            out_dir,
            format,
            timeout_secs,
            key_file,
        } => commands::collect::run(
            encrypt,
            out_dir.as_deref(),
            &format,
            timeout_secs,
            key_file.as_deref(),
        ),
        Commands::Show { out_dir, format } => commands::show::run(out_dir.as_deref(), &format),
        Commands::Sections => commands::sections::run(),
        Commands::Keygen { out, force } => commands::keygen::run(out.as_deref(), force),
        Commands::Decrypt {
            input,
            out,
            key_file,
        } => commands::decrypt::run(&input, out.as_deref(), key_file.as_deref()),
    }
}
