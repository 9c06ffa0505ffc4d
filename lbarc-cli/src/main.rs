//! lbarc CLI - HQR archive and LZ codec tool
//!
//! Compresses and decompresses raw LZSS/LZMIT streams, and inspects and
//! edits the HQR containers Little Big Adventure keeps its resources in.

mod commands;
mod utils;

use clap::{Parser, Subcommand};
use commands::{
    cmd_add, cmd_add_child, cmd_compress, cmd_decompress, cmd_delete, cmd_extract, cmd_list,
    cmd_test,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lbarc")]
#[command(author, version, about = "HQR archive and LZSS/LZMIT codec tool")]
#[command(long_about = "
lbarc reads, writes and edits HQR resource containers and converts single
resources between the Store (0), LZSS (1) and LZMIT (2) codecs.

Examples:
  lbarc compress 1 sprite.raw sprite.lz
  lbarc decompress 1 sprite.lz sprite.raw --size 4096
  lbarc list RESS.HQR
  lbarc list RESS.HQR --json
  lbarc extract RESS.HQR 12 -o palette.pal
  lbarc extract RESS.HQR 12 --child 0 -o hidden.bin
  lbarc test RESS.HQR
  lbarc add RESS.HQR music.xmi --codec 2
  lbarc add-child RESS.HQR 3 overlay.bin
  lbarc delete RESS.HQR 5
")]
struct Cli {
    /// Log debug diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file into a raw codec stream
    #[command(alias = "c")]
    Compress {
        /// Codec id (0 = store, 1 = LZSS, 2 = LZMIT)
        codec: u16,

        /// Input file
        source: PathBuf,

        /// Output file (replaced if it exists)
        destination: PathBuf,
    },

    /// Decompress a raw codec stream into a file
    #[command(alias = "d")]
    Decompress {
        /// Codec id (0 = store, 1 = LZSS, 2 = LZMIT)
        codec: u16,

        /// Input file
        source: PathBuf,

        /// Output file (replaced if it exists)
        destination: PathBuf,

        /// Expected decoded size; decodes until the input ends if omitted
        #[arg(short, long)]
        size: Option<usize>,
    },

    /// List the entries of an HQR archive
    #[command(alias = "l")]
    List {
        /// Archive file to list
        archive: PathBuf,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,

        /// Report header anomalies instead of failing on them
        #[arg(long)]
        lenient: bool,
    },

    /// Decode one entry to a file
    #[command(alias = "x")]
    Extract {
        /// Archive file
        archive: PathBuf,

        /// Entry index
        index: usize,

        /// Extract this hidden child of the entry instead
        #[arg(short, long)]
        child: Option<usize>,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Decode every entry and report failures
    #[command(alias = "t")]
    Test {
        /// Archive file to test
        archive: PathBuf,
    },

    /// Delete an entry and save the archive
    Delete {
        /// Archive file
        archive: PathBuf,

        /// Entry index
        index: usize,

        /// Also delete hidden children instead of promoting the first one
        #[arg(long)]
        children: bool,
    },

    /// Add a file as a new entry and save the archive
    #[command(alias = "a")]
    Add {
        /// Archive file (created if missing)
        archive: PathBuf,

        /// File to add
        file: PathBuf,

        /// Codec id; falls back to store when it does not shrink the data
        #[arg(short, long, default_value_t = 1)]
        codec: u16,

        /// Insert before this entry instead of appending
        #[arg(long)]
        at: Option<usize>,

        /// Attach to the previous entry as a hidden child when possible
        #[arg(long)]
        as_child: bool,
    },

    /// Add a file as the last hidden child of an entry and save the archive
    AddChild {
        /// Archive file
        archive: PathBuf,

        /// Owning entry index
        index: usize,

        /// File to add
        file: PathBuf,

        /// Codec id; falls back to store when it does not shrink the data
        #[arg(short, long, default_value_t = 1)]
        codec: u16,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "lbarc=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Compress {
            codec,
            source,
            destination,
        } => cmd_compress(codec, &source, &destination),
        Commands::Decompress {
            codec,
            source,
            destination,
            size,
        } => cmd_decompress(codec, &source, &destination, size),
        Commands::List {
            archive,
            json,
            lenient,
        } => cmd_list(&archive, json, lenient),
        Commands::Extract {
            archive,
            index,
            child,
            output,
        } => cmd_extract(&archive, index, child, &output),
        Commands::Test { archive } => cmd_test(&archive, cli.verbose),
        Commands::Delete {
            archive,
            index,
            children,
        } => cmd_delete(&archive, index, children),
        Commands::Add {
            archive,
            file,
            codec,
            at,
            as_child,
        } => cmd_add(&archive, &file, codec, at, as_child),
        Commands::AddChild {
            archive,
            index,
            file,
            codec,
        } => cmd_add_child(&archive, index, &file, codec),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
