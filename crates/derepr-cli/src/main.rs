//! derepr CLI - canonical literals, digests and journal-backed stores.

use clap::{Args, Parser, Subcommand};
use derepr_canonical::{Canonicalizer, DigestAlg, DEFAULT_MAX_DEPTH};

mod commands;
mod logging;
mod output;
mod path;

use commands::{codec, store};

#[derive(Parser)]
#[command(name = "derepr")]
#[command(about = "Canonical literal encoding, hashing and persistent mappings")]
struct Cli {
    /// Maximum nesting depth accepted when encoding or decoding
    #[arg(long, global = true, env = "DEREPR_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct StoreArgs {
    /// Path to journal file
    journal: String,
    /// Treat a partially written journal tail as end of file and cut it off
    #[arg(long)]
    permissive: bool,
    /// Fsync after every mutation
    #[arg(long)]
    sync: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the canonical text of a JSON document
    Encode {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
    },
    /// Parse canonical text and print it back in normal form
    Decode {
        /// Input file (or stdin if not provided)
        input: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the digest of a value's canonical text
    Digest {
        /// Input file (or stdin if not provided)
        input: Option<String>,
        /// Digest algorithm (sha256 or md5)
        #[arg(long, env = "DEREPR_ALG", default_value_t = DigestAlg::Sha256)]
        alg: DigestAlg,
        /// Read the value as JSON instead of canonical text
        #[arg(long)]
        from_json: bool,
        /// Print base64url instead of hex
        #[arg(long)]
        b64: bool,
    },
    /// Print the canonical key text of a value
    Key {
        /// Input file (or stdin if not provided)
        input: Option<String>,
        /// Read the value as JSON instead of canonical text
        #[arg(long)]
        from_json: bool,
    },
    /// Store a value under a key
    Put {
        #[command(flatten)]
        store: StoreArgs,
        /// Key as canonical text
        key: String,
        /// Value as canonical text
        value: String,
    },
    /// Print the value stored under a key
    Get {
        #[command(flatten)]
        store: StoreArgs,
        /// Key as canonical text
        key: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove a key
    Delete {
        #[command(flatten)]
        store: StoreArgs,
        /// Key as canonical text
        key: String,
    },
    /// List every entry
    List {
        #[command(flatten)]
        store: StoreArgs,
        /// Output one JSON object per line
        #[arg(long)]
        json: bool,
    },
    /// Print the number of entries
    Count {
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Rewrite the journal keeping only live entries
    Compact {
        #[command(flatten)]
        store: StoreArgs,
    },
}

impl StoreArgs {
    fn open(&self, canonicalizer: Canonicalizer) -> Result<store::Map, Box<dyn std::error::Error>> {
        store::open(&self.journal, self.permissive, self.sync, canonicalizer)
    }
}

fn main() {
    logging::init_logging("warn");
    let cli = Cli::parse();
    let canonicalizer = Canonicalizer::with_max_depth(cli.max_depth);

    let result = match cli.command {
        Commands::Encode { input } => codec::encode(input, canonicalizer),
        Commands::Decode { input, json } => codec::decode(input, json, canonicalizer),
        Commands::Digest {
            input,
            alg,
            from_json,
            b64,
        } => codec::digest(input, alg, from_json, b64, canonicalizer),
        Commands::Key { input, from_json } => codec::key(input, from_json, canonicalizer),
        Commands::Put { store: args, key, value } => args
            .open(canonicalizer)
            .and_then(|map| store::put(&map, &key, &value, canonicalizer)),
        Commands::Get { store: args, key, json } => args
            .open(canonicalizer)
            .and_then(|map| store::get(&map, &key, json, canonicalizer)),
        Commands::Delete { store: args, key } => args
            .open(canonicalizer)
            .and_then(|map| store::delete(&map, &key, canonicalizer)),
        Commands::List { store: args, json } => args
            .open(canonicalizer)
            .and_then(|map| store::list(&map, json, canonicalizer)),
        Commands::Count { store: args } => args.open(canonicalizer).and_then(|map| store::count(&map)),
        Commands::Compact { store: args } => {
            args.open(canonicalizer).and_then(|map| store::compact(&map))
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
