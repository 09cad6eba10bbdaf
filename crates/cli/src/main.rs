//! guestlink command-line front end.
//!
//! This binary exposes the bridge's host-independent pieces for inspection and scripting:
//! 1. **Encode:** Turn a JSON document into the wire bytes the guest would receive.
//! 2. **Signal:** Encode a host signal (name plus JSON arguments) as the guest sees it.
//! 3. **Probe:** Report the firmware image modification time the controller would observe.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;
use std::time::UNIX_EPOCH;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use guestlink_core::codec::{self, Value};
use guestlink_core::common::Signal;
use guestlink_core::config::Config;
use guestlink_core::{bridge, controller::ImageWatch};

#[derive(Parser, Debug)]
#[command(
    name = "guestlink",
    author,
    version,
    about = "Host/guest bridge tooling",
    long_about = "Encode values and signals into the guest wire format, or probe the watched firmware image.\n\nExamples:\n  guestlink encode --input value.json --hex\n  echo '[1, \"two\", null]' | guestlink encode --hex\n  guestlink signal key_down '\"keyboard\"' 97 30\n  guestlink probe --config bridge.json"
)]
struct Cli {
    /// Optional JSON configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode a JSON document (file or stdin) into wire bytes.
    Encode {
        /// JSON input file; reads stdin when omitted.
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print lowercase hex instead of raw bytes.
        #[arg(long)]
        hex: bool,
    },

    /// Encode a signal as delivered to the guest and print it as hex.
    Signal {
        /// Signal name.
        name: String,

        /// Arguments, each a JSON value.
        #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
        args: Vec<String>,
    },

    /// Print the firmware image modification time, or report it absent.
    Probe {
        /// Image path; overrides the configured one.
        #[arg(long)]
        image: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match cli.config.as_deref().map(Config::from_file).transpose() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => fail(&e),
    };
    init_logging(&config);

    let outcome = match cli.command {
        Commands::Encode { input, hex } => cmd_encode(input, hex),
        Commands::Signal { name, args } => cmd_signal(name, &args),
        Commands::Probe { image } => {
            cmd_probe(&image.map_or_else(|| config.image_watch(), ImageWatch::new));
            Ok(())
        }
    };

    if let Err(e) = outcome {
        fail(&*e);
    }
}

/// Installs the `fmt` subscriber; `RUST_LOG` wins over the configured default level.
fn init_logging(config: &Config) {
    let default_level = if config.general.trace { "trace" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn fail(e: &dyn std::error::Error) -> ! {
    eprintln!("[!] {e}");
    process::exit(1);
}

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Reads JSON from `input` or stdin, encodes it, and writes the bytes to stdout.
fn cmd_encode(input: Option<PathBuf>, hex: bool) -> CmdResult {
    let text = match input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut text = String::new();
            let _ = io::stdin().read_to_string(&mut text)?;
            text
        }
    };

    let value = codec::json::from_json_str(&text)?;
    debug!(kind = value.kind(), "encoding value");
    let bytes = codec::encode(&value)?;
    emit(&bytes, hex)
}

/// Builds a signal from a name and JSON arguments and prints its wire form.
fn cmd_signal(name: String, args: &[String]) -> CmdResult {
    let args = args
        .iter()
        .map(String::as_str)
        .map(codec::json::from_json_str)
        .collect::<Result<Vec<Value>, _>>()?;
    let signal = Signal::new(name, args);
    let bytes = bridge::encode_signal(&signal)?;
    emit(&bytes, true)
}

fn cmd_probe(watch: &ImageWatch) {
    let Some(path) = watch.path() else {
        println!("no firmware image configured");
        return;
    };
    match watch.last_modified() {
        Some(time) => {
            let secs = time
                .duration_since(UNIX_EPOCH)
                .map_or(0.0, |d| d.as_secs_f64());
            println!("{}: modified {:.3} (unix seconds)", path.display(), secs);
        }
        None => println!("{}: absent", path.display()),
    }
}

fn emit(bytes: &[u8], hex: bool) -> CmdResult {
    let mut out = io::stdout().lock();
    if hex {
        let text: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        writeln!(out, "{text}")?;
    } else {
        out.write_all(bytes)?;
    }
    out.flush()?;
    Ok(())
}
