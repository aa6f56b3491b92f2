#![deny(missing_docs)]
//! A command-line interface for the Enigma cipher machine simulator.

use clap::{Parser, Subcommand};
use enigma_core::alphabet::group_letters;
use enigma_core::catalog::{REFLECTORS, ROTORS};
use enigma_core::key_generator::{KeyOptions, generate_key_sheet};
use enigma_core::key_sheet::{self, KeySheet};
use enigma_core::machine::parse_window;
use enigma_core::rotor::RotorSpec;
use enigma_core::trace::Stage;
use enigma_core::{Machine, Stepping, SymbolPolicy};
use log::{error, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(
    after_help = "EXAMPLES:\n  \n# Generate a random key sheet\nenigma-cli key generate --output ./key.json\n\n# Encrypt a file, writing ./message.txt.enc and its metadata\nenigma-cli --key ./key.json encrypt ./message.txt\n\n# Decrypt using the metadata file\nenigma-cli --key ./key.json decrypt --input ./message.txt.enc --output ./message.txt --metadata ./message.txt.enc.metadata.json\n\n# Show the signal path of each letter\nenigma-cli --key ./key.json trace HELLO"
)]
struct Cli {
    /// The path to the key sheet (JSON).
    #[arg(long, global = true, env = "ENIGMA_KEY")]
    key: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage key sheets
    Key {
        #[command(subcommand)]
        command: KeyCommands,
    },
    /// List the rotors and reflectors available for key sheets
    Catalog,
    /// Encrypt a text file with the key sheet
    Encrypt {
        /// Path to the input file to encrypt
        #[arg()]
        input: PathBuf,

        /// Path to the output file. If omitted, uses the input filename with a .enc extension.
        #[arg(short, long, value_name = "OUTPUT_FILE")]
        output: Option<PathBuf>,

        /// Start positions (e.g. "QEV"), overriding the key sheet.
        #[arg(long, value_name = "WINDOW")]
        positions: Option<String>,

        /// Reject anything that is not a letter instead of copying it through.
        #[arg(long)]
        strict: bool,

        /// Write the ciphertext in groups of this many letters, dropping everything else.
        #[arg(long, value_name = "SIZE")]
        groups: Option<usize>,
    },
    /// Decrypt a text file with the key sheet
    Decrypt {
        /// Path to the input file to decrypt
        #[arg(short, long)]
        input: PathBuf,

        /// Path to the output file to save the decrypted content
        #[arg(short, long)]
        output: PathBuf,

        /// Path to the ciphertext metadata file. If omitted, the key sheet positions are used.
        #[arg(long, value_name = "METADATA_FILE")]
        metadata: Option<PathBuf>,

        /// Start positions (e.g. "QEV"), overriding the metadata and the key sheet.
        #[arg(long, value_name = "WINDOW")]
        positions: Option<String>,
    },
    /// Print the stage-by-stage signal path of each letter
    Trace {
        /// The letters to press
        #[arg()]
        text: String,

        /// Start positions (e.g. "QEV"), overriding the key sheet.
        #[arg(long, value_name = "WINDOW")]
        positions: Option<String>,
    },
}

#[derive(Subcommand)]
#[command(
    after_help = "EXAMPLES:\n  \n# Generate a key sheet with 3 rotors and 10 plug pairs\nenigma-cli key generate --output ./key.json\n\n# Generate a reproducible 4-rotor key sheet\nenigma-cli key generate --output ./key.json --rotors 4 --seed 1939"
)]
enum KeyCommands {
    /// Generate a random key sheet
    Generate {
        /// Where to write the key sheet
        #[arg(short, long)]
        output: PathBuf,
        /// The number of rotors
        #[arg(short, long, default_value_t = 3)]
        rotors: usize,
        /// The number of plugboard cables
        #[arg(short, long, default_value_t = 10)]
        plugs: usize,
        /// Seed for reproducible settings
        #[arg(long)]
        seed: Option<u64>,
        /// Use historical double stepping instead of single-carry stepping
        #[arg(long)]
        double_step: bool,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Show the settings and fingerprint of the key sheet
    Show,
}

/// Metadata stored alongside the ciphertext to enable correct decryption.
#[derive(serde::Serialize, serde::Deserialize)]
struct CiphertextMetadata {
    key_id: String,
    key_fingerprint: String,
    start_positions: String,
    final_positions: String,
    letters: usize,
    ciphertext_hash: String,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let key = cli.key.as_deref();

    match &cli.command {
        Commands::Key { command } => match command {
            KeyCommands::Generate {
                output,
                rotors,
                plugs,
                seed,
                double_step,
                force,
            } => {
                let options = KeyOptions {
                    rotors: *rotors,
                    plug_pairs: *plugs,
                    stepping: if *double_step {
                        Stepping::DoubleStep
                    } else {
                        Stepping::Odometer
                    },
                };
                generate_key(output, &options, *seed, *force);
            }
            KeyCommands::Show => show_key(key),
        },
        Commands::Catalog => show_catalog(),
        Commands::Encrypt {
            input,
            output,
            positions,
            strict,
            groups,
        } => {
            let policy = if *strict {
                SymbolPolicy::Strict
            } else {
                SymbolPolicy::PassThrough
            };
            encrypt(
                key,
                input,
                output.as_deref(),
                positions.as_deref(),
                policy,
                *groups,
            );
        }
        Commands::Decrypt {
            input,
            output,
            metadata,
            positions,
        } => decrypt(
            key,
            input,
            output,
            metadata.as_deref(),
            positions.as_deref(),
        ),
        Commands::Trace { text, positions } => trace(key, text, positions.as_deref()),
    }
}

fn generate_key(output: &Path, options: &KeyOptions, seed: Option<u64>, force: bool) {
    if output.exists() && !force {
        error!(
            "Key sheet '{}' already exists. Use --force to overwrite it.",
            output.display()
        );
        std::process::exit(1);
    }
    info!(
        "Generating a key sheet with {} rotors and {} plug pairs.",
        options.rotors, options.plug_pairs
    );
    let generated = seed.map_or_else(
        || generate_key_sheet(&mut rand::rng(), options),
        |seed| generate_key_sheet(&mut StdRng::seed_from_u64(seed), options),
    );
    let sheet = generated.unwrap_or_else(|e| {
        error!("Failed to generate key sheet: {e}");
        std::process::exit(1);
    });
    if let Err(e) = key_sheet::save_key_sheet(output, &sheet) {
        error!("Failed to save key sheet: {e}");
        std::process::exit(1);
    }
    info!("Key sheet saved to '{}'", output.display());
    println!("{}", sheet.id);
}

fn show_key(key: Option<&Path>) {
    let (path, sheet) = require_key(key);
    let machine = build_machine(&sheet, SymbolPolicy::PassThrough);
    println!("Key Sheet: {}", sheet.id);
    println!("Path: {}", path.display());
    println!("{:-<40}", "");
    println!("Reflector: {}", machine.reflector().name());
    println!(
        "Rotors: {}",
        machine
            .rotors()
            .iter()
            .map(rotor_label)
            .collect::<Vec<_>>()
            .join(", ")
    );
    let pairs = machine.plugboard().pair_strings();
    if pairs.is_empty() {
        println!("Plugboard: (empty)");
    } else {
        println!("Plugboard: {}", pairs.join(" "));
    }
    println!("Positions: {}", machine.window());
    println!("Stepping: {}", stepping_name(machine.stepping()));
    println!();
    println!("Fingerprint: {}", key_sheet::machine_fingerprint(&machine));
}

fn show_catalog() {
    println!("Rotors:");
    println!("{:<6} {:<28} {:<6}", "Name", "Wiring", "Notch");
    println!("{:-<42}", "");
    for rotor in ROTORS {
        println!("{:<6} {:<28} {:<6}", rotor.name, rotor.wiring, rotor.notch);
    }
    println!();
    println!("Reflectors:");
    println!("{:<6} {:<28}", "Name", "Wiring");
    println!("{:-<42}", "");
    for reflector in REFLECTORS {
        println!("{:<6} {:<28}", reflector.name, reflector.wiring);
    }
}

fn encrypt(
    key: Option<&Path>,
    input: &Path,
    output: Option<&Path>,
    positions: Option<&str>,
    policy: SymbolPolicy,
    groups: Option<usize>,
) {
    let (_, sheet) = require_key(key);
    let machine = at_positions(build_machine(&sheet, policy), positions);

    let output = output.map_or_else(
        || {
            let mut new_path = input.as_os_str().to_owned();
            new_path.push(".enc");
            PathBuf::from(new_path)
        },
        Path::to_path_buf,
    );

    let plaintext = fs::read_to_string(input).unwrap_or_else(|e| {
        error!("Failed to read input file: {e}");
        std::process::exit(1);
    });

    info!(
        "Encrypting '{}' at positions {}.",
        input.display(),
        machine.window()
    );
    // A strict message may still end with the file's line break.
    let message = if policy == SymbolPolicy::Strict {
        plaintext.trim_end_matches(['\n', '\r'])
    } else {
        plaintext.as_str()
    };
    let (ciphertext, end) = machine.process_text(message).unwrap_or_else(|e| {
        error!("Failed to encrypt: {e}");
        std::process::exit(1);
    });
    let grouped = groups.map(|size| group_letters(&ciphertext, size));
    let ciphertext = grouped.unwrap_or(ciphertext);

    if let Err(e) = fs::write(&output, &ciphertext) {
        error!("Failed to write output file: {e}");
        std::process::exit(1);
    }

    let metadata = CiphertextMetadata {
        key_id: sheet.id.clone(),
        key_fingerprint: fingerprint(&sheet),
        start_positions: machine.window(),
        final_positions: end.window(),
        letters: message.chars().filter(char::is_ascii_alphabetic).count(),
        ciphertext_hash: sha256_hex(ciphertext.as_bytes()),
    };
    let metadata_path = format!("{}.metadata.json", output.display());
    let metadata_str = serde_json::to_string_pretty(&metadata).unwrap_or_else(|e| {
        error!("Failed to serialize metadata: {e}");
        std::process::exit(1);
    });
    if let Err(e) = fs::write(&metadata_path, metadata_str) {
        error!("Failed to write metadata file: {e}");
        std::process::exit(1);
    }

    println!(
        "Successfully encrypted file '{}' to '{}'",
        input.display(),
        output.display()
    );
    println!("Decryption metadata saved to '{metadata_path}'");
}

fn decrypt(
    key: Option<&Path>,
    input: &Path,
    output: &Path,
    metadata: Option<&Path>,
    positions: Option<&str>,
) {
    let (_, sheet) = require_key(key);
    let machine = build_machine(&sheet, SymbolPolicy::PassThrough);

    let ciphertext = fs::read_to_string(input).unwrap_or_else(|e| {
        error!("Failed to read input file: {e}");
        std::process::exit(1);
    });

    let start = metadata.map(|meta_path| {
        let meta = read_metadata(meta_path);
        if sha256_hex(ciphertext.as_bytes()) != meta.ciphertext_hash {
            error!("Ciphertext hash does not match metadata hash. The file may be corrupt or tampered with. Aborting.");
            std::process::exit(1);
        }
        if fingerprint(&sheet) != meta.key_fingerprint {
            error!(
                "Key sheet '{}' does not match the key '{}' this message was encrypted with. Aborting.",
                sheet.id, meta.key_id
            );
            std::process::exit(1);
        }
        meta.start_positions
    });
    let machine = at_positions(machine, positions.or(start.as_deref()));

    info!(
        "Decrypting '{}' at positions {}.",
        input.display(),
        machine.window()
    );
    let (plaintext, _) = machine.process_text(&ciphertext).unwrap_or_else(|e| {
        error!("Failed to decrypt: {e}");
        std::process::exit(1);
    });
    if let Err(e) = fs::write(output, plaintext) {
        error!("Failed to write output file: {e}");
        std::process::exit(1);
    }

    println!(
        "Successfully decrypted file '{}' to '{}'",
        input.display(),
        output.display()
    );
}

fn trace(key: Option<&Path>, text: &str, positions: Option<&str>) {
    let (_, sheet) = require_key(key);
    let mut machine = at_positions(build_machine(&sheet, SymbolPolicy::PassThrough), positions);
    for c in text.chars() {
        let (keystroke, trace) = machine.trace_letter(c).unwrap_or_else(|e| {
            error!("Failed to trace '{c}': {e}");
            std::process::exit(1);
        });
        let Some(trace) = trace else {
            println!("{c:?} passed through");
            continue;
        };
        println!("{} at {}", trace.input, keystroke.next.window());
        for entry in &trace {
            println!(
                "  {:<24} {}",
                stage_label(&machine, entry.stage),
                entry.letter
            );
        }
        println!("  => {}", keystroke.output);
        machine = keystroke.next;
    }
}

/// Loads the key sheet named by `--key` or `ENIGMA_KEY`, exiting on failure.
fn require_key(key: Option<&Path>) -> (PathBuf, KeySheet) {
    let path = key.map(Path::to_path_buf).unwrap_or_else(|| {
        error!("A --key path (or ENIGMA_KEY) is required for this command.");
        std::process::exit(1);
    });
    if !path.exists() {
        error!(
            "Key sheet '{}' does not exist. Please create it with 'key generate'.",
            path.display()
        );
        std::process::exit(1);
    }
    let sheet = key_sheet::load_key_sheet(&path).unwrap_or_else(|e| {
        error!("Failed to load key sheet: {e}");
        std::process::exit(1);
    });
    (path, sheet)
}

fn build_machine(sheet: &KeySheet, policy: SymbolPolicy) -> Machine {
    sheet.build_machine_with(policy).unwrap_or_else(|e| {
        error!("Key sheet '{}' is invalid: {e}", sheet.id);
        std::process::exit(1);
    })
}

/// Re-keys `machine` to `window` when one is given.
fn at_positions(machine: Machine, window: Option<&str>) -> Machine {
    let Some(window) = window else {
        return machine;
    };
    parse_window(window)
        .map_err(enigma_core::EnigmaError::from)
        .and_then(|p| machine.with_positions(&p))
        .unwrap_or_else(|e| {
            error!("Invalid positions '{window}': {e}");
            std::process::exit(1);
        })
}

fn fingerprint(sheet: &KeySheet) -> String {
    sheet.fingerprint().unwrap_or_else(|e| {
        error!("Key sheet '{}' is invalid: {e}", sheet.id);
        std::process::exit(1);
    })
}

fn read_metadata(path: &Path) -> CiphertextMetadata {
    let metadata_str = fs::read_to_string(path).unwrap_or_else(|e| {
        error!("Failed to read metadata file: {e}");
        std::process::exit(1);
    });
    let meta: CiphertextMetadata = serde_json::from_str(&metadata_str).unwrap_or_else(|e| {
        error!("Failed to parse metadata file: {e}");
        std::process::exit(1);
    });
    if meta.letters == 0 {
        warn!("Metadata records an empty message.");
    }
    meta
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

fn stage_label(machine: &Machine, stage: Stage) -> String {
    match stage {
        Stage::RotorForward(i) | Stage::RotorBackward(i) => {
            format!("{stage} [{}]", display_name(machine.rotors()[i].name()))
        }
        _ => stage.to_string(),
    }
}

fn rotor_label(rotor: &RotorSpec) -> String {
    format!("{} (notch {})", display_name(rotor.name()), rotor.notch())
}

fn display_name(name: &str) -> &str {
    if name.is_empty() { "?" } else { name }
}

const fn stepping_name(stepping: Stepping) -> &'static str {
    match stepping {
        Stepping::Odometer => "odometer",
        Stepping::DoubleStep => "double step",
    }
}
