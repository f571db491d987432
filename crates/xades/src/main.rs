#![forbid(unsafe_code)]

//! xades CLI: inspect the qualifying properties of signed XML documents.

use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;
use xades::xml::{scan, ScannedSignature, SignedDocument};
use xades::{Error, PropertyKind, SignatureForm};

#[derive(Parser)]
#[command(
    name = "xades",
    about = "Inspect XAdES qualifying properties of XML signatures",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the property layout, structure check and form of each signature
    Inspect {
        /// Signed XML file
        file: PathBuf,

        /// Fail unless every signature reaches this form (BES, EPES, T, C, X, XL, A)
        #[arg(long = "require-form", value_parser = parse_form)]
        require_form: Option<SignatureForm>,
    },

    /// List every property kind with its container rules
    Kinds,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let result = match cli.command {
        Commands::Inspect { file, require_form } => cmd_inspect(file, require_form),
        Commands::Kinds => {
            print!("{}", kinds_table());
            Ok(true)
        }
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

/// Returns whether every signature passed.
fn cmd_inspect(file: PathBuf, require_form: Option<SignatureForm>) -> Result<bool, Error> {
    let data = std::fs::read(&file)?;
    let document = SignedDocument::parse_bytes(&data)?;
    let signatures = scan(&document)?;
    if signatures.is_empty() {
        eprintln!("{}: no ds:Signature found", file.display());
        return Ok(false);
    }
    let mut all_ok = true;
    for (index, signature) in signatures.iter().enumerate() {
        let (report, ok) = inspect_report(index, signature, require_form);
        print!("{report}");
        all_ok &= ok;
    }
    Ok(all_ok)
}

fn inspect_report(
    index: usize,
    signature: &ScannedSignature,
    require_form: Option<SignatureForm>,
) -> (String, bool) {
    let mut out = String::new();
    let id = signature.id.as_deref().unwrap_or("-");
    let _ = writeln!(out, "Signature {index} (Id {id})");
    let _ = writeln!(out, "  references: {}", signature.layout.references.join(", "));
    if !signature.qualified {
        let _ = writeln!(out, "  no QualifyingProperties");
    }
    for entry in &signature.layout.entries {
        let _ = write!(out, "  {:<30} {}", entry.container.container_name(), entry.kind);
        if !entry.targets.is_empty() {
            let targets: Vec<String> = entry.targets.iter().map(|t| format!("#{t}")).collect();
            let _ = write!(out, " -> {}", targets.join(", "));
        }
        out.push('\n');
    }

    let mut ok = true;
    match signature.check() {
        Ok(()) => {
            let _ = writeln!(out, "  structure: OK");
        }
        Err(e) => {
            ok = false;
            let _ = writeln!(out, "  structure: INVALID: {e}");
        }
    }
    let detected = signature.form();
    let _ = writeln!(
        out,
        "  form: {}",
        detected.map_or_else(|| "none".to_owned(), |f| f.to_string())
    );
    if let Some(required) = require_form {
        if let Err(e) = xades::properties::form::check(required, signature.layout.kinds()) {
            ok = false;
            let _ = writeln!(out, "  required form {required}: {e}");
        }
    }
    (out, ok)
}

fn kinds_table() -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<32} {:<30} {:<7} {}",
        "KIND", "CONTAINER", "POLICY", "TARGETS"
    );
    for kind in PropertyKind::VALUES {
        let targets = kind
            .target_multiplicity()
            .map_or_else(|| "-".to_owned(), |m| m.to_string());
        let _ = writeln!(
            out,
            "{:<32} {:<30} {:<7} {}",
            kind.name(),
            kind.group().container_name(),
            format!("{:?}", kind.insertion_policy()),
            targets
        );
    }
    out
}

fn parse_form(value: &str) -> Result<SignatureForm, String> {
    SignatureForm::from_name(value).ok_or_else(|| format!("unknown signature form: {value}"))
}
