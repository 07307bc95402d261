//! sysconst CLI - constant extraction and constant-file maintenance for
//! syscall descriptions.
//!
//! Subcommands:
//! - `extract`: list the constants a description needs resolved
//! - `merge`: load and cross-check per-target constant files
//! - `format`: rewrite a constant file in canonical form

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use sysconst_core::{
    deserialize_consts, deserialize_consts_glob, extract_consts_with, init_structured_logging,
    load_config, print_diagnostics, print_info_json, print_info_plain, print_mapping_json,
    print_mapping_plain, serialize_consts, write_const_file, ConstInfo, Description, Diagnostic,
    Diagnostics, ExtractOptions, SysconstConfig,
};

/// Directories never searched for descriptions.
const EXCLUDED_DIRS: &[&str] = &["target", ".git", "node_modules"];

#[derive(Parser, Debug)]
#[command(author, version, about = "Syscall description constant extraction and storage")]
pub struct Cli {
    /// Directory containing sysconst.toml
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Output results in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List constants required by JSON-serialized descriptions
    Extract {
        /// Description files, or directories searched for *.json
        #[arg(required = true, num_args = 1..)]
        paths: Vec<PathBuf>,
    },

    /// Merge constant files matched by a glob
    Merge {
        /// Glob matching constant files (defaults to consts.glob in sysconst.toml)
        glob: Option<String>,

        /// Write the merged mapping to a file instead of stdout
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Rewrite a constant file in canonical sorted form
    Format {
        /// Constant file to rewrite in place
        file: PathBuf,
    },
}

#[inline]
fn is_excluded_dir(entry: &walkdir::DirEntry, excludes: &HashSet<&str>) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| excludes.contains(name))
}

/// Expands directories into the `*.json` files below them, sorted.
fn gather_descriptions(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let excludes: HashSet<&str> = EXCLUDED_DIRS.iter().copied().collect();
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        if !path.is_dir() {
            return Err(anyhow!("No such file or directory: {}", path.display()));
        }

        let mut found: Vec<PathBuf> = WalkDir::new(path)
            .into_iter()
            .filter_entry(|e| !is_excluded_dir(e, &excludes))
            .filter_map(|e| e.ok())
            .map(|e| e.into_path())
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        found.sort();
        files.extend(found);
    }

    Ok(files)
}

/// Outcome of extracting one description.
struct Extraction {
    path: PathBuf,
    result: Result<ConstInfo>,
    diagnostics: Vec<Diagnostic>,
}

fn extract_file(path: &Path, opts: &ExtractOptions) -> Extraction {
    let mut diags = Diagnostics::new();
    let result = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))
        .and_then(|text| {
            serde_json::from_str::<Description>(&text)
                .with_context(|| format!("Invalid description {}", path.display()))
        })
        .and_then(|desc| extract_consts_with(&desc, opts, &mut diags).map_err(Into::into));

    Extraction {
        path: path.to_path_buf(),
        result,
        diagnostics: diags.into_vec(),
    }
}

fn run_extract(paths: &[PathBuf], opts: &ExtractOptions, json: bool) -> Result<bool> {
    let files = gather_descriptions(paths)?;
    if files.is_empty() {
        return Err(anyhow!("No description files found"));
    }

    // Each file gets its own diagnostics collector; print in input order.
    let results: Vec<Extraction> = files.par_iter().map(|f| extract_file(f, opts)).collect();

    let mut ok = true;
    for r in &results {
        print_diagnostics(&r.diagnostics);
        let source = r.path.display().to_string();
        match &r.result {
            Ok(info) if json => print_info_json(&source, info),
            Ok(info) => print_info_plain(&source, info),
            Err(e) => {
                eprintln!("[ERROR] {}: {:#}", source, e);
                ok = false;
            }
        }
    }
    Ok(ok)
}

fn run_merge(glob: &str, out: Option<&Path>, json: bool) -> Result<bool> {
    let mut diags = Diagnostics::new();
    let result = deserialize_consts_glob(glob, Some(&mut diags));
    print_diagnostics(&diags.into_vec());

    let consts = match result {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[ERROR] {}", e);
            return Ok(false);
        }
    };

    match out {
        Some(path) => {
            write_const_file(path, &consts)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {} constants to {}", consts.len(), path.display());
        }
        None if json => print_mapping_json(&consts),
        None => print_mapping_plain(&consts),
    }
    Ok(true)
}

fn run_format(file: &Path) -> Result<bool> {
    let data = fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let label = file.display().to_string();

    let mut diags = Diagnostics::new();
    let result = deserialize_consts(&data, &label, &mut diags);
    print_diagnostics(&diags.into_vec());

    let consts = match result {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[ERROR] {}", e);
            return Ok(false);
        }
    };

    if serialize_consts(&consts) == data {
        return Ok(true);
    }
    write_const_file(file, &consts)
        .with_context(|| format!("Failed to write {}", file.display()))?;
    eprintln!("Formatted {}", file.display());
    Ok(true)
}

fn main() -> Result<()> {
    init_structured_logging();

    let cli = Cli::parse();
    let config = load_config(&cli.root)?.unwrap_or_default();
    let json = cli.json || config.wants_json();

    let ok = match &cli.command {
        Command::Extract { paths } => run_extract(paths, &config.extract_options(), json)?,
        Command::Merge { glob, out } => {
            let glob = resolve_glob(glob.as_deref(), &config)?;
            run_merge(&glob, out.as_deref(), json)?
        }
        Command::Format { file } => run_format(file)?,
    };

    // Exit code (CI-friendly)
    std::process::exit(if ok { 0 } else { 1 });
}

/// Command-line glob wins over the configured one.
fn resolve_glob(arg: Option<&str>, config: &SysconstConfig) -> Result<String> {
    arg.or_else(|| config.const_glob())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("No glob given and consts.glob not set in sysconst.toml"))
}
