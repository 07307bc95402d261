//! Output formatting - plaintext and JSON.

use serde_json::json;

use crate::consts::{serialize_consts, ConstInfo, ConstMapping};
use crate::diag::Diagnostic;

/// Prints extraction results in plain text format.
pub fn print_info_plain(source: &str, info: &ConstInfo) {
    println!("{}:", source);
    if !info.includes.is_empty() {
        println!("  includes: {}", info.includes.join(" "));
    }
    if !info.incdirs.is_empty() {
        println!("  incdirs: {}", info.incdirs.join(" "));
    }
    for (name, value) in &info.defines {
        println!("  define {} {}", name, value);
    }
    println!("  CONSTS ({}):", info.consts.len());
    for c in &info.consts {
        println!("  - {}", c);
    }
}

/// Prints extraction results in JSON format.
pub fn print_info_json(source: &str, info: &ConstInfo) {
    print_value(&json!({ "source": source, "info": info }));
}

/// Prints a mapping in the canonical constant-file format.
pub fn print_mapping_plain(consts: &ConstMapping) {
    print!("{}", String::from_utf8_lossy(&serialize_consts(consts)));
}

/// Prints a mapping as a JSON object sorted by name.
pub fn print_mapping_json(consts: &ConstMapping) {
    let sorted: std::collections::BTreeMap<_, _> = consts.iter().collect();
    print_value(&json!({ "consts": sorted }));
}

/// Prints collected diagnostics to stderr, one per line.
pub fn print_diagnostics(diags: &[Diagnostic]) {
    for d in diags {
        eprintln!("{}", d);
    }
}

fn print_value(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("[WARN] JSON serialization failed: {}", e),
    }
}
