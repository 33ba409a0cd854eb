// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::env;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Environment variables read by linkd, with their doc lines.
const VARS: &[(&str, &str)] = &[
    ("APP_ENV", "deployment mode, `production` or `development`"),
    ("PORT", "HTTP listen port"),
    ("AUTH_PATH", "credential directory handed to the engine"),
    ("BRIDGE_URL", "WebSocket URL of the engine bridge"),
    ("MAX_RECONNECT_ATTEMPTS", "reconnect budget per outage"),
    ("RECONNECT_DELAY", "base reconnect delay in milliseconds"),
    ("ALLOWED_ORIGINS", "comma-separated CORS origins"),
    ("LOG_LEVEL", "log filter used when RUST_LOG is unset"),
    ("RATE_LIMIT_MAX", "pairing requests per client per window"),
    ("APP_VERSION", "version reported by the health check"),
    ("RUST_LOG", "log filter directives, overriding LOG_LEVEL"),
];

fn main() {
    let out_dir = match env::var("OUT_DIR") {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("cargo:warning=OUT_DIR not set: {e}");
            std::process::exit(1);
        }
    };
    let dest_path = Path::new(&out_dir).join("env_names.rs");

    let mut file = match fs::File::create(&dest_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("cargo:warning=failed to create env_names.rs: {e}");
            std::process::exit(1);
        }
    };

    let contents: String = VARS
        .iter()
        .map(|(name, doc)| {
            format!("/// Environment variable: {doc}.\npub const {name}: &str = \"{name}\";\n\n")
        })
        .collect();

    if let Err(e) = file.write_all(contents.as_bytes()) {
        eprintln!("cargo:warning=failed to write env_names.rs: {e}");
        std::process::exit(1);
    }
    println!("cargo:rerun-if-changed=build.rs");
}
