//! Build script for the StellarMix CLI.
//!
//! Copies the `.env.example` configuration template into the user's local data
//! directory, next to where the application looks for its `.env` file:
//! - Linux: `~/.local/share/stellarmix/.env.example`
//! - macOS: `~/Library/Application Support/stellarmix/.env.example`
//! - Windows: `%LOCALAPPDATA%/stellarmix/.env.example`
//!
//! Copying is a convenience. A missing template or an unwritable data
//! directory produces a cargo warning and never fails the build.

use std::{env, fs, path::PathBuf};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let env_example_path = manifest_dir.join(".env.example");

    if !env_example_path.is_file() {
        println!(
            "cargo:warning=.env.example not found at {}",
            env_example_path.display()
        );
        return Ok(());
    }

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("stellarmix");

    let copied = fs::create_dir_all(&out_dir)
        .and_then(|_| fs::read_to_string(&env_example_path))
        .and_then(|contents| fs::write(out_dir.join(".env.example"), contents));

    if let Err(e) = copied {
        println!(
            "cargo:warning=cannot copy .env.example to {}: {}",
            out_dir.display(),
            e
        );
    }

    Ok(())
}
