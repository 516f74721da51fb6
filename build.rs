//! Build script for spotplay.
//!
//! Copies the `.env.example` template from the crate root into the spotplay
//! config directory, next to where the real `.env` is read from:
//!
//! - Linux: `~/.config/spotplay/.env.example`
//! - macOS: `~/Library/Application Support/spotplay/.env.example`
//! - Windows: `%APPDATA%/spotplay/.env.example`
//!
//! A missing template only produces a cargo warning; failing to create the
//! directory or write the file fails the build.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::{env, fs, path::PathBuf};

    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let env_example_path = manifest_dir.join(".env.example");

    let mut out_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("spotplay");
    fs::create_dir_all(&out_dir)?;

    if env_example_path.is_file() {
        let contents = fs::read_to_string(&env_example_path)?;
        fs::write(out_dir.join(".env.example"), contents)?;
    } else {
        println!(
            "cargo:warning=.env.example not found at {}",
            env_example_path.display()
        );
    }

    Ok(())
}
