//! Build script for the storefront crate.
//!
//! Fingerprints the stylesheet so it can be served from a content-addressed
//! path (`/static/css/derived/main.{hash}.css`) and cached forever.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// Number of hex characters of the digest kept in the filename.
const HASH_LEN: usize = 8;

fn main() {
    let manifest_dir = PathBuf::from(
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo"),
    );
    let css_path = manifest_dir.join("static/css/main.css");
    println!("cargo:rerun-if-changed={}", css_path.display());

    match fingerprint_css(&manifest_dir, &css_path) {
        Ok(hash) => println!("cargo:rustc-env=CSS_HASH={hash}"),
        Err(e) => {
            println!("cargo:warning=Could not fingerprint main.css: {e}");
            println!("cargo:rustc-env=CSS_HASH=");
        }
    }
}

/// Copy main.css to `static/css/derived/main.{hash}.css` and return the hash.
fn fingerprint_css(manifest_dir: &Path, css_path: &Path) -> io::Result<String> {
    let content = fs::read(css_path)?;
    let digest = format!("{:x}", Sha256::digest(&content));
    let hash: String = digest.chars().take(HASH_LEN).collect();

    let derived_dir = manifest_dir.join("static/css/derived");
    fs::create_dir_all(&derived_dir)?;
    fs::write(derived_dir.join(format!("main.{hash}.css")), &content)?;
    Ok(hash)
}
