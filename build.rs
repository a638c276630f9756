//! Build script for fuzzylab
//!
//! Embeds the package version and target triple for `fuzzylab --version`.

use std::env;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    if let Ok(version) = env::var("CARGO_PKG_VERSION") {
        println!("cargo:rustc-env=FUZZYLAB_VERSION={}", version);
    }

    let target = env::var("TARGET").unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env=FUZZYLAB_TARGET={}", target);
}
