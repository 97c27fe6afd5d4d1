// Simple build script that copies static assets to `dist/` after wasm-pack build.
use std::process::Command;
use std::{env, fs, path::Path};

use fs_extra::dir::CopyOptions;

fn main() {
    println!("cargo:rerun-if-changed=static");

    // Only run the heavy wasm-pack build when targeting wasm32.
    let target = env::var("TARGET").unwrap_or_default();
    if target == "wasm32-unknown-unknown" {
        // wasm-pack is assumed available. If not, emit warning.
        let status = Command::new("wasm-pack")
            .args(["build", "--release", "--target", "web"])
            .status();

        if let Ok(st) = status {
            if !st.success() {
                println!("cargo:warning=wasm-pack build failed");
            }
        } else {
            println!("cargo:warning=wasm-pack not installed – skipping");
        }
    }

    // Copy static/ to dist/
    let out_dir = Path::new("dist");
    if out_dir.exists() {
        fs::remove_dir_all(out_dir).ok();
    }
    fs::create_dir_all(out_dir).ok();

    let static_dir = Path::new("static");
    if static_dir.exists() {
        let mut options = CopyOptions::new();
        options.content_only = true;
        options.overwrite = true;
        if let Err(err) = fs_extra::dir::copy(static_dir, out_dir, &options) {
            println!("cargo:warning=failed to copy static assets: {err}");
        }
    }
}
