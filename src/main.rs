//! Host-side helper: `cargo run` compiles the WASM bundle into `static/pkg`
//! and serves `static/` locally so the animated background can be previewed.

use std::process::{Command, Stdio};
use std::{env, thread, time::Duration};

fn main() {
    // Only meaningful on non-wasm targets.
    if env::var("TARGET").unwrap_or_default() == "wasm32-unknown-unknown" {
        return;
    }

    println!("Building WASM pkg …");
    match Command::new("wasm-pack")
        .args([
            "build",
            "--release",
            "--target",
            "web",
            "--out-dir",
            "static/pkg",
        ])
        .status()
    {
        Ok(st) if st.success() => {}
        Ok(_) => {
            eprintln!("wasm-pack finished with errors. Ensure wasm-pack is installed (https://rustwasm.github.io/wasm-pack/).");
            std::process::exit(1);
        }
        Err(_) => {
            eprintln!("wasm-pack not found in PATH. Skipping wasm build; the site may serve stale artifacts.");
        }
    }

    println!("Launching local server at http://127.0.0.1:8000 …");
    let _server = Command::new("python3")
        .args(["-m", "http.server", "8000", "--directory", "static"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to start http server");

    // Keep process alive
    loop {
        thread::sleep(Duration::from_secs(60));
    }
}
