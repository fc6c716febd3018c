//! Host-side helper: `cargo run` builds the wasm package into `static/pkg`
//! and serves `static/` on http://127.0.0.1:8000.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::process::{Command, Stdio};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("building wasm package");
    match Command::new("wasm-pack")
        .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
        .status()
    {
        Ok(st) if st.success() => {}
        Ok(st) => {
            log::error!("wasm-pack exited with {st}");
            std::process::exit(1);
        }
        Err(err) => {
            log::warn!("wasm-pack not available ({err}); serving whatever is in static/pkg");
        }
    }

    log::info!("serving static/ at http://127.0.0.1:8000");
    let status = Command::new("python3")
        .args(["-m", "http.server", "8000", "--directory", "static"])
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .status();
    match status {
        Ok(st) if st.success() => {}
        Ok(st) => log::error!("http server exited with {st}"),
        Err(err) => log::error!("failed to start http server: {err}"),
    }
}

// The browser build has no use for the dev helper.
#[cfg(target_arch = "wasm32")]
fn main() {}
