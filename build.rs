// Stages the host page from `static/` into `dist/` so it can be served next to
// the wasm-pack output.
use std::path::Path;

use fs_extra::dir::{copy, CopyOptions};

fn main() {
    println!("cargo:rerun-if-changed=static");

    let static_dir = Path::new("static");
    if !static_dir.exists() {
        return;
    }

    let out_dir = Path::new("dist");
    if out_dir.exists() {
        std::fs::remove_dir_all(out_dir).ok();
    }
    if let Err(err) = std::fs::create_dir_all(out_dir) {
        println!("cargo:warning=cannot create dist/: {err}");
        return;
    }

    let options = CopyOptions::new().overwrite(true).content_only(true);
    if let Err(err) = copy(static_dir, out_dir, &options) {
        println!("cargo:warning=copying static/ to dist/ failed: {err}");
    }
}
