//! Build script for yatramate-simulator
//!
//! On Windows, links against a vendored SDL2 and puts SDL2.dll next to the
//! simulator binary. Other platforms use the system SDL2.

use std::path::{Path, PathBuf};
use std::{env, fs};

fn main() {
    if env::var("CARGO_CFG_TARGET_OS").unwrap_or_default() != "windows" {
        return;
    }

    let Some(vendor_sdl2) = env::var_os("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .and_then(|dir| dir.parent().map(|root| root.join("vendor").join("sdl2")))
    else {
        return;
    };
    println!("cargo:rerun-if-changed={}", vendor_sdl2.display());

    if !vendor_sdl2.exists() {
        println!("cargo:warning=SDL2 vendor directory not found at {}", vendor_sdl2.display());
        println!("cargo:warning=Put SDL2.lib and SDL2.dll in vendor/sdl2/");
        return;
    }
    println!("cargo:rustc-link-search=native={}", vendor_sdl2.display());

    // OUT_DIR is target/<profile>/build/<pkg>/out; the binary lands in target/<profile>
    let Some(out_dir) = env::var_os("OUT_DIR").map(PathBuf::from) else {
        return;
    };
    if let Some(target_dir) = profile_dir(&out_dir) {
        copy_dll(&vendor_sdl2.join("SDL2.dll"), &target_dir.join("SDL2.dll"));
    }
}

fn profile_dir(out_dir: &Path) -> Option<&Path> {
    out_dir
        .ancestors()
        .find(|p| p.file_name().is_some_and(|n| n == "release" || n == "debug"))
}

fn copy_dll(
    src: &Path,
    dst: &Path,
) {
    if !src.exists() || dst.exists() {
        return;
    }
    match fs::copy(src, dst) {
        Ok(_) => println!("cargo:warning=Copied SDL2.dll to {}", dst.display()),
        Err(e) => println!("cargo:warning=Failed to copy SDL2.dll: {e}"),
    }
}
