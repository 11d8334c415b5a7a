//! Build script for colaruco.

use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rustc-check-cfg=cfg(rust_analyzer)");

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("cargo sets OUT_DIR"));
    let target = env::var("TARGET").expect("cargo sets TARGET");

    // Only the Pico 1 (thumbv6m) firmware needs a linker memory map.
    if target.starts_with("thumbv6m") {
        let memory_x = fs::read_to_string("memory-pico1.x").expect("Failed to read memory-pico1.x");
        let dest = out_dir.join("memory.x");
        fs::write(&dest, memory_x).expect("Failed to write memory.x");
        println!("cargo:rustc-link-search={}", out_dir.display());
        println!("cargo:rerun-if-changed=memory-pico1.x");
        for script in ["link.x", "link-rp.x", "defmt.x"] {
            println!("cargo:rustc-link-arg-bins=-T{script}");
        }
    }
    println!("cargo:rerun-if-changed=build.rs");
}
