use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=device.x");
    println!("cargo:rerun-if-changed=build.rs");

    // cortex-m-rt's link.x includes device.x when its `device` feature is on
    if env::var_os("CARGO_FEATURE_RT").is_some() {
        let out_dir = PathBuf::from(env::var_os("OUT_DIR").unwrap());
        fs::copy("device.x", out_dir.join("device.x")).unwrap();
        println!("cargo:rustc-link-search={}", out_dir.display());
    }
}
