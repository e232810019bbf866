//! Build script for armilla-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates armilla.toml and generates config_gen.rs

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    generate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate armilla.toml and translate it into Rust constants.
///
/// Failing the build here beats failing at runtime on the wrist: every
/// value is range-checked before it is written out.
fn generate_config() {
    println!("cargo:rerun-if-changed=armilla.toml");

    let config_path = Path::new("armilla.toml");
    if !config_path.exists() {
        panic!(
            "armilla.toml not found: the firmware requires a shell \
             configuration file next to Cargo.toml"
        );
    }

    let content = fs::read_to_string(config_path)
        .unwrap_or_else(|e| panic!("failed to read armilla.toml: {e}"));
    let config: toml::Value = content
        .parse()
        .unwrap_or_else(|e| panic!("armilla.toml is not valid TOML: {e}"));

    let display = config
        .get("display")
        .and_then(|v| v.as_table())
        .unwrap_or_else(|| panic!("armilla.toml: missing [display] section"));

    let blank_after_s = display
        .get("blank_after_s")
        .and_then(|v| v.as_integer())
        .unwrap_or_else(|| panic!("armilla.toml: display.blank_after_s missing"));
    if !(1..=600).contains(&blank_after_s) {
        panic!("armilla.toml: display.blank_after_s must be 1..=600, got {blank_after_s}");
    }

    let brightness = display
        .get("brightness")
        .and_then(|v| v.as_integer())
        .unwrap_or_else(|| panic!("armilla.toml: display.brightness missing"));
    if !(0..=3).contains(&brightness) {
        panic!("armilla.toml: display.brightness must be 0..=3, got {brightness}");
    }

    let mut credentials: Vec<(String, String)> = Vec::new();
    if let Some(wifi) = config.get("wifi") {
        let entries = wifi
            .as_array()
            .unwrap_or_else(|| panic!("armilla.toml: [[wifi]] must be an array of tables"));
        if entries.len() > 4 {
            panic!("armilla.toml: at most 4 [[wifi]] entries are supported");
        }
        for entry in entries {
            let ssid = entry
                .get("ssid")
                .and_then(|v| v.as_str())
                .unwrap_or_else(|| panic!("armilla.toml: [[wifi]] entry missing ssid"));
            let psk = entry
                .get("psk")
                .and_then(|v| v.as_str())
                .unwrap_or_else(|| panic!("armilla.toml: [[wifi]] entry missing psk"));
            if ssid.is_empty() || ssid.len() > 32 {
                panic!("armilla.toml: wifi ssid must be 1..=32 bytes");
            }
            if psk.len() > 64 {
                panic!("armilla.toml: wifi psk must be at most 64 bytes");
            }
            credentials.push((ssid.to_string(), psk.to_string()));
        }
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut f = File::create(out_dir.join("config_gen.rs")).unwrap();
    writeln!(f, "// Generated from armilla.toml by build.rs. Do not edit.").unwrap();
    writeln!(f, "pub const IDLE_WINDOW_MS: u32 = {};", blank_after_s * 1000).unwrap();
    writeln!(f, "pub const BRIGHTNESS: u8 = {brightness};").unwrap();
    writeln!(
        f,
        "pub const WIFI_CREDENTIALS: &[(&str, &str)] = &["
    )
    .unwrap();
    for (ssid, psk) in &credentials {
        writeln!(f, "    ({ssid:?}, {psk:?}),").unwrap();
    }
    writeln!(f, "];").unwrap();
}
