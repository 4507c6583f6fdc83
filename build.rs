//! Build script for onelane.
//!
//! Emits feature diagnostics and helpful messages for users integrating
//! onelane into their simulations.

use std::env;

fn main() {
    // Re-run if features change
    println!("cargo:rerun-if-env-changed=CARGO_FEATURE_PARKING_LOT");
    println!("cargo:rerun-if-env-changed=CARGO_FEATURE_LOG");

    let parking_lot_enabled = env::var("CARGO_FEATURE_PARKING_LOT").is_ok();
    let log_enabled = env::var("CARGO_FEATURE_LOG").is_ok();

    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());
    let is_release = profile == "release";

    if parking_lot_enabled {
        emit_info("Using parking_lot for mutexes (faster lock implementation)");
    }

    if log_enabled {
        emit_info("log crate integration enabled");
        emit_note("Occupancy violations and shutdown events are reported through `log`.");
    }

    if is_release && !parking_lot_enabled {
        emit_note("Tip: Consider enabling 'parking_lot' for better mutex performance:");
        emit_note("  onelane = { version = \"0.4\", features = [\"parking_lot\"] }");
    }

    check_target_features();
}

fn emit_info(msg: &str) {
    println!("cargo:warning=[onelane] ℹ️  {}", msg);
}

fn emit_note(msg: &str) {
    if msg.is_empty() {
        println!("cargo:warning=[onelane]");
    } else {
        println!("cargo:warning=[onelane]    {}", msg);
    }
}

fn emit_warning(msg: &str) {
    println!("cargo:warning=[onelane] ⚠️  {}", msg);
}

fn check_target_features() {
    let target = env::var("TARGET").unwrap_or_default();

    if target.contains("wasm") {
        emit_warning("WebAssembly target detected");
        emit_note("onelane coordinates OS threads; WASM has no true threading.");
        emit_note("Blocking strategies will not make progress on this target.");
    }
}
