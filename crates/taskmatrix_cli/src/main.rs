//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `taskmatrix_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("taskmatrix_core ping={}", taskmatrix_core::ping());
    println!("taskmatrix_core version={}", taskmatrix_core::core_version());
}
