//! # Voxel World Entry Point
//!
//! Headless driver for the world core. It simply calls into the library's
//! `run()` function.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- [config.json] [save-dir]
//! ```

fn main() {
    if let Err(err) = voxel_world::run() {
        log::error!("{}", err);
        eprintln!("voxel-world: {}", err);
        std::process::exit(1);
    }
}
