//! Rules core for two players sharing one chessboard ("hot seat"): legal move
//! generation, check, checkmate and stalemate detection.
//!
//! A front end owns a [`game::Game`] and drives it with move attempts; the
//! [`console`] module is a minimal terminal front end.

pub mod chess;
pub mod console;
pub mod game;

use shadow_rs::shadow;

shadow!(build);

/// Returns the full version that can be used to identify how the binary was
/// built in the first place.
#[must_use]
pub fn version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}

/// Prints the version, build type and whether the build is clean on console
/// start-up.
pub fn print_build_info() {
    println!("Hotseat chess {}", version());
    println!("Release build: {}", !shadow_rs::is_debug());
    if !shadow_rs::git_clean() {
        println!("Warning: built with uncommitted changes");
    }
    println!();
}
