//! Chess rules for two players sharing one board: primitives, the board with
//! its history and the legality checks.

pub mod attacks;
pub mod board;
pub mod core;
pub mod error;
pub mod rules;

pub use error::{ChessError, RejectReason, Result};
