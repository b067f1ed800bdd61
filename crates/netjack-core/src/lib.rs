//! Netjack Core - Shared functionality for all Netjack tools
//!
//! Standard filesystem locations and terminal formatting used by the
//! game-side binaries.

pub mod format;
pub mod paths;

pub use paths::Paths;
