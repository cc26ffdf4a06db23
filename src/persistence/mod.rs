//! State file persistence
//!
//! Features:
//! - Plain JSON document (`speed` + `highscores`)
//! - Atomic replace (temp file in the same directory → fsync → rename)
//! - Corruption detection, corrupt files moved aside instead of overwritten

pub mod storage;

pub use storage::FileStorage;
