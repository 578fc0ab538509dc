// Engine library root
//
// Raw price rows go through `data` (series adapter), `indicators` computes the
// aligned indicator lines, `services` runs a whole request and `export` writes
// the joined table.

pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod indicators;
pub mod services;

pub use error::{EngineError, Result};
