//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid settings, alphamap layer lookups, missing tree prototypes and runs that
//! ran out of sampling budget before reaching their target count.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid alphamap layer index {index} (terrain has {layers} layers)")]
    InvalidLayer { index: usize, layers: usize },

    #[error("weight grid is empty")]
    EmptyGrid,

    #[error("terrain has no tree prototypes")]
    NoPrototypes,

    #[error("sampling budget exceeded: placed {placed} of {target} trees in {attempts} attempts")]
    BudgetExceeded {
        placed: usize,
        target: usize,
        attempts: u64,
    },
}
