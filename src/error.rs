// src/error.rs

//! Crate-wide error type for the resolution core

use crate::resolver::MissingReport;
use thiserror::Error;

/// Errors surfaced by resolution and the host-facing helpers
#[derive(Error, Debug)]
pub enum Error {
    /// At least one dependency expression has no satisfier anywhere
    #[error("could not find all required packages")]
    MissingDependencies { report: MissingReport },

    /// Conflicts need manual confirmation but no-confirm is set
    #[error("package conflicts can not be resolved with noconfirm, aborting")]
    ConflictsRequireInteraction,

    /// AUR RPC transport failure
    #[error("AUR request failed: {0}")]
    AurRequest(#[from] reqwest::Error),

    /// The AUR RPC answered with an error document
    #[error("AUR returned an error: {0}")]
    AurResponse(String),

    /// pacman invocation failure
    #[error("{0}")]
    Pacman(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be decoded
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
