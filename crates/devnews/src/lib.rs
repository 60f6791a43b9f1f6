//! A daily frontend news digest: reads a feed, lets a language model lay
//! out the items and mails the result.
//!
//! The binary wires the production collaborators together; as a library
//! the pieces can be reused with other feed sources, stylers or mailers.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

pub mod config;
pub mod feed;
pub mod mail;
pub mod pipeline;

pub use config::{Config, ConfigError};
pub use pipeline::{RunOptions, RunOutcome, run};

/// Re-exports of [`devnews_core`] crate.
pub mod core {
    pub use devnews_core::*;
}
