//! A provider-neutral protocol for text-generation models.
//!
//! The digest composer only needs one thing from a model: turn a prompt
//! into text. This crate describes that exchange (requests, streamed
//! responses and error kinds) so that the OpenAI-compatible provider and
//! the scripted test provider can be swapped without touching the
//! composer.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod error;
mod provider;
mod request;
mod response;

pub use error::*;
pub use provider::*;
pub use request::*;
pub use response::*;
