//! The digest composer: news items in, e-mail ready HTML out.
//!
//! The composer asks a [`Styler`] (usually a language model) to lay out
//! the items, and falls back to a deterministic local renderer whenever
//! the styler is unavailable or fails. It holds no state between calls.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod composer;
pub mod html;
mod item;
pub mod styler;
pub mod text;

pub use composer::{
    Composition, HtmlOrigin, build_prompt, compose, compose_html,
};
pub use html::{NO_NEWS_HTML, render_fallback, wrap_in_email_shell};
pub use item::{Digest, InvalidItem, MAX_ITEMS, NewsItem};
pub use styler::{Styler, StylerError};
pub use text::{NO_ITEMS_TEXT, format_items_as_text};
