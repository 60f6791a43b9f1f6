//! Turns news items into the HTML fragment of a digest.

use crate::html::{NO_NEWS_HTML, extract_html, render_fallback};
use crate::styler::Styler;
use crate::text::format_items_as_text;
use crate::NewsItem;

const STYLER_INSTRUCTIONS: &str =
    include_str!("./prompts/styler_instructions.md");

/// Which path produced a [`Composition`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HtmlOrigin {
    /// There were no items; the styler was not called.
    Empty,
    /// The styler's response.
    Styler,
    /// The local renderer, after the styler failed.
    Fallback,
}

/// The HTML fragment of a digest and where it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Composition {
    /// The HTML fragment.
    pub html: String,
    /// The path that produced `html`.
    pub origin: HtmlOrigin,
}

/// Builds the prompt sent to the styler for a non-empty item list.
pub fn build_prompt(items: &[NewsItem]) -> String {
    let mut prompt = String::from(STYLER_INSTRUCTIONS);
    prompt.push_str(&format_items_as_text(items));
    prompt
}

/// Composes the HTML fragment for `items`, reporting the path taken.
///
/// An empty list short-circuits to [`NO_NEWS_HTML`]. Otherwise the styler
/// is asked once; a fenced code block in its answer is unwrapped. Any
/// styler error, or an answer without HTML, falls back to
/// [`render_fallback`]. This function never fails.
pub async fn compose(items: &[NewsItem], styler: &dyn Styler) -> Composition {
    if items.is_empty() {
        return Composition {
            html: NO_NEWS_HTML.to_owned(),
            origin: HtmlOrigin::Empty,
        };
    }

    let prompt = build_prompt(items);
    let fallback_reason = match styler.style(&prompt).await {
        Ok(response) => {
            let html = extract_html(&response);
            if !html.is_empty() {
                return Composition {
                    html: html.to_owned(),
                    origin: HtmlOrigin::Styler,
                };
            }
            "empty response".to_owned()
        }
        Err(err) => err.to_string(),
    };

    warn!(reason = %fallback_reason, "styler failed, using local renderer");
    Composition {
        html: render_fallback(items),
        origin: HtmlOrigin::Fallback,
    }
}

/// Composes the HTML fragment for `items`.
///
/// See [`compose`].
#[inline]
pub async fn compose_html(items: &[NewsItem], styler: &dyn Styler) -> String {
    compose(items, styler).await.html
}
