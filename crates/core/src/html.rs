//! Local HTML rendering: escaping, the fallback renderer and the e-mail
//! shell.

use std::fmt::Write as _;

use crate::NewsItem;

/// The fragment returned when there is nothing to show.
pub const NO_NEWS_HTML: &str = "<p>No news available at the moment.</p>";

/// The header title of every digest.
pub const SHELL_TITLE: &str = "Frontend Development News";

const FENCE: &str = "```";

const FALLBACK_STYLE: &str = r#"<style>
  .news-container { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; }
  .news-item { margin-bottom: 30px; padding: 20px; border-left: 4px solid #2563eb; background: #f8fafc; }
  .news-item h3 { margin: 0 0 10px 0; }
  .news-item h3 a { color: #1e40af; text-decoration: none; }
  .news-item h3 a:hover { text-decoration: underline; }
  .news-item p { margin: 0; color: #4b5563; line-height: 1.6; }
</style>
"#;

/// Escapes text for use in HTML content and double- or single-quoted
/// attribute values.
pub fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Renders items without any external help.
///
/// Emits a fixed stylesheet followed by one `news-item` block per item: a
/// heading linking the title to the item's link (opened in a new tab) and
/// a paragraph with the summary. An empty summary still renders an empty
/// paragraph. All three fields are escaped.
pub fn render_fallback(items: &[NewsItem]) -> String {
    if items.is_empty() {
        return NO_NEWS_HTML.to_owned();
    }

    let mut html = String::from(FALLBACK_STYLE);
    html.push_str("<div class=\"news-container\">\n");
    for item in items {
        let _ = write!(
            html,
            r#"  <div class="news-item">
    <h3><a href="{link}" target="_blank" rel="noopener noreferrer">{title}</a></h3>
    <p>{summary}</p>
  </div>
"#,
            link = escape_html(item.link()),
            title = escape_html(item.title()),
            summary = escape_html(item.summary()),
        );
    }
    html.push_str("</div>\n");
    html
}

/// Pulls the HTML payload out of a model response.
///
/// If the response contains a fenced code block, returns the content of
/// the first one with its info string (e.g. `html`) removed; a fence that
/// is never closed runs to the end of the response. Otherwise returns the
/// whole response. The result is trimmed.
pub fn extract_html(response: &str) -> &str {
    let Some(open_idx) = response.find(FENCE) else {
        return response.trim();
    };
    let body = response[open_idx + FENCE.len()..]
        .trim_start_matches(|c: char| {
            c.is_ascii_alphanumeric() || c == '-' || c == '_'
        });
    let close_idx = body.find(FENCE).unwrap_or(body.len());
    body[..close_idx].trim()
}

/// Wraps a body fragment into a complete HTML e-mail document.
///
/// `body_html` is inserted verbatim into `<main>`. The subject and the
/// source URL are escaped.
pub fn wrap_in_email_shell(
    subject: &str,
    body_html: &str,
    source_url: &str,
) -> String {
    let subject = escape_html(subject);
    let source_url = escape_html(source_url);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{subject}</title>
</head>
<body style="margin: 0; padding: 20px; background-color: #ffffff; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;">
  <div style="max-width: 800px; margin: 0 auto;">
    <header style="text-align: center; margin-bottom: 40px;">
      <h1 style="color: #1e40af; margin: 0; font-size: 28px;">{SHELL_TITLE}</h1>
      <p style="color: #6b7280; margin: 10px 0 0 0;">Your daily dose of frontend development updates</p>
    </header>
    <main>
{body_html}
    </main>
    <footer style="margin-top: 50px; padding-top: 30px; border-top: 2px solid #e5e7eb; text-align: center;">
      <p style="color: #9ca3af; font-size: 12px; margin: 0;">
        Source: <a href="{source_url}" style="color: #6366f1;">{source_url}</a>
      </p>
    </footer>
  </div>
</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<NewsItem> {
        vec![
            NewsItem::new("A", "http://x/1", "s1").unwrap(),
            NewsItem::new("B", "http://x/2", "").unwrap(),
            NewsItem::new("C", "http://x/3", "s3").unwrap(),
        ]
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html(r#""it's""#), "&quot;it&#39;s&quot;");
    }

    #[test]
    fn test_fallback_single_item() {
        let items = [NewsItem::new("A", "http://x/1", "s1").unwrap()];
        let html = render_fallback(&items);
        assert!(html.starts_with("<style>"));
        assert!(html.contains(r#"<a href="http://x/1" target="_blank""#));
        assert!(html.contains(">A</a>"));
        assert!(html.contains("<p>s1</p>"));
    }

    #[test]
    fn test_fallback_one_anchor_per_item() {
        let items = items();
        let html = render_fallback(&items);
        assert_eq!(html.matches("<a ").count(), items.len());
        for item in &items {
            let anchor = format!(
                r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
                item.link(),
                item.title()
            );
            assert_eq!(html.matches(&anchor).count(), 1);
        }
        // The missing summary still gets its paragraph.
        assert_eq!(html.matches("<p>").count(), items.len());
        assert!(html.contains("<p></p>"));
    }

    #[test]
    fn test_fallback_escapes_fields() {
        let items = [NewsItem::new(
            "<script>alert(1)</script>",
            r#"http://x/?a=1&b="2""#,
            "<b>bold</b>",
        )
        .unwrap()];
        let html = render_fallback(&items);
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<b>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains(r#"href="http://x/?a=1&amp;b=&quot;2&quot;""#));
    }

    #[test]
    fn test_extract_html() {
        assert_eq!(extract_html("  <p>plain</p>\n"), "<p>plain</p>");
        assert_eq!(
            extract_html("Here you go:\n```html\n<div>x</div>\n```\nEnjoy!"),
            "<div>x</div>"
        );
        assert_eq!(extract_html("```\n<p>a</p>\n```"), "<p>a</p>");
        assert_eq!(
            extract_html("```html\n<p>1</p>\n```\n```html\n<p>2</p>\n```"),
            "<p>1</p>"
        );
        assert_eq!(extract_html("```html\n<p>open"), "<p>open");
        assert_eq!(extract_html("```html\n```"), "");
    }

    #[test]
    fn test_email_shell() {
        let body = "<div class=\"news-container\">x</div>";
        let url = "https://www.smashingmagazine.com/feed/";
        let html = wrap_in_email_shell("Daily <Updates>", body, url);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Daily &lt;Updates&gt;</title>"));
        assert!(html.contains(SHELL_TITLE));

        let main_start = html.find("<main>").unwrap();
        let main_end = html.find("</main>").unwrap();
        assert!(html[main_start..main_end].contains(body));

        let footer = &html[html.find("<footer").unwrap()..];
        assert!(footer.contains(url));
    }

    #[test]
    fn test_email_shell_escapes_source_url() {
        let url = "https://example.com/feed?cat=css&lang=en";
        let html = wrap_in_email_shell("Daily", "<p>x</p>", url);

        let footer = &html[html.find("<footer").unwrap()..];
        let escaped = "https://example.com/feed?cat=css&amp;lang=en";
        assert!(footer.contains(&format!(r#"<a href="{escaped}""#)));
        assert!(footer.contains(&format!(">{escaped}</a>")));
        assert!(!footer.contains(url));
    }
}
