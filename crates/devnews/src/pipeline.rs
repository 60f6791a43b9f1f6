//! One run: fetch, compose, send.

use devnews_core::{
    Digest, HtmlOrigin, Styler, compose, format_items_as_text,
    wrap_in_email_shell,
};

use crate::config::Config;
use crate::feed::FeedSource;
use crate::mail::{MailError, MailSender};

/// Settings of a run that are not collaborators.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOptions {
    /// The mail subject.
    pub subject: String,
    /// The feed URL credited in the footer.
    pub source_url: String,
    /// Don't send anything when the feed yields no items.
    pub skip_empty: bool,
}

impl From<&Config> for RunOptions {
    fn from(config: &Config) -> Self {
        Self {
            subject: config.subject.clone(),
            source_url: config.feed_url.clone(),
            skip_empty: config.skip_empty,
        }
    }
}

/// What a successful run did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// A digest was sent.
    Sent {
        /// Number of items in the digest.
        items: usize,
        /// The path that produced the HTML.
        origin: HtmlOrigin,
    },
    /// Nothing was sent because there were no items.
    Skipped,
}

/// Error that aborts a run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The digest could not be delivered.
    #[error(transparent)]
    Mail(#[from] MailError),
}

/// Runs the pipeline once.
///
/// A feed failure degrades to an empty digest and a styler failure to the
/// local renderer; only a mail failure aborts the run. Nothing is retried.
pub async fn run(
    feed: &dyn FeedSource,
    styler: &dyn Styler,
    mailer: &dyn MailSender,
    options: &RunOptions,
) -> Result<RunOutcome, PipelineError> {
    let items = match feed.fetch().await {
        Ok(items) => items,
        Err(err) => {
            error!(%err, "error fetching feed");
            Vec::new()
        }
    };
    let digest = Digest::new(options.subject.as_str(), items);

    if digest.is_empty() {
        if options.skip_empty {
            warn!("no news items found, nothing to send");
            return Ok(RunOutcome::Skipped);
        }
        warn!("no news items found, sending an empty digest");
    } else {
        info!(count = digest.items().len(), "found news items");
    }
    debug!("digest text:\n{}", format_items_as_text(digest.items()));

    let composition = compose(digest.items(), styler).await;
    let body = wrap_in_email_shell(
        digest.subject(),
        &composition.html,
        &options.source_url,
    );

    if let Err(err) = mailer.send(digest.subject(), &body).await {
        error!(%err, "error sending email");
        return Err(err.into());
    }

    info!(origin = ?composition.origin, "digest sent");
    Ok(RunOutcome::Sent {
        items: digest.items().len(),
        origin: composition.origin,
    })
}
