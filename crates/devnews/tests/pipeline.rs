use std::sync::Mutex;

use async_trait::async_trait;
use devnews::core::styler::{ModelStyler, UnavailableStyler};
use devnews::core::{HtmlOrigin, NO_NEWS_HTML, NewsItem, render_fallback};
use devnews::feed::{FeedError, FeedSource, parse_feed};
use devnews::mail::{MailError, MailSender};
use devnews::pipeline::PipelineError;
use devnews::{RunOptions, RunOutcome, run};
use devnews_test_model::{PresetResponse, TestModelProvider};
use lettre::message::Mailbox;

const SOURCE_URL: &str = "https://www.smashingmagazine.com/feed/";

struct StaticFeed(Vec<NewsItem>);

#[async_trait]
impl FeedSource for StaticFeed {
    async fn fetch(&self) -> Result<Vec<NewsItem>, FeedError> {
        Ok(self.0.clone())
    }
}

struct BrokenFeed;

#[async_trait]
impl FeedSource for BrokenFeed {
    async fn fetch(&self) -> Result<Vec<NewsItem>, FeedError> {
        parse_feed(b"definitely not xml", 5)
    }
}

#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingMailer {
    fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailSender for RecordingMailer {
    async fn send(
        &self,
        subject: &str,
        html_body: &str,
    ) -> Result<(), MailError> {
        self.sent
            .lock()
            .unwrap()
            .push((subject.to_owned(), html_body.to_owned()));
        Ok(())
    }
}

struct RejectingMailer;

#[async_trait]
impl MailSender for RejectingMailer {
    async fn send(&self, _: &str, _: &str) -> Result<(), MailError> {
        let err = "not an address"
            .parse::<Mailbox>()
            .unwrap_err();
        Err(err.into())
    }
}

fn options(skip_empty: bool) -> RunOptions {
    RunOptions {
        subject: "Daily Frontend Development Tech Updates".to_owned(),
        source_url: SOURCE_URL.to_owned(),
        skip_empty,
    }
}

fn items(count: usize) -> Vec<NewsItem> {
    (1..=count)
        .map(|n| {
            NewsItem::new(format!("Item {n}"), format!("http://x/{n}"), "s")
                .unwrap()
        })
        .collect()
}

#[tokio::test]
async fn test_styled_digest_is_sent() {
    let provider = TestModelProvider::with_response(PresetResponse::with_text(
        "```html\n<section>styled</section>\n```",
    ));
    let styler = ModelStyler::new(provider.clone());
    let mailer = RecordingMailer::default();

    let outcome = run(&StaticFeed(items(3)), &styler, &mailer, &options(false))
        .await
        .unwrap();
    assert_eq!(
        outcome,
        RunOutcome::Sent {
            items: 3,
            origin: HtmlOrigin::Styler
        }
    );

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    let (subject, body) = &sent[0];
    assert_eq!(subject, "Daily Frontend Development Tech Updates");
    assert!(body.starts_with("<!DOCTYPE html>"));
    assert!(body.contains("<section>styled</section>"));
    assert!(body.contains(SOURCE_URL));
    assert_eq!(provider.request_count(), 1);
}

#[tokio::test]
async fn test_digest_is_capped() {
    let mailer = RecordingMailer::default();
    let outcome = run(
        &StaticFeed(items(8)),
        &UnavailableStyler,
        &mailer,
        &options(false),
    )
    .await
    .unwrap();
    assert_eq!(
        outcome,
        RunOutcome::Sent {
            items: 5,
            origin: HtmlOrigin::Fallback
        }
    );

    let (_, body) = &mailer.sent()[0];
    assert!(body.contains(&render_fallback(&items(5))));
    assert!(!body.contains("Item 6"));
}

#[tokio::test]
async fn test_feed_failure_sends_empty_digest() {
    let provider =
        TestModelProvider::with_response(PresetResponse::with_text("<p/>"));
    let styler = ModelStyler::new(provider.clone());
    let mailer = RecordingMailer::default();

    let outcome = run(&BrokenFeed, &styler, &mailer, &options(false))
        .await
        .unwrap();
    assert_eq!(
        outcome,
        RunOutcome::Sent {
            items: 0,
            origin: HtmlOrigin::Empty
        }
    );
    assert!(mailer.sent()[0].1.contains(NO_NEWS_HTML));
    assert_eq!(provider.request_count(), 0);
}

#[tokio::test]
async fn test_skip_empty() {
    let mailer = RecordingMailer::default();
    let outcome =
        run(&StaticFeed(vec![]), &UnavailableStyler, &mailer, &options(true))
            .await
            .unwrap();
    assert_eq!(outcome, RunOutcome::Skipped);
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn test_mail_failure_is_reported() {
    let result = run(
        &StaticFeed(items(1)),
        &UnavailableStyler,
        &RejectingMailer,
        &options(false),
    )
    .await;
    assert!(matches!(result, Err(PipelineError::Mail(MailError::Address(_)))));
}
