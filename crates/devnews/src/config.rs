//! Process configuration, read once from the environment.

use std::fmt::{self, Debug, Formatter};
use std::str::FromStr;
use std::time::Duration;

use devnews_core::MAX_ITEMS;
use devnews_openai_model::{OpenAIConfig, OpenAIConfigBuilder};

/// Default feed: Smashing Magazine.
pub const DEFAULT_FEED_URL: &str = "https://www.smashingmagazine.com/feed/";
/// Default SMTP host.
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
/// Default SMTP port (STARTTLS).
pub const DEFAULT_SMTP_PORT: u16 = 587;
/// Default mail subject.
pub const DEFAULT_SUBJECT: &str = "Daily Frontend Development Tech Updates";
/// Default bound for one styler call.
pub const DEFAULT_STYLER_TIMEOUT: Duration = Duration::from_secs(60);

/// Error returned when the environment does not describe a valid setup.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("{0} environment variable is not set")]
    Missing(&'static str),
    /// A variable holds a value that cannot be used.
    #[error("invalid value {value:?} for {name}: {reason}")]
    Invalid {
        /// The variable name.
        name: &'static str,
        /// The offending value.
        value: String,
        /// What was expected.
        reason: &'static str,
    },
}

/// SMTP connection and addressing.
#[derive(Clone)]
pub struct SmtpConfig {
    /// Relay host, reached with STARTTLS.
    pub host: String,
    /// Relay port.
    pub port: u16,
    /// Login, also used as the sender address.
    pub username: String,
    /// Password or app password.
    pub password: String,
    /// Recipient address.
    pub recipient: String,
}

impl Debug for SmtpConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("recipient", &self.recipient)
            .finish()
    }
}

/// Everything a run needs.
#[derive(Clone, Debug)]
pub struct Config {
    /// The feed to read.
    pub feed_url: String,
    /// How many feed entries to keep, `1..=MAX_ITEMS`.
    pub max_items: usize,
    /// The mail subject.
    pub subject: String,
    /// Don't send anything when the feed yields no items.
    pub skip_empty: bool,
    /// Mail transport.
    pub smtp: SmtpConfig,
    /// The language model, `None` when no API key is configured.
    pub openai: Option<OpenAIConfig>,
    /// Bound for one styler call.
    pub styler_timeout: Duration,
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`. Empty values count as
    /// unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };
        let required = |name: &'static str| {
            var(name).ok_or(ConfigError::Missing(name))
        };

        let smtp = SmtpConfig {
            host: var("SMTP_SERVER")
                .unwrap_or_else(|| DEFAULT_SMTP_HOST.to_owned()),
            port: parse_var(var("SMTP_PORT"), "SMTP_PORT", "a port number")?
                .unwrap_or(DEFAULT_SMTP_PORT),
            username: required("EMAIL_ADDRESS")?,
            password: required("EMAIL_PASSWORD")?,
            recipient: required("RECIPIENT_EMAIL")?,
        };

        let max_items = match parse_var::<usize>(
            var("DIGEST_MAX_ITEMS"),
            "DIGEST_MAX_ITEMS",
            "a positive integer",
        )? {
            Some(0) => {
                return Err(ConfigError::Invalid {
                    name: "DIGEST_MAX_ITEMS",
                    value: "0".to_owned(),
                    reason: "a positive integer",
                });
            }
            Some(n) => n.min(MAX_ITEMS),
            None => MAX_ITEMS,
        };

        let skip_empty = match var("DIGEST_SKIP_EMPTY") {
            Some(value) => parse_flag(&value).ok_or(ConfigError::Invalid {
                name: "DIGEST_SKIP_EMPTY",
                value,
                reason: "true or false",
            })?,
            None => false,
        };

        let styler_timeout = parse_var::<u64>(
            var("STYLER_TIMEOUT_SECS"),
            "STYLER_TIMEOUT_SECS",
            "a number of seconds",
        )?
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_STYLER_TIMEOUT);

        let openai = var("OPENAI_API_KEY").map(|api_key| {
            let mut builder = OpenAIConfigBuilder::with_api_key(api_key)
                .with_timeout(styler_timeout);
            if let Some(base_url) = var("OPENAI_BASE_URL") {
                builder = builder.with_base_url(base_url);
            }
            if let Some(model) = var("OPENAI_MODEL") {
                builder = builder.with_model(model);
            }
            builder.build()
        });

        Ok(Self {
            feed_url: var("RSS_FEED_URL")
                .unwrap_or_else(|| DEFAULT_FEED_URL.to_owned()),
            max_items,
            subject: var("DIGEST_SUBJECT")
                .unwrap_or_else(|| DEFAULT_SUBJECT.to_owned()),
            skip_empty,
            smtp,
            openai,
            styler_timeout,
        })
    }
}

fn parse_var<T: FromStr>(
    value: Option<String>,
    name: &'static str,
    reason: &'static str,
) -> Result<Option<T>, ConfigError> {
    value
        .map(|value| {
            value.parse().map_err(|_| ConfigError::Invalid {
                name,
                value,
                reason,
            })
        })
        .transpose()
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
