//! Webhook notification of the consolidated report.
//!
//! The payload uses the Discord embed shape: one embed with a title, a
//! description, a severity color, one non-inline field per entry and a
//! timestamped footer. Delivery is a single best-effort POST.

use std::time::Duration;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::config::WebhookConfig;
use crate::flavor::Flavor;
use crate::report::Report;

/// Top-level webhook body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookPayload {
    /// Always a single embed.
    pub embeds: Vec<Embed>,
}

/// One rich embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    /// Flavor-specific title.
    pub title: String,
    /// Mentions the checked window.
    pub description: String,
    /// Color derived from the overall severity.
    pub color: u32,
    /// One field per report entry, in report order.
    pub fields: Vec<EmbedField>,
    /// Monitor tag and generation time.
    pub footer: EmbedFooter,
}

/// Name/value pair rendered as a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    /// Status glyph followed by the job label.
    pub name: String,
    /// Entry message.
    pub value: String,
    /// Always `false`: one entry per row.
    pub inline: bool,
}

/// Embed footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedFooter {
    /// `"<tag> • <YYYY-MM-DD HH:MM:SS>"`.
    pub text: String,
}

/// Serialize a report into a webhook payload.
pub fn build_payload<Tz>(
    report: &Report,
    flavor: Flavor,
    window_minutes: u32,
    now: &DateTime<Tz>,
) -> WebhookPayload
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let fields = report
        .entries
        .iter()
        .map(|entry| EmbedField {
            name: format!("{} {}", entry.status.glyph(), entry.job_label),
            value: entry.message.clone(),
            inline: false,
        })
        .collect();

    WebhookPayload {
        embeds: vec![Embed {
            title: flavor.title().to_owned(),
            description: format!("Checked the last **{window_minutes} minutes** of logs."),
            color: report.overall_severity.color(),
            fields,
            footer: EmbedFooter {
                text: format!(
                    "{} \u{2022} {}",
                    flavor.footer_tag(),
                    now.format("%Y-%m-%d %H:%M:%S")
                ),
            },
        }],
    }
}

/// Outcome of a delivery attempt. Never an error: failures are logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// The endpoint accepted the payload.
    Sent,
    /// No destination URL is configured.
    Skipped,
    /// The request failed or was rejected.
    Failed(String),
}

/// Posts payloads to the configured webhook.
pub struct Notifier {
    url: String,
    timeout: Duration,
}

impl Notifier {
    /// Create a notifier for the given destination.
    pub fn new(config: &WebhookConfig) -> Self {
        Self {
            url: config.url.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Send the payload once with a bounded timeout.
    ///
    /// No retry. Any failure is logged and reported through [`Delivery`].
    pub async fn deliver(&self, payload: &WebhookPayload) -> Delivery {
        if self.url.is_empty() {
            info!("no webhook url configured, report not sent");
            return Delivery::Skipped;
        }

        match self.post(payload).await {
            Ok(()) => {
                debug!("report delivered");
                Delivery::Sent
            }
            Err(e) => {
                error!(error = %e, "webhook send failed");
                Delivery::Failed(e.to_string())
            }
        }
    }

    async fn post(&self, payload: &WebhookPayload) -> Result<(), reqwest::Error> {
        let client = reqwest::Client::builder().timeout(self.timeout).build()?;
        client
            .post(&self.url)
            .json(payload)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
