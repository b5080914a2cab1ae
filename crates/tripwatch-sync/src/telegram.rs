//! [`Notifier`] backed by the Telegram Bot API.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tripwatch_core::{notify::Notifier, subscription::ChatId};

use crate::error::NotifyError;

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Sends plain-text messages through `sendMessage`.
///
/// The bot token is part of the endpoint URL, so it is never logged and is
/// stripped from transport errors.
#[derive(Clone)]
pub struct TelegramNotifier {
  client:   Client,
  endpoint: String,
}

#[derive(Serialize)]
struct SendMessage<'a> {
  chat_id: i64,
  text:    &'a str,
}

#[derive(Deserialize)]
struct Reply {
  ok:          bool,
  #[serde(default)]
  description: Option<String>,
}

impl TelegramNotifier {
  pub fn new(api_base: &str, bot_token: &str, timeout: Duration) -> Result<Self, NotifyError> {
    let client = Client::builder()
      .timeout(timeout)
      .build()
      .map_err(NotifyError::Client)?;
    let endpoint = format!("{}/bot{}/sendMessage", api_base.trim_end_matches('/'), bot_token);
    Ok(Self { client, endpoint })
  }
}

impl Notifier for TelegramNotifier {
  type Error = NotifyError;

  async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<(), NotifyError> {
    let resp = self
      .client
      .post(&self.endpoint)
      .json(&SendMessage { chat_id: chat_id.0, text })
      .send()
      .await
      .map_err(|e| NotifyError::Http(e.without_url()))?;

    let status = resp.status();
    let reply = resp.json::<Reply>().await.ok();

    match reply {
      Some(Reply { ok: true, .. }) if status.is_success() => Ok(()),
      other => Err(NotifyError::Rejected {
        status:      status.as_u16(),
        description: other
          .and_then(|r| r.description)
          .unwrap_or_else(|| "no description".to_owned()),
      }),
    }
  }
}
