//! Retrieval of the calendar page.

use std::{future::Future, time::Duration};

use reqwest::Client;

use crate::error::FetchError;

/// Somewhere the calendar markup can be read from.
pub trait PageSource: Send + Sync {
  fn fetch(&self) -> impl Future<Output = Result<String, FetchError>> + Send + '_;
}

/// Fetches the calendar page over HTTP with a bounded request timeout.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpPageSource {
  client: Client,
  url:    String,
}

impl HttpPageSource {
  pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
    let client = Client::builder()
      .timeout(timeout)
      .build()
      .map_err(FetchError::Client)?;
    Ok(Self { client, url: url.into() })
  }
}

impl PageSource for HttpPageSource {
  async fn fetch(&self) -> Result<String, FetchError> {
    let resp = self.client.get(&self.url).send().await?;

    let status = resp.status();
    if !status.is_success() {
      return Err(FetchError::Status {
        status: status.as_u16(),
        url:    self.url.clone(),
      });
    }

    let body = resp.text().await?;
    tracing::debug!(url = %self.url, bytes = body.len(), "fetched calendar page");
    Ok(body)
  }
}
