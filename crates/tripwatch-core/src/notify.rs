//! The outbound notification channel.

use std::future::Future;

use crate::subscription::ChatId;

/// Sends a plain-text message to a chat. Fire-and-forget from the pipeline's
/// point of view: a failed send is logged by the caller and never retried.
pub trait Notifier: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn send_message<'a>(
    &'a self,
    chat_id: ChatId,
    text: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
