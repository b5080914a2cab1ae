//! Fan-out of a participant-count change to subscribed chats.

use std::ops::AddAssign;

use serde::Serialize;
use tripwatch_core::{notify::Notifier, subscription::ChatId, trip::ParticipantCounts};

/// How many messages went out and how many failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
  pub sent:   usize,
  pub failed: usize,
}

impl AddAssign for DispatchReport {
  fn add_assign(&mut self, rhs: Self) {
    self.sent += rhs.sent;
    self.failed += rhs.failed;
  }
}

/// The text sent to subscribers when a trip's current count changes.
pub fn update_message(title: &str, counts: ParticipantCounts) -> String {
  format!("Update for \"{title}\": Number of participants changed to {counts}")
}

/// Send the update message to every chat in `chats`, one attempt each.
///
/// A failed send is logged and counted; it never stops the remaining sends.
pub async fn dispatch<N: Notifier>(
  notifier: &N,
  title: &str,
  counts: ParticipantCounts,
  chats: &[ChatId],
) -> DispatchReport {
  let text = update_message(title, counts);
  let mut report = DispatchReport::default();

  for &chat_id in chats {
    match notifier.send_message(chat_id, &text).await {
      Ok(()) => {
        tracing::debug!(%chat_id, title, "notified subscriber");
        report.sent += 1;
      }
      Err(error) => {
        tracing::warn!(%chat_id, title, %error, "failed to notify subscriber");
        report.failed += 1;
      }
    }
  }

  report
}
