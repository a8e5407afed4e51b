//! History notification broadcaster.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::broadcast;

use crate::model::PrintOutcome;
use crate::providers::ProviderKind;

/// Notification sent to clients of the print job history.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum HistoryEvent {
    /// A print started and is now being recorded.
    #[serde(rename_all = "camelCase")]
    PrintStarted { file_name: Option<String> },
    /// A print reached a terminal state and was committed.
    #[serde(rename_all = "camelCase")]
    PrintFinished {
        database_id: i64,
        outcome: PrintOutcome,
    },
    /// Optional providers are not installed.
    #[serde(rename_all = "camelCase")]
    MissingPlugin {
        providers: Vec<ProviderKind>,
        message: String,
    },
    /// The stored history was edited or pruned.
    HistoryChanged,
}

impl HistoryEvent {
    /// Builds a missing-provider notice with an HTML list message.
    pub fn missing_plugin(providers: Vec<ProviderKind>) -> Self {
        let items: String = providers
            .iter()
            .map(|p| format!("<li>{}</li>", p))
            .collect();
        Self::MissingPlugin {
            message: format!("<ul>{}</ul>", items),
            providers,
        }
    }
}

/// Broadcasts history events for streaming.
#[derive(Clone)]
pub struct HistoryBroadcaster {
    sender: Arc<broadcast::Sender<HistoryEvent>>,
}

impl HistoryBroadcaster {
    /// Creates a new broadcaster with the specified channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Sends an event to all subscribers.
    pub fn send(&self, event: HistoryEvent) {
        // Ignore errors - no active receivers is fine
        let _ = self.sender.send(event);
    }

    /// Creates a new subscriber.
    pub fn subscribe(&self) -> broadcast::Receiver<HistoryEvent> {
        self.sender.subscribe()
    }
}

impl Default for HistoryBroadcaster {
    fn default() -> Self {
        Self::new(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_without_subscribers() {
        let broadcaster = HistoryBroadcaster::new(4);
        broadcaster.send(HistoryEvent::HistoryChanged);
    }

    #[test]
    fn test_send_receive() {
        let broadcaster = HistoryBroadcaster::default();
        let mut rx = broadcaster.subscribe();

        broadcaster.send(HistoryEvent::PrintFinished {
            database_id: 3,
            outcome: PrintOutcome::Success,
        });

        let received = rx.try_recv().unwrap();
        assert_eq!(
            received,
            HistoryEvent::PrintFinished {
                database_id: 3,
                outcome: PrintOutcome::Success
            }
        );
    }

    #[test]
    fn test_print_finished_json_shape() {
        let json = serde_json::to_value(HistoryEvent::PrintFinished {
            database_id: 7,
            outcome: PrintOutcome::Canceled,
        })
        .unwrap();
        assert_eq!(json["action"], "printFinished");
        assert_eq!(json["databaseId"], 7);
        assert_eq!(json["outcome"], "canceled");
    }

    #[test]
    fn test_missing_plugin_message() {
        let event =
            HistoryEvent::missing_plugin(vec![ProviderKind::PreHeat, ProviderKind::FilamentManager]);
        match event {
            HistoryEvent::MissingPlugin { message, providers } => {
                assert_eq!(message, "<ul><li>PreHeat</li><li>FilamentManager</li></ul>");
                assert_eq!(providers.len(), 2);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }
}
