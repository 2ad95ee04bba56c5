use serde::Serialize;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Observable session changes. Components that care about who is signed
/// in subscribe here instead of polling the auth service.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    SignedIn { user_id: Uuid, email: Option<String> },
    Refreshed { user_id: Uuid },
    SignedOut { user_id: Option<Uuid> },
    /// Tokens were presented but no longer yield a session.
    Expired,
}

#[derive(Clone)]
pub struct SessionEvents {
    sender: broadcast::Sender<SessionEvent>,
}

impl SessionEvents {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn publish(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new(256)
    }
}

/// Log every session change until the channel closes.
pub fn spawn_audit_logger(events: &SessionEvents) -> JoinHandle<()> {
    let mut receiver = events.subscribe();
    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(event) => match &event {
                    SessionEvent::SignedIn { user_id, email } => {
                        tracing::info!(target: "audit", %user_id, email = email.as_deref().unwrap_or("-"), "session signed in")
                    }
                    SessionEvent::Refreshed { user_id } => {
                        tracing::debug!(target: "audit", %user_id, "session refreshed")
                    }
                    SessionEvent::SignedOut { user_id } => {
                        tracing::info!(target: "audit", user_id = ?user_id, "session signed out")
                    }
                    SessionEvent::Expired => tracing::info!(target: "audit", "session expired"),
                },
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(target: "audit", "audit logger skipped {} session events", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
