//! Process-wide publication of the last saved profile.

use std::sync::Arc;

use tokio::sync::watch;
use vitrine_model::RemoteProfile;

/// Write side of the shared profile state. Only a successful save calls it.
pub trait ProfilePublisher: Send + Sync {
    /// Replace the shared profile. Last writer wins.
    fn publish(&self, profile: RemoteProfile);
}

/// Shared profile store backed by a watch channel.
///
/// Readers get cheap snapshots or a receiver that wakes on every publish.
#[derive(Clone, Debug)]
pub struct SharedProfileStore {
    sender: Arc<watch::Sender<Option<RemoteProfile>>>,
    receiver: watch::Receiver<Option<RemoteProfile>>,
}

impl Default for SharedProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedProfileStore {
    pub fn new() -> Self {
        let (sender, receiver) = watch::channel(None);
        Self {
            sender: Arc::new(sender),
            receiver,
        }
    }

    /// The last published profile, if anything has been saved yet.
    pub fn current(&self) -> Option<RemoteProfile> {
        self.receiver.borrow().clone()
    }

    /// Access the profile without cloning
    pub fn with_profile<F, R>(&self, f: F) -> R
    where
        F: FnOnce(Option<&RemoteProfile>) -> R,
    {
        f(self.receiver.borrow().as_ref())
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<RemoteProfile>> {
        self.receiver.clone()
    }
}

impl ProfilePublisher for SharedProfileStore {
    fn publish(&self, profile: RemoteProfile) {
        // send_replace keeps the value even with no live receivers
        self.sender.send_replace(Some(profile));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str) -> RemoteProfile {
        RemoteProfile {
            name: name.to_string(),
            ..RemoteProfile::default()
        }
    }

    #[test]
    fn last_publish_wins() {
        let store = SharedProfileStore::new();
        assert!(store.current().is_none());

        store.publish(profile("Ann"));
        store.publish(profile("Ann Lee"));

        assert_eq!(store.current().unwrap().name, "Ann Lee");
        assert_eq!(
            store.with_profile(|p| p.map(|p| p.name.len())),
            Some("Ann Lee".len())
        );
    }

    #[tokio::test]
    async fn subscribers_are_woken_by_publish() {
        let store = SharedProfileStore::new();
        let mut rx = store.subscribe();
        let reader = store.clone();

        store.publish(profile("Ann Lee"));
        rx.changed().await.unwrap();

        assert_eq!(rx.borrow().as_ref().unwrap().name, "Ann Lee");
        assert_eq!(reader.current(), store.current());
    }
}
