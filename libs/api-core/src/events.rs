use tokio::sync::broadcast;

/// Output port: publish domain events (no knowledge of transport).
pub trait EventPublisher<E>: Send + Sync + 'static {
    fn publish(&self, event: &E);
}

/// Broadcast-channel publisher connecting a module's domain events to any
/// number of in-process consumers (the notification writer, tests).
///
/// Publishing never blocks and never fails: with no subscribers the event is
/// dropped, and a lagging subscriber loses the oldest events. Both are fine
/// for best-effort projections.
pub struct BroadcastPublisher<E> {
    tx: broadcast::Sender<E>,
}

impl<E: Clone + Send + 'static> BroadcastPublisher<E> {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<E> {
        self.tx.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl<E: Clone + Send + 'static> Clone for BroadcastPublisher<E> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<E: Clone + Send + Sync + 'static> EventPublisher<E> for BroadcastPublisher<E> {
    fn publish(&self, event: &E) {
        // send only errors when there are no receivers
        let _ = self.tx.send(event.clone());
    }
}

/// Publisher that discards everything. For tests and the `check` command.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPublisher;

impl<E: Send + Sync + 'static> EventPublisher<E> for NoopPublisher {
    fn publish(&self, _event: &E) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Ping(u32);

    #[tokio::test]
    async fn broadcast_delivers_to_all_subscribers() {
        let publisher = BroadcastPublisher::<Ping>::new(8);
        let mut rx1 = publisher.subscribe();
        let mut rx2 = publisher.subscribe();

        publisher.publish(&Ping(7));

        assert_eq!(rx1.recv().await.ok(), Some(Ping(7)));
        assert_eq!(rx2.recv().await.ok(), Some(Ping(7)));
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_a_noop() {
        let publisher = BroadcastPublisher::<Ping>::new(8);
        publisher.publish(&Ping(1));
        assert_eq!(publisher.receiver_count(), 0);
    }

    #[test]
    fn noop_publisher_accepts_any_event() {
        let publisher = NoopPublisher;
        publisher.publish(&Ping(42));
    }
}
