use tokio::sync::broadcast;

/// Fan-out bus: every subscriber sees every event published after it
/// subscribed. Dropping a receiver unsubscribes it.
pub struct EventBus<E> {
    sender: broadcast::Sender<E>,
}

impl<E: Clone> EventBus<E> {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<E> {
        self.sender.subscribe()
    }

    /// Publish an event. Returns the number of subscribers that received it.
    pub fn publish(&self, event: E) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

impl<E> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Ping {
        Open(u32),
        Close(u32),
    }

    #[tokio::test]
    async fn publish_and_receive() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(Ping::Open(1));

        let event = rx.recv().await.unwrap();
        assert_eq!(event, Ping::Open(1));
    }

    #[tokio::test]
    async fn multiple_subscribers() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(Ping::Close(7));

        assert_eq!(rx1.recv().await.unwrap(), Ping::Close(7));
        assert_eq!(rx2.recv().await.unwrap(), Ping::Close(7));
    }

    #[tokio::test]
    async fn events_arrive_in_publish_order() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(Ping::Open(1));
        bus.publish(Ping::Open(2));
        bus.publish(Ping::Close(1));

        assert_eq!(rx.recv().await.unwrap(), Ping::Open(1));
        assert_eq!(rx.recv().await.unwrap(), Ping::Open(2));
        assert_eq!(rx.recv().await.unwrap(), Ping::Close(1));
    }

    #[test]
    fn publish_returns_zero_with_no_subscribers() {
        let bus = EventBus::new(16);
        assert_eq!(bus.publish(Ping::Open(0)), 0);
    }

    #[test]
    fn dropping_receiver_unsubscribes() {
        let bus: EventBus<Ping> = EventBus::new(16);
        let rx = bus.subscribe();
        let _rx2 = bus.subscribe();
        assert_eq!(bus.publish(Ping::Open(2)), 2);
        drop(rx);
        assert_eq!(bus.publish(Ping::Open(3)), 1);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let bus = EventBus::new(0);
        let _rx = bus.subscribe();
        assert_eq!(bus.publish(Ping::Open(1)), 1);
    }
}
