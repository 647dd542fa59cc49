//! # Message Bus Flows
//!
//! Buses in separate "processes" exchanging messages over one
//! `BroadcastHub`:
//!
//! 1. **Directed delivery**: only the addressed package stores the message
//! 2. **Broadcast**: every attached bus stores it, the sender included
//! 3. **Respond round-trip**: a reply reuses the id and finds the sender
//! 4. **Late listener**: backlog replay after messages arrived unobserved

#[cfg(test)]
mod tests {
    use crate::integration::eventually;
    use cn_01_message_bus::test_utils::{validated_credential, CollectingListener};
    use cn_01_message_bus::{
        BroadcastHub, BusConfig, DeliveryFilter, HistoryScope, MessageBus, MessageListener,
        MessageSink,
    };
    use shared_types::{CredentialGuard, Message, Payload, PayloadValue};
    use std::sync::{Arc, Weak};
    use tokio::task::JoinHandle;

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    struct Node {
        bus: Arc<MessageBus>,
        _receiver: JoinHandle<()>,
    }

    fn node(hub: &BroadcastHub, package: &str) -> Node {
        let bus = Arc::new(
            MessageBus::new(
                validated_credential(package) as Arc<dyn CredentialGuard>,
                Arc::new(hub.transport()),
                BusConfig::default(),
            )
            .unwrap(),
        );
        let receiver = hub.attach(Arc::downgrade(&bus) as Weak<dyn MessageSink>);
        Node {
            bus,
            _receiver: receiver,
        }
    }

    fn payload(entries: &[(&str, PayloadValue)]) -> Payload {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    /// Answers every request with the request's `n` doubled.
    struct Doubler {
        bus: Weak<MessageBus>,
    }

    impl MessageListener for Doubler {
        fn on_message(&self, message: &Message) {
            let Some(bus) = self.bus.upgrade() else {
                return;
            };
            let Some(n) = message.get("n").and_then(PayloadValue::as_i64) else {
                return;
            };
            bus.respond(message, payload(&[("n", PayloadValue::from(n * 2))]))
                .unwrap();
        }
    }

    // =========================================================================
    // INTEGRATION TESTS
    // =========================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_directed_message_reaches_only_its_package() {
        let hub = BroadcastHub::new();
        let mail = node(&hub, "com.example.mail");
        let notes = node(&hub, "com.example.notes");
        let app = node(&hub, "com.example.app");

        app.bus
            .send(
                1,
                "com.example.mail",
                payload(&[("subject", PayloadValue::from("hello"))]),
            )
            .unwrap();

        assert!(eventually(|| mail.bus.stored_received() == 1).await);
        let stored = mail.bus.message_by_id(1).unwrap();
        assert_eq!(stored.sender(), "com.example.app");
        assert_eq!(stored.get("subject").and_then(PayloadValue::as_str), Some("hello"));
        assert!(!stored.is_delivered());

        assert_eq!(notes.bus.stored_received(), 0);
        assert_eq!(app.bus.stored_received(), 0);
        assert_eq!(app.bus.total_sent(), 1);
        assert_eq!(app.bus.stored_sent(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_broadcast_reaches_every_bus_including_sender() {
        let hub = BroadcastHub::new();
        let nodes: Vec<Node> = ["com.example.a", "com.example.b", "com.example.c"]
            .iter()
            .map(|package| node(&hub, package))
            .collect();

        nodes[0]
            .bus
            .broadcast(9, payload(&[("ping", PayloadValue::from(true))]))
            .unwrap();

        for node in &nodes {
            let bus = Arc::clone(&node.bus);
            assert!(eventually(move || bus.message_by_id(9).is_some()).await);
        }
        assert!(nodes[0].bus.message_by_id(9).unwrap().receiver().is_broadcast());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_respond_round_trip() {
        let hub = BroadcastHub::new();
        let client = node(&hub, "com.example.client");
        let server = node(&hub, "com.example.server");

        let doubler: Arc<dyn MessageListener> = Arc::new(Doubler {
            bus: Arc::downgrade(&server.bus),
        });
        server.bus.register_listener(&doubler);

        let replies = CollectingListener::new();
        let handle: Arc<dyn MessageListener> = replies.clone();
        client.bus.register_listener(&handle);

        client
            .bus
            .send(
                77,
                "com.example.server",
                payload(&[("n", PayloadValue::from(21))]),
            )
            .unwrap();

        assert!(eventually(|| replies.count() == 1).await);
        let reply = &replies.seen()[0];
        assert_eq!(reply.id(), 77);
        assert_eq!(reply.sender(), "com.example.server");
        assert_eq!(reply.receiver().as_package(), Some("com.example.client"));
        assert_eq!(reply.get("n").and_then(PayloadValue::as_i64), Some(42));

        assert_eq!(server.bus.total_received(), 1);
        assert_eq!(server.bus.total_sent(), 1);
        assert!(server.bus.message_by_id(77).unwrap().is_delivered());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_late_listener_gets_backlog_then_live_traffic() {
        let hub = BroadcastHub::new();
        let sender = node(&hub, "com.example.sender");
        let inbox = node(&hub, "com.example.inbox");

        for id in 1..=3 {
            sender
                .bus
                .send(id, "com.example.inbox", Payload::new())
                .unwrap();
        }
        assert!(eventually(|| inbox.bus.stored_received() == 3).await);

        let listener = CollectingListener::new();
        let handle: Arc<dyn MessageListener> = listener.clone();
        assert_eq!(inbox.bus.register_listener(&handle), 3);
        assert_eq!(listener.seen_ids(), vec![1, 2, 3]);

        sender
            .bus
            .send(4, "com.example.inbox", Payload::new())
            .unwrap();
        assert!(eventually(|| listener.count() == 4).await);
        assert_eq!(listener.seen_ids(), vec![1, 2, 3, 4]);

        assert_eq!(
            inbox
                .bus
                .clear(HistoryScope::Received, DeliveryFilter::Delivered),
            4
        );
        assert_eq!(inbox.bus.total_received(), 4);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_unauthorized_bus_neither_sends_nor_receives() {
        let hub = BroadcastHub::new();
        let locked = {
            let credential = validated_credential("com.example.locked");
            credential.set_valid(false);
            let bus = Arc::new(
                MessageBus::new(
                    credential as Arc<dyn CredentialGuard>,
                    Arc::new(hub.transport()),
                    BusConfig::default(),
                )
                .unwrap(),
            );
            let receiver = hub.attach(Arc::downgrade(&bus) as Weak<dyn MessageSink>);
            Node {
                bus,
                _receiver: receiver,
            }
        };
        let open = node(&hub, "com.example.open");

        assert!(locked.bus.send(1, "com.example.open", Payload::new()).is_err());
        assert_eq!(locked.bus.stored_sent(), 1);

        open.bus
            .send(2, "com.example.locked", Payload::new())
            .unwrap();
        open.bus.broadcast(3, Payload::new()).unwrap();

        // The open bus sees its own broadcast; by then the locked bus has had
        // its chance at both frames.
        assert!(eventually(|| open.bus.message_by_id(3).is_some()).await);
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(locked.bus.stored_received(), 0);
        assert_eq!(open.bus.stored_received(), 1);
    }
}
