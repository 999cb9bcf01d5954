//! # Pipeline Integration
//!
//! Both channel pipelines over a real store, driven through the per-user
//! dispatcher the way the runtime drives them.

#[cfg(test)]
mod tests {
    use cg_01_store::{FileGatewayStore, GatewayStore, GatewayStoreApi, StoreConfig};
    use cg_04_pipeline::adapters::{RecordingHandlers, RecordingPrompt};
    use cg_04_pipeline::{ChannelPipelines, EventDispatcher, PipelineConfig, PipelineDeps};
    use shared_types::{
        BlockReason, EventKind, InboundEvent, Outcome, PrivilegedRoster, UserId,
    };
    use std::collections::{BTreeSet, HashMap};
    use std::sync::Arc;
    use std::time::Duration;

    const CONSENT: &str = "consent:accept";

    // =========================================================================
    // FIXTURES
    // =========================================================================

    struct Harness {
        store: Arc<dyn GatewayStoreApi>,
        handlers: Arc<RecordingHandlers>,
        prompt: Arc<RecordingPrompt>,
        pipelines: Arc<ChannelPipelines>,
    }

    fn harness(store: Arc<dyn GatewayStoreApi>) -> Harness {
        let handlers = Arc::new(RecordingHandlers::new());
        let prompt = Arc::new(RecordingPrompt::new());
        let deps = PipelineDeps {
            store: Arc::clone(&store),
            handlers: handlers.clone(),
            prompt: prompt.clone(),
        };
        let pipelines = Arc::new(ChannelPipelines::new(
            &deps,
            &PipelineConfig::default(),
            PrivilegedRoster::default(),
        ));
        Harness {
            store,
            handlers,
            prompt,
            pipelines,
        }
    }

    impl Harness {
        async fn send(&self, event: InboundEvent) -> Outcome {
            let ctx = self.pipelines.context(event);
            self.pipelines.process(&ctx).await
        }
    }

    // =========================================================================
    // SCENARIOS
    // =========================================================================

    /// New user 42: blocked and prompted, accepts, then reaches handlers.
    #[tokio::test]
    async fn test_first_contact_consent_flow() {
        let h = harness(Arc::new(GatewayStore::in_memory()));

        let first = h.send(InboundEvent::message(42, "/start")).await;
        assert_eq!(first, Outcome::Blocked(BlockReason::ConsentMissing));
        assert_eq!(h.handlers.count(), 0);
        assert_eq!(h.prompt.prompted(), vec![42]);
        assert!(h.store.get_user(42).await.unwrap().is_some());
        assert_eq!(h.store.action_log_len().await.unwrap(), 1);

        let accept = h.send(InboundEvent::callback(42, CONSENT)).await;
        assert_eq!(accept, Outcome::Allowed);
        assert!(h.store.has_consent(42).await.unwrap());

        let next = h.send(InboundEvent::message(42, "/start")).await;
        assert_eq!(next, Outcome::Allowed);
        assert_eq!(h.handlers.payloads_of(42), vec![CONSENT, "/start"]);
        assert_eq!(h.prompt.prompted(), vec![42]);

        let log = h.store.list_action_log(10).await.unwrap();
        let outcomes: Vec<_> = log.iter().rev().map(|r| (r.kind, r.outcome)).collect();
        assert_eq!(
            outcomes,
            vec![
                (EventKind::Message, Outcome::Blocked(BlockReason::ConsentMissing)),
                (EventKind::Callback, Outcome::Allowed),
                (EventKind::Message, Outcome::Allowed),
            ]
        );
    }

    /// N events from mixed users yield exactly N records, each with the
    /// outcome a sequential per-user model predicts.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_audit_completeness_under_concurrency() {
        let h = harness(Arc::new(GatewayStore::in_memory()));
        for user in [1, 2] {
            h.store.grant_consent(user).await.unwrap();
        }

        let mut events = Vec::new();
        for round in 0..10 {
            for user in 1..=6 {
                let event = if user == 5 && round == 3 {
                    InboundEvent::callback(user, CONSENT)
                } else if round % 2 == 0 {
                    InboundEvent::message(user, format!("/cmd{round}"))
                } else {
                    InboundEvent::callback(user, format!("menu:{round}"))
                };
                events.push(event);
            }
        }

        let mut consented: BTreeSet<UserId> = BTreeSet::from([1, 2]);
        let mut expected: HashMap<UserId, Vec<Outcome>> = HashMap::new();
        for event in &events {
            let user = event.user_id();
            let outcome = if consented.contains(&user) {
                Outcome::Allowed
            } else if event.kind() == EventKind::Callback && event.payload() == Some(CONSENT) {
                consented.insert(user);
                Outcome::Allowed
            } else {
                Outcome::Blocked(BlockReason::ConsentMissing)
            };
            expected.entry(user).or_default().push(outcome);
        }

        let dispatcher = EventDispatcher::new(Arc::clone(&h.pipelines));
        for event in events.iter().cloned() {
            dispatcher.dispatch(event);
        }
        assert!(dispatcher.drain(Duration::from_secs(10)).await);

        assert_eq!(h.store.action_log_len().await.unwrap(), events.len() as u64);
        for (user, outcomes) in &expected {
            let mut records = h.store.list_action_log_for_user(*user, 100).await.unwrap();
            records.sort_by_key(|r| r.seq);
            let recorded: Vec<_> = records.iter().map(|r| r.outcome).collect();
            assert_eq!(&recorded, outcomes, "user {user}");
        }

        let allowed = expected.values().flatten().filter(|o| o.is_allowed()).count();
        assert_eq!(h.handlers.count(), allowed);

        let (messages, callbacks) = h.pipelines.metrics();
        assert_eq!(messages.events + callbacks.events, events.len() as u64);
        assert_eq!(messages.audit_failures + callbacks.audit_failures, 0);
    }

    /// Consent granted through the pipeline outlives the process.
    #[tokio::test]
    async fn test_consent_survives_store_reopen() {
        let root = tempfile::tempdir().unwrap();
        let config = StoreConfig::new(root.path().join("gateway.db")).without_sync();

        {
            let h = harness(Arc::new(FileGatewayStore::open(&config).unwrap()));
            assert!(h.send(InboundEvent::message(7, "hi")).await.is_blocked());
            assert!(h.send(InboundEvent::callback(7, CONSENT)).await.is_allowed());
            assert!(h.send(InboundEvent::callback(7, CONSENT)).await.is_allowed());
        }

        let store: Arc<dyn GatewayStoreApi> = Arc::new(FileGatewayStore::open(&config).unwrap());
        assert!(store.has_consent(7).await.unwrap());
        store.grant_consent(7).await.unwrap();
        assert!(store.has_consent(7).await.unwrap());
        assert_eq!(store.action_log_len().await.unwrap(), 3);

        let h = harness(store);
        assert_eq!(h.send(InboundEvent::message(7, "/docs")).await, Outcome::Allowed);
        assert!(h.prompt.prompted().is_empty());
        assert_eq!(h.store.action_log_len().await.unwrap(), 4);
    }
}
