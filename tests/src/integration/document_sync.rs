//! # Document Sync Integration
//!
//! `DocumentSyncService` over a real directory, against the journal-file
//! store (durability across reopen) and a write-counting store (idempotence).

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::counting_store;
    use cg_01_store::{FileGatewayStore, GatewayStoreApi, StoreConfig};
    use cg_02_document_sync::{DirectoryScanner, DocumentSyncApi, DocumentSyncService, ScanOptions};
    use proptest::prelude::*;
    use std::collections::{BTreeMap, BTreeSet};
    use std::fs;
    use std::path::Path;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    // =========================================================================
    // FIXTURES
    // =========================================================================

    fn scanner(dir: &Path) -> DirectoryScanner {
        DirectoryScanner::new(dir, ScanOptions::default())
    }

    fn on_disk(dir: &Path) -> BTreeSet<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
            .collect()
    }

    // =========================================================================
    // SCENARIOS
    // =========================================================================

    /// a, b synced; b deleted, c added; catalog becomes a, c and survives a
    /// store reopen.
    #[tokio::test]
    async fn test_catalog_follows_directory_across_restart() {
        let root = tempfile::tempdir().unwrap();
        let docs = root.path().join("docs");
        fs::create_dir(&docs).unwrap();
        fs::write(docs.join("a"), b"alpha").unwrap();
        fs::write(docs.join("b"), b"beta").unwrap();
        let config = StoreConfig::new(root.path().join("gateway.db")).without_sync();

        {
            let store = Arc::new(FileGatewayStore::open(&config).unwrap());
            let report = DocumentSyncService::new(scanner(&docs), Arc::clone(&store))
                .sync()
                .await
                .unwrap();
            assert_eq!(report.added, vec!["a", "b"]);
        }

        fs::remove_file(docs.join("b")).unwrap();
        fs::write(docs.join("c"), b"gamma").unwrap();

        {
            let store = Arc::new(FileGatewayStore::open(&config).unwrap());
            assert!(!store.was_created());
            let report = DocumentSyncService::new(scanner(&docs), Arc::clone(&store))
                .sync()
                .await
                .unwrap();
            assert_eq!(report.added, vec!["c"]);
            assert_eq!(report.removed, vec!["b"]);
            assert_eq!(report.unchanged, 1);
        }

        let store = FileGatewayStore::open(&config).unwrap();
        let ids: Vec<_> = store.list_document_ids().await.unwrap().into_iter().collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_second_sync_performs_zero_writes() {
        let docs = tempfile::tempdir().unwrap();
        fs::write(docs.path().join("guide.md"), b"# guide").unwrap();
        fs::write(docs.path().join("faq.md"), b"# faq").unwrap();
        let (store, writes) = counting_store();
        let service = DocumentSyncService::new(scanner(docs.path()), Arc::clone(&store));

        service.sync().await.unwrap();
        let after_first = writes.load(Ordering::SeqCst);
        let before = store.list_documents().await.unwrap();

        let report = service.sync().await.unwrap();

        assert!(report.is_noop());
        assert_eq!(report.unchanged, 2);
        assert_eq!(writes.load(Ordering::SeqCst), after_first);
        assert_eq!(store.list_documents().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_touch_without_content_change_is_not_a_write() {
        let docs = tempfile::tempdir().unwrap();
        let path = docs.path().join("policy.txt");
        fs::write(&path, b"v1").unwrap();
        let (store, writes) = counting_store();
        let service = DocumentSyncService::new(scanner(docs.path()), Arc::clone(&store));
        service.sync().await.unwrap();
        let after_first = writes.load(Ordering::SeqCst);

        // Rewrite identical bytes: mtime moves, content does not.
        fs::write(&path, b"v1").unwrap();
        assert!(service.sync().await.unwrap().is_noop());
        assert_eq!(writes.load(Ordering::SeqCst), after_first);

        fs::write(&path, b"v2").unwrap();
        let report = service.sync().await.unwrap();
        assert_eq!(report.updated, vec!["policy.txt"]);
    }

    // =========================================================================
    // PROPERTIES
    // =========================================================================

    #[derive(Debug, Clone)]
    enum FileOp {
        Write(u8, Vec<u8>),
        Delete(u8),
    }

    fn file_op() -> impl Strategy<Value = FileOp> {
        prop_oneof![
            (0u8..6, proptest::collection::vec(any::<u8>(), 0..16))
                .prop_map(|(n, bytes)| FileOp::Write(n, bytes)),
            (0u8..6).prop_map(FileOp::Delete),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        /// Any add/modify/delete sequence followed by one sync leaves the
        /// catalog equal to the final directory.
        #[test]
        fn prop_sync_matches_final_directory(
            before in proptest::collection::vec(file_op(), 0..12),
            after in proptest::collection::vec(file_op(), 0..12),
        ) {
            let runtime = tokio::runtime::Runtime::new().unwrap();
            let docs = tempfile::tempdir().unwrap();
            let apply = |ops: &[FileOp]| {
                for op in ops {
                    match op {
                        FileOp::Write(n, bytes) => {
                            fs::write(docs.path().join(format!("doc-{n}")), bytes).unwrap()
                        }
                        FileOp::Delete(n) => {
                            let _ = fs::remove_file(docs.path().join(format!("doc-{n}")));
                        }
                    }
                }
            };

            let (store, _) = counting_store();
            let service = DocumentSyncService::new(scanner(docs.path()), Arc::clone(&store));

            apply(&before);
            runtime.block_on(service.sync()).unwrap();
            apply(&after);
            runtime.block_on(service.sync()).unwrap();

            let catalog: BTreeMap<_, _> = runtime
                .block_on(store.list_documents())
                .unwrap()
                .into_iter()
                .map(|doc| (doc.id, doc.fingerprint.size))
                .collect();
            let expected: BTreeSet<String> = on_disk(docs.path());
            prop_assert_eq!(catalog.keys().cloned().collect::<BTreeSet<_>>(), expected);

            for (id, size) in &catalog {
                let len = fs::metadata(docs.path().join(id)).unwrap().len();
                prop_assert_eq!(*size, len);
            }

            let second = runtime.block_on(service.sync()).unwrap();
            prop_assert!(second.is_noop());
        }
    }
}
