use super::*;
use crate::adapters::DirectoryScanner;
use crate::domain::config::ScanOptions;
use crate::domain::errors::SyncWarning;
use crate::ports::outbound::DocumentSnapshot;
use cg_01_store::{Fingerprint, GatewayStore, InMemoryKVStore, SystemTimeSource};
use std::fs;
use std::sync::Mutex;

type MemStore = GatewayStore<InMemoryKVStore, SystemTimeSource>;

/// Source replaying scripted scan results, one per call.
struct ScriptedSource(Mutex<Vec<Result<DocumentSnapshot, SyncError>>>);

impl DocumentSource for ScriptedSource {
    fn scan(&self) -> Result<DocumentSnapshot, SyncError> {
        self.0.lock().unwrap().remove(0)
    }
}

fn fp(byte: u8) -> Fingerprint {
    Fingerprint::new(byte as u64, [byte; 32])
}

fn snapshot(entries: &[(&str, u8)]) -> DocumentSnapshot {
    DocumentSnapshot {
        files: entries
            .iter()
            .map(|(id, b)| (id.to_string(), fp(*b)))
            .collect(),
        warnings: Vec::new(),
    }
}

fn scripted(
    runs: Vec<Result<DocumentSnapshot, SyncError>>,
) -> (DocumentSyncService<ScriptedSource, MemStore>, Arc<MemStore>) {
    let store = Arc::new(GatewayStore::in_memory());
    let service = DocumentSyncService::new(ScriptedSource(Mutex::new(runs)), Arc::clone(&store));
    (service, store)
}

#[tokio::test]
async fn test_second_run_without_changes_writes_nothing() {
    let (service, store) = scripted(vec![
        Ok(snapshot(&[("a.txt", 1), ("b.txt", 2)])),
        Ok(snapshot(&[("a.txt", 1), ("b.txt", 2)])),
    ]);

    let first = service.sync().await.unwrap();
    assert_eq!(first.added, vec!["a.txt".to_string(), "b.txt".to_string()]);

    let second = service.sync().await.unwrap();
    assert!(second.is_noop());
    assert_eq!(second.unchanged, 2);
    assert_eq!(store.list_document_ids().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_changed_fingerprint_is_updated() {
    let (service, store) = scripted(vec![
        Ok(snapshot(&[("a.txt", 1)])),
        Ok(snapshot(&[("a.txt", 7)])),
    ]);

    service.sync().await.unwrap();
    let report = service.sync().await.unwrap();

    assert_eq!(report.updated, vec!["a.txt".to_string()]);
    assert_eq!(store.list_documents().await.unwrap()[0].fingerprint, fp(7));
}

#[tokio::test]
async fn test_skipped_files_are_reported_not_fatal() {
    let mut with_warning = snapshot(&[("a.txt", 1)]);
    with_warning
        .warnings
        .push(SyncWarning::new("/docs/locked.txt", "permission denied"));
    let (service, store) = scripted(vec![Ok(with_warning)]);

    let report = service.sync().await.unwrap();

    assert_eq!(report.skipped.len(), 1);
    assert_eq!(
        store.list_document_ids().await.unwrap().into_iter().collect::<Vec<_>>(),
        vec!["a.txt".to_string()]
    );
}

#[tokio::test]
async fn test_source_failure_leaves_catalog_untouched() {
    let (service, store) = scripted(vec![
        Ok(snapshot(&[("a.txt", 1)])),
        Err(SyncError::NotADirectory {
            path: "/docs".into(),
        }),
    ]);

    service.sync().await.unwrap();
    assert!(service.sync().await.is_err());
    assert_eq!(store.list_document_ids().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_directory_add_modify_delete_sequence() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "a").unwrap();
    fs::write(dir.path().join("b.txt"), "b").unwrap();

    let store = Arc::new(GatewayStore::in_memory());
    let service = DocumentSyncService::new(
        DirectoryScanner::new(dir.path(), ScanOptions::default()),
        Arc::clone(&store),
    );
    service.sync().await.unwrap();

    fs::remove_file(dir.path().join("b.txt")).unwrap();
    fs::write(dir.path().join("c.txt"), "c").unwrap();
    fs::write(dir.path().join("a.txt"), "a, edited").unwrap();
    let report = service.sync().await.unwrap();

    assert_eq!(report.added, vec!["c.txt".to_string()]);
    assert_eq!(report.updated, vec!["a.txt".to_string()]);
    assert_eq!(report.removed, vec!["b.txt".to_string()]);
    assert_eq!(
        store.list_document_ids().await.unwrap().into_iter().collect::<Vec<_>>(),
        vec!["a.txt".to_string(), "c.txt".to_string()]
    );
}
