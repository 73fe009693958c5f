mod common;

use std::path::Path;

use common::MemoryStore;
use docsum::core::models::UploadRequest;
use docsum::errors::StorageError;
use docsum::storage::{ObjectStore, Uploader};

#[tokio::test]
async fn test_uploaded_object_matches_local_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.pdf");
    let bytes = b"%PDF-1.7\n\x00\x01binary body".to_vec();
    std::fs::write(&path, &bytes).unwrap();

    let uploader = Uploader::new(MemoryStore::default());
    let ack = uploader
        .upload(&UploadRequest::new(&path, "docs", "req-1/report.pdf"))
        .await
        .unwrap();

    assert_eq!(ack.location.bucket, "docs");
    assert_eq!(ack.location.object_name, "req-1/report.pdf");
    assert_eq!(ack.location.to_string(), "s3://docs/req-1/report.pdf");

    let stored = uploader
        .store()
        .get_object("docs", "req-1/report.pdf")
        .await
        .unwrap();
    assert_eq!(stored, bytes);
    assert_eq!(
        uploader.store().content_type("docs", "req-1/report.pdf"),
        Some("application/pdf".to_string())
    );
}

#[tokio::test]
async fn test_upload_overwrites_existing_object() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    let uploader = Uploader::new(MemoryStore::default());

    std::fs::write(&path, "first").unwrap();
    uploader
        .upload(&UploadRequest::new(&path, "docs", "notes.txt"))
        .await
        .unwrap();
    std::fs::write(&path, "second").unwrap();
    uploader
        .upload(&UploadRequest::new(&path, "docs", "notes.txt"))
        .await
        .unwrap();

    let stored = uploader.store().get_object("docs", "notes.txt").await.unwrap();
    assert_eq!(stored, b"second");
}

#[tokio::test]
async fn test_missing_local_file() {
    let uploader = Uploader::new(MemoryStore::default());
    let err = uploader
        .upload(&UploadRequest::new(
            Path::new("/definitely/not/here.pdf"),
            "docs",
            "here.pdf",
        ))
        .await
        .unwrap_err();

    assert!(
        !err.to_string().contains("/definitely/not"),
        "server path leaked into {err}"
    );
    match err {
        StorageError::LocalFile { path, .. } => assert_eq!(path, "/definitely/not/here.pdf"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_bucket_or_object_name_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.pdf");
    std::fs::write(&path, "x").unwrap();
    let uploader = Uploader::new(MemoryStore::default());

    let err = uploader
        .upload(&UploadRequest::new(&path, "", "a.pdf"))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::InvalidRequest(_)));

    let err = uploader
        .upload(&UploadRequest::new(&path, "docs", "  "))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::InvalidRequest(_)));

    assert!(uploader.store().get_object("docs", "a.pdf").await.is_err());
}
