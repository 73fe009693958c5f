#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use docsum::core::models::{ObjectLocation, UploadAck, UploadRequest};
use docsum::errors::{ExtractionError, StorageError, SummarizationError};
use docsum::orchestrator::{Extract, Summarize, Upload};
use docsum::storage::ObjectStore;

/// In-memory object store keyed by `(bucket, key)`.
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<(String, String), (Vec<u8>, String)>>,
}

impl MemoryStore {
    pub fn content_type(&self, bucket: &str, key: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .map(|(_, ct)| ct.clone())
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.objects.lock().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            (body, content_type.to_string()),
        );
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .map(|(body, _)| body.clone())
            .ok_or_else(|| StorageError::Remote(format!("NoSuchKey: {bucket}/{key}")))
    }
}

/// Upload step that records what it was asked to do.
#[derive(Default)]
pub struct StubUploader {
    pub fail_with: Option<String>,
    pub calls: Mutex<Vec<UploadRequest>>,
    pub existed_during_call: Mutex<Vec<bool>>,
    pub staged_bytes: Mutex<Vec<Vec<u8>>>,
}

impl StubUploader {
    pub fn failing(reason: &str) -> Self {
        Self {
            fail_with: Some(reason.to_string()),
            ..Self::default()
        }
    }

    pub fn local_paths(&self) -> Vec<PathBuf> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.local_path.clone())
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Upload for StubUploader {
    async fn upload(&self, request: &UploadRequest) -> Result<UploadAck, StorageError> {
        self.calls.lock().unwrap().push(request.clone());
        self.existed_during_call
            .lock()
            .unwrap()
            .push(request.local_path.exists());
        self.staged_bytes
            .lock()
            .unwrap()
            .push(std::fs::read(&request.local_path).unwrap_or_default());
        match &self.fail_with {
            Some(reason) => Err(StorageError::Remote(reason.clone())),
            None => Ok(UploadAck {
                location: ObjectLocation::new(&request.bucket, &request.object_name),
            }),
        }
    }
}

pub struct StubExtractor {
    pub result: Result<String, String>,
    pub calls: Mutex<Vec<ObjectLocation>>,
}

impl StubExtractor {
    pub fn returning(text: &str) -> Self {
        Self {
            result: Ok(text.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            result: Err(reason.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Extract for StubExtractor {
    async fn extract(&self, location: &ObjectLocation) -> Result<String, ExtractionError> {
        self.calls.lock().unwrap().push(location.clone());
        match &self.result {
            Ok(text) => Ok(text.clone()),
            Err(reason) => Err(ExtractionError::JobFailed {
                job_id: "job-1".to_string(),
                status: "FAILED".to_string(),
                reason: reason.clone(),
            }),
        }
    }
}

/// Summarize step that echoes its input behind a `Summary: ` prefix.
#[derive(Default)]
pub struct EchoSummarizer {
    pub fail: bool,
    pub calls: AtomicUsize,
    pub inputs: Mutex<Vec<String>>,
}

impl EchoSummarizer {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Summarize for EchoSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, SummarizationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inputs.lock().unwrap().push(text.to_string());
        if self.fail {
            return Err(SummarizationError::MissingGeneration);
        }
        Ok(format!("Summary: {text}"))
    }
}

/// Summarize step that never finishes.
pub struct HangingSummarizer;

#[async_trait]
impl Summarize for HangingSummarizer {
    async fn summarize(&self, _text: &str) -> Result<String, SummarizationError> {
        std::future::pending().await
    }
}
