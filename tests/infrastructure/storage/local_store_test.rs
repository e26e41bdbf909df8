use std::io;

use bytes::Bytes;
use futures::StreamExt;
use futures::stream;
use futures::stream::BoxStream;

use semporna::application::ports::{ArtifactStore, ArtifactStoreError};
use semporna::domain::{ArtifactName, UploadMeta};
use semporna::infrastructure::storage::LocalArtifactStore;

const MAX_BYTES: u64 = 1024 * 1024;

fn create_test_store() -> (tempfile::TempDir, LocalArtifactStore) {
    let dir = tempfile::TempDir::new().unwrap();
    let store = LocalArtifactStore::new(dir.path().to_path_buf(), MAX_BYTES).unwrap();
    (dir, store)
}

fn wav_upload() -> UploadMeta {
    UploadMeta {
        field_name: "audio_file".to_string(),
        original_name: "sample.wav".to_string(),
        declared_mime: "audio/wav".to_string(),
    }
}

fn byte_stream(
    chunks: Vec<Result<Bytes, io::Error>>,
) -> BoxStream<'static, Result<Bytes, io::Error>> {
    Box::pin(stream::iter(chunks))
}

#[tokio::test]
async fn given_valid_stream_when_staging_then_file_is_persisted() {
    let (dir, store) = create_test_store();

    let chunks = vec![Ok(Bytes::from("hello ")), Ok(Bytes::from("world"))];
    let artifact = store.stage(&wav_upload(), byte_stream(chunks)).await.unwrap();

    assert_eq!(artifact.size_bytes, 11);
    assert_eq!(artifact.original_name, "sample.wav");
    assert!(artifact.name.as_str().starts_with("audio_file-"));
    assert!(artifact.name.as_str().ends_with(".wav"));
    assert!(dir.path().join(artifact.name.as_str()).is_file());
}

#[tokio::test]
async fn given_staged_artifact_when_fetching_then_bytes_match_original() {
    let (_dir, store) = create_test_store();

    let content = b"test content";
    let artifact = store
        .stage(&wav_upload(), byte_stream(vec![Ok(Bytes::from(&content[..]))]))
        .await
        .unwrap();

    let fetched = store.fetch(&artifact.name).await.unwrap();
    assert_eq!(fetched, content);
}

#[tokio::test]
async fn given_payload_over_the_cap_when_staging_then_no_partial_file_remains() {
    let (dir, store) = create_test_store();

    let oversized = vec![0u8; (MAX_BYTES + 1) as usize];
    let result = store
        .stage(&wav_upload(), byte_stream(vec![Ok(Bytes::from(oversized))]))
        .await;

    assert!(matches!(
        result,
        Err(ArtifactStoreError::PayloadTooLarge { .. })
    ));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn given_stream_error_when_staging_then_no_partial_file_remains() {
    let (dir, store) = create_test_store();

    let chunks: Vec<Result<Bytes, io::Error>> = vec![
        Ok(Bytes::from("partial")),
        Err(io::Error::new(
            io::ErrorKind::ConnectionReset,
            "network drop",
        )),
    ];
    let result = store.stage(&wav_upload(), byte_stream(chunks)).await;

    assert!(matches!(result, Err(ArtifactStoreError::Io(_))));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn given_staged_artifact_when_describing_then_returns_size() {
    let (_dir, store) = create_test_store();

    let artifact = store
        .stage(&wav_upload(), byte_stream(vec![Ok(Bytes::from("hello world"))]))
        .await
        .unwrap();

    let meta = store.describe(&artifact.name).await.unwrap();
    assert_eq!(meta.size_bytes, 11);
    assert_eq!(meta.name, artifact.name);
}

#[tokio::test]
async fn given_absent_artifact_when_describing_then_returns_not_found() {
    let (_dir, store) = create_test_store();
    let name = ArtifactName::parse("audio_file-1722950000000-42.wav").unwrap();

    let result = store.describe(&name).await;
    assert!(matches!(result, Err(ArtifactStoreError::NotFound(_))));
}

#[tokio::test]
async fn given_staged_artifact_when_opening_then_stream_yields_original_bytes() {
    let (_dir, store) = create_test_store();

    let content = b"streamable wav bytes";
    let artifact = store
        .stage(&wav_upload(), byte_stream(vec![Ok(Bytes::from(&content[..]))]))
        .await
        .unwrap();

    let mut stream = store.open(&artifact.name).await.unwrap();
    let mut collected = Vec::new();
    while let Some(chunk) = stream.next().await {
        collected.extend_from_slice(&chunk.unwrap());
    }

    assert_eq!(collected, content);
}

#[tokio::test]
async fn given_two_staged_artifacts_when_listing_then_both_are_enumerated() {
    let (_dir, store) = create_test_store();

    let first = store
        .stage(&wav_upload(), byte_stream(vec![Ok(Bytes::from("one"))]))
        .await
        .unwrap();
    let second = store
        .stage(&wav_upload(), byte_stream(vec![Ok(Bytes::from("two"))]))
        .await
        .unwrap();

    let listed = store.list().await.unwrap();
    let names: Vec<&str> = listed.iter().map(|m| m.name.as_str()).collect();

    assert_eq!(listed.len(), 2);
    assert!(names.contains(&first.name.as_str()));
    assert!(names.contains(&second.name.as_str()));
}

#[tokio::test]
async fn given_same_original_name_when_staging_twice_then_names_never_collide() {
    let (_dir, store) = create_test_store();

    let first = store
        .stage(&wav_upload(), byte_stream(vec![Ok(Bytes::from("one"))]))
        .await
        .unwrap();
    let second = store
        .stage(&wav_upload(), byte_stream(vec![Ok(Bytes::from("two"))]))
        .await
        .unwrap();

    assert_ne!(first.name, second.name);
    assert_eq!(store.fetch(&first.name).await.unwrap(), b"one");
    assert_eq!(store.fetch(&second.name).await.unwrap(), b"two");
}

#[tokio::test]
async fn given_staged_artifact_when_deleting_twice_then_second_delete_is_not_found() {
    let (_dir, store) = create_test_store();

    let artifact = store
        .stage(&wav_upload(), byte_stream(vec![Ok(Bytes::from("data"))]))
        .await
        .unwrap();

    store.delete(&artifact.name).await.unwrap();

    let result = store.delete(&artifact.name).await;
    assert!(matches!(result, Err(ArtifactStoreError::NotFound(_))));

    let result = store.fetch(&artifact.name).await;
    assert!(matches!(result, Err(ArtifactStoreError::NotFound(_))));
}
