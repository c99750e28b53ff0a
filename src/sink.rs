use std::path::Path;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("error creating file: {0}")]
    Create(#[source] std::io::Error),
    #[error("error reading response body: {0}")]
    Read(#[from] reqwest::Error),
    #[error("error while copying data: {0}")]
    Copy(#[source] std::io::Error),
    /// The copy succeeded but closing the file did not. Carries the byte
    /// count already on disk so the caller can still report it.
    #[error("error closing the file after {bytes} bytes: {source}")]
    Close {
        bytes: u64,
        #[source]
        source: std::io::Error,
    },
}

/// Copies a response body stream into `path`, creating or truncating the
/// file. The file is flushed and shut down before success is reported;
/// every exit path leaves it closed.
pub async fn write_stream<S>(mut stream: S, path: &Path) -> Result<u64, SinkError>
where
    S: Stream<Item = reqwest::Result<Bytes>> + Unpin,
{
    let mut file = File::create(path).await.map_err(SinkError::Create)?;

    let mut written: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        file.write_all(&bytes).await.map_err(SinkError::Copy)?;
        written += bytes.len() as u64;
    }

    file.shutdown()
        .await
        .map_err(|source| SinkError::Close {
            bytes: written,
            source,
        })?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    fn chunks(parts: &[&str]) -> impl Stream<Item = reqwest::Result<Bytes>> + Unpin {
        let items: Vec<reqwest::Result<Bytes>> = parts
            .iter()
            .map(|p| Ok(Bytes::copy_from_slice(p.as_bytes())))
            .collect();
        stream::iter(items)
    }

    #[tokio::test]
    async fn writes_all_chunks_and_counts_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.txt");

        let written = write_stream(chunks(&["hel", "lo"]), &path).await.unwrap();

        assert_eq!(written, 5);
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"hello");
    }

    #[tokio::test]
    async fn empty_body_yields_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.bin");

        let written = write_stream(chunks(&[]), &path).await.unwrap();

        assert_eq!(written, 0);
        assert!(path.exists());
    }

    #[tokio::test]
    async fn missing_parent_directory_is_a_create_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("file.txt");

        let err = write_stream(chunks(&["x"]), &path).await.unwrap_err();

        assert!(matches!(err, SinkError::Create(_)));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn truncates_an_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.txt");
        tokio::fs::write(&path, "previous longer contents")
            .await
            .unwrap();

        let written = write_stream(chunks(&["new"]), &path).await.unwrap();

        assert_eq!(written, 3);
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"new");
    }
}
