// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::util::content_type::resolve_content_type;
use actix_web::web::Bytes;
use futures_util::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

// Partial uploads are written under this prefix and renamed on completion.
const PART_PREFIX: &str = ".part-";

// Only the head of the body is buffered for content-based type detection.
const DETECT_HEAD_LIMIT: usize = 8192;

#[derive(Debug)]
pub enum AssetStoreError {
    NotFound,
    Io(std::io::Error),
    Body(String),
    Metadata(String),
}

impl std::fmt::Display for AssetStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetStoreError::NotFound => write!(f, "asset not found"),
            AssetStoreError::Io(err) => write!(f, "asset I/O failed: {}", err),
            AssetStoreError::Body(msg) => write!(f, "asset body read failed: {}", msg),
            AssetStoreError::Metadata(msg) => write!(f, "asset metadata invalid: {}", msg),
        }
    }
}

impl std::error::Error for AssetStoreError {}

impl From<std::io::Error> for AssetStoreError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            AssetStoreError::NotFound
        } else {
            AssetStoreError::Io(err)
        }
    }
}

/// Sidecar metadata stored next to each object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetSidecar {
    pub content_type: String,
}

#[derive(Debug, Clone)]
pub struct StoredAsset {
    pub id: String,
    pub content_type: String,
}

/// An object opened for reading.
pub struct AssetObject {
    pub file: fs::File,
    pub size: u64,
    pub content_type: String,
}

/// Filesystem object store keyed by generated UUIDs. Objects are written
/// once and never updated; there is no delete operation.
pub struct AssetStore {
    root: PathBuf,
}

impl AssetStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Stream a request body into a fresh object. The body is written to a
    /// temp name and renamed into place, so readers never observe a partial
    /// object.
    pub async fn put<S, E>(
        &self,
        declared_type: Option<&str>,
        mut body: S,
    ) -> Result<StoredAsset, AssetStoreError>
    where
        S: Stream<Item = Result<Bytes, E>> + Unpin,
        E: std::fmt::Display,
    {
        let key = Uuid::new_v4().to_string();
        let part_path = self.root.join(format!("{}{}", PART_PREFIX, key));

        let mut file = fs::File::create(&part_path).await?;
        let mut head: Vec<u8> = Vec::new();

        let write_result: Result<(), AssetStoreError> = async {
            while let Some(chunk) = body.next().await {
                let chunk = chunk.map_err(|err| AssetStoreError::Body(err.to_string()))?;
                if head.len() < DETECT_HEAD_LIMIT {
                    let take = (DETECT_HEAD_LIMIT - head.len()).min(chunk.len());
                    head.extend_from_slice(&chunk[..take]);
                }
                file.write_all(&chunk).await?;
            }
            file.flush().await?;
            Ok(())
        }
        .await;

        if let Err(err) = write_result {
            drop(file);
            let _ = fs::remove_file(&part_path).await;
            return Err(err);
        }

        let content_type = resolve_content_type(declared_type, &head);
        let sidecar = AssetSidecar {
            content_type: content_type.clone(),
        };
        let encoded = ron::ser::to_string(&sidecar)
            .map_err(|err| AssetStoreError::Metadata(err.to_string()))?;
        fs::write(self.sidecar_path(&key), encoded).await?;
        fs::rename(&part_path, self.object_path(&key)).await?;

        Ok(StoredAsset {
            id: key,
            content_type,
        })
    }

    pub async fn open(&self, key: &str) -> Result<AssetObject, AssetStoreError> {
        // Keys are always generated UUIDs; anything else cannot exist.
        if Uuid::parse_str(key).is_err() {
            return Err(AssetStoreError::NotFound);
        }

        let sidecar_raw = fs::read_to_string(self.sidecar_path(key)).await?;
        let sidecar: AssetSidecar = ron::de::from_str(&sidecar_raw)
            .map_err(|err| AssetStoreError::Metadata(err.to_string()))?;

        let file = fs::File::open(self.object_path(key)).await?;
        let size = file.metadata().await?.len();

        Ok(AssetObject {
            file,
            size,
            content_type: sidecar.content_type,
        })
    }

    fn object_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    fn sidecar_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.meta", key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test_fixtures::TestFixtureRoot;
    use futures_util::stream;
    use std::convert::Infallible;
    use tokio::io::AsyncReadExt;

    fn body_of(chunks: Vec<&'static [u8]>) -> impl Stream<Item = Result<Bytes, Infallible>> + Unpin {
        stream::iter(
            chunks
                .into_iter()
                .map(|chunk| Ok(Bytes::from_static(chunk)))
                .collect::<Vec<_>>(),
        )
    }

    #[actix_web::test]
    async fn put_then_open_round_trips() {
        let fixture = TestFixtureRoot::new_unique("asset-store").expect("fixture");
        let store = AssetStore::new(fixture.path().to_path_buf());

        let stored = store
            .put(Some("text/plain"), body_of(vec![b"hello ", b"world"]))
            .await
            .expect("put");
        assert_eq!(stored.content_type, "text/plain");

        let mut object = store.open(&stored.id).await.expect("open");
        assert_eq!(object.size, 11);
        assert_eq!(object.content_type, "text/plain");

        let mut contents = Vec::new();
        object.file.read_to_end(&mut contents).await.expect("read");
        assert_eq!(contents, b"hello world");
    }

    #[actix_web::test]
    async fn put_detects_content_type_when_undeclared() {
        let fixture = TestFixtureRoot::new_unique("asset-store").expect("fixture");
        let store = AssetStore::new(fixture.path().to_path_buf());

        let png_header: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 0];
        let stored = store
            .put(None, body_of(vec![png_header]))
            .await
            .expect("put");
        assert_eq!(stored.content_type, "image/png");
    }

    #[actix_web::test]
    async fn open_unknown_key_is_not_found() {
        let fixture = TestFixtureRoot::new_unique("asset-store").expect("fixture");
        let store = AssetStore::new(fixture.path().to_path_buf());

        let missing = Uuid::new_v4().to_string();
        assert!(matches!(
            store.open(&missing).await,
            Err(AssetStoreError::NotFound)
        ));
    }

    #[actix_web::test]
    async fn open_rejects_non_uuid_keys() {
        let fixture = TestFixtureRoot::new_unique("asset-store").expect("fixture");
        let store = AssetStore::new(fixture.path().to_path_buf());

        assert!(matches!(
            store.open("../../etc/passwd").await,
            Err(AssetStoreError::NotFound)
        ));
    }
}
