//! Naming and access convention for job artifacts.
//!
//! Intermediate shards are named `<map task id>-<bucket>` and final outputs
//! `out-<reduce task id>`, all under one directory shared by every worker.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bytes::Bytes;
use tracing::debug;

use crate::task::TaskId;

/// File name of the shard written by map task `map_id` for `bucket`.
pub fn shard_name(map_id: TaskId, bucket: u32) -> String {
    format!("{map_id}-{bucket}")
}

/// File name of the output written by reduce task `reduce_id`.
pub fn output_name(reduce_id: TaskId) -> String {
    format!("out-{reduce_id}")
}

/// Storage used by task executors.
#[tonic::async_trait]
pub trait Store: Send + Sync {
    /// Full content of a map input.
    async fn read_input(&self, reference: &str) -> Result<Bytes>;

    async fn write_shard(&self, map_id: TaskId, bucket: u32, content: Bytes) -> Result<()>;

    /// Returns `None` when the map task produced nothing for this bucket.
    async fn read_shard(&self, map_id: TaskId, bucket: u32) -> Result<Option<Bytes>>;

    async fn write_output(&self, reduce_id: TaskId, content: Bytes) -> Result<()>;
}

/// [`Store`] backed by a local or shared directory.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn shard_path(&self, map_id: TaskId, bucket: u32) -> PathBuf {
        self.root.join(shard_name(map_id, bucket))
    }

    pub fn output_path(&self, reduce_id: TaskId) -> PathBuf {
        self.root.join(output_name(reduce_id))
    }

    /// Write through a temporary file and rename it over `target`.
    ///
    /// Two workers racing on the same task each produce a whole file and the
    /// last rename wins.
    async fn write_atomic(&self, target: &Path, content: Bytes) -> Result<()> {
        let file_name = target
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let temp = self
            .root
            .join(format!(".{file_name}.{:08x}.tmp", rand::random::<u32>()));

        tokio::fs::write(&temp, &content)
            .await
            .with_context(|| format!("failed writing {}", temp.display()))?;

        if let Err(e) = tokio::fs::rename(&temp, target).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e).with_context(|| format!("failed renaming into {}", target.display()));
        }

        debug!("wrote {} bytes to {}", content.len(), target.display());
        Ok(())
    }
}

#[tonic::async_trait]
impl Store for LocalStore {
    async fn read_input(&self, reference: &str) -> Result<Bytes> {
        let content = tokio::fs::read(reference)
            .await
            .with_context(|| format!("failed reading input {reference}"))?;
        Ok(Bytes::from(content))
    }

    async fn write_shard(&self, map_id: TaskId, bucket: u32, content: Bytes) -> Result<()> {
        self.write_atomic(&self.shard_path(map_id, bucket), content)
            .await
    }

    async fn read_shard(&self, map_id: TaskId, bucket: u32) -> Result<Option<Bytes>> {
        let path = self.shard_path(map_id, bucket);
        match tokio::fs::read(&path).await {
            Ok(content) => Ok(Some(Bytes::from(content))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("failed reading shard {}", path.display())),
        }
    }

    async fn write_output(&self, reduce_id: TaskId, content: Bytes) -> Result<()> {
        self.write_atomic(&self.output_path(reduce_id), content)
            .await
    }
}
