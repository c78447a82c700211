use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use bytes::Bytes;

use common::store::Store;
use common::task::TaskId;

#[derive(Debug, Default)]
struct Inner {
    inputs: HashMap<String, Bytes>,
    shards: HashMap<(TaskId, u32), Bytes>,
    outputs: HashMap<TaskId, Bytes>,
    shard_reads: Vec<(TaskId, u32)>,
}

/// In-memory [`Store`] that records which shards were asked for.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn with_inputs<'a, C>(inputs: impl IntoIterator<Item = (&'a str, C)>) -> Self
    where
        C: Into<Bytes>,
    {
        let store = MemoryStore::default();
        {
            let mut inner = store.inner.lock().unwrap();
            for (name, content) in inputs {
                inner
                    .inputs
                    .insert(name.to_string(), content.into());
            }
        }
        store
    }

    pub fn insert_shard(&self, map_id: TaskId, bucket: u32, content: &str) {
        self.inner
            .lock()
            .unwrap()
            .shards
            .insert((map_id, bucket), Bytes::from(content.to_string()));
    }

    pub fn shard(&self, map_id: TaskId, bucket: u32) -> Option<String> {
        let inner = self.inner.lock().unwrap();
        let shard = inner.shards.get(&(map_id, bucket))?;
        Some(String::from_utf8_lossy(shard).into_owned())
    }

    pub fn shard_count(&self) -> usize {
        self.inner.lock().unwrap().shards.len()
    }

    pub fn output(&self, reduce_id: TaskId) -> Option<String> {
        let inner = self.inner.lock().unwrap();
        let output = inner.outputs.get(&reduce_id)?;
        Some(String::from_utf8_lossy(output).into_owned())
    }

    pub fn shard_reads(&self) -> Vec<(TaskId, u32)> {
        self.inner.lock().unwrap().shard_reads.clone()
    }
}

#[tonic::async_trait]
impl Store for MemoryStore {
    async fn read_input(&self, reference: &str) -> Result<Bytes> {
        self.inner
            .lock()
            .unwrap()
            .inputs
            .get(reference)
            .cloned()
            .ok_or_else(|| anyhow!("no such input {reference}"))
    }

    async fn write_shard(&self, map_id: TaskId, bucket: u32, content: Bytes) -> Result<()> {
        self.inner
            .lock()
            .unwrap()
            .shards
            .insert((map_id, bucket), content);
        Ok(())
    }

    async fn read_shard(&self, map_id: TaskId, bucket: u32) -> Result<Option<Bytes>> {
        let mut inner = self.inner.lock().unwrap();
        inner.shard_reads.push((map_id, bucket));
        Ok(inner.shards.get(&(map_id, bucket)).cloned())
    }

    async fn write_output(&self, reduce_id: TaskId, content: Bytes) -> Result<()> {
        self.inner.lock().unwrap().outputs.insert(reduce_id, content);
        Ok(())
    }
}
