use anyhow::Result;
use bytes::{Bytes, BytesMut};
use tracing::{debug, info};

use common::codec;
use common::store::Store;
use common::task::Task;
use common::{partition, KeyValue, MapFn, Workload};

/// Run one map task: read the input, apply the map function and write one
/// shard per non-empty bucket.
///
/// Any error abandons the task. Nothing is reported and the coordinator
/// re-offers it after the lease expires.
pub async fn perform_map<S: Store + ?Sized>(
    task: &Task,
    workload: &Workload,
    aux: Bytes,
    store: &S,
) -> Result<()> {
    info!("Received map task {} with input `{}`", task.id, task.input);

    let content = store.read_input(&task.input).await?;
    let input = KeyValue::new(Bytes::from(task.input.clone()), content);
    let buckets = partition_output(workload.map_fn, input, aux, task.n_reduce)?;

    for (bucket, records) in buckets.into_iter().enumerate() {
        if records.is_empty() {
            continue;
        }
        debug!("map task {} writing {} bytes to bucket {}", task.id, records.len(), bucket);
        store
            .write_shard(task.id, bucket as u32, records.freeze())
            .await?;
    }

    Ok(())
}

/// Apply `map_fn` and route every emitted pair into its bucket, already
/// encoded as shard lines.
fn partition_output(
    map_fn: MapFn,
    input: KeyValue,
    aux: Bytes,
    n_reduce: u32,
) -> Result<Vec<BytesMut>> {
    let mut buckets = vec![BytesMut::new(); n_reduce as usize];

    for kv in map_fn(input, aux)? {
        let kv = kv?;
        codec::check_record(&kv)?;
        let bucket = partition(&kv.key, n_reduce) as usize;
        codec::encode_record(&mut buckets[bucket], &kv.key, &kv.value);
    }

    Ok(buckets)
}
