use anyhow::Result;
use bytes::{Bytes, BytesMut};
use itertools::Itertools;
use tracing::{debug, info};

use common::codec;
use common::store::Store;
use common::task::{Task, TaskId};
use common::{KeyValue, ReduceFn, Workload};

/// Run one reduce task: gather this bucket's shard from every map task,
/// group by key and write one output line per distinct key.
///
/// A missing shard means the map task emitted nothing for this bucket and
/// is skipped.
pub async fn perform_reduce<S: Store + ?Sized>(
    task: &Task,
    workload: &Workload,
    aux: Bytes,
    store: &S,
) -> Result<()> {
    let bucket = u32::try_from(task.id)?;
    info!("Received reduce task {} over {} map outputs", task.id, task.n_map);

    let mut records = vec![];
    for map_id in 0..task.n_map as TaskId {
        match store.read_shard(map_id, bucket).await? {
            Some(content) => records.extend(codec::decode_records(&content)?),
            None => debug!("no shard from map task {} for bucket {}", map_id, bucket),
        }
    }

    let output = reduce_records(records, workload.reduce_fn, aux)?;
    store.write_output(task.id, output).await
}

/// Sort by key, then call `reduce_fn` once per run of equal keys.
fn reduce_records(mut records: Vec<KeyValue>, reduce_fn: ReduceFn, aux: Bytes) -> Result<Bytes> {
    records.sort_by(|a, b| a.key.cmp(&b.key));

    let mut output = BytesMut::new();
    let groups = records.into_iter().chunk_by(|kv| kv.key());

    for (key, group) in &groups {
        let values = group.map(KeyValue::into_value);
        let value = reduce_fn(key.clone(), Box::new(values), aux.clone())?;

        let line = KeyValue::new(key, value);
        codec::check_record(&line)?;
        codec::encode_record(&mut output, &line.key, &line.value);
    }

    Ok(output.freeze())
}
