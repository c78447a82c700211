//! Word count. Emits `(word, 1)` for every maximal run of letters.

use anyhow::Result;
use bytes::Bytes;

use common::utils::string_from_bytes;
use common::{KeyValue, MapOutput, Workload};

pub const WORKLOAD: Workload = Workload {
    map_fn: map,
    reduce_fn: reduce,
};

pub fn map(kv: KeyValue, _aux: Bytes) -> MapOutput {
    let content = String::from_utf8_lossy(&kv.value);
    let words: Vec<String> = content
        .split(|c: char| !c.is_alphabetic())
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect();

    let iter = words
        .into_iter()
        .map(|word| anyhow::Ok(KeyValue::new(word, Bytes::from_static(b"1"))));
    Ok(Box::new(iter))
}

pub fn reduce(
    _key: Bytes,
    values: Box<dyn Iterator<Item = Bytes> + '_>,
    _aux: Bytes,
) -> Result<Bytes> {
    let mut count = 0u64;
    for value in values {
        count += string_from_bytes(value)?.parse::<u64>()?;
    }
    Ok(Bytes::from(count.to_string()))
}
