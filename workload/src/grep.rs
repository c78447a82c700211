//! Distributed grep.
//!
//! The first auxiliary argument is a substring pattern. Every matching line
//! is emitted under `<input>:<line number>`, so the output is sorted by
//! input and position.

use anyhow::{anyhow, Result};
use bytes::Bytes;

use common::utils::string_from_bytes;
use common::{KeyValue, MapOutput, Workload};

pub const WORKLOAD: Workload = Workload {
    map_fn: map,
    reduce_fn: reduce,
};

pub fn map(kv: KeyValue, aux: Bytes) -> MapOutput {
    let aux = string_from_bytes(aux)?;
    let pattern = aux
        .split_whitespace()
        .next()
        .ok_or_else(|| anyhow!("grep needs a pattern argument"))?
        .to_string();

    let name = String::from_utf8_lossy(&kv.key).replace(' ', "_");
    let content = String::from_utf8_lossy(&kv.value);

    let matches: Vec<KeyValue> = content
        .lines()
        .enumerate()
        .filter(|(_, line)| line.contains(&pattern))
        .map(|(index, line)| KeyValue::new(format!("{}:{}", name, index + 1), line.to_string()))
        .collect();

    Ok(Box::new(matches.into_iter().map(anyhow::Ok)))
}

/// Keys are unique per line, duplicates only appear when a map task ran twice.
pub fn reduce(
    key: Bytes,
    mut values: Box<dyn Iterator<Item = Bytes> + '_>,
    _aux: Bytes,
) -> Result<Bytes> {
    values
        .next()
        .ok_or_else(|| anyhow!("no values for key {}", String::from_utf8_lossy(&key)))
}
