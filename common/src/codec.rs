//! Line codec for shard and output artifacts.
//!
//! Each record is `<key> <value>\n`. There is no escaping, so keys must not
//! contain spaces or newlines and values must not contain newlines.

use anyhow::{anyhow, Result};
use bytes::{BufMut, Bytes, BytesMut};

use crate::KeyValue;

/// Reject pairs that would not survive a round trip through a line.
pub fn check_record(kv: &KeyValue) -> Result<()> {
    if kv.key.iter().any(|byte| *byte == b' ' || *byte == b'\n') {
        return Err(anyhow!(
            "key `{}` contains a space or newline",
            String::from_utf8_lossy(&kv.key)
        ));
    }
    if kv.value.contains(&b'\n') {
        return Err(anyhow!(
            "value for key `{}` contains a newline",
            String::from_utf8_lossy(&kv.key)
        ));
    }
    Ok(())
}

/// Append one record to `buf`.
pub fn encode_record(buf: &mut BytesMut, key: &[u8], value: &[u8]) {
    buf.reserve(key.len() + value.len() + 2);
    buf.put_slice(key);
    buf.put_u8(b' ');
    buf.put_slice(value);
    buf.put_u8(b'\n');
}

/// Encode a batch of pairs into one artifact body.
pub fn encode_records<'a>(records: impl IntoIterator<Item = &'a KeyValue>) -> Bytes {
    let mut buf = BytesMut::new();
    for kv in records {
        encode_record(&mut buf, &kv.key, &kv.value);
    }
    buf.freeze()
}

/// Decode an artifact body back into pairs. Blank lines are skipped.
pub fn decode_records(content: &Bytes) -> Result<Vec<KeyValue>> {
    let mut records = Vec::new();
    let mut start = 0;

    for line in content.split(|byte| *byte == b'\n') {
        let end = start + line.len();
        let line_bytes = content.slice(start..end);
        start = end + 1;

        if line.is_empty() {
            continue;
        }

        let space = line
            .iter()
            .position(|byte| *byte == b' ')
            .ok_or_else(|| anyhow!("malformed record `{}`", String::from_utf8_lossy(line)))?;

        records.push(KeyValue {
            key: line_bytes.slice(..space),
            value: line_bytes.slice(space + 1..),
        });
    }

    Ok(records)
}
