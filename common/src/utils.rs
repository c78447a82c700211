use anyhow::Result;
use bytes::Bytes;

/// Interpret bytes as UTF-8, failing on invalid input.
pub fn string_from_bytes(bytes: Bytes) -> Result<String> {
    Ok(String::from_utf8(bytes.to_vec())?)
}

/// Joins auxiliary arguments into the single buffer handed to workloads.
pub fn aux_bytes(aux: &[String]) -> Bytes {
    Bytes::from(aux.join(" "))
}
