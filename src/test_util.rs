//! Shared test helpers for building record streams and in-memory containers.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::library::Container;

/// Frame a property list the way Altium writes it: length prefix with kind
/// `0`, the body, then a NUL terminator counted in the length.
pub fn properties_frame(body: &[u8]) -> Vec<u8> {
    let length = (body.len() + 1) as u32;
    let mut out = length.to_le_bytes().to_vec();
    out.extend_from_slice(body);
    out.push(0);
    out
}

/// Frame an opaque binary record with kind `1`.
pub fn binary_frame(body: &[u8]) -> Vec<u8> {
    let length = body.len() as u32 | (1 << 24);
    let mut out = length.to_le_bytes().to_vec();
    out.extend_from_slice(body);
    out
}

/// Concatenate several property lists into one stream.
pub fn properties_stream(records: &[&[u8]]) -> Vec<u8> {
    records.iter().flat_map(|r| properties_frame(r)).collect()
}

/// A container backed by a map of `/`-joined paths to stream contents.
#[derive(Debug, Default)]
pub struct MemoryContainer {
    pub streams: HashMap<String, Vec<u8>>,
}

impl MemoryContainer {
    pub fn insert(&mut self, path: &str, data: Vec<u8>) {
        self.streams.insert(path.to_string(), data);
    }
}

impl Container for MemoryContainer {
    fn read_stream(&mut self, path: &[&str]) -> Result<Vec<u8>> {
        let key = path.join("/");
        self.streams
            .get(&key)
            .cloned()
            .ok_or(Error::StreamNotFound(key))
    }
}
