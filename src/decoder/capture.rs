use std::fs;
use std::path::Path;
use byteorder::{ByteOrder, LittleEndian};
use log::debug;
use crate::error::ScopeError;
/// Load a whole capture file as little-endian signed 16-bit samples.
pub fn read_capture(path: impl AsRef<Path>) -> Result<Vec<i16>, ScopeError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(ScopeError::InputNotFound {
            path: path.to_path_buf(),
        });
    }
    let bytes = fs::read(path)?;
    debug!("read {} bytes from {}", bytes.len(), path.display());
    Ok(samples_from_le_bytes(&bytes))
}
/// Reinterpret a byte buffer as samples; a trailing odd byte is dropped.
pub fn samples_from_le_bytes(bytes: &[u8]) -> Vec<i16> {
    let count = bytes.len() / 2;
    let mut samples = vec![0i16; count];
    LittleEndian::read_i16_into(&bytes[..count * 2], &mut samples);
    samples
}
