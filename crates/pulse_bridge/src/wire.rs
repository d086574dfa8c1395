//! Wire format for the actuator bridge.
//!
//! One datagram per tick, payload = 4 bytes: a single IEEE-754
//! single-precision float, little-endian. No header, no framing, no
//! sequence number. The receiver treats each datagram as the latest
//! authoritative intensity; out-of-order or dropped datagrams are fine
//! because the signal self-corrects on the next tick.

use thiserror::Error;

/// Exact payload size of every datagram.
pub const PAYLOAD_LEN: usize = 4;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WireError {
    #[error("payload must be {PAYLOAD_LEN} bytes, got {0}")]
    BadLength(usize),
}

/// Encode an intensity value as the wire payload.
pub fn encode(value: f32) -> [u8; PAYLOAD_LEN] {
    value.to_le_bytes()
}

/// Decode a received payload. Fails only on a wrong payload size.
pub fn decode(payload: &[u8]) -> Result<f32, WireError> {
    let bytes: [u8; PAYLOAD_LEN] = payload
        .try_into()
        .map_err(|_| WireError::BadLength(payload.len()))?;
    Ok(f32::from_le_bytes(bytes))
}
