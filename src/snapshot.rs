use std::io::{self, Write};

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::engine::EngineError;
use crate::grid::OccupancyGrid;
use crate::limits::MAX_FRAME_BYTES;
use crate::model::Request;

/// Everything a worker starts the distributed phase from: the grid after
/// cancellations and the full waitlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub grid: OccupancyGrid,
    pub waitlist: Vec<Request>,
}

const HEADER_LEN: usize = 4;
const TRAILER_LEN: usize = 4;

/// Encode a snapshot to `[len][bincode][crc32]`.
fn write_frame(writer: &mut impl Write, snapshot: &Snapshot) -> io::Result<()> {
    let payload =
        bincode::serialize(snapshot).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    if payload.len() > MAX_FRAME_BYTES {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "snapshot too large"));
    }
    let len = payload.len() as u32;
    let crc = crc32fast::hash(&payload);
    writer.write_all(&len.to_le_bytes())?;
    writer.write_all(&payload)?;
    writer.write_all(&crc.to_le_bytes())?;
    Ok(())
}

/// Serialize a snapshot into one immutable frame.
///
/// Format: `[u32 LE: len][bincode: Snapshot][u32 LE: crc32 of payload]`.
/// The frame is built once and shared by every worker, so all replicas decode
/// from the same bytes.
pub fn encode(snapshot: &Snapshot) -> Result<Bytes, EngineError> {
    let mut buf = Vec::with_capacity(HEADER_LEN + snapshot.grid.dims().cell_count() + TRAILER_LEN + 64);
    write_frame(&mut buf, snapshot).map_err(|e| EngineError::Codec(e.to_string()))?;
    Ok(Bytes::from(buf))
}

/// Decode and verify a frame produced by [`encode`].
pub fn decode(frame: &[u8]) -> Result<Snapshot, EngineError> {
    let payload = payload(frame)?;
    let stored_crc = stored_checksum(frame)?;
    let computed_crc = crc32fast::hash(payload);
    if stored_crc != computed_crc {
        return Err(EngineError::ChecksumMismatch {
            expected: stored_crc,
            found: computed_crc,
        });
    }
    let snapshot: Snapshot =
        bincode::deserialize(payload).map_err(|e| EngineError::Codec(e.to_string()))?;
    snapshot.grid.check_shape()?;
    Ok(snapshot)
}

/// The CRC recorded in a frame's trailer.
pub fn stored_checksum(frame: &[u8]) -> Result<u32, EngineError> {
    let len = payload(frame)?.len();
    let start = HEADER_LEN + len;
    let mut crc_buf = [0u8; TRAILER_LEN];
    crc_buf.copy_from_slice(&frame[start..start + TRAILER_LEN]);
    Ok(u32::from_le_bytes(crc_buf))
}

fn payload(frame: &[u8]) -> Result<&[u8], EngineError> {
    if frame.len() < HEADER_LEN {
        return Err(EngineError::Codec("truncated frame header".into()));
    }
    let mut len_buf = [0u8; HEADER_LEN];
    len_buf.copy_from_slice(&frame[..HEADER_LEN]);
    let len = u32::from_le_bytes(len_buf) as usize;
    if len > MAX_FRAME_BYTES {
        return Err(EngineError::LimitExceeded("snapshot frame too large"));
    }
    if frame.len() != HEADER_LEN + len + TRAILER_LEN {
        return Err(EngineError::Codec(format!(
            "frame length {} does not match header ({} payload bytes)",
            frame.len(),
            len
        )));
    }
    Ok(&frame[HEADER_LEN..HEADER_LEN + len])
}
