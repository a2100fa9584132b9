use serde::{Deserialize, Serialize};

/// Day index within the scheduling horizon.
pub type Day = usize;
/// Seat index within a train.
pub type Seat = usize;
/// Segment index: the stretch of track between station `g` and `g + 1`.
pub type Segment = usize;
/// Station index.
pub type Station = usize;
/// Worker (partition owner) index.
pub type WorkerId = usize;

/// Half-open segment range `[src, dst)` covered by a trip between two stations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Trip {
    pub src: Station,
    pub dst: Station,
}

impl Trip {
    pub fn new(src: Station, dst: Station) -> Self {
        debug_assert!(src < dst, "Trip src must be before dst");
        Self { src, dst }
    }
}

/// A desired trip on one day. Requests are plain values: once built they are
/// only ever classified, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Request {
    pub day: Day,
    pub trip: Trip,
}

impl Request {
    pub fn new(day: Day, src: Station, dst: Station) -> Self {
        Self {
            day,
            trip: Trip::new(src, dst),
        }
    }
}

/// Terminal (or intermediate) classification of a request.
///
/// `Pending → {Confirmed | Waitlisted}` during the live phase, then
/// `Waitlisted → {ClearedByOwner | StillUnresolved}` during the distributed phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Confirmed { seat: Seat },
    Waitlisted,
    ClearedByOwner { worker: WorkerId, seat: Seat },
    StillUnresolved { worker: WorkerId },
}
