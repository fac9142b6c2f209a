//! Snowflake-style identifier source
//!
//! Default [`SequenceSource`] implementation: 64-bit identifiers composed
//! of a millisecond timestamp, a node id, and a per-millisecond counter,
//! rendered as decimal strings. Roughly time-ordered and collision-free
//! across nodes with distinct ids.

use std::sync::Mutex;

use chrono::Utc;
use hermes_ports::SequenceSource;

/// Custom epoch: 2020-01-01T00:00:00Z
const EPOCH_MILLIS: i64 = 1_577_836_800_000;
const NODE_BITS: u8 = 10;
const SEQUENCE_BITS: u8 = 12;
const SEQUENCE_MASK: u64 = (1 << SEQUENCE_BITS) - 1;
const MAX_NODE_ID: u16 = (1 << NODE_BITS) - 1;

#[derive(Debug, Default)]
struct SnowflakeState {
    last_millis: i64,
    sequence: u64,
}

/// Snowflake-style sequence source
pub struct SnowflakeSequence {
    node_id: u64,
    state: Mutex<SnowflakeState>,
}

impl SnowflakeSequence {
    /// Create a source for the given node id (wrapped into range)
    pub fn new(node_id: u16) -> Self {
        Self {
            node_id: u64::from(node_id & MAX_NODE_ID),
            state: Mutex::new(SnowflakeState::default()),
        }
    }
}

impl SequenceSource for SnowflakeSequence {
    fn next_id(&self) -> String {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        // Never move backwards, even if the wall clock does
        let now = Utc::now().timestamp_millis().max(state.last_millis);

        if now == state.last_millis {
            state.sequence = (state.sequence + 1) & SEQUENCE_MASK;
            if state.sequence == 0 {
                // Counter exhausted within this millisecond; borrow the next
                state.last_millis += 1;
            }
        } else {
            state.last_millis = now;
            state.sequence = 0;
        }

        let id = (((state.last_millis - EPOCH_MILLIS) as u64) << (NODE_BITS + SEQUENCE_BITS))
            | (self.node_id << SEQUENCE_BITS)
            | state.sequence;
        id.to_string()
    }
}
