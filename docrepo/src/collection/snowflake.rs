use log::{info, warn};
use parking_lot::Mutex;
use rand::rngs::OsRng;
use rand::Rng;
use std::time::{SystemTime, UNIX_EPOCH};

const NODE_ID_BITS: u64 = 10;
const SEQUENCE_BITS: u64 = 12;
const EPOCH: u64 = 1288834974657;

struct GeneratorState {
    last_timestamp: u64,
    sequence: u64,
}

/// Generates time ordered 63-bit identifiers.
///
/// Layout: 41 bits of milliseconds since [`EPOCH`], 10 bits of node id and
/// 12 bits of per-millisecond sequence. Identifiers from one generator are
/// strictly increasing.
pub(crate) struct SnowflakeIdGenerator {
    node_id: u64,
    sequence_mask: u64,
    timestamp_left_shift: u64,
    state: Mutex<GeneratorState>,
}

fn current_time_millis() -> u64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(duration) => duration.as_millis() as u64,
        Err(err) => {
            warn!("System clock is before unix epoch: {}", err);
            0
        }
    }
}

impl SnowflakeIdGenerator {
    pub(crate) fn new() -> Self {
        let max_node_id = (1u64 << NODE_ID_BITS) - 1;
        let mut node_id = Self::generate_node_id();
        if node_id > max_node_id {
            warn!("Node id can't be greater than {}", max_node_id);
            node_id = OsRng.gen_range(1..=max_node_id);
        }
        info!("Initialized id generator with node id: {}", node_id);

        SnowflakeIdGenerator {
            node_id,
            sequence_mask: (1u64 << SEQUENCE_BITS) - 1,
            timestamp_left_shift: SEQUENCE_BITS + NODE_ID_BITS,
            state: Mutex::new(GeneratorState {
                last_timestamp: 0,
                sequence: 0,
            }),
        }
    }

    pub(crate) fn get_id(&self) -> u64 {
        let mut state = self.state.lock();
        let mut timestamp = current_time_millis().max(EPOCH);

        // clock moved backwards, keep issuing ids from the last timestamp
        if timestamp < state.last_timestamp {
            timestamp = state.last_timestamp;
        }

        if timestamp == state.last_timestamp {
            state.sequence = (state.sequence + 1) & self.sequence_mask;
            if state.sequence == 0 {
                timestamp += 1;
            }
        } else {
            state.sequence = 0;
        }

        state.last_timestamp = timestamp;

        ((timestamp - EPOCH) << self.timestamp_left_shift)
            | (self.node_id << SEQUENCE_BITS)
            | state.sequence
    }

    fn generate_node_id() -> u64 {
        let uuid = uuid::Uuid::new_v4();
        let uid = uuid.as_bytes();
        let rnd_byte = OsRng.gen::<u64>() & 0x000000FF;

        ((0x000000FF & uid[uid.len() - 1] as u64) | (0x0000FF00 & (rnd_byte << 8))) >> 6
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_unique_ids() {
        let generator = SnowflakeIdGenerator::new();
        let mut ids = Vec::new();
        for _ in 0..10_000 {
            ids.push(generator.get_id());
        }

        let mut unique_ids = ids.clone();
        unique_ids.sort();
        unique_ids.dedup();
        assert_eq!(ids.len(), unique_ids.len());
    }

    #[test]
    fn generates_increasing_ids() {
        let generator = SnowflakeIdGenerator::new();
        let mut last = generator.get_id();
        for _ in 0..5_000 {
            let next = generator.get_id();
            assert!(next > last);
            last = next;
        }
    }

    #[test]
    fn handles_clock_backwards() {
        let generator = SnowflakeIdGenerator::new();
        generator.state.lock().last_timestamp = current_time_millis() + 1000;
        let first = generator.get_id();
        let second = generator.get_id();
        assert!(second > first);
    }

    #[test]
    fn generates_id_with_correct_node_id() {
        let generator = SnowflakeIdGenerator::new();
        let id = generator.get_id();
        let node_id = (id >> SEQUENCE_BITS) & ((1 << NODE_ID_BITS) - 1);
        assert_eq!(node_id, generator.node_id);
    }
}
