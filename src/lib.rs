pub use anyhow::Result;
pub use fnv::{FnvHashMap as Map, FnvHashSet as Set};

pub mod graph;
pub mod instance;
pub mod logging;
pub mod matching;
pub mod solution;

/// A dispatchable emergency vehicle, as a dense index in `0..num_vehicles`.
pub type Vehicle = usize;
/// An incident location awaiting a vehicle, as a dense index in `0..num_locations`.
pub type Location = usize;
/// Response times and the acceptable-response limit, in whole time units.
pub type Time = u32;

pub fn map_with_capacity<K, V>(capacity: usize) -> Map<K, V> {
  Map::with_capacity_and_hasher(capacity, Default::default())
}
