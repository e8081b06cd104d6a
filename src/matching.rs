use crate::{Location, Vehicle};
use smallvec::SmallVec;
use std::collections::VecDeque;
use tracing::{debug, trace};

type AdjList = SmallVec<[Location; 8]>;

/// Maximum-cardinality bipartite matching between vehicles and locations,
/// computed with Hopcroft-Karp in `O(E sqrt(V))`.
///
/// Both sides are dense 0-based indices.  All edges must be added before
/// [`solve`](Self::solve) runs; the match state is read back through the
/// accessors afterwards.  For a fixed edge-insertion order the resulting
/// assignment is reproducible, though ties between optimal matchings are not
/// broken canonically.
#[derive(Debug, Clone)]
pub struct HopcroftKarp {
  num_vehicles: usize,
  num_locations: usize,
  adjacent: Vec<AdjList>,
  matched_location: Vec<Option<Location>>,
  matched_vehicle: Vec<Option<Vehicle>>,
  /// Alternating-path BFS layer per vehicle, `None` = unreached.  Only
  /// meaningful within a single layering + augmentation round.
  layer: Vec<Option<u32>>,
  /// Layer at which the nearest unmatched location was discovered this
  /// round; `None` until the layering phase finds one.
  free_layer: Option<u32>,
}

impl HopcroftKarp {
  pub fn new(num_vehicles: usize, num_locations: usize) -> Self {
    HopcroftKarp {
      num_vehicles,
      num_locations,
      adjacent: vec![AdjList::new(); num_vehicles],
      matched_location: vec![None; num_vehicles],
      matched_vehicle: vec![None; num_locations],
      layer: vec![None; num_vehicles],
      free_layer: None,
    }
  }

  /// Declares `location` reachable from `vehicle`.  Duplicate edges are
  /// harmless but waste work.
  pub fn add_edge(&mut self, vehicle: Vehicle, location: Location) {
    debug_assert!(vehicle < self.num_vehicles);
    debug_assert!(location < self.num_locations);
    self.adjacent[vehicle].push(location);
  }

  /// Alternates layering and augmentation phases until no augmenting path
  /// remains, then returns the matching cardinality.
  #[tracing::instrument(level = "debug", skip(self), fields(num_vehicles = self.num_vehicles, num_locations = self.num_locations))]
  pub fn solve(&mut self) -> usize {
    let mut matching = 0;
    let mut round = 0;

    while self.layer_frontier() {
      round += 1;
      let at_round_start = matching;

      for vehicle in 0..self.num_vehicles {
        if self.matched_location[vehicle].is_none() && self.augment(vehicle) {
          matching += 1;
        }
      }

      debug_assert!(matching > at_round_start);
      debug!(round, found = matching - at_round_start, matching, "augmentation round");
    }

    debug!(matching, "matching complete");
    matching
  }

  /// Multi-source BFS from the unmatched vehicles, labelling every vehicle
  /// with its distance in alternating-path steps.  Exploration stops at the
  /// depth of the nearest unmatched location, so only shortest augmenting
  /// paths survive into the augmentation phase.  Returns whether any
  /// augmenting path exists this round.
  fn layer_frontier(&mut self) -> bool {
    let mut frontier = VecDeque::with_capacity(self.num_vehicles);
    for vehicle in 0..self.num_vehicles {
      self.layer[vehicle] = match self.matched_location[vehicle] {
        None => {
          frontier.push_back(vehicle);
          Some(0)
        }
        Some(_) => None,
      };
    }
    self.free_layer = None;

    while let Some(vehicle) = frontier.pop_front() {
      let depth = self.layer[vehicle].unwrap();
      if self.free_layer.map_or(false, |free| depth >= free) {
        continue;
      }

      for &location in &self.adjacent[vehicle] {
        match self.matched_vehicle[location] {
          None => {
            if self.free_layer.is_none() {
              self.free_layer = Some(depth + 1);
            }
          }
          Some(next) => {
            if self.layer[next].is_none() {
              self.layer[next] = Some(depth + 1);
              frontier.push_back(next);
            }
          }
        }
      }
    }

    trace!(free_layer = ?self.free_layer, "layering done");
    self.free_layer.is_some()
  }

  /// Attempts to flip one shortest augmenting path rooted at an unmatched
  /// vehicle.  Each stack frame is a vehicle plus a cursor into its
  /// adjacency list, so a failed branch resumes at the next candidate edge.
  /// A vehicle whose candidates are exhausted has its layer cleared and is
  /// never retried within the round.
  fn augment(&mut self, root: Vehicle) -> bool {
    let mut stack: Vec<(Vehicle, usize)> = vec![(root, 0)];

    while let Some(&(vehicle, cursor)) = stack.last() {
      if cursor == self.adjacent[vehicle].len() {
        self.layer[vehicle] = None;
        stack.pop();
        if let Some(parent) = stack.last_mut() {
          parent.1 += 1;
        }
        continue;
      }

      let location = self.adjacent[vehicle][cursor];
      let next_layer = self.layer[vehicle].map(|d| d + 1);

      match self.matched_vehicle[location] {
        None if next_layer == self.free_layer => {
          // shortest path found, flip every edge held on the stack
          for &(vehicle, cursor) in stack.iter().rev() {
            let location = self.adjacent[vehicle][cursor];
            self.matched_vehicle[location] = Some(vehicle);
            self.matched_location[vehicle] = Some(location);
          }
          trace!(root, "augmented");
          return true;
        }
        Some(next) if self.layer[next] == next_layer => {
          stack.push((next, 0));
        }
        _ => {
          stack.last_mut().unwrap().1 += 1;
        }
      }
    }

    trace!(root, "no augmenting path");
    false
  }

  /// The location `vehicle` is assigned to, if any.
  #[inline]
  pub fn location_of(&self, vehicle: Vehicle) -> Option<Location> {
    self.matched_location[vehicle]
  }

  /// The vehicle serving `location`, if any.
  #[inline]
  pub fn vehicle_at(&self, location: Location) -> Option<Vehicle> {
    self.matched_vehicle[location]
  }

  /// True iff every location has a vehicle assigned.
  pub fn all_locations_covered(&self) -> bool {
    self.matched_vehicle.iter().all(|v| v.is_some())
  }

  /// Matched `(vehicle, location)` pairs in vehicle order.
  pub fn matched_pairs(&self) -> impl Iterator<Item = (Vehicle, Location)> + '_ {
    self
      .matched_location
      .iter()
      .enumerate()
      .filter_map(|(vehicle, &location)| location.map(|l| (vehicle, l)))
  }
}
