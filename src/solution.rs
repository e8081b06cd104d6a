use crate::instance::Instance;
use crate::matching::HopcroftKarp;
use crate::{graph, map_with_capacity, Location, Map, Result, Vehicle};
use anyhow::bail;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Final vehicle-to-incident assignment, read out of the matching engine once
/// it has solved.  Serialisable as-is for machine consumers.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
  /// Matched location per vehicle, in vehicle order.
  pub assigned: Vec<Option<Location>>,
  /// Number of vehicle-location pairs established.
  pub matching: usize,
  pub num_locations: usize,
}

/// End-to-end pipeline: eligibility relation, edge insertion in row-major
/// order, Hopcroft-Karp, read-out.  The caller is responsible for validating
/// the instance first; see [`Instance::validate`].
#[tracing::instrument(level = "debug", skip(instance))]
pub fn assign(instance: &Instance) -> Assignment {
  let reachable = graph::reachable_within(&instance.response_time, instance.time_limit);

  let mut engine = HopcroftKarp::new(instance.num_vehicles, instance.num_locations);
  for (vehicle, location) in graph::eligible_pairs(&reachable) {
    engine.add_edge(vehicle, location);
  }

  let matching = engine.solve();
  info!(
    matching,
    unhandled = instance.num_locations - matching,
    "assignment computed"
  );

  Assignment {
    assigned: (0..instance.num_vehicles).map(|v| engine.location_of(v)).collect(),
    matching,
    num_locations: instance.num_locations,
  }
}

impl Assignment {
  /// Count of incidents left without a vehicle.
  #[inline]
  pub fn unhandled(&self) -> usize {
    self.num_locations - self.matching
  }

  /// True iff every incident location received a vehicle.
  #[inline]
  pub fn is_complete(&self) -> bool {
    self.unhandled() == 0
  }

  /// Inverse view: which vehicle serves each covered location.
  pub fn by_location(&self) -> Map<Location, Vehicle> {
    let mut serving = map_with_capacity(self.matching);
    for (vehicle, &location) in self.assigned.iter().enumerate() {
      if let Some(location) = location {
        serving.insert(location, vehicle);
      }
    }
    serving
  }

  /// Audits the assignment against an eligibility relation: every assigned
  /// pair must be eligible, no location may be served twice, and the stored
  /// cardinality must agree with the pair count.
  pub fn check(&self, reachable: &[Vec<bool>]) -> Result<()> {
    let mut serving: Map<Location, Vehicle> = map_with_capacity(self.matching);

    for (vehicle, &location) in self.assigned.iter().enumerate() {
      let location = match location {
        Some(l) => l,
        None => continue,
      };
      let eligible = reachable
        .get(vehicle)
        .and_then(|row| row.get(location))
        .copied()
        .unwrap_or(false);
      if !eligible {
        bail!("vehicle {} assigned to ineligible location {}", vehicle, location);
      }
      if let Some(other) = serving.insert(location, vehicle) {
        bail!(
          "location {} is served by both vehicle {} and vehicle {}",
          location,
          other,
          vehicle
        );
      }
    }

    if serving.len() != self.matching {
      bail!(
        "matching size {} disagrees with {} assigned pairs",
        self.matching,
        serving.len()
      );
    }
    Ok(())
  }

  pub fn to_table(&self) -> prettytable::Table {
    use prettytable::*;

    let mut table = Table::new();
    table.add_row(row!["Vehicle", "Location"]);
    for (vehicle, location) in self.assigned.iter().enumerate() {
      let location = match location {
        Some(l) => format!("{}", l + 1),
        None => "unassigned".to_string(),
      };
      table.add_row(row![format!("{}", vehicle + 1), location]);
    }

    let fmt = format::FormatBuilder::new().padding(1, 1).build();
    table.set_format(fmt);
    for cell in table.column_iter_mut(1) {
      cell.align(format::Alignment::RIGHT);
    }
    table
  }

  /// Assignment table plus the coverage summary, on stdout.
  pub fn pretty_print(&self) {
    println!("Emergency vehicle assignments:");
    self.to_table().printstd();
    println!("Incidents handled: {} of {}", self.matching, self.num_locations);
    println!("Incidents unhandled: {}", self.unhandled());
    if self.is_complete() {
      println!("All incidents receive a vehicle.");
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn instance(response_time: Vec<Vec<u32>>, time_limit: u32) -> Instance {
    let num_vehicles = response_time.len();
    let num_locations = response_time.first().map_or(0, Vec::len);
    Instance {
      num_vehicles,
      num_locations,
      response_time,
      time_limit,
    }
  }

  #[test]
  fn diagonal_scenario() {
    // Diagonal entries reachable, everything else far out of range.
    let inst = instance(
      vec![vec![1, 100, 100], vec![100, 1, 100], vec![100, 100, 1]],
      1,
    );
    let assignment = assign(&inst);
    assert_eq!(assignment.matching, 3);
    assert_eq!(assignment.assigned, vec![Some(0), Some(1), Some(2)]);
    assert!(assignment.is_complete());
    assert_eq!(assignment.unhandled(), 0);
    assignment
      .check(&graph::reachable_within(&inst.response_time, inst.time_limit))
      .unwrap();
  }

  #[test]
  fn overlapping_coverage_leaves_one_unhandled() {
    // Vehicle 1 covers locations {1,2}, vehicle 2 covers {2,3}.
    let inst = instance(vec![vec![2, 3, 9], vec![9, 3, 2]], 3);
    let assignment = assign(&inst);
    assert_eq!(assignment.matching, 2);
    assert_eq!(assignment.unhandled(), 1);
    assert!(!assignment.is_complete());
    assignment
      .check(&graph::reachable_within(&inst.response_time, inst.time_limit))
      .unwrap();
  }

  #[test]
  fn unreachable_threshold_assigns_nothing() {
    let inst = instance(vec![vec![5, 6], vec![7, 8]], 4);
    let assignment = assign(&inst);
    assert_eq!(assignment.matching, 0);
    assert_eq!(assignment.assigned, vec![None, None]);
    assert_eq!(assignment.unhandled(), 2);
  }

  #[test]
  fn matching_is_monotone_in_the_time_limit() {
    let times = vec![vec![4, 8, 1], vec![6, 3, 7], vec![2, 2, 9]];
    let mut previous = 0;
    for limit in 0..10 {
      let assignment = assign(&instance(times.clone(), limit));
      assert!(assignment.matching >= previous, "regressed at limit {}", limit);
      previous = assignment.matching;
    }
    assert_eq!(previous, 3);
  }

  #[test]
  fn by_location_inverts_the_assignment() {
    let inst = instance(vec![vec![1, 9], vec![9, 1]], 1);
    let assignment = assign(&inst);
    let serving = assignment.by_location();
    assert_eq!(serving.len(), 2);
    assert_eq!(serving[&0], 0);
    assert_eq!(serving[&1], 1);
  }

  #[test]
  fn check_rejects_duplicate_locations() {
    let bad = Assignment {
      assigned: vec![Some(0), Some(0)],
      matching: 2,
      num_locations: 2,
    };
    assert!(bad.check(&[vec![true, true], vec![true, true]]).is_err());
  }

  #[test]
  fn check_rejects_ineligible_pairs() {
    let bad = Assignment {
      assigned: vec![Some(1)],
      matching: 1,
      num_locations: 2,
    };
    assert!(bad.check(&[vec![true, false]]).is_err());
  }
}
