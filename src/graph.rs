use crate::{Location, Time, Vehicle};
use itertools::Itertools;

/// Pairwise eligibility: `reachable[v][l]` holds iff vehicle `v` can reach
/// location `l` within `time_limit`.  Degenerate matrices (no vehicles or no
/// locations) yield an empty relation.
pub fn reachable_within(response_time: &[Vec<Time>], time_limit: Time) -> Vec<Vec<bool>> {
  response_time
    .iter()
    .map(|row| row.iter().map(|&t| t <= time_limit).collect())
    .collect()
}

/// Eligible `(vehicle, location)` pairs in row-major order.  Feeding these to
/// the matching engine in this order keeps runs reproducible.
pub fn eligible_pairs<'a>(
  reachable: &'a [Vec<bool>],
) -> impl Iterator<Item = (Vehicle, Location)> + 'a {
  reachable.iter().enumerate().flat_map(|(vehicle, row)| {
    row
      .iter()
      .positions(|&ok| ok)
      .map(move |location| (vehicle, location))
  })
}
