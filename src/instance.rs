use crate::{Result, Time};
use anyhow::{anyhow, bail, Context};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// A dispatch problem: how long every vehicle takes to reach every incident,
/// and the longest response time the operator will accept.
///
/// The matrix is indexed `[vehicle][location]` and must be rectangular with
/// the declared dimensions; [`validate`](Self::validate) enforces this before
/// the matching engine ever sees the data.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Instance {
  pub num_vehicles: usize,
  pub num_locations: usize,
  /// Response times, indexed `[vehicle][location]`.
  pub response_time: Vec<Vec<Time>>,
  /// Longest acceptable response time.
  pub time_limit: Time,
}

impl Instance {
  /// Rejects matrices whose shape disagrees with the declared counts.
  /// Zero vehicles or zero locations are well-formed (empty) problems.
  pub fn validate(&self) -> Result<()> {
    if self.response_time.len() != self.num_vehicles {
      bail!(
        "expected {} matrix rows, got {}",
        self.num_vehicles,
        self.response_time.len()
      );
    }
    for (vehicle, row) in self.response_time.iter().enumerate() {
      if row.len() != self.num_locations {
        bail!(
          "matrix row {} has {} entries, expected {}",
          vehicle,
          row.len(),
          self.num_locations
        );
      }
    }
    Ok(())
  }

  /// Reads and validates an instance file.  `.json` files hold the serde
  /// representation; anything else is parsed as the whitespace text format.
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
      .with_context(|| format!("unable to read instance file {}", path.display()))?;

    let instance: Instance = match path.extension().and_then(|e| e.to_str()) {
      Some("json") => serde_json::from_str(&contents)
        .with_context(|| format!("malformed JSON instance {}", path.display()))?,
      _ => contents
        .parse()
        .with_context(|| format!("malformed instance {}", path.display()))?,
    };

    instance.validate()?;
    info!(
      num_vehicles = instance.num_vehicles,
      num_locations = instance.num_locations,
      time_limit = instance.time_limit,
      "instance loaded"
    );
    Ok(instance)
  }
}

fn take<'a>(tokens: &mut impl Iterator<Item = &'a str>, field: &str) -> Result<&'a str> {
  tokens
    .next()
    .ok_or_else(|| anyhow!("unexpected end of input, expected {}", field))
}

/// Whitespace text format: vehicle count, location count, the row-major
/// response-time matrix, then the time limit.
impl FromStr for Instance {
  type Err = anyhow::Error;

  fn from_str(s: &str) -> Result<Self> {
    let mut tokens = s.split_whitespace();

    let num_vehicles: usize = take(&mut tokens, "vehicle count")?
      .parse()
      .context("vehicle count")?;
    let num_locations: usize = take(&mut tokens, "location count")?
      .parse()
      .context("location count")?;

    let mut response_time = Vec::with_capacity(num_vehicles);
    for vehicle in 0..num_vehicles {
      let mut row = Vec::with_capacity(num_locations);
      for location in 0..num_locations {
        let t = take(&mut tokens, "response time")?
          .parse::<Time>()
          .with_context(|| format!("response time of vehicle {} to location {}", vehicle, location))?;
        row.push(t);
      }
      response_time.push(row);
    }

    let time_limit: Time = take(&mut tokens, "time limit")?
      .parse()
      .context("time limit")?;

    if let Some(extra) = tokens.next() {
      bail!("unexpected trailing input: {}", extra);
    }

    Ok(Instance {
      num_vehicles,
      num_locations,
      response_time,
      time_limit,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_text() -> Result<()> {
    let instance: Instance = "2 3\n1 2 3\n4 5 6\n4".parse()?;
    assert_eq!(instance.num_vehicles, 2);
    assert_eq!(instance.num_locations, 3);
    assert_eq!(instance.response_time, vec![vec![1, 2, 3], vec![4, 5, 6]]);
    assert_eq!(instance.time_limit, 4);
    instance.validate()
  }

  #[test]
  fn parse_rejects_truncated_matrix() {
    assert!("2 3\n1 2 3\n4 5".parse::<Instance>().is_err());
  }

  #[test]
  fn parse_rejects_trailing_tokens() {
    assert!("1 1\n7\n3 9".parse::<Instance>().is_err());
  }

  #[test]
  fn parse_rejects_negative_times() {
    assert!("1 1\n-2\n3".parse::<Instance>().is_err());
  }

  #[test]
  fn validate_rejects_ragged_matrix() {
    let instance = Instance {
      num_vehicles: 2,
      num_locations: 2,
      response_time: vec![vec![1, 2], vec![3]],
      time_limit: 5,
    };
    assert!(instance.validate().is_err());
  }

  #[test]
  fn validate_rejects_row_count_mismatch() {
    let instance = Instance {
      num_vehicles: 3,
      num_locations: 1,
      response_time: vec![vec![1], vec![2]],
      time_limit: 5,
    };
    assert!(instance.validate().is_err());
  }

  #[test]
  fn empty_problem_is_valid() -> Result<()> {
    let instance: Instance = "0 0 10".parse()?;
    instance.validate()
  }
}
