use dispatch::instance::Instance;
use dispatch::{graph, solution, Result};
use std::path::{Path, PathBuf};

fn data_file(name: &str) -> PathBuf {
  Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data")).join(name)
}

#[test]
fn text_instance_end_to_end() -> Result<()> {
  let instance = Instance::load(data_file("small.txt"))?;
  let assignment = solution::assign(&instance);
  assert_eq!(assignment.matching, 2);
  assert_eq!(assignment.unhandled(), 1);
  assert!(!assignment.is_complete());
  assignment.check(&graph::reachable_within(
    &instance.response_time,
    instance.time_limit,
  ))
}

#[test]
fn json_instance_end_to_end() -> Result<()> {
  let instance = Instance::load(data_file("diagonal.json"))?;
  let assignment = solution::assign(&instance);
  assert_eq!(assignment.matching, 3);
  assert!(assignment.is_complete());
  assert_eq!(assignment.assigned, vec![Some(0), Some(1), Some(2)]);
  Ok(())
}

#[test]
fn missing_instance_file_is_an_error() {
  assert!(Instance::load(data_file("no-such-instance.txt")).is_err());
}
