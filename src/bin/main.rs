use anyhow::Context;
use clap::Parser;
use dispatch::instance::Instance;
use dispatch::{logging, solution, Result, Time};
use std::io::Read;
use std::path::PathBuf;
use tracing::info;

/// Assign emergency vehicles to incident locations, maximising the number of
/// incidents reached within the response-time limit.
#[derive(Parser)]
#[clap(name = "dispatch", version)]
struct Args {
  /// Instance file (.json or whitespace text), or `-` for stdin.
  instance: PathBuf,
  /// Override the instance's maximum acceptable response time.
  #[clap(long)]
  time_limit: Option<Time>,
  /// Print the assignment as JSON instead of a table.
  #[clap(long)]
  json: bool,
  /// Also write a JSON trace log to this file.
  #[clap(long)]
  log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
  let args = Args::parse();
  let _guard = logging::init_logging(args.log_file.as_ref());

  let mut instance = if args.instance.to_str() == Some("-") {
    let mut buf = String::new();
    std::io::stdin()
      .read_to_string(&mut buf)
      .context("reading instance from stdin")?;
    let instance: Instance = buf.parse()?;
    instance.validate()?;
    instance
  } else {
    Instance::load(&args.instance)?
  };

  if let Some(limit) = args.time_limit {
    info!(limit, "overriding time limit");
    instance.time_limit = limit;
  }

  let assignment = solution::assign(&instance);

  if args.json {
    println!("{}", serde_json::to_string_pretty(&assignment)?);
  } else {
    assignment.pretty_print();
  }
  Ok(())
}
