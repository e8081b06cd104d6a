use std::fs::OpenOptions;
use std::path::Path;
use tracing_appender::{non_blocking, non_blocking::WorkerGuard};
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

fn build_and_set_global_subscriber(
  logfile: Option<impl AsRef<Path>>,
  is_test: bool,
) -> Option<WorkerGuard> {
  let stderr_log = fmt::layer().with_target(false).without_time();
  let env_filter = EnvFilter::from_default_env();
  let r = registry().with(stderr_log).with(env_filter);

  match logfile {
    Some(p) => {
      let logfile = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(p)
        .unwrap();
      let (writer, guard) = non_blocking::NonBlockingBuilder::default()
        .lossy(false)
        .finish(logfile);
      let json = fmt::layer()
        .json()
        .with_span_list(true)
        .with_current_span(false)
        .with_writer(writer);

      let r = r.with(json);
      if is_test {
        r.try_init().ok();
      } else {
        r.init();
      }
      Some(guard)
    }
    None => {
      if is_test {
        r.try_init().ok();
      } else {
        r.init();
      }
      None
    }
  }
}

pub fn init_logging(logfile: Option<impl AsRef<Path>>) -> Option<WorkerGuard> {
  build_and_set_global_subscriber(logfile, false)
}

#[allow(dead_code)]
pub(crate) fn init_test_logging(logfile: Option<impl AsRef<Path>>) -> Option<WorkerGuard> {
  build_and_set_global_subscriber(logfile, true)
}
