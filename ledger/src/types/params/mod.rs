use std::time::Duration;

/// Table name used when the caller does not configure one.
pub const DEFAULT_TABLE_NAME: &str = "migrations";

/// Delay between readiness probes while waiting for the table to go ACTIVE.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// TableArgs - Arguments identifying the backing table
#[derive(Debug, Clone)]
pub struct TableArgs {
    pub table_name: String,
}

impl TableArgs {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self { table_name: table_name.into() }
    }
}

impl Default for TableArgs {
    fn default() -> Self {
        Self { table_name: DEFAULT_TABLE_NAME.to_string() }
    }
}

/// PollArgs - Arguments controlling the readiness-polling loop
///
/// With `deadline: None` the wait is unbounded; cancellation must then be
/// imposed by the caller wrapping the whole operation.
#[derive(Debug, Clone, Copy)]
pub struct PollArgs {
    pub interval: Duration,
    pub deadline: Option<Duration>,
}

impl Default for PollArgs {
    fn default() -> Self {
        Self { interval: DEFAULT_POLL_INTERVAL, deadline: None }
    }
}
