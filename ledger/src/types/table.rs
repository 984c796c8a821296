use std::fmt;

/// Provisioning state of the backing table as reported by describe-table.
///
/// Transitions are driven entirely by the backing service; this crate only
/// observes and polls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableState {
    Creating,
    Active,
    Updating,
    Deleting,
    /// A state this crate does not interpret.
    Unknown(String),
}

impl fmt::Display for TableState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableState::Creating => f.write_str("CREATING"),
            TableState::Active => f.write_str("ACTIVE"),
            TableState::Updating => f.write_str("UPDATING"),
            TableState::Deleting => f.write_str("DELETING"),
            TableState::Unknown(state) => f.write_str(state),
        }
    }
}

/// Snapshot of a declared table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescriptor {
    pub name: String,
    pub state: TableState,
}

/// Explicit outcome of a describe-table call.
///
/// A transient service failure is an `Err` at the call site, never folded
/// into `NotFound`; callers must only create a table on genuine absence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableExistence {
    Found(TableDescriptor),
    NotFound,
}
