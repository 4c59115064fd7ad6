//! Partition assignor selection.
//!
//! The assignment algorithms themselves run in the group coordinator. This
//! module only decides which of them a client offers, from the
//! `partition.assignment.strategy` property.

use std::fmt;
use std::sync::Arc;

use crate::log::{debug, warn};
use crate::util::split_list;

/// A named partition assignment strategy.
pub trait PartitionAssignor: Send + Sync {
    /// Name used in `partition.assignment.strategy`.
    fn name(&self) -> &str;

    /// Group protocol type the assignor belongs to.
    fn protocol_type(&self) -> &str {
        "consumer"
    }
}

/// The `range` assignor.
#[derive(Debug, Default)]
pub struct RangeAssignor;

impl PartitionAssignor for RangeAssignor {
    fn name(&self) -> &str {
        "range"
    }
}

/// The `roundrobin` assignor.
#[derive(Debug, Default)]
pub struct RoundRobinAssignor;

impl PartitionAssignor for RoundRobinAssignor {
    fn name(&self) -> &str {
        "roundrobin"
    }
}

/// The assignors a registry knows about.
#[derive(Clone)]
pub struct AssignorSet {
    known: Vec<Arc<dyn PartitionAssignor>>,
}

impl AssignorSet {
    /// The assignors shipped with the client.
    pub fn builtin() -> AssignorSet {
        AssignorSet {
            known: vec![Arc::new(RangeAssignor), Arc::new(RoundRobinAssignor)],
        }
    }

    /// Adds an assignor, replacing a known one with the same name.
    pub fn register(&mut self, assignor: Arc<dyn PartitionAssignor>) {
        self.known.retain(|a| a.name() != assignor.name());
        self.known.push(assignor);
    }

    /// Looks up an assignor by name.
    pub fn resolve(&self, name: &str) -> Option<&Arc<dyn PartitionAssignor>> {
        self.known.iter().find(|a| a.name() == name)
    }
}

impl fmt::Debug for AssignorSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list()
            .entries(self.known.iter().map(|a| a.name()))
            .finish()
    }
}

/// The assignors requested by a configuration, resolved against the known
/// set.
///
/// Names that do not resolve are dropped rather than failing the
/// configuration, so `enabled_count` may be smaller than the number of
/// requested names.
#[derive(Clone, Default)]
pub struct AssignorRegistration {
    requested: Vec<String>,
    enabled: Vec<Arc<dyn PartitionAssignor>>,
}

impl AssignorRegistration {
    /// Parses a comma and/or space separated list of assignor names.
    pub fn parse(list: &str, known: &AssignorSet) -> AssignorRegistration {
        let requested: Vec<String> = split_list(list).map(str::to_string).collect();
        let mut enabled: Vec<Arc<dyn PartitionAssignor>> = Vec::with_capacity(requested.len());
        for name in &requested {
            match known.resolve(name) {
                Some(_) if enabled.iter().any(|a| a.name() == name) => {}
                Some(assignor) => enabled.push(Arc::clone(assignor)),
                None => warn!("Ignoring unknown partition assignor \"{}\"", name),
            }
        }
        debug!(
            "Enabled {} of {} requested partition assignors",
            enabled.len(),
            requested.len()
        );
        AssignorRegistration { requested, enabled }
    }

    /// The names as requested, including unresolved ones.
    pub fn requested(&self) -> &[String] {
        &self.requested
    }

    /// The resolved assignors, in order of preference.
    pub fn assignors(&self) -> &[Arc<dyn PartitionAssignor>] {
        &self.enabled
    }

    /// Names of the resolved assignors, in order of preference.
    pub fn names(&self) -> Vec<&str> {
        self.enabled.iter().map(|a| a.name()).collect()
    }

    /// Number of resolved assignors.
    pub fn enabled_count(&self) -> usize {
        self.enabled.len()
    }

    /// Drops every resolved assignor and requested name.
    pub(crate) fn clear(&mut self) -> usize {
        let released = self.enabled.len();
        self.enabled.clear();
        self.requested.clear();
        released
    }
}

impl fmt::Debug for AssignorRegistration {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("AssignorRegistration")
            .field("requested", &self.requested)
            .field("enabled", &self.names())
            .finish()
    }
}
