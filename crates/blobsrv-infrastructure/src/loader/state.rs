//! Per-prefix construction state
//!
//! Every declared prefix moves forward through
//! `Declared -> Constructing -> Constructed | Failed` and never back.
//!
//! Cycle detection works on construction paths, not on statuses. A path is
//! the chain of prefixes whose constructors are nested on one call stack,
//! outermost first. Requesting a prefix that is on the caller's own path is
//! a cycle. Requesting a prefix another path is constructing means waiting,
//! unless that construction is itself (transitively) waiting on the
//! caller's path, which would never finish and is a cycle as well. The
//! `requests` edges record who is waiting on whom for that check.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use blobsrv_domain::error::{Error, Result};
use blobsrv_domain::value_objects::{ConfigObj, HandlerInstance};

/// Lifecycle of one declared prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceStatus {
    /// Present in configuration, not yet requested
    Declared,
    /// Constructor currently running
    Constructing,
    /// Instance built and cached
    Constructed,
    /// Constructor failed; never retried
    Failed,
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Declared => "declared",
            Self::Constructing => "constructing",
            Self::Constructed => "constructed",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub(crate) struct InstanceState {
    pub(crate) declared_type: String,
    pub(crate) config: Arc<ConfigObj>,
    pub(crate) status: InstanceStatus,
    pub(crate) instance: Option<HandlerInstance>,
    pub(crate) error: Option<String>,
}

impl InstanceState {
    pub(crate) fn declared(declared_type: String, config: ConfigObj) -> Self {
        Self {
            declared_type,
            config: Arc::new(config),
            status: InstanceStatus::Declared,
            instance: None,
            error: None,
        }
    }
}

/// What a caller must do after asking to construct a prefix
pub(crate) enum Begin {
    /// Already built
    Ready(HandlerInstance),
    /// Another path is constructing it; wait for a state change and retry
    Wait,
    /// Caller now owns the construction and must call [`StateTable::finish`]
    Start {
        declared_type: String,
        config: Arc<ConfigObj>,
    },
}

#[derive(Debug, Default)]
pub(crate) struct StateTable {
    pub(crate) entries: BTreeMap<String, InstanceState>,
    // Constructing prefix -> prefixes its constructor is currently requesting.
    // One entry per in-flight request, so concurrent requests may repeat.
    requests: BTreeMap<String, Vec<String>>,
}

impl StateTable {
    /// Declare `prefix`. A prefix is declared at most once.
    pub(crate) fn declare(
        &mut self,
        prefix: String,
        declared_type: String,
        config: ConfigObj,
    ) -> Result<()> {
        use std::collections::btree_map::Entry;

        match self.entries.entry(prefix) {
            Entry::Occupied(existing) => Err(Error::config(format!(
                "prefix \"{}\" is already declared as \"{}\"",
                existing.key(),
                existing.get().declared_type
            ))),
            Entry::Vacant(slot) => {
                slot.insert(InstanceState::declared(declared_type, config));
                Ok(())
            }
        }
    }

    /// Claim `prefix` for construction on behalf of `path`, or explain why
    /// it cannot be claimed yet.
    pub(crate) fn begin(&mut self, prefix: &str, path: &[String]) -> Result<Begin> {
        let Some(state) = self.entries.get(prefix) else {
            return Err(Error::unknown_prefix(prefix));
        };
        match state.status {
            InstanceStatus::Constructed => match &state.instance {
                Some(instance) => Ok(Begin::Ready(instance.clone())),
                None => Err(Error::internal(format!(
                    "prefix \"{prefix}\" constructed without an instance"
                ))),
            },
            InstanceStatus::Failed => Err(Error::PreviouslyFailed {
                prefix: prefix.to_string(),
                message: state.error.clone().unwrap_or_default(),
            }),
            InstanceStatus::Constructing => match self.cycle_chain(prefix, path) {
                Some(chain) => Err(Error::Cycle { chain }),
                None => Ok(Begin::Wait),
            },
            InstanceStatus::Declared => {
                let begin = Begin::Start {
                    declared_type: state.declared_type.clone(),
                    config: Arc::clone(&state.config),
                };
                if let Some(state) = self.entries.get_mut(prefix) {
                    state.status = InstanceStatus::Constructing;
                }
                Ok(begin)
            }
        }
    }

    /// Record the outcome of a construction claimed with [`Self::begin`].
    pub(crate) fn finish(
        &mut self,
        prefix: &str,
        outcome: std::result::Result<HandlerInstance, String>,
    ) {
        self.requests.remove(prefix);
        let Some(state) = self.entries.get_mut(prefix) else {
            return;
        };
        match outcome {
            Ok(instance) => {
                state.status = InstanceStatus::Constructed;
                state.instance = Some(instance);
            }
            Err(message) => {
                state.status = InstanceStatus::Failed;
                state.error = Some(message);
            }
        }
    }

    /// Note that the constructor of `parent` is requesting `prefix`
    pub(crate) fn open_request(&mut self, parent: &str, prefix: &str) {
        self.requests
            .entry(parent.to_string())
            .or_default()
            .push(prefix.to_string());
    }

    /// Undo one [`Self::open_request`]
    pub(crate) fn close_request(&mut self, parent: &str, prefix: &str) {
        if let Some(targets) = self.requests.get_mut(parent) {
            if let Some(pos) = targets.iter().position(|p| p == prefix) {
                targets.remove(pos);
            }
            if targets.is_empty() {
                self.requests.remove(parent);
            }
        }
    }

    /// The cycle that would close if `path` waited on `prefix`, if any.
    ///
    /// The chain starts at the first prefix of `path` that the wait would
    /// lead back to and ends with that same prefix.
    pub(crate) fn cycle_chain(&self, prefix: &str, path: &[String]) -> Option<Vec<String>> {
        let mut route = Vec::new();
        let mut visited = BTreeSet::new();
        let pos = self.reaches_path(prefix, path, &mut route, &mut visited)?;
        let mut chain: Vec<String> = path[pos..].to_vec();
        chain.extend(route);
        Some(chain)
    }

    /// Depth-first search along `requests` from `node` to any prefix on
    /// `path`. On success `route` holds the walk from `node` to the hit and
    /// the hit's position on `path` is returned.
    fn reaches_path(
        &self,
        node: &str,
        path: &[String],
        route: &mut Vec<String>,
        visited: &mut BTreeSet<String>,
    ) -> Option<usize> {
        route.push(node.to_string());
        if let Some(pos) = path.iter().position(|p| p == node) {
            return Some(pos);
        }
        if visited.insert(node.to_string()) {
            for next in self.requests.get(node).into_iter().flatten() {
                if let Some(pos) = self.reaches_path(next, path, route, visited) {
                    return Some(pos);
                }
            }
        }
        route.pop();
        None
    }
}
