//! Visited-URL registry and hop budgets
//!
//! The registry is the only state shared between crawl workers. It maps every
//! URL that has been claimed for a fetch to the hop budget that was left when
//! it was claimed.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// How many more hops a traversal may take from a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HopBudget {
    /// No limit (`level = 0`)
    Unbounded,

    /// At most this many more hops
    Remaining(u32),
}

impl HopBudget {
    /// Budget for a seed given the configured `level`
    ///
    /// `0` means unbounded.
    pub fn from_level(level: u32) -> Self {
        if level == 0 {
            Self::Unbounded
        } else {
            Self::Remaining(level)
        }
    }

    /// True when no further hop is allowed
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Remaining(0))
    }

    /// Budget handed to a page reached from a page with this budget
    pub fn child(&self) -> Self {
        match self {
            Self::Unbounded => Self::Unbounded,
            Self::Remaining(n) => Self::Remaining(n.saturating_sub(1)),
        }
    }

    /// Uses up one hop of this budget
    pub fn spend(&mut self) {
        *self = self.child();
    }
}

impl fmt::Display for HopBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbounded => write!(f, "unbounded"),
            Self::Remaining(n) => write!(f, "{}", n),
        }
    }
}

/// Set of URLs already claimed for fetching, shared by all workers
///
/// Cloning is cheap and every clone sees the same entries. URLs are compared
/// as exact strings.
#[derive(Debug, Clone, Default)]
pub struct VisitedRegistry {
    inner: Arc<Mutex<HashMap<String, HopBudget>>>,
}

impl VisitedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when `url` has not been claimed yet
    pub fn should_visit(&self, url: &str) -> bool {
        !self.lock().contains_key(url)
    }

    /// Records `url` with the budget left at the time it was reached
    ///
    /// A later call for the same URL overwrites the budget.
    pub fn mark_visited(&self, url: &str, budget: HopBudget) {
        self.lock().insert(url.to_string(), budget);
    }

    /// Checks and marks `url` in one step
    ///
    /// Returns true if this caller claimed the URL. Two workers racing on the
    /// same URL cannot both get `true`.
    pub fn try_claim(&self, url: &str, budget: HopBudget) -> bool {
        let mut visited = self.lock();
        if visited.contains_key(url) {
            return false;
        }
        visited.insert(url.to_string(), budget);
        true
    }

    /// The budget recorded for `url`
    pub fn budget_of(&self, url: &str) -> Option<HopBudget> {
        self.lock().get(url).copied()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, HopBudget>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
