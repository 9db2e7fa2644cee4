//! Store scopes
//!
//! A [`Scope`] partitions which store a component binds to. Scopes compare by
//! identity: two scopes created with the same name are still different.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SCOPE_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque, process-unique store scope
///
/// Scopes are created by the integrator and never mutated. The reserved
/// [`Scope::DEFAULT`] is used whenever no explicit scope is given.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Scope {
    id: u64,
    name: &'static str,
}

impl Scope {
    /// The well-known default scope
    pub const DEFAULT: Scope = Scope {
        id: 0,
        name: "reduxDefaultStoreLike",
    };

    /// Create a fresh scope
    ///
    /// The name is only used for diagnostics.
    pub fn new(name: &'static str) -> Self {
        Self {
            id: NEXT_SCOPE_ID.fetch_add(1, Ordering::Relaxed),
            name,
        }
    }

    /// Diagnostic name of this scope
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether this is [`Scope::DEFAULT`]
    pub fn is_default(&self) -> bool {
        self.id == Self::DEFAULT.id
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scope({}#{})", self.name, self.id)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
