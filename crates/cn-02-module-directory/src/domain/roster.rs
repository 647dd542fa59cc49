//! # Roster
//!
//! The in-memory module list produced by the last reconciliation, and the
//! cell it is published through.
//!
//! The mother record is kept apart from the module list: it is cached with
//! the other records but only reachable through [`Roster::mother`].

use parking_lot::RwLock;
use shared_types::ModuleRecord;
use std::sync::Arc;

/// Immutable roster snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    modules: Vec<ModuleRecord>,
    mother: Option<ModuleRecord>,
}

impl Roster {
    /// Roster from already separated parts.
    #[must_use]
    pub fn new(modules: Vec<ModuleRecord>, mother: Option<ModuleRecord>) -> Self {
        Self { modules, mother }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Rebuild from cached records: the one flagged as mother goes to the
    /// mother slot, the rest keep their cache order.
    #[must_use]
    pub fn from_cache(records: Vec<ModuleRecord>) -> Self {
        let mut mother = None;
        let mut modules = Vec::with_capacity(records.len());
        for record in records {
            if record.is_mother && mother.is_none() {
                mother = Some(record);
            } else {
                modules.push(record);
            }
        }
        Self { modules, mother }
    }

    /// Child modules in arrival order.
    #[must_use]
    pub fn modules(&self) -> &[ModuleRecord] {
        &self.modules
    }

    #[must_use]
    pub fn mother(&self) -> Option<&ModuleRecord> {
        self.mother.as_ref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether there are no child modules. The mother does not count.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Modules whose entry point equals `entry_point`, or all of them for
    /// `None`.
    #[must_use]
    pub fn filtered(&self, entry_point: Option<&str>) -> Vec<ModuleRecord> {
        match entry_point {
            None => self.modules.clone(),
            Some(filter) => self
                .modules
                .iter()
                .filter(|m| m.matches_entry_point(filter))
                .cloned()
                .collect(),
        }
    }
}

/// Shared slot holding the current roster. Replacing swaps the `Arc`, so
/// readers keep a stable snapshot.
#[derive(Debug, Default)]
pub struct RosterCell {
    current: RwLock<Arc<Roster>>,
}

impl RosterCell {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&self, roster: Roster) {
        *self.current.write() = Arc::new(roster);
    }

    #[must_use]
    pub fn snapshot(&self) -> Arc<Roster> {
        Arc::clone(&self.current.read())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(package: &str, entry: Option<&str>) -> ModuleRecord {
        let record = ModuleRecord::new(package, package, "1.0");
        match entry {
            Some(entry) => record.with_entry_point(entry),
            None => record,
        }
    }

    #[test]
    fn test_filter_returns_exact_matches_only() {
        let roster = Roster::new(
            vec![
                record("a", Some("main")),
                record("b", Some("settings")),
                record("c", Some("main")),
                record("d", None),
            ],
            None,
        );

        let packages: Vec<_> = roster
            .filtered(Some("main"))
            .into_iter()
            .map(|m| m.package)
            .collect();
        assert_eq!(packages, vec!["a", "c"]);
        assert_eq!(roster.filtered(None).len(), 4);
        assert!(roster.filtered(Some("missing")).is_empty());
    }

    #[test]
    fn test_from_cache_splits_out_mother() {
        let roster = Roster::from_cache(vec![
            record("child.one", None),
            ModuleRecord::new("parent", "Parent", "2.0").into_mother(),
            record("child.two", None),
        ]);

        assert_eq!(roster.len(), 2);
        assert_eq!(roster.mother().map(|m| m.package.as_str()), Some("parent"));
        assert_eq!(roster.modules()[1].package, "child.two");
    }

    #[test]
    fn test_cell_snapshot_survives_replace() {
        let cell = RosterCell::new();
        cell.replace(Roster::new(vec![record("a", None)], None));
        let before = cell.snapshot();

        cell.replace(Roster::empty());

        assert_eq!(before.len(), 1);
        assert!(cell.snapshot().is_empty());
    }
}
