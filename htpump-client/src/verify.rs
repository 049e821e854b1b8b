//! Verification of parameter answers
//!
//! Every parameter answer echoes the data point name, value and limits.
//! The driver cross-checks these against the catalog to catch a catalog
//! that does not match the connected controller. A mismatch is reported
//! as a warning or, when configured, as an error.

use std::collections::HashSet;

/// One cross-check performed on a parameter answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerifyAction {
    /// The echoed `NAME` must match the catalog name.
    Name,
    /// The echoed `MIN` must match the catalog's minimal value.
    Min,
    /// The echoed `MAX` must match the catalog's maximal value.
    Max,
    /// After a write, the echoed `VAL` must lie within the limits.
    Value,
}

impl VerifyAction {
    /// All checks.
    pub fn all() -> HashSet<VerifyAction> {
        HashSet::from([
            VerifyAction::Name,
            VerifyAction::Min,
            VerifyAction::Max,
            VerifyAction::Value,
        ])
    }
}

/// Which cross-checks to run and how to report failures
#[derive(Debug, Clone)]
pub struct VerifySettings {
    pub actions: HashSet<VerifyAction>,
    /// Report a failed check as an error instead of a warning.
    pub treat_as_error: bool,
}

impl Default for VerifySettings {
    /// Only the name check, reported as a warning.
    fn default() -> Self {
        Self {
            actions: HashSet::from([VerifyAction::Name]),
            treat_as_error: false,
        }
    }
}

impl VerifySettings {
    pub fn verifies(&self, action: VerifyAction) -> bool {
        self.actions.contains(&action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_checks_only_the_name() {
        let settings = VerifySettings::default();
        assert!(settings.verifies(VerifyAction::Name));
        assert!(!settings.verifies(VerifyAction::Min));
        assert!(!settings.treat_as_error);
    }
}
