use std::collections::BTreeSet;

use crate::config::Mapping;

/// Substitution warnings for one resolved document.
///
/// Warnings, not errors: processing continues and the surrounding command
/// decides how to surface them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Template tokens with no mapping entry, left untouched in the output
    pub unknown: BTreeSet<String>,
    /// Mapping keys that matched at least one token
    pub referenced: BTreeSet<String>,
}

impl MergeReport {
    /// Fold another document's report into this one
    pub fn absorb(&mut self, other: MergeReport) {
        self.unknown.extend(other.unknown);
        self.referenced.extend(other.referenced);
    }

    /// Mapping entries never referenced by the template, in declared order
    pub fn unused<'a>(&self, mapping: &'a Mapping) -> Vec<&'a str> {
        mapping
            .keys()
            .filter(|key| !self.referenced.contains(key.as_str()))
            .map(String::as_str)
            .collect()
    }

    pub fn has_warnings(&self, mapping: &Mapping) -> bool {
        !self.unknown.is_empty() || !self.unused(mapping).is_empty()
    }
}
