//! Branch identifiers and the fixed branch registry

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Branches configured when no explicit list is given.
///
/// The first entry is spelled with an en dash; lookup folds it to `-`.
pub const DEFAULT_BRANCHES: &[&str] = &[
    "CABANG \u{2013} KEPONG",
    "CABANG - KLANG",
    "CABANG - AMPANG",
    "CABANG - KAJANG",
    "CABANG - PETALING JAYA",
    "CABANG - RAWANG",
    "CABANG - SHAH ALAM",
    "CABANG - SUBANG JAYA",
    "CABANG - PUCHONG",
    "CABANG - SERI KEMBANGAN",
    "CABANG - CYBERJAYA",
    "CABANG - PUTRAJAYA",
    "CABANG - BANGI",
    "CABANG - SEMENYIH",
    "CABANG - CHERAS",
];

/// Name of a branch office.
///
/// The display name is kept exactly as configured. Equality and hashing use
/// a lookup key instead: case-insensitive, whitespace runs collapsed, and
/// en/em dashes folded to `-`. So `"cabang – kepong"` and
/// `"CABANG - KEPONG"` name the same branch.
///
/// # Examples
///
/// ```
/// use branchcast_domain::BranchId;
///
/// let a = BranchId::new("cabang  -  kepong");
/// let b = BranchId::new("CABANG – KEPONG");
/// assert_eq!(a, b);
/// assert_eq!(b.as_str(), "CABANG – KEPONG");
/// ```
#[derive(Debug, Clone)]
pub struct BranchId {
    name: String,
    key: String,
}

impl BranchId {
    /// Create a branch id from its display name
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let key = lookup_key(&name);
        Self { name, key }
    }

    /// Display name as configured
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Normalized lookup key
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl PartialEq for BranchId {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for BranchId {}

impl Hash for BranchId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for BranchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

fn lookup_key(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            word.chars()
                .map(|c| match c {
                    '\u{2013}' | '\u{2014}' | '\u{2212}' => '-',
                    other => other,
                })
                .flat_map(char::to_uppercase)
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Errors raised while building a registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No branches were configured
    Empty,
    /// A configured name is blank
    BlankName,
    /// Two configured names resolve to the same branch
    Duplicate(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::Empty => write!(f, "branch registry must not be empty"),
            RegistryError::BlankName => write!(f, "branch names must not be blank"),
            RegistryError::Duplicate(name) => write!(f, "duplicate branch: {}", name),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Fixed, ordered set of known branches.
///
/// The order drives batch generation order; membership validates incoming
/// branch lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRegistry {
    branches: Vec<BranchId>,
}

impl BranchRegistry {
    /// Build a registry from configured names, keeping their order
    pub fn new<I, S>(names: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut branches = Vec::new();

        for name in names {
            let name: String = name.into();
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(RegistryError::BlankName);
            }
            let branch = BranchId::new(name);
            if !seen.insert(branch.key().to_string()) {
                return Err(RegistryError::Duplicate(branch.as_str().to_string()));
            }
            branches.push(branch);
        }

        if branches.is_empty() {
            return Err(RegistryError::Empty);
        }

        Ok(Self { branches })
    }

    /// Registry built from [`DEFAULT_BRANCHES`]
    pub fn default_branches() -> Self {
        Self {
            branches: DEFAULT_BRANCHES.iter().map(|name| BranchId::new(*name)).collect(),
        }
    }

    /// Find the configured branch a raw name refers to
    pub fn resolve(&self, raw: &str) -> Option<&BranchId> {
        let key = lookup_key(raw);
        self.branches.iter().find(|b| b.key() == key)
    }

    /// Number of branches (and therefore variants per batch)
    pub fn len(&self) -> usize {
        self.branches.len()
    }

    /// Always false for a successfully built registry
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// Branches in generation order
    pub fn iter(&self) -> impl Iterator<Item = &BranchId> {
        self.branches.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = BranchRegistry::default_branches();
        let lower = registry.resolve("cabang - kepong").unwrap();
        let upper = registry.resolve("CABANG - KEPONG").unwrap();
        assert_eq!(lower.as_str(), upper.as_str());
    }

    #[test]
    fn test_lookup_folds_dashes_and_spaces() {
        let registry = BranchRegistry::default_branches();
        assert!(registry.resolve("Cabang – Kepong").is_some());
        assert!(registry.resolve("  cabang   -   shah   alam ").is_some());
        assert!(registry.resolve("CABANG-X").is_none());
    }

    #[test]
    fn test_registry_keeps_order() {
        let registry = BranchRegistry::new(["B", "A", "C"]).unwrap();
        let names: Vec<_> = registry.iter().map(|b| b.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        let err = BranchRegistry::new(["CABANG - KLANG", "cabang – klang"]).unwrap_err();
        assert_eq!(err, RegistryError::Duplicate("cabang – klang".to_string()));
    }

    #[test]
    fn test_registry_rejects_empty_and_blank() {
        assert_eq!(BranchRegistry::new(Vec::<String>::new()).unwrap_err(), RegistryError::Empty);
        assert_eq!(BranchRegistry::new(["ok", "  "]).unwrap_err(), RegistryError::BlankName);
    }

    #[test]
    fn test_default_list_keeps_en_dash_spelling() {
        let registry = BranchRegistry::default_branches();
        let kepong = registry.resolve("CABANG - KEPONG").unwrap();
        assert_eq!(kepong.as_str(), "CABANG \u{2013} KEPONG");
        assert_eq!(kepong.key(), "CABANG - KEPONG");
        assert_eq!(registry.resolve("CABANG - KLANG").unwrap().as_str(), "CABANG - KLANG");
    }

    #[test]
    fn test_default_registry_size() {
        assert_eq!(BranchRegistry::default_branches().len(), DEFAULT_BRANCHES.len());
    }

    #[test]
    fn test_branch_id_keeps_display_name() {
        let id = BranchId::new("Cabang - Bangi");
        assert_eq!(id.to_string(), "Cabang - Bangi");
        assert_eq!(id.key(), "CABANG - BANGI");
    }
}
