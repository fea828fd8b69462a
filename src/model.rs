use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One line of an index service response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRecord {
    #[serde(rename = "Path")]
    pub path: String,
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: String, // RFC3339Nano, kept verbatim
}

/// A single observed publication of a module version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageVersion {
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
}

/// Version history of one module path.
///
/// Versions are appended in arrival order. They are neither deduplicated nor
/// sorted by timestamp.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    #[serde(rename = "Versions")]
    pub versions: Vec<PackageVersion>,
    #[serde(rename = "Dependencies")]
    pub dependencies: Vec<String>, // reserved, never populated by the scraper
}

/// Snapshot mapping module path to its observed version history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Index {
    packages: HashMap<String, Package>,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges one observation into the snapshot.
    ///
    /// Creates a single-version package for an unseen path, otherwise appends
    /// to the existing history. Callers must hold exclusive access; inside a
    /// scrape that is the aggregator task.
    pub fn append(
        &mut self,
        path: impl Into<String>,
        version: impl Into<String>,
        timestamp: impl Into<String>,
    ) {
        let entry = PackageVersion {
            version: version.into(),
            timestamp: timestamp.into(),
        };
        self.packages
            .entry(path.into())
            .or_default()
            .versions
            .push(entry);
    }

    pub fn get(&self, path: &str) -> Option<&Package> {
        self.packages.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.packages.contains_key(path)
    }

    /// Number of distinct module paths.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Total number of versions across all paths.
    pub fn version_count(&self) -> usize {
        self.packages.values().map(|p| p.versions.len()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Package)> {
        self.packages.iter()
    }

    pub fn into_inner(self) -> HashMap<String, Package> {
        self.packages
    }
}

impl From<IndexRecord> for PackageVersion {
    fn from(record: IndexRecord) -> Self {
        Self {
            version: record.version,
            timestamp: record.timestamp,
        }
    }
}
