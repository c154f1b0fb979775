//! Build-info records
//!
//! The manifest types produced for a build: a [`BuildInfo`] holds one
//! [`Module`] per built Go module, each listing its [`Dependency`] archives
//! and registered [`Artifact`]s. Field names follow the build-info JSON
//! layout (`requestedBy`, `type`, ...).

pub mod context;
pub mod store;

pub use context::BuildContext;
pub use store::{BuildStore, Partial};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Module type tag for Go modules
pub const GO_MODULE_TYPE: &str = "go";

/// Dependency type tag for module archives
pub const ZIP_DEPENDENCY_TYPE: &str = "zip";

/// Checksum triple attached to dependencies and artifacts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checksum {
    pub sha1: String,
    pub md5: String,
    pub sha256: String,
}

impl Checksum {
    /// True when no digest has been computed
    pub fn is_empty(&self) -> bool {
        self.sha1.is_empty() && self.md5.is_empty() && self.sha256.is_empty()
    }
}

/// A dependency archive and the chains of modules that requested it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    pub id: String,

    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Checksum::is_empty")]
    pub checksum: Checksum,

    /// Request chains, immediate requester first and root-most last
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requested_by: Vec<Vec<String>>,
}

impl Dependency {
    /// Whether any recorded request chain already passes through `node`.
    ///
    /// `node` is the identifier the dependency carries in the requirement
    /// graph, which differs from `id` once the id has been encoded.
    pub fn node_has_loop(&self, node: &str) -> bool {
        self.requested_by
            .iter()
            .any(|chain| chain.iter().any(|id| id == node))
    }
}

/// A build output registered against a module
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub name: String,

    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,

    #[serde(default, skip_serializing_if = "Checksum::is_empty")]
    pub checksum: Checksum,
}

/// Build-info for a single module
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<Dependency>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<Artifact>,
}

impl Module {
    /// Create a Go module record
    pub fn go(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: GO_MODULE_TYPE.to_string(),
            ..Self::default()
        }
    }

    /// Fold another record of the same module into this one.
    ///
    /// Dependencies are kept once per id (first occurrence wins), artifacts
    /// are appended.
    pub fn merge(&mut self, other: Module) {
        for dep in other.dependencies {
            if !self.dependencies.iter().any(|d| d.id == dep.id) {
                self.dependencies.push(dep);
            }
        }
        self.artifacts.extend(other.artifacts);
    }
}

/// Complete build-info assembled from a build's partials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfo {
    pub name: String,
    pub number: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    pub started: DateTime<Utc>,

    #[serde(default)]
    pub modules: Vec<Module>,
}
