//! Build-info persistence
//!
//! Every module build or artifact registration is written as a separate
//! JSON partial under `<state_dir>/builds/<key>/partials/`. Partials of the
//! same build are merged into a single [`BuildInfo`] when read back, so
//! several `gobi` invocations can contribute to one build.

use crate::build_info::{BuildContext, BuildInfo, Module};
use crate::error::{GobiError, GobiResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

/// One persisted fragment of a build's build-info
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partial {
    pub timestamp: DateTime<Utc>,
    pub module: Module,
}

/// File-based store for build-info partials
#[derive(Debug, Clone)]
pub struct BuildStore {
    root: PathBuf,
}

impl BuildStore {
    /// Create a store rooted at `root` (usually `<state_dir>/builds`)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the partials of the build described by `ctx`
    pub fn build_dir(&self, ctx: &BuildContext) -> GobiResult<PathBuf> {
        let (name, number) = identity(ctx)?;
        Ok(self
            .root
            .join(build_key(name, number, ctx.project()))
            .join("partials"))
    }

    /// Persist a module record as a new partial
    pub async fn save_partial(&self, ctx: &BuildContext, module: Module) -> GobiResult<PathBuf> {
        let dir = self.build_dir(ctx)?;
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| GobiError::io(format!("creating build directory {}", dir.display()), e))?;

        let partial = Partial {
            timestamp: Utc::now(),
            module,
        };
        let path = dir.join(format!(
            "{}-{}.json",
            partial.timestamp.timestamp_millis(),
            Uuid::new_v4()
        ));

        let content = serde_json::to_string_pretty(&partial)?;
        fs::write(&path, content)
            .await
            .map_err(|e| GobiError::io(format!("writing partial {}", path.display()), e))?;

        debug!(parent: ctx.span(), "Saved partial build-info: {}", path.display());
        Ok(path)
    }

    /// Load all partials of a build, oldest first
    pub async fn load_partials(&self, ctx: &BuildContext) -> GobiResult<Vec<Partial>> {
        let dir = self.build_dir(ctx)?;
        if !dir.exists() {
            return Ok(vec![]);
        }

        let mut partials = vec![];
        let mut entries = fs::read_dir(&dir)
            .await
            .map_err(|e| GobiError::io(format!("reading build directory {}", dir.display()), e))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| GobiError::io("reading partial entry", e))?
        {
            let path = entry.path();
            if !is_partial(&path) {
                continue;
            }
            let content = fs::read_to_string(&path)
                .await
                .map_err(|e| GobiError::io(format!("reading partial {}", path.display()), e))?;
            partials.push(serde_json::from_str::<Partial>(&content)?);
        }

        partials.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        debug!(parent: ctx.span(), "Loaded {} partials from {}", partials.len(), dir.display());
        Ok(partials)
    }

    /// Merge the stored partials into one build-info.
    ///
    /// Modules are merged by id in order of first appearance.
    pub async fn build_info(&self, ctx: &BuildContext) -> GobiResult<BuildInfo> {
        let (name, number) = identity(ctx)?;
        let (name, number) = (name.to_string(), number.to_string());
        let partials = self.load_partials(ctx).await?;

        let Some(started) = partials.first().map(|p| p.timestamp) else {
            return Err(GobiError::BuildNotFound { name, number });
        };

        let mut modules: Vec<Module> = Vec::new();
        for partial in partials {
            match modules.iter_mut().find(|m| m.id == partial.module.id) {
                Some(existing) => existing.merge(partial.module),
                None => modules.push(partial.module),
            }
        }

        Ok(BuildInfo {
            name,
            number,
            project: ctx.project().map(str::to_string),
            started,
            modules,
        })
    }

    /// Remove every stored partial of a build, returning how many were removed
    pub async fn clean(&self, ctx: &BuildContext) -> GobiResult<usize> {
        let dir = self.build_dir(ctx)?;
        // Counted without parsing so corrupt partials can still be removed
        let removed = count_partials(&dir).await?;

        if let Some(build_dir) = dir.parent() {
            if build_dir.exists() {
                fs::remove_dir_all(build_dir).await.map_err(|e| {
                    GobiError::io(format!("removing build directory {}", build_dir.display()), e)
                })?;
            }
        }

        debug!(parent: ctx.span(), "Removed {} partials", removed);
        Ok(removed)
    }
}

fn is_partial(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

async fn count_partials(dir: &Path) -> GobiResult<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let mut count = 0;
    let mut entries = fs::read_dir(dir)
        .await
        .map_err(|e| GobiError::io(format!("reading build directory {}", dir.display()), e))?;
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| GobiError::io("reading partial entry", e))?
    {
        if is_partial(&entry.path()) {
            count += 1;
        }
    }
    Ok(count)
}

fn identity(ctx: &BuildContext) -> GobiResult<(&str, &str)> {
    match (ctx.name(), ctx.number()) {
        (Some(name), Some(number)) => Ok((name, number)),
        _ => Err(GobiError::BuildNotConfigured {
            action: "access stored build-info",
        }),
    }
}

/// Directory key for a build: first 12 hex chars of sha256("name_number_project")
fn build_key(name: &str, number: &str, project: Option<&str>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}_{}_{}", name, number, project.unwrap_or("")).as_bytes());
    let result = hasher.finalize();
    hex::encode(&result[..6])
}
