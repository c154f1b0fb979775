//! Go module build-info collection
//!
//! [`GoModule`] runs the `go` command for a module and records what the
//! build depended on: every module of the build list that has an archive in
//! the download cache, with its checksums and the chains of modules that
//! required it.
//!
//! The pipeline for one module:
//! 1. [`codec::encode`] each `path:version` from the build list
//! 2. [`locator::locate`] its `.zip` in the download cache (misses are dropped)
//! 3. [`checksum::enrich`] it into a dependency record
//! 4. [`graph::resolve`] request chains from the module root
//! 5. persist the resulting [`Module`] through the [`BuildStore`]

pub mod checksum;
pub mod codec;
pub mod graph;
pub mod locator;
pub mod staging;
pub mod toolchain;

pub use graph::{DependencyMap, RequirementGraph};
pub use toolchain::{find_project_root, GoCli, GoToolchain, PackageLocation};

use crate::build_info::{Artifact, BuildContext, BuildStore, Dependency, Module};
use crate::error::{GobiError, GobiResult};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A Go module whose build is recorded as build-info
pub struct GoModule<'a> {
    ctx: &'a BuildContext,
    toolchain: &'a dyn GoToolchain,
    store: &'a BuildStore,
    /// Module id recorded in build-info
    name: String,
    /// Module path declared in go.mod, the root of the requirement graph
    go_mod_name: String,
    src_path: PathBuf,
    go_args: Vec<String>,
}

impl<'a> GoModule<'a> {
    /// Open the module at `src_path`, or the project containing the current
    /// directory when `None`
    pub async fn new(
        ctx: &'a BuildContext,
        toolchain: &'a dyn GoToolchain,
        store: &'a BuildStore,
        src_path: Option<PathBuf>,
    ) -> GobiResult<Self> {
        let src_path = match src_path {
            Some(path) => path,
            None => {
                let cwd = std::env::current_dir()
                    .map_err(|e| GobiError::io("getting current directory", e))?;
                find_project_root(&cwd)?
            }
        };

        let go_mod_name = toolchain.module_name(&src_path).await?;
        debug!(parent: ctx.span(), "Module {} at {}", go_mod_name, src_path.display());

        Ok(Self {
            ctx,
            toolchain,
            store,
            name: go_mod_name.clone(),
            go_mod_name,
            src_path,
            go_args: vec![],
        })
    }

    /// Override the module id recorded in build-info
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Arguments passed to `go` by [`build`](Self::build)
    pub fn set_args(&mut self, go_args: Vec<String>) {
        self.go_args = go_args;
    }

    /// Module id recorded in build-info
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the go command, collect the module's dependencies and save them.
    ///
    /// Nothing is collected when the go command fails or when no build name
    /// and number are configured. Returns the saved module record, if any.
    pub async fn build(&self) -> GobiResult<Option<Module>> {
        let is_go_get = match self.go_args.first() {
            Some(command) => {
                self.toolchain.run(&self.go_args, &self.src_path).await?;
                command == "get"
            }
            None => false,
        };

        if !self.ctx.name_and_number_provided() {
            debug!(parent: self.ctx.span(), "No build name and number, skipping build-info");
            return Ok(None);
        }

        let module = if is_go_get {
            let package = go_get_package(&self.go_args)?;
            let staging = staging::create()?;
            let result = self.collect_go_get(package, staging.path()).await;
            staging::finish(staging, result)?
        } else {
            let mut module = Module::go(self.name.clone());
            module.dependencies = self
                .load_dependencies(&self.src_path, &self.go_mod_name)
                .await?;
            module
        };

        info!(
            parent: self.ctx.span(),
            "Collected {} dependencies for {}",
            module.dependencies.len(),
            module.id
        );
        self.store.save_partial(self.ctx, module.clone()).await?;
        Ok(Some(module))
    }

    /// Register build outputs against this module
    pub async fn add_artifacts(&self, artifacts: Vec<Artifact>) -> GobiResult<()> {
        if !self.ctx.name_and_number_provided() {
            return Err(GobiError::BuildNotConfigured {
                action: "add artifacts",
            });
        }

        let mut module = Module::go(self.name.clone());
        module.artifacts = artifacts;
        self.store.save_partial(self.ctx, module).await?;
        Ok(())
    }

    /// Copy the fetched package's module into `staging` and collect from there
    async fn collect_go_get(&self, package: &str, staging: &Path) -> GobiResult<Module> {
        let location = self
            .toolchain
            .package_location(&self.src_path, package)
            .await?;

        staging::copy_dir(&location.dir, staging)
            .map_err(|_| GobiError::PackageFiles(location.dir.clone()))?;

        let mut module = Module::go(location.module_path.clone());
        module.dependencies = self
            .load_dependencies(staging, &location.module_path)
            .await?;
        Ok(module)
    }

    async fn load_dependencies(&self, src_path: &Path, root_id: &str) -> GobiResult<Vec<Dependency>> {
        let cache_root = self.toolchain.cache_root().await?;
        let requirements = self.toolchain.requirement_graph(src_path).await?;
        let dependencies = self.zip_dependencies(&cache_root, src_path).await?;

        let dependencies = graph::resolve(self.ctx, root_id, dependencies, &requirements);
        Ok(graph::into_list(dependencies))
    }

    /// Dependency records for every listed module with a cached archive
    async fn zip_dependencies(&self, cache_root: &Path, src_path: &Path) -> GobiResult<DependencyMap> {
        let modules = self.toolchain.list_modules(src_path).await?;

        let mut dependencies = DependencyMap::new();
        for module_id in modules {
            let encoded = codec::encode(&module_id);

            // Go does not always keep the zip of a listed module; those are left out.
            let Some(zip_path) = locator::locate(self.ctx, cache_root, &encoded)? else {
                continue;
            };

            let dependency = checksum::enrich(&encoded, &zip_path)?;
            dependencies.insert(module_id, dependency);
        }
        Ok(dependencies)
    }
}

/// First non-flag argument after `get`
fn go_get_package(go_args: &[String]) -> GobiResult<&str> {
    go_args
        .iter()
        .skip(1)
        .find(|arg| !arg.starts_with('-'))
        .map(String::as_str)
        .ok_or(GobiError::PackageNameMissing)
}
