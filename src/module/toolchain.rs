//! Go toolchain abstraction
//!
//! Everything gobi needs from the `go` command sits behind [`GoToolchain`]:
//! running the build itself and querying the resolved module list, the
//! requirement graph and the module cache location. [`GoCli`] implements it
//! by shelling out to the configured `go` binary.

use crate::error::{GobiError, GobiResult};
use crate::module::graph::RequirementGraph;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Module that provides a package, as reported by `go list`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLocation {
    /// Module path the package belongs to
    pub module_path: String,
    /// Directory holding the module's files
    pub dir: PathBuf,
}

/// Abstract interface to the Go toolchain
#[async_trait]
pub trait GoToolchain: Send + Sync {
    /// Run `go <args>` in `dir`, streaming its output to the terminal
    async fn run(&self, args: &[String], dir: &Path) -> GobiResult<()>;

    /// Module path declared by `dir/go.mod`
    async fn module_name(&self, dir: &Path) -> GobiResult<String>;

    /// Root of the module download cache
    async fn cache_root(&self) -> GobiResult<PathBuf>;

    /// Every module of the build list as `path:version`
    async fn list_modules(&self, dir: &Path) -> GobiResult<BTreeSet<String>>;

    /// Requirement graph with `path:version` identifiers
    async fn requirement_graph(&self, dir: &Path) -> GobiResult<RequirementGraph>;

    /// Module path and directory of the module providing `package`
    async fn package_location(&self, dir: &Path, package: &str) -> GobiResult<PackageLocation>;
}

/// Toolchain backed by the `go` command
#[derive(Debug, Clone)]
pub struct GoCli {
    binary: String,
    cache_root: Option<PathBuf>,
}

impl GoCli {
    /// Create a toolchain using `binary` (usually just `go`)
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            cache_root: None,
        }
    }

    /// Use a fixed cache root instead of asking `go env`
    pub fn with_cache_root(mut self, cache_root: Option<PathBuf>) -> Self {
        self.cache_root = cache_root;
        self
    }

    fn command(&self, args: &[&str], dir: Option<&Path>) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(args);
        if let Some(dir) = dir {
            cmd.current_dir(dir);
        }
        cmd
    }

    fn spawn_error(&self, args: &[&str], e: std::io::Error) -> GobiError {
        if e.kind() == std::io::ErrorKind::NotFound {
            GobiError::GoNotFound {
                binary: self.binary.clone(),
            }
        } else {
            GobiError::command_failed(format!("{} {}", self.binary, args.join(" ")), e)
        }
    }

    /// Execute a query command and return its stdout
    async fn query(&self, args: &[&str], dir: Option<&Path>) -> GobiResult<String> {
        debug!("Executing: {} {:?}", self.binary, args);

        let output = self
            .command(args, dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| self.spawn_error(args, e))?;

        if !output.status.success() {
            return Err(GobiError::GoOutput {
                args: args.join(" "),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for GoCli {
    fn default() -> Self {
        Self::new("go")
    }
}

#[async_trait]
impl GoToolchain for GoCli {
    async fn run(&self, args: &[String], dir: &Path) -> GobiResult<()> {
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        debug!("Executing interactively: {} {:?}", self.binary, arg_refs);

        let status = self
            .command(&arg_refs, Some(dir))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| self.spawn_error(&arg_refs, e))?;

        if status.success() {
            Ok(())
        } else {
            Err(GobiError::GoCommand {
                args: args.join(" "),
                code: status.code(),
            })
        }
    }

    async fn module_name(&self, dir: &Path) -> GobiResult<String> {
        let go_mod = dir.join("go.mod");
        let content = tokio::fs::read_to_string(&go_mod)
            .await
            .map_err(|e| GobiError::io(format!("reading {}", go_mod.display()), e))?;

        parse_module_directive(&content).ok_or(GobiError::ModuleDirectiveMissing(go_mod))
    }

    async fn cache_root(&self) -> GobiResult<PathBuf> {
        if let Some(ref root) = self.cache_root {
            return Ok(root.clone());
        }

        let mod_cache = self.query(&["env", "GOMODCACHE"], None).await?;
        let mod_cache = mod_cache.trim();
        let mod_cache = if mod_cache.is_empty() {
            let gopath = self.query(&["env", "GOPATH"], None).await?;
            let first = std::env::split_paths(gopath.trim()).next().ok_or_else(|| {
                GobiError::GoOutput {
                    args: "env GOPATH".to_string(),
                    reason: "GOPATH is empty".to_string(),
                }
            })?;
            first.join("pkg").join("mod")
        } else {
            PathBuf::from(mod_cache)
        };

        Ok(mod_cache.join("cache").join("download"))
    }

    async fn list_modules(&self, dir: &Path) -> GobiResult<BTreeSet<String>> {
        let output = self
            .query(
                &[
                    "list",
                    "-mod=mod",
                    "-f",
                    "{{with .Module}}{{.Path}}:{{.Version}}{{end}}",
                    "all",
                ],
                Some(dir),
            )
            .await?;
        Ok(parse_module_list(&output))
    }

    async fn requirement_graph(&self, dir: &Path) -> GobiResult<RequirementGraph> {
        let output = self.query(&["mod", "graph"], Some(dir)).await?;
        parse_mod_graph(&output)
    }

    async fn package_location(&self, dir: &Path, package: &str) -> GobiResult<PackageLocation> {
        let package = package.split_once('@').map_or(package, |(path, _)| path);
        let args = ["list", "-f", "{{.Module.Path}}\t{{.Module.Dir}}", package];
        let output = self.query(&args, Some(dir)).await?;

        parse_package_location(&output).ok_or_else(|| GobiError::GoOutput {
            args: args.join(" "),
            reason: format!("no module information for package {}", package),
        })
    }
}

/// Nearest ancestor of `start` (inclusive) containing a `go.mod`
pub fn find_project_root(start: &Path) -> GobiResult<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        if dir.join("go.mod").is_file() {
            return Ok(dir);
        }
        if !dir.pop() {
            return Err(GobiError::GoModNotFound(start.to_path_buf()));
        }
    }
}

/// Extract the module path from go.mod content
fn parse_module_directive(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let line = line.split("//").next().unwrap_or("").trim();
        let rest = line.strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let name = rest.trim().trim_matches(|c| c == '"' || c == '`');
        (!name.is_empty()).then(|| name.to_string())
    })
}

/// Parse `go list` output lines of the form `path:version`.
///
/// Lines without a version (the main module, or packages outside any
/// module) have no cached archive and are skipped.
fn parse_module_list(output: &str) -> BTreeSet<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| {
            let keep = line.split_once(':').is_some_and(|(_, v)| !v.is_empty());
            if !keep && !line.is_empty() {
                debug!("Skipping unversioned module: {}", line);
            }
            keep
        })
        .map(str::to_string)
        .collect()
}

/// Parse `go mod graph` output into a requirement graph.
///
/// Each line is `parent child`, with `path@version` identifiers (the main
/// module has no version). The version separator is rewritten to `:`.
fn parse_mod_graph(output: &str) -> GobiResult<RequirementGraph> {
    let mut graph = RequirementGraph::new();
    for line in output.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let mut fields = line.split_whitespace();
        let (Some(parent), Some(child), None) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(GobiError::GoOutput {
                args: "mod graph".to_string(),
                reason: format!("unexpected line: {}", line),
            });
        };
        graph
            .entry(graph_id(parent))
            .or_default()
            .push(graph_id(child));
    }
    Ok(graph)
}

fn graph_id(raw: &str) -> String {
    match raw.rsplit_once('@') {
        Some((path, version)) => format!("{}:{}", path, version),
        None => raw.to_string(),
    }
}

fn parse_package_location(output: &str) -> Option<PackageLocation> {
    let line = output.lines().map(str::trim).find(|l| !l.is_empty())?;
    let (module_path, dir) = line.split_once('\t')?;
    if module_path.is_empty() || dir.is_empty() {
        return None;
    }
    Some(PackageLocation {
        module_path: module_path.to_string(),
        dir: PathBuf::from(dir),
    })
}
