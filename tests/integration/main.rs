//! Integration tests for gobi

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn gobi() -> Command {
        let mut cmd = cargo_bin_cmd!("gobi");
        cmd.env_remove("GOBI_BUILD_NAME")
            .env_remove("GOBI_BUILD_NUMBER")
            .env_remove("GOBI_PROJECT")
            .env("CI", "true");
        cmd
    }

    /// Isolated config and state directory
    struct Workspace {
        dir: TempDir,
    }

    impl Workspace {
        fn new() -> Self {
            let ws = Self {
                dir: TempDir::new().unwrap(),
            };
            ws.write_config("");
            ws
        }

        fn path(&self) -> &Path {
            self.dir.path()
        }

        fn config_path(&self) -> PathBuf {
            self.path().join("config.toml")
        }

        fn write_config(&self, extra: &str) {
            let config = format!(
                "[general]\nstate_dir = {:?}\n{}",
                self.path().join("state"),
                extra
            );
            std::fs::write(self.config_path(), config).unwrap();
        }

        fn cmd(&self) -> Command {
            let mut cmd = gobi();
            cmd.env("GOBI_CONFIG", self.config_path());
            cmd
        }
    }

    #[test]
    fn help_displays() {
        gobi()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Build-info extraction for Go modules"));
    }

    #[test]
    fn version_displays() {
        gobi()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("gobi"));
    }

    #[test]
    fn config_path() {
        let ws = Workspace::new();
        ws.cmd()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let ws = Workspace::new();
        ws.cmd()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[general]"))
            .stdout(predicate::str::contains("binary = \"go\""));
    }

    #[test]
    fn config_set_persists() {
        let ws = Workspace::new();
        ws.cmd()
            .args(["config", "set", "build.name", "payments"])
            .assert()
            .success();
        ws.cmd()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("name = \"payments\""));
    }

    #[test]
    fn config_set_unknown_key() {
        let ws = Workspace::new();
        ws.cmd()
            .args(["config", "set", "vm.cpus", "4"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown config key"));
    }

    #[test]
    fn show_requires_build_identity() {
        let ws = Workspace::new();
        ws.cmd()
            .args(["show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Build name and build number"));
    }

    #[test]
    fn show_unknown_build() {
        let ws = Workspace::new();
        ws.cmd()
            .args(["show", "--build-name", "app", "--build-number", "404"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("No build-info recorded for app/404"));
    }

    #[test]
    fn artifacts_require_build_identity() {
        let ws = Workspace::new();
        let file = ws.path().join("app");
        std::fs::write(&file, b"binary").unwrap();

        ws.cmd()
            .arg("artifacts")
            .arg(&file)
            .assert()
            .failure()
            .stderr(predicate::str::contains("in order to add artifacts"));
    }

    #[test]
    fn clean_without_recorded_build() {
        let ws = Workspace::new();
        ws.cmd()
            .args(["clean", "--yes", "--build-name", "app", "--build-number", "1"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No build-info recorded"));
    }

    #[test]
    fn go_outside_module_fails() {
        let ws = Workspace::new();
        ws.cmd()
            .args(["go", "--path"])
            .arg(ws.path())
            .args(["--", "build"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("go.mod"));
    }

    #[cfg(unix)]
    mod fake_go {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        const FAKE_GO: &str = r#"#!/bin/sh
case "$1" in
  build) echo "building $2" ;;
  vet) echo "vet: problems found" >&2; exit 3 ;;
  mod)
    echo "example.com/app example.com/lib@v1.0.0"
    echo "example.com/lib@v1.0.0 github.com/BurntSushi/toml@v1.3.2"
    echo "example.com/lib@v1.0.0 example.com/util@v0.2.0"
    ;;
  list)
    echo "example.com/app:"
    echo "example.com/lib:v1.0.0"
    echo "github.com/BurntSushi/toml:v1.3.2"
    echo "example.com/util:v0.2.0"
    ;;
  *) echo "unexpected: $*" >&2; exit 1 ;;
esac
"#;

        /// A Go module, a fake go binary and a download cache holding two of
        /// the three listed archives
        fn go_workspace() -> (Workspace, PathBuf) {
            let ws = Workspace::new();
            let root = ws.path();

            let go = root.join("go");
            std::fs::write(&go, FAKE_GO).unwrap();
            std::fs::set_permissions(&go, std::fs::Permissions::from_mode(0o755)).unwrap();

            let cache = root.join("cache");
            for (path, version) in [("example.com/lib", "v1.0.0"), ("github.com/!burnt!sushi/toml", "v1.3.2")] {
                let dir = cache.join(path).join("@v");
                std::fs::create_dir_all(&dir).unwrap();
                std::fs::write(dir.join(format!("{}.zip", version)), path.as_bytes()).unwrap();
            }

            let module = root.join("app");
            std::fs::create_dir_all(&module).unwrap();
            std::fs::write(module.join("go.mod"), "module example.com/app\n\ngo 1.22\n").unwrap();

            ws.write_config(&format!(
                "[go]\nbinary = {:?}\ncache_root = {:?}\n",
                go, cache
            ));
            (ws, module)
        }

        #[test]
        fn go_build_records_dependencies() {
            let (ws, module) = go_workspace();
            let build = ["--build-name", "app", "--build-number", "7"];

            ws.cmd()
                .args(["go", "--path"])
                .arg(&module)
                .args(build)
                .args(["--", "build", "./..."])
                .assert()
                .success()
                .stdout(predicate::str::contains("building ./..."))
                .stdout(predicate::str::contains("Recorded 2 dependencies"));

            ws.cmd()
                .arg("show")
                .args(build)
                .assert()
                .success()
                .stdout(predicate::str::contains("\"id\": \"example.com/app\""))
                .stdout(predicate::str::contains("example.com/lib:v1.0.0"))
                .stdout(predicate::str::contains("github.com/!burnt!sushi/toml:v1.3.2"))
                .stdout(predicate::str::contains("requestedBy"))
                .stdout(predicate::str::contains("example.com/util").not());
        }

        #[test]
        fn go_failure_propagates_exit_code() {
            let (ws, module) = go_workspace();

            ws.cmd()
                .args(["go", "--path"])
                .arg(&module)
                .args(["--build-name", "app", "--build-number", "8", "--", "vet"])
                .assert()
                .code(3)
                .stderr(predicate::str::contains("go vet failed with exit code 3"));

            ws.cmd()
                .args(["show", "--build-name", "app", "--build-number", "8"])
                .assert()
                .failure();
        }

        #[test]
        fn go_without_build_identity_records_nothing() {
            let (ws, module) = go_workspace();

            ws.cmd()
                .args(["go", "--path"])
                .arg(&module)
                .args(["--", "build", "./..."])
                .assert()
                .success()
                .stdout(predicate::str::contains("build-info not recorded"));
        }

        #[test]
        fn artifacts_then_clean() {
            let (ws, module) = go_workspace();
            let build = ["--build-name", "app", "--build-number", "9"];
            let binary = ws.path().join("app.bin");
            std::fs::write(&binary, b"hello").unwrap();

            ws.cmd()
                .args(["artifacts", "--path"])
                .arg(&module)
                .args(build)
                .arg(&binary)
                .assert()
                .success()
                .stdout(predicate::str::contains("Registered 1 artifact(s) for example.com/app"));

            ws.cmd()
                .arg("show")
                .args(build)
                .assert()
                .success()
                .stdout(predicate::str::contains("app.bin"))
                .stdout(predicate::str::contains("5d41402abc4b2a76b9719d911017c592"));

            ws.cmd()
                .arg("clean")
                .arg("--yes")
                .args(build)
                .assert()
                .success()
                .stdout(predicate::str::contains("Removed 1 partial(s)"));

            ws.cmd().arg("show").args(build).assert().failure();
        }
    }
}
