//! Integration tests for package-size

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// Binary with config and cache redirected into `home`
    fn package_size(home: &Path) -> Command {
        let mut cmd = cargo_bin_cmd!("package-size");
        cmd.env("PACKAGE_SIZE_CONFIG", home.join("config.toml"))
            .env("PACKAGE_SIZE_CACHE_DIR", home.join("cache"))
            .env("CI", "true");
        cmd
    }

    /// `node_modules/<name>/package.json` under `dir`
    fn install_fake(dir: &Path, name: &str, version: &str) {
        let pkg = dir.join("node_modules").join(name);
        fs::create_dir_all(&pkg).unwrap();
        fs::write(
            pkg.join("package.json"),
            format!(r#"{{"name":"{}","version":"{}"}}"#, name, version),
        )
        .unwrap();
    }

    /// Seed the cache with the sizes of vue 2.0.0
    fn seed_vue_cache(home: &Path) {
        let cache = home.join("cache");
        fs::create_dir_all(&cache).unwrap();
        fs::write(
            cache.join("cache.json"),
            r#"{
  "version": 1,
  "entries": {
    "vue:2-0-0": {
      "name": "vue",
      "versionedName": "vue@2.0.0",
      "size": 189570,
      "minified": 74576,
      "gzipped": 27267
    }
  }
}"#,
        )
        .unwrap();
    }

    /// Point the bundler at a binary that does not exist
    fn break_bundler(home: &Path) {
        fs::write(
            home.join("config.toml"),
            "[bundler]\ncommand = \"package-size-missing-esbuild\"\n",
        )
        .unwrap();
    }

    #[test]
    fn help_displays() {
        let home = TempDir::new().unwrap();
        package_size(home.path())
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("measure the bundled cost"));
    }

    #[test]
    fn version_displays() {
        let home = TempDir::new().unwrap();
        package_size(home.path())
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("package-size"));
    }

    #[test]
    fn no_packages_prints_help() {
        let home = TempDir::new().unwrap();
        package_size(home.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage"));
    }

    #[test]
    fn config_path() {
        let home = TempDir::new().unwrap();
        package_size(home.path())
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let home = TempDir::new().unwrap();
        package_size(home.path())
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[bundler]"));
    }

    #[test]
    fn config_set_then_show() {
        let home = TempDir::new().unwrap();
        package_size(home.path())
            .args(["config", "set", "bundler.gzip_level", "6"])
            .assert()
            .success();

        package_size(home.path())
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("gzip_level = 6"));
    }

    #[test]
    fn config_set_unknown_key() {
        let home = TempDir::new().unwrap();
        package_size(home.path())
            .args(["config", "set", "vm.name", "x"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown config key"));
    }

    #[test]
    fn completions_bash() {
        let home = TempDir::new().unwrap();
        package_size(home.path())
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("package-size"));
    }

    #[test]
    fn clear_cache_removes_entries() {
        let home = TempDir::new().unwrap();
        seed_vue_cache(home.path());

        package_size(home.path())
            .arg("clear-cache")
            .assert()
            .success()
            .stdout(predicate::str::contains("Done!"))
            .stdout(predicate::str::contains("Cleared 1 cached"));

        assert!(!home.path().join("cache").join("cache.json").exists());
    }

    #[test]
    fn clear_cache_when_empty() {
        let home = TempDir::new().unwrap();
        package_size(home.path())
            .arg("clear-cache")
            .assert()
            .success()
            .stdout(predicate::str::contains("Cleared 0 cached"));
    }

    #[test]
    fn cached_sizes_skip_bundling() {
        let home = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        seed_vue_cache(home.path());
        break_bundler(home.path());
        install_fake(project.path(), "vue", "2.0.0");

        package_size(home.path())
            .current_dir(project.path())
            .args(["--cwd", "vue", "--output"])
            .assert()
            .success()
            .stdout(predicate::str::contains("vue@2.0.0"))
            .stdout(predicate::str::contains("gzipped"));

        let written = fs::read_to_string(project.path().join("package-size-output.json")).unwrap();
        let records: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(records[0]["gzipped"], 27267);
        assert_eq!(records[0]["minified"], 74576);
        assert_eq!(records[0]["size"], 189570);
    }

    #[test]
    fn no_cache_forces_a_build() {
        let home = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        seed_vue_cache(home.path());
        break_bundler(home.path());
        install_fake(project.path(), "vue", "2.0.0");

        package_size(home.path())
            .current_dir(project.path())
            .args(["--cwd", "--no-cache", "vue"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("package-size-missing-esbuild"))
            .stderr(predicate::str::contains("1 of 1 package(s) failed"));
    }

    #[test]
    fn missing_bundler_reports_failure() {
        let home = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        break_bundler(home.path());
        install_fake(project.path(), "left-pad", "1.3.0");

        package_size(home.path())
            .current_dir(project.path())
            .args(["--cwd", "left-pad"])
            .assert()
            .failure()
            .stdout(predicate::str::contains("failed"))
            .stderr(predicate::str::contains("Required CLI not found"))
            .stderr(predicate::str::contains("npm install -g esbuild"))
            .stderr(predicate::str::contains("Hint:").not());

        // Nothing is cached for a failed build
        assert!(!home.path().join("cache").join("cache.json").exists());
    }

    #[test]
    fn invalid_specifier_fails() {
        let home = TempDir::new().unwrap();
        package_size(home.path())
            .arg(",")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid package specifier"));
    }

    #[test]
    fn invalid_config_is_reported() {
        let home = TempDir::new().unwrap();
        fs::write(home.path().join("config.toml"), "[cache]\nenabled = \"maybe\"\n").unwrap();

        package_size(home.path())
            .arg("clear-cache")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"))
            .stderr(predicate::str::contains("config init --force"));

        package_size(home.path())
            .args(["config", "init", "--force"])
            .assert()
            .success();
    }
}
