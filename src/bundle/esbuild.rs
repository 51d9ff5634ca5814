//! esbuild-backed bundler
//!
//! Writes a synthetic entry that requires every requested module, runs the
//! esbuild CLI with a metafile, and reads asset sizes from it. Bare imports
//! resolve through `NODE_PATH`, which esbuild honors like Node does.

use super::{
    build_error_output, Asset, BuildConfig, BuildMode, BuildStats, Bundler, GZIP_ASSET,
    MAIN_ASSET,
};
use crate::error::{PkgSizeError, PkgSizeResult};
use async_trait::async_trait;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::process::Stdio;
use tokio::fs;
use tokio::process::Command;
use tracing::debug;

/// Subset of esbuild's metafile we read
#[derive(Debug, Deserialize)]
struct Metafile {
    outputs: BTreeMap<String, MetafileOutput>,
}

#[derive(Debug, Deserialize)]
struct MetafileOutput {
    bytes: u64,
}

/// Bundler running the esbuild CLI
pub struct EsbuildBundler {
    command: String,
    gzip_level: u32,
}

impl EsbuildBundler {
    /// Create a bundler invoking `command` and gzipping at `gzip_level` (0-9)
    pub fn new(command: impl Into<String>, gzip_level: u32) -> Self {
        Self {
            command: command.into(),
            gzip_level: gzip_level.min(9),
        }
    }

    /// Entry module source: keep every export reachable so nothing is shaken out
    fn entry_source(entries: &[String]) -> String {
        entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                // JSON string literals are valid JS string literals
                let literal = serde_json::Value::String(entry.clone()).to_string();
                format!("globalThis.__package_size_{} = require({});\n", i, literal)
            })
            .collect()
    }

    /// CLI arguments for one build
    fn build_args(config: &BuildConfig, out_dir: &Path) -> Vec<String> {
        let mut args = vec![
            out_dir.join("entry.js").display().to_string(),
            "--bundle".to_string(),
            "--format=iife".to_string(),
            "--platform=browser".to_string(),
            format!("--outfile={}", out_dir.join(MAIN_ASSET).display()),
            format!("--metafile={}", out_dir.join("meta.json").display()),
            format!(
                "--define:process.env.NODE_ENV=\"{}\"",
                config.mode.node_env()
            ),
        ];

        if config.mode == BuildMode::Production {
            args.push("--minify".to_string());
            args.push("--legal-comments=none".to_string());
        }

        if config.analyze && config.mode == BuildMode::Production {
            args.push("--analyze".to_string());
            args.push("--log-level=info".to_string());
        } else {
            args.push("--log-level=error".to_string());
        }

        for external in &config.externals {
            args.push(format!("--external:{}", external));
        }

        args
    }

    /// Asset list from a metafile
    fn parse_metafile(content: &str) -> PkgSizeResult<Vec<Asset>> {
        let meta: Metafile = serde_json::from_str(content)?;
        Ok(meta
            .outputs
            .into_iter()
            .map(|(path, output)| Asset {
                name: Path::new(&path)
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or(path),
                size: output.bytes,
            })
            .collect())
    }

    /// Size of `data` after gzip at `level`
    fn gzip_size(data: &[u8], level: u32) -> std::io::Result<u64> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::new(level));
        encoder.write_all(data)?;
        let compressed = encoder.finish()?;
        Ok(compressed.len() as u64)
    }
}

impl Default for EsbuildBundler {
    fn default() -> Self {
        Self::new("esbuild", 9)
    }
}

#[async_trait]
impl Bundler for EsbuildBundler {
    async fn build(&self, config: &BuildConfig) -> PkgSizeResult<BuildStats> {
        let out_dir = config.work_dir.join(config.mode.dir_name());
        fs::create_dir_all(&out_dir)
            .await
            .map_err(|e| PkgSizeError::io(format!("creating {}", out_dir.display()), e))?;

        fs::write(out_dir.join("entry.js"), Self::entry_source(&config.entries))
            .await
            .map_err(|e| PkgSizeError::io("writing bundle entry", e))?;

        let args = Self::build_args(config, &out_dir);
        debug!("Executing: {} {:?}", self.command, args);

        let output = Command::new(&self.command)
            .args(&args)
            .current_dir(&out_dir)
            .env("NODE_PATH", &config.modules_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    PkgSizeError::CliNotFound {
                        name: self.command.clone(),
                        hint: "Run: npm install -g esbuild".to_string(),
                    }
                } else {
                    PkgSizeError::command_failed(&self.command, e)
                }
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            debug!("{} build failed", config.mode);
            return Ok(BuildStats {
                errors: vec![build_error_output(&stdout, &stderr)],
                ..Default::default()
            });
        }

        let meta = fs::read_to_string(out_dir.join("meta.json"))
            .await
            .map_err(|e| PkgSizeError::io("reading esbuild metafile", e))?;
        let mut assets = Self::parse_metafile(&meta)?;

        if config.mode == BuildMode::Production {
            let bundle = fs::read(out_dir.join(MAIN_ASSET))
                .await
                .map_err(|e| PkgSizeError::io("reading production bundle", e))?;
            let size = Self::gzip_size(&bundle, self.gzip_level)
                .map_err(|e| PkgSizeError::io("gzipping production bundle", e))?;
            assets.push(Asset {
                name: GZIP_ASSET.to_string(),
                size,
            });
        }

        let analysis = if config.analyze && config.mode == BuildMode::Production {
            Some(stderr.trim().to_string()).filter(|s| !s.is_empty())
        } else {
            None
        };

        Ok(BuildStats {
            assets,
            errors: Vec::new(),
            analysis,
        })
    }

    fn bundler_name(&self) -> &'static str {
        "esbuild"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config(mode: BuildMode) -> BuildConfig {
        BuildConfig {
            entries: vec!["vue".to_string(), "lodash/debounce".to_string()],
            modules_dir: PathBuf::from("/scratch/node_modules"),
            work_dir: PathBuf::from("/scratch"),
            externals: vec!["react".to_string()],
            mode,
            analyze: false,
        }
    }

    #[test]
    fn entry_requires_every_module() {
        let source = EsbuildBundler::entry_source(&["vue".to_string(), "a\"b".to_string()]);
        assert_eq!(
            source,
            "globalThis.__package_size_0 = require(\"vue\");\nglobalThis.__package_size_1 = require(\"a\\\"b\");\n"
        );
    }

    #[test]
    fn development_args() {
        let out = PathBuf::from("/scratch/dev");
        let args = EsbuildBundler::build_args(&config(BuildMode::Development), &out);

        assert!(args.contains(&"--bundle".to_string()));
        assert!(args.contains(&"--define:process.env.NODE_ENV=\"development\"".to_string()));
        assert!(args.contains(&"--external:react".to_string()));
        assert!(!args.contains(&"--minify".to_string()));
        assert!(args.contains(&format!("--outfile={}", out.join("main.js").display())));
    }

    #[test]
    fn production_args_minify() {
        let out = PathBuf::from("/scratch/prod");
        let args = EsbuildBundler::build_args(&config(BuildMode::Production), &out);

        assert!(args.contains(&"--minify".to_string()));
        assert!(args.contains(&"--define:process.env.NODE_ENV=\"production\"".to_string()));
        assert!(!args.contains(&"--analyze".to_string()));
    }

    #[test]
    fn analyze_only_on_production() {
        let mut cfg = config(BuildMode::Development);
        cfg.analyze = true;
        let out = PathBuf::from("/scratch/x");

        let dev = EsbuildBundler::build_args(&cfg, &out);
        assert!(!dev.contains(&"--analyze".to_string()));

        let prod = EsbuildBundler::build_args(&cfg.with_mode(BuildMode::Production), &out);
        assert!(prod.contains(&"--analyze".to_string()));
    }

    #[test]
    fn metafile_outputs_become_assets() {
        let assets = EsbuildBundler::parse_metafile(
            r#"{"inputs":{},"outputs":{"main.js":{"bytes":74576,"inputs":{},"imports":[],"exports":[]}}}"#,
        )
        .unwrap();

        assert_eq!(
            assets,
            vec![Asset {
                name: "main.js".to_string(),
                size: 74576
            }]
        );
    }

    #[test]
    fn gzip_shrinks_repetitive_input() {
        let data = "function noop(){}".repeat(1000);
        let size = EsbuildBundler::gzip_size(data.as_bytes(), 9).unwrap();
        assert!(size > 0);
        assert!(size < data.len() as u64 / 10);
    }

    #[test]
    fn gzip_level_is_clamped() {
        let bundler = EsbuildBundler::new("esbuild", 42);
        assert_eq!(bundler.gzip_level, 9);
    }

    #[tokio::test]
    async fn missing_binary_is_reported() {
        let temp = tempfile::TempDir::new().unwrap();
        let bundler = EsbuildBundler::new("package-size-no-such-bundler", 9);
        let mut cfg = config(BuildMode::Development);
        cfg.work_dir = temp.path().to_path_buf();

        let err = bundler.build(&cfg).await.unwrap_err();
        assert!(matches!(err, PkgSizeError::CliNotFound { .. }));
    }
}
