//! Size measurement pipeline
//!
//! For each requested package group:
//! 1. install into a scratch project (skipped for `--cwd` and local paths)
//! 2. read installed manifests for exact versions and peer dependencies
//! 3. derive the cache key from the resolved versions
//! 4. serve a cached record unless a bypass flag is set
//! 5. otherwise run the development and production builds concurrently
//! 6. write the fresh record back, only when both builds succeeded

use crate::bundle::{BuildConfig, BuildMode, BuildStats, Bundler, GZIP_ASSET, MAIN_ASSET};
use crate::cache::{CacheKey, CacheStore, SizeRecord};
use crate::error::{PkgSizeError, PkgSizeResult};
use crate::install::{Installer, ScratchDir};
use crate::package::{PackageManifest, PackageSpec};
use futures_util::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Per-run measurement switches
#[derive(Debug, Clone)]
pub struct MeasureOptions {
    /// Directory `--cwd` and local paths resolve against
    pub cwd: PathBuf,
    /// Resolve from `<cwd>/node_modules` instead of installing
    pub use_cwd: bool,
    /// Extra modules to leave out of the bundle
    pub externals: Vec<String>,
    /// Registry URL for the installer
    pub registry: Option<String>,
    /// Skip cache reads
    pub no_cache: bool,
    /// Debug mode: skip cache reads, keep scratch dirs
    pub debug: bool,
    /// Analyze mode: skip cache reads, request a module breakdown
    pub analyze: bool,
    /// Where scratch projects are created
    pub scratch_root: PathBuf,
}

impl MeasureOptions {
    /// Whether cached records may be served
    pub fn bypass_cache_read(&self) -> bool {
        self.no_cache || self.debug || self.analyze
    }
}

impl Default for MeasureOptions {
    fn default() -> Self {
        Self {
            cwd: PathBuf::from("."),
            use_cwd: false,
            externals: Vec::new(),
            registry: None,
            no_cache: false,
            debug: false,
            analyze: false,
            scratch_root: std::env::temp_dir(),
        }
    }
}

/// A package resolved to its installed version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPackage {
    pub name: String,
    /// Installed version, empty when unknown
    pub version: String,
    pub peer_dependencies: Vec<String>,
}

impl ResolvedPackage {
    /// `name@version`, or just `name` when the version is unknown
    pub fn versioned_name(&self) -> String {
        if self.version.is_empty() {
            self.name.clone()
        } else {
            format!("{}@{}", self.name, self.version)
        }
    }
}

/// Outcome of one measured group
#[derive(Debug, Clone)]
pub struct Measurement {
    pub record: SizeRecord,
    /// Served from the cache without bundling
    pub from_cache: bool,
    /// Bundler module breakdown, in analyze mode
    pub analysis: Option<String>,
}

/// Runs the resolve -> cache -> build pipeline
pub struct Measurer {
    store: Arc<CacheStore>,
    installer: Arc<dyn Installer>,
    bundler: Arc<dyn Bundler>,
    options: MeasureOptions,
}

impl Measurer {
    pub fn new(
        store: Arc<CacheStore>,
        installer: Arc<dyn Installer>,
        bundler: Arc<dyn Bundler>,
        options: MeasureOptions,
    ) -> Self {
        Self {
            store,
            installer,
            bundler,
            options,
        }
    }

    /// Measure every group concurrently. Failures stay per group.
    ///
    /// `on_done` sees each result as soon as its group finishes, with the
    /// group's index in `requests`.
    pub async fn measure_all<F>(
        &self,
        requests: &[String],
        on_done: F,
    ) -> Vec<PkgSizeResult<Measurement>>
    where
        F: Fn(usize, &PkgSizeResult<Measurement>),
    {
        let on_done = &on_done;
        join_all(requests.iter().enumerate().map(|(index, request)| async move {
            let result = self.measure(request).await;
            on_done(index, &result);
            result
        }))
        .await
    }

    /// Measure one comma-joined package group
    pub async fn measure(&self, request: &str) -> PkgSizeResult<Measurement> {
        let specs = PackageSpec::parse_group(request)?;
        let has_local_file = specs.iter().any(PackageSpec::is_local);
        let from_cwd = self.options.use_cwd || has_local_file;

        let mut scratch = ScratchDir::create(&self.options.scratch_root).await?;
        if self.options.debug {
            scratch.keep();
        }

        let modules_dir = if from_cwd {
            self.options.cwd.join("node_modules")
        } else {
            let targets: Vec<String> = specs.iter().map(PackageSpec::install_target).collect();
            self.installer
                .install(&targets, scratch.path(), self.options.registry.as_deref())
                .await?;
            scratch.modules_dir()
        };

        let resolved = resolve(&specs, &modules_dir).await;
        // Sub-path imports bundle different code than the package root
        let key_parts: Vec<(String, &str)> = specs
            .iter()
            .zip(&resolved)
            .map(|(spec, p)| (spec.import_path(), p.version.as_str()))
            .collect();
        let key = CacheKey::derive(key_parts.iter().map(|(name, v)| (name.as_str(), *v)));
        debug!(
            "Cache key for {}: {} (externals are not part of the key)",
            request, key
        );

        // Local files have no version to key on
        let cacheable = !has_local_file;

        if cacheable && !self.options.bypass_cache_read() && self.store.has(key.as_str()).await {
            if let Some(record) = self.store.get(key.as_str()).await {
                info!("Using cached sizes for {}", key);
                return Ok(Measurement {
                    record,
                    from_cache: true,
                    analysis: None,
                });
            }
        }

        let dev_config = BuildConfig {
            entries: specs.iter().map(|s| self.entry_for(s)).collect(),
            modules_dir,
            work_dir: scratch.path().to_path_buf(),
            externals: self.externals_for(&specs, &resolved),
            mode: BuildMode::Development,
            analyze: self.options.analyze,
        };
        let prod_config = dev_config.with_mode(BuildMode::Production);

        info!(
            "Bundling {} with {}",
            request,
            self.bundler.bundler_name()
        );
        let (dev, prod) = tokio::try_join!(
            self.bundler.build(&dev_config),
            self.bundler.build(&prod_config)
        )?;

        let record = SizeRecord {
            requested_name: request.to_string(),
            resolved_name: Some(
                resolved
                    .iter()
                    .map(ResolvedPackage::versioned_name)
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            raw_size: asset_size(request, &dev, MAIN_ASSET)?,
            minified_size: asset_size(request, &prod, MAIN_ASSET)?,
            gzipped_size: asset_size(request, &prod, GZIP_ASSET)?,
        };

        if cacheable {
            if let Err(e) = self.store.set(key.as_str(), record.clone()).await {
                warn!("Failed to cache sizes for {}: {}", key, e);
            }
        }

        Ok(Measurement {
            record,
            from_cache: false,
            analysis: prod.analysis,
        })
    }

    /// Import path of a spec as the bundle entry sees it
    fn entry_for(&self, spec: &PackageSpec) -> String {
        if spec.is_local() {
            self.options.cwd.join(&spec.name).display().to_string()
        } else {
            spec.import_path()
        }
    }

    /// User externals plus peers of the requested packages, minus the
    /// requested packages themselves
    fn externals_for(&self, specs: &[PackageSpec], resolved: &[ResolvedPackage]) -> Vec<String> {
        let mut externals: Vec<String> = Vec::new();
        let peers = resolved.iter().flat_map(|p| p.peer_dependencies.iter());

        for name in self.options.externals.iter().chain(peers) {
            if specs.iter().any(|s| &s.name == name) || externals.contains(name) {
                continue;
            }
            externals.push(name.clone());
        }
        externals
    }
}

/// Read the installed version of every non-local spec
async fn resolve(specs: &[PackageSpec], modules_dir: &Path) -> Vec<ResolvedPackage> {
    let reads = specs.iter().map(|spec| async move {
        if spec.is_local() {
            return ResolvedPackage {
                name: spec.name.clone(),
                version: String::new(),
                peer_dependencies: Vec::new(),
            };
        }

        let manifest = PackageManifest::read(modules_dir, &spec.name).await;
        if manifest.version.is_empty() {
            debug!("No installed version found for {}", spec.name);
        }
        ResolvedPackage {
            name: spec.name.clone(),
            version: manifest.version,
            peer_dependencies: manifest.peer_dependencies,
        }
    });

    join_all(reads).await
}

/// Byte size of `asset`, failing on build errors or a missing asset
fn asset_size(request: &str, stats: &BuildStats, asset: &str) -> PkgSizeResult<u64> {
    if stats.has_errors() {
        return Err(PkgSizeError::Build(stats.error_text()));
    }
    stats
        .asset_size(asset)
        .ok_or_else(|| PkgSizeError::MissingAsset {
            request: request.to_string(),
            asset: asset.to_string(),
        })
}
