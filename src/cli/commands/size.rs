//! Size command - measure requested packages and print the table

use crate::bundle::EsbuildBundler;
use crate::cache::{CacheStore, SizeRecord};
use crate::cli::args::SizeArgs;
use crate::config::{Config, ConfigManager};
use crate::error::{PkgSizeError, PkgSizeResult};
use crate::install::NodeInstaller;
use crate::measure::{MeasureOptions, Measurement, Measurer};
use crate::ui::{self, MeasureProgress, SizeRow, UiContext};
use console::style;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tracing::debug;

/// Execute the size command
pub async fn execute(args: SizeArgs, config: &Config) -> PkgSizeResult<()> {
    let ctx = UiContext::detect();
    let options = build_options(&args, config)?;

    let store = Arc::new(CacheStore::new(ConfigManager::cache_file(config)));
    debug!("Size cache: {}", store.path().display());

    let measurer = Measurer::new(
        store,
        Arc::new(NodeInstaller::new(config.install.client)),
        Arc::new(EsbuildBundler::new(
            config.bundler.command.clone(),
            config.bundler.gzip_level,
        )),
        options,
    );

    // Spinners would interleave with debug logs
    let progress_ctx = if args.debug {
        UiContext::non_interactive()
    } else {
        ctx.clone()
    };
    let progress = MeasureProgress::new(&progress_ctx, &args.packages);

    let results = measurer
        .measure_all(&args.packages, |index, result| match result {
            Ok(m) => progress.finish_ok(index, &m.record, m.from_cache),
            Err(_) => progress.finish_error(index),
        })
        .await;
    progress.clear();

    report(&ctx, &args, &results).await
}

/// Merge CLI flags over config values
fn build_options(args: &SizeArgs, config: &Config) -> PkgSizeResult<MeasureOptions> {
    let cwd = std::env::current_dir()
        .map_err(|e| PkgSizeError::io("getting current directory", e))?;

    Ok(MeasureOptions {
        cwd,
        use_cwd: args.cwd,
        externals: args.externals.clone(),
        registry: args
            .registry
            .clone()
            .or_else(|| config.install.registry.clone()),
        no_cache: args.no_cache || !config.cache.enabled,
        debug: args.debug,
        analyze: args.analyze,
        ..MeasureOptions::default()
    })
}

/// Print the table, analysis and failures, and write `--output`
async fn report(
    ctx: &UiContext,
    args: &SizeArgs,
    results: &[PkgSizeResult<Measurement>],
) -> PkgSizeResult<()> {
    let mut rows: Vec<SizeRow> = args
        .packages
        .iter()
        .zip(results)
        .map(|(request, result)| match result {
            Ok(m) => SizeRow::Measured(m.record.clone()),
            Err(_) => SizeRow::Failed(request.clone()),
        })
        .collect();
    if args.sort {
        ui::sort_by_gzipped(&mut rows);
    }
    println!("{}", ui::render_table(&rows));

    for m in results.iter().flatten() {
        if let Some(ref analysis) = m.analysis {
            ui::block(ctx, &format!("Bundle analysis: {}", m.record.display_name()), analysis);
        }
    }

    if let Some(ref path) = args.output {
        let records: Vec<SizeRecord> = results
            .iter()
            .flatten()
            .map(|m| m.record.clone())
            .collect();
        write_output(path, &records).await?;
        ui::step_ok_detail(ctx, "Saved results", &path.display().to_string());
    }

    let failed = failures(ctx, args, results);
    if failed > 0 {
        return Err(PkgSizeError::User(format!(
            "{} of {} package(s) failed",
            failed,
            results.len()
        )));
    }
    Ok(())
}

/// Report each failed request on stderr, returning how many failed
fn failures(ctx: &UiContext, args: &SizeArgs, results: &[PkgSizeResult<Measurement>]) -> usize {
    let mut count = 0;
    for (request, result) in args.packages.iter().zip(results) {
        if let Err(e) = result {
            count += 1;
            ui::step_error_detail(ctx, request, &e.to_string());
            if let Some(hint) = e.hint() {
                eprintln!("  {} {}", style("Hint:").yellow(), hint);
            }
        }
    }
    count
}

async fn write_output(path: &Path, records: &[SizeRecord]) -> PkgSizeResult<()> {
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json)
        .await
        .map_err(|e| PkgSizeError::io(format!("writing results to {}", path.display()), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn measured(name: &str) -> PkgSizeResult<Measurement> {
        Ok(Measurement {
            record: SizeRecord {
                requested_name: name.to_string(),
                resolved_name: Some(format!("{}@1.0.0", name)),
                raw_size: 300,
                minified_size: 200,
                gzipped_size: 100,
            },
            from_cache: false,
            analysis: None,
        })
    }

    #[test]
    fn flags_override_config() {
        let mut config = Config::default();
        config.install.registry = Some("https://config.example.com".to_string());

        let args = SizeArgs {
            registry: Some("https://flag.example.com".to_string()),
            ..SizeArgs::default()
        };
        let options = build_options(&args, &config).unwrap();
        assert_eq!(options.registry.as_deref(), Some("https://flag.example.com"));
        assert!(!options.no_cache);

        let options = build_options(&SizeArgs::default(), &config).unwrap();
        assert_eq!(
            options.registry.as_deref(),
            Some("https://config.example.com")
        );
    }

    #[test]
    fn disabled_cache_forces_no_cache() {
        let mut config = Config::default();
        config.cache.enabled = false;
        let options = build_options(&SizeArgs::default(), &config).unwrap();
        assert!(options.no_cache);
        assert!(options.bypass_cache_read());
    }

    #[tokio::test]
    async fn output_file_lists_successful_records() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.json");
        let args = SizeArgs {
            packages: vec!["vue".to_string(), "broken".to_string()],
            output: Some(path.clone()),
            ..SizeArgs::default()
        };
        let results = vec![
            measured("vue"),
            Err(PkgSizeError::Build("Module not found".to_string())),
        ];

        let err = report(&UiContext::non_interactive(), &args, &results)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "1 of 2 package(s) failed");

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let entries = written.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["name"], "vue");
        assert_eq!(entries[0]["gzipped"], 100);
    }

    #[tokio::test]
    async fn all_successful_is_ok() {
        let args = SizeArgs {
            packages: vec!["vue".to_string()],
            sort: true,
            ..SizeArgs::default()
        };
        report(&UiContext::non_interactive(), &args, &[measured("vue")])
            .await
            .unwrap();
    }
}
