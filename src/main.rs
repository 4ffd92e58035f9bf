// src/main.rs
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use anyhow::{Context, Result};
use clap::Parser;
use framescope::channel::ColumnIssue;
use framescope::export::save_csv;
use framescope::render::{launch, save_snapshot, RenderStyle};
use framescope::{process_file, ScopeConfig};
use log::{error, info, warn};
#[derive(Parser, Debug)]
#[command(
    name = "framescope",
    version,
    about = "Decode a framed telemetry capture and browse it in linked charts"
)]
struct Args {
    /// Binary capture of little-endian int16 frames.
    input: PathBuf,
    /// JSON channel and display configuration.
    #[arg(default_value = "config/data_config.json")]
    config: PathBuf,
}
fn run(args: Args) -> Result<()> {
    let Args {
        input,
        config: config_path,
    } = args;
    let config = ScopeConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    let capture = process_file(&config, &input)
        .with_context(|| format!("processing {}", input.display()))?;
    let decode = &capture.decode;
    info!(
        "frames: {} total, {} valid, {} in window",
        decode.total_frames, decode.valid_frames, decode.windowed_frames
    );
    for issue in &capture.build.issues {
        match issue {
            ColumnIssue::TransformFailure { column, key, .. } => {
                warn!("column '{column}' kept untransformed (transform '{key}')")
            }
            ColumnIssue::ExpressionFailure {
                column, expression, ..
            } => warn!("column '{column}' zero-filled (expression '{expression}')"),
        }
    }
    let table = capture.table;
    info!(
        "table ready: {} rows, columns: {}",
        table.len(),
        table.column_names().join(", ")
    );
    let draw = &config.draw_config;
    if let Some(csv_path) = &draw.csv_path {
        save_csv(&table, csv_path)?;
    }
    let style = RenderStyle {
        window_title: format!("framescope - {}", input.display()),
        ..RenderStyle::default()
    };
    if table.is_empty() || draw.column_groups.is_empty() {
        warn!("nothing to plot");
        return Ok(());
    }
    if let Some(dir) = &draw.snapshot_dir {
        save_snapshot(&table, draw, &style, dir, &capture_stem(&input))?;
    }
    launch(table, draw, style)?;
    Ok(())
}
fn capture_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "capture".to_string())
}
/// Frame and row counts are logged at info and must show without RUST_LOG.
const DEFAULT_LOG_FILTER: &str = "info";
fn logger(env: env_logger::Env<'_>) -> env_logger::Builder {
    env_logger::Builder::from_env(env.default_filter_or(DEFAULT_LOG_FILTER))
}
fn main() -> ExitCode {
    logger(env_logger::Env::default()).init();
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn config_path_defaults_when_omitted() {
        let args = Args::try_parse_from(["framescope", "run.dat"]).unwrap();
        assert_eq!(args.input, PathBuf::from("run.dat"));
        assert_eq!(args.config, PathBuf::from("config/data_config.json"));
        let args = Args::try_parse_from(["framescope", "run.dat", "alt.json"]).unwrap();
        assert_eq!(args.config, PathBuf::from("alt.json"));
    }
    #[test]
    fn capture_path_is_required() {
        assert!(Args::try_parse_from(["framescope"]).is_err());
    }
    #[test]
    fn stage_counts_are_logged_by_default() {
        let logger = logger(env_logger::Env::new().filter("FRAMESCOPE_TEST_UNSET_FILTER")).build();
        assert_eq!(logger.filter(), log::LevelFilter::Info);
    }
    #[test]
    fn snapshot_stem_follows_capture_name() {
        assert_eq!(capture_stem(Path::new("logs/flight_07.dat")), "flight_07");
        assert_eq!(capture_stem(Path::new("/")), "capture");
    }
}
