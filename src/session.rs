use std::path::Path;
use crate::channel::{build_table, BuildReport, TimeSeriesTable};
use crate::config::ScopeConfig;
use crate::decoder::{decode, read_capture, DecodeReport, FrameLayout, TimeWindow};
use crate::error::ScopeError;
/// Everything one run produces before presentation.
#[derive(Clone, Debug)]
pub struct ProcessedCapture {
    pub table: TimeSeriesTable,
    pub decode: DecodeReport,
    pub build: BuildReport,
}
pub fn process_file(
    config: &ScopeConfig,
    path: impl AsRef<Path>,
) -> Result<ProcessedCapture, ScopeError> {
    let samples = read_capture(path)?;
    process_samples(config, &samples)
}
/// Decode `samples`, build the channel table and check every plotted column exists.
pub fn process_samples(
    config: &ScopeConfig,
    samples: &[i16],
) -> Result<ProcessedCapture, ScopeError> {
    let layout = FrameLayout::new(config.frame_size(), config.header()?, config.tail()?);
    let window = TimeWindow::new(config.draw_config.start_time, config.draw_config.end_time);
    let frames = decode(samples, &layout, config.settings.fs, window)?;
    let (table, build) = build_table(&frames, &config.raw_columns(), &config.channels_config)?;
    table.validate_plot_columns(&config.draw_config.column_groups)?;
    Ok(ProcessedCapture {
        table,
        decode: frames.report,
        build,
    })
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ColumnIssue;
    fn config(groups: &str) -> ScopeConfig {
        ScopeConfig::from_json(&format!(
            r#"{{
                "settings": {{ "fs": 100, "header": "0xAA", "tail": "0x55" }},
                "channels_config": [
                    {{ "source": "x", "transform": "centi" }},
                    {{ "source": "y", "filter_vals": [-1] }},
                    {{ "source": "z", "transform": "bogus" }},
                    {{ "source": {{ "expression": "x - y", "name": "diff" }} }}
                ],
                "draw_config": {{ "start_time": 0, "end_time": 0.03, "column_groups": {groups} }}
            }}"#
        ))
        .unwrap()
    }
    fn capture() -> Vec<i16> {
        let mut samples = Vec::new();
        for (i, y) in [5, -1, 7, 8, 9, 10].into_iter().enumerate() {
            samples.extend([0xAA, 100 * (i as i16 + 1), y, 3, 0x55]);
        }
        // Corrupt header on a seventh frame plus a dangling partial frame.
        samples.extend([0x00, 1, 1, 1, 0x55, 0xAA, 1]);
        samples
    }
    #[test]
    fn end_to_end_processing() {
        let result = process_samples(&config(r#"[{"columns": ["x", "diff"]}]"#), &capture()).unwrap();
        assert_eq!(
            result.decode,
            DecodeReport {
                total_frames: 7,
                valid_frames: 6,
                windowed_frames: 4
            }
        );
        assert_eq!(result.build.rows_before_filter, 4);
        assert_eq!(result.build.rows_after_filter, 3);
        assert_eq!(result.table.column("x").unwrap(), &[1.0, 3.0, 4.0]);
        assert_eq!(result.table.column("diff").unwrap(), &[95.0, 293.0, 392.0]);
        assert_eq!(result.table.column("z").unwrap(), &[3.0, 3.0, 3.0]);
        assert!(matches!(
            &result.build.issues[..],
            [ColumnIssue::TransformFailure { column, .. }] if column == "z"
        ));
    }
    #[test]
    fn missing_plot_column_is_fatal() {
        let err = process_samples(&config(r#"[{"columns": ["x", "w"]}]"#), &capture()).unwrap_err();
        assert!(matches!(err, ScopeError::ConfigColumnMissing(name) if name == "w"));
    }
}
