use std::{fs, path::PathBuf};

use crate::cli::core::{usage, CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::core::services::{CsvShape, ExportRows, ExportService};

const EXPORT_USAGE: &str = "export <history|report> [path]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "export",
        "Write all history, or the current report, as CSV",
        EXPORT_USAGE,
        cmd_export,
    )]
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (shape, target) = match args {
        [shape] => (parse_shape(shape)?, None),
        [shape, path] => (parse_shape(shape)?, Some(PathBuf::from(path))),
        _ => return Err(usage(EXPORT_USAGE)),
    };

    let (csv, row_count, file_name) = match shape {
        CsvShape::History => {
            // History exports ignore the list filters and sort.
            let rows = context.ledger.merged_view();
            let rows = ExportRows::History(&rows);
            (ExportService::to_csv(rows), rows.len(), shape.file_name(None))
        }
        CsvShape::Report => {
            let spec = context.view.report_spec();
            let aggregates = context.ledger.category_aggregates(&spec);
            let rows = ExportRows::Report(&aggregates);
            (
                ExportService::to_csv(rows),
                rows.len(),
                shape.file_name(spec.month.as_ref()),
            )
        }
    };

    if row_count == 0 {
        output::warning("Nothing to export for the current selection.");
        return Ok(());
    }

    let path = target.unwrap_or_else(|| PathBuf::from(file_name));
    fs::write(&path, csv)?;
    output::success(format!("Exported {row_count} rows to {}", path.display()));
    Ok(())
}

fn parse_shape(raw: &str) -> Result<CsvShape, CommandError> {
    match raw.to_ascii_lowercase().as_str() {
        "history" => Ok(CsvShape::History),
        "report" => Ok(CsvShape::Report),
        _ => Err(usage(EXPORT_USAGE)),
    }
}
