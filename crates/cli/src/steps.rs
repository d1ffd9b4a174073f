//! `invmerge init | process | update-excel | validate`

use std::path::PathBuf;

use invmerge_inventory::{generate_pseudo_ids, reconcile, LogDiagnostics, Role};
use invmerge_io::{csv, xlsx};

use crate::workspace::Workspace;
use crate::CliError;

/// Result file timestamp, e.g. `result_2026-01-15_18-30-00.csv`.
const RESULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

/// Prepare the inventory export: add the actual-count column and generate
/// pseudo-IDs, then write the file back in place.
pub fn cmd_init(config_path: PathBuf) -> Result<(), CliError> {
    let workspace = Workspace::load(&config_path)?;
    let mut table = workspace.read_inventory()?;

    let actual = workspace.config.columns.column(Role::CountActual).to_string();
    if table.ensure_column(&actual) {
        log::debug!("added column '{actual}'");
    }

    let report = generate_pseudo_ids(&mut table, &workspace.config.columns, &mut LogDiagnostics)?;

    let path = workspace.inventory_path();
    csv::write_table(&path, &table.flatten()).map_err(CliError::io)?;

    log::info!(
        "created {} pseudo ID(s), skipped {} row(s); wrote {}",
        report.created,
        report.skipped,
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// process
// ---------------------------------------------------------------------------

/// Count the recorded scans, write them into the inventory and save a
/// timestamped result file. The inventory itself is not modified.
pub fn cmd_process(
    config_path: PathBuf,
    json_output: bool,
    output_dir: Option<PathBuf>,
) -> Result<(), CliError> {
    let workspace = Workspace::load(&config_path)?;

    let counts = workspace.recorded_counts()?;
    let mut table = workspace.read_inventory()?;

    workspace.report_counts(&counts);

    let report = reconcile(&mut table, &counts, &workspace.config.columns, &mut LogDiagnostics)?;

    let result_dir = output_dir.unwrap_or_else(|| workspace.working_dir().join("result"));
    std::fs::create_dir_all(&result_dir).map_err(|e| {
        CliError::io(format!("failed to create result directory {}: {e}", result_dir.display()))
    })?;

    let timestamp = chrono::Local::now().format(RESULT_TIMESTAMP_FORMAT);
    let result_path = result_dir.join(format!("result_{timestamp}.csv"));
    csv::write_table(&result_path, &table.flatten())
        .map_err(|e| CliError::io(format!("failed to write result csv: {e}")))?;

    if json_output {
        let recorded: serde_json::Map<String, serde_json::Value> = counts
            .iter()
            .map(|(id, n)| (id.to_string(), serde_json::Value::from(n)))
            .collect();
        let output = serde_json::json!({
            "result_file": result_path.display().to_string(),
            "recorded": recorded,
            "report": report,
        });
        let json_str = serde_json::to_string_pretty(&output)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    }

    log::info!(
        "{} recorded identifier(s): {} matched, {} unmatched; {} row(s) updated, {} capped",
        counts.len(),
        report.matched,
        report.unmatched.len(),
        report.updated_rows,
        report.capped_rows
    );
    log::info!("wrote {}", result_path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// update-excel
// ---------------------------------------------------------------------------

/// Write uncapped recorded counts into the configured Excel worksheet.
pub fn cmd_update_excel(config_path: PathBuf, output: Option<PathBuf>) -> Result<(), CliError> {
    let workspace = Workspace::load(&config_path)?;

    let (excel, input) = match (&workspace.config.excel, workspace.config.excel_path()) {
        (Some(excel), Some(path)) => (excel, path),
        _ => {
            return Err(CliError::args("no Excel file configured").with_hint(format!(
                "add an \"excel\" section to {}",
                workspace.config_path.display()
            )))
        }
    };

    let counts = workspace.recorded_counts()?;
    workspace.report_counts(&counts);

    let output = output.unwrap_or_else(|| input.clone());
    let result = xlsx::update_available_counts(
        &input,
        &output,
        &excel.worksheet_name,
        &excel.equipment_id_column_name,
        &excel.equipment_available_column_name,
        &counts,
    )
    .map_err(|e| CliError::io(format!("failed to update Excel file '{}': {e}", input.display())))?;

    log::info!("{}", result.summary());
    log::info!("Updated Excel file {} successfully.", output.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

/// Load and validate the config and show what the other commands would use.
pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let workspace = Workspace::load(&config_path)?;
    let config = &workspace.config;
    let inventory = workspace.inventory_path();

    println!("config:      {}", workspace.config_path.display());
    println!("working dir: {}", workspace.working_dir().display());
    println!(
        "inventory:   {}{}",
        inventory.display(),
        if inventory.is_file() { "" } else { " (missing)" }
    );
    for role in [
        Role::Layer,
        Role::PartNumber,
        Role::Id,
        Role::CountActual,
        Role::CountTarget,
    ] {
        let column = config.columns.column(role);
        if !column.is_empty() {
            println!("  {:<24} '{column}'", role.key());
        }
    }
    match config.excel_path() {
        Some(path) => println!("excel:       {}", path.display()),
        None => println!("excel:       not configured"),
    }

    eprintln!("config OK");
    Ok(())
}
