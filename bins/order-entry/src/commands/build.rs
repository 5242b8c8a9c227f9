//! Static build command

use super::{print_json, web_config};
use crate::{Context, OutputFormat};
use anyhow::Result;
use order_entry_cli::output::{format_count, format_size, Status, Table};
use order_entry_web::Mode;
use std::path::Path;

/// Build the front end and print what was emitted
pub fn run(ctx: &Context, config_path: Option<&Path>, production: bool) -> Result<()> {
    let mut config = web_config(ctx, config_path)?;
    if production {
        config.mode = Mode::Production;
    }

    let report = order_entry_web::build(&config)?;

    if ctx.format == OutputFormat::Json {
        return print_json(&report);
    }

    Status::header(&format!(
        "Build ({})",
        if report.production { "production" } else { "development" }
    ));

    let mut table = Table::new(["FILE", "SIZE"]);
    for file in &report.files {
        table.row([file.path.clone(), format_size(file.size)]);
    }
    table.print();

    println!();
    Status::success(&format!(
        "{} written to {} ({})",
        format_count(report.files.len(), "file", "files"),
        report.out_dir.display(),
        format_size(report.total_size)
    ));
    if report.skipped_maps > 0 {
        Status::info(&format!(
            "{} left out",
            format_count(report.skipped_maps, "source map", "source maps")
        ));
    }
    Ok(())
}
