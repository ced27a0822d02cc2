//! Terminal summary tables for stage results.

use std::path::PathBuf;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use ahcah_cli::types::{CleanResult, RedactResult, RunResult, StandardizeResult};

pub fn print_redact_summary(result: &RedactResult) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Masked"),
        header_cell("Output"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Center);
    let mut total_masked = 0usize;
    for file in &result.files {
        total_masked += file.masked;
        table.add_row(vec![
            Cell::new(&file.source),
            count_cell(file.masked, Color::Green),
            output_cell(file.output.as_ref()),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        count_cell(total_masked, Color::Green).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");
    print_errors(&result.errors);
}

pub fn print_standardize_summary(result: &StandardizeResult) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Dataset"),
        header_cell("Rows in"),
        header_cell("Rows out"),
        header_cell("No CCN"),
        header_cell("Testing"),
        header_cell("Date nulls"),
        header_cell("Output"),
    ]);
    apply_table_style(&mut table);
    for index in 2..=6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    align_column(&mut table, 7, CellAlignment::Center);
    let mut totals = [0usize; 5];
    for file in &result.files {
        totals[0] += file.rows_in;
        totals[1] += file.rows_out;
        totals[2] += file.missing_ccn;
        totals[3] += file.testing_excluded;
        totals[4] += file.date_nulls;
        table.add_row(vec![
            Cell::new(&file.source),
            Cell::new(&file.dataset)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(file.rows_in),
            Cell::new(file.rows_out),
            count_cell(file.missing_ccn, Color::Yellow),
            count_cell(file.testing_excluded, Color::Yellow),
            count_cell(file.date_nulls, Color::Yellow),
            output_cell(file.output.as_ref()),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(totals[0]).add_attribute(Attribute::Bold),
        Cell::new(totals[1]).add_attribute(Attribute::Bold),
        count_cell(totals[2], Color::Yellow).add_attribute(Attribute::Bold),
        count_cell(totals[3], Color::Yellow).add_attribute(Attribute::Bold),
        count_cell(totals[4], Color::Yellow).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");
    print_skipped(&result.skipped);
    print_errors(&result.errors);
}

pub fn print_clean_summary(result: &CleanResult) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Dataset"),
        header_cell("Kind"),
        header_cell("Rows in"),
        header_cell("Rows out"),
        header_cell("Excluded"),
        header_cell("Duplicates"),
        header_cell("Deduped"),
        header_cell("Output"),
    ]);
    apply_table_style(&mut table);
    for index in 2..=6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    align_column(&mut table, 7, CellAlignment::Center);
    let mut totals = [0usize; 5];
    for file in &result.files {
        totals[0] += file.rows_in;
        totals[1] += file.rows_out;
        totals[2] += file.excluded;
        totals[3] += file.duplicate_status;
        totals[4] += file.deduped;
        table.add_row(vec![
            Cell::new(&file.dataset)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(file.kind.as_str()),
            Cell::new(file.rows_in),
            Cell::new(file.rows_out),
            count_cell(file.excluded, Color::Yellow),
            count_cell(file.duplicate_status, Color::Yellow),
            count_cell(file.deduped, Color::Yellow),
            output_cell(file.output.as_ref()),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(totals[0]).add_attribute(Attribute::Bold),
        Cell::new(totals[1]).add_attribute(Attribute::Bold),
        count_cell(totals[2], Color::Yellow).add_attribute(Attribute::Bold),
        count_cell(totals[3], Color::Yellow).add_attribute(Attribute::Bold),
        count_cell(totals[4], Color::Yellow).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");
    print_skipped(&result.skipped);
    print_errors(&result.errors);
}

pub fn print_run_summary(result: &RunResult) {
    println!("Redaction:");
    print_redact_summary(&result.redact);
    println!();
    println!("Standardization:");
    print_standardize_summary(&result.standardize);
    println!();
    println!("Cleaning:");
    print_clean_summary(&result.clean);
}

fn print_skipped(skipped: &[String]) {
    if skipped.is_empty() {
        return;
    }
    println!("Skipped:");
    for file in skipped {
        println!("- {file}");
    }
}

fn print_errors(errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    eprintln!("Errors:");
    for error in errors {
        eprintln!("- {error}");
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn output_cell(path: Option<&PathBuf>) -> Cell {
    match path {
        Some(_) => Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        None => dim_cell("-"),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
