use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use panacea_chart::{GroupedBarInput, PieInput, round_percent};
use panacea_model::Study;

use crate::types::StudyRunResult;

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

/// One grouped-bar outcome as a table: group labels down the side, one
/// column per category series.
pub fn outcome_table(units: Option<&str>, input: &GroupedBarInput) -> Table {
    let mut table = Table::new();
    let mut header = vec![header_cell("Group")];
    for series in &input.series {
        header.push(header_cell(&series.name));
    }
    table.set_header(header);
    apply_table_style(&mut table);
    for index in 1..=input.series.len() {
        align_column(&mut table, index, CellAlignment::Right);
    }

    for (row, group) in input.group_labels.iter().enumerate() {
        let mut cells = vec![Cell::new(group).add_attribute(Attribute::Bold)];
        for series in &input.series {
            cells.push(Cell::new(format_value(series.values[row], units)));
        }
        table.add_row(cells);
    }
    table
}

/// The adverse-event rollup as a table, "Other" row dimmed.
pub fn events_table(input: &PieInput) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Adverse event"), header_cell("Share")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);

    for slice in &input.slices {
        let share = format!("{}%", round_percent(slice.value));
        if slice.label == panacea_chart::OTHER_LABEL {
            table.add_row(vec![dim_cell(&slice.label), dim_cell(share)]);
        } else {
            table.add_row(vec![Cell::new(&slice.label), Cell::new(share)]);
        }
    }
    table
}

/// Search results, one row per study.
pub fn studies_table(studies: &[Study]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Title"),
        header_cell("Institution"),
        header_cell("Start"),
        header_cell("Completion"),
        header_cell("Outcomes"),
        header_cell("Adverse events"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);

    for study in studies {
        table.add_row(vec![
            Cell::new(&study.study_info.title),
            optional_cell(study.study_info.institution.as_deref()),
            optional_cell(study.study_info.dates.start.as_deref()),
            optional_cell(study.study_info.dates.completion.as_deref()),
            Cell::new(study.outcomes.len()),
            Cell::new(study.adverse_events.common.len()),
        ]);
    }
    table
}

pub fn print_run_summary(result: &StudyRunResult) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Study"),
        header_cell("Charted"),
        header_cell("Empty"),
        header_cell("Event slices"),
        header_cell("Errors"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=4 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    for summary in &result.summaries {
        let errors = summary.errors.len();
        table.add_row(vec![
            Cell::new(&summary.title),
            Cell::new(summary.outcomes_charted),
            Cell::new(summary.outcomes_empty),
            Cell::new(summary.event_slices),
            if errors > 0 {
                Cell::new(errors).fg(Color::Red).add_attribute(Attribute::Bold)
            } else {
                dim_cell(errors)
            },
        ]);
    }
    println!("{table}");

    for summary in &result.summaries {
        for error in &summary.errors {
            eprintln!("- {error}");
        }
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn format_value(value: f64, units: Option<&str>) -> String {
    match units {
        Some(units) => format!("{value} {units}"),
        None => format!("{value}"),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
