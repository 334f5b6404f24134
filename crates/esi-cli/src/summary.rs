use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use esi_cli::render::{RenderOutcome, ViewerRow};
use esi_cli::uploads::CleanReport;
use esi_viewer::LoadState;

pub fn print_render_summary(outcome: &RenderOutcome) {
    println!("Session: {}", outcome.session);
    println!("Page: {}", outcome.page.display());
    if let Some(path) = &outcome.archive {
        println!("Images: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Molecule"),
        header_cell("Viewer"),
        header_cell("State"),
        header_cell("Atoms"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    align_column(&mut table, 4, CellAlignment::Right);

    for row in &outcome.viewers {
        table.add_row(vec![
            Cell::new(row.index),
            Cell::new(&row.molecule)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            mount_cell(row),
            state_cell(row.state),
            row.atoms.map_or_else(|| dim_cell("-"), Cell::new),
        ]);
    }
    println!("{table}");
}

pub fn print_clean_summary(report: &CleanReport) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Removed session")]);
    apply_table_style(&mut table);
    for path in &report.removed {
        table.add_row(vec![Cell::new(path.display())]);
    }
    if report.removed.is_empty() {
        table.add_row(vec![dim_cell("none")]);
    }
    println!("{table}");
    println!("Kept: {}", report.kept);
}

/// Whether any viewer failed to load.
pub fn has_failures(outcome: &RenderOutcome) -> bool {
    outcome
        .viewers
        .iter()
        .any(|row| row.state == Some(LoadState::Failed))
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn mount_cell(row: &ViewerRow) -> Cell {
    match &row.mount_id {
        Some(id) => Cell::new(id),
        None => dim_cell("no placeholder"),
    }
}

fn state_cell(state: Option<LoadState>) -> Cell {
    match state {
        Some(LoadState::Loaded) => Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        Some(LoadState::Failed) => Cell::new("FAILED")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        Some(state) => Cell::new(state.label()).fg(Color::Yellow),
        None => dim_cell("-"),
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
