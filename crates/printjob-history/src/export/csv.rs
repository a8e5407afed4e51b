//! CSV export of the list view.

use super::view::ClientJobView;

pub const CSV_HEADERS: [&str; 16] = [
    "User",
    "Result",
    "Start Date",
    "End Date",
    "Duration",
    "File Name",
    "File Path",
    "File Size",
    "Layers",
    "Note",
    "Temperatures",
    "Spool Name",
    "Material",
    "Diameter",
    "Used Length",
    "Calculated Length",
];

const MISSING: &str = "-";
const LINE_TERMINATOR: &str = "\r\n";

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| MISSING.to_string())
}

fn number<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| MISSING.to_string())
}

fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

fn write_row<I, S>(out: &mut String, cells: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let row: Vec<String> = cells.into_iter().map(|c| quote(c.as_ref())).collect();
    out.push_str(&row.join(","));
    out.push_str(LINE_TERMINATOR);
}

fn row_cells(job: &ClientJobView) -> [String; 16] {
    let temperatures = job
        .temperature_entities
        .iter()
        .map(|t| format!("{}:{}", t.sensor_name, t.sensor_value))
        .collect::<Vec<_>>()
        .join(" ");

    let filament = job.filament_entity.as_ref();

    [
        text(&job.user_name),
        text(&job.print_status_result),
        job.print_start_date_time_formatted.clone(),
        text(&job.print_end_date_time_formatted),
        text(&job.duration_formatted),
        text(&job.file_name),
        text(&job.file_path_name),
        number(job.file_size),
        text(&job.printed_layers),
        text(&job.note_text),
        temperatures,
        text(&filament.and_then(|f| f.spool_name.clone())),
        text(&filament.and_then(|f| f.material.clone())),
        number(filament.and_then(|f| f.diameter)),
        number(filament.and_then(|f| f.used_length)),
        text(&filament.and_then(|f| f.calculated_length.clone())),
    ]
}

/// Renders the history as UTF-8 CSV with every cell quoted.
///
/// Missing values render as `-`; temperature samples are joined into one
/// cell as space-separated `name:value` pairs (empty when there are none).
pub fn to_csv(rows: &[ClientJobView]) -> String {
    let mut out = String::new();
    write_row(&mut out, CSV_HEADERS);
    for job in rows {
        write_row(&mut out, row_cells(job));
    }
    out
}
