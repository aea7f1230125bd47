use chrono::{DateTime, Utc};

use crate::config::ExportFormat;
use crate::dashboard::view::FilteredView;

const CSV_HEADER: &str = "First Name,Email,Signup Date,Source";

pub fn export(view: &FilteredView, format: ExportFormat) -> String {
    match format {
        ExportFormat::Csv => to_csv(view),
    }
}

/// Exports exactly what the operator is looking at: the filtered view, in its
/// current order.
pub fn to_csv(view: &FilteredView) -> String {
    let mut csv = String::from(CSV_HEADER);
    csv.push('\n');

    for subscriber in view.rows() {
        let cells = [
            quote(subscriber.first_name.as_ref()),
            quote(subscriber.email.as_ref()),
            quote(&format_date(subscriber.timestamp)),
            quote(&subscriber.source),
        ];
        csv.push_str(&cells.join(","));
        csv.push('\n');
    }

    csv
}

pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("subscribers-{}.csv", now.format("%Y-%m-%d"))
}

pub fn format_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%b %d, %Y %H:%M").to_string()
}

fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}
