//! CSV export of a filtered view.

use std::io::Write;

use tracing::debug;

use crate::filter::View;
use crate::logging::event_names;

/// Stream the view as CSV: source header first, then the retained rows
/// exactly as read, in view order.
pub fn write_csv<W: Write>(view: &View<'_>, writer: W) -> Result<(), csv::Error> {
    let dataset = view.dataset();
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(dataset.headers())?;
    for &idx in view.row_indices() {
        if let Some(row) = dataset.raw_row(idx) {
            wtr.write_record(row)?;
        }
    }
    wtr.flush()?;
    debug!(
        event = event_names::EXPORT_WRITTEN,
        rows = view.len(),
        "CSV export written"
    );
    Ok(())
}

/// The view as UTF-8 CSV bytes.
pub fn export_csv(view: &View<'_>) -> Result<Vec<u8>, csv::Error> {
    let mut buf = Vec::new();
    write_csv(view, &mut buf)?;
    Ok(buf)
}
