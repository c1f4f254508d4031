//! Enrichment pass
//!
//! Fills missing issue IDs and metadata back into the workbook, row by
//! row. Rows the user marked as manually resolved are never looked up;
//! per-row API failures are logged and leave the row unresolved. A
//! cancellation request stops further lookups between rows while
//! keeping everything already written, so the workbook can still be
//! saved.

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use longbox_common::Result;

use crate::marvel::MarvelClient;
use crate::workbook::Workbook;

/// Counters reported by one enrichment run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichStats {
    /// IDs resolved through the search lookup
    pub found: usize,
    /// Rows whose metadata was filled in
    pub filled: usize,
    /// Per-row lookups that failed
    pub failed: usize,
    /// Rows skipped because the user marked them resolved
    pub skipped: usize,
}

/// Run the enrichment pass over the whole workbook. The caller saves
/// the workbook afterwards, cancelled or not.
pub async fn enrich(
    workbook: &mut Workbook,
    client: &MarvelClient,
    start_year: i32,
    end_year: i32,
    cancel: &CancellationToken,
) -> Result<EnrichStats> {
    let mut stats = EnrichStats::default();
    let sheets = workbook.sheets()?;

    'sheets: for (sheet_index, sheet) in sheets.iter().enumerate() {
        if cancel.is_cancelled() {
            break;
        }
        for row in &sheet.rows {
            if cancel.is_cancelled() {
                info!(sheet = %sheet.name, "enrichment cancelled, keeping rows already updated");
                break 'sheets;
            }
            if row.collection.is_empty() {
                continue;
            }

            let mut id = row.id.clone();
            if id.is_empty() {
                if row.resolved {
                    stats.skipped += 1;
                    continue;
                }
                info!(collection = %row.collection, num = row.num, "finding issue id");
                match client.find(&row.collection, row.num, start_year, end_year).await {
                    Ok(found) if !found.is_empty() => {
                        workbook.set_id(sheet_index, row.row, &found)?;
                        id = found;
                        stats.found += 1;
                    }
                    Ok(_) => {
                        stats.failed += 1;
                    }
                    Err(e) => {
                        warn!(collection = %row.collection, num = row.num, error = %e, "issue lookup failed");
                        stats.failed += 1;
                    }
                }
            }

            if !id.is_empty()
                && row.date.is_empty()
                && row.characters.is_empty()
                && row.creators.is_empty()
                && row.pic.is_empty()
            {
                info!(id = %id, "fetching issue metadata");
                match client.find_by_id(&id).await {
                    Ok(metadata) => {
                        workbook.set_metadata(sheet_index, row.row, &metadata)?;
                        stats.filled += 1;
                    }
                    Err(e) => {
                        warn!(id = %id, error = %e, "metadata lookup failed");
                        stats.failed += 1;
                    }
                }
            }
        }
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn client() -> MarvelClient {
        MarvelClient::new("pub".to_string(), "priv".to_string())
    }

    fn workbook_with_row(values: &[(&str, u32)]) -> Workbook {
        let mut book = umya_spreadsheet::new_file();
        let worksheet = book.get_sheet_mut(&0).unwrap();
        for (value, col) in values {
            worksheet.get_cell_mut((*col, 2)).set_value(*value);
        }
        Workbook::from_spreadsheet(book, PathBuf::from("test.xlsx"))
    }

    #[tokio::test]
    async fn test_cancelled_token_stops_before_any_lookup() {
        let mut workbook = workbook_with_row(&[("Amazing", 2), ("1", 3), ("1", 4)]);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let stats = enrich(&mut workbook, &client(), 1960, 1970, &cancel)
            .await
            .unwrap();
        assert_eq!(stats, EnrichStats::default());
    }

    #[tokio::test]
    async fn test_complete_rows_need_no_lookup() {
        // ID present and all metadata cells filled: nothing to do
        let mut workbook = workbook_with_row(&[
            ("12345", 1),
            ("Amazing", 2),
            ("1", 3),
            ("1", 4),
            ("1963-03-01", 6),
            ("Iron Man", 8),
            ("Stan Lee", 9),
            ("http://i.example/a.jpg", 10),
        ]);
        let cancel = CancellationToken::new();

        let stats = enrich(&mut workbook, &client(), 1960, 1970, &cancel)
            .await
            .unwrap();
        assert_eq!(stats, EnrichStats::default());
    }

    #[tokio::test]
    async fn test_resolved_rows_skip_the_search() {
        let mut book = umya_spreadsheet::new_file();
        let worksheet = book.get_sheet_mut(&0).unwrap();
        worksheet.get_cell_mut((2u32, 2u32)).set_value("Amazing");
        worksheet.get_cell_mut((3u32, 2u32)).set_value("1");
        worksheet.get_cell_mut((4u32, 2u32)).set_value("1");
        worksheet
            .get_style_mut((1u32, 2u32))
            .set_background_color(umya_spreadsheet::Color::COLOR_RED);
        let mut workbook = Workbook::from_spreadsheet(book, PathBuf::from("test.xlsx"));
        let cancel = CancellationToken::new();

        let stats = enrich(&mut workbook, &client(), 1960, 1970, &cancel)
            .await
            .unwrap();
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.found, 0);
        assert_eq!(stats.failed, 0);
    }

    #[tokio::test]
    async fn test_separator_rows_are_ignored() {
        let mut workbook = workbook_with_row(&[("Origins", 5)]);
        let cancel = CancellationToken::new();

        let stats = enrich(&mut workbook, &client(), 1960, 1970, &cancel)
            .await
            .unwrap();
        assert_eq!(stats, EnrichStats::default());
    }
}
