//! Workbook boundary
//!
//! Thin adapter over the spreadsheet library. Reading yields one
//! [`SheetData`] per sheet with typed [`RowRecord`]s (header row already
//! skipped); writing covers exactly the cells the enrichment pass fills
//! in. The legacy "manually resolved" convention — a solid `FFFF0000`
//! fill on the ID cell — is translated into the explicit `resolved` flag
//! here, in one place; consumers only ever see the boolean.

use std::path::{Path, PathBuf};

use umya_spreadsheet::{Cell, PatternValues, Spreadsheet, Worksheet};

use longbox_common::{Error, Result};

use crate::marvel::IssueMetadata;

// Workbook columns, 1-based
const COL_ID: u32 = 1;
const COL_COLLECTION: u32 = 2;
const COL_VOL: u32 = 3;
const COL_NUM: u32 = 4;
const COL_TITLE: u32 = 5;
const COL_DATE: u32 = 6;
const COL_EVENT: u32 = 7;
const COL_CHARACTERS: u32 = 8;
const COL_CREATORS: u32 = 9;
const COL_PIC: u32 = 10;
const COL_UNIVERSE: u32 = 11;
const COL_ESSENTIAL: u32 = 12;
const COL_COMMENTS: u32 = 13;

/// ARGB of the solid fill marking a row as manually resolved.
pub const RESOLVED_FILL_ARGB: &str = "FFFF0000";

/// One data row with typed mandatory cells. `row` is the 1-based
/// spreadsheet row the record came from, kept for write-back targeting
/// and error context.
#[derive(Debug, Clone, Default)]
pub struct RowRecord {
    pub row: u32,
    pub id: String,
    pub collection: String,
    pub vol: i64,
    pub num: f64,
    pub title: String,
    pub date: String,
    pub event: String,
    /// Raw `", "`-delimited character names
    pub characters: String,
    /// Raw `", "`-delimited creator names
    pub creators: String,
    pub pic: String,
    pub universe: String,
    /// Raw essential cell; the literal `YES` means essential
    pub essential: String,
    /// Present only when the row extends past the mandatory columns
    pub comments: Option<String>,
    /// User marked this row as manually resolved
    pub resolved: bool,
}

/// One sheet: a phase name plus its data rows in row order.
#[derive(Debug, Clone, Default)]
pub struct SheetData {
    pub name: String,
    pub rows: Vec<RowRecord>,
}

/// An open workbook, remembering where it came from so [`save`]
/// overwrites the original file.
///
/// [`save`]: Workbook::save
pub struct Workbook {
    book: Spreadsheet,
    path: PathBuf,
}

impl Workbook {
    pub fn open(path: &Path) -> Result<Self> {
        let book = umya_spreadsheet::reader::xlsx::read(path)
            .map_err(|e| Error::Config(format!("cannot open workbook {}: {}", path.display(), e)))?;
        Ok(Self {
            book,
            path: path.to_path_buf(),
        })
    }

    /// Read every sheet into typed rows, skipping each sheet's header
    /// row. Malformed mandatory cells abort with sheet/row context.
    pub fn sheets(&self) -> Result<Vec<SheetData>> {
        let mut sheets = Vec::with_capacity(self.book.get_sheet_count());
        for index in 0..self.book.get_sheet_count() {
            let worksheet = self
                .book
                .get_sheet(&index)
                .ok_or_else(|| Error::Internal(format!("missing sheet {}", index)))?;
            sheets.push(read_sheet(worksheet)?);
        }
        Ok(sheets)
    }

    /// Write a freshly found issue ID into a row.
    pub fn set_id(&mut self, sheet: usize, row: u32, id: &str) -> Result<()> {
        let worksheet = self.sheet_mut(sheet)?;
        worksheet.get_cell_mut((COL_ID, row)).set_value(id);
        Ok(())
    }

    /// Write fetched issue metadata into a row.
    pub fn set_metadata(&mut self, sheet: usize, row: u32, metadata: &IssueMetadata) -> Result<()> {
        let worksheet = self.sheet_mut(sheet)?;
        worksheet
            .get_cell_mut((COL_DATE, row))
            .set_value(&metadata.date);
        worksheet
            .get_cell_mut((COL_CHARACTERS, row))
            .set_value(&metadata.characters);
        worksheet
            .get_cell_mut((COL_CREATORS, row))
            .set_value(&metadata.creators);
        worksheet
            .get_cell_mut((COL_PIC, row))
            .set_value(&metadata.pic);
        Ok(())
    }

    /// Overwrite the workbook at its original path.
    pub fn save(&self) -> Result<()> {
        umya_spreadsheet::writer::xlsx::write(&self.book, &self.path)
            .map_err(|e| Error::Config(format!("cannot save workbook {}: {}", self.path.display(), e)))
    }

    fn sheet_mut(&mut self, index: usize) -> Result<&mut Worksheet> {
        self.book
            .get_sheet_mut(&index)
            .ok_or_else(|| Error::Internal(format!("missing sheet {}", index)))
    }

    #[cfg(test)]
    pub(crate) fn from_spreadsheet(book: Spreadsheet, path: PathBuf) -> Self {
        Self { book, path }
    }
}

fn read_sheet(worksheet: &Worksheet) -> Result<SheetData> {
    let name = worksheet.get_name().to_string();
    let mut rows = Vec::new();
    // Row 1 is the header
    for row in 2..=worksheet.get_highest_row() {
        rows.push(read_row(worksheet, &name, row)?);
    }
    Ok(SheetData { name, rows })
}

fn read_row(worksheet: &Worksheet, sheet_name: &str, row: u32) -> Result<RowRecord> {
    let collection = worksheet.get_value((COL_COLLECTION, row));
    // Separator rows have no collection and carry no numeric cells
    // worth parsing; derivation skips them by the same rule.
    let (vol, num) = if collection.is_empty() {
        (0, 0.0)
    } else {
        (
            parse_int(worksheet, sheet_name, row, COL_VOL, "vol")?,
            parse_num(worksheet, sheet_name, row, COL_NUM, "num")?,
        )
    };
    Ok(RowRecord {
        row,
        id: worksheet.get_value((COL_ID, row)),
        collection,
        vol,
        num,
        title: worksheet.get_value((COL_TITLE, row)),
        date: worksheet.get_value((COL_DATE, row)),
        event: worksheet.get_value((COL_EVENT, row)),
        characters: worksheet.get_value((COL_CHARACTERS, row)),
        creators: worksheet.get_value((COL_CREATORS, row)),
        pic: worksheet.get_value((COL_PIC, row)),
        universe: worksheet.get_value((COL_UNIVERSE, row)),
        essential: worksheet.get_value((COL_ESSENTIAL, row)),
        comments: worksheet
            .get_cell((COL_COMMENTS, row))
            .map(|_| worksheet.get_value((COL_COMMENTS, row))),
        resolved: is_resolved(worksheet, row),
    })
}

fn parse_int(
    worksheet: &Worksheet,
    sheet_name: &str,
    row: u32,
    col: u32,
    field: &str,
) -> Result<i64> {
    let raw = worksheet.get_value((col, row));
    raw.parse().map_err(|_| Error::Input {
        sheet: sheet_name.to_string(),
        row,
        message: format!("{} is not an integer: '{}'", field, raw),
    })
}

fn parse_num(
    worksheet: &Worksheet,
    sheet_name: &str,
    row: u32,
    col: u32,
    field: &str,
) -> Result<f64> {
    let raw = worksheet.get_value((col, row));
    raw.parse().map_err(|_| Error::Input {
        sheet: sheet_name.to_string(),
        row,
        message: format!("{} is not a number: '{}'", field, raw),
    })
}

/// The one place that understands the legacy styling convention.
fn is_resolved(worksheet: &Worksheet, row: u32) -> bool {
    match worksheet.get_cell((COL_ID, row)) {
        Some(cell) => has_resolved_fill(cell),
        None => false,
    }
}

fn has_resolved_fill(cell: &Cell) -> bool {
    let Some(fill) = cell.get_style().get_fill() else {
        return false;
    };
    let Some(pattern) = fill.get_pattern_fill() else {
        return false;
    };
    if *pattern.get_pattern_type() != PatternValues::Solid {
        return false;
    }
    match pattern.get_foreground_color() {
        Some(color) => color.get_argb() == RESOLVED_FILL_ARGB,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet_with_rows(values: &[&[(&str, u32)]]) -> Spreadsheet {
        // (value, column) pairs per row, written below the header
        let mut book = umya_spreadsheet::new_file();
        let worksheet = book.get_sheet_mut(&0).unwrap();
        for (i, row_values) in values.iter().enumerate() {
            let row = (i + 2) as u32;
            for (value, col) in row_values.iter() {
                worksheet.get_cell_mut((*col, row)).set_value(*value);
            }
        }
        book
    }

    #[test]
    fn test_reads_typed_rows() {
        let book = sheet_with_rows(&[&[
            ("Amazing", COL_COLLECTION),
            ("1", COL_VOL),
            ("4.1", COL_NUM),
            ("Origins", COL_TITLE),
            ("Iron Man, Thor", COL_CHARACTERS),
            ("YES", COL_ESSENTIAL),
        ]]);
        let workbook = Workbook::from_spreadsheet(book, PathBuf::from("test.xlsx"));

        let sheets = workbook.sheets().unwrap();
        assert_eq!(sheets.len(), 1);
        let row = &sheets[0].rows[0];
        assert_eq!(row.row, 2);
        assert_eq!(row.collection, "Amazing");
        assert_eq!(row.vol, 1);
        assert_eq!(row.num, 4.1);
        assert_eq!(row.title, "Origins");
        assert_eq!(row.characters, "Iron Man, Thor");
        assert_eq!(row.essential, "YES");
        assert!(!row.resolved);
    }

    #[test]
    fn test_separator_row_skips_numeric_parsing() {
        let book = sheet_with_rows(&[&[("Origins", COL_TITLE)]]);
        let workbook = Workbook::from_spreadsheet(book, PathBuf::from("test.xlsx"));

        let sheets = workbook.sheets().unwrap();
        let row = &sheets[0].rows[0];
        assert!(row.collection.is_empty());
        assert_eq!(row.vol, 0);
        assert_eq!(row.num, 0.0);
    }

    #[test]
    fn test_malformed_mandatory_cell_carries_context() {
        let book = sheet_with_rows(&[&[
            ("Amazing", COL_COLLECTION),
            ("one", COL_VOL),
            ("1", COL_NUM),
        ]]);
        let workbook = Workbook::from_spreadsheet(book, PathBuf::from("test.xlsx"));

        let error = workbook.sheets().unwrap_err();
        match error {
            Error::Input { row, .. } => assert_eq!(row, 2),
            other => panic!("expected input error, got {}", other),
        }
    }

    #[test]
    fn test_solid_red_id_cell_marks_row_resolved() {
        let mut book = sheet_with_rows(&[&[
            ("Amazing", COL_COLLECTION),
            ("1", COL_VOL),
            ("1", COL_NUM),
        ]]);
        book.get_sheet_mut(&0)
            .unwrap()
            .get_style_mut((COL_ID, 2u32))
            .set_background_color(umya_spreadsheet::Color::COLOR_RED);
        let workbook = Workbook::from_spreadsheet(book, PathBuf::from("test.xlsx"));

        let sheets = workbook.sheets().unwrap();
        assert!(sheets[0].rows[0].resolved);
    }

    #[test]
    fn test_id_write_back() {
        let book = sheet_with_rows(&[&[("Amazing", COL_COLLECTION), ("1", COL_VOL), ("1", COL_NUM)]]);
        let mut workbook = Workbook::from_spreadsheet(book, PathBuf::from("test.xlsx"));

        workbook.set_id(0, 2, "12345").unwrap();
        let sheets = workbook.sheets().unwrap();
        assert_eq!(sheets[0].rows[0].id, "12345");
    }
}
