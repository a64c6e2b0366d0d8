use rust_xlsxwriter::{DocProperties, ExcelDateTime, Format, Workbook, Worksheet};

use super::error::ExportError;
use super::model::number_label;
use super::pivot::WideTable;

pub const EXPORT_FILENAME: &str = "transformed_data.xlsx";
pub const EXPORT_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const SHEET_NAME: &str = "Pivot Table";

/// Serialise a [`WideTable`] into an in-memory `.xlsx` workbook.
///
/// One sheet: header row `Depth, <station>...`, then one row per depth.
/// Missing cells are left blank. The creation date is pinned, so the same
/// table always produces the same bytes.
pub fn export(table: &WideTable) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let created = ExcelDateTime::from_ymd(2000, 1, 1)?;
    workbook.set_properties(&DocProperties::new().set_creation_datetime(&created));
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let bold = Format::new().set_bold();
    for (col, title) in table.header().iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, title, &bold)?;
    }

    for (i, row) in table.rows().iter().enumerate() {
        let r = i as u32 + 1;
        write_value(worksheet, r, 0, row.depth)?;
        for (j, value) in row.values.iter().enumerate() {
            if let Some(v) = value {
                write_value(worksheet, r, j as u16 + 1, *v)?;
            }
        }
    }

    let bytes = workbook.save_to_buffer()?;
    log::info!(
        "Exported {} depths x {} stations ({} bytes)",
        table.row_count(),
        table.column_count(),
        bytes.len()
    );
    Ok(bytes)
}

/// Spreadsheets have no NaN/inf, so those are written as their text label.
fn write_value(sheet: &mut Worksheet, row: u32, col: u16, v: f64) -> Result<(), ExportError> {
    if v.is_finite() {
        sheet.write_number(row, col, v)?;
    } else {
        sheet.write_string(row, col, &number_label(v))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use calamine::{Data, Reader, Xlsx};

    use super::*;
    use crate::data::model::{Dataset, Scalar};
    use crate::data::pivot::pivot;

    fn read_back(bytes: Vec<u8>) -> (Vec<String>, Vec<Vec<Data>>) {
        let mut book: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
        assert_eq!(book.sheet_names(), [SHEET_NAME]);
        let range = book.worksheet_range(SHEET_NAME).unwrap();
        let mut rows = range.rows().map(<[Data]>::to_vec);
        let header = rows
            .next()
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        (header, rows.collect())
    }

    #[test]
    fn writes_header_and_blank_missing_cells() {
        let ds = Dataset::new(
            vec!["Depth".into(), "Station".into(), "EPD".into()],
            vec![
                vec![Scalar::Number(1.0), Scalar::Text("A".into()), Scalar::Number(10.0)],
                vec![Scalar::Number(2.0), Scalar::Text("B".into()), Scalar::Number(25.0)],
            ],
        );
        let wt = pivot(&ds).unwrap();
        let (header, rows) = read_back(export(&wt).unwrap());

        assert_eq!(header, ["Depth", "A", "B"]);
        assert_eq!(rows[0], [Data::Float(1.0), Data::Float(10.0), Data::Empty]);
        assert_eq!(rows[1], [Data::Float(2.0), Data::Empty, Data::Float(25.0)]);
    }

    #[test]
    fn same_table_exports_identical_bytes() {
        let ds = Dataset::new(
            vec!["Depth".into(), "Station".into(), "EPD".into()],
            vec![
                vec![Scalar::Number(1.0), Scalar::Text("A".into()), Scalar::Number(10.0)],
                vec![Scalar::Number(2.0), Scalar::Text("B".into()), Scalar::Number(25.0)],
            ],
        );
        let wt = pivot(&ds).unwrap();
        let first = export(&wt).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(1100));
        let second = export(&wt).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_table_has_only_the_depth_header() {
        let (header, rows) = read_back(export(&WideTable::default()).unwrap());
        assert_eq!(header, ["Depth"]);
        assert!(rows.is_empty());
    }
}
