use std::collections::HashSet;
use std::io::Cursor;

use calamine::{Data, Range, Reader, Xls, Xlsx};

use super::error::LoadError;
use super::model::{number_label, Dataset, Scalar};

/// Cell texts treated as "no data" on top of the empty string.
const NA_TOKENS: &[&str] = &["NA", "N/A", "#N/A", "NaN", "nan", "NULL", "null"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Recognised upload formats, picked from the filename extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Xls,
    Xlsx,
}

impl FileFormat {
    /// Extensions offered in file dialogs.
    pub const EXTENSIONS: &'static [&'static str] = &["csv", "xls", "xlsx"];

    /// Match the extension of `filename`, ignoring case.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(FileFormat::Csv),
            "xls" => Some(FileFormat::Xls),
            "xlsx" => Some(FileFormat::Xlsx),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            FileFormat::Csv => "CSV",
            FileFormat::Xls => "XLS",
            FileFormat::Xlsx => "XLSX",
        }
    }
}

/// Parse an uploaded payload into a [`Dataset`]. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – UTF-8 text, comma separated, first row is the header
/// * `.xls`  – legacy Excel workbook, first sheet
/// * `.xlsx` – Office Open XML workbook, first sheet
///
/// Values are coerced per column: a column whose non-empty cells are all
/// numbers becomes numeric, anything else stays text.
pub fn parse(payload: &[u8], filename: &str) -> Result<Dataset, LoadError> {
    let format = FileFormat::from_filename(filename).ok_or_else(|| {
        LoadError::UnsupportedFormat {
            filename: filename.to_string(),
        }
    })?;

    let (header, rows) = match format {
        FileFormat::Csv => read_csv(payload)?,
        FileFormat::Xls => read_sheet::<Xls<Cursor<&[u8]>>>(payload, format)?,
        FileFormat::Xlsx => read_sheet::<Xlsx<Cursor<&[u8]>>>(payload, format)?,
    };

    let dataset = coerce(header, rows);
    log::debug!(
        "Parsed {filename} as {}: {} records, columns {:?}",
        format.name(),
        dataset.len(),
        dataset.columns()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Raw cells, before column coercion
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum RawCell {
    Empty,
    /// A number together with the text it came from.
    Number(f64, String),
    Text(String),
}

impl RawCell {
    fn from_text(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() || NA_TOKENS.contains(&trimmed) {
            return RawCell::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(v) => RawCell::Number(v, s.to_string()),
            Err(_) => RawCell::Text(s.to_string()),
        }
    }
}

type RawTable = (Vec<String>, Vec<Vec<RawCell>>);

fn check_header(header: &[String], format: FileFormat) -> Result<(), LoadError> {
    let mut seen = HashSet::new();
    for name in header {
        if !seen.insert(name.as_str()) {
            return Err(LoadError::malformed(
                format.name(),
                format!("duplicate column name '{name}'"),
            ));
        }
    }
    Ok(())
}

/// Resolve every column to numeric or text.
fn coerce(header: Vec<String>, rows: Vec<Vec<RawCell>>) -> Dataset {
    let width = header.len();
    let numeric: Vec<bool> = (0..width)
        .map(|col| {
            rows.iter().all(|row| {
                matches!(row.get(col), None | Some(RawCell::Empty | RawCell::Number(..)))
            })
        })
        .collect();

    let records = rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .zip(&numeric)
                .map(|(cell, &is_numeric)| match cell {
                    RawCell::Empty => Scalar::Missing,
                    RawCell::Number(v, _) if is_numeric => Scalar::Number(v),
                    RawCell::Number(_, text) | RawCell::Text(text) => Scalar::Text(text),
                })
                .collect()
        })
        .collect();

    Dataset::new(header, records)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn read_csv(payload: &[u8]) -> Result<RawTable, LoadError> {
    let format = FileFormat::Csv;
    let text = std::str::from_utf8(payload)
        .map_err(|e| LoadError::malformed(format.name(), format!("not valid UTF-8: {e}")))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if text.trim().is_empty() {
        return Err(LoadError::malformed(format.name(), "file is empty"));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let header: Vec<String> = reader
        .headers()
        .map_err(|e| LoadError::malformed(format.name(), e))?
        .iter()
        .map(str::to_string)
        .collect();
    check_header(&header, format)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| LoadError::malformed(format.name(), e))?;
        rows.push(record.iter().map(RawCell::from_text).collect());
    }

    Ok((header, rows))
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

fn read_sheet<'a, R>(payload: &'a [u8], format: FileFormat) -> Result<RawTable, LoadError>
where
    R: Reader<Cursor<&'a [u8]>>,
    R::Error: std::fmt::Display,
{
    let mut workbook =
        R::new(Cursor::new(payload)).map_err(|e| LoadError::malformed(format.name(), e))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::malformed(format.name(), "workbook contains no sheets"))?
        .map_err(|e| LoadError::malformed(format.name(), e))?;

    range_to_table(&range, format)
}

fn range_to_table(range: &Range<Data>, format: FileFormat) -> Result<RawTable, LoadError> {
    let mut rows = range.rows();
    let header: Vec<String> = match rows.next() {
        Some(cells) => cells
            .iter()
            .enumerate()
            .map(|(i, cell)| match sheet_cell(cell) {
                RawCell::Empty => format!("Unnamed: {i}"),
                RawCell::Number(_, text) | RawCell::Text(text) => text,
            })
            .collect(),
        None => return Err(LoadError::malformed(format.name(), "first sheet is empty")),
    };
    check_header(&header, format)?;

    let rows = rows
        .map(|cells| cells.iter().map(sheet_cell).collect::<Vec<_>>())
        .filter(|row| row.iter().any(|c| *c != RawCell::Empty))
        .collect();

    Ok((header, rows))
}

fn sheet_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Empty => RawCell::Empty,
        Data::Float(f) => RawCell::Number(*f, number_label(*f)),
        Data::Int(i) => RawCell::Number(*i as f64, i.to_string()),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            RawCell::Number(serial, number_label(serial))
        }
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || NA_TOKENS.contains(&trimmed) {
                RawCell::Empty
            } else {
                RawCell::Text(s.clone())
            }
        }
        Data::Bool(b) => RawCell::Text(b.to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => RawCell::Text(s.clone()),
        Data::Error(e) => RawCell::Text(format!("{e:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_csv_with_numeric_and_text_columns() {
        let csv = b"Depth,Station,EPD\n1,A,10\n2,B,20.5\n";
        let ds = parse(csv, "data.csv").unwrap();
        assert_eq!(ds.columns(), ["Depth", "Station", "EPD"]);
        assert_eq!(ds.len(), 2);
        let rec = ds.record(1).unwrap();
        assert_eq!(rec.get("Depth"), Some(&Scalar::Number(2.0)));
        assert_eq!(rec.get("Station"), Some(&Scalar::Text("B".into())));
        assert_eq!(rec.get("EPD"), Some(&Scalar::Number(20.5)));
    }

    #[test]
    fn mixed_column_stays_text() {
        let csv = b"Station,v\n1,0\nX,1\n";
        let ds = parse(csv, "mixed.csv").unwrap();
        let stations: Vec<_> = ds.column_values(0).cloned().collect();
        assert_eq!(
            stations,
            [Scalar::Text("1".into()), Scalar::Text("X".into())]
        );
    }

    #[test]
    fn empty_and_na_cells_are_missing() {
        let csv = b"Depth,EPD\n1,\n2,NaN\n3,4\n";
        let ds = parse(csv, "gaps.csv").unwrap();
        let epd: Vec<_> = ds.column_values(1).cloned().collect();
        assert_eq!(epd, [Scalar::Missing, Scalar::Missing, Scalar::Number(4.0)]);
    }

    #[test]
    fn extension_is_case_insensitive_and_bom_is_stripped() {
        let csv = "\u{feff}Depth,Station,EPD\n1,A,2\n";
        let ds = parse(csv.as_bytes(), "UPLOAD.CSV").unwrap();
        assert!(ds.has_column("Depth"));
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let err = parse(b"Depth,Station,EPD\n", "data.txt").unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat { .. }));
        let err = parse(b"", "no_extension").unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat { .. }));
    }

    #[test]
    fn ragged_csv_is_malformed() {
        let err = parse(b"a,b\n1,2,3\n", "bad.csv").unwrap_err();
        assert!(matches!(err, LoadError::MalformedFile { format: "CSV", .. }));
    }

    #[test]
    fn invalid_utf8_and_empty_csv_are_malformed() {
        assert!(matches!(
            parse(&[0xff, 0xfe, 0x00], "bin.csv"),
            Err(LoadError::MalformedFile { .. })
        ));
        assert!(matches!(
            parse(b"  \n", "empty.csv"),
            Err(LoadError::MalformedFile { .. })
        ));
    }

    #[test]
    fn duplicate_header_is_malformed() {
        let err = parse(b"Depth,Depth\n1,2\n", "dup.csv").unwrap_err();
        assert!(matches!(err, LoadError::MalformedFile { .. }));
    }

    #[test]
    fn corrupt_workbooks_are_malformed() {
        for name in ["book.xlsx", "book.xls"] {
            let err = parse(b"definitely not a workbook", name).unwrap_err();
            assert!(matches!(err, LoadError::MalformedFile { .. }), "{name}");
        }
    }

    #[test]
    fn legacy_sheet_cells_coerce_like_csv() {
        // Cell kinds a BIFF (.xls) reader hands back: integers, floats,
        // strings, booleans and blanks.
        let mut range = Range::new((0, 0), (4, 3));
        for (c, title) in ["Depth", "Station", "EPD", "Flag"].into_iter().enumerate() {
            range.set_value((0, c as u32), Data::String(title.into()));
        }
        range.set_value((1, 0), Data::Int(5));
        range.set_value((1, 1), Data::Int(7));
        range.set_value((1, 2), Data::Float(0.25));
        range.set_value((1, 3), Data::Bool(true));
        range.set_value((2, 0), Data::Float(10.5));
        range.set_value((2, 1), Data::String("North".into()));
        range.set_value((2, 2), Data::String("NA".into()));
        range.set_value((4, 0), Data::Int(12));
        range.set_value((4, 1), Data::Int(7));
        range.set_value((4, 2), Data::Int(3));

        let (header, rows) = range_to_table(&range, FileFormat::Xls).unwrap();
        let ds = coerce(header, rows);

        assert_eq!(ds.columns(), ["Depth", "Station", "EPD", "Flag"]);
        assert_eq!(ds.len(), 3, "blank row 3 is skipped");
        let first = ds.record(0).unwrap();
        assert_eq!(first.get("Depth"), Some(&Scalar::Number(5.0)));
        assert_eq!(first.get("Station"), Some(&Scalar::Text("7".into())));
        assert_eq!(first.get("EPD"), Some(&Scalar::Number(0.25)));
        assert_eq!(first.get("Flag"), Some(&Scalar::Text("true".into())));
        let second = ds.record(1).unwrap();
        assert_eq!(second.get("Station"), Some(&Scalar::Text("North".into())));
        assert_eq!(second.get("EPD"), Some(&Scalar::Missing));
        assert_eq!(ds.record(2).unwrap().get("EPD"), Some(&Scalar::Number(3.0)));
    }

    #[test]
    fn reads_first_sheet_of_xlsx() {
        let mut book = rust_xlsxwriter::Workbook::new();
        let sheet = book.add_worksheet();
        sheet.write_string(0, 0, "Depth").unwrap();
        sheet.write_string(0, 1, "Station").unwrap();
        sheet.write_string(0, 2, "EPD").unwrap();
        sheet.write_number(1, 0, 5.0).unwrap();
        sheet.write_number(1, 1, 7.0).unwrap();
        sheet.write_number(1, 2, 0.25).unwrap();
        book.add_worksheet().write_string(0, 0, "ignored").unwrap();
        let bytes = book.save_to_buffer().unwrap();

        let ds = parse(&bytes, "book.xlsx").unwrap();
        assert_eq!(ds.columns(), ["Depth", "Station", "EPD"]);
        let rec = ds.record(0).unwrap();
        assert_eq!(rec.get("Station"), Some(&Scalar::Number(7.0)));
        assert_eq!(rec.get("EPD"), Some(&Scalar::Number(0.25)));
    }
}
