//! Support for the CSV interchange format.
//!
//! The first record is the header `File,Key,<lang...>`; every later record is
//! one `(file, key)` row. Standard CSV quoting applies. Input may start with a
//! byte-order mark (spreadsheet tools like to add one); it is stripped.
use std::io::{BufRead, Write};

use crate::{error::Error, matrix::LanguageMatrix, traits::TabularCodec};

/// Names of the two fixed leading columns.
pub const FILE_COLUMN: &str = "File";
pub const KEY_COLUMN: &str = "Key";

pub struct CsvCodec;

impl TabularCodec for CsvCodec {
    fn from_reader<R: BufRead>(reader: R) -> Result<LanguageMatrix, Error> {
        let decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
            .encoding(Some(encoding_rs::UTF_8))
            .bom_override(true)
            .strip_bom(true)
            .build(reader);
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(decoder);

        let mut records = rdr.records();
        let header = match records.next() {
            Some(header) => header?,
            None => return Err(Error::malformed("CSV input has no header row")),
        };
        let languages = header_languages(header.iter())?;

        let mut matrix = LanguageMatrix::new();
        for (index, record) in records.enumerate() {
            let record = record?;
            let cells: Vec<&str> = record.iter().collect();
            insert_row(&mut matrix, &languages, &cells, index + 2)?;
        }
        Ok(matrix)
    }

    fn to_writer<W: Write>(
        matrix: &LanguageMatrix,
        languages: &[String],
        writer: W,
    ) -> Result<(), Error> {
        let mut wtr = csv::WriterBuilder::new().from_writer(writer);
        wtr.write_record(header_row(languages))?;
        for row in matrix.rows() {
            let mut record = Vec::with_capacity(languages.len() + 2);
            record.push(row.file);
            record.push(row.key);
            record.extend(languages.iter().map(|l| row.value_or_empty(l)));
            wtr.write_record(record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// `File, Key, <languages...>`.
pub(crate) fn header_row(languages: &[String]) -> Vec<&str> {
    let mut header = vec![FILE_COLUMN, KEY_COLUMN];
    header.extend(languages.iter().map(String::as_str));
    header
}

/// The language columns named by a header row; columns 0 and 1 are reserved.
///
/// A blank header cell yields `None`: that column is skipped on every row.
/// Spreadsheet tools often leave a trailing separator or an unused column.
pub(crate) fn header_languages<'a, I>(header: I) -> Result<Vec<Option<String>>, Error>
where
    I: IntoIterator<Item = &'a str>,
{
    let columns: Vec<&str> = header.into_iter().collect();
    if columns.len() < 2 {
        return Err(Error::malformed(format!(
            "header must start with `{FILE_COLUMN}` and `{KEY_COLUMN}` columns, found {} column(s)",
            columns.len()
        )));
    }
    Ok(columns[2..]
        .iter()
        .enumerate()
        .map(|(offset, cell)| {
            let language = cell.trim();
            if language.is_empty() {
                tracing::debug!(column = offset + 3, "skipping column with a blank header");
                None
            } else {
                Some(language.to_string())
            }
        })
        .collect())
}

/// Adds one data row; `line` is the 1-based row number for error messages.
///
/// Every named header language is inserted, so an empty cell decodes to `""`.
/// Cells under a blank header or beyond the header are ignored.
pub(crate) fn insert_row(
    matrix: &mut LanguageMatrix,
    languages: &[Option<String>],
    cells: &[&str],
    line: usize,
) -> Result<(), Error> {
    let named = languages
        .iter()
        .rposition(Option::is_some)
        .map_or(0, |last| last + 1);
    let expected = named + 2;
    if cells.len() < expected {
        return Err(Error::malformed(format!(
            "row {line} has {} column(s), header has {expected}",
            cells.len()
        )));
    }
    let values = matrix.row_mut(cells[0], cells[1]);
    for (language, value) in languages.iter().zip(&cells[2..]) {
        if let Some(language) = language {
            values.insert(language.clone(), value.to_string());
        }
    }
    Ok(())
}
