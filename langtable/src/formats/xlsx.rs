//! Support for the spreadsheet (`.xlsx`) interchange format.
//!
//! The first worksheet holds the same grid as the CSV format: a header row
//! `File, Key, <lang...>` followed by one row per `(file, key)`. Every cell is
//! written as a string. On read, blank cells decode to `""`.
use std::io::{BufRead, Cursor, Write};

use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
use rust_xlsxwriter::Workbook;

use crate::{
    error::Error,
    formats::csv::{header_languages, header_row, insert_row},
    matrix::LanguageMatrix,
    traits::TabularCodec,
};

const SHEET_NAME: &str = "Translations";

pub struct XlsxCodec;

impl TabularCodec for XlsxCodec {
    fn from_reader<R: BufRead>(mut reader: R) -> Result<LanguageMatrix, Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| Error::malformed("workbook has no worksheets"))??;

        let mut rows = range.rows();
        let header: Vec<String> = match rows.next() {
            Some(cells) => cells.iter().map(cell_text).collect(),
            None => return Err(Error::malformed("worksheet has no header row")),
        };
        let languages = header_languages(header.iter().map(String::as_str))?;

        let mut matrix = LanguageMatrix::new();
        for (index, cells) in rows.enumerate() {
            let cells: Vec<String> = cells.iter().map(cell_text).collect();
            if cells.iter().all(String::is_empty) {
                continue;
            }
            let cells: Vec<&str> = cells.iter().map(String::as_str).collect();
            insert_row(&mut matrix, &languages, &cells, index + 2)?;
        }
        Ok(matrix)
    }

    fn to_writer<W: Write>(
        matrix: &LanguageMatrix,
        languages: &[String],
        mut writer: W,
    ) -> Result<(), Error> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;

        for (col, title) in header_row(languages).into_iter().enumerate() {
            sheet.write_string(0, column(col)?, title)?;
        }
        for (index, row) in matrix.rows().enumerate() {
            let line = u32::try_from(index + 1)
                .map_err(|_| Error::malformed("too many rows for a worksheet"))?;
            sheet.write_string(line, 0, row.file)?;
            sheet.write_string(line, 1, row.key)?;
            for (offset, language) in languages.iter().enumerate() {
                let value = row.value_or_empty(language);
                if !value.is_empty() {
                    sheet.write_string(line, column(offset + 2)?, value)?;
                }
            }
        }

        let buffer = workbook.save_to_buffer()?;
        writer.write_all(&buffer)?;
        Ok(())
    }
}

fn column(index: usize) -> Result<u16, Error> {
    u16::try_from(index).map_err(|_| Error::malformed("too many languages for a worksheet"))
}

/// Cell contents as text; numbers typed into the sheet by hand keep their
/// displayed form.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}
