//! Traits for format-agnostic encoding and decoding of language matrices.

use std::{
    fs::File,
    io::{BufRead, BufReader, Cursor, Read, Write},
    path::Path,
};

use crate::{error::Error, matrix::LanguageMatrix};

/// A codec between a [`LanguageMatrix`] and one external tabular format.
///
/// Every format writes one logical row per `(file, key)` with the columns
/// `File, Key, <languages...>`. A language a row has no value for is written
/// as an empty string, never left out of a header-based format.
///
/// # Example
///
/// ```rust,no_run
/// use langtable::formats::CsvCodec;
/// use langtable::traits::TabularCodec;
///
/// let matrix = CsvCodec::read_from("translations.csv")?;
/// CsvCodec::write_to(&matrix, &matrix.languages(), "copy.csv")?;
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait TabularCodec {
    /// Decode from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<LanguageMatrix, Error>;

    /// Encode to any writer, with columns in `languages` order.
    fn to_writer<W: Write>(
        matrix: &LanguageMatrix,
        languages: &[String],
        writer: W,
    ) -> Result<(), Error>;

    /// Decode from bytes.
    fn decode(bytes: &[u8]) -> Result<LanguageMatrix, Error> {
        Self::from_reader(Cursor::new(bytes))
    }

    /// Encode into a fresh buffer.
    fn encode(matrix: &LanguageMatrix, languages: &[String]) -> Result<Vec<u8>, Error> {
        let mut buffer = Vec::new();
        Self::to_writer(matrix, languages, &mut buffer)?;
        Ok(buffer)
    }

    /// Decode from a file path.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<LanguageMatrix, Error> {
        let mut bytes = Vec::new();
        BufReader::new(File::open(path)?).read_to_end(&mut bytes)?;
        Self::decode(&bytes)
    }

    /// Encode to a file path.
    ///
    /// The whole output is encoded in memory first, so a failed encode never
    /// leaves a partial file behind.
    fn write_to<P: AsRef<Path>>(
        matrix: &LanguageMatrix,
        languages: &[String],
        path: P,
    ) -> Result<(), Error> {
        let bytes = Self::encode(matrix, languages)?;
        let mut file = File::create(path)?;
        file.write_all(&bytes)?;
        file.flush()?;
        Ok(())
    }
}
