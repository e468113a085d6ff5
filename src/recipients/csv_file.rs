use std::borrow::Cow;

use encoding::all::ISO_8859_1;
use encoding::{DecoderTrap, Encoding};

use crate::recipients::error::ExtractionError::CantReadCsv;
use crate::recipients::{AddressList, EMAIL_COLUMN, Result, find_email_column};
use crate::tools::{log_error_and_return, log_message_and_return};

/// Read the `Email` column of a CSV file.
/// Both `,` and `;` separated files are accepted,
/// encoded either in UTF-8 or in LATIN-1.
pub fn extract_addresses(content: &[u8]) -> Result<AddressList> {
    let content = decode(content)?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(guess_delimiter(content.as_bytes()))
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(log_message_and_return("Can't read CSV headers", CantReadCsv))?;
    let Some(column) = find_email_column(headers) else {
        debug!("CSV file has no `{EMAIL_COLUMN}` column");
        return Ok(AddressList::default());
    };

    let mut addresses = Vec::new();
    for record in reader.records() {
        let record = record.map_err(log_message_and_return("Can't read CSV record", CantReadCsv))?;
        if let Some(address) = record.get(column) {
            addresses.push(address.to_owned());
        }
    }

    Ok(addresses.into_iter().collect())
}

/// Spreadsheet software still exports CSV files in LATIN-1.
fn decode(content: &[u8]) -> Result<Cow<'_, str>> {
    match std::str::from_utf8(content) {
        Ok(content) => Ok(Cow::Borrowed(content)),
        Err(_) => {
            debug!("CSV file is not UTF-8, reading it as LATIN-1");
            ISO_8859_1
                .decode(content, DecoderTrap::Strict)
                .map(Cow::Owned)
                .map_err(log_error_and_return(CantReadCsv))
        }
    }
}

/// The separator appearing the most on the header line, quoted cells aside.
fn guess_delimiter(content: &[u8]) -> u8 {
    let header_line = content
        .split(|byte| *byte == b'\n')
        .next()
        .unwrap_or_default();
    let mut in_quotes = false;
    let (mut semicolons, mut commas) = (0, 0);
    for byte in header_line {
        match byte {
            b'"' => in_quotes = !in_quotes,
            b';' if !in_quotes => semicolons += 1,
            b',' if !in_quotes => commas += 1,
            _ => {}
        }
    }

    if semicolons > commas { b';' } else { b',' }
}
