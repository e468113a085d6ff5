use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};

use crate::recipients::error::ExtractionError::{CantOpenWorkbook, CantReadWorksheet, NoWorksheet};
use crate::recipients::{AddressList, EMAIL_COLUMN, Result, find_email_column};
use crate::tools::log_message_and_return;

/// Read the `Email` column of the first worksheet.
/// The first row of the used range holds the headers.
pub fn extract_addresses(content: &[u8]) -> Result<AddressList> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(content))
        .map_err(log_message_and_return("Can't open uploaded workbook", CantOpenWorkbook))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| {
            error!("Uploaded workbook has no worksheet");
            NoWorksheet
        })?
        .map_err(log_message_and_return(
            "Can't read first worksheet of uploaded workbook",
            CantReadWorksheet,
        ))?;

    let mut rows = range.rows();
    let Some(headers) = rows.next() else {
        debug!("First worksheet is empty");
        return Ok(AddressList::default());
    };
    let Some(column) = find_email_column(headers.iter().map(Data::to_string)) else {
        debug!("First worksheet has no `{EMAIL_COLUMN}` column");
        return Ok(AddressList::default());
    };

    Ok(rows
        .filter_map(|row| row.get(column))
        .filter_map(cell_to_address)
        .collect())
}

fn cell_to_address(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(value) => Some(value.clone()),
        other => Some(other.to_string()),
    }
}
