use crate::recipients::error::ExtractionError;

pub mod csv_file;
pub mod error;
pub mod workbook;

type Result<T, E = ExtractionError> = std::result::Result<T, E>;

/// Header of the column addresses are read from.
pub const EMAIL_COLUMN: &str = "Email";

/// Addresses read from an uploaded file, in row order.
/// None of them is blank.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AddressList {
    addresses: Vec<String>,
}

impl AddressList {
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.addresses.iter().map(String::as_str)
    }
}

impl FromIterator<String> for AddressList {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            addresses: iter
                .into_iter()
                .filter(|address| !address.trim().is_empty())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileFormat {
    /// xlsx, xlsm, xlsb, xls or ods: the actual format is guessed from the content.
    Workbook,
    Csv,
}

impl FileFormat {
    /// Guess the format of an uploaded file from its name and declared content type.
    /// Anything that isn't explicitly CSV is handled as a workbook.
    pub fn detect(filename: Option<&str>, content_type: Option<&str>) -> Self {
        let is_csv_content_type = content_type
            .map(|content_type| {
                let content_type = content_type.to_ascii_lowercase();
                content_type.starts_with("text/csv") || content_type.starts_with("application/csv")
            })
            .unwrap_or(false);
        let is_csv_filename = filename
            .map(|filename| filename.to_ascii_lowercase().ends_with(".csv"))
            .unwrap_or(false);

        if is_csv_content_type || is_csv_filename {
            FileFormat::Csv
        } else {
            FileFormat::Workbook
        }
    }
}

/// Read every non-blank value of the `Email` column.
/// A file without such a column gives an empty list, a file that can't be decoded gives an error.
pub fn extract_addresses(content: &[u8], format: FileFormat) -> Result<AddressList> {
    let addresses = match format {
        FileFormat::Workbook => workbook::extract_addresses(content),
        FileFormat::Csv => csv_file::extract_addresses(content),
    }?;
    debug!("Addresses found in uploaded file: {addresses:?}");

    Ok(addresses)
}

fn find_email_column<I, S>(headers: I) -> Option<usize>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    headers
        .into_iter()
        .position(|header| header.as_ref() == EMAIL_COLUMN)
}
