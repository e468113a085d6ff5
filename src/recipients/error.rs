use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ExtractionError {
    #[error("The file can't be opened as a workbook.")]
    CantOpenWorkbook,
    #[error("The workbook doesn't contain any worksheet.")]
    NoWorksheet,
    #[error("The first worksheet of the workbook can't be read.")]
    CantReadWorksheet,
    #[error("The file can't be read as CSV.")]
    CantReadCsv,
}
