//! User-facing error message formatting.
//!
//! Matches typed error variants (PolarsError, io::ErrorKind) rather than
//! string-parsing, so notices stay actionable and implementation-agnostic.

use std::io;

use color_eyre::eyre::Report;
use polars::prelude::PolarsError;

/// Walks the report chain for a known error type and formats it; falls back
/// to the report's own message.
pub fn user_message(report: &Report) -> String {
    for cause in report.chain() {
        if let Some(polars_err) = cause.downcast_ref::<PolarsError>() {
            return user_message_from_polars(polars_err);
        }
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            return user_message_from_io(io_err);
        }
    }
    report.to_string()
}

/// Format a PolarsError as a user-facing message by matching on its variant.
pub fn user_message_from_polars(err: &PolarsError) -> String {
    use polars::prelude::PolarsError as PE;

    match err {
        PE::NoData(msg) => format!("The upload contains no data: {}", msg),
        PE::ComputeError(msg) => format!("Could not parse the upload: {}", msg),
        PE::SchemaMismatch(msg) => format!("Schema mismatch in the upload: {}", msg),
        PE::ShapeMismatch(msg) => format!("Row shape mismatch in the upload: {}", msg),
        PE::ColumnNotFound(msg) => format!(
            "Column not found: {}. Check spelling and that the column exists.",
            msg
        ),
        PE::IO { error, .. } => user_message_from_io(error.as_ref()),
        PE::Context { error, msg } => {
            let inner = user_message_from_polars(error);
            format!("{}: {}", msg, inner)
        }
        _ => err.to_string(),
    }
}

/// Format an io::Error as a user-facing message by matching on ErrorKind.
pub fn user_message_from_io(err: &io::Error) -> String {
    use std::io::ErrorKind;

    match err.kind() {
        ErrorKind::InvalidData | ErrorKind::InvalidInput => {
            "The upload is not valid delimited text.".to_string()
        }
        ErrorKind::UnexpectedEof => "The upload ended unexpectedly.".to_string(),
        ErrorKind::PermissionDenied => "Permission denied.".to_string(),
        _ => err.to_string(),
    }
}
