use crate::domain::model::UserRecord;
use crate::utils::error::{DeleteError, Result};

pub const USER_ID_COLUMN: &str = "user_id";

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Parses uploaded CSV content into user records, in file order.
///
/// Fails with a parse error when the content is not UTF-8 CSV with a header
/// row, and with a schema error when the header has no `user_id` column.
/// Extra columns are ignored and short rows yield an empty identifier.
pub fn parse_user_records(content: &[u8]) -> Result<Vec<UserRecord>> {
    let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);
    if std::str::from_utf8(content).is_err() {
        return Err(DeleteError::parse("file is not valid UTF-8 text"));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(content);

    let headers = reader.headers()?.clone();
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(DeleteError::parse("no columns to parse from file"));
    }

    let column = headers
        .iter()
        .position(|h| h == USER_ID_COLUMN)
        .ok_or_else(|| DeleteError::Schema {
            column: USER_ID_COLUMN.to_string(),
        })?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        records.push(UserRecord::new(row.get(column).unwrap_or_default()));
    }

    tracing::debug!(
        "Parsed {} rows ({} columns) from input",
        records.len(),
        headers.len()
    );
    Ok(records)
}
