//! Record export: format selection, the download request, and recovering
//! the server-chosen filename from the `Content-Disposition` header.

use percent_encoding::percent_decode_str;
use reqwest::Method;
use store::TokenStore;

use crate::client::ApiClient;
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Markdown,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [
        ExportFormat::Json,
        ExportFormat::Csv,
        ExportFormat::Markdown,
    ];

    /// Path segment used by the export endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Markdown => "markdown",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Markdown => "md",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Json => "JSON",
            ExportFormat::Csv => "CSV",
            ExportFormat::Markdown => "Markdown",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ExportFormat::Json => "Structured data, suitable for re-import",
            ExportFormat::Csv => "Spreadsheet-friendly table",
            ExportFormat::Markdown => "Readable document, one section per record",
        }
    }
}

/// A completed export, ready to hand to the platform download path.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPayload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Extract the filename from a `Content-Disposition` header value.
///
/// The backend sends the RFC 5987 form `filename*=UTF-8''<encoded>`; the
/// plain `filename=` form is accepted as a fallback.
pub fn parse_content_disposition(header: &str) -> Option<String> {
    for part in header.split(';') {
        let part = part.trim();
        if let Some(encoded) = part.strip_prefix("filename*=UTF-8''") {
            let decoded = percent_decode_str(encoded).decode_utf8().ok()?;
            return Some(decoded.into_owned());
        }
    }
    for part in header.split(';') {
        let part = part.trim();
        if let Some(name) = part.strip_prefix("filename=") {
            return Some(name.trim_matches('"').to_string());
        }
    }
    None
}

fn export_query(record_ids: &[i64]) -> Vec<(String, String)> {
    if record_ids.is_empty() {
        return Vec::new();
    }
    let joined = record_ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",");
    vec![("record_ids".to_string(), joined)]
}

fn fallback_filename(format: ExportFormat) -> String {
    format!("records_export.{}", format.extension())
}

impl<S: TokenStore> ApiClient<S> {
    /// Download an export of the given records; an empty id list exports
    /// everything the current filters would match server-side.
    pub async fn export_records(
        &self,
        format: ExportFormat,
        record_ids: &[i64],
    ) -> ApiResult<ExportPayload> {
        let path = format!("/export/records/{}", format.as_str());
        let builder = self
            .build_request(Method::GET, &path)
            .query(&export_query(record_ids));
        let response = self.send_request(builder).await?;

        let filename = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_content_disposition)
            .unwrap_or_else(|| fallback_filename(format));
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        Ok(ExportPayload {
            filename,
            content_type,
            bytes: bytes.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selected_ids_become_a_comma_joined_parameter() {
        let query = export_query(&[1, 2, 3]);
        assert_eq!(
            query,
            vec![("record_ids".to_string(), "1,2,3".to_string())]
        );
    }

    #[test]
    fn empty_selection_sends_no_id_parameter() {
        assert!(export_query(&[]).is_empty());
    }

    #[test]
    fn rfc5987_filename_is_decoded() {
        let header = "attachment; filename*=UTF-8''notes_2024.csv";
        assert_eq!(
            parse_content_disposition(header),
            Some("notes_2024.csv".to_string())
        );
    }

    #[test]
    fn percent_escapes_in_the_filename_are_resolved() {
        let header = "attachment; filename*=UTF-8''field%20notes%202024.md";
        assert_eq!(
            parse_content_disposition(header),
            Some("field notes 2024.md".to_string())
        );
    }

    #[test]
    fn plain_filename_form_is_accepted() {
        let header = r#"attachment; filename="records.json""#;
        assert_eq!(
            parse_content_disposition(header),
            Some("records.json".to_string())
        );
    }

    #[test]
    fn extended_form_wins_over_the_plain_one() {
        let header = r#"attachment; filename="ascii.csv"; filename*=UTF-8''r%C3%A9cits.csv"#;
        assert_eq!(
            parse_content_disposition(header),
            Some("récits.csv".to_string())
        );
    }

    #[test]
    fn header_without_any_filename_yields_none() {
        assert_eq!(parse_content_disposition("inline"), None);
    }

    #[test]
    fn fallback_name_follows_the_format_extension() {
        assert_eq!(fallback_filename(ExportFormat::Csv), "records_export.csv");
        assert_eq!(fallback_filename(ExportFormat::Markdown), "records_export.md");
    }
}
