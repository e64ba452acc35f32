/**
 * File Transfer Payloads
 *
 * `UploadFile` is what the view hands to the file store when the user picks a
 * file. `DownloadedFile` is what comes back from a download, with a filename
 * resolved from the response headers.
 */

use std::path::{Path, PathBuf};

use bytes::Bytes;
use reqwest::header::{HeaderMap, CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};

/// File selected for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Read a file from disk, guessing the content type from its extension
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let mut upload = Self::new(file_name, bytes);
        upload.content_type = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(content_type_for_extension)
            .map(str::to_string);
        Ok(upload)
    }

    /// Content type sent with the multipart part
    pub fn mime(&self) -> &str {
        self.content_type
            .as_deref()
            .unwrap_or("application/octet-stream")
    }
}

/// Content types for the document kinds the API classifies
fn content_type_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "pdf" => Some("application/pdf"),
        "txt" => Some("text/plain"),
        "csv" => Some("text/csv"),
        "xls" => Some("application/vnd.ms-excel"),
        "xlsx" => Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        "doc" => Some("application/msword"),
        "docx" => Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        _ => None,
    }
}

/// Downloaded file contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl DownloadedFile {
    /// Build from response headers and body
    ///
    /// The filename comes from `Content-Disposition` when the server sends one,
    /// otherwise it is `downloaded-file-{content-length}.{content-type subtype}`.
    pub fn from_parts(headers: &HeaderMap, bytes: Bytes) -> Self {
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let filename = headers
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(disposition_filename)
            .unwrap_or_else(|| {
                let length = headers
                    .get(CONTENT_LENGTH)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
                    .unwrap_or_else(|| bytes.len().to_string());
                let subtype = content_type
                    .as_deref()
                    .and_then(|ct| ct.split(';').next())
                    .and_then(|essence| essence.split('/').nth(1))
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .unwrap_or("bin");
                format!("downloaded-file-{}.{}", length, subtype)
            });

        Self {
            filename,
            content_type,
            bytes,
        }
    }

    /// Write the file into `dir` under its resolved filename
    pub async fn save_to(&self, dir: impl AsRef<Path>) -> std::io::Result<PathBuf> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir).await?;
        // never let a server-chosen name escape `dir`
        let name = Path::new(&self.filename)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "download".to_string());
        let path = dir.join(name);
        tokio::fs::write(&path, &self.bytes).await?;
        Ok(path)
    }
}

/// Extract the filename from a Content-Disposition value
///
/// `filename*` (RFC 5987, percent-encoded UTF-8) wins over plain `filename`.
fn disposition_filename(value: &str) -> Option<String> {
    let params: Vec<(String, String)> = split_params(value)
        .iter()
        .filter_map(|param| {
            let (key, raw) = param.split_once('=')?;
            Some((key.trim().to_ascii_lowercase(), raw.trim().to_string()))
        })
        .collect();
    let lookup = |name: &str| {
        params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, raw)| raw.as_str())
    };

    lookup("filename*")
        .and_then(decode_ext_value)
        .or_else(|| lookup("filename").map(unquote))
        .filter(|name| !name.is_empty())
}

/// Split header parameters on `;`, leaving quoted strings intact
fn split_params(value: &str) -> Vec<String> {
    let mut params = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut escaped = false;

    for c in value.chars() {
        if escaped {
            escaped = false;
        } else if c == '\\' && quoted {
            escaped = true;
        } else if c == '"' {
            quoted = !quoted;
        } else if c == ';' && !quoted {
            params.push(std::mem::take(&mut current));
            continue;
        }
        current.push(c);
    }
    params.push(current);
    params
}

/// Strip surrounding quotes and backslash escapes
fn unquote(raw: &str) -> String {
    let Some(inner) = raw
        .strip_prefix('"')
        .and_then(|r| r.strip_suffix('"'))
    else {
        return raw.to_string();
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.extend(chars.next()),
            _ => out.push(c),
        }
    }
    out
}

/// Decode an RFC 5987 `charset'language'value`
fn decode_ext_value(raw: &str) -> Option<String> {
    let mut parts = raw.splitn(3, '\'');
    let charset = parts.next()?;
    let _language = parts.next()?;
    let encoded = parts.next()?;
    if !charset.eq_ignore_ascii_case("utf-8") && !charset.eq_ignore_ascii_case("us-ascii") {
        tracing::debug!("[Transfer] Unsupported filename charset {}", charset);
        return None;
    }
    urlencoding::decode(encoded).ok().map(|name| name.into_owned())
}
