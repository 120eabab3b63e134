// File: src/multipart.rs
// Purpose: multipart/form-data body decoding

use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MultipartError {
    #[error("content type has no multipart boundary")]
    MissingBoundary,
}

/// An uploaded file part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub filename: String,
    pub content: Vec<u8>,
    pub size: usize,
}

/// One decoded form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormField {
    Text(String),
    File(UploadedFile),
}

impl FormField {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FormField::Text(text) => Some(text),
            FormField::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&UploadedFile> {
        match self {
            FormField::File(file) => Some(file),
            FormField::Text(_) => None,
        }
    }
}

/// Extract the `boundary` parameter from a Content-Type header value
pub fn extract_boundary(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.trim().split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("boundary") {
            return None;
        }
        let value = value.trim().trim_matches('"');
        (!value.is_empty()).then(|| value.to_string())
    })
}

/// Decode a multipart body, failing only when the boundary is missing
pub fn try_parse_multipart(
    body: &[u8],
    content_type: &str,
) -> Result<HashMap<String, FormField>, MultipartError> {
    let boundary = extract_boundary(content_type).ok_or(MultipartError::MissingBoundary)?;
    let delimiter = format!("--{}", boundary);

    let mut fields = HashMap::new();
    for part in split_bytes(body, delimiter.as_bytes()) {
        if let Some((name, field)) = parse_part(part) {
            fields.insert(name, field);
        }
    }
    Ok(fields)
}

/// Decode a multipart body; a missing boundary yields no fields
pub fn parse_multipart(body: &[u8], content_type: &str) -> HashMap<String, FormField> {
    try_parse_multipart(body, content_type).unwrap_or_default()
}

fn parse_part(part: &[u8]) -> Option<(String, FormField)> {
    let part = part.strip_prefix(b"\r\n").unwrap_or(part);
    // Empty preamble and the closing `--` terminator
    if part.is_empty() || part.starts_with(b"--") {
        return None;
    }

    let split = find_bytes(part, b"\r\n\r\n")?;
    let headers = String::from_utf8_lossy(&part[..split]);
    let content = &part[split + 4..];
    let content = content.strip_suffix(b"\r\n").unwrap_or(content);

    let disposition = headers.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.trim()
            .eq_ignore_ascii_case("content-disposition")
            .then_some(value)
    })?;

    let name = disposition_param(disposition, "name")?;
    match disposition_param(disposition, "filename") {
        Some(filename) if !filename.is_empty() => {
            let file = UploadedFile {
                filename,
                content: content.to_vec(),
                size: content.len(),
            };
            Some((name, FormField::File(file)))
        }
        _ => Some((name, FormField::Text(String::from_utf8_lossy(content).into_owned()))),
    }
}

/// Look up `key="value"` among the `;`-separated disposition params.
/// Keys are compared exactly, so `name` never matches `filename`.
fn disposition_param(disposition: &str, key: &str) -> Option<String> {
    disposition.split(';').find_map(|param| {
        let (k, v) = param.trim().split_once('=')?;
        (k.trim() == key).then(|| v.trim().trim_matches('"').to_string())
    })
}

fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn split_bytes<'a>(haystack: &'a [u8], delimiter: &[u8]) -> Vec<&'a [u8]> {
    let mut parts = Vec::new();
    let mut rest = haystack;
    while let Some(pos) = find_bytes(rest, delimiter) {
        parts.push(&rest[..pos]);
        rest = &rest[pos + delimiter.len()..];
    }
    parts.push(rest);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CT: &str = "multipart/form-data; boundary=XyZ";

    fn body() -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(b"--XyZ\r\n");
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"field1\"\r\n\r\n");
        body.extend_from_slice(b"hello world\r\n");
        body.extend_from_slice(b"--XyZ\r\n");
        body.extend_from_slice(
            b"Content-Disposition: form-data; name=\"file1\"; filename=\"a.txt\"\r\n",
        );
        body.extend_from_slice(b"Content-Type: text/plain\r\n\r\n");
        body.extend_from_slice(b"line one\r\nline two\r\n");
        body.extend_from_slice(b"--XyZ--\r\n");
        body
    }

    #[test]
    fn test_extract_boundary() {
        assert_eq!(extract_boundary(CT), Some("XyZ".to_string()));
        assert_eq!(
            extract_boundary("multipart/form-data; charset=utf-8; boundary=\"quoted\""),
            Some("quoted".to_string())
        );
        assert_eq!(extract_boundary("multipart/form-data"), None);
    }

    #[test]
    fn test_two_part_body() {
        let fields = parse_multipart(&body(), CT);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["field1"], FormField::Text("hello world".to_string()));

        let file = fields["file1"].as_file().expect("file field");
        assert_eq!(file.filename, "a.txt");
        assert_eq!(file.content, b"line one\r\nline two".to_vec());
        assert_eq!(file.size, file.content.len());
    }

    #[test]
    fn test_missing_boundary_is_empty() {
        assert!(parse_multipart(&body(), "multipart/form-data").is_empty());
        assert_eq!(
            try_parse_multipart(&body(), "multipart/form-data"),
            Err(MultipartError::MissingBoundary)
        );
    }

    #[test]
    fn test_empty_filename_is_text_field() {
        let body = b"--b\r\nContent-Disposition: form-data; name=\"f\"; filename=\"\"\r\n\r\n\r\n--b--";
        let fields = parse_multipart(body, "multipart/form-data; boundary=b");
        assert_eq!(fields["f"], FormField::Text(String::new()));
    }

    #[test]
    fn test_part_without_blank_line_is_skipped() {
        let body = b"--b\r\nContent-Disposition: form-data; name=\"f\"\r\n--b--";
        assert!(parse_multipart(body, "multipart/form-data; boundary=b").is_empty());
    }

    #[test]
    fn test_binary_content_is_preserved() {
        let mut body = b"--b\r\nContent-Disposition: form-data; name=\"bin\"; filename=\"x.bin\"\r\n\r\n".to_vec();
        body.extend_from_slice(&[0, 159, 255, 10]);
        body.extend_from_slice(b"\r\n--b--\r\n");
        let fields = parse_multipart(&body, "multipart/form-data; boundary=b");
        let file = fields["bin"].as_file().expect("file field");
        assert_eq!(file.content, vec![0, 159, 255, 10]);
        assert_eq!(file.size, 4);
    }
}
