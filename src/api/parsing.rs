use base64::{Engine as _, engine::general_purpose};
use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::Regex;
use serde_json::Value;

use crate::errors::ValidationError;

/// Multipart field that carries the document.
pub const FILE_FIELD: &str = "file";

/// A file received in an inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub fn get_header_value<'a>(headers: &'a Value, name: &str) -> Option<&'a str> {
    if let Some(v) = headers.get(name).and_then(|s| s.as_str()) {
        return Some(v);
    }
    headers.as_object().and_then(|map| {
        map.iter().find_map(|(k, v)| {
            if k.eq_ignore_ascii_case(name) {
                v.as_str()
            } else {
                None
            }
        })
    })
}

pub fn decode_url_component(input: &str) -> Result<String, String> {
    percent_decode_str(&input.replace('+', " "))
        .decode_utf8()
        .map(|s| s.to_string())
        .map_err(|e| format!("Failed to decode URL component: {e}"))
}

/// Value of a query parameter from either `queryStringParameters` or `rawQueryString`.
pub fn get_query_param(payload: &Value, name: &str) -> Option<String> {
    if let Some(v) = payload
        .get("queryStringParameters")
        .and_then(|m| m.get(name))
        .and_then(|v| v.as_str())
    {
        return Some(v.to_string());
    }

    payload
        .get("rawQueryString")
        .and_then(|q| q.as_str())
        .and_then(|q| {
            q.split('&').find_map(|kv| {
                let (key, value) = kv.split_once('=')?;
                if key != name {
                    return None;
                }
                decode_url_component(value).ok()
            })
        })
}

/// Raw request body bytes, decoding base64 when the event says so.
pub fn extract_body(payload: &Value) -> Result<Vec<u8>, ValidationError> {
    let body = payload
        .get("body")
        .and_then(|b| b.as_str())
        .ok_or(ValidationError::MissingField("body"))?;

    let is_base64 = payload
        .get("isBase64Encoded")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    if is_base64 {
        general_purpose::STANDARD
            .decode(body.trim())
            .map_err(|e| ValidationError::InvalidBody(format!("invalid base64 body: {e}")))
    } else {
        Ok(body.as_bytes().to_vec())
    }
}

/// Reads the uploaded file out of an API Gateway proxy event.
///
/// `multipart/form-data` bodies must carry a `file` part with a filename.
/// Any other body is taken as the file itself, named by the `filename` query
/// parameter or the `X-File-Name` header.
pub fn parse_upload(payload: &Value) -> Result<InboundFile, ValidationError> {
    let empty = Value::Null;
    let headers = payload.get("headers").unwrap_or(&empty);
    let body = extract_body(payload)?;

    let content_type = get_header_value(headers, "Content-Type").unwrap_or("");
    let file = if content_type
        .to_ascii_lowercase()
        .starts_with("multipart/form-data")
    {
        let boundary = multipart_boundary(content_type).ok_or_else(|| {
            ValidationError::InvalidBody("multipart body without boundary".to_string())
        })?;
        parse_multipart(&body, &boundary)?
    } else {
        let filename = get_query_param(payload, "filename")
            .or_else(|| {
                get_header_value(headers, "X-File-Name")
                    .and_then(|v| decode_url_component(v).ok())
            })
            .ok_or(ValidationError::MissingField("filename"))?;
        InboundFile {
            filename,
            bytes: body,
        }
    };

    if file.bytes.is_empty() {
        return Err(ValidationError::EmptyFile);
    }

    Ok(InboundFile {
        filename: sanitize_filename(&file.filename)?,
        bytes: file.bytes,
    })
}

pub fn multipart_boundary(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.trim().split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("boundary")
            .then(|| value.trim().trim_matches('"').to_string())
            .filter(|b| !b.is_empty())
    })
}

/// Extracts the `file` part of a multipart body. Works on bytes, the part
/// content is usually binary.
pub fn parse_multipart(body: &[u8], boundary: &str) -> Result<InboundFile, ValidationError> {
    static NAME_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r#"(?i)\bname="([^"]*)""#).expect("static regex compile"));
    static FILENAME_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r#"(?i)\bfilename="([^"]*)""#).expect("static regex compile"));

    let delimiter = format!("--{boundary}");
    let delimiter = delimiter.as_bytes();

    let mut cursor = find(body, delimiter, 0)
        .ok_or_else(|| ValidationError::InvalidBody("multipart boundary not found".to_string()))?
        + delimiter.len();

    loop {
        let rest = &body[cursor..];
        if rest.starts_with(b"--") {
            break;
        }
        let part_start = cursor + if rest.starts_with(b"\r\n") { 2 } else { 0 };
        let Some(next) = find(body, delimiter, part_start) else {
            break;
        };

        let part = &body[part_start..next];
        let part = part.strip_suffix(b"\r\n").unwrap_or(part);

        if let Some(header_end) = find(part, b"\r\n\r\n", 0) {
            let headers = String::from_utf8_lossy(&part[..header_end]);
            let disposition = headers
                .lines()
                .find(|l| l.to_ascii_lowercase().starts_with("content-disposition:"))
                .unwrap_or("");

            let name = NAME_RE.captures(disposition).map(|c| c[1].to_string());
            let filename = FILENAME_RE.captures(disposition).map(|c| c[1].to_string());

            if name.as_deref() == Some(FILE_FIELD) {
                let filename = filename.ok_or(ValidationError::MissingField("filename"))?;
                return Ok(InboundFile {
                    filename,
                    bytes: part[header_end + 4..].to_vec(),
                });
            }
        }

        cursor = next + delimiter.len();
    }

    Err(ValidationError::MissingField("file"))
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || from >= haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|i| i + from)
}

/// Reduces a client-supplied name to a safe single path component.
pub fn sanitize_filename(raw: &str) -> Result<String, ValidationError> {
    static UNSAFE_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("static regex compile"));

    let base = raw.rsplit(['/', '\\']).next().unwrap_or("");
    let cleaned = UNSAFE_RE.replace_all(base.trim(), "_");
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '_') {
        return Err(ValidationError::InvalidFilename(raw.to_string()));
    }

    Ok(cleaned.chars().take(200).collect())
}
