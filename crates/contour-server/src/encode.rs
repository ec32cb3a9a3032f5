//! Response encoding.
//!
//! Successful outputs are sent with status 200 either as JSON or, when the
//! endpoint declares output files and the handler produced some, as a
//! `multipart/form-data` body with one part per file and a trailing `data`
//! part carrying the JSON body. A raw output is sent verbatim under its own
//! content type. Headers are applied in a fixed order:
//! `Access-Control-Allow-Origin: *`, then the handler's headers, then
//! `Content-Type`, which therefore cannot be overridden.

use bytes::{BufMut, Bytes, BytesMut};
use contour_core::{ContourError, FileMap, Output};
use http::header::{HeaderName, HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE};
use http::{HeaderMap, Response, StatusCode};
use http_body_util::Full;
use serde_json::{Map, Value};

use crate::config::PipelineOptions;

/// Type alias for HTTP response body.
pub type ResponseBody = Full<Bytes>;

/// Type alias for the HTTP response.
pub type HttpResponse = Response<ResponseBody>;

const JSON: &str = "application/json";
const OCTET_STREAM: &str = "application/octet-stream";

/// Encodes a successful handler output.
///
/// # Errors
///
/// Returns [`ContourError::Encoding`] if the body cannot be serialized.
pub fn encode_output(output: Output, multipart: bool) -> Result<HttpResponse, ContourError> {
    let Output {
        body,
        headers,
        files,
        raw,
    } = output;

    let (content_type, payload) = if let Some(raw) = raw {
        (raw.content_type, raw.bytes)
    } else if multipart && !files.is_empty() {
        let boundary = boundary();
        let payload = multipart_body(&boundary, &files, body.as_ref())?;
        (format!("multipart/form-data; boundary={boundary}"), payload)
    } else {
        let body = body.unwrap_or_else(|| Value::Object(Map::new()));
        let payload = serde_json::to_vec(&body)
            .map_err(|error| ContourError::Encoding(error.to_string()))?;
        (JSON.to_string(), Bytes::from(payload))
    };

    let mut response = Response::new(Full::new(payload));
    *response.status_mut() = StatusCode::OK;
    let map = response.headers_mut();
    map.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    apply_headers(map, &headers);
    let content_type = HeaderValue::from_str(&content_type)
        .map_err(|error| ContourError::Encoding(error.to_string()))?;
    map.insert(CONTENT_TYPE, content_type);

    Ok(response)
}

/// Renders a pipeline error.
///
/// Input errors use `options.input_error_status`; every other error uses
/// its own status code.
#[must_use]
pub fn error_response(error: &ContourError, options: &PipelineOptions) -> HttpResponse {
    let status = match error {
        ContourError::Input { .. } => options.input_error_status,
        _ => error.status_code(),
    };
    json_response(status, &error.to_body())
}

/// Builds a plain JSON response.
#[must_use]
pub fn json_response(status: StatusCode, body: &Value) -> HttpResponse {
    let payload = serde_json::to_vec(body).unwrap_or_else(|_| b"{}".to_vec());
    let mut response = Response::new(Full::new(Bytes::from(payload)));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
    response
}

fn apply_headers(map: &mut HeaderMap, headers: &Map<String, Value>) {
    for (name, value) in headers {
        let Ok(header_name) = HeaderName::from_bytes(name.as_bytes()) else {
            tracing::warn!(header = %name, "skipping output header with an invalid name");
            continue;
        };

        let values: Vec<&Value> = match value {
            Value::Array(items) => items.iter().collect(),
            other => vec![other],
        };

        map.remove(&header_name);
        for value in values {
            match header_value(value) {
                Some(header_value) => {
                    map.append(header_name.clone(), header_value);
                }
                None => {
                    tracing::warn!(header = %name, "skipping output header with an invalid value");
                }
            }
        }
    }
}

fn header_value(value: &Value) -> Option<HeaderValue> {
    let text = match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => return None,
    };
    HeaderValue::from_str(&text).ok()
}

fn boundary() -> String {
    format!("{}{}", "-".repeat(26), uuid::Uuid::new_v4().simple())
}

fn multipart_body(
    boundary: &str,
    files: &FileMap,
    body: Option<&Value>,
) -> Result<Bytes, ContourError> {
    let mut out = BytesMut::new();

    for (field, file) in files {
        let name = quote(field);
        part_header(
            &mut out,
            boundary,
            &format!("form-data; name=\"{name}\"; filename=\"{name}\""),
            OCTET_STREAM,
        );
        out.put_slice(file.buffer());
        out.put_slice(b"\r\n");
    }

    if let Some(body) = body {
        let json =
            serde_json::to_vec(body).map_err(|error| ContourError::Encoding(error.to_string()))?;
        part_header(&mut out, boundary, "form-data; name=\"data\"", JSON);
        out.put_slice(&json);
        out.put_slice(b"\r\n");
    }

    out.put_slice(format!("--{boundary}--\r\n").as_bytes());
    Ok(out.freeze())
}

fn part_header(out: &mut BytesMut, boundary: &str, disposition: &str, content_type: &str) {
    out.put_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: {disposition}\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
}

fn quote(name: &str) -> String {
    name.replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
