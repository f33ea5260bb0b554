//! XML response decoding
//!
//! The XML API answers HTTP 200 even for rejected calls and reports the
//! failure as an `<error>` root element.

use quick_xml::Reader;
use quick_xml::events::Event;
use quick_xml::name::QName;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Decode a response body, turning an `<error>` document into [`ApiError::Remote`].
pub fn parse_response<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    if let Some(message) = error_message(body)? {
        return Err(ApiError::Remote(message));
    }

    quick_xml::de::from_str(body)
        .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
}

/// Text of the root `<error>` element, if the document is an error report.
fn error_message(body: &str) -> Result<Option<String>, ApiError> {
    let mut reader = Reader::from_reader(body.as_bytes());
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut in_error = false;
    let mut message = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(element)) if !in_error => {
                if element.name() != QName(b"error") {
                    return Ok(None);
                }
                in_error = true;
            }
            Ok(Event::Empty(element)) => {
                if !in_error {
                    return Ok((element.name() == QName(b"error")).then(String::new));
                }
            }
            Ok(Event::Text(text)) if in_error => {
                let text = text.unescape().map_err(|e| {
                    ApiError::InvalidResponse(format!("Malformed error response: {}", e))
                })?;
                message.push_str(&text);
            }
            Ok(Event::CData(data)) if in_error => {
                message.push_str(&String::from_utf8_lossy(&data));
            }
            Ok(Event::End(element)) if in_error && element.name() == QName(b"error") => {
                return Ok(Some(message.trim().to_string()));
            }
            Ok(Event::Eof) => {
                if in_error {
                    return Ok(Some(message.trim().to_string()));
                }
                return Err(ApiError::InvalidResponse("Empty response body".to_string()));
            }
            Err(err) => {
                return Err(ApiError::InvalidResponse(format!(
                    "XML parsing error: {}",
                    err
                )));
            }
            _ => {}
        }
        buf.clear();
    }
}
