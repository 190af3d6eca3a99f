use base64::{Engine as _, engine::general_purpose};

use crate::mail::gmail::Message;

/// The Subject header value, if the message carries one.
pub fn subject(message: &Message) -> Option<String> {
    message
        .payload
        .as_ref()?
        .headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case("Subject"))
        .map(|h| h.value.clone())
}

/// Decodes the message body to plain text.
///
/// Multipart payloads use the first part's body data, flat payloads the
/// body directly. Returns `None` when nothing decodable is present — the
/// caller skips the message and leaves it unread.
pub fn body_text(message: &Message) -> Option<String> {
    let payload = message.payload.as_ref()?;

    let data = if payload.parts.is_empty() {
        payload.body.as_ref()?.data.as_deref()?
    } else {
        payload.parts.first()?.body.as_ref()?.data.as_deref()?
    };

    // Gmail body data is base64 in the URL-safe alphabet, sometimes unpadded.
    let bytes = general_purpose::URL_SAFE
        .decode(data)
        .or_else(|_| general_purpose::URL_SAFE_NO_PAD.decode(data))
        .ok()?;

    Some(to_plain_text(&bytes))
}

/// Best-effort plain text: MIME-decode when the bytes form a parseable
/// message, otherwise take them as-is.
fn to_plain_text(raw: &[u8]) -> String {
    match mailparse::parse_mail(raw) {
        Ok(parsed) => parsed
            .get_body()
            .unwrap_or_else(|_| String::from_utf8_lossy(raw).into_owned()),
        Err(_) => String::from_utf8_lossy(raw).into_owned(),
    }
}
