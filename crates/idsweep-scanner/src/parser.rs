use crate::probe::ProbeOutcome;

const TITLE_OPEN: &str = r#""title":""#;
const TITLE_CLOSE: char = '"';

/// Text between the first `"title":"` and the next `"`, if both are present.
pub fn extract_title(body: &str) -> Option<&str> {
    let start = body.find(TITLE_OPEN)? + TITLE_OPEN.len();
    let rest = &body[start..];
    let end = rest.find(TITLE_CLOSE)?;
    Some(&rest[..end])
}

/// Classify a 200 response body.
///
/// The title is only extracted for matching bodies; a missing or unterminated
/// title falls back to `placeholder`.
pub fn classify_body(body: &str, marker: &str, placeholder: &str) -> ProbeOutcome {
    if !body.contains(marker) {
        return ProbeOutcome::Success {
            matched: false,
            title: None,
        };
    }

    let title = extract_title(body).unwrap_or(placeholder).to_string();
    ProbeOutcome::Success {
        matched: true,
        title: Some(title),
    }
}
