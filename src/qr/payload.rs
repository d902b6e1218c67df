use crate::foundation::error::{CheckinError, CheckinResult};

/// Path segment joining the application origin and the token.
pub const CHECKIN_PATH: &str = "/checkin/";

/// Build the public check-in URL `{origin}/checkin/{token}`.
///
/// The payload depends only on the origin and the token. Tokens are opaque: characters outside
/// the URL-unreserved set (`A-Z a-z 0-9 - . _ ~`) are percent-encoded, so tokens from the
/// built-in generator appear verbatim.
pub fn checkin_url(origin: &str, token: &str) -> CheckinResult<String> {
    let origin = origin.trim().trim_end_matches('/');
    validate_origin(origin)?;
    validate_token(token)?;
    Ok(format!("{origin}{CHECKIN_PATH}{}", urlencoding::encode(token)))
}

/// Reject origins that are not absolute http(s) URLs.
pub fn validate_origin(origin: &str) -> CheckinResult<()> {
    let rest = origin
        .strip_prefix("https://")
        .or_else(|| origin.strip_prefix("http://"))
        .ok_or_else(|| {
            CheckinError::validation(format!("app origin must be http(s): '{origin}'"))
        })?;
    if rest.is_empty() || rest.contains(char::is_whitespace) {
        return Err(CheckinError::validation(format!(
            "app origin has no host: '{origin}'"
        )));
    }
    Ok(())
}

/// Reject empty tokens and tokens containing control characters.
pub fn validate_token(token: &str) -> CheckinResult<()> {
    if token.is_empty() {
        return Err(CheckinError::validation("check-in token is empty"));
    }
    if token.chars().any(char::is_control) {
        return Err(CheckinError::validation(
            "check-in token contains control characters",
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/qr/payload.rs"]
mod tests;
