//! Basic authentication and the default header set.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Username the media server expects for every REST call.
pub const USERNAME: &str = "OPENVIDUAPP";

pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Sent on every request so neither transport falls back to its own default.
pub const USER_AGENT: &str = concat!("openvidu-rust/", env!("CARGO_PKG_VERSION"));

/// `Basic base64("OPENVIDUAPP:<secret>")`.
pub fn basic_authorization(secret: &str) -> String {
    let credentials = format!("{USERNAME}:{secret}");
    format!("Basic {}", STANDARD.encode(credentials))
}

/// Headers attached to every request: authorization first, then content
/// type, accept and user agent.
pub fn default_headers(secret: &str) -> Vec<(String, String)> {
    vec![
        ("authorization".to_string(), basic_authorization(secret)),
        ("content-type".to_string(), CONTENT_TYPE_JSON.to_string()),
        ("accept".to_string(), CONTENT_TYPE_JSON.to_string()),
        ("user-agent".to_string(), USER_AGENT.to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_username_and_secret_together() {
        // base64("OPENVIDUAPP:MY_SECRET")
        assert_eq!(
            basic_authorization("MY_SECRET"),
            "Basic T1BFTlZJRFVBUFA6TVlfU0VDUkVU"
        );
    }

    #[test]
    fn empty_secret_still_carries_username() {
        let header = basic_authorization("");
        let encoded = header.strip_prefix("Basic ").unwrap();
        let decoded = STANDARD.decode(encoded).unwrap();
        assert_eq!(decoded, b"OPENVIDUAPP:");
    }

    #[test]
    fn default_headers_are_fixed() {
        let headers = default_headers("s3cr3t");
        assert_eq!(headers.len(), 4);
        assert_eq!(headers[0].0, "authorization");
        assert_eq!(headers[0].1, basic_authorization("s3cr3t"));
        assert_eq!(
            headers[1],
            ("content-type".to_string(), "application/json".to_string())
        );
        assert_eq!(headers[2], ("accept".to_string(), "application/json".to_string()));
        assert_eq!(headers[3].0, "user-agent");
        assert!(headers[3].1.starts_with("openvidu-rust/"));
    }
}
