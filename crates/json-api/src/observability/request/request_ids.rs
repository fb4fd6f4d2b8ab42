//! Correlation ids carried on `x-request-id`.

use std::fmt;

use salvo::{http::header::HeaderValue, prelude::Response};
use tracing::warn;
use uuid::Uuid;

pub(super) const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct RequestId(String);

impl RequestId {
    /// Keeps a caller-supplied id, or mints a v7 uuid when it is absent or blank.
    pub(super) fn from_header(incoming: Option<&str>) -> Self {
        match incoming.map(str::trim) {
            Some(id) if !id.is_empty() => Self(id.to_owned()),
            _ => Self(Uuid::now_v7().to_string()),
        }
    }

    pub(super) fn echo(&self, res: &mut Response) {
        match HeaderValue::from_str(&self.0) {
            Ok(value) => {
                res.headers_mut().insert(REQUEST_ID_HEADER, value);
            }
            Err(source) => warn!(request_id = %self, "request id is not a valid header: {source}"),
        }
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_ids_are_kept_and_trimmed() {
        assert_eq!(RequestId::from_header(Some(" abc ")).to_string(), "abc");
    }

    #[test]
    fn blank_or_missing_ids_are_minted() {
        for incoming in [None, Some(""), Some("   ")] {
            let id = RequestId::from_header(incoming).to_string();

            assert!(Uuid::parse_str(&id).is_ok(), "{incoming:?} should mint a uuid");
        }
    }
}
