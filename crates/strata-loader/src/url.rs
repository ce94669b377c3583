use std::fmt;

use strata_store::StoreTarget;
use strata_types::ObjectId;

use crate::error::{LoaderError, LoaderResult};

/// A parsed object URL of the form
/// `{scheme}://{host}/streams/{stream_id}/objects/{object_id}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectUrl {
    /// Scheme and authority, without a trailing slash.
    pub origin: String,
    pub stream_id: String,
    pub object_id: ObjectId,
}

impl ObjectUrl {
    /// Parse an object URL. Query strings and fragments are ignored, as are
    /// path segments after the object id.
    pub fn parse(url: &str) -> LoaderResult<Self> {
        let invalid = |reason: &str| LoaderError::InvalidUrl {
            url: url.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = url.trim();
        let (scheme, rest) = trimmed
            .split_once("://")
            .ok_or_else(|| invalid("missing scheme"))?;
        let scheme = scheme.to_ascii_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(invalid("scheme must be http or https"));
        }

        let rest = rest.split(['?', '#']).next().unwrap_or_default();
        let (authority, path) = rest.split_once('/').unwrap_or((rest, ""));
        if authority.is_empty() {
            return Err(invalid("missing host"));
        }

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.len() < 4 {
            return Err(invalid("expected /streams/{stream}/objects/{object}"));
        }
        if segments[0] != "streams" || segments[2] != "objects" {
            return Err(invalid("expected /streams/{stream}/objects/{object}"));
        }

        let object_id = ObjectId::new(segments[3]).map_err(|e| invalid(&e.to_string()))?;
        Ok(Self {
            origin: format!("{scheme}://{authority}"),
            stream_id: segments[1].to_string(),
            object_id,
        })
    }

    /// The store location this URL's object lives in.
    pub fn target(&self) -> StoreTarget {
        StoreTarget {
            origin: self.origin.clone(),
            stream_id: self.stream_id.clone(),
        }
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/streams/{}/objects/{}",
            self.origin, self.stream_id, self.object_id
        )
    }
}

impl std::str::FromStr for ObjectUrl {
    type Err = LoaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_object_url() {
        let url = ObjectUrl::parse("https://example.org/streams/abc123/objects/def456").unwrap();
        assert_eq!(url.origin, "https://example.org");
        assert_eq!(url.stream_id, "abc123");
        assert_eq!(url.object_id.as_str(), "def456");
    }

    #[test]
    fn keeps_port_and_drops_query() {
        let url =
            ObjectUrl::parse("http://localhost:3000/streams/s/objects/o?embed=true#top").unwrap();
        assert_eq!(url.origin, "http://localhost:3000");
        assert_eq!(url.object_id.as_str(), "o");
    }

    #[test]
    fn display_roundtrip() {
        let text = "https://example.org/streams/abc/objects/def";
        let url: ObjectUrl = text.parse().unwrap();
        assert_eq!(url.to_string(), text);
    }

    #[test]
    fn target_carries_origin_and_stream() {
        let url = ObjectUrl::parse("https://example.org/streams/abc/objects/def").unwrap();
        let target = url.target();
        assert_eq!(target.origin, "https://example.org");
        assert_eq!(target.stream_id, "abc");
    }

    #[test]
    fn rejects_malformed_urls() {
        for bad in [
            "",
            "example.org/streams/a/objects/b",
            "ftp://example.org/streams/a/objects/b",
            "https:///streams/a/objects/b",
            "https://example.org/streams/a",
            "https://example.org/streams/a/commits/b",
            "https://example.org/projects/a/objects/b",
        ] {
            assert!(
                matches!(ObjectUrl::parse(bad), Err(LoaderError::InvalidUrl { .. })),
                "accepted {bad:?}"
            );
        }
    }
}
