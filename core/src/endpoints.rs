//! Resource URL resolution.
//!
//! # Design
//! URLs are built with base-relative joins (`Url::join`), the way a browser
//! resolves a link against the page it sits on, never by string
//! concatenation. A base ending in `/` is a directory, so every segment but
//! the last is joined as `segment/` to keep the hierarchy nesting. Segments
//! are percent-encoded so an id can never introduce extra path levels, a
//! query or a scheme.

use url::Url;

use crate::error::ApiError;

/// Fixed API root under the host.
pub const API_ROOT: &str = "openvidu/api/";

/// Top-level REST resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Sessions,
    Recordings,
}

impl Resource {
    pub fn path(self) -> &'static str {
        match self {
            Resource::Sessions => "sessions/",
            Resource::Recordings => "recordings/",
        }
    }
}

/// Absolute base URLs of every resource, derived once from the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    root: Url,
    sessions: Url,
    recordings: Url,
}

impl Endpoints {
    /// Derive the resource bases from `host`.
    ///
    /// A path prefix on the host is kept: `https://h/proxy` yields
    /// `https://h/proxy/openvidu/api/`.
    pub fn new(host: &Url) -> Result<Self, ApiError> {
        if host.cannot_be_a_base() {
            return Err(ApiError::InvalidHost(host.to_string()));
        }
        let mut host = host.clone();
        if !host.path().ends_with('/') {
            let path = format!("{}/", host.path());
            host.set_path(&path);
        }
        let root = host.join(API_ROOT)?;
        Ok(Self {
            sessions: root.join(Resource::Sessions.path())?,
            recordings: root.join(Resource::Recordings.path())?,
            root,
        })
    }

    /// `<host>/openvidu/api/`
    pub fn root(&self) -> &Url {
        &self.root
    }

    /// Directory-style base of `resource`, with a trailing slash.
    pub fn base(&self, resource: Resource) -> &Url {
        match resource {
            Resource::Sessions => &self.sessions,
            Resource::Recordings => &self.recordings,
        }
    }

    /// The collection URL of `resource`, without the trailing slash.
    pub fn collection(&self, resource: Resource) -> Url {
        let base = self.base(resource);
        let mut url = base.clone();
        url.set_path(base.path().trim_end_matches('/'));
        url
    }

    /// `resolve` against the base of `resource`.
    pub fn resolve(&self, resource: Resource, segments: &[&str]) -> Result<Url, ApiError> {
        resolve(self.base(resource), segments)
    }
}

/// Join `segments` onto `base`, left to right.
///
/// Empty segments are skipped, so no segments (or only empty ones) yield the
/// base unchanged.
pub fn resolve(base: &Url, segments: &[&str]) -> Result<Url, ApiError> {
    let mut url = base.clone();
    let mut segments = segments.iter().filter(|s| !s.is_empty()).peekable();
    while let Some(segment) = segments.next() {
        if matches!(*segment, "." | "..") {
            return Err(ApiError::InvalidPathSegment(segment.to_string()));
        }
        let encoded = urlencoding::encode(segment);
        let relative = if segments.peek().is_some() {
            format!("{encoded}/")
        } else {
            encoded.into_owned()
        };
        url = url.join(&relative)?;
    }
    Ok(url)
}
