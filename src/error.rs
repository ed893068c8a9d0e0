use thiserror::Error;

/// A page could not be retrieved.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("GET {url} returned {status}")]
    Status { url: String, status: u16 },

    #[error("GET {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("read body of {url}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            Self::Status { url, .. } | Self::Transport { url, .. } | Self::Body { url, .. } => url,
        }
    }

    /// HTTP status when the server answered, `None` for transport failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport { .. } | Self::Body { .. } => None,
        }
    }
}

/// Page content did not have the expected structure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("page has no <title>")]
    MissingTitle,

    #[error("page has no div#list_output listing")]
    MissingListing,

    #[error("listing entry {index} has no link")]
    MissingAnchor { index: usize },

    #[error("listing entry {index} link has no href")]
    MissingHref { index: usize },

    #[error("listing entry {index} has no story count")]
    MissingCount { index: usize },

    #[error("invalid story count: {0:?}")]
    InvalidCount(String),

    #[error("invalid fandom link {href:?}: {reason}")]
    InvalidFandomUrl { href: String, reason: String },
}

/// Why a section's fandom list stopped early.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("fandom name lookup failed")]
    Lookup(#[source] FetchError),
}
