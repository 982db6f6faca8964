use std::{path::PathBuf, sync::Arc};

/// This is an error that stopped us from reading a sidecar.
///
/// Problems with single values never show up here; those fall back to the
/// field's default instead.
#[derive(Clone, Debug)]
pub enum ExtractError {
    /// The sidecar doesn't exist.
    NotFound { path: PathBuf },

    /// The sidecar exists, but couldn't be read.
    Io {
        path: PathBuf,
        // note: `Arc` allows us to impl `Clone`
        source: Arc<std::io::Error>,
    },

    /// `xmltree` failed to parse the XML.
    XmlMalformed {
        /// `None` when parsing from memory.
        path: Option<PathBuf>,
        source: Arc<xmltree::ParseError>,
    },
}

impl ExtractError {
    pub(crate) fn from_io(path: PathBuf, e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => ExtractError::NotFound { path },
            _ => ExtractError::Io {
                path,
                source: e.into(),
            },
        }
    }
}

impl From<xmltree::ParseError> for ExtractError {
    fn from(e: xmltree::ParseError) -> Self {
        ExtractError::XmlMalformed {
            path: None,
            source: Arc::new(e),
        }
    }
}

impl core::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ExtractError::NotFound { path } => {
                write!(f, "XMP file not found: `{}`", path.display())
            }

            ExtractError::Io { path, source } => {
                write!(f, "Couldn't read XMP file `{}`. err: {source}", path.display())
            }

            ExtractError::XmlMalformed {
                path: Some(path),
                source,
            } => write!(
                f,
                "XMP file `{}` isn't well-formed XML. err: {source}",
                path.display()
            ),

            ExtractError::XmlMalformed { path: None, source } => {
                write!(f, "XMP document isn't well-formed XML. err: {source}")
            }
        }
    }
}

impl core::error::Error for ExtractError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            ExtractError::NotFound { .. } => None,
            ExtractError::Io { source, .. } => Some(source.as_ref()),
            ExtractError::XmlMalformed { source, .. } => Some(source.as_ref()),
        }
    }
}
