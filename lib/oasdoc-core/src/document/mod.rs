//! The four logical documents.
//!
//! Each builder walks the model in the configured order and emits markup instructions; none of
//! them writes files. Separated operations and definitions come back as [`OutputFile`]s.

mod components;
pub(crate) mod definitions;
mod examples;
pub(crate) mod overview;
pub(crate) mod paths;
pub(crate) mod security;

use std::path::PathBuf;

use tracing::debug;
use url::Url;

use crate::config::ConvertConfig;
use crate::convert::OutputFile;
use crate::markup::{MarkupDocument, normalize_name};

/// A document plus the files split out of it.
#[derive(Debug, Default)]
pub(crate) struct SplitDocument {
    pub(crate) document: MarkupDocument,
    pub(crate) files: Vec<OutputFile>,
}

/// Path of a separated file, relative to the output directory.
fn separated_file(config: &ConvertConfig, folder: &str, name: &str) -> PathBuf {
    PathBuf::from(folder).join(format!("{}{}", normalize_name(name), config.extension()))
}

/// What the overview shows of a server URL.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ServerUri {
    pub(crate) host: Option<String>,
    pub(crate) base_path: Option<String>,
    pub(crate) scheme: Option<String>,
}

impl ServerUri {
    /// Splits an absolute or a path-only server URL.
    pub(crate) fn parse(raw: &str) -> Self {
        let base_path = |path: &str| {
            Some(path.trim_end_matches('/'))
                .filter(|path| !path.is_empty())
                .map(str::to_string)
        };

        if raw.starts_with('/') {
            return Self {
                base_path: base_path(raw),
                ..Self::default()
            };
        }
        match Url::parse(raw) {
            Ok(url) => Self {
                host: url.host_str().map(|host| match url.port() {
                    Some(port) => format!("{host}:{port}"),
                    None => host.to_string(),
                }),
                base_path: base_path(url.path()),
                scheme: Some(url.scheme().to_string()),
            },
            Err(error) => {
                debug!(server = raw, %error, "server url not understood, ignored");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("https://petstore.io:8443/api/v1/", Some("petstore.io:8443"), Some("/api/v1"), Some("https"))]
    #[case("http://localhost", Some("localhost"), None, Some("http"))]
    #[case("/api", None, Some("/api"), None)]
    #[case("{scheme}://petstore.io", None, None, None)]
    fn should_parse_server_uri(
        #[case] raw: &str,
        #[case] host: Option<&str>,
        #[case] base_path: Option<&str>,
        #[case] scheme: Option<&str>,
    ) {
        let uri = ServerUri::parse(raw);

        assert_eq!(uri.host.as_deref(), host);
        assert_eq!(uri.base_path.as_deref(), base_path);
        assert_eq!(uri.scheme.as_deref(), scheme);
    }
}
