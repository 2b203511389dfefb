use std::{fmt, str::FromStr};

use thiserror::Error;

/// A container plus optional codec list, e.g. `video/webm;codecs=vp8,opus`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodingFormat {
    container: String,
    codecs: Vec<String>,
}

/// Error parsing an [`EncodingFormat`] from a MIME string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatParseError {
    /// Input was empty or whitespace.
    #[error("empty format string")]
    Empty,
    /// The container part is not of the form `type/subtype`.
    #[error("invalid container '{0}'")]
    InvalidContainer(String),
    /// A parameter other than `codecs` was supplied, or `codecs` was empty.
    #[error("invalid parameter '{0}'")]
    InvalidParameter(String),
}

impl EncodingFormat {
    /// Build a format from a container MIME type and codec names.
    pub fn new(container: &str, codecs: &[&str]) -> Self {
        Self {
            container: container.to_ascii_lowercase(),
            codecs: codecs.iter().map(|c| c.to_ascii_lowercase()).collect(),
        }
    }

    /// Container MIME type with codec parameters stripped (`video/webm`).
    pub fn container_mime(&self) -> &str {
        &self.container
    }

    /// Codec names in declaration order.
    pub fn codecs(&self) -> &[String] {
        &self.codecs
    }

    /// File extension conventionally used for the container.
    pub fn file_extension(&self) -> &str {
        match self.container.as_str() {
            "video/webm" | "audio/webm" => "webm",
            "video/mp4" | "audio/mp4" => "mp4",
            "video/quicktime" => "mov",
            other => other.rsplit('/').next().unwrap_or("bin"),
        }
    }
}

impl fmt::Display for EncodingFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.codecs.is_empty() {
            f.write_str(&self.container)
        } else {
            write!(f, "{};codecs={}", self.container, self.codecs.join(","))
        }
    }
}

impl FromStr for EncodingFormat {
    type Err = FormatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(FormatParseError::Empty);
        }

        let (container, params) = match s.split_once(';') {
            Some((container, params)) => (container.trim(), Some(params.trim())),
            None => (s, None),
        };

        let valid_container = container
            .split_once('/')
            .is_some_and(|(kind, sub)| !kind.is_empty() && !sub.is_empty() && !sub.contains('/'));
        if !valid_container {
            return Err(FormatParseError::InvalidContainer(container.to_string()));
        }

        let codecs = match params {
            None => Vec::new(),
            Some(params) => {
                let value = params
                    .strip_prefix("codecs=")
                    .ok_or_else(|| FormatParseError::InvalidParameter(params.to_string()))?
                    .trim_matches('"');
                let codecs: Vec<String> = value
                    .split(',')
                    .map(|c| c.trim().to_ascii_lowercase())
                    .filter(|c| !c.is_empty())
                    .collect();
                if codecs.is_empty() {
                    return Err(FormatParseError::InvalidParameter(params.to_string()));
                }
                codecs
            }
        };

        Ok(Self {
            container: container.to_ascii_lowercase(),
            codecs,
        })
    }
}

/// Formats tried on `start()`, most preferred first.
pub fn default_format_preferences() -> Vec<EncodingFormat> {
    vec![
        EncodingFormat::new("video/webm", &["vp9", "opus"]),
        EncodingFormat::new("video/webm", &["vp8", "opus"]),
        EncodingFormat::new("video/webm", &["h264", "opus"]),
        EncodingFormat::new("video/webm", &["vp9"]),
        EncodingFormat::new("video/webm", &["vp8"]),
        EncodingFormat::new("video/webm", &[]),
        EncodingFormat::new("video/mp4", &[]),
    ]
}

/// First candidate accepted by `supports`, in list order.
pub fn negotiate_format<'a, F>(
    candidates: &'a [EncodingFormat],
    supports: F,
) -> Option<&'a EncodingFormat>
where
    F: Fn(&EncodingFormat) -> bool,
{
    candidates.iter().find(|format| supports(format))
}
