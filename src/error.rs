use std::fmt;

#[derive(Debug)]
pub enum ExtractError {
    /// Reading or writing a local file failed
    Io { path: String, source: std::io::Error },

    /// JSON parsing failed (design file, export snapshot, cache, baseline)
    JsonParse { context: String, source: serde_json::Error },

    /// JSON serialization failed (cache write, command output)
    JsonSerialize { context: String, source: serde_json::Error },

    /// YAML serialization failed (command output)
    YamlSerialize { context: String, source: serde_yaml::Error },

    /// Request to the design API could not be completed
    Http { context: String, source: reqwest::Error },

    /// Design API answered with a non-success status
    HttpStatus { status: u16, url: String },

    /// No design API token configured
    MissingToken,

    /// Input has no usable document tree
    MissingDocument(String),
}

impl ExtractError {
    /// Client errors are not worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            ExtractError::HttpStatus { status, .. } => !(400..500).contains(status),
            ExtractError::Http { .. } => true,
            _ => false,
        }
    }
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::Io { path, source } => {
                write!(f, "I/O error on '{}': {}", path, source)
            }
            ExtractError::JsonParse { context, source } => {
                write!(f, "JSON parse error ({}): {}", context, source)
            }
            ExtractError::JsonSerialize { context, source } => {
                write!(f, "JSON serialize error ({}): {}", context, source)
            }
            ExtractError::YamlSerialize { context, source } => {
                write!(f, "YAML serialize error ({}): {}", context, source)
            }
            ExtractError::Http { context, source } => {
                write!(f, "HTTP request failed ({}): {}", context, source)
            }
            ExtractError::HttpStatus { status, url } => {
                write!(f, "{} returned HTTP {}", url, status)
            }
            ExtractError::MissingToken => {
                write!(f, "No design API token (set FIGMA_ACCESS_TOKEN or figma.access_token)")
            }
            ExtractError::MissingDocument(msg) => {
                write!(f, "Missing document: {}", msg)
            }
        }
    }
}

impl std::error::Error for ExtractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExtractError::Io { source, .. } => Some(source),
            ExtractError::JsonParse { source, .. } => Some(source),
            ExtractError::JsonSerialize { source, .. } => Some(source),
            ExtractError::YamlSerialize { source, .. } => Some(source),
            ExtractError::Http { source, .. } => Some(source),
            _ => None,
        }
    }
}
