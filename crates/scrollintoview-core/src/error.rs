use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Dependency \"{0}\" must be provided")]
    InvalidDependency(&'static str),

    #[error("ScrollView and target View must be provided")]
    MissingElement,

    #[error("align={0} not supported")]
    UnsupportedAlignment(String),

    #[error("Failed to scroll into view: {message}")]
    ScrollExecution {
        message: String,
        #[source]
        source: PlatformError,
    },

    #[error(
        "ScrollIntoView context is missing. Ensure your ScrollView is wrapped and is an ancestor of the target."
    )]
    MissingContext,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Wrap a platform failure raised while measuring or scrolling
    pub fn scroll_execution(source: PlatformError) -> Self {
        let rendered = source.to_string();
        let message = if rendered.is_empty() {
            "Unknown error".to_string()
        } else {
            rendered
        };
        Error::ScrollExecution { message, source }
    }
}

/// Failures reported by the host UI layer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlatformError {
    #[error("Unable to find node handle")]
    NodeNotFound,

    #[error("{0}")]
    Measurement(String),

    #[error("{0}")]
    Scroll(String),
}

pub type Result<T> = std::result::Result<T, Error>;
