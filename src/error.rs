pub type NavResult<T> = Result<T, NavError>;

#[derive(thiserror::Error, Debug)]
pub enum NavError {
    #[error("page not found: /{path}")]
    PageNotFound { path: String },
    #[error("malformed percent-encoding in {input:?}: {reason}")]
    Decoding { input: String, reason: String },
    #[error("page failed to load")]
    PageLoad(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("segment {segment:?} is already registered as {existing}")]
    RegistrationConflict {
        segment: String,
        existing: &'static str,
    },
    #[error("I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("navigation dispatcher is closed")]
    DispatcherClosed,
}

impl NavError {
    pub fn page_not_found(path: &[String]) -> Self {
        Self::PageNotFound {
            path: path.join("/"),
        }
    }

    pub fn decoding(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decoding {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn page_load(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::PageLoad(Box::new(source))
    }

    pub fn io_with_context(source: std::io::Error, context: impl Into<String>) -> Self {
        Self::Io {
            source,
            context: context.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn is_page_not_found(&self) -> bool {
        matches!(self, Self::PageNotFound { .. })
    }
}
