use thiserror::Error;

/// Convenient result alias for the EDSM scanner library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The origin name did not match any system returned by the lookup.
    #[error("origin system not found: {name}{}", format_suggestions(.suggestions))]
    OriginNotFound {
        name: String,
        suggestions: Vec<String>,
    },

    /// The destination name did not match any system returned by the lookup.
    #[error("destination system not found: {name}{}", format_suggestions(.suggestions))]
    DestinationNotFound {
        name: String,
        suggestions: Vec<String>,
    },

    /// The corridor search kept returning to an already visited sphere, even
    /// after escalating the search radius.
    #[error("stuck when finding a route between the two systems using a search radius of {radius}ly")]
    RouteStuck { radius: f64 },

    /// A corridor hop returned no systems at all.
    #[error("unable to find a route from {name} using a search radius of {radius}ly")]
    NoRouteFound { name: String, radius: f64 },

    /// A detail fetch failed; the whole fan-out is discarded.
    #[error("failed to fetch details for {name}")]
    DetailFetchFailed {
        name: String,
        #[source]
        source: Box<Error>,
    },

    /// Raised when a field filter expression cannot be parsed.
    #[error("invalid filter '{expression}': {message}")]
    InvalidFilter { expression: String, message: String },

    /// Raised by lookup implementations that are not backed by HTTP.
    #[error("lookup failed: {message}")]
    Lookup { message: String },

    /// Wrapper for HTTP client errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Wrapper for JSON decoding errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The worker pool for detail fetches could not be started.
    #[error("failed to start detail fetch workers")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_lists_suggestions() {
        let error = Error::OriginNotFound {
            name: "Sol ".to_string(),
            suggestions: vec!["Sol".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "origin system not found: Sol . Did you mean 'Sol'?"
        );

        let error = Error::DestinationNotFound {
            name: "Colona".to_string(),
            suggestions: Vec::new(),
        };
        assert_eq!(error.to_string(), "destination system not found: Colona");
    }

    #[test]
    fn detail_failure_keeps_source() {
        let error = Error::DetailFetchFailed {
            name: "Sol".to_string(),
            source: Box::new(Error::Lookup {
                message: "boom".to_string(),
            }),
        };
        let source = std::error::Error::source(&error).expect("source kept");
        assert_eq!(source.to_string(), "lookup failed: boom");
    }
}
