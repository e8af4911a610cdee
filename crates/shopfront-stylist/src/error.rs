use thiserror::Error;

#[derive(Debug, Error)]
pub enum StylistError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("completion service error: {0}")]
    Service(String),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("inventory is empty; load the catalog before asking for outfits")]
    EmptyCatalog,
}
