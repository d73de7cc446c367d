//! Error types for rulekit

use crate::ruleset::BypassActorType;

pub type Result<T> = std::result::Result<T, Error>;

/// Boxed source error for failures coming out of the transport layer.
pub type TransportSource = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Nothing matched. Callers that can create decide what to do with this.
    #[error("{0} not found")]
    NotFound(String),

    #[error(
        "cannot translate {} bypass actor {}: {}",
        .actor_type,
        display_actor_id(.actor_id),
        .reason
    )]
    UntranslatableActor {
        actor_type: BypassActorType,
        actor_id: Option<u64>,
        reason: String,
    },

    #[error("GitHub API request failed: {0}")]
    Transport(#[source] TransportSource),

    #[error("invalid ruleset config: {0}")]
    Validation(String),

    #[error("invalid scope reference `{0}`")]
    InvalidScope(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    pub fn transport<E: Into<TransportSource>>(source: E) -> Self {
        Error::Transport(source.into())
    }
}

fn display_actor_id(actor_id: &Option<u64>) -> String {
    match actor_id {
        Some(id) => id.to_string(),
        None => "<none>".to_string(),
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Validation(err.to_string())
    }
}
