use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCause {
    Transport,
    Status(u16),
    Decode,
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCause::Transport => write!(f, "transport"),
            FailureCause::Status(code) => write!(f, "statut HTTP {}", code),
            FailureCause::Decode => write!(f, "JSON illisible"),
        }
    }
}

/// Failure of a single call to the knowledge-graph endpoint.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{cause}: {detail}")]
pub struct EndpointError {
    pub cause: FailureCause,
    pub detail: String,
}

impl EndpointError {
    pub fn transport(detail: impl Into<String>) -> Self {
        Self {
            cause: FailureCause::Transport,
            detail: detail.into(),
        }
    }

    pub fn status(code: u16, detail: impl Into<String>) -> Self {
        Self {
            cause: FailureCause::Status(code),
            detail: detail.into(),
        }
    }

    pub fn decode(detail: impl Into<String>) -> Self {
        Self {
            cause: FailureCause::Decode,
            detail: detail.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AskError {
    #[error("requête candidate rejetée ({failure})")]
    CandidateRejected { query: String, failure: EndpointError },

    #[error("arguments de l'appel de fonction `{function}` illisibles: {detail}")]
    FunctionArguments { function: String, detail: String },

    #[error("le modèle n'a pas demandé d'appel de fonction")]
    MissingFunctionCall,

    #[error("capacité inconnue demandée par le modèle: {0}")]
    UnknownCapability(String),

    #[error("réponse du modèle sans contenu textuel")]
    MissingContent,
}

impl AskError {
    pub fn is_rejection(&self) -> bool {
        matches!(self, AskError::CandidateRejected { .. })
    }

    /// Text of the candidate the endpoint refused, verbatim.
    pub fn rejected_query(&self) -> Option<&str> {
        match self {
            AskError::CandidateRejected { query, .. } => Some(query),
            _ => None,
        }
    }
}
