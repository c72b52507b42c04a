use thiserror::Error;

use crate::chart::assembler::AssembleError;
use crate::providers::errors::ProviderError;

/// Coarse failure classes shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The provider answered with a non-2xx status.
    Http,
    /// The request never got a response (DNS, timeout, connection reset).
    Transport,
    /// The response didn't match any supported shape, or had no bars.
    MalformedPayload,
}

/// Anything that can go wrong between issuing a request and drawing its charts.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Assemble(#[from] AssembleError),
}

impl LoadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LoadError::Provider(e) => e.kind(),
            LoadError::Assemble(_) => ErrorKind::MalformedPayload,
        }
    }

    /// The text shown in the page's error element.
    pub fn user_message(&self) -> String {
        format!("Error: {self}")
    }
}
