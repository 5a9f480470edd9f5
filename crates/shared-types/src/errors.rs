//! # Error Types
//!
//! The error taxonomy shared by all bridge subsystems.

use std::fmt;

use thiserror::Error;

/// Classification of every bridge failure.
///
/// Only `NotYetFinal` is a non-fatal outcome; the rest revert the enclosing
/// transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Decode or structural failure. Fatal, no retry.
    MalformedInput,
    /// Signature or proof verification failed. Fatal, no mutation.
    UntrustedClaim,
    /// Threshold not reached yet. Await more submissions.
    NotYetFinal,
    /// Cross-chain ID already applied. Fatal, reported apart from attacks.
    ReplayRejected,
    /// Signer outside the active validator or custodian set. Fatal.
    AuthorityError,
    /// Store or record codec failure.
    Storage,
}

impl ErrorKind {
    /// Whether the enclosing transition must revert.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ErrorKind::NotYetFinal)
    }

    /// Stable label used for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MalformedInput => "malformed_input",
            ErrorKind::UntrustedClaim => "untrusted_claim",
            ErrorKind::NotYetFinal => "not_yet_final",
            ErrorKind::ReplayRejected => "replay_rejected",
            ErrorKind::AuthorityError => "authority_error",
            ErrorKind::Storage => "storage",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Implemented by every subsystem error so callers can classify it.
pub trait Classify {
    /// Taxonomy bucket of this error.
    fn kind(&self) -> ErrorKind;
}

/// Errors decoding an event payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// RLP structure did not match the payload layout.
    #[error("Payload decode failed: {0}")]
    Decode(String),

    /// Cross-chain ID is empty.
    #[error("Payload has an empty cross-chain id")]
    EmptyCrossChainId,

    /// Method is empty or not UTF-8.
    #[error("Payload method is empty or not utf-8")]
    InvalidMethod,
}

impl Classify for PayloadError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::MalformedInput
    }
}
