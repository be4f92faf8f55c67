// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! Error kinds for the CRL engine (C5) and revocation combinator (C6)
//! (spec §7).

/// Why a single candidate CRL was rejected (spec §7: "most-specific
/// error wins" when every candidate fails the same way). Carried as a
/// typed enum rather than a string so the combinator can pattern-match
/// on it instead of comparing rendered messages.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CrlCandidateFailure {
    #[error("CRL signature does not verify under any issuer candidate")]
    BadSignature,
    #[error("no certificate satisfying the CRL-issuer conditions could be found")]
    NoIssuerCandidate,
    #[error("CRL issuer's own certification path is invalid: {0}")]
    IssuerPathInvalid(String),
    #[error("CRL issuer candidate is already being validated higher up the call stack")]
    RecursionDetected,
    #[error("issuingDistributionPoint does not match the certificate's own distribution points")]
    ScopeMismatch,
    #[error("CRL is stale: thisUpdate/nextUpdate fall outside the configured freshness window")]
    Stale,
    #[error("CRL thisUpdate is after the validation moment")]
    NotYetValid,
    #[error("malformed CRL: {0}")]
    Malformed(String),
    #[error("delta CRL candidate rejected: {0}")]
    DeltaCrlRejected(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CrlError {
    #[error("every CRL candidate was rejected: {0:?}")]
    AllCandidatesFailed(Vec<CrlCandidateFailure>),
    #[error("no CRL covers this certificate")]
    NoMatch,
}

/// The combinator's (C6) own error surface, distinct from `CrlError` so
/// that OCSP-only and CRL-only failures can both be folded into one type
/// without losing which engine produced them.
#[derive(Debug, thiserror::Error)]
pub enum RevocationError {
    #[error("insufficient revocation information: {0}")]
    InsufficientRevinfo(String),
    #[error("revocation status could not be determined: {0}")]
    Indeterminate(String),
    #[error(transparent)]
    Crl(#[from] CrlError),
}

impl From<RevocationError> for path_validation::error::ValidationError {
    fn from(e: RevocationError) -> Self {
        match e {
            RevocationError::InsufficientRevinfo(msg) => {
                path_validation::error::ValidationError::InsufficientRevinfo(msg)
            }
            RevocationError::Indeterminate(msg) => {
                path_validation::error::ValidationError::RevocationIndeterminate(msg)
            }
            RevocationError::Crl(e) => {
                path_validation::error::ValidationError::RevocationIndeterminate(e.to_string())
            }
        }
    }
}
