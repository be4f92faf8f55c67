// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! Error kinds for the path-processing state machine (spec §7).

use crate::ops::SignatureError;

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("certificate is not yet valid")]
    NotYetValid,
    #[error("certificate has expired")]
    Expired,
    #[error("hash algorithm is on the configured weak list")]
    WeakAlgorithm,
    #[error("RSASSA-PSS parameter mismatch")]
    PssParameterMismatch,
    #[error("signature does not verify")]
    InvalidSignature,
    #[error("malformed certificate: {0}")]
    InvalidCertificate(String),
    #[error("path building failed: {0}")]
    PathBuilding(String),
    #[error("certificate was revoked")]
    Revoked(RevokedInfo),
    #[error("insufficient revocation information: {0}")]
    InsufficientRevinfo(String),
    #[error("revocation status could not be determined: {0}")]
    RevocationIndeterminate(String),
    #[error("policy processing failed: {0}")]
    PolicyError(String),
    #[error("{0}")]
    Other(String),
}

/// Carried by `ValidationError::Revoked` (spec §7 `RevokedError`).
#[derive(Debug, Clone)]
pub struct RevokedInfo {
    pub revocation_time: asn1::DateTime,
    pub reason: Option<String>,
}

impl From<SignatureError> for ValidationError {
    fn from(e: SignatureError) -> Self {
        match e {
            SignatureError::WeakHash => ValidationError::WeakAlgorithm,
            SignatureError::PssParameterMismatch => ValidationError::PssParameterMismatch,
            SignatureError::InvalidSignature => ValidationError::InvalidSignature,
            SignatureError::UnsupportedAlgorithm => {
                ValidationError::Other("unsupported signature algorithm".to_string())
            }
            SignatureError::MalformedKey(msg) => ValidationError::InvalidCertificate(msg),
        }
    }
}

impl From<asn1::ParseError> for ValidationError {
    fn from(e: asn1::ParseError) -> Self {
        ValidationError::InvalidCertificate(format!("ASN.1 parse error: {e:?}"))
    }
}
