// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! `InvalidAttrCertificate` (spec §7), the attribute-certificate
//! validator's (C7) own error surface.

use path_validation::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HolderField {
    BaseCertificateId,
    EntityName,
    ObjectDigestInfo,
}

impl std::fmt::Display for HolderField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            HolderField::BaseCertificateId => "baseCertificateID",
            HolderField::EntityName => "entityName",
            HolderField::ObjectDigestInfo => "objectDigestInfo",
        };
        f.write_str(s)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AcValidationError {
    #[error("attribute certificate is not yet valid")]
    NotYetValid,
    #[error("attribute certificate has expired")]
    Expired,
    #[error("attribute certificate carries an unsupported critical extension: {0}")]
    UnsupportedCriticalExtension(String),
    #[error("holder does not match the supplied holder certificate: {0:?}")]
    HolderMismatch(Vec<HolderField>),
    #[error("no targets sequence in targetInformation is fully satisfied by the acceptable targets")]
    TargetingFailed,
    #[error("envelope signatureAlgorithm does not match ac_info.signature")]
    SignatureAlgorithmMismatch,
    #[error("no candidate attribute authority's certification path validated")]
    NoAcceptableAuthority,
    #[error("malformed attribute certificate: {0}")]
    Malformed(String),
    #[error(transparent)]
    PathValidation(#[from] ValidationError),
}
