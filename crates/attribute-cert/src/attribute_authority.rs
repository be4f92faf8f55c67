// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! Spec §4.7 "AA discovery" / supplement 3 (`_candidate_ac_issuers`): find
//! a certification path to a candidate attribute authority and validate
//! it through the ordinary C4 state machine. Candidates are filtered in
//! two stages — AKI match, then subject DN match — before path
//! validation is attempted at all, and the first candidate whose path
//! validates wins.

use std::collections::HashSet;

use x509_types::attribute_certificate::{AttCertIssuer, V2Form};
use x509_types::certificate::Certificate;
use x509_types::common::AlgorithmIdentifier;
use x509_types::extensions::{AuthorityKeyIdentifier, KeyUsage};
use x509_types::name::{names_equal, GeneralName, Name};
use x509_types::oid;

use path_validation::error::ValidationError;
use path_validation::ops::{CryptoOps, SignatureError};
use path_validation::params::ValidationParameters;
use path_validation::path::ValidationPath;
use path_validation::revocation::RevocationChecker;
use path_validation::state::ProcessingState;
use path_validation::validate::PathValidator;

use crate::error::AcValidationError;

/// `PathValidator::new` consumes its `ops`/`revocation`; AA-path
/// validation only ever borrows the caller's backend, so this crate
/// re-borrows through a thin wrapper rather than requiring `Clone` on
/// every embedder's `CryptoOps`/`RevocationChecker` implementation
/// (mirrors `RefOps` in `crl_revocation::engine`).
struct RefOps<'a, B>(&'a B);

impl<'a, B: CryptoOps> CryptoOps for RefOps<'a, B> {
    type Key = B::Key;

    fn public_key(&self, cert: &Certificate<'_>) -> Result<Self::Key, SignatureError> {
        self.0.public_key(cert)
    }

    fn verify_tbs_signature(
        &self,
        tbs: &[u8],
        signature_alg: &AlgorithmIdentifier<'_>,
        signature: &[u8],
        key: &Self::Key,
        weak_hash_algorithms: &HashSet<String>,
    ) -> Result<(), SignatureError> {
        self.0.verify_tbs_signature(tbs, signature_alg, signature, key, weak_hash_algorithms)
    }

    fn sha256(&self, data: &[u8]) -> [u8; 32] {
        self.0.sha256(data)
    }

    fn is_dsa_key_missing_parameters(&self, cert: &Certificate<'_>) -> bool {
        self.0.is_dsa_key_missing_parameters(cert)
    }

    fn inherit_dsa_parameters(&self, child: &Certificate<'_>, previous: &Self::Key) -> Result<Self::Key, SignatureError> {
        self.0.inherit_dsa_parameters(child, previous)
    }

    fn key_is_dsa(&self, key: &Self::Key) -> bool {
        self.0.key_is_dsa(key)
    }
}

struct RefRevocation<'a, R>(&'a R);

impl<'a, B: CryptoOps, R: RevocationChecker<B>> RevocationChecker<RefOps<'a, B>> for RefRevocation<'a, R> {
    fn check(
        &self,
        cert: &Certificate<'_>,
        path: &ValidationPath<'_>,
        moment: &asn1::DateTime,
        processing_state: &mut ProcessingState,
        ops: &RefOps<'a, B>,
    ) -> Result<(), ValidationError> {
        self.0.check(cert, path, moment, processing_state, ops.0)
    }
}

/// Supplies candidate certification paths terminating at `aa_cert`
/// (spec §3 "Certificate Registry" `build_paths`): how those paths are
/// assembled up to a trust anchor is entirely the embedder's concern,
/// mirroring the thin pull interfaces in `crl_revocation::registry`.
pub trait AaPathSource {
    fn candidate_paths<'a>(&self, aa_cert: &Certificate<'a>) -> Vec<ValidationPath<'a>>;
}

pub(crate) fn issuer_name<'a>(issuer: &'a AttCertIssuer<'a>) -> Option<Name<'a>> {
    match issuer {
        AttCertIssuer::V1Form(names) => first_directory_name(names),
        AttCertIssuer::V2Form(V2Form { issuer_name, .. }) => {
            issuer_name.as_ref().and_then(first_directory_name)
        }
    }
}

fn first_directory_name<'a>(names: &x509_types::name::GeneralNames<'a>) -> Option<Name<'a>> {
    match names {
        x509_types::common::Asn1ReadableOrWritable::Read(v, _) => v.clone().find_map(|gn| match gn {
            GeneralName::DirectoryName(n) => Some(n),
            _ => None,
        }),
        x509_types::common::Asn1ReadableOrWritable::Write(_, _) => None,
    }
}

fn aa_usage_ok(candidate: &Certificate<'_>) -> bool {
    let Ok(exts) = candidate.extensions() else { return false };
    let ku: Option<KeyUsage<'_>> = exts.get_extension(&oid::KEY_USAGE_OID).and_then(|e| e.value().ok());
    if let Some(ku) = &ku {
        if !ku.digital_signature() {
            return false;
        }
    }
    let bc: Option<x509_types::extensions::BasicConstraints> =
        exts.get_extension(&oid::BASIC_CONSTRAINTS_OID).and_then(|e| e.value().ok());
    if let Some(bc) = &bc {
        if bc.ca {
            return false;
        }
    }
    true
}

/// Two-stage candidate filter: AKI match (when the attribute certificate
/// carries one), then subject DN match against the issuer name.
fn candidate_matches<'a>(
    candidate: &Certificate<'a>,
    issuer_name: &Name<'a>,
    aki: Option<&[u8]>,
) -> bool {
    if let Some(key_id) = aki {
        let candidate_ski = candidate
            .extensions()
            .ok()
            .and_then(|exts| exts.get_extension(&oid::SUBJECT_KEY_IDENTIFIER_OID))
            .and_then(|e| e.value::<&[u8]>().ok());
        if candidate_ski != Some(key_id) {
            return false;
        }
    }
    names_equal(candidate.subject(), issuer_name)
}

fn aa_key_identifier(ac_extensions: &x509_types::extensions::Extensions<'_>) -> Option<Vec<u8>> {
    ac_extensions
        .get_extension(&oid::AUTHORITY_KEY_IDENTIFIER_OID)
        .and_then(|e| e.value::<AuthorityKeyIdentifier<'_>>().ok())
        .and_then(|aki| aki.key_identifier.map(|k| k.to_vec()))
}

#[allow(clippy::too_many_arguments)]
pub fn find_validated_aa_path<'a, B, Reg, Paths, R>(
    issuer: &AttCertIssuer<'a>,
    ac_extensions: &x509_types::extensions::Extensions<'_>,
    registry: &Reg,
    path_source: &Paths,
    ops: &B,
    revocation: &R,
    params: &ValidationParameters,
    moment: &asn1::DateTime,
) -> Result<ValidationPath<'a>, AcValidationError>
where
    B: CryptoOps,
    Reg: crl_revocation::registry::CertificateRegistry,
    Paths: AaPathSource,
    R: RevocationChecker<B>,
{
    let name = issuer_name(issuer).ok_or_else(|| {
        AcValidationError::Malformed("attribute certificate issuer carries no directoryName".to_string())
    })?;
    let aki = aa_key_identifier(ac_extensions);

    let candidates = registry.by_subject(&name);
    for candidate in candidates {
        if !candidate_matches(&candidate, &name, aki.as_deref()) {
            continue;
        }
        if !aa_usage_ok(&candidate) {
            continue;
        }

        for path in path_source.candidate_paths(&candidate) {
            let validator = PathValidator::new(RefOps(ops), RefRevocation(revocation));
            let mut processing_state = ProcessingState::top_level();
            if validator
                .validate(&path, params, moment, &mut processing_state)
                .is_ok()
            {
                return Ok(path);
            }
        }
    }

    Err(AcValidationError::NoAcceptableAuthority)
}

/// Surfaces the last candidate's failure when nothing validated, for
/// callers that want a concrete reason rather than `NoAcceptableAuthority`.
pub fn explain_failure(err: ValidationError) -> AcValidationError {
    AcValidationError::PathValidation(err)
}
