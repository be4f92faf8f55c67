// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! C7: spec §4.7 end-to-end attribute-certificate validation, built on
//! top of C4 (path validation, via `attribute_authority`) and C6
//! (revocation, via `crl_revocation::RevocationCombinator`).

use std::collections::HashSet;

use x509_types::attribute_certificate::{AttributeCertificate, Target};
use x509_types::certificate::Certificate;
use x509_types::extensions::{AAControls, CRLDistributionPoints, TargetInformation};
use x509_types::oid;

use path_validation::ops::CryptoOps;
use path_validation::params::ValidationParameters;
use path_validation::revocation::RevocationChecker;
use path_validation::state::ProcessingState;

use crate::attribute_authority::{find_validated_aa_path, issuer_name, AaPathSource};
use crate::error::AcValidationError;
use crate::holder::match_holder;
use crate::targeting::check_targeting;

/// spec §4.7: the AC critical extensions this validator understands.
fn is_supported_critical_extension(extn_id: &asn1::ObjectIdentifier) -> bool {
    [
        &oid::AUTHORITY_INFORMATION_ACCESS_OID,
        &oid::AUTHORITY_KEY_IDENTIFIER_OID,
        &oid::CRL_DISTRIBUTION_POINTS_OID,
        &oid::FRESHEST_CRL_OID,
        &oid::SUBJECT_KEY_IDENTIFIER_OID,
        &oid::NO_REV_AVAIL_OID,
        &oid::TARGET_INFORMATION_OID,
        &oid::AUDIT_IDENTITY_OID,
    ]
    .into_iter()
    .any(|supported| supported == extn_id)
}

/// The AA-controls state accumulated along a validated AA path: once an
/// attribute type is excluded by any certificate on the path it stays
/// excluded, a certificate's `permitted_attrs` narrows what remains
/// permitted, and `permit_unspecified` is the AND of every certificate's
/// own flag (any cert that restricts unlisted attributes restricts them
/// for the whole path).
struct AggregatedAaControls {
    excluded: HashSet<Vec<u8>>,
    permitted: Option<HashSet<Vec<u8>>>,
    permit_unspecified: bool,
    seen_any: bool,
}

impl AggregatedAaControls {
    fn empty() -> Self {
        AggregatedAaControls {
            excluded: HashSet::new(),
            permitted: None,
            permit_unspecified: true,
            seen_any: false,
        }
    }

    fn fold_in(&mut self, controls: &AAControls<'_>) {
        self.seen_any = true;
        if let Some(excluded) = &controls.excluded_attrs {
            if let x509_types::common::Asn1ReadableOrWritable::Read(v, _) = &excluded.raw {
                for oid in v.clone() {
                    self.excluded.insert(der_bytes(&oid));
                }
            }
        }
        if let Some(permitted) = &controls.permitted_attrs {
            let allowed: HashSet<Vec<u8>> = match &permitted.raw {
                x509_types::common::Asn1ReadableOrWritable::Read(v, _) => {
                    v.clone().map(|o| der_bytes(&o)).collect()
                }
                x509_types::common::Asn1ReadableOrWritable::Write(_, _) => HashSet::new(),
            };
            self.permitted = Some(match self.permitted.take() {
                Some(existing) => existing.intersection(&allowed).cloned().collect(),
                None => allowed,
            });
        }
        self.permit_unspecified = self.permit_unspecified && controls.permit_unspecified;
    }

    fn allows(&self, oid: &asn1::ObjectIdentifier) -> bool {
        let bytes = der_bytes(oid);
        if self.excluded.contains(&bytes) {
            return false;
        }
        if !self.seen_any {
            return true;
        }
        match &self.permitted {
            Some(allowed) => allowed.contains(&bytes),
            None => self.permit_unspecified,
        }
    }
}

fn der_bytes(oid: &asn1::ObjectIdentifier) -> Vec<u8> {
    asn1::write_single(oid).unwrap_or_default()
}

fn aggregate_aa_controls(certs: &[Certificate<'_>]) -> AggregatedAaControls {
    let mut agg = AggregatedAaControls::empty();
    for cert in certs {
        if let Ok(exts) = cert.extensions() {
            if let Some(ext) = exts.get_extension(&oid::AA_CONTROLS_OID) {
                if let Ok(controls) = ext.value::<AAControls<'_>>() {
                    agg.fold_in(&controls);
                }
            }
        }
    }
    agg
}

/// Everything the caller asked this attribute certificate to be
/// evaluated against (spec §4.7).
pub struct AcValidationRequest<'a> {
    pub holder_cert: Option<&'a Certificate<'a>>,
    pub acceptable_targets: Vec<Target<'a>>,
    pub moment: asn1::DateTime,
}

/// The attribute type OIDs the AA path's aggregated AA-controls approved,
/// after scope filtering (spec §4.7 "Scope filtering").
pub struct AcValidationResult {
    pub approved_attribute_oids: Vec<asn1::ObjectIdentifier>,
}

/// Spec §4.7: validate `ac` end-to-end. `registry`/`path_source` supply
/// candidate attribute authorities and their certification paths;
/// `ops`/`revocation` are the same C1/C6 backends the caller plugs into
/// ordinary certificate-path validation.
#[allow(clippy::too_many_arguments)]
#[tracing::instrument(skip_all)]
pub fn validate_attribute_certificate<'a, B, Reg, Paths, R>(
    ac: &AttributeCertificate<'a>,
    request: &AcValidationRequest<'_>,
    registry: &Reg,
    path_source: &Paths,
    ops: &B,
    revocation: &R,
    params: &ValidationParameters,
) -> Result<AcValidationResult, AcValidationError>
where
    B: CryptoOps,
    Reg: crl_revocation::registry::CertificateRegistry,
    Paths: AaPathSource,
    R: RevocationChecker<B>,
{
    let extensions = ac.extensions();

    for extn_id in extensions.iter().filter(|e| e.critical).map(|e| e.extn_id) {
        if !is_supported_critical_extension(&extn_id) {
            return Err(AcValidationError::UnsupportedCriticalExtension(format!("{extn_id:?}")));
        }
    }

    let target_information: Option<TargetInformation<'_>> =
        extensions.get_extension(&oid::TARGET_INFORMATION_OID).and_then(|e| e.value().ok());
    if !check_targeting(target_information.as_ref(), &request.acceptable_targets) {
        return Err(AcValidationError::TargetingFailed);
    }

    if let Some(holder_cert) = request.holder_cert {
        match_holder(ac.holder(), holder_cert).map_err(AcValidationError::HolderMismatch)?;
    }

    if !ac.signature_alg_matches() {
        return Err(AcValidationError::SignatureAlgorithmMismatch);
    }

    let validity = &ac.ac_info.att_cert_validity_period;
    if &request.moment < validity.not_before_time.as_datetime() {
        return Err(AcValidationError::NotYetValid);
    }
    if &request.moment > validity.not_after_time.as_datetime() {
        return Err(AcValidationError::Expired);
    }

    let aa_path = find_validated_aa_path(
        ac.issuer(),
        &extensions,
        registry,
        path_source,
        ops,
        revocation,
        params,
        &request.moment,
    )?;

    // `find_validated_aa_path` already ran full C4 (signature, validity,
    // and C6 revocation per certificate) over the AA's own path; that
    // covers the AA's certificates, not the attribute certificate's own
    // revocation status. `no_rev_avail` (RFC 5755 §4.4.3) says no
    // revocation information is expected to exist for this AC at all —
    // absent it, check the AC's own identity (issuer + serial, scoped by
    // its own crlDistributionPoints if present) the same way C6 checks
    // an ordinary end-entity certificate.
    let no_rev_avail = extensions.get_extension(&oid::NO_REV_AVAIL_OID).is_some();
    if !no_rev_avail {
        let ac_issuer_name = issuer_name(ac.issuer()).ok_or_else(|| {
            AcValidationError::Malformed("attribute certificate issuer carries no directoryName".to_string())
        })?;
        let crl_distribution_points: Option<CRLDistributionPoints<'_>> =
            extensions.get_extension(&oid::CRL_DISTRIBUTION_POINTS_OID).and_then(|e| e.value().ok());
        let mut processing_state = ProcessingState::top_level();
        revocation.check_identity(
            &ac_issuer_name,
            &ac.ac_info.serial_number,
            crl_distribution_points.as_ref(),
            &aa_path,
            &request.moment,
            &mut processing_state,
            ops,
        )?;
    }

    let path_certs: Vec<Certificate<'_>> = aa_path.iter().cloned().collect();
    let aggregated = aggregate_aa_controls(&path_certs);

    let approved_attribute_oids = extensions_attribute_oids(ac)
        .into_iter()
        .filter(|oid| aggregated.allows(oid))
        .collect();

    Ok(AcValidationResult { approved_attribute_oids })
}

fn extensions_attribute_oids(ac: &AttributeCertificate<'_>) -> Vec<asn1::ObjectIdentifier> {
    match &ac.ac_info.attributes {
        x509_types::common::Asn1ReadableOrWritable::Read(v, _) => v.clone().map(|a| a.attr_type).collect(),
        x509_types::common::Asn1ReadableOrWritable::Write(_, _) => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_critical_extensions_match_spec_list() {
        assert!(is_supported_critical_extension(&oid::NO_REV_AVAIL_OID));
        assert!(is_supported_critical_extension(&oid::TARGET_INFORMATION_OID));
        assert!(!is_supported_critical_extension(&oid::KEY_USAGE_OID));
    }

    #[test]
    fn test_empty_aggregate_allows_everything() {
        let agg = AggregatedAaControls::empty();
        let oid = oid::NO_REV_AVAIL_OID;
        assert!(agg.allows(&oid));
    }
}
