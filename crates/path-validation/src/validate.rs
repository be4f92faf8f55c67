// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! C4: the RFC 5280 §6.1 path-processing state machine. `PathValidator`
//! drives the per-certificate loop described in spec §4.4, delegating to
//! C1 (signatures, via `CryptoOps`), C2 (name constraints), C3 (the
//! policy tree) and C6 (revocation, via `RevocationChecker`) at each
//! step.

use std::collections::HashSet;

use asn1::ObjectIdentifier;

use x509_types::certificate::Certificate;
use x509_types::extensions::{
    AAControls, BasicConstraints, CertificatePolicies, Extensions, KeyUsage, NameConstraints,
    PolicyConstraints, PolicyMappings, SubjectAlternativeName,
};
use x509_types::oid;

use crate::error::ValidationError;
use crate::ops::CryptoOps;
use crate::params::ValidationParameters;
use crate::path::{TrustAnchor, ValidationPath};
use crate::policy_tree::PolicyTree;
use crate::revocation::RevocationChecker;
use crate::state::{PathState, ProcessingState};

/// One policy surviving to the end of validation (spec §4.4 step 4,
/// RFC 5280 §6.1.6 user-constrained-policy-set).
#[derive(Debug, Clone)]
pub struct QualifiedPolicy {
    pub user_domain_policy_id: ObjectIdentifier,
    pub issuer_domain_policy_id: ObjectIdentifier,
    pub qualifiers: Vec<Vec<u8>>,
}

/// Spec §4.4 "Critical-extension gate": the 16 extensions this core
/// understands well enough to let a certificate assert them as critical.
fn is_supported_critical_extension(extn_id: &ObjectIdentifier) -> bool {
    [
        &oid::AUTHORITY_INFORMATION_ACCESS_OID,
        &oid::AUTHORITY_KEY_IDENTIFIER_OID,
        &oid::BASIC_CONSTRAINTS_OID,
        &oid::CRL_DISTRIBUTION_POINTS_OID,
        &oid::EXTENDED_KEY_USAGE_OID,
        &oid::FRESHEST_CRL_OID,
        &oid::SUBJECT_KEY_IDENTIFIER_OID,
        &oid::KEY_USAGE_OID,
        &oid::OCSP_NO_CHECK_OID,
        &oid::CERTIFICATE_POLICIES_OID,
        &oid::POLICY_MAPPINGS_OID,
        &oid::POLICY_CONSTRAINTS_OID,
        &oid::INHIBIT_ANY_POLICY_OID,
        &oid::NAME_CONSTRAINTS_OID,
        &oid::SUBJECT_ALTERNATIVE_NAME_OID,
        &oid::AA_CONTROLS_OID,
    ]
    .into_iter()
    .any(|supported| supported == extn_id)
}

fn check_supported_critical_extensions(cert: &Certificate<'_>) -> Result<(), ValidationError> {
    for extn_id in cert.critical_extension_oids() {
        if !is_supported_critical_extension(&extn_id) {
            return Err(ValidationError::InvalidCertificate(format!(
                "unsupported critical extension {extn_id:?}"
            )));
        }
    }
    Ok(())
}

/// Days since the Unix epoch for a proleptic Gregorian civil date, per
/// Howard Hinnant's `days_from_civil`.
fn days_from_civil(y: i64, m: i64, d: i64) -> i64 {
    let y = if m <= 2 { y - 1 } else { y };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let mp = if m > 2 { m - 3 } else { m + 9 };
    let doy = (153 * mp + 2) / 5 + d - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146097 + doe - 719468
}

fn to_unix_seconds(dt: &asn1::DateTime) -> i64 {
    let days = days_from_civil(dt.year() as i64, dt.month() as i64, dt.day() as i64);
    days * 86400 + dt.hour() as i64 * 3600 + dt.minute() as i64 * 60 + dt.second() as i64
}

/// Spec §4.4 step 2b / §8: validity-period check with tolerance, unless
/// `digest` is in the caller's whitelist.
fn check_validity(
    cert: &Certificate<'_>,
    moment: &asn1::DateTime,
    tolerance_secs: i64,
    whitelisted_digests: &HashSet<[u8; 32]>,
    digest: &[u8; 32],
) -> Result<(), ValidationError> {
    if whitelisted_digests.contains(digest) {
        return Ok(());
    }
    let not_before = to_unix_seconds(cert.tbs_cert.validity.not_before.as_datetime());
    let not_after = to_unix_seconds(cert.tbs_cert.validity.not_after.as_datetime());
    let moment = to_unix_seconds(moment);
    if moment < not_before - tolerance_secs {
        return Err(ValidationError::NotYetValid);
    }
    if moment > not_after + tolerance_secs {
        return Err(ValidationError::Expired);
    }
    Ok(())
}

fn get_ext<'a, T: asn1::Asn1Readable<'a>>(
    extensions: &Extensions<'a>,
    oid: &ObjectIdentifier,
) -> Result<Option<T>, ValidationError> {
    match extensions.get_extension(oid) {
        Some(ext) => Ok(Some(ext.value::<T>()?)),
        None => Ok(None),
    }
}

fn extract_policies(
    certificate_policies: &CertificatePolicies<'_>,
) -> Vec<(ObjectIdentifier, Vec<Vec<u8>>)> {
    let mut out = Vec::new();
    if let x509_types::common::Asn1ReadableOrWritable::Read(v, _) = certificate_policies {
        for info in v.clone() {
            let qualifiers = match &info.policy_qualifiers {
                Some(x509_types::common::Asn1ReadableOrWritable::Read(qv, _)) => qv
                    .clone()
                    .map(|q| asn1::write_single(&q.qualifier).unwrap_or_default())
                    .collect(),
                _ => Vec::new(),
            };
            out.push((info.policy_identifier.clone(), qualifiers));
        }
    }
    out
}

fn extract_mappings(mappings: &PolicyMappings<'_>) -> Vec<(ObjectIdentifier, ObjectIdentifier)> {
    let mut out = Vec::new();
    if let x509_types::common::Asn1ReadableOrWritable::Read(v, _) = mappings {
        for mapping in v.clone() {
            out.push((mapping.issuer_domain_policy.clone(), mapping.subject_domain_policy.clone()));
        }
    }
    out
}

fn anchor_public_key_cert<'a, 'b>(anchor: &'b TrustAnchor<'a>) -> &'b Certificate<'a> {
    match anchor {
        TrustAnchor::SelfSigned(cert) => cert,
        TrustAnchor::Authority { public_key_cert, .. } => public_key_cert,
    }
}

fn write_der<T: asn1::Asn1Writable>(value: &T) -> Result<Vec<u8>, ValidationError> {
    asn1::write_single(value).map_err(|e| ValidationError::Other(format!("DER encoding failed: {e:?}")))
}

/// C4: drives the per-certificate RFC 5280 §6.1 loop over a
/// `ValidationPath`, delegating signature verification to `B` and
/// revocation checking to `R`.
pub struct PathValidator<B: CryptoOps, R: RevocationChecker<B>> {
    pub ops: B,
    pub revocation: R,
}

impl<B: CryptoOps, R: RevocationChecker<B>> PathValidator<B, R> {
    pub fn new(ops: B, revocation: R) -> Self {
        PathValidator { ops, revocation }
    }

    /// Spec §4.4: validate `path` as of `moment`, returning the
    /// surviving qualified policies or the first fatal error.
    #[tracing::instrument(skip_all)]
    pub fn validate(
        &self,
        path: &ValidationPath<'_>,
        params: &ValidationParameters,
        moment: &asn1::DateTime,
        processing_state: &mut ProcessingState,
    ) -> Result<Vec<QualifiedPolicy>, ValidationError> {
        if path.is_empty() {
            return Err(ValidationError::PathBuilding(
                "path has no certificates beyond the trust anchor".to_string(),
            ));
        }

        let n = path.len();
        let anchor = path.trust_anchor();
        let qualifiers = anchor.trust_qualifiers();
        let params = params.combine_with_anchor(&qualifiers);

        // Step 1 (init).
        let mut state = PathState {
            valid_policy_tree: PolicyTree::init(),
            explicit_policy: if params.initial_explicit_policy { 0 } else { n as u32 + 1 },
            inhibit_any_policy: if params.initial_any_policy_inhibit { 0 } else { n as u32 + 1 },
            policy_mapping: if params.initial_policy_mapping_inhibit { 0 } else { n as u32 + 1 },
            max_path_length: qualifiers.max_path_length.unwrap_or(n as u8),
            max_aa_path_length: qualifiers.max_aa_path_length.unwrap_or(n as u8),
            working_public_key: self.ops.public_key(anchor_public_key_cert(anchor))?,
            working_issuer_name: write_der(anchor.name())?,
            name_constraints: params.initial_permitted_excluded.clone(),
            aa_controls_used: false,
        };

        // Step 2 (per cert i=1..n).
        for (idx, cert) in path.iter().enumerate() {
            let is_last = idx == n - 1;
            let depth = (idx + 1) as u32;
            processing_state.current_index = idx;

            check_supported_critical_extensions(cert)?;
            let extensions = cert.extensions()?;

            // (a) signature, against the issuer's working key.
            self.ops.verify_signed_by(cert, &state.working_public_key, &params.weak_hash_algorithms)?;

            // (b) validity, unless whitelisted.
            let cert_der = write_der(cert)?;
            let digest = self.ops.sha256(&cert_der);
            check_validity(cert, moment, params.time_tolerance_secs, &params.whitelisted_digests, &digest)?;

            // (c) revocation — fatal on failure.
            self.revocation.check(cert, path, moment, processing_state, &self.ops)?;

            // (d) issuer name against working_issuer_name.
            if write_der(cert.issuer())? != state.working_issuer_name {
                return Err(ValidationError::InvalidCertificate(
                    "certificate issuer does not match the expected issuer name".to_string(),
                ));
            }

            // Spec §4.4.1: AA controls must remain present once asserted,
            // checked at every certificate (not only on prepare-next), and
            // must not be newly introduced partway through the path either
            // (SPEC_FULL.md §11 point 4 / original `_check_aa_controls`).
            let has_aa_controls = extensions.get_extension(&oid::AA_CONTROLS_OID).is_some();
            if state.aa_controls_used && !has_aa_controls {
                return Err(ValidationError::PolicyError(
                    "aa_controls extension must remain present once asserted earlier in the path".to_string(),
                ));
            }
            if has_aa_controls && !state.aa_controls_used && idx > 0 {
                return Err(ValidationError::PolicyError(
                    "aa_controls extension must not be introduced after the first certificate in the path".to_string(),
                ));
            }

            // (e) name constraints, unless self-issued and not the last cert.
            if is_last || !cert.is_self_issued() {
                let san: Option<SubjectAlternativeName<'_>> = get_ext(&extensions, &oid::SUBJECT_ALTERNATIVE_NAME_OID)?;
                state.name_constraints.accept_cert(cert.subject(), san.as_ref())?;
            }

            // (f) policy tree update.
            let certificate_policies: Option<CertificatePolicies<'_>> =
                get_ext(&extensions, &oid::CERTIFICATE_POLICIES_OID)?;
            let policies = certificate_policies.as_ref().map(|cp| extract_policies(cp));
            let any_policy_uninhibited = state.inhibit_any_policy > 0;
            state.valid_policy_tree.update(policies.as_deref(), depth, any_policy_uninhibited);
            if state.valid_policy_tree.is_null() && state.explicit_policy == 0 {
                return Err(ValidationError::PolicyError(
                    "valid policy tree is null but an explicit policy is required".to_string(),
                ));
            }

            // (g) prepare-next, for every cert but the last.
            if !is_last {
                self.prepare_next_step(cert, &extensions, &mut state, depth)?;
            }
        }

        // Step 4 (terminal).
        let last_cert = path.last().expect("path checked non-empty above");
        let last_extensions = last_cert.extensions()?;
        if state.explicit_policy > 0 {
            state.explicit_policy -= 1;
        }
        let leaf_policy_constraints: Option<PolicyConstraints> =
            get_ext(&last_extensions, &oid::POLICY_CONSTRAINTS_OID)?;
        if let Some(pc) = &leaf_policy_constraints {
            if let Some(require_explicit_policy) = pc.require_explicit_policy {
                state.explicit_policy = state.explicit_policy.min(require_explicit_policy as u32);
            }
        }

        state.valid_policy_tree.prune_unacceptable(&params.initial_policy_set);
        let qualified_policies: Vec<QualifiedPolicy> = if state.valid_policy_tree.is_null() {
            Vec::new()
        } else {
            state
                .valid_policy_tree
                .enumerate_leaves()
                .into_iter()
                .map(|leaf| {
                    // The tree this crate maintains is flattened to a single
                    // level under the any_policy root (see policy_tree.rs),
                    // so every leaf's nearest any_policy ancestor is itself.
                    let user_domain_policy_id = leaf.valid_policy.clone();
                    QualifiedPolicy {
                        issuer_domain_policy_id: user_domain_policy_id.clone(),
                        user_domain_policy_id,
                        qualifiers: leaf.qualifiers.clone(),
                    }
                })
                .collect()
        };

        if qualified_policies.is_empty() && state.explicit_policy == 0 {
            return Err(ValidationError::PolicyError(
                "no acceptable policy survived to the end of the path".to_string(),
            ));
        }

        Ok(qualified_policies)
    }

    /// Step 3 (prepare-next), run for every certificate but the last.
    fn prepare_next_step(
        &self,
        cert: &Certificate<'_>,
        extensions: &Extensions<'_>,
        state: &mut PathState<B>,
        depth: u32,
    ) -> Result<(), ValidationError> {
        // Policy mapping.
        let policy_mappings: Option<PolicyMappings<'_>> = get_ext(extensions, &oid::POLICY_MAPPINGS_OID)?;
        if let Some(pm) = &policy_mappings {
            let mappings = extract_mappings(pm);
            let policy_mapping_uninhibited = state.policy_mapping > 0;
            state.valid_policy_tree.apply_mapping(&mappings, depth, policy_mapping_uninhibited);
        }

        state.working_issuer_name = write_der(cert.subject())?;

        // Key inheritance: DSA certs with omitted domain parameters
        // inherit them from the issuer's own key.
        state.working_public_key = if self.ops.is_dsa_key_missing_parameters(cert)
            && self.ops.key_is_dsa(&state.working_public_key)
        {
            self.ops.inherit_dsa_parameters(cert, &state.working_public_key)?
        } else {
            self.ops.public_key(cert)?
        };

        let name_constraints: Option<NameConstraints<'_>> = get_ext(extensions, &oid::NAME_CONSTRAINTS_OID)?;
        if let Some(nc) = &name_constraints {
            state.name_constraints.apply(nc);
        }

        if !cert.is_self_issued() {
            if state.explicit_policy > 0 {
                state.explicit_policy -= 1;
            }
            if state.policy_mapping > 0 {
                state.policy_mapping -= 1;
            }
            if state.inhibit_any_policy > 0 {
                state.inhibit_any_policy -= 1;
            }
        }

        let policy_constraints: Option<PolicyConstraints> = get_ext(extensions, &oid::POLICY_CONSTRAINTS_OID)?;
        if let Some(pc) = &policy_constraints {
            if let Some(require_explicit_policy) = pc.require_explicit_policy {
                state.explicit_policy = state.explicit_policy.min(require_explicit_policy as u32);
            }
            if let Some(inhibit_policy_mapping) = pc.inhibit_policy_mapping {
                state.policy_mapping = state.policy_mapping.min(inhibit_policy_mapping as u32);
            }
        }
        let inhibit_any_policy: Option<u64> = get_ext(extensions, &oid::INHIBIT_ANY_POLICY_OID)?;
        if let Some(inhibit_any_policy) = inhibit_any_policy {
            state.inhibit_any_policy = state.inhibit_any_policy.min(inhibit_any_policy as u32);
        }

        let basic_constraints: Option<BasicConstraints> = get_ext(extensions, &oid::BASIC_CONSTRAINTS_OID)?;
        let is_ca = basic_constraints.as_ref().map(|bc| bc.ca).unwrap_or(false);
        if !is_ca {
            return Err(ValidationError::InvalidCertificate(
                "a non-leaf certificate in the path is not a CA".to_string(),
            ));
        }

        if !cert.is_self_issued() {
            if state.max_path_length == 0 {
                return Err(ValidationError::PathBuilding("maximum path length exceeded".to_string()));
            }
            state.max_path_length -= 1;
            if state.max_aa_path_length == 0 {
                return Err(ValidationError::PathBuilding("maximum AA path length exceeded".to_string()));
            }
            state.max_aa_path_length -= 1;
        }

        if let Some(bc) = &basic_constraints {
            if let Some(path_length) = bc.path_length {
                state.max_path_length = state.max_path_length.min(path_length as u8);
            }
        }

        let key_usage: Option<KeyUsage<'_>> = get_ext(extensions, &oid::KEY_USAGE_OID)?;
        if let Some(ku) = &key_usage {
            if !ku.key_cert_sign() {
                return Err(ValidationError::InvalidCertificate(
                    "an issuing certificate's keyUsage lacks keyCertSign".to_string(),
                ));
            }
        }

        // Spec §4.4.1: AA controls.
        let aa_controls: Option<AAControls<'_>> = get_ext(extensions, &oid::AA_CONTROLS_OID)?;
        if let Some(aac) = &aa_controls {
            state.aa_controls_used = true;
            if let Some(path_len_constraint) = aac.path_len_constraint {
                state.max_aa_path_length = state.max_aa_path_length.min(path_len_constraint as u8);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_critical_extensions_cover_spec_list() {
        assert!(is_supported_critical_extension(&oid::BASIC_CONSTRAINTS_OID));
        assert!(is_supported_critical_extension(&oid::AA_CONTROLS_OID));
        assert!(!is_supported_critical_extension(&oid::CRL_NUMBER_OID));
    }

    #[test]
    fn test_days_from_civil_epoch() {
        assert_eq!(days_from_civil(1970, 1, 1), 0);
        assert_eq!(days_from_civil(1970, 1, 2), 1);
        assert_eq!(days_from_civil(1969, 12, 31), -1);
        assert_eq!(days_from_civil(2000, 3, 1), 11017);
    }

    #[test]
    fn test_to_unix_seconds_matches_known_instant() {
        let dt = asn1::DateTime::new(1970, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(to_unix_seconds(&dt), 0);
        let dt = asn1::DateTime::new(1970, 1, 1, 0, 0, 30).unwrap();
        assert_eq!(to_unix_seconds(&dt), 30);
    }

    #[test]
    fn test_to_unix_seconds_is_monotonic_across_a_year_boundary() {
        let before = asn1::DateTime::new(2020, 12, 31, 23, 59, 59).unwrap();
        let after = asn1::DateTime::new(2021, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(to_unix_seconds(&after) - to_unix_seconds(&before), 1);
    }
}
