// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! C6: the revocation combinator (spec §4.6). Plugs into `PathValidator`
//! at step 2c as a `RevocationChecker`, dispatching to the OCSP oracle
//! and the CRL engine (C5) per the per-position `RevocationPolicy` and
//! folding both into a single fatal-or-not outcome.

use x509_types::certificate::Certificate;
use x509_types::common::Asn1ReadableOrWritable;
use x509_types::extensions::{AuthorityInformationAccess, CRLDistributionPoints};
use x509_types::name::Name;
use x509_types::oid;

use path_validation::error::ValidationError;
use path_validation::ops::CryptoOps;
use path_validation::path::{TrustAnchor, ValidationPath};
use path_validation::revocation::RevocationChecker;
use path_validation::state::ProcessingState;

use crate::engine::{CrlEngine, CrlOutcome, RevocationSubject};
use crate::policy::{PerPositionRule, RevocationPolicy};
use crate::registry::{CertificateRegistry, CrlSource, OcspOracle, OcspOutcome};

/// Reported through a caller-supplied hook when a fetch error or
/// indeterminate result is soft-failed rather than treated as fatal
/// (spec §4.6 "Soft-fail failures are reported... but do not abort").
pub trait SoftFailSink {
    fn soft_fail(&self, cert: &Certificate<'_>, detail: &str);
}

/// The default sink: emits a `tracing::warn!` so soft-fails are visible
/// without a caller-supplied hook (spec §10.2).
pub struct TracingSoftFailSink;

impl SoftFailSink for TracingSoftFailSink {
    fn soft_fail(&self, cert: &Certificate<'_>, detail: &str) {
        tracing::warn!(subject = ?cert.subject(), detail, "revocation check soft-failed");
    }
}

/// C6, parameterized over the CRL engine's own type parameters plus the
/// OCSP oracle and the soft-fail sink.
pub struct RevocationCombinator<B, Reg, Src, O, S>
where
    B: CryptoOps,
    Reg: CertificateRegistry,
    Src: CrlSource,
    O: OcspOracle,
    S: SoftFailSink,
{
    crl_engine: CrlEngine<B, Reg, Src>,
    ocsp: O,
    policy: RevocationPolicy,
    sink: S,
}

impl<B, Reg, Src, O, S> RevocationCombinator<B, Reg, Src, O, S>
where
    B: CryptoOps,
    Reg: CertificateRegistry,
    Src: CrlSource,
    O: OcspOracle,
    S: SoftFailSink,
{
    pub fn new(crl_engine: CrlEngine<B, Reg, Src>, ocsp: O, policy: RevocationPolicy, sink: S) -> Self {
        RevocationCombinator { crl_engine, ocsp, policy, sink }
    }

    fn cert_declares_ocsp(cert: &Certificate<'_>) -> bool {
        let Ok(exts) = cert.extensions() else { return false };
        let Some(ext) = exts.get_extension(&oid::AUTHORITY_INFORMATION_ACCESS_OID) else {
            return false;
        };
        let Ok(aia) = ext.value::<AuthorityInformationAccess<'_>>() else {
            return false;
        };
        match aia {
            Asn1ReadableOrWritable::Read(v, _) => v.clone().any(|ad| ad.access_method == oid::AD_OCSP_OID),
            Asn1ReadableOrWritable::Write(_, _) => false,
        }
    }

    fn cert_declares_crl(cert: &Certificate<'_>) -> bool {
        cert.extensions()
            .ok()
            .map(|exts| exts.get_extension(&oid::CRL_DISTRIBUTION_POINTS_OID).is_some())
            .unwrap_or(false)
    }

    /// Spec §4.6 steps 1-7.
    fn evaluate(
        &self,
        cert: &Certificate<'_>,
        path: &ValidationPath<'_>,
        is_end_entity: bool,
        moment: &asn1::DateTime,
        processing_state: &ProcessingState,
    ) -> Result<(), ValidationError> {
        let rule: &PerPositionRule = self.policy.rule_for_position(is_end_entity);

        if matches!(rule.mode, crate::policy::RevocationMode::NoCheck) {
            return Ok(());
        }

        let declared_ocsp = Self::cert_declares_ocsp(cert);
        let declared_crl = Self::cert_declares_crl(cert);

        // Step 2: OCSP, if relevant and declared.
        let mut ocsp_status_good = false;
        let mut ocsp_matched = false;
        let mut ocsp_indeterminate: Option<Vec<String>> = None;
        if rule.ocsp_relevant() && declared_ocsp {
            let idx = processing_state.current_index;
            let issuer = if idx == 0 {
                match path.trust_anchor() {
                    TrustAnchor::SelfSigned(c) => c,
                    TrustAnchor::Authority { public_key_cert, .. } => public_key_cert.as_ref(),
                }
            } else {
                path.get(idx - 1).unwrap_or(cert)
            };
            match self.ocsp.check(cert, issuer, moment) {
                OcspOutcome::Good => {
                    ocsp_status_good = true;
                    ocsp_matched = true;
                }
                OcspOutcome::Revoked { revocation_time, reason } => {
                    return Err(ValidationError::Revoked(path_validation::error::RevokedInfo {
                        revocation_time,
                        reason,
                    }));
                }
                OcspOutcome::Indeterminate(failures) => {
                    ocsp_matched = true;
                    ocsp_indeterminate = Some(failures);
                }
                OcspOutcome::NoMatch => {}
                OcspOutcome::FetchError(detail) => {
                    if rule.tolerant() {
                        self.sink.soft_fail(cert, &format!("OCSP fetch error: {detail}"));
                    } else {
                        ocsp_matched = true;
                        ocsp_indeterminate = Some(vec![format!("OCSP fetch error: {detail}")]);
                    }
                }
            }
        }

        // Step 3: OCSP mandatory and not good => fail.
        if rule.ocsp_mandatory() && !ocsp_status_good {
            return Err(ValidationError::InsufficientRevinfo(
                "OCSP response required but none was good".to_string(),
            ));
        }

        // Step 4.
        let status_good = ocsp_status_good
            && !matches!(rule.mode, crate::policy::RevocationMode::CrlAndOcspRequired);

        // Step 5: run CRL when mandatory, or relevant+declared+not-good,
        // or CRL_OR_OCSP_REQUIRED and not already satisfied by OCSP.
        let run_crl = rule.crl_mandatory()
            || (rule.crl_relevant() && declared_crl && !status_good)
            || (matches!(rule.mode, crate::policy::RevocationMode::CrlOrOcspRequired) && !status_good);

        let mut crl_matched = false;
        let mut crl_status_good = false;
        let mut crl_indeterminate: Option<Vec<String>> = None;
        if run_crl {
            match self.crl_engine.verify_crl(cert, path, is_end_entity, moment, processing_state) {
                CrlOutcome::Ok => {
                    crl_matched = true;
                    crl_status_good = true;
                }
                CrlOutcome::Revoked { revocation_time, reason } => {
                    return Err(ValidationError::Revoked(path_validation::error::RevokedInfo {
                        revocation_time,
                        reason,
                    }));
                }
                CrlOutcome::NoMatch => {}
                CrlOutcome::Indeterminate(failures) => {
                    crl_matched = true;
                    crl_indeterminate =
                        Some(failures.iter().map(|f| f.to_string()).collect());
                }
            }
        }

        // Step 6: CRL mandatory and not good => fail.
        if rule.crl_mandatory() && !crl_status_good {
            return Err(ValidationError::InsufficientRevinfo(
                "CRL required but no CRL covered this certificate without revoking it".to_string(),
            ));
        }

        // Step 7.
        let expected = rule.strict()
            || ((declared_ocsp || declared_crl)
                && matches!(rule.mode, crate::policy::RevocationMode::CheckIfDeclared));

        let matched = ocsp_matched || crl_matched;
        if !matched && expected {
            return Err(ValidationError::InsufficientRevinfo(
                "no revocation information found".to_string(),
            ));
        }

        if let Some(failures) = ocsp_indeterminate.or(crl_indeterminate) {
            return Err(ValidationError::RevocationIndeterminate(format!(
                "revocation checks failed: {}",
                failures.join("; ")
            )));
        }

        Ok(())
    }
}

impl<B, Reg, Src, O, S> RevocationChecker<B> for RevocationCombinator<B, Reg, Src, O, S>
where
    B: CryptoOps,
    Reg: CertificateRegistry,
    Src: CrlSource,
    O: OcspOracle,
    S: SoftFailSink,
{
    fn check(
        &self,
        cert: &Certificate<'_>,
        path: &ValidationPath<'_>,
        moment: &asn1::DateTime,
        processing_state: &mut ProcessingState,
        _ops: &B,
    ) -> Result<(), ValidationError> {
        let is_end_entity = processing_state.current_index + 1 == path.len();
        self.evaluate(cert, path, is_end_entity, moment, processing_state)
    }

    /// Spec §4.7: an attribute certificate has no Authority Information
    /// Access / OCSP model this core implements, so unlike `check` this
    /// only ever consults the CRL engine (C5), gated by the same
    /// per-position `RevocationPolicy` a certificate at the end-entity
    /// position would get.
    fn check_identity(
        &self,
        issuer: &Name<'_>,
        serial: &asn1::BigUint<'_>,
        crl_distribution_points: Option<&CRLDistributionPoints<'_>>,
        issuer_path: &ValidationPath<'_>,
        moment: &asn1::DateTime,
        processing_state: &mut ProcessingState,
        _ops: &B,
    ) -> Result<(), ValidationError> {
        let rule = self.policy.rule_for_position(true);
        if matches!(rule.mode, crate::policy::RevocationMode::NoCheck) {
            return Ok(());
        }

        let subject = RevocationSubject::new(issuer.clone(), serial.clone(), crl_distribution_points.cloned());
        match self.crl_engine.verify_subject(&subject, issuer_path, true, moment, processing_state) {
            CrlOutcome::Ok => Ok(()),
            CrlOutcome::Revoked { revocation_time, reason } => Err(ValidationError::Revoked(
                path_validation::error::RevokedInfo { revocation_time, reason },
            )),
            CrlOutcome::NoMatch => {
                if rule.crl_mandatory() || rule.strict() {
                    Err(ValidationError::InsufficientRevinfo(
                        "no CRL covered this attribute certificate's own revocation status".to_string(),
                    ))
                } else {
                    Ok(())
                }
            }
            CrlOutcome::Indeterminate(failures) => Err(ValidationError::RevocationIndeterminate(format!(
                "revocation checks failed: {}",
                failures.iter().map(|f| f.to_string()).collect::<Vec<_>>().join("; ")
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::RevocationMode;

    #[test]
    fn test_no_check_mode_short_circuits() {
        let rule = PerPositionRule::new(RevocationMode::NoCheck);
        assert!(!rule.ocsp_relevant());
        assert!(!rule.crl_relevant());
        assert!(!rule.ocsp_mandatory());
        assert!(!rule.crl_mandatory());
    }

    #[test]
    fn test_crl_or_ocsp_required_is_strict() {
        let rule = PerPositionRule::new(RevocationMode::CrlOrOcspRequired);
        assert!(rule.strict());
        assert!(rule.ocsp_relevant());
        assert!(rule.crl_relevant());
        assert!(!rule.ocsp_mandatory());
        assert!(!rule.crl_mandatory());
    }

    #[test]
    fn test_crl_and_ocsp_required_mandates_both() {
        let rule = PerPositionRule::new(RevocationMode::CrlAndOcspRequired);
        assert!(rule.ocsp_mandatory());
        assert!(rule.crl_mandatory());
    }
}
