// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! The revocation combinator's configuration (spec §4.6, §10.3).

/// How strictly a position in the path must be covered by revocation
/// information (spec §4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevocationMode {
    /// Never check revocation for certificates at this position.
    NoCheck,
    /// Check via whichever of CRL/OCSP the certificate declares; absence
    /// of any revocation pointer is not itself an error.
    CheckIfDeclared,
    CrlRequired,
    OcspRequired,
    CrlOrOcspRequired,
    CrlAndOcspRequired,
}

/// A revocation rule for one class of certificate position (end-entity
/// vs. intermediate CA — spec §4.6 `ee_certificate_rule` /
/// `intermediate_ca_cert_rule`).
#[derive(Debug, Clone)]
pub struct PerPositionRule {
    pub mode: RevocationMode,
    /// Whether the combinator may ask the `CrlSource`/`OcspOracle` to go
    /// fetch fresh revocation data, as opposed to only consulting
    /// whatever the caller already supplied.
    pub allow_fetching: bool,
}

impl Default for PerPositionRule {
    fn default() -> Self {
        PerPositionRule {
            mode: RevocationMode::CheckIfDeclared,
            allow_fetching: true,
        }
    }
}

impl PerPositionRule {
    pub fn new(mode: RevocationMode) -> Self {
        PerPositionRule { mode, allow_fetching: true }
    }

    pub fn without_fetching(mut self) -> Self {
        self.allow_fetching = false;
        self
    }

    /// Spec §4.6: the six booleans the combinator actually branches on,
    /// derived from the named mode rather than stored redundantly.
    pub fn ocsp_relevant(&self) -> bool {
        !matches!(self.mode, RevocationMode::NoCheck | RevocationMode::CrlRequired)
    }

    pub fn ocsp_mandatory(&self) -> bool {
        matches!(
            self.mode,
            RevocationMode::OcspRequired | RevocationMode::CrlAndOcspRequired
        )
    }

    pub fn crl_relevant(&self) -> bool {
        !matches!(self.mode, RevocationMode::NoCheck | RevocationMode::OcspRequired)
    }

    pub fn crl_mandatory(&self) -> bool {
        matches!(
            self.mode,
            RevocationMode::CrlRequired | RevocationMode::CrlAndOcspRequired
        )
    }

    /// Whether a fetch error is soft-failed instead of recorded as a
    /// failure (spec §4.6 step 2/5 "fetch-error"). Only `CheckIfDeclared`
    /// is tolerant; the `*_REQUIRED` modes need the data they mandate, so
    /// a fetch error there is recorded rather than swallowed.
    pub fn tolerant(&self) -> bool {
        matches!(self.mode, RevocationMode::CheckIfDeclared)
    }

    /// Spec §4.6 step 7: the "expected revinfo" flag independent of
    /// whether the certificate actually declares revinfo. Only
    /// `CrlOrOcspRequired` sets it — the other `*_REQUIRED` modes already
    /// enforce their own mandatory checks in steps 3/6.
    pub fn strict(&self) -> bool {
        matches!(self.mode, RevocationMode::CrlOrOcspRequired)
    }
}

/// The revocation combinator's (C6) full configuration.
#[derive(Debug, Clone)]
pub struct RevocationPolicy {
    pub ee_certificate_rule: PerPositionRule,
    pub intermediate_ca_cert_rule: PerPositionRule,
    /// Tolerance (seconds) applied when comparing the validation moment
    /// against a CRL's `thisUpdate`/`nextUpdate` (spec §4.5 "freshness").
    pub time_tolerance_secs: i64,
}

impl Default for RevocationPolicy {
    fn default() -> Self {
        RevocationPolicy {
            ee_certificate_rule: PerPositionRule::default(),
            intermediate_ca_cert_rule: PerPositionRule::default(),
            time_tolerance_secs: 0,
        }
    }
}

impl RevocationPolicy {
    pub fn builder() -> RevocationPolicyBuilder {
        RevocationPolicyBuilder(RevocationPolicy::default())
    }

    pub fn rule_for_position(&self, is_end_entity: bool) -> &PerPositionRule {
        if is_end_entity {
            &self.ee_certificate_rule
        } else {
            &self.intermediate_ca_cert_rule
        }
    }
}

pub struct RevocationPolicyBuilder(RevocationPolicy);

impl RevocationPolicyBuilder {
    pub fn with_ee_rule(mut self, rule: PerPositionRule) -> Self {
        self.0.ee_certificate_rule = rule;
        self
    }

    pub fn with_intermediate_ca_rule(mut self, rule: PerPositionRule) -> Self {
        self.0.intermediate_ca_cert_rule = rule;
        self
    }

    pub fn with_time_tolerance_secs(mut self, secs: i64) -> Self {
        self.0.time_tolerance_secs = secs;
        self
    }

    pub fn build(self) -> RevocationPolicy {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rule_for_position() {
        let policy = RevocationPolicy::default();
        assert_eq!(policy.rule_for_position(true).mode, RevocationMode::CheckIfDeclared);
        assert_eq!(policy.rule_for_position(false).mode, RevocationMode::CheckIfDeclared);
    }

    #[test]
    fn test_builder_overrides_ee_rule() {
        let policy = RevocationPolicy::builder()
            .with_ee_rule(PerPositionRule::new(RevocationMode::CrlRequired))
            .build();
        assert_eq!(policy.rule_for_position(true).mode, RevocationMode::CrlRequired);
        assert_eq!(policy.rule_for_position(false).mode, RevocationMode::CheckIfDeclared);
    }
}
