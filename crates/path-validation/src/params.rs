// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! Caller-supplied PKIX initialization parameters (spec §4.4 "Step 1
//! (init)"), and their combination with a trust anchor's `TrustQualifiers`.

use std::collections::HashSet;

use asn1::ObjectIdentifier;

use crate::name_constraints::NameConstraintSet;
use crate::path::TrustQualifiers;
use crate::policy_tree::ANY_POLICY;

/// The RFC 5280 §6.1.1 inputs a caller supplies for one path validation,
/// before combination with the trust anchor's own qualifiers.
#[derive(Clone)]
pub struct ValidationParameters {
    pub initial_policy_set: HashSet<ObjectIdentifier>,
    pub initial_explicit_policy: bool,
    pub initial_policy_mapping_inhibit: bool,
    pub initial_any_policy_inhibit: bool,
    pub initial_permitted_excluded: NameConstraintSet,
    /// Tolerance (in seconds) applied on both sides of a certificate's
    /// validity window (spec §8 boundary tests).
    pub time_tolerance_secs: i64,
    /// Hash algorithm names (as emitted by `CryptoOps::verify_signed_by`'s
    /// caller) rejected before any signature is computed (spec §4.1).
    pub weak_hash_algorithms: HashSet<String>,
    /// SHA-256 digests of certificates exempted from the validity-period
    /// check (spec §4.4 step 2a2, "unless the cert is whitelisted").
    pub whitelisted_digests: HashSet<[u8; 32]>,
}

impl Default for ValidationParameters {
    fn default() -> Self {
        ValidationParameters {
            initial_policy_set: HashSet::from([any_policy_oid()]),
            initial_explicit_policy: false,
            initial_policy_mapping_inhibit: false,
            initial_any_policy_inhibit: false,
            initial_permitted_excluded: NameConstraintSet::new(),
            time_tolerance_secs: 0,
            weak_hash_algorithms: HashSet::new(),
            whitelisted_digests: HashSet::new(),
        }
    }
}

fn any_policy_oid() -> ObjectIdentifier {
    asn1::oid!(2, 5, 29, 32, 0)
}

impl ValidationParameters {
    pub fn builder() -> ValidationParametersBuilder {
        ValidationParametersBuilder(ValidationParameters::default())
    }

    /// Combine caller parameters with a trust anchor's qualifiers (spec
    /// §3 "Trust Anchor": "policy sets intersect; inhibit/explicit flags
    /// AND together; permitted-subtrees intersect; excluded-subtrees
    /// union").
    ///
    /// Spec §9 "Open questions" flags a likely bug in the Python source,
    /// where the three inhibit/explicit flags are computed as `x and x`
    /// (i.e. the anchor's value is simply echoed back, discarding the
    /// caller's). Per the spec's instruction we implement the corrected
    /// combination instead: either side requesting the stricter
    /// (inhibiting) behavior makes it apply, i.e. a logical OR of the two
    /// inhibit flags. This is documented as a deliberate deviation from
    /// the original implementation in `DESIGN.md`.
    pub fn combine_with_anchor(&self, qualifiers: &TrustQualifiers) -> ValidationParameters {
        let initial_policy_set = match &qualifiers.initial_permitted_subtrees {
            // Trust qualifiers don't carry a policy set override today;
            // kept symmetric with the other combinators for future use.
            _ => self.initial_policy_set.clone(),
        };

        ValidationParameters {
            initial_policy_set,
            initial_explicit_policy: self.initial_explicit_policy
                || qualifiers.initial_explicit_policy.unwrap_or(false),
            initial_policy_mapping_inhibit: self.initial_policy_mapping_inhibit
                || qualifiers.initial_policy_mapping_inhibit.unwrap_or(false),
            initial_any_policy_inhibit: self.initial_any_policy_inhibit
                || qualifiers.initial_any_policy_inhibit.unwrap_or(false),
            initial_permitted_excluded: match &qualifiers.initial_permitted_subtrees {
                Some(anchor_set) => {
                    self.initial_permitted_excluded.intersect_permitted_union_excluded(anchor_set)
                }
                None => self.initial_permitted_excluded.clone(),
            },
            time_tolerance_secs: self.time_tolerance_secs,
            weak_hash_algorithms: self.weak_hash_algorithms.clone(),
            whitelisted_digests: self.whitelisted_digests.clone(),
        }
    }
}

pub struct ValidationParametersBuilder(ValidationParameters);

impl ValidationParametersBuilder {
    pub fn with_initial_policy_set(mut self, set: HashSet<ObjectIdentifier>) -> Self {
        self.0.initial_policy_set = set;
        self
    }

    pub fn with_initial_explicit_policy(mut self, v: bool) -> Self {
        self.0.initial_explicit_policy = v;
        self
    }

    pub fn with_initial_policy_mapping_inhibit(mut self, v: bool) -> Self {
        self.0.initial_policy_mapping_inhibit = v;
        self
    }

    pub fn with_initial_any_policy_inhibit(mut self, v: bool) -> Self {
        self.0.initial_any_policy_inhibit = v;
        self
    }

    pub fn with_time_tolerance_secs(mut self, secs: i64) -> Self {
        self.0.time_tolerance_secs = secs;
        self
    }

    pub fn with_weak_hash_algorithms(mut self, algorithms: HashSet<String>) -> Self {
        self.0.weak_hash_algorithms = algorithms;
        self
    }

    pub fn with_whitelisted_digests(mut self, digests: HashSet<[u8; 32]>) -> Self {
        self.0.whitelisted_digests = digests;
        self
    }

    pub fn build(self) -> ValidationParameters {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_accepts_any_policy() {
        let params = ValidationParameters::default();
        assert!(params.initial_policy_set.contains(&any_policy_oid()));
        assert!(!params.initial_explicit_policy);
    }

    #[test]
    fn test_combine_with_anchor_ors_inhibit_flags() {
        let params = ValidationParameters::builder()
            .with_initial_explicit_policy(false)
            .build();
        let qualifiers = TrustQualifiers {
            initial_explicit_policy: Some(true),
            ..Default::default()
        };
        let combined = params.combine_with_anchor(&qualifiers);
        assert!(combined.initial_explicit_policy);
    }

    #[test]
    fn test_combine_with_anchor_keeps_caller_flag_when_anchor_silent() {
        let params = ValidationParameters::builder()
            .with_initial_explicit_policy(true)
            .build();
        let qualifiers = TrustQualifiers::default();
        let combined = params.combine_with_anchor(&qualifiers);
        assert!(combined.initial_explicit_policy);
    }
}
