// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! Issuing Distribution Point / Distribution Point scope matching (RFC
//! 5280 §5.2.5, §6.3.3), and the CRL-reason bookkeeping spec §4.5 calls
//! the "reason scope".

use asn1::SequenceOfWriter;

use x509_types::common::Asn1ReadableOrWritable;
use x509_types::crl::IssuingDistributionPoint;
use x509_types::extensions::{
    directory_name_in, DistributionPoint, DistributionPointName, ReasonFlags,
};
use x509_types::name::{names_equal, GeneralName, GeneralNames, Name, RelativeDistinguishedName};

/// RFC 5280 §5.3.1 `CRLReason`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrlReason {
    Unspecified,
    KeyCompromise,
    CaCompromise,
    AffiliationChanged,
    Superseded,
    CessationOfOperation,
    CertificateHold,
    RemoveFromCrl,
    PrivilegeWithdrawn,
    AaCompromise,
}

impl CrlReason {
    pub fn from_enumerated(value: i64) -> Option<Self> {
        Some(match value {
            0 => CrlReason::Unspecified,
            1 => CrlReason::KeyCompromise,
            2 => CrlReason::CaCompromise,
            3 => CrlReason::AffiliationChanged,
            4 => CrlReason::Superseded,
            5 => CrlReason::CessationOfOperation,
            6 => CrlReason::CertificateHold,
            8 => CrlReason::RemoveFromCrl,
            9 => CrlReason::PrivilegeWithdrawn,
            10 => CrlReason::AaCompromise,
            _ => return None,
        })
    }

    pub fn label(self) -> &'static str {
        match self {
            CrlReason::Unspecified => "unspecified",
            CrlReason::KeyCompromise => "keyCompromise",
            CrlReason::CaCompromise => "cACompromise",
            CrlReason::AffiliationChanged => "affiliationChanged",
            CrlReason::Superseded => "superseded",
            CrlReason::CessationOfOperation => "cessationOfOperation",
            CrlReason::CertificateHold => "certificateHold",
            CrlReason::RemoveFromCrl => "removeFromCRL",
            CrlReason::PrivilegeWithdrawn => "privilegeWithdrawn",
            CrlReason::AaCompromise => "aACompromise",
        }
    }
}

/// The reasons a CRL (or one of its distribution points) declares
/// coverage for, as the bit-vector `ReasonFlags` from RFC 5280 §4.2.1.13
/// represents it. `unspecified` and `removeFromCRL` aren't part of that
/// bit vector and are always considered covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReasonSet(u16);

impl ReasonSet {
    pub const ALL: ReasonSet = ReasonSet(0b1_1111_1110);

    pub fn from_reason_flags(flags: &ReasonFlags<'_>) -> ReasonSet {
        let mut mask = 0u16;
        if flags.key_compromise() {
            mask |= 1 << 1;
        }
        if flags.ca_compromise() {
            mask |= 1 << 2;
        }
        if flags.affiliation_changed() {
            mask |= 1 << 3;
        }
        if flags.superseded() {
            mask |= 1 << 4;
        }
        if flags.cessation_of_operation() {
            mask |= 1 << 5;
        }
        if flags.certificate_hold() {
            mask |= 1 << 6;
        }
        if flags.privilege_withdrawn() {
            mask |= 1 << 7;
        }
        if flags.aa_compromise() {
            mask |= 1 << 8;
        }
        ReasonSet(mask)
    }

    pub fn single(reason: CrlReason) -> ReasonSet {
        let bit = match reason {
            CrlReason::KeyCompromise => 1,
            CrlReason::CaCompromise => 2,
            CrlReason::AffiliationChanged => 3,
            CrlReason::Superseded => 4,
            CrlReason::CessationOfOperation => 5,
            CrlReason::CertificateHold => 6,
            CrlReason::PrivilegeWithdrawn => 7,
            CrlReason::AaCompromise => 8,
            CrlReason::Unspecified | CrlReason::RemoveFromCrl => return ReasonSet::ALL,
        };
        ReasonSet(1 << bit)
    }

    /// Commutative by construction (spec §8 "CRL reason union
    /// commutativity"): both sides reduce to a bitwise OR.
    pub fn union(self, other: ReasonSet) -> ReasonSet {
        ReasonSet(self.0 | other.0)
    }

    pub fn intersect(self, other: ReasonSet) -> ReasonSet {
        ReasonSet(self.0 & other.0)
    }

    pub fn is_all(self) -> bool {
        self.0 & Self::ALL.0 == Self::ALL.0
    }

    pub fn contains(self, reason: CrlReason) -> bool {
        if matches!(reason, CrlReason::Unspecified | CrlReason::RemoveFromCrl) {
            return true;
        }
        self.0 & Self::single(reason).0 != 0
    }
}

/// RFC 5280 §6.3.3(b): the name to use when this CRL's issuing
/// distribution point asserts a relative name, or when an indirect
/// CRL's authority differs from `tbsCertList.issuer`.
pub fn crl_authority_name<'a>(
    crl_issuer: &Name<'a>,
    idp: Option<&IssuingDistributionPoint<'a>>,
    authority_cert_issuer: Option<&GeneralNames<'a>>,
) -> Name<'a> {
    if idp.map(|i| i.indirect_crl).unwrap_or(false) {
        if let Some(names) = authority_cert_issuer {
            if let Some(dn) = first_directory_name(names) {
                return dn;
            }
        }
    }
    crl_issuer.clone()
}

fn first_directory_name<'a>(names: &GeneralNames<'a>) -> Option<Name<'a>> {
    match names {
        Asn1ReadableOrWritable::Read(v, _) => v.clone().find_map(|gn| match gn {
            GeneralName::DirectoryName(n) => Some(n),
            _ => None,
        }),
        Asn1ReadableOrWritable::Write(_, _) => None,
    }
}

/// RFC 5280 §6.3.3(j): a `nameRelativeToCRLIssuer` is interpreted by
/// appending the RDN to the CRL's authority name.
fn lift_relative_name<'a>(rdn: &RelativeDistinguishedName<'a>, authority: &Name<'a>) -> Name<'a> {
    let mut rdns: Vec<RelativeDistinguishedName<'a>> = match &authority.0 {
        Asn1ReadableOrWritable::Read(v, _) => v.clone().collect(),
        Asn1ReadableOrWritable::Write(_, _) => Vec::new(),
    };
    rdns.push(rdn.clone());
    Name(Asn1ReadableOrWritable::new_write(SequenceOfWriter::new(rdns)))
}

fn full_name_matches(a: &GeneralNames<'_>, b: &GeneralNames<'_>) -> bool {
    let da = asn1::write_single(a).ok();
    let db = asn1::write_single(b).ok();
    da.is_some() && da == db
}

fn full_name_contains(names: &GeneralNames<'_>, target: &Name<'_>) -> bool {
    directory_name_in(names, target)
}

/// Does `dp` (one of the certificate's own `CRLDistributionPoints`
/// entries) match this CRL's `issuingDistributionPoint`, per RFC 5280
/// §6.3.3 steps (b)-(d)?
pub fn idp_matches_distribution_point<'a>(
    idp: Option<&IssuingDistributionPoint<'a>>,
    dp: &DistributionPoint<'a>,
    crl_authority_name: &Name<'a>,
) -> bool {
    match (idp.and_then(|i| i.distribution_point.as_ref()), &dp.distribution_point) {
        (Some(DistributionPointName::FullName(idp_names)), Some(DistributionPointName::FullName(dp_names))) => {
            full_name_matches(idp_names, dp_names)
        }
        (Some(DistributionPointName::NameRelativeToCRLIssuer(rdn)), Some(DistributionPointName::FullName(dp_names))) => {
            let lifted = lift_relative_name(rdn, crl_authority_name);
            match dp_names {
                Asn1ReadableOrWritable::Read(v, _) => v.clone().any(|gn| {
                    matches!(&gn, GeneralName::DirectoryName(n) if names_equal(n, &lifted))
                }),
                Asn1ReadableOrWritable::Write(_, _) => false,
            }
        }
        (None, _) => match &dp.crl_issuer {
            Some(names) => full_name_contains(names, crl_authority_name),
            // No IDP and no explicit crlIssuer on the DP: this only
            // matches a CRL whose own issuer is the certificate's
            // issuer, which the caller has already established before
            // calling into scope matching.
            None => true,
        },
        _ => false,
    }
}

/// RFC 5280 §5.2.5: whether this IDP's certificate-type restriction
/// excludes ordinary (non-CA, non-AC) public-key certificates at `depth`
/// position `is_ca`.
pub fn idp_excludes_position(idp: Option<&IssuingDistributionPoint<'_>>, is_ca: bool) -> bool {
    match idp {
        Some(i) if i.only_contains_attribute_certs => true,
        Some(i) if i.only_contains_user_certs && is_ca => true,
        Some(i) if i.only_contains_ca_certs && !is_ca => true,
        _ => false,
    }
}

/// The reason coverage a CRL declares for `dp`, the intersection of
/// whatever the IDP and the DP itself assert (both default to "all
/// reasons" when absent).
pub fn declared_scope(idp: Option<&IssuingDistributionPoint<'_>>, dp: &DistributionPoint<'_>) -> ReasonSet {
    let idp_scope = idp
        .and_then(|i| i.only_some_reasons.as_ref())
        .map(ReasonSet::from_reason_flags)
        .unwrap_or(ReasonSet::ALL);
    let dp_scope = dp.reasons.as_ref().map(ReasonSet::from_reason_flags).unwrap_or(ReasonSet::ALL);
    idp_scope.intersect(dp_scope)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_set_union_is_commutative() {
        let a = ReasonSet::single(CrlReason::KeyCompromise);
        let b = ReasonSet::single(CrlReason::CaCompromise);
        assert_eq!(a.union(b), b.union(a));
    }

    #[test]
    fn test_reason_set_all_contains_every_named_reason() {
        for reason in [
            CrlReason::KeyCompromise,
            CrlReason::CaCompromise,
            CrlReason::AffiliationChanged,
            CrlReason::Superseded,
            CrlReason::CessationOfOperation,
            CrlReason::CertificateHold,
            CrlReason::PrivilegeWithdrawn,
            CrlReason::AaCompromise,
        ] {
            assert!(ReasonSet::ALL.contains(reason));
        }
    }

    #[test]
    fn test_unspecified_and_remove_from_crl_always_in_scope() {
        let empty = ReasonSet::default();
        assert!(empty.contains(CrlReason::Unspecified));
        assert!(empty.contains(CrlReason::RemoveFromCrl));
        assert!(!empty.contains(CrlReason::KeyCompromise));
    }

    #[test]
    fn test_from_enumerated_skips_reserved_value_seven() {
        assert!(CrlReason::from_enumerated(7).is_none());
        assert_eq!(CrlReason::from_enumerated(8), Some(CrlReason::RemoveFromCrl));
    }

    #[test]
    fn test_idp_excludes_position_ca_only() {
        let idp = IssuingDistributionPoint {
            distribution_point: None,
            only_contains_user_certs: false,
            only_contains_ca_certs: true,
            only_some_reasons: None,
            indirect_crl: false,
            only_contains_attribute_certs: false,
        };
        assert!(idp_excludes_position(Some(&idp), false));
        assert!(!idp_excludes_position(Some(&idp), true));
        assert!(!idp_excludes_position(None, false));
    }

    proptest::proptest! {
        // Testable property (spec §8): "the final checked-reason set is
        // independent of the order CRLs are processed" — here checked as
        // a fold over an arbitrary permutation-equivalent reduction
        // (union is commutative and associative, so any fold order
        // agrees with any other).
        #[test]
        fn prop_reason_union_is_order_independent(masks in proptest::collection::vec(0u16..0x200, 1..8)) {
            let sets: Vec<ReasonSet> = masks.iter().map(|m| ReasonSet(*m)).collect();

            let forward = sets.iter().copied().fold(ReasonSet::default(), ReasonSet::union);
            let backward = sets.iter().rev().copied().fold(ReasonSet::default(), ReasonSet::union);
            proptest::prop_assert_eq!(forward, backward);

            // A rotation of the same multiset reduces to the same union.
            if sets.len() > 1 {
                let mut rotated = sets.clone();
                rotated.rotate_left(1);
                let rotated_union = rotated.into_iter().fold(ReasonSet::default(), ReasonSet::union);
                proptest::prop_assert_eq!(forward, rotated_union);
            }
        }
    }
}
