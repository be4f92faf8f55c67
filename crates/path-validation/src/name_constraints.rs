// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! C2: the name/constraint engine (spec §4.2). Maintains the permitted
//! (intersected on descent) and excluded (unioned on descent) subtree
//! lattices and checks a certificate's names against them.

use x509_types::extensions::{GeneralSubtree, GeneralSubtrees, NameConstraints};
use x509_types::name::GeneralName;

use crate::error::ValidationError;
use crate::types::{DNSName, IPAddressMask};

/// One permitted-or-excluded subtree, owned (not borrowed from a single
/// certificate's extension bytes), since it must outlive the certificate
/// that introduced it as the chain descends.
#[derive(Clone)]
pub enum Subtree {
    DNSName(String),
    Rfc822Name(String),
    DirectoryName(Vec<u8>),
    Uri(String),
    IPAddress(IPAddressMaskOwned),
}

#[derive(Clone, Copy)]
pub struct IPAddressMaskOwned {
    pub base: [u8; 16],
    pub mask: [u8; 16],
    pub is_v4: bool,
}

impl From<IPAddressMask> for IPAddressMaskOwned {
    fn from(m: IPAddressMask) -> Self {
        use crate::types::IPAddress;
        match (m.base, m.mask) {
            (IPAddress::V4(b), IPAddress::V4(mk)) => {
                let mut base = [0u8; 16];
                let mut mask = [0u8; 16];
                base[..4].copy_from_slice(&b.octets());
                mask[..4].copy_from_slice(&mk.octets());
                IPAddressMaskOwned { base, mask, is_v4: true }
            }
            (IPAddress::V6(b), IPAddress::V6(mk)) => IPAddressMaskOwned {
                base: b.octets(),
                mask: mk.octets(),
                is_v4: false,
            },
            _ => IPAddressMaskOwned { base: [0; 16], mask: [0; 16], is_v4: true },
        }
    }
}

fn subtrees_from_general(subtrees: &GeneralSubtrees<'_>) -> Vec<Subtree> {
    let mut out = Vec::new();
    if let x509_types::common::Asn1ReadableOrWritable::Read(v, _) = subtrees {
        for gs in v.clone() {
            if let Some(s) = subtree_from_one(&gs) {
                out.push(s);
            }
        }
    }
    out
}

fn subtree_from_one(gs: &GeneralSubtree<'_>) -> Option<Subtree> {
    match &gs.base {
        GeneralName::DNSName(s) => Some(Subtree::DNSName(s.as_str().to_string())),
        GeneralName::RFC822Name(s) => Some(Subtree::Rfc822Name(s.as_str().to_string())),
        GeneralName::UniformResourceIdentifier(s) => Some(Subtree::Uri(s.as_str().to_string())),
        GeneralName::DirectoryName(n) => asn1::write_single(n).ok().map(Subtree::DirectoryName),
        GeneralName::IPAddress(bytes) => {
            IPAddressMask::from_bytes(bytes).map(|m| Subtree::IPAddress(m.into()))
        }
        _ => None,
    }
}

/// The pair of lattices tracked in `PathState` (spec §3).
#[derive(Clone, Default)]
pub struct NameConstraintSet {
    /// `None` means "universe" (the default, spec §4.2).
    permitted: Option<Vec<Subtree>>,
    excluded: Vec<Subtree>,
}

impl NameConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Combine `self` (the caller's initial constraints) with `other`
    /// (a trust anchor's), the same way a certificate's own
    /// `name_constraints` extension would be folded in: permitted
    /// intersects, excluded unions (spec §3 "Trust Anchor").
    pub fn intersect_permitted_union_excluded(&self, other: &NameConstraintSet) -> NameConstraintSet {
        let permitted = match (&self.permitted, &other.permitted) {
            (None, None) => None,
            (Some(a), None) => Some(a.clone()),
            (None, Some(b)) => Some(b.clone()),
            (Some(a), Some(b)) => Some(intersect_kindwise(a.clone(), b.clone())),
        };
        let mut excluded = self.excluded.clone();
        excluded.extend(other.excluded.clone());
        NameConstraintSet { permitted, excluded }
    }

    /// Apply a certificate's `name_constraints` extension: intersect
    /// `permitted`, union `excluded` (spec §4.2).
    pub fn apply(&mut self, nc: &NameConstraints<'_>) {
        if let Some(permitted) = &nc.permitted_subtrees {
            let new_permitted = subtrees_from_general(permitted);
            self.permitted = Some(match self.permitted.take() {
                None => new_permitted,
                Some(existing) => intersect_kindwise(existing, new_permitted),
            });
        }
        if let Some(excluded) = &nc.excluded_subtrees {
            self.excluded.extend(subtrees_from_general(excluded));
        }
    }

    /// `accept(cert)`: check the certificate's subject and SAN entries
    /// against both lattices. Returns a diagnostic naming the offending
    /// name/kind on failure.
    pub fn accept(&self, san: Option<&x509_types::extensions::SubjectAlternativeName<'_>>) -> Result<(), ValidationError> {
        let Some(san) = san else { return Ok(()) };
        let names = match san {
            x509_types::common::Asn1ReadableOrWritable::Read(v, _) => v.clone().collect::<Vec<_>>(),
            x509_types::common::Asn1ReadableOrWritable::Write(_, _) => Vec::new(),
        };
        for gn in &names {
            self.check_one(gn)?;
        }
        Ok(())
    }

    /// `accept(cert)` (spec §4.2): checks the certificate's subject
    /// distinguished name (when non-empty, as a `directoryName`) and
    /// every name in its `subjectAltName`, if present, against both
    /// lattices.
    pub fn accept_cert(
        &self,
        subject: &x509_types::name::Name<'_>,
        san: Option<&x509_types::extensions::SubjectAlternativeName<'_>>,
    ) -> Result<(), ValidationError> {
        if !subject.is_empty() {
            self.check_one(&GeneralName::DirectoryName(subject.clone()))?;
        }
        self.accept(san)
    }

    fn check_one(&self, gn: &GeneralName<'_>) -> Result<(), ValidationError> {
        for excl in &self.excluded {
            if matches_subtree(excl, gn) {
                return Err(ValidationError::Other(format!(
                    "name constraint violation: {} is in an excluded subtree",
                    describe(gn)
                )));
            }
        }
        if let Some(permitted) = &self.permitted {
            if applicable_kind_present(permitted, gn) && !permitted.iter().any(|p| matches_subtree(p, gn)) {
                return Err(ValidationError::Other(format!(
                    "name constraint violation: {} is not within any permitted subtree",
                    describe(gn)
                )));
            }
        }
        Ok(())
    }
}

fn describe(gn: &GeneralName<'_>) -> String {
    match gn {
        GeneralName::DNSName(s) => format!("dNSName {}", s.as_str()),
        GeneralName::RFC822Name(s) => format!("rfc822Name {}", s.as_str()),
        GeneralName::UniformResourceIdentifier(s) => format!("uniformResourceIdentifier {}", s.as_str()),
        GeneralName::IPAddress(_) => "iPAddress".to_string(),
        GeneralName::DirectoryName(_) => "directoryName".to_string(),
        _ => "generalName".to_string(),
    }
}

fn applicable_kind_present(permitted: &[Subtree], gn: &GeneralName<'_>) -> bool {
    permitted.iter().any(|p| std::mem::discriminant(p) == std::mem::discriminant(&proto_for(gn)))
}

fn proto_for(gn: &GeneralName<'_>) -> Subtree {
    match gn {
        GeneralName::DNSName(_) => Subtree::DNSName(String::new()),
        GeneralName::RFC822Name(_) => Subtree::Rfc822Name(String::new()),
        GeneralName::UniformResourceIdentifier(_) => Subtree::Uri(String::new()),
        GeneralName::DirectoryName(_) => Subtree::DirectoryName(Vec::new()),
        GeneralName::IPAddress(_) => Subtree::IPAddress(IPAddressMaskOwned {
            base: [0; 16],
            mask: [0; 16],
            is_v4: true,
        }),
        _ => Subtree::DNSName(String::new()),
    }
}

fn matches_subtree(subtree: &Subtree, gn: &GeneralName<'_>) -> bool {
    match (subtree, gn) {
        (Subtree::DNSName(base), GeneralName::DNSName(s)) => {
            match (DNSName::new(base), DNSName::new(s.as_str())) {
                (Some(base), Some(name)) => name.is_subdomain_of_or_eq(&base),
                _ => false,
            }
        }
        (Subtree::Rfc822Name(base), GeneralName::RFC822Name(s)) => {
            let candidate = s.as_str();
            if let Some(domain) = base.strip_prefix('@') {
                candidate.to_ascii_lowercase().ends_with(&format!("@{}", domain.to_ascii_lowercase()))
            } else if base.contains('@') {
                candidate.eq_ignore_ascii_case(base)
            } else {
                candidate
                    .rsplit_once('@')
                    .map(|(_, host)| {
                        host.eq_ignore_ascii_case(base)
                            || host.to_ascii_lowercase().ends_with(&format!(".{}", base.to_ascii_lowercase()))
                    })
                    .unwrap_or(false)
            }
        }
        (Subtree::Uri(base), GeneralName::UniformResourceIdentifier(s)) => {
            extract_uri_host(s.as_str())
                .map(|host| {
                    host.eq_ignore_ascii_case(base) || host.to_ascii_lowercase().ends_with(&format!(".{}", base.to_ascii_lowercase()))
                })
                .unwrap_or(false)
        }
        (Subtree::DirectoryName(base), GeneralName::DirectoryName(n)) => {
            asn1::write_single(n).ok().as_deref() == Some(base.as_slice())
        }
        (Subtree::IPAddress(mask), GeneralName::IPAddress(bytes)) => {
            crate::types::IPAddress::from_bytes(bytes)
                .map(|addr| owned_mask_contains(mask, &addr))
                .unwrap_or(false)
        }
        _ => false,
    }
}

fn owned_mask_contains(mask: &IPAddressMaskOwned, addr: &crate::types::IPAddress) -> bool {
    use crate::types::IPAddress;
    match addr {
        IPAddress::V4(a) if mask.is_v4 => {
            let a = a.octets();
            (0..4).all(|i| mask.base[i] & mask.mask[i] == a[i] & mask.mask[i])
        }
        IPAddress::V6(a) if !mask.is_v4 => {
            let a = a.octets();
            (0..16).all(|i| mask.base[i] & mask.mask[i] == a[i] & mask.mask[i])
        }
        _ => false,
    }
}

fn extract_uri_host(uri: &str) -> Option<&str> {
    let rest = uri.split_once("://").map(|(_, r)| r).unwrap_or(uri);
    let host = rest.split(['/', ':']).next()?;
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

/// True when every name matching `inner` also matches `outer` — the
/// containment relation `intersect_kindwise` narrows pairs down to.
fn subtree_contains(outer: &Subtree, inner: &Subtree) -> bool {
    match (outer, inner) {
        (Subtree::DNSName(o), Subtree::DNSName(i)) => match (DNSName::new(o), DNSName::new(i)) {
            (Some(o), Some(i)) => i.is_subdomain_of_or_eq(&o),
            _ => o.eq_ignore_ascii_case(i),
        },
        (Subtree::Rfc822Name(o), Subtree::Rfc822Name(i)) => {
            if o.eq_ignore_ascii_case(i) {
                return true;
            }
            let o_domain = o.strip_prefix('@').unwrap_or(o);
            let i_domain = i.rsplit_once('@').map(|(_, h)| h).unwrap_or(i);
            i_domain.eq_ignore_ascii_case(o_domain)
                || i_domain.to_ascii_lowercase().ends_with(&format!(".{}", o_domain.to_ascii_lowercase()))
        }
        (Subtree::Uri(o), Subtree::Uri(i)) => {
            i.eq_ignore_ascii_case(o) || i.to_ascii_lowercase().ends_with(&format!(".{}", o.to_ascii_lowercase()))
        }
        (Subtree::DirectoryName(o), Subtree::DirectoryName(i)) => o == i,
        (Subtree::IPAddress(o), Subtree::IPAddress(i)) if o.is_v4 == i.is_v4 => {
            // outer contains inner when inner's mask is at least as
            // specific and inner's masked network lies within outer's.
            (0..16).all(|k| o.mask[k] & !i.mask[k] == 0)
                && (0..16).all(|k| o.base[k] & o.mask[k] == i.base[k] & o.mask[k])
        }
        _ => false,
    }
}

fn kind_index(s: &Subtree) -> u8 {
    match s {
        Subtree::DNSName(_) => 0,
        Subtree::Rfc822Name(_) => 1,
        Subtree::DirectoryName(_) => 2,
        Subtree::Uri(_) => 3,
        Subtree::IPAddress(_) => 4,
    }
}

/// Intersect two permitted-subtree lists kind-by-kind (RFC 5280
/// §4.2.1.10): for each same-kind pair, keep whichever subtree is the
/// narrower of the two when one contains the other, and drop pairs that
/// don't overlap at all. A kind present on only one side has no pair to
/// intersect against and is dropped entirely — once a constraint of a
/// kind is introduced, only the overlap with previously-permitted
/// subtrees of that kind survives.
fn intersect_kindwise(existing: Vec<Subtree>, new: Vec<Subtree>) -> Vec<Subtree> {
    let mut out = Vec::new();
    for e in &existing {
        for n in &new {
            if kind_index(e) != kind_index(n) {
                continue;
            }
            if subtree_contains(e, n) {
                out.push(n.clone());
            } else if subtree_contains(n, e) {
                out.push(e.clone());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uri_host_extraction() {
        assert_eq!(extract_uri_host("https://foo.example.com/path"), Some("foo.example.com"));
        assert_eq!(extract_uri_host("foo.example.com:8080"), Some("foo.example.com"));
    }

    #[test]
    fn test_excluded_subtree_blocks_descendant() {
        let mut set = NameConstraintSet::new();
        set.excluded.push(Subtree::DNSName("example.com".to_string()));
        let gn = GeneralName::DNSName(x509_types::name::UnvalidatedIA5String::new("foo.example.com").unwrap());
        assert!(matches_subtree(&Subtree::DNSName("example.com".to_string()), &gn));
        let err = set.check_one(&gn);
        assert!(err.is_err());
    }

    proptest::proptest! {
        // Testable property (spec §8): "for any cert and any descendant
        // cert, the excluded set at the descendant is a superset" — here
        // checked as "once a name is rejected by the excluded lattice, no
        // further `apply` can make it accepted again."
        #[test]
        fn prop_excluded_subtree_membership_is_monotone(
            excluded_domain in "[a-z]{3,8}\\.com",
            extra_excluded in proptest::collection::vec("[a-z]{3,8}\\.net", 0..5),
            candidate_sub in "[a-z]{1,5}",
        ) {
            let mut set = NameConstraintSet::new();
            set.excluded.push(Subtree::DNSName(excluded_domain.clone()));

            let gn_name = format!("{}.{}", candidate_sub, excluded_domain);
            let gn = GeneralName::DNSName(
                x509_types::name::UnvalidatedIA5String::new(&gn_name).unwrap(),
            );
            proptest::prop_assert!(set.check_one(&gn).is_err());

            for extra in extra_excluded {
                set.excluded.push(Subtree::DNSName(extra));
            }
            // Still rejected after further descent narrows the lattice.
            proptest::prop_assert!(set.check_one(&gn).is_err());
        }

        // Testable property (spec §8): "the permitted set at a
        // descendant is a subset of the permitted set at the ancestor"
        // — a name accepted once a descendant narrows the permitted
        // subtree to an unrelated domain must no longer be accepted.
        #[test]
        fn prop_permitted_subtree_intersection_is_monotone(
            permitted_domain in "[a-z]{3,8}\\.com",
            unrelated_domain in "[a-z]{3,8}\\.net",
            candidate_sub in "[a-z]{1,5}",
        ) {
            let mut set = NameConstraintSet::new();
            set.permitted = Some(vec![Subtree::DNSName(permitted_domain.clone())]);

            let gn_name = format!("{}.{}", candidate_sub, permitted_domain);
            let gn = GeneralName::DNSName(
                x509_types::name::UnvalidatedIA5String::new(&gn_name).unwrap(),
            );
            proptest::prop_assert!(set.check_one(&gn).is_ok());

            set.permitted = Some(intersect_kindwise(
                set.permitted.take().unwrap(),
                vec![Subtree::DNSName(unrelated_domain)],
            ));
            // The unrelated domain shares no overlap with the original
            // permitted subtree, so nothing of this kind survives.
            proptest::prop_assert!(set.check_one(&gn).is_err());
        }
    }
}
