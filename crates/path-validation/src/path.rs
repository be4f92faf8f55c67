// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! `ValidationPath` and `TrustAnchor` (spec §3 "Data Model").

use x509_types::certificate::Certificate;
use x509_types::extensions::AuthorityKeyIdentifier;
use x509_types::name::Name;
use x509_types::oid;

use crate::error::ValidationError;

/// Issuer-candidate match: key identifier (SKI vs. the new cert's AKI)
/// when the new cert carries one, name comparison otherwise (spec §3
/// Validation Path operations: "by key identifier then name").
fn is_issuer_candidate<'a>(candidate: &Certificate<'a>, issuer_name: &Name<'a>, aki: Option<&[u8]>) -> bool {
    if let Some(key_id) = aki {
        let candidate_ski = candidate
            .extensions()
            .ok()
            .and_then(|exts| exts.get_extension(&oid::SUBJECT_KEY_IDENTIFIER_OID))
            .and_then(|e| e.value::<&[u8]>().ok());
        if let Some(candidate_ski) = candidate_ski {
            return candidate_ski == key_id;
        }
    }
    x509_types::name::names_equal(candidate.subject(), issuer_name)
}

/// Per-anchor overrides that combine with caller-supplied PKIX
/// parameters (spec §3 "Trust Anchor"): policy sets intersect,
/// inhibit/explicit flags AND together, permitted-subtrees intersect,
/// excluded-subtrees union.
#[derive(Debug, Clone, Default)]
pub struct TrustQualifiers {
    pub max_path_length: Option<u8>,
    pub max_aa_path_length: Option<u8>,
    pub initial_explicit_policy: Option<bool>,
    pub initial_policy_mapping_inhibit: Option<bool>,
    pub initial_any_policy_inhibit: Option<bool>,
    pub initial_permitted_subtrees: Option<crate::name_constraints::NameConstraintSet>,
}

/// A trust anchor: either a self-signed certificate or a bare authority
/// record (spec §3).
pub enum TrustAnchor<'a> {
    SelfSigned(Certificate<'a>),
    Authority {
        name: Name<'a>,
        public_key_cert: Box<Certificate<'a>>,
        trust_qualifiers: TrustQualifiers,
    },
}

impl<'a> TrustAnchor<'a> {
    pub fn name(&self) -> &Name<'a> {
        match self {
            TrustAnchor::SelfSigned(cert) => cert.subject(),
            TrustAnchor::Authority { name, .. } => name,
        }
    }

    pub fn trust_qualifiers(&self) -> TrustQualifiers {
        match self {
            TrustAnchor::SelfSigned(_) => TrustQualifiers::default(),
            TrustAnchor::Authority {
                trust_qualifiers, ..
            } => trust_qualifiers.clone(),
        }
    }
}

/// A non-empty ordered sequence `(trust_anchor, c1, ..., cn)` (spec §3).
pub struct ValidationPath<'a> {
    trust_anchor: TrustAnchor<'a>,
    certs: Vec<Certificate<'a>>,
}

impl<'a> ValidationPath<'a> {
    pub fn new(trust_anchor: TrustAnchor<'a>, certs: Vec<Certificate<'a>>) -> Self {
        ValidationPath { trust_anchor, certs }
    }

    pub fn trust_anchor(&self) -> &TrustAnchor<'a> {
        &self.trust_anchor
    }

    pub fn len(&self) -> usize {
        self.certs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.certs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Certificate<'a>> {
        self.certs.get(index)
    }

    pub fn last(&self) -> Option<&Certificate<'a>> {
        self.certs.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Certificate<'a>> {
        self.certs.iter()
    }

    pub fn copy_and_append(&self, cert: Certificate<'a>) -> Self
    where
        Certificate<'a>: Clone,
    {
        let mut certs = self.certs.clone();
        certs.push(cert);
        ValidationPath {
            trust_anchor: clone_anchor(&self.trust_anchor),
            certs,
        }
    }

    /// Finds the deepest prefix whose last element is `cert`'s issuer (by
    /// key identifier then name), and appends `cert` after it. Fails with
    /// a lookup error when no such prefix exists (spec §3).
    pub fn truncate_to_issuer_and_append(
        &self,
        cert: Certificate<'a>,
    ) -> Result<Self, ValidationError>
    where
        Certificate<'a>: Clone,
    {
        let issuer_name = cert.issuer();
        let aki = cert
            .extensions()
            .ok()
            .and_then(|exts| exts.get_extension(&oid::AUTHORITY_KEY_IDENTIFIER_OID))
            .and_then(|e| e.value::<AuthorityKeyIdentifier<'_>>().ok())
            .and_then(|aki| aki.key_identifier);

        // Search from the end: the deepest matching prefix wins, so a
        // re-keyed CA sharing a subject with an ancestor doesn't cause a
        // truncation to a shallower, wrong prefix.
        if let Some(idx) = self
            .certs
            .iter()
            .rposition(|candidate| is_issuer_candidate(candidate, issuer_name, aki))
        {
            let mut certs: Vec<Certificate<'a>> = self.certs[..=idx].to_vec();
            certs.push(cert);
            return Ok(ValidationPath {
                trust_anchor: clone_anchor(&self.trust_anchor),
                certs,
            });
        }
        if x509_types::name::names_equal(self.trust_anchor.name(), issuer_name) {
            return Ok(ValidationPath {
                trust_anchor: clone_anchor(&self.trust_anchor),
                certs: vec![cert],
            });
        }
        Err(ValidationError::PathBuilding(
            "no prefix of this path ends at the certificate's issuer".to_string(),
        ))
    }
}

fn clone_anchor<'a>(anchor: &TrustAnchor<'a>) -> TrustAnchor<'a>
where
    Certificate<'a>: Clone,
{
    match anchor {
        TrustAnchor::SelfSigned(cert) => TrustAnchor::SelfSigned(cert.clone()),
        TrustAnchor::Authority {
            name,
            public_key_cert,
            trust_qualifiers,
        } => TrustAnchor::Authority {
            name: name.clone(),
            public_key_cert: public_key_cert.clone(),
            trust_qualifiers: trust_qualifiers.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // `truncate_to_issuer_and_append` and `copy_and_append` need a
    // parsed `Certificate`, which has no public constructor independent
    // of DER parsing; what's tested here is `names_equal`, the
    // comparison both methods are built on.
    fn name_with_marker(marker: u8) -> Name<'static> {
        use x509_types::common::{Asn1ReadableOrWritable, AttributeTypeValue, RawTlv};
        use x509_types::name::RelativeDistinguishedName;
        let bytes: &'static [u8] = match marker {
            1 => b"one",
            _ => b"two",
        };
        let tag = asn1::Tag::from_bytes(&[0x0c]).unwrap().0;
        let tlv = RawTlv::new(tag, bytes);
        let atv = AttributeTypeValue {
            type_id: asn1::oid!(2, 5, 4, 3),
            value: tlv,
        };
        let rdn = RelativeDistinguishedName(Asn1ReadableOrWritable::new_write(
            asn1::SetOfWriter::new(vec![atv]),
        ));
        Name(Asn1ReadableOrWritable::new_write(asn1::SequenceOfWriter::new(vec![rdn])))
    }

    #[test]
    fn test_names_equal_by_der_encoding() {
        let a = name_with_marker(1);
        let b = name_with_marker(1);
        let c = name_with_marker(2);
        assert!(x509_types::name::names_equal(&a, &b));
        assert!(!x509_types::name::names_equal(&a, &c));
    }
}
