// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! Spec §4.7 "Targeting" / supplement 2 (`_validate_ac_targeting`): an
//! attribute certificate that carries `target_information` restricts
//! which verifiers it may be presented to. `TargetInformation` is a
//! `SEQUENCE OF Targets`, and at least one of those `Targets` sequences
//! must be fully satisfied by the caller's acceptable targets — not just
//! one `Target` entry anywhere in the structure.

use x509_types::attribute_certificate::{Target, TargetInformation, Targets};
use x509_types::common::Asn1ReadableOrWritable;
use x509_types::name::GeneralName;

fn general_names_equal(a: &GeneralName<'_>, b: &GeneralName<'_>) -> bool {
    a == b
}

/// Decoded equality for two `Target` entries, falling back to DER-level
/// comparison for the `Cert` variant (an opaque `IssuerSerial` TLV with
/// no decoded form this crate interprets).
fn target_matches(entry: &Target<'_>, acceptable: &Target<'_>) -> bool {
    match (entry, acceptable) {
        (Target::Name(a), Target::Name(b)) => general_names_equal(a, b),
        (Target::Group(a), Target::Group(b)) => general_names_equal(a, b),
        (Target::Cert(a), Target::Cert(b)) => a.tag() == b.tag() && a.data() == b.data(),
        _ => false,
    }
}

fn targets_sequence_satisfied(targets: &Targets<'_>, acceptable: &[Target<'_>]) -> bool {
    let entries: Vec<Target<'_>> = match targets {
        Asn1ReadableOrWritable::Read(v, _) => v.clone().collect(),
        Asn1ReadableOrWritable::Write(_, _) => return false,
    };
    if entries.is_empty() {
        return false;
    }
    entries
        .iter()
        .all(|entry| acceptable.iter().any(|a| target_matches(entry, a)))
}

/// `None` means the attribute certificate carries no `target_information`
/// and is unconstrained. `Some` means at least one `Targets` sequence
/// must be fully satisfied by `acceptable`.
pub fn check_targeting(
    target_information: Option<&TargetInformation<'_>>,
    acceptable: &[Target<'_>],
) -> bool {
    let Some(target_information) = target_information else {
        return true;
    };
    let sequences: Vec<Targets<'_>> = match target_information {
        Asn1ReadableOrWritable::Read(v, _) => v.clone().collect(),
        Asn1ReadableOrWritable::Write(_, _) => return false,
    };
    sequences.iter().any(|seq| targets_sequence_satisfied(seq, acceptable))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_target_information_is_unconstrained() {
        assert!(check_targeting(None, &[]));
    }
}
