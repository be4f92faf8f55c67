// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! Proof-of-existence bookkeeping (spec §3 "POE Map", §6 "POE").
//!
//! Grounded on `pyhanko_certvalidator.ltv.poe.POEManager`: a digest keyed
//! map storing the *earliest* time any caller has vouched for a blob's
//! existence, with registration-on-access as an intentional side effect.

use std::collections::HashMap;

use asn1::DateTime;

// Digests fed to `PoeMap` are computed by `CryptoOps::sha256` (spec §1:
// the cryptographic primitive is an external collaborator); this crate
// never hashes on a caller's behalf, so there is no `digest_for_poe`
// helper here — only `register_by_digest`/`get_or_register`, which take
// an already-computed digest.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownPoe {
    pub digest: [u8; 32],
    pub poe_time: DateTime,
}

/// C: the POE map (spec invariant I5: stores the minimum time per digest).
#[derive(Default)]
pub struct PoeMap {
    entries: HashMap<[u8; 32], DateTime>,
}

impl PoeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a POE claim for `digest` at `dt`, keeping the existing
    /// entry if it's already earlier. Returns the (possibly unchanged)
    /// earliest time on file.
    pub fn register_by_digest(&mut self, digest: [u8; 32], dt: DateTime) -> DateTime {
        match self.entries.get(&digest) {
            Some(existing) if existing <= &dt => existing.clone(),
            _ => {
                self.entries.insert(digest, dt.clone());
                dt
            }
        }
    }

    /// Look up the POE time for `digest`, registering `now` as a side
    /// effect if none is on file yet (spec §3: "intentional side
    /// effect").
    pub fn get_or_register(&mut self, digest: [u8; 32], now: DateTime) -> DateTime {
        self.register_by_digest(digest, now)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[u8; 32], &DateTime)> {
        self.entries.iter()
    }

    /// Merge `other` into `self`, keeping the pointwise minimum per
    /// digest (spec: "Merging another POE map yields the pointwise
    /// minimum").
    pub fn merge(&mut self, other: &PoeMap) {
        for (digest, dt) in other.iter() {
            self.register_by_digest(*digest, dt.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: u16) -> DateTime {
        DateTime::new(y, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_register_keeps_minimum() {
        let mut poe = PoeMap::new();
        let digest = [7u8; 32];
        assert_eq!(poe.register_by_digest(digest, dt(2023)), dt(2023));
        // A later claim doesn't overwrite the earlier one.
        assert_eq!(poe.register_by_digest(digest, dt(2024)), dt(2023));
        // An earlier claim does.
        assert_eq!(poe.register_by_digest(digest, dt(2020)), dt(2020));
    }

    #[test]
    fn test_merge_is_pointwise_minimum() {
        let mut a = PoeMap::new();
        let mut b = PoeMap::new();
        let digest = [1u8; 32];
        a.register_by_digest(digest, dt(2024));
        b.register_by_digest(digest, dt(2021));
        a.merge(&b);
        assert_eq!(a.entries.get(&digest), Some(&dt(2021)));
    }

    #[test]
    fn test_merge_with_self_is_identity() {
        let mut a = PoeMap::new();
        a.register_by_digest([2u8; 32], dt(2022));
        let snapshot: Vec<_> = a.iter().map(|(d, t)| (*d, t.clone())).collect();
        let clone_of_a = {
            let mut c = PoeMap::new();
            for (d, t) in &snapshot {
                c.register_by_digest(*d, t.clone());
            }
            c
        };
        a.merge(&clone_of_a);
        let after: Vec<_> = a.iter().map(|(d, t)| (*d, t.clone())).collect();
        assert_eq!(snapshot.len(), after.len());
    }

    proptest::proptest! {
        // Testable property (spec §8): "after any sequence of
        // registrations for digest `d`, the stored time equals the
        // minimum of all supplied times."
        #[test]
        fn prop_register_converges_to_minimum(years in proptest::collection::vec(1u16..2100, 1..20)) {
            let mut poe = PoeMap::new();
            let digest = [9u8; 32];
            for y in &years {
                poe.register_by_digest(digest, dt(*y));
            }
            let true_min = years.iter().min().copied().unwrap();
            proptest::prop_assert_eq!(poe.entries.get(&digest).cloned(), Some(dt(true_min)));
        }

        // "Merging a POE map with itself is the identity."
        #[test]
        fn prop_merge_with_self_is_identity(years in proptest::collection::vec(1u16..2100, 0..10)) {
            let mut a = PoeMap::new();
            for (i, y) in years.iter().enumerate() {
                a.register_by_digest([i as u8; 32], dt(*y));
            }
            let before: Vec<_> = {
                let mut v: Vec<_> = a.iter().map(|(d, t)| (*d, t.clone())).collect();
                v.sort_by_key(|(d, _)| *d);
                v
            };
            let snapshot = {
                let mut c = PoeMap::new();
                for (d, t) in &before {
                    c.register_by_digest(*d, t.clone());
                }
                c
            };
            a.merge(&snapshot);
            let after: Vec<_> = {
                let mut v: Vec<_> = a.iter().map(|(d, t)| (*d, t.clone())).collect();
                v.sort_by_key(|(d, _)| *d);
                v
            };
            proptest::prop_assert_eq!(before, after);
        }
    }
}
