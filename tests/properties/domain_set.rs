//! Property tests for hostname normalization and domain sets.

use proptest::prelude::*;

use berth::domain::value_objects::{normalize_hostname, DomainSet};

fn label() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z0-9]([a-z0-9-]{0,10}[a-z0-9])?").unwrap()
}

fn hostname() -> impl Strategy<Value = String> {
    proptest::collection::vec(label(), 2..=4).prop_map(|labels| labels.join("."))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Normalization never panics on arbitrary input.
    #[test]
    fn property_normalize_never_panics(s in "(?s).{0,300}") {
        let _ = normalize_hostname(&s);
    }

    /// PROPERTY: Normalization is idempotent.
    #[test]
    fn property_normalize_is_idempotent(host in hostname(), upper in any::<bool>(), dot in any::<bool>()) {
        let mut raw = if upper { host.to_ascii_uppercase() } else { host.clone() };
        if dot {
            raw.push('.');
        }
        let once = normalize_hostname(&raw).unwrap();
        prop_assert_eq!(&once, &host);
        prop_assert_eq!(normalize_hostname(&once).unwrap(), once);
    }

    /// PROPERTY: The primary comes first and no host appears twice.
    #[test]
    fn property_set_is_ordered_and_unique(
        primary in hostname(),
        aliases in proptest::collection::vec(hostname(), 0..6),
    ) {
        let mut with_repeats = aliases.clone();
        with_repeats.extend(aliases.iter().cloned());
        with_repeats.push(primary.clone());

        let set = DomainSet::new(&primary, &with_repeats).unwrap();
        prop_assert_eq!(set.primary(), primary.as_str());

        let hosts: Vec<&str> = set.iter().collect();
        let mut deduped = hosts.clone();
        deduped.sort_unstable();
        deduped.dedup();
        prop_assert_eq!(deduped.len(), hosts.len());
        prop_assert!(!set.aliases().contains(&primary));
    }

    /// PROPERTY: Restriction keeps the primary and never invents hosts.
    #[test]
    fn property_restriction_is_a_subset(
        primary in hostname(),
        aliases in proptest::collection::vec(hostname(), 0..6),
        covered in proptest::collection::vec(hostname(), 0..6),
    ) {
        let set = DomainSet::new(&primary, &aliases).unwrap();
        let restricted = set.restricted_to(&covered);

        prop_assert_eq!(restricted.primary(), set.primary());
        for host in restricted.iter() {
            prop_assert!(set.contains(host));
        }
        prop_assert!(restricted.len() <= set.len());
        prop_assert_eq!(set.primary_only().len(), 1);
    }
}
