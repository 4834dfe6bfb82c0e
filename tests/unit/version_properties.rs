use proptest::prelude::*;
use std::cmp::Ordering;
use updraft::version::{Qualifier, VersionComparator, VersionTag};

fn qualifier() -> impl Strategy<Value = Qualifier> {
    prop_oneof![
        Just(Qualifier::Full),
        Just(Qualifier::Preview),
        Just(Qualifier::Beta),
        Just(Qualifier::Alpha),
    ]
}

fn version_tag() -> impl Strategy<Value = VersionTag> {
    (0u32..50, 0u32..50, 0u32..50, qualifier())
        .prop_map(|(major, minor, patch, q)| VersionTag::new(major, minor, patch).with_qualifier(q))
}

/// Rank that must agree with `Ord`: numbers first, then qualifier finality.
fn rank(tag: &VersionTag) -> (u32, u32, u32, u8) {
    let finality = match tag.qualifier {
        Qualifier::Alpha => 0,
        Qualifier::Beta => 1,
        Qualifier::Preview => 2,
        Qualifier::Full => 3,
    };
    (tag.major, tag.minor, tag.patch, finality)
}

proptest! {
    #[test]
    fn prop_display_parse_round_trip(tag in version_tag()) {
        let reparsed = VersionTag::parse(&tag.to_string()).unwrap();
        prop_assert_eq!(reparsed, tag);
    }

    #[test]
    fn prop_parse_without_prefix_matches(tag in version_tag()) {
        let text = tag.to_string();
        let bare = text.trim_start_matches('v');
        prop_assert_eq!(VersionTag::parse(bare).unwrap(), tag);
    }

    #[test]
    fn prop_qualifier_separators_are_interchangeable(
        (major, minor, patch) in (0u32..100, 0u32..100, 0u32..100),
        q in qualifier().prop_filter("needs a qualifier name", |q| q.is_prerelease()),
        sep in prop_oneof![Just("-"), Just("."), Just("_"), Just(" ")],
    ) {
        let text = format!("v{major}.{minor}.{patch}{sep}{}", q.name().to_uppercase());
        let expected = VersionTag::new(major, minor, patch).with_qualifier(q);
        prop_assert_eq!(VersionTag::parse(&text).unwrap(), expected);
    }

    #[test]
    fn prop_prerelease_counter_is_ignored(
        tag in version_tag().prop_filter("needs a qualifier name", |t| t.qualifier.is_prerelease()),
        counter in 0u32..100,
        sep in prop_oneof![Just(""), Just(".")],
    ) {
        let text = format!("{tag}{sep}{counter}");
        prop_assert_eq!(VersionTag::parse(&text).unwrap(), tag);
    }

    #[test]
    fn prop_order_agrees_with_rank(a in version_tag(), b in version_tag()) {
        prop_assert_eq!(a.cmp(&b), rank(&a).cmp(&rank(&b)));
        prop_assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
        prop_assert_eq!(a == b, a.cmp(&b) == Ordering::Equal);
    }

    #[test]
    fn prop_order_is_transitive(a in version_tag(), b in version_tag(), c in version_tag()) {
        if a <= b && b <= c {
            prop_assert!(a <= c);
        }
    }

    #[test]
    fn prop_min_is_smallest(tag in version_tag()) {
        prop_assert!(VersionTag::MIN <= tag);
    }

    #[test]
    fn prop_latest_is_maximum(tags in prop::collection::vec(version_tag(), 1..12)) {
        let texts: Vec<String> = tags.iter().map(ToString::to_string).collect();
        let expected = tags.iter().copied().max();
        prop_assert_eq!(VersionComparator::latest(&texts, true), expected);
    }
}

#[test]
fn test_documented_orderings() {
    let tag = |s: &str| VersionTag::parse(s).unwrap();
    assert!(tag("v1.2.0") > tag("v1.1.9"));
    assert!(tag("v1.0.0-beta") < tag("v1.0.0"));
    assert!(tag("v2.0.0-alpha") > tag("v1.9.9"));
    assert_eq!(tag("v1"), tag("v1.0.0"));
    assert_eq!(tag("1.0.0"), tag("v1.0.0"));
    assert!(VersionTag::parse("").is_err());
    assert!(VersionTag::parse("v").is_err());
}
