mod common;

use common::{reload, sample_policy, test_config, SAMPLE_POLICY};
use collection_policy_core::{normalize_namespace, PolicyDocument};
use proptest::prelude::*;

fn assert_same_fields(a: &PolicyDocument, b: &PolicyDocument) {
    assert_eq!(a.name(), b.name());
    assert_eq!(a.relationship(), b.relationship());
    assert_eq!(a.content_models(), b.content_models());
}

#[test]
fn test_empty_round_trip() {
    let policy = PolicyDocument::empty();
    assert_same_fields(&policy, &reload(&policy));
}

#[test]
fn test_sample_round_trip() {
    let policy = sample_policy();
    assert_same_fields(&policy, &reload(&policy));
}

#[test]
fn test_round_trip_is_a_fixed_point() {
    let once = sample_policy().to_xml().unwrap();
    let twice = PolicyDocument::from_xml(&once).unwrap().to_xml().unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_whitespace_in_label_survives_round_trip() {
    let mut policy = PolicyDocument::empty();
    policy.add_content_model("a:1", "Line1\nLine2\tTab\r", "a", &test_config());

    let text = policy.to_xml().unwrap();
    assert!(text.contains(r#"name="Line1&#10;Line2&#9;Tab&#13;""#));
    let open_tag = text.lines().find(|l| l.contains("a:1")).unwrap();
    assert!(open_tag.trim_end().ends_with("/>"));

    let reloaded = PolicyDocument::from_xml(&text).unwrap();
    assert_eq!(reloaded.content_models()["a:1"].name, "Line1\nLine2\tTab\r");
    assert_eq!(reloaded.to_xml().unwrap(), text);
}

#[test]
fn test_character_references_in_stored_attribute_survive_reload() {
    let stored = SAMPLE_POLICY.replace(r#"name="Basic Image""#, r#"name="Basic&#10;Image""#);
    let once = PolicyDocument::from_xml(&stored).unwrap().to_xml().unwrap();
    let twice = PolicyDocument::from_xml(&once).unwrap();
    assert_eq!(
        twice.content_models()["islandora:sp_basic_image"].name,
        "Basic\nImage"
    );
}

fn pid_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,8}:[A-Za-z0-9_]{1,12}"
}

proptest! {
    #[test]
    fn prop_namespace_read_back_is_prefix(prefix in "[a-z]{0,8}", rest in "[a-z:]{0,8}") {
        let raw = format!("{}:{}", prefix, rest);
        prop_assert_eq!(normalize_namespace(&raw), prefix.as_str());
        prop_assert!(!normalize_namespace(&raw).contains(':'));
    }

    #[test]
    fn prop_mutated_policy_round_trips(
        pids in proptest::collection::vec(pid_strategy(), 0..8),
        labels in proptest::collection::vec("[A-Za-z0-9 &<>\"'.\t\r\n-]{0,12}", 8),
        namespaces in proptest::collection::vec("[a-z]{1,6}(:[a-z]{1,6})?", 8),
        remove_every in 1usize..4,
    ) {
        let mut policy = PolicyDocument::empty();
        for (i, pid) in pids.iter().enumerate() {
            policy.add_content_model(pid, &labels[i], &namespaces[i], &test_config());
        }
        let doomed: Vec<&String> = pids.iter().step_by(remove_every).collect();
        prop_assert_eq!(policy.remove_content_model(&doomed), doomed.len());

        prop_assert!(policy.validate().is_ok());
        let reloaded = reload(&policy);
        prop_assert_eq!(policy.name(), reloaded.name());
        prop_assert_eq!(policy.relationship(), reloaded.relationship());
        prop_assert_eq!(policy.content_models(), reloaded.content_models());
        for entry in reloaded.content_models().values() {
            prop_assert!(!entry.namespace.contains(':'));
        }
    }
}
