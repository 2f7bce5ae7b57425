use collection_policy_core::{PolicyConfig, PolicyDocument};

/// A populated policy as stored by older installations: one namespace
/// carries a full pid instead of a bare prefix.
#[allow(dead_code)]
pub const SAMPLE_POLICY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<collection_policy xmlns="http://www.islandora.ca" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" name="Sample Collection" xsi:schemaLocation="http://www.islandora.ca http://syn.lib.umanitoba.ca/collection_policy.xsd">
  <content_models>
    <content_model pid="islandora:sp_basic_image" name="Basic Image" namespace="islandora" dsid=""/>
    <content_model pid="islandora:collectionCModel" name="Collection" namespace="islandora:collection" dsid=""/>
  </content_models>
  <search_terms>
    <default>dc.title</default>
    <term field="dc.title">Title</term>
  </search_terms>
  <staging_area/>
  <relationship>isMemberOfCollection</relationship>
</collection_policy>
"#;

/// Parse `SAMPLE_POLICY`
#[allow(dead_code)]
pub fn sample_policy() -> PolicyDocument {
    PolicyDocument::from_xml(SAMPLE_POLICY).unwrap()
}

/// Configuration stamping a recognisable dsid
#[allow(dead_code)]
pub fn test_config() -> PolicyConfig {
    PolicyConfig::new("COLLECTION_POLICY")
}

/// Empty policy holding the given pids, added in order
#[allow(dead_code)]
pub fn policy_with(pids: &[&str]) -> PolicyDocument {
    let mut policy = PolicyDocument::empty();
    for pid in pids {
        policy.add_content_model(pid, "Label", "islandora", &test_config());
    }
    policy
}

/// Serialize and parse again
#[allow(dead_code)]
pub fn reload(policy: &PolicyDocument) -> PolicyDocument {
    PolicyDocument::from_xml(&policy.to_xml().unwrap()).unwrap()
}
