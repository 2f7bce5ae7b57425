//! Names used by the collection-policy XML document

/// Target namespace of the collection-policy schema
pub const POLICY_NS: &str = "http://www.islandora.ca";

/// XML Schema instance namespace (carries `xsi:schemaLocation`)
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Published location of the collection-policy schema
pub const SCHEMA_LOCATION: &str = "http://www.islandora.ca http://syn.lib.umanitoba.ca/collection_policy.xsd";

// Elements
pub const EL_COLLECTION_POLICY: &str = "collection_policy";
pub const EL_CONTENT_MODELS: &str = "content_models";
pub const EL_CONTENT_MODEL: &str = "content_model";
pub const EL_SEARCH_TERMS: &str = "search_terms";
pub const EL_DEFAULT: &str = "default";
pub const EL_TERM: &str = "term";
pub const EL_STAGING_AREA: &str = "staging_area";
pub const EL_RELATIONSHIP: &str = "relationship";

// Attributes
pub const ATTR_NAME: &str = "name";
pub const ATTR_PID: &str = "pid";
pub const ATTR_NAMESPACE: &str = "namespace";
pub const ATTR_DSID: &str = "dsid";
pub const ATTR_FIELD: &str = "field";

/// Relationship predicate stamped on a fresh policy
pub const DEFAULT_RELATIONSHIP: &str = "isMemberOfCollection";
