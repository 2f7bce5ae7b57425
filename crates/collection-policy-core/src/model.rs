use serde::{Deserialize, Serialize};

/// One `content_model` entry of a collection policy
///
/// Declares a content model the collection accepts together with the
/// defaults (label and pid namespace) stamped on new members of that type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentModelEntry {
    /// Persistent identifier of the content-model object
    pub pid: String,

    /// Default label for new members, may be empty
    pub name: String,

    /// Default pid namespace for new members, always colon-free
    pub namespace: String,

    /// Datastream id recorded when the entry was added
    pub dsid: String,
}

impl ContentModelEntry {
    /// Build an entry from raw stored attribute values
    ///
    /// The namespace is normalized with [`normalize_namespace`].
    pub fn from_stored(pid: &str, name: &str, namespace: &str, dsid: &str) -> Self {
        Self {
            pid: pid.to_string(),
            name: name.to_string(),
            namespace: normalize_namespace(namespace).to_string(),
            dsid: dsid.to_string(),
        }
    }
}

/// Strip anything from the first `:` onwards
///
/// Older policies stored a full pid (`islandora:collection`) where a bare
/// namespace belongs; readers only ever see the prefix.
pub fn normalize_namespace(raw: &str) -> &str {
    match raw.split_once(':') {
        Some((prefix, _)) => prefix,
        None => raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_namespace_strips_suffix() {
        assert_eq!(normalize_namespace("islandora:collection"), "islandora");
    }

    #[test]
    fn test_normalize_namespace_without_colon_unchanged() {
        assert_eq!(normalize_namespace("islandora"), "islandora");
    }

    #[test]
    fn test_normalize_namespace_edge_cases() {
        assert_eq!(normalize_namespace(""), "");
        assert_eq!(normalize_namespace(":abc"), "");
        assert_eq!(normalize_namespace("a:b:c"), "a");
    }

    #[test]
    fn test_from_stored_normalizes() {
        let entry = ContentModelEntry::from_stored("cm:1", "Image", "ns:1", "DS");
        assert_eq!(entry.pid, "cm:1");
        assert_eq!(entry.namespace, "ns");
        assert_eq!(entry.dsid, "DS");
    }
}
