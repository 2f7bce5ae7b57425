//! Collection-policy schema
//!
//! The XSD shipped in `schema/collection_policy.xsd` is the published
//! contract. `CollectionPolicySchema` enforces the same element and
//! attribute rules directly over the parsed tree; the `SchemaValidator`
//! trait lets callers substitute a different validator.

use std::path::PathBuf;

use collection_policy_core_types::vocabulary::{
    ATTR_DSID, ATTR_FIELD, ATTR_NAME, ATTR_NAMESPACE, ATTR_PID, EL_COLLECTION_POLICY,
    EL_CONTENT_MODEL, EL_CONTENT_MODELS, EL_DEFAULT, EL_RELATIONSHIP, EL_SEARCH_TERMS,
    EL_STAGING_AREA, EL_TERM, POLICY_NS, XSI_NS,
};

use crate::errors::{PolicyError, Result};
use crate::xml::{Element, Node};

/// The collection-policy XSD, embedded at build time
pub const SCHEMA_XSD: &str = include_str!("../schema/collection_policy.xsd");

/// Location of the schema resource shipped with this package
pub fn schema_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("schema")
        .join("collection_policy.xsd")
}

/// Validates a parsed document tree against a schema
pub trait SchemaValidator {
    /// Identifier of the schema, for diagnostics
    fn location(&self) -> &str;

    /// Check the tree rooted at `root`
    ///
    /// # Errors
    /// Returns `PolicyError::Validation` describing the first violation.
    fn validate(&self, root: &Element) -> Result<()>;
}

/// Built-in validator for the fixed collection-policy schema
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionPolicySchema;

const ROOT_CHILDREN: [&str; 4] = [
    EL_CONTENT_MODELS,
    EL_SEARCH_TERMS,
    EL_STAGING_AREA,
    EL_RELATIONSHIP,
];

impl SchemaValidator for CollectionPolicySchema {
    fn location(&self) -> &str {
        "collection_policy.xsd"
    }

    fn validate(&self, root: &Element) -> Result<()> {
        let path = format!("/{}", root.local_name());
        if !root.is(EL_COLLECTION_POLICY, Some(POLICY_NS)) {
            return Err(PolicyError::validation(
                path,
                format!(
                    "expected root element {{{}}}{}, found {}",
                    POLICY_NS,
                    EL_COLLECTION_POLICY,
                    describe(root)
                ),
            ));
        }

        let scope = check_attributes(root, &path, &Bindings::new(), &[ATTR_NAME], &[])?;

        let children = element_children(root, &path)?;
        if children.len() != ROOT_CHILDREN.len() {
            return Err(PolicyError::validation(
                path,
                format!(
                    "expected children ({}), found {} element(s)",
                    ROOT_CHILDREN.join(", "),
                    children.len()
                ),
            ));
        }
        for (child, expected) in children.iter().zip(ROOT_CHILDREN) {
            if !child.is(expected, Some(POLICY_NS)) {
                return Err(PolicyError::validation(
                    path,
                    format!("expected <{}>, found {}", expected, describe(child)),
                ));
            }
        }

        validate_content_models(
            children[0],
            &format!("{}/{}", path, EL_CONTENT_MODELS),
            &scope,
        )?;
        validate_search_terms(
            children[1],
            &format!("{}/{}", path, EL_SEARCH_TERMS),
            &scope,
        )?;
        validate_text_only(children[2], &format!("{}/{}", path, EL_STAGING_AREA), &scope)?;
        validate_text_only(children[3], &format!("{}/{}", path, EL_RELATIONSHIP), &scope)?;
        Ok(())
    }
}

fn validate_content_models(element: &Element, path: &str, outer: &Bindings<'_>) -> Result<()> {
    let scope = check_attributes(element, path, outer, &[], &[])?;
    for (index, child) in element_children(element, path)?.into_iter().enumerate() {
        let child_path = format!("{}/{}[{}]", path, EL_CONTENT_MODEL, index + 1);
        if !child.is(EL_CONTENT_MODEL, Some(POLICY_NS)) {
            return Err(PolicyError::validation(
                path,
                format!("expected <{}>, found {}", EL_CONTENT_MODEL, describe(child)),
            ));
        }
        check_attributes(
            child,
            &child_path,
            &scope,
            &[ATTR_PID, ATTR_NAME, ATTR_NAMESPACE],
            &[ATTR_DSID],
        )?;
        if !child.children.is_empty() {
            return Err(PolicyError::validation(child_path, "must be empty"));
        }
    }
    Ok(())
}

fn validate_search_terms(element: &Element, path: &str, outer: &Bindings<'_>) -> Result<()> {
    let scope = check_attributes(element, path, outer, &[], &[])?;
    let children = element_children(element, path)?;
    for (index, child) in children.iter().enumerate() {
        let child_path = format!("{}/{}", path, child.local_name());
        if index == 0 && child.is(EL_DEFAULT, Some(POLICY_NS)) {
            validate_text_only(child, &child_path, &scope)?;
        } else if child.is(EL_TERM, Some(POLICY_NS)) {
            check_attributes(child, &child_path, &scope, &[], &[ATTR_FIELD])?;
            if child.child_elements().next().is_some() {
                return Err(PolicyError::validation(
                    child_path,
                    "must contain text only",
                ));
            }
        } else {
            return Err(PolicyError::validation(
                path,
                format!(
                    "expected <{}> or leading <{}>, found {}",
                    EL_TERM,
                    EL_DEFAULT,
                    describe(child)
                ),
            ));
        }
    }
    Ok(())
}

fn validate_text_only(element: &Element, path: &str, outer: &Bindings<'_>) -> Result<()> {
    check_attributes(element, path, outer, &[], &[])?;
    if element.child_elements().next().is_some() {
        return Err(PolicyError::validation(path, "must contain text only"));
    }
    Ok(())
}

/// Child elements of a complex-content element; text is not allowed there
fn element_children<'a>(element: &'a Element, path: &str) -> Result<Vec<&'a Element>> {
    let mut children = Vec::new();
    for node in &element.children {
        match node {
            Node::Element(child) => children.push(child),
            Node::Text(_) => {
                return Err(PolicyError::validation(
                    path,
                    "text content is not allowed here",
                ));
            }
        }
    }
    Ok(children)
}

/// Prefix to namespace-URI bindings in scope, innermost last
type Bindings<'a> = Vec<(&'a str, &'a str)>;

/// Unprefixed attributes must be declared. Of the prefixed ones only
/// namespace declarations and `xsi:*` are allowed. Returns the bindings in
/// scope for the element's children.
fn check_attributes<'a>(
    element: &'a Element,
    path: &str,
    outer: &Bindings<'a>,
    required: &[&str],
    optional: &[&str],
) -> Result<Bindings<'a>> {
    let mut scope = outer.clone();
    for (key, value) in &element.attributes {
        if let Some(prefix) = key.strip_prefix("xmlns:") {
            scope.push((prefix, value.as_str()));
        }
    }

    for name in required {
        if element.attribute(name).is_none() {
            return Err(PolicyError::validation(
                path,
                format!("missing required attribute '{}'", name),
            ));
        }
    }
    for (key, _) in &element.attributes {
        if key == "xmlns" || key.starts_with("xmlns:") {
            continue;
        }
        if let Some((prefix, _)) = key.split_once(':') {
            match resolve_prefix(&scope, prefix) {
                Some(XSI_NS) => continue,
                Some(ns) => {
                    return Err(PolicyError::validation(
                        path,
                        format!("attribute '{}' in namespace {} is not allowed", key, ns),
                    ));
                }
                None => {
                    return Err(PolicyError::validation(
                        path,
                        format!("attribute '{}' uses undeclared prefix '{}'", key, prefix),
                    ));
                }
            }
        }
        if !required.contains(&key.as_str()) && !optional.contains(&key.as_str()) {
            return Err(PolicyError::validation(
                path,
                format!("attribute '{}' is not allowed", key),
            ));
        }
    }
    Ok(scope)
}

fn resolve_prefix<'a>(scope: &Bindings<'a>, prefix: &str) -> Option<&'a str> {
    if prefix == "xml" {
        return Some("http://www.w3.org/XML/1998/namespace");
    }
    scope
        .iter()
        .rev()
        .find(|(bound, _)| *bound == prefix)
        .map(|(_, uri)| *uri)
}

fn describe(element: &Element) -> String {
    match &element.namespace {
        Some(ns) => format!("<{}> in namespace {}", element.local_name(), ns),
        None => format!("<{}> with no namespace", element.local_name()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse;

    fn validate(text: &str) -> Result<()> {
        CollectionPolicySchema.validate(&parse(text).unwrap())
    }

    const VALID: &str = r#"<collection_policy xmlns="http://www.islandora.ca" name="Images">
        <content_models>
          <content_model pid="islandora:sp_basic_image" name="Image" namespace="islandora" dsid="CM"/>
        </content_models>
        <search_terms><default>dc.title</default><term field="dc.title">Title</term></search_terms>
        <staging_area/>
        <relationship>isMemberOfCollection</relationship>
      </collection_policy>"#;

    #[test]
    fn test_accepts_valid_document() {
        assert!(validate(VALID).is_ok());
    }

    #[test]
    fn test_rejects_wrong_root() {
        let err = validate("<not-a-policy/>").unwrap_err();
        assert!(matches!(err, PolicyError::Validation { .. }));
    }

    #[test]
    fn test_rejects_missing_namespace() {
        let text = VALID.replace(r#" xmlns="http://www.islandora.ca""#, "");
        assert!(validate(&text).is_err());
    }

    #[test]
    fn test_rejects_missing_name_attribute() {
        let text = VALID.replace(r#" name="Images""#, "");
        let err = validate(&text).unwrap_err();
        assert!(err.to_string().contains("'name'"));
    }

    #[test]
    fn test_rejects_content_model_without_pid() {
        let text = VALID.replace(r#"pid="islandora:sp_basic_image" "#, "");
        let err = validate(&text).unwrap_err();
        match err {
            PolicyError::Validation { path, .. } => {
                assert_eq!(path, "/collection_policy/content_models/content_model[1]")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_unknown_content_model_attribute() {
        let text = VALID.replace(r#"dsid="CM""#, r#"colour="red""#);
        assert!(validate(&text).is_err());
    }

    #[test]
    fn test_rejects_out_of_order_children() {
        let text = r#"<collection_policy xmlns="http://www.islandora.ca" name="">
            <search_terms/><content_models/><staging_area/><relationship/>
          </collection_policy>"#;
        assert!(validate(text).is_err());
    }

    #[test]
    fn test_rejects_missing_relationship() {
        let text = r#"<collection_policy xmlns="http://www.islandora.ca" name="">
            <content_models/><search_terms/><staging_area/>
          </collection_policy>"#;
        assert!(validate(text).is_err());
    }

    #[test]
    fn test_rejects_default_after_term() {
        let text = VALID.replace(
            "<default>dc.title</default><term field=\"dc.title\">Title</term>",
            "<term>Title</term><default>dc.title</default>",
        );
        assert!(validate(&text).is_err());
    }

    #[test]
    fn test_allows_xsi_attributes() {
        let text = VALID.replace(
            r#" name="Images""#,
            r#" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="a b" name="Images""#,
        );
        assert!(validate(&text).is_ok());
    }

    #[test]
    fn test_allows_xsi_attributes_declared_on_an_ancestor() {
        let text = VALID
            .replace(
                r#" name="Images""#,
                r#" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" name="Images""#,
            )
            .replace(r#"dsid="CM""#, r#"dsid="CM" xsi:type="x""#);
        assert!(validate(&text).is_ok());
    }

    #[test]
    fn test_rejects_foreign_attribute_on_root() {
        let text = VALID.replace(
            r#" name="Images""#,
            r#" xmlns:ex="urn:ex" ex:bogus="1" name="Images""#,
        );
        let err = validate(&text).unwrap_err();
        match err {
            PolicyError::Validation { path, message } => {
                assert_eq!(path, "/collection_policy");
                assert!(message.contains("ex:bogus"));
                assert!(message.contains("urn:ex"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_foreign_attribute_on_content_model() {
        let text = VALID
            .replace(r#" name="Images""#, r#" xmlns:ex="urn:ex" name="Images""#)
            .replace(r#"dsid="CM""#, r#"dsid="CM" ex:junk="2""#);
        let err = validate(&text).unwrap_err();
        match err {
            PolicyError::Validation { path, .. } => {
                assert_eq!(path, "/collection_policy/content_models/content_model[1]")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_xml_namespace_attribute() {
        let text = VALID.replace("<staging_area/>", r#"<staging_area xml:lang="en"/>"#);
        assert!(validate(&text).is_err());
    }

    #[test]
    fn test_rejects_undeclared_prefix_on_built_tree() {
        let root = parse(VALID).unwrap().with_attribute("nowhere:x", "1");
        let err = CollectionPolicySchema.validate(&root).unwrap_err();
        assert!(err.to_string().contains("undeclared prefix 'nowhere'"));
    }

    #[test]
    fn test_schema_resource_is_shipped() {
        assert!(schema_path().ends_with("schema/collection_policy.xsd"));
        assert!(SCHEMA_XSD.contains("name=\"collection_policy\""));
    }
}
