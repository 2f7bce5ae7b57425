//! The collection-policy document
//!
//! `PolicyDocument` owns the parsed tree of one policy. Construction always
//! validates; mutations edit the tree in place and leave re-validation to
//! the caller (`validate()`), since appending or removing `content_model`
//! elements cannot break the schema.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Instant;

use collection_policy_core_types::vocabulary::{
    ATTR_DSID, ATTR_NAME, ATTR_NAMESPACE, ATTR_PID, DEFAULT_RELATIONSHIP, EL_COLLECTION_POLICY,
    EL_CONTENT_MODEL, EL_CONTENT_MODELS, EL_RELATIONSHIP, EL_SEARCH_TERMS, EL_STAGING_AREA,
    POLICY_NS, SCHEMA_LOCATION, XSI_NS,
};

use crate::config::PolicyConfig;
use crate::errors::{PolicyError, Result};
use crate::model::ContentModelEntry;
use crate::schema::{CollectionPolicySchema, SchemaValidator};
use crate::xml::{self, Element, Node};
use crate::{log_op_end, log_op_error, log_op_start};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyDocument {
    root: Element,
}

impl PolicyDocument {
    /// Parse and validate a serialized policy
    ///
    /// Whitespace between elements is not significant and is discarded.
    ///
    /// # Errors
    /// `PolicyError::Parse` if the text is not well-formed XML,
    /// `PolicyError::Validation` if it violates the collection-policy schema.
    pub fn from_xml(text: &str) -> Result<Self> {
        Self::from_xml_with(text, &CollectionPolicySchema)
    }

    /// Parse and validate with a caller-supplied validator
    ///
    /// # Errors
    /// As [`PolicyDocument::from_xml`], with validation delegated to
    /// `validator`.
    pub fn from_xml_with<V>(text: &str, validator: &V) -> Result<Self>
    where
        V: SchemaValidator + ?Sized,
    {
        let start = Instant::now();
        log_op_start!("from_xml", bytes = text.len(), schema = validator.location());

        let parsed = xml::parse(text).and_then(|root| {
            validator.validate(&root)?;
            Ok(root)
        });

        let duration_ms = start.elapsed().as_millis() as u64;
        match parsed {
            Ok(root) => {
                let document = Self { root };
                log_op_end!(
                    "from_xml",
                    duration_ms = duration_ms,
                    content_models = document.content_model_elements().count()
                );
                Ok(document)
            }
            Err(err) => {
                log_op_error!("from_xml", err.clone(), duration_ms = duration_ms);
                Err(err)
            }
        }
    }

    /// The canonical empty policy
    ///
    /// Empty name, no content models, empty search terms and staging area,
    /// relationship `isMemberOfCollection`.
    pub fn empty() -> Self {
        let root = Element::new(EL_COLLECTION_POLICY, Some(POLICY_NS))
            .with_attribute("xmlns", POLICY_NS)
            .with_attribute("xmlns:xsi", XSI_NS)
            .with_attribute(ATTR_NAME, "")
            .with_attribute("xsi:schemaLocation", SCHEMA_LOCATION)
            .with_child(Element::new(EL_CONTENT_MODELS, Some(POLICY_NS)))
            .with_child(Element::new(EL_SEARCH_TERMS, Some(POLICY_NS)))
            .with_child(Element::new(EL_STAGING_AREA, Some(POLICY_NS)))
            .with_child(
                Element::new(EL_RELATIONSHIP, Some(POLICY_NS)).with_text(DEFAULT_RELATIONSHIP),
            );
        Self { root }
    }

    /// The collection's display name, `""` when absent
    pub fn name(&self) -> String {
        self.root
            .attribute(ATTR_NAME)
            .unwrap_or_default()
            .to_string()
    }

    /// The membership predicate, `""` when absent
    pub fn relationship(&self) -> String {
        self.root
            .find_child(EL_RELATIONSHIP)
            .map(Element::text)
            .unwrap_or_default()
    }

    /// Content models keyed by pid
    ///
    /// When a pid occurs more than once the later entry in document order
    /// wins. Use [`PolicyDocument::content_model_entries`] to see every entry.
    pub fn content_models(&self) -> BTreeMap<String, ContentModelEntry> {
        self.content_model_entries()
            .into_iter()
            .map(|entry| (entry.pid.clone(), entry))
            .collect()
    }

    /// Every content-model entry in document order, duplicates included
    pub fn content_model_entries(&self) -> Vec<ContentModelEntry> {
        self.content_model_elements()
            .map(|element| {
                ContentModelEntry::from_stored(
                    element.attribute(ATTR_PID).unwrap_or_default(),
                    element.attribute(ATTR_NAME).unwrap_or_default(),
                    element.attribute(ATTR_NAMESPACE).unwrap_or_default(),
                    element.attribute(ATTR_DSID).unwrap_or_default(),
                )
            })
            .collect()
    }

    pub fn has_content_model(&self, pid: &str) -> bool {
        self.content_model_elements()
            .any(|element| element.attribute(ATTR_PID) == Some(pid))
    }

    /// Append a content-model entry
    ///
    /// `namespace` is stored as given; normalization happens on read. The
    /// entry's `dsid` comes from `config`. No duplicate check is made: a
    /// second entry for an existing pid is appended after the first.
    pub fn add_content_model(
        &mut self,
        pid: &str,
        name: &str,
        namespace: &str,
        config: &PolicyConfig,
    ) {
        let start = Instant::now();
        log_op_start!("add_content_model", pid = pid);

        let entry = Element::new(self.qualified(EL_CONTENT_MODEL), self.root.namespace.as_deref())
            .with_attribute(ATTR_PID, pid)
            .with_attribute(ATTR_NAME, name)
            .with_attribute(ATTR_NAMESPACE, namespace)
            .with_attribute(ATTR_DSID, config.default_dsid.as_str());
        self.content_models_element_mut()
            .children
            .push(Node::Element(entry));

        log_op_end!(
            "add_content_model",
            duration_ms = start.elapsed().as_millis() as u64,
            pid = pid
        );
    }

    /// Remove content models by pid
    ///
    /// For each candidate, in order, the first entry with that pid is
    /// removed. Returns the number of candidates processed, whether or not
    /// they matched.
    pub fn remove_content_model<I, S>(&mut self, candidates: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let start = Instant::now();
        log_op_start!("remove_content_model");

        let mut processed = 0;
        let mut removed = 0;
        for candidate in candidates {
            processed += 1;
            let pid = candidate.as_ref();
            let Some(container) = self.root.find_child_mut(EL_CONTENT_MODELS) else {
                continue;
            };
            let position = container.children.iter().position(|node| {
                matches!(node, Node::Element(element)
                    if element.local_name() == EL_CONTENT_MODEL
                        && element.attribute(ATTR_PID) == Some(pid))
            });
            if let Some(index) = position {
                container.children.remove(index);
                removed += 1;
            } else {
                tracing::debug!(pid = pid, "no content model to remove");
            }
        }

        log_op_end!(
            "remove_content_model",
            duration_ms = start.elapsed().as_millis() as u64,
            candidates = processed,
            removed = removed
        );
        processed
    }

    /// Re-check the current tree against the collection-policy schema
    ///
    /// # Errors
    /// `PolicyError::Validation` describing the first violation.
    pub fn validate(&self) -> Result<()> {
        self.validate_with(&CollectionPolicySchema)
    }

    /// Re-check the current tree with a caller-supplied validator
    ///
    /// # Errors
    /// Whatever `validator` reports.
    pub fn validate_with<V>(&self, validator: &V) -> Result<()>
    where
        V: SchemaValidator + ?Sized,
    {
        validator.validate(&self.root)
    }

    /// Serialize the document, XML declaration included
    ///
    /// # Errors
    /// `PolicyError::Serialization` if the writer fails.
    pub fn to_xml(&self) -> Result<String> {
        xml::write(&self.root)
    }

    /// Read-only view of the underlying tree
    pub fn root(&self) -> &Element {
        &self.root
    }

    fn content_model_elements(&self) -> impl Iterator<Item = &Element> {
        self.root
            .find_child(EL_CONTENT_MODELS)
            .into_iter()
            .flat_map(Element::child_elements)
            .filter(|element| element.local_name() == EL_CONTENT_MODEL)
    }

    /// The `content_models` container, created in first position if absent
    fn content_models_element_mut(&mut self) -> &mut Element {
        if self.root.find_child(EL_CONTENT_MODELS).is_none() {
            let container = Element::new(
                self.qualified(EL_CONTENT_MODELS),
                self.root.namespace.as_deref(),
            );
            self.root.children.insert(0, Node::Element(container));
        }
        match self.root.find_child_mut(EL_CONTENT_MODELS) {
            Some(container) => container,
            None => unreachable!("content_models container was just inserted"),
        }
    }

    /// Qualify a local name with the root element's prefix, if it has one
    fn qualified(&self, local_name: &str) -> String {
        match self.root.name.split_once(':') {
            Some((prefix, _)) => format!("{}:{}", prefix, local_name),
            None => local_name.to_string(),
        }
    }
}

impl Default for PolicyDocument {
    fn default() -> Self {
        Self::empty()
    }
}

impl FromStr for PolicyDocument {
    type Err = PolicyError;

    fn from_str(text: &str) -> Result<Self> {
        Self::from_xml(text)
    }
}
