//! Parent-indexed tree of identifiers, used alike for roles and resources.
//!
//! Every node has at most one parent and a parent must be registered before its children, so the
//! registry can never hold a cycle and every ancestor walk ends at a root.

use log::{debug, trace, warn};
use std::collections::BTreeMap;
use std::iter::FusedIterator;

use crate::error::{Error, NodeKind, Result};


// Registry ///////////////////////////////////////////////////////////////////////////////////////


#[derive(Clone, Debug)]
pub struct Registry {
    kind:  NodeKind,
    nodes: BTreeMap<String, Option<String>>,
} // struct Registry

impl Registry {

    pub fn new(kind: NodeKind) -> Self {
        Registry{kind, nodes: BTreeMap::new()}
    } // new

    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.kind
    } // kind

    /// Registers `id` below `parent`. Adding a node that already exists with the same parent is a
    /// no-op; with a different parent it is an error.
    pub fn add(&mut self, id: &str, parent: Option<&str>) -> Result<()> {
        trace!("adding {} {} with parent {:?}", self.kind, id, parent);
        if let Some(existing) = self.nodes.get(id) {
            if existing.as_deref() == parent {
                debug!("{} {} already registered", self.kind, id);
                return Ok(());
            } // if
            warn!("adding duplicate {}: {}", self.kind, id);
            return Err(Error::DuplicateNode{kind: self.kind, id: String::from(id)});
        } // if
        if let Some(name) = parent {
            if !self.nodes.contains_key(name) {
                warn!("missing parent {} for new {}: {}", name, self.kind, id);
                return Err(Error::UnknownParent{
                    kind:   self.kind,
                    id:     String::from(id),
                    parent: String::from(name),
                });
            } // if
        } // if
        self.nodes.insert(String::from(id), parent.map(String::from));
        Ok(())
    } // add

    /// Returns true if `id` is registered.
    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    } // contains

    /// Returns the immediate parent of `id`, or `None` for a root.
    pub fn parent_of(&self, id: &str) -> Result<Option<&str>> {
        trace!("getting {} parent for: {}", self.kind, id);
        match self.nodes.get(id) {
            Some(parent) => Ok(parent.as_deref()),
            None         => Err(self.missing(id)),
        } // match
    } // parent_of

    /// Returns the ancestors of `id`, nearest first and ending at the root.
    pub fn ancestors(&self, id: &str) -> Result<Ancestors<'_>> {
        trace!("getting {} ancestors for: {}", self.kind, id);
        let parent = self.parent_of(id)?;

        Ok(Ancestors{registry: self, next: parent})
    } // ancestors

    /// Returns `id` followed by its ancestors.
    pub fn lineage<'a>(&'a self, id: &str) -> Result<Ancestors<'a>> {
        trace!("getting {} lineage for: {}", self.kind, id);
        match self.nodes.get_key_value(id) {
            Some((name, _)) => Ok(Ancestors{registry: self, next: Some(name.as_str())}),
            None            => Err(self.missing(id)),
        } // match
    } // lineage

    /// Iterates over all registered identifiers in lexical order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    } // ids

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    } // len

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    } // is_empty

    fn missing(&self, id: &str) -> Error {
        warn!("missing {}: {}", self.kind, id);
        Error::unknown(self.kind, id)
    } // missing

} // impl Registry


// Ancestors //////////////////////////////////////////////////////////////////////////////////////


/// Lazy walk up the tree. Cloning restarts the walk from the same position.
#[derive(Clone, Debug)]
pub struct Ancestors<'a> {
    registry: &'a Registry,
    next:     Option<&'a str>,
} // struct Ancestors

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;

        // parents are registered before children, so every link resolves
        self.next = self.registry.nodes.get(current).and_then(|parent| parent.as_deref());
        Some(current)
    } // next

} // impl Iterator for Ancestors

impl FusedIterator for Ancestors<'_> {}


// Tests //////////////////////////////////////////////////////////////////////////////////////////


#[cfg(test)]
mod tests {

    use super::*;
    use test_env_log::test;

    fn setup_registry() -> Registry {
        let mut reg = Registry::new(NodeKind::Resource);

        assert!(reg.add("news", None).is_ok());
        assert!(reg.add("latest", Some("news")).is_ok());
        assert!(reg.add("anouncement", Some("news")).is_ok());
        assert!(reg.add("breaking", Some("latest")).is_ok());
        assert!(reg.add("newsletter", None).is_ok());

        reg
    } // setup_registry

    #[test]
    fn add() {
        let mut reg = setup_registry();

        assert!(reg.contains("news"));
        assert!(reg.contains("breaking"));
        assert!(!reg.contains("archive"));
        assert_eq!(reg.len(), 5);

        // identical re-add is a no-op
        assert!(reg.add("latest", Some("news")).is_ok());
        assert_eq!(reg.len(), 5);

        match reg.add("latest", None) {
            Err(Error::DuplicateNode{kind, id}) => {
                assert_eq!(kind, NodeKind::Resource);
                assert_eq!(id, "latest");
            },
            other => panic!("unexpected result: {:?}", other),
        } // match

        match reg.add("archive", Some("history")) {
            Err(Error::UnknownParent{id, parent, ..}) => {
                assert_eq!(id, "archive");
                assert_eq!(parent, "history");
            },
            other => panic!("unexpected result: {:?}", other),
        } // match
        assert!(!reg.contains("archive"));
    } // add

    #[test]
    fn parent() {
        let reg = setup_registry();

        assert_eq!(reg.parent_of("news").unwrap(), None);
        assert_eq!(reg.parent_of("breaking").unwrap(), Some("latest"));

        match reg.parent_of("ghost") {
            Err(Error::UnknownResource(id)) => assert_eq!(id, "ghost"),
            other => panic!("unexpected result: {:?}", other),
        } // match
    } // parent

    #[test]
    fn ancestors() {
        let reg = setup_registry();

        assert_eq!(reg.ancestors("news").unwrap().collect::<Vec<_>>(), Vec::<&str>::new());
        assert_eq!(reg.ancestors("latest").unwrap().collect::<Vec<_>>(), vec!["news"]);
        assert_eq!(reg.ancestors("breaking").unwrap().collect::<Vec<_>>(), vec!["latest", "news"]);
        assert!(reg.ancestors("ghost").is_err());
    } // ancestors

    #[test]
    fn lineage() {
        let reg = setup_registry();

        assert_eq!(reg.lineage("newsletter").unwrap().collect::<Vec<_>>(), vec!["newsletter"]);
        assert_eq!(reg.lineage("breaking").unwrap().collect::<Vec<_>>(), vec!["breaking", "latest", "news"]);
    } // lineage

    #[test]
    fn restartable() {
        let reg  = setup_registry();
        let walk = reg.ancestors("breaking").unwrap();

        assert_eq!(walk.clone().count(), 2);
        assert_eq!(walk.clone().last(), Some("news"));
        assert_eq!(walk.collect::<Vec<_>>(), vec!["latest", "news"]);
    } // restartable

    #[test]
    fn ids() {
        let reg = setup_registry();

        assert!(Registry::new(NodeKind::Role).is_empty());
        assert!(!reg.is_empty());
        assert_eq!(reg.kind(), NodeKind::Resource);
        assert_eq!(reg.ids().collect::<Vec<_>>(), vec!["anouncement", "breaking", "latest", "news", "newsletter"]);
    } // ids

    #[test]
    fn unknown_role() {
        let reg = Registry::new(NodeKind::Role);

        match reg.lineage("ghost-role") {
            Err(Error::UnknownRole(id)) => assert_eq!(id, "ghost-role"),
            other => panic!("unexpected result: {:?}", other),
        } // match
    } // unknown_role

} // mod tests
