//! Exact-key storage of allow/deny rules.
//!
//! The table maps a (role, resource, privilege) triple to a rule. Each part of the key is either a
//! concrete identifier or `None`, the wildcard matching everything. Resolving specificity across
//! ancestors and wildcards is left to the [`Authorizer`](crate::Authorizer); the table itself only
//! answers "is there a rule for exactly this key?".

use log::{debug, trace};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::assertion::{Described, SharedAssertion};


// Rule ///////////////////////////////////////////////////////////////////////////////////////////


/// Allow or deny access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny
} // enum Access

/// Grants or refuses access, optionally only when its assertion holds.
#[derive(Clone)]
pub struct Rule {
    access:    Access,
    assertion: Option<SharedAssertion>,
} // struct Rule

impl Rule {

    #[inline]
    pub fn access(&self) -> Access {
        self.access
    } // access

    #[inline]
    pub fn assertion(&self) -> Option<&SharedAssertion> {
        self.assertion.as_ref()
    } // assertion

} // impl Rule

impl fmt::Debug for Rule {

    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("access", &self.access)
            .field("assertion", &Described(&self.assertion))
            .finish()
    } // fmt

} // impl fmt::Debug for Rule


// RuleKey ////////////////////////////////////////////////////////////////////////////////////////


/// Key of a rule. A `None` part is a wildcard.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RuleKey {
    pub role:      Option<String>,
    pub resource:  Option<String>,
    pub privilege: Option<String>,
} // struct RuleKey

impl RuleKey {

    pub fn new(role: Option<&str>, resource: Option<&str>, privilege: Option<&str>) -> Self {
        RuleKey{
            role:      role.map(String::from),
            resource:  resource.map(String::from),
            privilege: privilege.map(String::from),
        } // RuleKey
    } // new

} // impl RuleKey

/// The (role, resource, privilege) parts of a rule key, owned or borrowed. Lets the table be
/// searched with `&str` parts without building a [`RuleKey`].
pub trait KeyParts {
    fn parts(&self) -> (Option<&str>, Option<&str>, Option<&str>);
} // trait KeyParts

impl KeyParts for RuleKey {

    fn parts(&self) -> (Option<&str>, Option<&str>, Option<&str>) {
        (self.role.as_deref(), self.resource.as_deref(), self.privilege.as_deref())
    } // parts

} // impl KeyParts for RuleKey

impl<'k> KeyParts for (Option<&'k str>, Option<&'k str>, Option<&'k str>) {

    fn parts(&self) -> (Option<&str>, Option<&str>, Option<&str>) {
        *self
    } // parts

} // impl KeyParts for (Option<&str>, Option<&str>, Option<&str>)

// Owned and borrowed keys must hash alike, so both go through `parts`.
impl Hash for RuleKey {

    fn hash<H: Hasher>(&self, state: &mut H) {
        self.parts().hash(state)
    } // hash

} // impl Hash for RuleKey

impl<'a> Borrow<dyn KeyParts + 'a> for RuleKey {

    fn borrow(&self) -> &(dyn KeyParts + 'a) {
        self
    } // borrow

} // impl Borrow<dyn KeyParts> for RuleKey

impl Hash for dyn KeyParts + '_ {

    fn hash<H: Hasher>(&self, state: &mut H) {
        self.parts().hash(state)
    } // hash

} // impl Hash for dyn KeyParts

impl PartialEq for dyn KeyParts + '_ {

    fn eq(&self, other: &Self) -> bool {
        self.parts() == other.parts()
    } // eq

} // impl PartialEq for dyn KeyParts

impl Eq for dyn KeyParts + '_ {}


// RuleTable //////////////////////////////////////////////////////////////////////////////////////


#[derive(Clone, Debug, Default)]
pub struct RuleTable {
    rules: HashMap<RuleKey, Rule>,
} // struct RuleTable

impl RuleTable {

    pub fn new() -> Self {
        RuleTable::default()
    } // new

    /// Stores a rule. A later rule for the same key replaces the earlier one.
    pub fn put(
        &mut self,
        role: Option<&str>,
        resource: Option<&str>,
        privilege: Option<&str>,
        access: Access,
        assertion: Option<SharedAssertion>,
    ) {
        trace!("setting {:?} rule for {:?} on {:?} to {:?}", access, role, resource, privilege);
        let key = RuleKey::new(role, resource, privilege);

        if let Some(previous) = self.rules.insert(key, Rule{access, assertion}) {
            debug!(
                "replaced {:?} rule for {:?} on {:?} to {:?}",
                previous.access, role, resource, privilege
            );
        } // if
    } // put

    /// Returns the rule stored under exactly this key.
    pub fn find(&self, role: Option<&str>, resource: Option<&str>, privilege: Option<&str>) -> Option<&Rule> {
        trace!("getting one rule for {:?} on {:?} to {:?}", role, resource, privilege);
        let key = (role, resource, privilege);

        self.rules.get(&key as &dyn KeyParts)
    } // find

    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    } // len

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    } // is_empty

} // impl RuleTable


// Tests //////////////////////////////////////////////////////////////////////////////////////////


// mod tests
