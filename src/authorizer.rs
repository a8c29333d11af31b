//! Building the role and resource trees and the rule table, and answering access queries.

use log::{info, trace, warn};
use serde_json::Value;
use std::collections::HashMap;
use std::iter;

use crate::assertion::{AssertionQuery, SharedAssertion};
use crate::error::{Error, NodeKind, Result};
use crate::provider::{Resource, ResourceProvider, Role, RoleProvider};
use crate::registry::{Ancestors, Registry};
use crate::rules::{Access, Rule, RuleTable};


// AuthorizerBuilder //////////////////////////////////////////////////////////////////////////////


/// Collects roles, resources and rules before they are frozen into an [`Authorizer`].
///
/// Roles and resources must be added before rules refer to them. A `None` role, resource or
/// privilege in a rule is a wildcard.
#[derive(Debug)]
pub struct AuthorizerBuilder {
    roles:     Registry,
    resources: Registry,
    rules:     RuleTable,
} // struct AuthorizerBuilder

impl Default for AuthorizerBuilder {

    fn default() -> Self {
        AuthorizerBuilder::new()
    } // default

} // impl Default for AuthorizerBuilder

impl AuthorizerBuilder {

    pub fn new() -> Self {
        trace!("creating new authorizer builder");
        AuthorizerBuilder{
            roles:     Registry::new(NodeKind::Role),
            resources: Registry::new(NodeKind::Resource),
            rules:     RuleTable::new(),
        } // AuthorizerBuilder
    } // new

    /// Adds a resource below an already registered parent.
    #[inline]
    pub fn add_resource(&mut self, id: &str, parent: Option<&str>) -> Result<()> {
        self.resources.add(id, parent)
    } // add_resource

    /// Adds a role below an already registered parent.
    #[inline]
    pub fn add_role(&mut self, id: &str, parent: Option<&str>) -> Result<()> {
        self.roles.add(id, parent)
    } // add_role

    /// Registers a snapshot of resources. Parents are registered before their children whatever
    /// the order of the snapshot.
    pub fn add_resources<I>(&mut self, resources: I) -> Result<()>
    where
        I: IntoIterator<Item = Resource>,
    {
        let nodes = resources.into_iter().map(|r| (r.id, r.parent)).collect::<Vec<_>>();

        register_tree(&mut self.resources, &nodes)
    } // add_resources

    /// Registers a snapshot of roles and the rules their permissions grant. Administrators are
    /// allowed everything; every other role is allowed exactly its permissions.
    pub fn add_roles<I>(&mut self, roles: I) -> Result<()>
    where
        I: IntoIterator<Item = Role>,
    {
        let roles = roles.into_iter().collect::<Vec<_>>();
        let nodes = roles.iter().map(|r| (r.id.clone(), r.parent.clone())).collect::<Vec<_>>();

        register_tree(&mut self.roles, &nodes)?;

        for role in &roles {
            if role.administrator {
                trace!("granting all privileges to administrator {}", role.id);
                self.allow(Some(role.id.as_str()), None, None)?;
                continue;
            } // if
            for permission in &role.permissions {
                self.set_rule(
                    Some(role.id.as_str()),
                    permission.resource(),
                    permission.privilege(),
                    Access::Allow,
                    permission.assertion().cloned(),
                )?;
            } // for
        } // for
        Ok(())
    } // add_roles

    #[inline]
    pub fn allow(&mut self, role: Option<&str>, resource: Option<&str>, privilege: Option<&str>) -> Result<()> {
        self.set_rule(role, resource, privilege, Access::Allow, None)
    } // allow

    #[inline]
    pub fn deny(&mut self, role: Option<&str>, resource: Option<&str>, privilege: Option<&str>) -> Result<()> {
        self.set_rule(role, resource, privilege, Access::Deny, None)
    } // deny

    /// Allows only while `assertion` holds.
    #[inline]
    pub fn allow_if(
        &mut self,
        role: Option<&str>,
        resource: Option<&str>,
        privilege: Option<&str>,
        assertion: SharedAssertion,
    ) -> Result<()> {
        self.set_rule(role, resource, privilege, Access::Allow, Some(assertion))
    } // allow_if

    /// Denies only while `assertion` holds.
    #[inline]
    pub fn deny_if(
        &mut self,
        role: Option<&str>,
        resource: Option<&str>,
        privilege: Option<&str>,
        assertion: SharedAssertion,
    ) -> Result<()> {
        self.set_rule(role, resource, privilege, Access::Deny, Some(assertion))
    } // deny_if

    /// Stores a rule. Every role or resource which is not `None` must be registered. A rule for
    /// the same triple replaces the earlier one.
    pub fn set_rule(
        &mut self,
        role: Option<&str>,
        resource: Option<&str>,
        privilege: Option<&str>,
        access: Access,
        assertion: Option<SharedAssertion>,
    ) -> Result<()> {
        if let Some(name) = role {
            if !self.roles.contains(name) {
                warn!("rule for unknown role: {}", name);
                return Err(Error::UnknownRole(String::from(name)));
            } // if
        } // if
        if let Some(name) = resource {
            if !self.resources.contains(name) {
                warn!("rule for unknown resource: {}", name);
                return Err(Error::UnknownResource(String::from(name)));
            } // if
        } // if
        self.rules.put(role, resource, privilege, access, assertion);
        Ok(())
    } // set_rule

    /// Freezes the builder. The returned `Authorizer` cannot be changed anymore.
    pub fn build(self) -> Authorizer {
        info!(
            "authorizer ready with {} roles, {} resources and {} rules",
            self.roles.len(), self.resources.len(), self.rules.len()
        );
        Authorizer{roles: self.roles, resources: self.resources, rules: self.rules}
    } // build

} // impl AuthorizerBuilder

/// Registers `(id, parent)` pairs so that each parent precedes its children. Parents may be
/// listed after their children or be registered already.
fn register_tree(registry: &mut Registry, nodes: &[(String, Option<String>)]) -> Result<()> {
    let kind = registry.kind();
    let mut index: HashMap<&str, Option<&str>> = HashMap::with_capacity(nodes.len());

    for (id, parent) in nodes {
        let parent = parent.as_deref();

        if let Some(previous) = index.insert(id.as_str(), parent) {
            if previous != parent {
                warn!("{} {} listed with parents {:?} and {:?}", kind, id, previous, parent);
                return Err(Error::DuplicateNode{kind, id: id.clone()});
            } // if
        } // if
    } // for

    for (id, parent) in nodes {
        if registry.contains(id) {
            registry.add(id, parent.as_deref())?;
            continue;
        } // if

        // walk up until a registered node or a root, remembering the way
        let mut chain: Vec<&str> = vec![];
        let mut current = Some(id.as_str());

        while let Some(name) = current {
            if registry.contains(name) {
                break;
            } // if
            if let Some(start) = chain.iter().position(|n| *n == name) {
                let mut path = chain[start..].iter().map(|n| String::from(*n)).collect::<Vec<_>>();

                path.push(String::from(name));
                warn!("cyclic {} hierarchy at {}", kind, name);
                return Err(Error::Cycle{kind, path});
            } // if
            current = match index.get(name) {
                Some(parent) => *parent,
                None => {
                    // only parents can be missing from the index
                    let child = chain.last().copied().unwrap_or(name);

                    warn!("missing parent {} for {} {}", name, kind, child);
                    return Err(Error::UnknownParent{
                        kind,
                        id:     String::from(child),
                        parent: String::from(name),
                    });
                }, // None
            }; // match
            chain.push(name);
        } // while

        for name in chain.into_iter().rev() {
            registry.add(name, index.get(name).copied().flatten())?;
        } // for
    } // for
    Ok(())
} // register_tree


// Authorizer /////////////////////////////////////////////////////////////////////////////////////


/// Read-only access control list answering "is ROLE allowed PRIVILEGE on RESOURCE?".
///
/// # Precedence
///
/// The role and its ancestors are searched nearest first, followed by the wildcard role. For each
/// of these the resource and its ancestors are searched nearest first, followed by the wildcard
/// resource. For each pair the given privilege is tried before the wildcard privilege. The first
/// rule found decides, unless its assertion does not hold, in which case the search goes on. If no
/// rule decides, access is denied.
///
/// Role specificity therefore outranks resource specificity, which outranks privilege specificity.
#[derive(Debug)]
pub struct Authorizer {
    roles:     Registry,
    resources: Registry,
    rules:     RuleTable,
} // struct Authorizer

impl Authorizer {

    /// Builds an authorizer from a snapshot of the providers' roles and resources.
    pub fn new<R, S>(roles: &R, resources: &S) -> Result<Self>
    where
        R: RoleProvider + ?Sized,
        S: ResourceProvider + ?Sized,
    {
        let mut builder = AuthorizerBuilder::new();

        builder.add_resources(resources.find_all())?;
        builder.add_roles(roles.find_all())?;
        Ok(builder.build())
    } // new

    pub fn builder() -> AuthorizerBuilder {
        AuthorizerBuilder::new()
    } // builder

    /// Returns true if `role` is allowed `privilege` on `resource`.
    #[inline]
    pub fn is_allowed(&self, role: &str, resource: &str, privilege: &str) -> Result<bool> {
        self.is_allowed_with(role, resource, privilege, &Value::Null)
    } // is_allowed

    /// Like [`is_allowed`](Self::is_allowed), handing `context` to assertions.
    pub fn is_allowed_with(&self, role: &str, resource: &str, privilege: &str, context: &Value) -> Result<bool> {
        Ok(self.access_with(role, resource, privilege, context)? == Access::Allow)
    } // is_allowed_with

    /// Returns true if `role` is denied `privilege` on `resource`.
    #[inline]
    pub fn is_denied(&self, role: &str, resource: &str, privilege: &str) -> Result<bool> {
        self.is_denied_with(role, resource, privilege, &Value::Null)
    } // is_denied

    #[inline]
    pub fn is_denied_with(&self, role: &str, resource: &str, privilege: &str, context: &Value) -> Result<bool> {
        Ok(!self.is_allowed_with(role, resource, privilege, context)?)
    } // is_denied_with

    /// Returns the access granted to `role` for `privilege` on `resource`.
    #[inline]
    pub fn access(&self, role: &str, resource: &str, privilege: &str) -> Result<Access> {
        self.access_with(role, resource, privilege, &Value::Null)
    } // access

    pub fn access_with(&self, role: &str, resource: &str, privilege: &str, context: &Value) -> Result<Access> {
        trace!("querying {} on {} to {}", role, resource, privilege);
        let roles = self.roles.lineage(role)?;
        let resources = self.resources.lineage(resource)?;
        let query = AssertionQuery{role, resource, privilege, context};

        match self.query_roles(roles, resources, &query)? {
            Some(access) => Ok(access),
            None => {
                trace!("    no rule matched, denying");
                Ok(Access::Deny)
            }, // None
        } // match
    } // access_with

    fn query_roles(&self, roles: Ancestors<'_>, resources: Ancestors<'_>, query: &AssertionQuery<'_>) -> Result<Option<Access>> {
        for role in roles.map(Some).chain(iter::once(None)) {
            if let Some(access) = self.query_resources(role, resources.clone(), query)? {
                return Ok(Some(access));
            } // if
        } // for
        Ok(None)
    } // query_roles

    fn query_resources(&self, role: Option<&str>, resources: Ancestors<'_>, query: &AssertionQuery<'_>) -> Result<Option<Access>> {
        for resource in resources.map(Some).chain(iter::once(None)) {
            if let Some(access) = self.query_privileges(role, resource, query)? {
                return Ok(Some(access));
            } // if
        } // for
        Ok(None)
    } // query_resources

    fn query_privileges(&self, role: Option<&str>, resource: Option<&str>, query: &AssertionQuery<'_>) -> Result<Option<Access>> {
        for privilege in [Some(query.privilege), None].iter().copied() {
            if let Some(rule) = self.rules.find(role, resource, privilege) {
                trace!("    found {:?} on {:?} to {:?}: {:?}", role, resource, privilege, rule);
                if applies(rule, query)? {
                    return Ok(Some(rule.access()));
                } // if
                trace!("    assertion does not hold, continuing");
            } // if
        } // for
        Ok(None)
    } // query_privileges

    /// Returns true if role is defined.
    #[inline]
    pub fn has_role(&self, id: &str) -> bool {
        self.roles.contains(id)
    } // has_role

    /// Returns true if resource is defined.
    #[inline]
    pub fn has_resource(&self, id: &str) -> bool {
        self.resources.contains(id)
    } // has_resource

    #[inline]
    pub fn role_parent(&self, id: &str) -> Result<Option<&str>> {
        self.roles.parent_of(id)
    } // role_parent

    #[inline]
    pub fn resource_parent(&self, id: &str) -> Result<Option<&str>> {
        self.resources.parent_of(id)
    } // resource_parent

    /// Returns the ancestors of the role, nearest first.
    #[inline]
    pub fn role_ancestors(&self, id: &str) -> Result<Ancestors<'_>> {
        self.roles.ancestors(id)
    } // role_ancestors

    /// Returns the ancestors of the resource, nearest first.
    #[inline]
    pub fn resource_ancestors(&self, id: &str) -> Result<Ancestors<'_>> {
        self.resources.ancestors(id)
    } // resource_ancestors

    #[inline]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    } // rule_count

} // impl Authorizer

fn applies(rule: &Rule, query: &AssertionQuery<'_>) -> Result<bool> {
    match rule.assertion() {
        None            => Ok(true),
        Some(assertion) => assertion.assert(query).map_err(|err| {
            warn!("assertion for {} on {} to {} failed: {}", query.role, query.resource, query.privilege, err);
            Error::Assertion(err)
        }),
    } // match
} // applies


// Tests //////////////////////////////////////////////////////////////////////////////////////////


// mod tests
