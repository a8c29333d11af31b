//! Role and resource sources the authorizer is built from.
//!
//! Applications usually back [`RoleProvider`] and [`ResourceProvider`] with their own storage. The
//! in-memory providers in this module cover configuration driven setups and tests.

use log::{debug, trace, warn};

use crate::error::{Error, NodeKind, Result};
use crate::permission::Permission;


// Entities ///////////////////////////////////////////////////////////////////////////////////////


/// An object access is controlled on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resource {
    pub id:     String,
    pub parent: Option<String>,
} // struct Resource

impl Resource {

    pub fn new(id: &str) -> Self {
        Resource{id: String::from(id), parent: None}
    } // new

    pub fn with_parent(mut self, parent: &str) -> Self {
        self.parent = Some(String::from(parent));
        self
    } // with_parent

} // impl Resource

/// A subject permissions are granted to.
#[derive(Clone, Debug)]
pub struct Role {
    pub id:            String,
    pub parent:        Option<String>,
    pub administrator: bool,
    pub permissions:   Vec<Permission>,
} // struct Role

impl Role {

    pub fn new(id: &str) -> Self {
        Role{id: String::from(id), parent: None, administrator: false, permissions: vec![]}
    } // new

    pub fn with_parent(mut self, parent: &str) -> Self {
        self.parent = Some(String::from(parent));
        self
    } // with_parent

    /// Administrators are allowed every privilege on every resource. Their granted permissions are
    /// ignored.
    pub fn administrator(mut self) -> Self {
        self.administrator = true;
        self
    } // administrator

    pub fn grant(mut self, permission: Permission) -> Self {
        self.permissions.push(permission);
        self
    } // grant

} // impl Role


// Provider traits ////////////////////////////////////////////////////////////////////////////////


pub trait RoleProvider {

    /// Returns a snapshot of all roles.
    fn find_all(&self) -> Vec<Role>;

} // trait RoleProvider

pub trait ResourceProvider {

    /// Returns a snapshot of all resources.
    fn find_all(&self) -> Vec<Resource>;

} // trait ResourceProvider

impl RoleProvider for Vec<Role> {

    fn find_all(&self) -> Vec<Role> {
        self.clone()
    } // find_all

} // impl RoleProvider for Vec<Role>

impl ResourceProvider for Vec<Resource> {

    fn find_all(&self) -> Vec<Resource> {
        self.clone()
    } // find_all

} // impl ResourceProvider for Vec<Resource>


// In-memory providers ////////////////////////////////////////////////////////////////////////////


#[derive(Clone, Debug, Default)]
pub struct RolesProvider {
    roles: Vec<Role>,
} // struct RolesProvider

impl RolesProvider {

    pub fn new() -> Self {
        RolesProvider::default()
    } // new

    /// Adds a role. Returns an error if a role with the same id exists.
    pub fn add_role(&mut self, role: Role) -> Result<()> {
        trace!("providing role {} with parent {:?}", role.id, role.parent);
        if self.roles.iter().any(|r| r.id == role.id) {
            warn!("providing duplicate role: {}", role.id);
            return Err(Error::DuplicateNode{kind: NodeKind::Role, id: role.id});
        } // if
        self.roles.push(role);
        Ok(())
    } // add_role

} // impl RolesProvider

impl RoleProvider for RolesProvider {

    fn find_all(&self) -> Vec<Role> {
        self.roles.clone()
    } // find_all

} // impl RoleProvider for RolesProvider

#[derive(Clone, Debug, Default)]
pub struct ResourcesProvider {
    resources: Vec<Resource>,
} // struct ResourcesProvider

impl ResourcesProvider {

    pub fn new() -> Self {
        ResourcesProvider::default()
    } // new

    /// Adds a resource. Adding an identical resource again is a no-op, a different parent for
    /// a known id is an error.
    pub fn add_resource(&mut self, id: &str, parent: Option<&str>) -> Result<()> {
        trace!("providing resource {} with parent {:?}", id, parent);
        if let Some(existing) = self.resources.iter().find(|r| r.id == id) {
            if existing.parent.as_deref() == parent {
                debug!("resource {} already provided", id);
                return Ok(());
            } // if
            warn!("providing resource {} again with different parent {:?}", id, parent);
            return Err(Error::DuplicateNode{kind: NodeKind::Resource, id: String::from(id)});
        } // if
        self.resources.push(Resource{id: String::from(id), parent: parent.map(String::from)});
        Ok(())
    } // add_resource

    #[inline]
    pub fn has_resource(&self, id: &str) -> bool {
        self.resources.iter().any(|r| r.id == id)
    } // has_resource

} // impl ResourcesProvider

impl ResourceProvider for ResourcesProvider {

    fn find_all(&self) -> Vec<Resource> {
        self.resources.clone()
    } // find_all

} // impl ResourceProvider for ResourcesProvider

/// Catalogue of the permissions an application defines, e.g. to offer them for assignment.
#[derive(Clone, Debug, Default)]
pub struct PermissionsProvider {
    permissions: Vec<Permission>,
} // struct PermissionsProvider

impl PermissionsProvider {

    pub fn new() -> Self {
        PermissionsProvider::default()
    } // new

    /// Adds a permission. A permission for the same resource and privilege replaces the earlier one.
    pub fn add_permission(&mut self, permission: Permission) {
        trace!("providing permission {:?} on {:?}", permission.privilege(), permission.resource());
        match self.position(permission.resource(), permission.privilege()) {
            Some(index) => self.permissions[index] = permission,
            None        => self.permissions.push(permission),
        } // match
    } // add_permission

    pub fn find_all(&self) -> &[Permission] {
        &self.permissions
    } // find_all

    /// Returns the permission for exactly this resource and privilege. `None` is the wildcard.
    pub fn find(&self, resource: Option<&str>, privilege: Option<&str>) -> Option<&Permission> {
        self.position(resource, privilege).map(|index| &self.permissions[index])
    } // find

    fn position(&self, resource: Option<&str>, privilege: Option<&str>) -> Option<usize> {
        self.permissions.iter()
            .position(|p| p.resource() == resource && p.privilege() == privilege)
    } // position

} // impl PermissionsProvider


// Tests //////////////////////////////////////////////////////////////////////////////////////////


// mod tests
