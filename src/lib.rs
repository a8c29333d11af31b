//! Hierarchical role and resource authorization engine.
//!
//! An [`Authorizer`] answers the question "is ROLE allowed PRIVILEGE on RESOURCE?". It is built
//! once from a [`RoleProvider`] and a [`ResourceProvider`] and is read-only afterwards, so a single
//! instance can be shared by every thread of an application.
//!
//! # Introduction
//!
//! In the sense of this crate:
//! * a *resource* is an object to which access is controlled.
//! * a *role* is an object that may request access to a resource.
//! * a *privilege* is an action which may be granted on a resource to a role.
//!
//! ## Resources
//!
//! Resources are organized in a tree structure and must be named uniquely. Queries on a specific
//! resource search the resource's ancestors for rules, so a rule assigned to "news" also applies
//! to "latest" if "latest" is a child of "news". A resource has at most one parent.
//!
//! ## Roles
//!
//! Roles form a tree as well. A role inherits every rule of its parent, its parent's parent and
//! so on. A role flagged as administrator is allowed every privilege on every resource.
//!
//! # Building an Authorizer
//!
//! Roles carry the permissions granted to them. `None` in a [`Permission`] is a wildcard for all
//! resources or all privileges:
//!
//! ```rust
//! use permit_acl::{Authorizer, Permission, Resource, Role};
//!
//! let resources = vec![
//!     Resource::new("newsletter"),
//!     Resource::new("news"),
//!     Resource::new("latest").with_parent("news"),
//!     Resource::new("anouncement").with_parent("news"),
//! ];
//!
//! let roles = vec![
//!     // guest may only view content
//!     Role::new("guest").grant(Permission::new(None, Some("view"))),
//!     // staff inherits view privilege from guest, but also needs additional privileges
//!     Role::new("staff").with_parent("guest")
//!         .grant(Permission::new(None, Some("edit")))
//!         .grant(Permission::new(None, Some("submit"))),
//!     // marketing inherits from staff and publishes the newsletter
//!     Role::new("marketing").with_parent("staff")
//!         .grant(Permission::new(Some("newsletter"), Some("publish"))),
//!     // admin inherits nothing, but is allowed all privileges
//!     Role::new("admin").administrator(),
//! ];
//!
//! let acl = Authorizer::new(&roles, &resources)?;
//!
//! assert!( acl.is_allowed("guest", "latest", "view")?);
//! assert!(!acl.is_allowed("guest", "latest", "edit")?);
//! assert!( acl.is_allowed("marketing", "latest", "edit")?);
//! assert!( acl.is_allowed("marketing", "newsletter", "publish")?);
//! assert!(!acl.is_allowed("staff", "newsletter", "publish")?);
//! assert!( acl.is_allowed("admin", "anouncement", "archive")?);
//! # Ok::<(), permit_acl::Error>(())
//! ```
//!
//! ## Denied by default
//!
//! Until a rule allows it, every privilege upon every resource is denied to every role.
//!
//! # Precise Access Controls
//!
//! Roles and resources from providers only ever produce allow rules. Exceptions are set up with an
//! [`AuthorizerBuilder`], which also accepts deny rules:
//!
//! ```rust
//! use permit_acl::Authorizer;
//!
//! let mut builder = Authorizer::builder();
//!
//! builder.add_resource("news", None)?;
//! builder.add_resource("latest", Some("news"))?;
//! builder.add_role("staff", None)?;
//! builder.add_role("marketing", Some("staff"))?;
//!
//! builder.allow(Some("staff"), None, Some("revise"))?;
//! // staff (and marketing, by inheritance) are denied permission to revise the latest news
//! builder.deny(Some("staff"), Some("latest"), Some("revise"))?;
//!
//! let acl = builder.build();
//!
//! assert!( acl.is_allowed("marketing", "news", "revise")?);
//! assert!(!acl.is_allowed("marketing", "latest", "revise")?);
//! # Ok::<(), permit_acl::Error>(())
//! ```
//!
//! > *Specificity*:
//! > The role and its ancestors are searched first, nearest first, followed by rules for every
//! > role. For each role the resource and its ancestors are searched, followed by rules for every
//! > resource. For each pair the queried privilege comes before the wildcard privilege. The first
//! > rule found decides.
//!
//! A rule for a more specific role therefore wins over a rule for a more specific resource: a deny
//! rule for *every* role on "anouncement" does not restrict an administrator, whose own rule is
//! found first.
//!
//! # Assertions
//!
//! A rule may be guarded by an [`Assertion`]. It is evaluated with the query and a context value
//! when its rule is found. If it does not hold, the rule is skipped and the search goes on:
//!
//! ```rust
//! use permit_acl::{assertion, Authorizer, AssertionQuery, Permission, Resource, Role};
//! use serde_json::json;
//!
//! let owner = assertion::predicate(|q: &AssertionQuery<'_>| q.context["owner"] == q.role);
//! let roles = vec![
//!     Role::new("author").grant(Permission::new(Some("articles"), Some("edit")).with_assertion(owner)),
//! ];
//! let acl = Authorizer::new(&roles, &vec![Resource::new("articles")])?;
//!
//! assert!( acl.is_allowed_with("author", "articles", "edit", &json!({"owner": "author"}))?);
//! assert!(!acl.is_allowed_with("author", "articles", "edit", &json!({"owner": "editor"}))?);
//! # Ok::<(), permit_acl::Error>(())
//! ```
//!
//! # Configured Permissions
//!
//! Permissions are usually written as `"resource:privilege"` strings. [`PermissionParser`] turns
//! such strings, structured pairs or JSON values into [`Permission`]s, and [`PermissionsConfig`]
//! reads a whole catalogue from JSON:
//!
//! ```rust
//! use permit_acl::PermissionParser;
//!
//! let parser = PermissionParser::default();
//! let edit = parser.parse("articles:  edit ")?;
//! let all = parser.parse("articles:")?;
//!
//! assert_eq!((edit.resource(), edit.privilege()), (Some("articles"), Some("edit")));
//! assert_eq!((all.resource(), all.privilege()), (Some("articles"), None));
//! # Ok::<(), permit_acl::Error>(())
//! ```

pub mod assertion;
pub mod authorizer;
pub mod config;
pub mod error;
pub mod permission;
pub mod provider;
pub mod registry;
pub mod rules;

pub use assertion::{Assertion, AssertionError, AssertionQuery, SharedAssertion};
pub use authorizer::{Authorizer, AuthorizerBuilder};
pub use config::PermissionsConfig;
pub use error::{Error, NodeKind, Result};
pub use permission::{Permission, PermissionEntry, PermissionParser, DELIMITER};
pub use provider::{
    PermissionsProvider, Resource, ResourceProvider, ResourcesProvider, Role, RoleProvider,
    RolesProvider,
};
pub use registry::{Ancestors, Registry};
pub use rules::{Access, KeyParts, Rule, RuleKey, RuleTable};
