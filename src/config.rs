//! Permission definitions read from configuration.
//!
//! ```json
//! {
//!     "delimiter": ":",
//!     "permissions": {
//!         "articles:edit": {"title": "Edit articles"},
//!         "articles:": null,
//!         "moderate": {"resource": "comments", "privilege": "delete"}
//!     }
//! }
//! ```
//!
//! A key containing the delimiter is a permission in string form and its value is kept as the
//! permission's details. Any other key is only a name; its value must then be a string in string
//! form or an object with `resource` and `privilege`.

use log::{debug, info};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::io::Read;

use crate::error::Result;
use crate::permission::{Permission, PermissionEntry, PermissionParser, DELIMITER};
use crate::provider::{PermissionsProvider, ResourcesProvider};

fn default_delimiter() -> char {
    DELIMITER
} // default_delimiter

#[derive(Clone, Debug, Deserialize)]
pub struct PermissionsConfig {
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// Kept in document order.
    #[serde(default)]
    pub permissions: Map<String, Value>,
} // struct PermissionsConfig

impl Default for PermissionsConfig {

    fn default() -> Self {
        PermissionsConfig{delimiter: DELIMITER, permissions: Map::new()}
    } // default

} // impl Default for PermissionsConfig

impl PermissionsConfig {

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    } // from_json

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    } // from_reader

    #[inline]
    pub fn parser(&self) -> PermissionParser {
        PermissionParser::new(self.delimiter)
    } // parser

    /// Parses all entries in document order. Fails on the first malformed entry, naming its key.
    pub fn permissions(&self) -> Result<Vec<Permission>> {
        let parser = self.parser();

        self.permissions.iter()
            .map(|(key, value)| {
                if !parser.is_delimited(key) {
                    return parser.parse_entry(key, PermissionEntry::Value(value.clone()));
                } // if
                let permission = parser.parse(key)?;

                Ok(match value {
                    Value::Null => permission,
                    details     => permission.with_details(details.clone()),
                }) // Ok
            })
            .collect()
    } // permissions

    /// Adds every configured permission to `permissions` and every resource they name to
    /// `resources`. Resources already provided keep their parent.
    pub fn register(&self, permissions: &mut PermissionsProvider, resources: &mut ResourcesProvider) -> Result<()> {
        let parsed = self.permissions()?;

        info!("registering {} configured permissions", parsed.len());
        for permission in parsed {
            if let Some(resource) = permission.resource() {
                if resources.has_resource(resource) {
                    debug!("resource {} already provided", resource);
                } else {
                    resources.add_resource(resource, None)?;
                } // else
            } // if
            permissions.add_permission(permission);
        } // for
        Ok(())
    } // register

} // impl PermissionsConfig


// Tests //////////////////////////////////////////////////////////////////////////////////////////


#[cfg(test)]
mod tests {

    use super::*;
    use crate::error::Error;
    use crate::provider::{Resource, ResourceProvider};
    use test_env_log::test;

    const CONFIG: &str = r#"{
        "permissions": {
            "articles:  edit ": {"title": "Edit articles"},
            "articles:": null,
            "moderate": {"resource": "comments", "privilege": "delete"},
            "publish": "news:publish"
        }
    }"#;

    fn parts(permission: &Permission) -> (Option<&str>, Option<&str>) {
        (permission.resource(), permission.privilege())
    } // parts

    #[test]
    fn defaults() {
        let config = PermissionsConfig::from_json("{}").unwrap();

        assert_eq!(config.delimiter, ':');
        assert!(config.permissions().unwrap().is_empty());
        assert_eq!(PermissionsConfig::default().delimiter, ':');
    } // defaults

    #[test]
    fn permissions() {
        let config = PermissionsConfig::from_json(CONFIG).unwrap();
        let permissions = config.permissions().unwrap();

        assert_eq!(permissions.iter().map(parts).collect::<Vec<_>>(), vec![
            (Some("articles"), Some("edit")),
            (Some("articles"), None),
            (Some("comments"), Some("delete")),
            (Some("news"), Some("publish")),
        ]);
        assert_eq!(permissions[0].details().unwrap()["title"], "Edit articles");
        assert!(permissions[1].details().is_none());
        assert!(permissions[2].details().is_none());
    } // permissions

    #[test]
    fn custom_delimiter() {
        let config = PermissionsConfig::from_reader(r#"{"delimiter": "/", "permissions": {"articles/edit": true}}"#.as_bytes()).unwrap();
        let permissions = config.permissions().unwrap();

        assert_eq!(parts(&permissions[0]), (Some("articles"), Some("edit")));
        assert_eq!(permissions[0].details(), Some(&Value::Bool(true)));
    } // custom_delimiter

    #[test]
    fn malformed_entries() {
        let config = PermissionsConfig::from_json(r#"{"permissions": {"broken": {"resource": "articles"}}}"#).unwrap();

        match config.permissions() {
            Err(Error::MissingField{entry, field}) => {
                assert_eq!(entry, "broken");
                assert_eq!(field, "privilege");
            },
            other => panic!("unexpected result: {:?}", other),
        } // match

        let config = PermissionsConfig::from_json(r#"{"permissions": {"answer": 42}}"#).unwrap();

        match config.permissions() {
            Err(Error::InvalidPermissionFormat{entry, found, ..}) => {
                assert_eq!(entry, "answer");
                assert_eq!(found, "number");
            },
            other => panic!("unexpected result: {:?}", other),
        } // match
    } // malformed_entries

    #[test]
    fn blank_resource() {
        let config = PermissionsConfig::from_json(r#"{"permissions": {" :edit": null}}"#).unwrap();

        match config.permissions() {
            Err(Error::InvalidPermissionFormat{entry, found, ..}) => {
                assert_eq!(entry, " :edit");
                assert_eq!(found, "string without resource");
            },
            other => panic!("unexpected result: {:?}", other),
        } // match

        let config = PermissionsConfig::from_json(r#"{"permissions": {"x": {"resource": "", "privilege": "delete"}}}"#).unwrap();
        let mut permissions = PermissionsProvider::new();
        let mut resources = ResourcesProvider::new();

        match config.register(&mut permissions, &mut resources) {
            Err(Error::MissingField{entry, field}) => {
                assert_eq!(entry, "x");
                assert_eq!(field, "resource");
            },
            other => panic!("unexpected result: {:?}", other),
        } // match
        assert!(permissions.find_all().is_empty());
        assert!(resources.find_all().is_empty());
    } // blank_resource

    #[test]
    fn invalid_document() {
        assert!(matches!(PermissionsConfig::from_json("{"), Err(Error::Config(_))));
        assert!(matches!(PermissionsConfig::from_json(r#"{"delimiter": "::"}"#), Err(Error::Config(_))));
    } // invalid_document

    #[test]
    fn register() {
        let config = PermissionsConfig::from_json(CONFIG).unwrap();
        let mut permissions = PermissionsProvider::new();
        let mut resources = ResourcesProvider::new();

        assert!(resources.add_resource("content", None).is_ok());
        assert!(resources.add_resource("news", Some("content")).is_ok());
        assert!(config.register(&mut permissions, &mut resources).is_ok());

        assert_eq!(permissions.find_all().len(), 4);
        assert!(permissions.find(Some("articles"), None).is_some());
        assert_eq!(resources.find_all(), vec![
            Resource::new("content"),
            Resource::new("news").with_parent("content"),
            Resource::new("articles"),
            Resource::new("comments"),
        ]);
    } // register

} // mod tests
