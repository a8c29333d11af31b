//! Permission descriptors and the parser turning configuration entries into them.
//!
//! A permission names a resource and a privilege on it, either of which may be the wildcard
//! (`None`). Entries are accepted in three shapes:
//!
//! * a delimited string, `"articles:edit"`. The text is split on the first delimiter and both
//!   halves are trimmed. An empty privilege is the wildcard, so `"articles:"` grants every
//!   privilege on `articles`. An empty resource is an error.
//! * a structured pair with `resource` and `privilege` fields. Both must be present and the
//!   resource must not be blank.
//! * a ready-made [`Permission`], taken as is.

use log::{trace, warn};
use serde_json::Value;
use std::fmt;

use crate::assertion::{Described, SharedAssertion};
use crate::error::{Error, Result};

/// Separator between resource and privilege in the string form.
pub const DELIMITER: char = ':';


// Permission /////////////////////////////////////////////////////////////////////////////////////


/// A privilege on a resource, optionally guarded by an assertion.
#[derive(Clone, Default)]
pub struct Permission {
    resource:  Option<String>,
    privilege: Option<String>,
    assertion: Option<SharedAssertion>,
    details:   Option<Value>,
} // struct Permission

impl Permission {

    /// `None` for either part means all resources or all privileges.
    pub fn new(resource: Option<&str>, privilege: Option<&str>) -> Self {
        Permission{
            resource:  resource.map(String::from),
            privilege: privilege.map(String::from),
            assertion: None,
            details:   None,
        } // Permission
    } // new

    pub fn with_assertion(mut self, assertion: SharedAssertion) -> Self {
        self.assertion = Some(assertion);
        self
    } // with_assertion

    /// Attaches descriptive metadata, e.g. a title. The engine never reads it.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    } // with_details

    #[inline]
    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    } // resource

    #[inline]
    pub fn privilege(&self) -> Option<&str> {
        self.privilege.as_deref()
    } // privilege

    #[inline]
    pub fn assertion(&self) -> Option<&SharedAssertion> {
        self.assertion.as_ref()
    } // assertion

    #[inline]
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    } // details

} // impl Permission

impl fmt::Debug for Permission {

    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Permission")
            .field("resource", &self.resource)
            .field("privilege", &self.privilege)
            .field("assertion", &Described(&self.assertion))
            .field("details", &self.details)
            .finish()
    } // fmt

} // impl fmt::Debug for Permission


// PermissionEntry ////////////////////////////////////////////////////////////////////////////////


/// An unparsed permission as it appears in configuration.
#[derive(Clone, Debug)]
pub enum PermissionEntry {
    /// `"resource:privilege"`
    Delimited(String),
    /// Explicit fields. Both are required, `None` marks a missing field.
    Structured { resource: Option<String>, privilege: Option<String> },
    Descriptor(Permission),
    /// A JSON value: strings are delimited entries, objects are structured entries.
    Value(Value),
} // enum PermissionEntry

impl From<&str> for PermissionEntry {

    fn from(text: &str) -> Self {
        PermissionEntry::Delimited(String::from(text))
    } // from

} // impl From<&str> for PermissionEntry

impl From<Permission> for PermissionEntry {

    fn from(permission: Permission) -> Self {
        PermissionEntry::Descriptor(permission)
    } // from

} // impl From<Permission> for PermissionEntry

impl From<Value> for PermissionEntry {

    fn from(value: Value) -> Self {
        PermissionEntry::Value(value)
    } // from

} // impl From<Value> for PermissionEntry


// PermissionParser ///////////////////////////////////////////////////////////////////////////////


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PermissionParser {
    delimiter: char,
} // struct PermissionParser

impl Default for PermissionParser {

    fn default() -> Self {
        PermissionParser{delimiter: DELIMITER}
    } // default

} // impl Default for PermissionParser

impl PermissionParser {

    pub fn new(delimiter: char) -> Self {
        PermissionParser{delimiter}
    } // new

    #[inline]
    pub fn delimiter(&self) -> char {
        self.delimiter
    } // delimiter

    /// Returns true if `text` is in the delimited string form.
    #[inline]
    pub fn is_delimited(&self, text: &str) -> bool {
        text.contains(self.delimiter)
    } // is_delimited

    /// Parses the string form `"resource:privilege"`.
    pub fn parse(&self, text: &str) -> Result<Permission> {
        self.parse_delimited(text, text)
    } // parse

    /// Parses any entry shape. `key` names the entry in errors.
    pub fn parse_entry(&self, key: &str, entry: PermissionEntry) -> Result<Permission> {
        trace!("parsing permission {}: {:?}", key, entry);
        match entry {
            PermissionEntry::Delimited(text) =>
                self.parse_delimited(key, &text),
            PermissionEntry::Structured{resource, privilege} =>
                self.parse_structured(key, resource.as_deref(), privilege.as_deref()),
            PermissionEntry::Descriptor(permission) =>
                Ok(permission),
            PermissionEntry::Value(value) =>
                self.parse_value(key, &value),
        } // match
    } // parse_entry

    fn parse_delimited(&self, key: &str, text: &str) -> Result<Permission> {
        match text.split_once(self.delimiter) {
            Some((resource, privilege)) => match resource.trim() {
                ""       => Err(self.invalid(key, "string without resource")),
                resource => Ok(Permission::new(Some(resource), wildcard(privilege))),
            }, // Some
            None => Err(self.invalid(key, "string without delimiter")),
        } // match
    } // parse_delimited

    fn parse_structured(&self, key: &str, resource: Option<&str>, privilege: Option<&str>) -> Result<Permission> {
        let resource = resource
            .map(str::trim)
            .filter(|resource| !resource.is_empty())
            .ok_or_else(|| missing(key, "resource"))?;
        let privilege = privilege.ok_or_else(|| missing(key, "privilege"))?;

        Ok(Permission::new(Some(resource), wildcard(privilege)))
    } // parse_structured

    fn parse_value(&self, key: &str, value: &Value) -> Result<Permission> {
        match value {
            Value::String(text) => self.parse_delimited(key, text),
            Value::Object(fields) => {
                let resource = self.field(key, fields.get("resource"))?;
                let privilege = self.field(key, fields.get("privilege"))?;

                self.parse_structured(key, resource, privilege)
            }, // Value::Object
            other => Err(self.invalid(key, json_type(other))),
        } // match
    } // parse_value

    /// A field must be a string. Absent and `null` fields count as missing.
    fn field<'v>(&self, key: &str, value: Option<&'v Value>) -> Result<Option<&'v str>> {
        match value {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) => Ok(Some(text.as_str())),
            Some(other) => Err(self.invalid(key, json_type(other))),
        } // match
    } // field

    fn invalid(&self, key: &str, found: &'static str) -> Error {
        warn!("invalid permission format for {}: {} given", key, found);
        Error::InvalidPermissionFormat{entry: String::from(key), delimiter: self.delimiter, found}
    } // invalid

} // impl PermissionParser

fn missing(key: &str, field: &'static str) -> Error {
    warn!("permission {} is missing {}", key, field);
    Error::MissingField{entry: String::from(key), field}
} // missing

/// Trims a privilege; an empty result is the wildcard.
fn wildcard(part: &str) -> Option<&str> {
    match part.trim() {
        ""      => None,
        trimmed => Some(trimmed),
    } // match
} // wildcard

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null      => "null",
        Value::Bool(_)   => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_)  => "array",
        Value::Object(_) => "object",
    } // match
} // json_type


// Tests //////////////////////////////////////////////////////////////////////////////////////////


#[cfg(test)]
mod tests {

    use super::*;
    use crate::assertion::{predicate, AssertionQuery};
    use serde_json::json;
    use test_env_log::test;

    fn parts(permission: &Permission) -> (Option<&str>, Option<&str>) {
        (permission.resource(), permission.privilege())
    } // parts

    #[test]
    fn delimited() {
        let parser = PermissionParser::default();

        assert_eq!(parts(&parser.parse("articles:edit").unwrap()), (Some("articles"), Some("edit")));
        assert_eq!(parts(&parser.parse("articles:  edit ").unwrap()), (Some("articles"), Some("edit")));
        assert_eq!(parts(&parser.parse(" articles :").unwrap()), (Some("articles"), None));

        // a blank resource never widens to all resources
        for text in &[":edit", " :edit", "  :  "] {
            match parser.parse(text) {
                Err(Error::InvalidPermissionFormat{entry, found, ..}) => {
                    assert_eq!(entry, *text);
                    assert_eq!(found, "string without resource");
                },
                other => panic!("unexpected result: {:?}", other),
            } // match
        } // for

        let parsed = parser.parse_entry("articles:edit", "articles:edit".into()).unwrap();
        assert_eq!(parts(&parsed), (Some("articles"), Some("edit")));

        // only the first delimiter splits
        assert_eq!(parts(&parser.parse("articles:edit:own").unwrap()), (Some("articles"), Some("edit:own")));
    } // delimited

    #[test]
    fn delimiter() {
        let parser = PermissionParser::new('.');

        assert_eq!(parser.delimiter(), '.');
        assert!(parser.is_delimited("articles.edit"));
        assert!(!parser.is_delimited("articles:edit"));
        assert_eq!(parts(&parser.parse("articles.edit").unwrap()), (Some("articles"), Some("edit")));
    } // delimiter

    #[test]
    fn missing_delimiter() {
        let parser = PermissionParser::default();

        match parser.parse("articles") {
            Err(Error::InvalidPermissionFormat{entry, delimiter, found}) => {
                assert_eq!(entry, "articles");
                assert_eq!(delimiter, ':');
                assert_eq!(found, "string without delimiter");
            },
            other => panic!("unexpected result: {:?}", other),
        } // match
    } // missing_delimiter

    #[test]
    fn structured() {
        let parser = PermissionParser::default();
        let entry = PermissionEntry::Structured{
            resource:  Some(String::from(" comments ")),
            privilege: Some(String::from("")),
        };

        assert_eq!(parts(&parser.parse_entry("comments", entry).unwrap()), (Some("comments"), None));

        let entry = PermissionEntry::Structured{resource: Some(String::from("comments")), privilege: None};

        match parser.parse_entry("comments", entry) {
            Err(Error::MissingField{entry, field}) => {
                assert_eq!(entry, "comments");
                assert_eq!(field, "privilege");
            },
            other => panic!("unexpected result: {:?}", other),
        } // match

        for resource in &["", "   "] {
            let entry = PermissionEntry::Structured{
                resource:  Some(String::from(*resource)),
                privilege: Some(String::from("delete")),
            };

            match parser.parse_entry("blank", entry) {
                Err(Error::MissingField{entry, field}) => {
                    assert_eq!(entry, "blank");
                    assert_eq!(field, "resource");
                },
                other => panic!("unexpected result: {:?}", other),
            } // match
        } // for
    } // structured

    #[test]
    fn descriptor() {
        let parser = PermissionParser::default();
        let permission = Permission::new(Some("articles"), None)
            .with_assertion(predicate(|q: &AssertionQuery<'_>| q.role == "author"));

        let parsed = parser.parse_entry("own articles", permission.into()).unwrap();

        assert_eq!(parts(&parsed), (Some("articles"), None));
        assert!(parsed.assertion().is_some());
    } // descriptor

    #[test]
    fn json_values() {
        let parser = PermissionParser::default();

        let parsed = parser.parse_entry("a", json!("articles:  edit ").into()).unwrap();
        assert_eq!(parts(&parsed), (Some("articles"), Some("edit")));

        let parsed = parser.parse_entry("b", json!({"resource": "articles", "privilege": "delete"}).into()).unwrap();
        assert_eq!(parts(&parsed), (Some("articles"), Some("delete")));

        match parser.parse_entry("c", json!({"resource": "articles"}).into()) {
            Err(Error::MissingField{field, ..}) => assert_eq!(field, "privilege"),
            other => panic!("unexpected result: {:?}", other),
        } // match

        match parser.parse_entry("d", json!({"resource": null, "privilege": "edit"}).into()) {
            Err(Error::MissingField{field, ..}) => assert_eq!(field, "resource"),
            other => panic!("unexpected result: {:?}", other),
        } // match

        match parser.parse_entry("x", json!({"resource": "", "privilege": "delete"}).into()) {
            Err(Error::MissingField{field, ..}) => assert_eq!(field, "resource"),
            other => panic!("unexpected result: {:?}", other),
        } // match

        for (value, name) in vec![(json!(42), "number"), (json!(true), "boolean"), (json!(["a", "b"]), "array"), (Value::Null, "null")] {
            match parser.parse_entry("e", value.into()) {
                Err(Error::InvalidPermissionFormat{entry, found, ..}) => {
                    assert_eq!(entry, "e");
                    assert_eq!(found, name);
                },
                other => panic!("unexpected result: {:?}", other),
            } // match
        } // for

        match parser.parse_entry("f", json!({"resource": 7, "privilege": "edit"}).into()) {
            Err(Error::InvalidPermissionFormat{found, ..}) => assert_eq!(found, "number"),
            other => panic!("unexpected result: {:?}", other),
        } // match
    } // json_values

    #[test]
    fn error_message() {
        let err = PermissionParser::default().parse_entry("x", json!(1).into()).unwrap_err();

        assert_eq!(
            err.to_string(),
            "permission `x` must be a string with delimiter `:`, an object with resource & privilege or a permission descriptor, number given"
        );
    } // error_message

} // mod tests
