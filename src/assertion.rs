//! Dynamic assertions guarding rules.
//!
//! An assertion is consulted only when the rule carrying it matches a query. Returning `Ok(false)`
//! makes the rule behave as if it did not exist, so the search continues with less specific rules.
//! Returning an error aborts the query and surfaces as [`Error::Assertion`](crate::Error::Assertion).

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Failure raised by an assertion which cannot decide.
pub type AssertionError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The query an assertion is evaluated for. Role and resource are the identifiers passed to
/// `is_allowed`, not the ancestor whose rule matched.
#[derive(Clone, Copy, Debug)]
pub struct AssertionQuery<'a> {
    pub role:      &'a str,
    pub resource:  &'a str,
    pub privilege: &'a str,
    pub context:   &'a Value,
} // struct AssertionQuery

/// Runtime predicate deciding whether a matching rule applies.
pub trait Assertion: Send + Sync {

    fn assert(&self, query: &AssertionQuery<'_>) -> Result<bool, AssertionError>;

} // trait Assertion

impl<F> Assertion for F
where
    F: Fn(&AssertionQuery<'_>) -> Result<bool, AssertionError> + Send + Sync,
{

    #[inline]
    fn assert(&self, query: &AssertionQuery<'_>) -> Result<bool, AssertionError> {
        self(query)
    } // assert

} // impl Assertion for F

/// Shared handle to an assertion, cloned into every rule built from the same permission.
pub type SharedAssertion = Arc<dyn Assertion>;

/// Wraps a fallible closure as a shared assertion.
pub fn from_fn<F>(f: F) -> SharedAssertion
where
    F: Fn(&AssertionQuery<'_>) -> Result<bool, AssertionError> + Send + Sync + 'static,
{
    Arc::new(f)
} // from_fn

/// Wraps an infallible closure as a shared assertion.
pub fn predicate<F>(f: F) -> SharedAssertion
where
    F: Fn(&AssertionQuery<'_>) -> bool + Send + Sync + 'static,
{
    from_fn(move |query: &AssertionQuery<'_>| Ok(f(query)))
} // predicate

/// Formats an optional assertion without exposing the closure.
pub(crate) struct Described<'a>(pub &'a Option<SharedAssertion>);

impl fmt::Debug for Described<'_> {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            Some(_) => f.write_str("Some(<assertion>)"),
            None    => f.write_str("None"),
        } // match
    } // fmt

} // impl fmt::Debug for Described


// Tests //////////////////////////////////////////////////////////////////////////////////////////


#[cfg(test)]
mod tests {

    use super::*;
    use serde_json::json;
    use test_env_log::test;

    fn query<'a>(context: &'a Value) -> AssertionQuery<'a> {
        AssertionQuery{role: "author", resource: "articles", privilege: "edit", context}
    } // query

    #[test]
    fn predicate_sees_query() {
        let owner = predicate(|q: &AssertionQuery<'_>| q.context["owner"] == q.role);

        assert!(owner.assert(&query(&json!({"owner": "author"}))).unwrap());
        assert!(!owner.assert(&query(&json!({"owner": "someone"}))).unwrap());
        assert!(!owner.assert(&query(&Value::Null)).unwrap());
    } // predicate_sees_query

    #[test]
    fn from_fn_propagates_failure() {
        let broken = from_fn(|_: &AssertionQuery<'_>| Err("backend unavailable".into()));
        let res    = broken.assert(&query(&Value::Null));

        assert_eq!(res.unwrap_err().to_string(), "backend unavailable");
    } // from_fn_propagates_failure

    #[test]
    fn described() {
        assert_eq!(format!("{:?}", Described(&None)), "None");
        assert_eq!(format!("{:?}", Described(&Some(predicate(|_: &AssertionQuery<'_>| true)))), "Some(<assertion>)");
    } // described

} // mod tests
