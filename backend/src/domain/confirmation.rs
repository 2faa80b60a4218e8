//! Explicit confirmation for destructive actions.

use serde_json::json;

use crate::domain::Error;

/// Proof that the caller confirmed a destructive action.
///
/// Destructive service methods take this by value, so they cannot run
/// unless [`Confirmed::check`] succeeded first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmed(());

impl Confirmed {
    /// Accept only an explicit `true`.
    ///
    /// # Examples
    /// ```
    /// use moderaflow::domain::Confirmed;
    ///
    /// assert!(Confirmed::check(Some(true)).is_ok());
    /// assert!(Confirmed::check(None).is_err());
    /// ```
    pub fn check(confirm: Option<bool>) -> Result<Self, Error> {
        match confirm {
            Some(true) => Ok(Self(())),
            _ => Err(Error::invalid_request(
                "this action is destructive; repeat it with confirm=true",
            )
            .with_details(json!({ "code": "confirmation_required" }))),
        }
    }
}
