//! Outcome conversion for listener callbacks.

use crate::error::BoxError;

/// Trait for converting a listener callback's return value into an outcome.
///
/// # Default Implementations
///
/// - `()` → success
/// - `Result<(), E>` → success, or the error boxed as a listener failure
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be returned from a listener",
    label = "missing `IntoOutcome` implementation",
    note = "Listener callbacks must return `()` or `Result<(), E>` where `E: Into<BoxError>`."
)]
pub trait IntoOutcome {
    /// Convert the return value into a listener outcome.
    fn into_outcome(self) -> Result<(), BoxError>;
}

impl IntoOutcome for () {
    fn into_outcome(self) -> Result<(), BoxError> {
        Ok(())
    }
}

impl<E> IntoOutcome for Result<(), E>
where
    E: Into<BoxError>,
{
    fn into_outcome(self) -> Result<(), BoxError> {
        self.map_err(Into::into)
    }
}
