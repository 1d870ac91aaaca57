//! Verdict conversion traits.

use crate::hook::Verdict;

/// Trait for converting a listener's or callback's return value into a [`Verdict`].
///
/// # Default Implementations
///
/// - `()` → Pass
/// - `bool` → `true` = Pass, `false` = Veto
/// - `Verdict` → As is
/// - `Option<T>` → `None` = Pass, otherwise delegates to `T`
/// - `Result<T, E>` → Delegates to inner `T` or propagates error
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be turned into a `Verdict`",
    label = "missing `IntoVerdict` implementation",
    note = "Return `bool`, `()`, `Verdict`, or an `Option`/`Result` of those."
)]
pub trait IntoVerdict {
    /// Convert the value into a verdict, or the error it carries.
    fn into_verdict(self) -> Result<Verdict, Box<dyn std::error::Error + Send + Sync>>;
}

impl IntoVerdict for () {
    fn into_verdict(self) -> Result<Verdict, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Verdict::Pass)
    }
}

impl IntoVerdict for bool {
    fn into_verdict(self) -> Result<Verdict, Box<dyn std::error::Error + Send + Sync>> {
        Ok(if self { Verdict::Pass } else { Verdict::Veto })
    }
}

impl IntoVerdict for Verdict {
    fn into_verdict(self) -> Result<Verdict, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self)
    }
}

impl<T: IntoVerdict> IntoVerdict for Option<T> {
    fn into_verdict(self) -> Result<Verdict, Box<dyn std::error::Error + Send + Sync>> {
        match self {
            Some(t) => t.into_verdict(),
            None => Ok(Verdict::Pass),
        }
    }
}

impl<T, E> IntoVerdict for Result<T, E>
where
    T: IntoVerdict,
    E: std::error::Error + Send + Sync + 'static,
{
    fn into_verdict(self) -> Result<Verdict, Box<dyn std::error::Error + Send + Sync>> {
        match self {
            Ok(t) => t.into_verdict(),
            Err(e) => Err(Box::new(e)),
        }
    }
}

/// Collapse a conversion into a plain verdict for synchronous call sites.
///
/// Synchronous listeners have no rejection channel, so an error counts as a veto.
pub fn verdict_of<R: IntoVerdict>(value: R) -> Verdict {
    value.into_verdict().unwrap_or(Verdict::Veto)
}
