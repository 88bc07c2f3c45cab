/// Scope function for writing transformations as a single expression chain.
pub trait LetAlso: Sized {
    /// Consumes the value and maps it with `f`.
    fn let_owned<R, F>(self, f: F) -> R
    where
        F: FnOnce(Self) -> R,
    {
        f(self)
    }
}

impl<T> LetAlso for T {}
