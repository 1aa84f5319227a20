/// Errors raised by interval construction, interval arithmetic and mutating
/// cursors.
///
/// Lookups never fail: an absent value is reported as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The bounds describe an empty interval under its own inclusivity flags,
    /// e.g. `[10, 10)` or `[10, 9)`.
    #[error("interval lower bound must precede its upper bound")]
    InvalidInterval,

    /// Interval subtraction found an overlap shape it does not know how to
    /// split. This is a logic error in the caller of the check, never a user
    /// error.
    #[error("interval subtraction hit an unknown overlap topology")]
    UnknownTopology,

    /// A cursor removal was requested before any element was yielded, or the
    /// element it points at was already removed.
    #[error("cursor has no current element to remove")]
    NoCurrentElement,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
