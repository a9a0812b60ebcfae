/// Result of a read that never fails outright.
///
/// `Placeholder` marks fallback content substituted because the backend was
/// unreachable or the client runs offline.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Live(T),
    Placeholder(T),
}

impl<T> Fetched<T> {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Fetched::Placeholder(_))
    }

    pub fn value(&self) -> &T {
        match self {
            Fetched::Live(v) | Fetched::Placeholder(v) => v,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Fetched::Live(v) | Fetched::Placeholder(v) => v,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        match self {
            Fetched::Live(v) => Fetched::Live(f(v)),
            Fetched::Placeholder(v) => Fetched::Placeholder(f(v)),
        }
    }
}
