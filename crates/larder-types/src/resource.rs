use std::fmt::Display;

/// State of a single-shot fetch as the UI sees it. Screens start in
/// `Loading` and settle into `Success` or `Error`; the error carries a
/// display message, not a typed cause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource<T> {
    Loading,
    Success(T),
    Error(String),
}

impl<T> Resource<T> {
    pub fn from_result<E: Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Resource::Success(value),
            Err(e) => Resource::Error(e.to_string()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Resource::Loading)
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Resource::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resource<U> {
        match self {
            Resource::Loading => Resource::Loading,
            Resource::Success(value) => Resource::Success(f(value)),
            Resource::Error(message) => Resource::Error(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_result_keeps_the_message() {
        let ok: Result<i32, String> = Ok(7);
        assert_eq!(Resource::from_result(ok), Resource::Success(7));

        let err: Result<i32, String> = Err("no route to host".into());
        assert_eq!(
            Resource::from_result(err),
            Resource::Error("no route to host".into())
        );
    }

    #[test]
    fn map_passes_errors_through() {
        let res: Resource<i32> = Resource::Error("boom".into());
        assert_eq!(res.map(|n| n * 2), Resource::Error("boom".into()));
        assert_eq!(Resource::Success(2).map(|n| n * 2), Resource::Success(4));
    }
}
