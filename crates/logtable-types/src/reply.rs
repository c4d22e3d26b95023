use serde::{Deserialize, Serialize};

/// Structured `{data, msg}` result returned by every public entrypoint.
///
/// `ok` distinguishes a failed call from a successful call that produced
/// empty data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply<T> {
    pub data: T,
    pub msg: String,
    pub ok: bool,
}

impl<T> Reply<T> {
    pub fn ok(data: T, msg: impl Into<String>) -> Self {
        Self {
            data,
            msg: msg.into(),
            ok: true,
        }
    }

    pub fn failed(data: T, msg: impl Into<String>) -> Self {
        Self {
            data,
            msg: msg.into(),
            ok: false,
        }
    }
}

impl<T: Default> Reply<T> {
    /// Failure with empty data.
    pub fn error(msg: impl Into<String>) -> Self {
        Self::failed(T::default(), msg)
    }
}
