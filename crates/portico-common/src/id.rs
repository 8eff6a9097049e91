use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Name of the process message that asks the renderer side to attach a
/// render handler to a browser. Arguments: `(browser id: int, kind: string)`.
pub const SET_RENDER_HANDLER: &str = "SetRenderHandler";

/// Short random id used to tag one controller run in log output.
pub fn new_correlation_id() -> String {
    let uuid = uuid::Uuid::new_v4();
    let bytes = uuid.as_bytes();
    format!(
        "{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3]
    )
}

/// Engine-assigned browser identifier, unique among live browsers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BrowserId(pub i32);

impl BrowserId {
    /// The raw engine id.
    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for BrowserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for BrowserId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

/// Tag naming a render handler implementation.
///
/// Travels across the process boundary as a plain string inside the
/// `SetRenderHandler` message, so it stays a string underneath.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandlerKind(Cow<'static, str>);

impl HandlerKind {
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// The kind name as sent in `SetRenderHandler`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if this kind shadows the reserved protocol message name.
    pub fn is_reserved(&self) -> bool {
        self.as_str() == SET_RENDER_HANDLER
    }
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for HandlerKind {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl From<String> for HandlerKind {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}
