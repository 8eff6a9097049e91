//! Process messages exchanged between the UI side and the renderer side.
//!
//! The engine carries a message as a name plus a positional argument list.
//! Only one message name is interpreted by the host itself:
//! [`SET_RENDER_HANDLER`], sent once per browser right after creation.
//! Everything else is offered to the browser's render handler.

use portico_common::{BindError, BrowserId, HandlerKind, SET_RENDER_HANDLER};
use serde::{Deserialize, Serialize};

/// Which side of the engine a message came from (or is going to).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessId {
    Browser,
    Renderer,
}

/// One positional argument of a process message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageValue {
    Bool(bool),
    Int(i32),
    Double(f64),
    String(String),
}

impl MessageValue {
    fn type_name(&self) -> &'static str {
        match self {
            MessageValue::Bool(_) => "bool",
            MessageValue::Int(_) => "int",
            MessageValue::Double(_) => "double",
            MessageValue::String(_) => "string",
        }
    }
}

/// A named message with positional arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessMessage {
    name: String,
    args: Vec<MessageValue>,
}

impl ProcessMessage {
    /// Create a message with no arguments.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Append an argument.
    pub fn with_arg(mut self, value: MessageValue) -> Self {
        self.args.push(value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[MessageValue] {
        &self.args
    }

    /// `None` when the argument is missing or not an int.
    pub fn get_int(&self, index: usize) -> Option<i32> {
        match self.args.get(index)? {
            MessageValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// `None` when the argument is missing or not a string.
    pub fn get_string(&self, index: usize) -> Option<&str> {
        match self.args.get(index)? {
            MessageValue::String(v) => Some(v),
            _ => None,
        }
    }
}

/// Decoded form of the reserved `SetRenderHandler` message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetRenderHandler {
    pub browser: BrowserId,
    pub kind: HandlerKind,
}

impl SetRenderHandler {
    pub fn new(browser: BrowserId, kind: HandlerKind) -> Self {
        Self { browser, kind }
    }

    /// Encode as `SetRenderHandler(int browser id, string kind)`.
    pub fn to_message(&self) -> ProcessMessage {
        ProcessMessage::new(SET_RENDER_HANDLER)
            .with_arg(MessageValue::Int(self.browser.get()))
            .with_arg(MessageValue::String(self.kind.as_str().to_owned()))
    }

    /// Decode a message already known to carry the reserved name.
    pub fn decode(message: &ProcessMessage) -> Result<Self, BindError> {
        let malformed = |reason: String| BindError::MalformedMessage {
            name: message.name().to_owned(),
            reason,
        };

        if message.name() != SET_RENDER_HANDLER {
            return Err(malformed(format!("unexpected name '{}'", message.name())));
        }
        if message.args().len() != 2 {
            return Err(malformed(format!(
                "expected 2 arguments, got {}",
                message.args().len()
            )));
        }

        let browser = message.get_int(0).ok_or_else(|| {
            malformed(format!(
                "argument 0 must be int, got {}",
                message.args()[0].type_name()
            ))
        })?;
        let kind = message.get_string(1).ok_or_else(|| {
            malformed(format!(
                "argument 1 must be string, got {}",
                message.args()[1].type_name()
            ))
        })?;

        Ok(Self {
            browser: BrowserId(browser),
            kind: HandlerKind::new(kind),
        })
    }
}
