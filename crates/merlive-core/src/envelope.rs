//! `{EC, EM, DT}` response envelope
//!
//! Every Merlive endpoint answers with the same wrapper: an error code,
//! a human readable message and a data payload. Only `EC == 0` with a
//! non-null `DT` counts as data.

use crate::error::ProjectionError;
use serde_json::Value;

/// Code used when the envelope has no integer `EC`
pub const MISSING_CODE: i64 = -1;

/// Message used when the envelope has no `EM`
pub const UNKNOWN_MESSAGE: &str = "Unknown error";

/// Borrowed view over an envelope's header fields
#[derive(Debug, Clone, Copy)]
pub struct Envelope<'a> {
    /// `EC`, if present and integral
    pub code: Option<i64>,
    /// `EM`, if present and a string
    pub message: Option<&'a str>,
    /// `DT`, if present and not null
    pub data: Option<&'a Value>,
}

impl<'a> Envelope<'a> {
    /// Read the envelope fields out of a raw payload
    #[must_use]
    pub fn read(payload: &'a Value) -> Self {
        Self {
            code: payload.get("EC").and_then(Value::as_i64),
            message: payload.get("EM").and_then(Value::as_str),
            data: payload.get("DT").filter(|dt| !dt.is_null()),
        }
    }

    /// `true` when the server reported success
    #[inline]
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == Some(0)
    }

    /// Message to show for a failed envelope
    #[inline]
    #[must_use]
    pub fn message_or_default(&self) -> &'a str {
        self.message.unwrap_or(UNKNOWN_MESSAGE)
    }

    /// Return `DT` when `EC == 0`, otherwise `NoData`
    pub fn into_data(self) -> Result<&'a Value, ProjectionError> {
        match (self.is_ok(), self.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(ProjectionError::no_data(
                self.code.unwrap_or(MISSING_CODE),
                self.message_or_default(),
            )),
        }
    }
}

/// Shortcut for `Envelope::read(payload).into_data()`
pub fn open_envelope(payload: &Value) -> Result<&Value, ProjectionError> {
    Envelope::read(payload).into_data()
}
