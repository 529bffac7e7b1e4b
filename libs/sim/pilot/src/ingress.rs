// This file is part of QuadSim.
//
// QuadSim is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// QuadSim is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with QuadSim.  If not, see <http://www.gnu.org/licenses/>.
//! Decoding of inbound pilot messages.
//!
//! Messages are JSON objects. `{"event": "control", "thrust": .., "roll": ..,
//! "pitch": .., "yaw": ..}` carries a command and `{"event": "reset_sim"}`
//! clears it. An object without an `event` that carries command fields is
//! read as a control message.
//!
//! Field values are coerced rather than validated: numbers pass through,
//! numeric strings are parsed, booleans become 0 or 1, and everything else
//! becomes 0.
use crate::PilotCommand;
use json::JsonValue;
use log::debug;
use thiserror::Error;

const COMMAND_FIELDS: [&str; 4] = ["thrust", "roll", "pitch", "yaw"];

#[derive(Debug, Error)]
pub enum IngressError {
    #[error("malformed message: {0}")]
    Malformed(#[from] json::Error),
    #[error("expected a JSON object, got: {0}")]
    NotAnObject(String),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum IngressMessage {
    Control(PilotCommand),
    Reset,
}

impl IngressMessage {
    /// Parse one message. `Ok(None)` means well formed but not addressed
    /// to us.
    pub fn parse(text: &str) -> Result<Option<Self>, IngressError> {
        let value = json::parse(text)?;
        Self::from_json(&value)
    }

    pub fn from_json(value: &JsonValue) -> Result<Option<Self>, IngressError> {
        if !value.is_object() {
            return Err(IngressError::NotAnObject(value.dump()));
        }
        let event = &value["event"];
        if event.is_null() {
            if COMMAND_FIELDS.iter().any(|field| value.has_key(field)) {
                return Ok(Some(Self::Control(command_from_json(value))));
            }
            return Ok(None);
        }
        Ok(match event.as_str() {
            Some("control") => Some(Self::Control(command_from_json(value))),
            Some("reset_sim") => Some(Self::Reset),
            other => {
                debug!("ignoring event {:?}", other);
                None
            }
        })
    }
}

pub(crate) fn command_from_json(value: &JsonValue) -> PilotCommand {
    PilotCommand {
        throttle: coerce(&value["thrust"]),
        roll: coerce(&value["roll"]),
        pitch: coerce(&value["pitch"]),
        yaw_rate: coerce(&value["yaw"]),
    }
}

fn coerce(value: &JsonValue) -> f64 {
    let v = if let Some(b) = value.as_bool() {
        if b {
            1.
        } else {
            0.
        }
    } else if let Some(n) = value.as_f64() {
        n
    } else if let Some(s) = value.as_str() {
        s.trim().parse::<f64>().unwrap_or(0.)
    } else {
        0.
    };
    if v.is_finite() {
        v
    } else {
        0.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use approx::assert_relative_eq;

    fn control(text: &str) -> Result<PilotCommand> {
        match IngressMessage::parse(text)? {
            Some(IngressMessage::Control(cmd)) => Ok(cmd),
            other => anyhow::bail!("expected control, got {:?}", other),
        }
    }

    #[test]
    fn test_control_message() -> Result<()> {
        let cmd = control(r#"{"event":"control","thrust":0.5,"roll":0.1,"pitch":-0.2,"yaw":1.5}"#)?;
        assert_relative_eq!(cmd.throttle, 0.5);
        assert_relative_eq!(cmd.roll, 0.1);
        assert_relative_eq!(cmd.pitch, -0.2);
        assert_relative_eq!(cmd.yaw_rate, 1.5);
        Ok(())
    }

    #[test]
    fn test_coercion() -> Result<()> {
        let cmd =
            control(r#"{"event":"control","thrust":"0.75","roll":true,"pitch":null,"yaw":"abc"}"#)?;
        assert_relative_eq!(cmd.throttle, 0.75);
        assert_relative_eq!(cmd.roll, 1.);
        assert_eq!(cmd.pitch, 0.);
        assert_eq!(cmd.yaw_rate, 0.);

        let cmd = control(r#"{"event":"control","thrust":false,"roll":[1],"pitch":{"a":1}}"#)?;
        assert!(cmd.is_neutral());
        Ok(())
    }

    #[test]
    fn test_non_finite_strings_become_zero() -> Result<()> {
        let cmd = control(r#"{"event":"control","thrust":"inf","roll":"NaN","pitch":" 0.25 "}"#)?;
        assert_eq!(cmd.throttle, 0.);
        assert_eq!(cmd.roll, 0.);
        assert_relative_eq!(cmd.pitch, 0.25);
        Ok(())
    }

    #[test]
    fn test_missing_fields_are_zero() -> Result<()> {
        let cmd = control(r#"{"event":"control","thrust":0.4}"#)?;
        assert_eq!(cmd, PilotCommand::new(0.4, 0., 0., 0.));
        Ok(())
    }

    #[test]
    fn test_bare_command_without_event() -> Result<()> {
        let cmd = control(r#"{"thrust":0.3,"yaw":-1}"#)?;
        assert_eq!(cmd, PilotCommand::new(0.3, 0., 0., -1.));
        Ok(())
    }

    #[test]
    fn test_reset_message() -> Result<()> {
        assert_eq!(
            IngressMessage::parse(r#"{"event":"reset_sim"}"#)?,
            Some(IngressMessage::Reset)
        );
        Ok(())
    }

    #[test]
    fn test_unrelated_messages_are_ignored() -> Result<()> {
        assert_eq!(IngressMessage::parse(r#"{"event":"hello"}"#)?, None);
        assert_eq!(IngressMessage::parse(r#"{"other":1}"#)?, None);
        Ok(())
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(matches!(
            IngressMessage::parse("not json at all"),
            Err(IngressError::Malformed(_))
        ));
        assert!(matches!(
            IngressMessage::parse("[1, 2]"),
            Err(IngressError::NotAnObject(_))
        ));
    }
}
