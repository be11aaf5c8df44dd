// src/common/codec.rs

//! Wire encoding of actions.
//!
//! Every outbound frame is a single-line JSON envelope:
//!
//! ```text
//! {"command":"<NAME>"[,"<param>":"<value>"]}\n
//! ```
//!
//! Encoding is pure: the same profile and action always give the same bytes.

use core::fmt;

use arrayvec::ArrayVec;

use super::action::{Action, CUSTOM_COMMAND_MAX};
use super::vendor::VendorProfile;

/// Longest command name or parameter key in any table.
pub const NAME_MAX: usize = 16;

/// Line terminator appended to every frame.
pub const LINE_TERMINATOR: u8 = b'\n';

const ENVELOPE_HEAD: &[u8] = b"{\"command\":\"";
const ENVELOPE_TAIL: &[u8] = b"\"}";
const CUSTOM_COMMAND_NAME: &str = "CUSTOM";
const CUSTOM_COMMAND_PARAM: &str = "cec_command";

/// Capacity of a [`WireMessage`].
///
/// Head, name, `","`, key, `":"`, a value that doubles in size if every byte
/// needs escaping, tail and terminator.
pub const WIRE_MESSAGE_MAX: usize =
    ENVELOPE_HEAD.len() + NAME_MAX + 3 + NAME_MAX + 3 + 2 * CUSTOM_COMMAND_MAX + ENVELOPE_TAIL.len() + 1;

/// One encoded, terminated outbound frame.
#[derive(Clone, PartialEq, Eq)]
pub struct WireMessage(ArrayVec<u8, WIRE_MESSAGE_MAX>);

impl WireMessage {
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The frame without its terminator, for logging.
    pub fn as_str(&self) -> &str {
        let body = self.0.strip_suffix(&[LINE_TERMINATOR]).unwrap_or(self.0.as_slice());
        core::str::from_utf8(body).unwrap_or("<non-utf8>")
    }

    fn new() -> Self {
        WireMessage(ArrayVec::new())
    }

    // Capacity covers the worst case, see WIRE_MESSAGE_MAX.
    fn push(&mut self, bytes: &[u8]) {
        for &b in bytes {
            if self.0.try_push(b).is_err() {
                break;
            }
        }
    }

    fn push_escaped(&mut self, text: &str) {
        for c in text.chars() {
            match c {
                '"' => self.push(b"\\\""),
                '\\' => self.push(b"\\\\"),
                c if c.is_control() => {}
                c => {
                    let mut utf8 = [0u8; 4];
                    self.push(c.encode_utf8(&mut utf8).as_bytes());
                }
            }
        }
    }

    fn envelope(name: &str, param: Option<(&str, &str)>, escape_value: bool) -> Self {
        let mut msg = WireMessage::new();
        msg.push(ENVELOPE_HEAD);
        msg.push(name.as_bytes());
        if let Some((key, value)) = param {
            msg.push(b"\",\"");
            msg.push(key.as_bytes());
            msg.push(b"\":\"");
            if escape_value {
                msg.push_escaped(value);
            } else {
                msg.push(value.as_bytes());
            }
        }
        msg.push(ENVELOPE_TAIL);
        msg.push(&[LINE_TERMINATOR]);
        msg
    }
}

impl fmt::Debug for WireMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WireMessage({:?})", self.as_str())
    }
}

/// Encodes `action` for the given vendor profile.
///
/// Custom text goes into the generic `CUSTOM` envelope regardless of vendor.
/// Every other action is looked up in `profile`, which falls back to the
/// generic table for actions the brand does not override.
pub fn encode(profile: &VendorProfile, action: &Action) -> WireMessage {
    match (action, action.key()) {
        (Action::Custom(text), _) => encode_custom(text.as_str()),
        (_, Some(key)) => {
            let entry = profile.lookup(key);
            WireMessage::envelope(entry.name, entry.param, false)
        }
        // Every non-custom action has a table key.
        (_, None) => encode_custom(""),
    }
}

fn encode_custom(text: &str) -> WireMessage {
    WireMessage::envelope(CUSTOM_COMMAND_NAME, Some((CUSTOM_COMMAND_PARAM, text)), true)
}

/// Wire command name `action` is sent as.
pub fn command_name(profile: &VendorProfile, action: &Action) -> &'static str {
    match action.key() {
        Some(key) => profile.lookup(key).name,
        None => CUSTOM_COMMAND_NAME,
    }
}

/// Raw CEC instruction the host will run for `action`, if the table has one.
///
/// Custom commands are their own code and return `None`.
pub fn display_code(profile: &VendorProfile, action: &Action) -> Option<&'static str> {
    action.key().and_then(|key| profile.lookup(key).display_code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::action::{CommandKey, InputIndex};
    use crate::common::vendor::{Vendor, GENERIC, LG, OPTOMA, SAMSUNG};
    use proptest::prelude::*;

    #[test]
    fn test_generic_envelopes() {
        assert_eq!(
            encode(&GENERIC, &Action::PowerOn).as_bytes(),
            b"{\"command\":\"POWER_ON\"}\n"
        );
        assert_eq!(
            encode(&GENERIC, &Action::Probe).as_bytes(),
            b"{\"command\":\"PING\"}\n"
        );
        assert_eq!(
            encode(&GENERIC, &Action::SelectInput(InputIndex::HDMI2)).as_str(),
            "{\"command\":\"HDMI_2\"}"
        );
    }

    #[test]
    fn test_vendor_envelopes() {
        assert_eq!(
            encode(&OPTOMA, &Action::PowerOn).as_bytes(),
            b"{\"command\":\"POWER_ON\",\"vendor\":\"optoma\"}\n"
        );
        assert_eq!(
            encode(&LG, &Action::SelectInput(InputIndex::HDMI1)).as_bytes(),
            b"{\"command\":\"HDMI_1\",\"vendor\":\"lg\"}\n"
        );
        // No Samsung override for power, generic mapping is used
        assert_eq!(
            encode(&SAMSUNG, &Action::PowerOff),
            encode(&GENERIC, &Action::PowerOff)
        );
    }

    #[test]
    fn test_custom_envelope_ignores_vendor() {
        let action = Action::custom("tx 10:04");
        let expected = b"{\"command\":\"CUSTOM\",\"cec_command\":\"tx 10:04\"}\n";
        for vendor in Vendor::ALL {
            assert_eq!(encode(vendor.profile(), &action).as_bytes(), expected);
        }
    }

    #[test]
    fn test_custom_text_is_escaped() {
        let action = Action::custom("a\"b\\c\u{7}d");
        assert_eq!(
            encode(&GENERIC, &action).as_str(),
            r#"{"command":"CUSTOM","cec_command":"a\"b\\cd"}"#
        );
    }

    #[test]
    fn test_custom_text_is_capped() {
        let action = Action::custom(&"9".repeat(300));
        let msg = encode(&GENERIC, &action);
        let overhead = b"{\"command\":\"CUSTOM\",\"cec_command\":\"\"}\n".len();
        assert_eq!(msg.len(), overhead + CUSTOM_COMMAND_MAX);
    }

    #[test]
    fn test_single_terminator() {
        for key in CommandKey::ALL {
            let msg = encode(&GENERIC, &Action::from(key));
            let bytes = msg.as_bytes();
            assert_eq!(bytes.last(), Some(&LINE_TERMINATOR));
            assert_eq!(bytes.iter().filter(|b| **b == b'\n' || **b == b'\r').count(), 1);
        }
    }

    #[test]
    fn test_table_names_fit() {
        for vendor in Vendor::ALL {
            for key in CommandKey::ALL {
                let entry = vendor.profile().lookup(key);
                assert!(entry.name.len() <= NAME_MAX);
                if let Some((k, v)) = entry.param {
                    assert!(k.len() <= NAME_MAX);
                    assert!(v.len() <= CUSTOM_COMMAND_MAX);
                }
            }
        }
        assert!(CUSTOM_COMMAND_PARAM.len() <= NAME_MAX);
    }

    #[test]
    fn test_display_codes() {
        assert_eq!(display_code(&GENERIC, &Action::PowerOn), Some("on 0"));
        assert_eq!(
            display_code(&SAMSUNG, &Action::SelectInput(InputIndex::HDMI4)),
            Some("tx 4F:82:40:00")
        );
        assert_eq!(display_code(&GENERIC, &Action::Probe), None);
        assert_eq!(display_code(&GENERIC, &Action::custom("on 0")), None);
        assert_eq!(command_name(&LG, &Action::custom("x")), "CUSTOM");
    }

    proptest! {
        #[test]
        fn prop_encode_is_deterministic(vendor_idx in 0usize..6, key_idx in 0usize..15) {
            let profile = Vendor::ALL[vendor_idx].profile();
            let action = Action::from(CommandKey::ALL[key_idx]);
            prop_assert_eq!(encode(profile, &action), encode(profile, &action));
        }

        #[test]
        fn prop_custom_is_bounded(text in "\\PC{0,200}") {
            let msg = encode(&GENERIC, &Action::custom(&text));
            prop_assert!(msg.len() <= WIRE_MESSAGE_MAX);
            prop_assert_eq!(msg.as_bytes().last(), Some(&LINE_TERMINATOR));
            prop_assert!(
                msg.as_bytes().ends_with(b"\"}\n"),
                "frame must end with the envelope tail"
            );
        }
    }
}
