// src/common/action.rs

//! Abstract actions the controller can ask the companion host to perform.
//!
//! An [`Action`] says *what* the user wants (power on, switch to HDMI 2, ...)
//! independent of how a particular display vendor expects it on the wire. The
//! vendor tables in [`super::vendor`] and the codec in [`super::codec`] turn it
//! into bytes.

use core::fmt;

use arrayvec::ArrayString;

use super::error::ActionError;

/// Maximum length in bytes of free-form custom command text.
pub const CUSTOM_COMMAND_MAX: usize = 50;

/// Highest selectable HDMI input.
pub const INPUT_INDEX_MAX: u8 = 4;

/// HDMI input number, 1 to [`INPUT_INDEX_MAX`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct InputIndex(u8);

impl InputIndex {
    pub const HDMI1: InputIndex = InputIndex(1);
    pub const HDMI2: InputIndex = InputIndex(2);
    pub const HDMI3: InputIndex = InputIndex(3);
    pub const HDMI4: InputIndex = InputIndex(4);

    /// Creates an input index if `index` is within 1..=4.
    pub fn new(index: u8) -> Result<Self, ActionError> {
        if (1..=INPUT_INDEX_MAX).contains(&index) {
            Ok(InputIndex(index))
        } else {
            Err(ActionError::InputOutOfRange(index))
        }
    }

    #[inline]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for InputIndex {
    type Error = ActionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for InputIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HDMI {}", self.0)
    }
}

/// User supplied command text, never longer than [`CUSTOM_COMMAND_MAX`] bytes.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct CustomText(ArrayString<CUSTOM_COMMAND_MAX>);

impl CustomText {
    /// Accepts `text` only if it fits in [`CUSTOM_COMMAND_MAX`] bytes.
    pub fn try_new(text: &str) -> Result<Self, ActionError> {
        ArrayString::from(text)
            .map(CustomText)
            .map_err(|_| ActionError::CustomTooLong { len: text.len() })
    }

    /// Keeps at most [`CUSTOM_COMMAND_MAX`] bytes of `text`, cutting on a
    /// character boundary.
    pub fn truncated(text: &str) -> Self {
        let mut end = text.len().min(CUSTOM_COMMAND_MAX);
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        let mut inner = ArrayString::new();
        inner.push_str(&text[..end]);
        CustomText(inner)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CustomText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An operation requested by the user.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Action {
    PowerOn,
    PowerOff,
    /// Switch the display to one of its HDMI inputs.
    SelectInput(InputIndex),
    VolumeUp,
    VolumeDown,
    Mute,
    /// Ask the host to scan the CEC bus for devices.
    Scan,
    /// Query the display's power status.
    Status,
    DeviceInfo,
    /// Fetch the host's command log.
    FetchLog,
    ClearLog,
    /// Connectivity check exchanged once at session start.
    Probe,
    /// Raw CEC instruction passed through to the host.
    Custom(CustomText),
}

/// Table key for every action that has a fixed vendor mapping.
///
/// Identical to [`Action`] minus [`Action::Custom`], which is encoded without
/// any table lookup.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum CommandKey {
    PowerOn,
    PowerOff,
    SelectInput(InputIndex),
    VolumeUp,
    VolumeDown,
    Mute,
    Scan,
    Status,
    DeviceInfo,
    FetchLog,
    ClearLog,
    Probe,
}

impl CommandKey {
    /// Every key, in menu order.
    pub const ALL: [CommandKey; 15] = [
        CommandKey::PowerOn,
        CommandKey::PowerOff,
        CommandKey::SelectInput(InputIndex::HDMI1),
        CommandKey::SelectInput(InputIndex::HDMI2),
        CommandKey::SelectInput(InputIndex::HDMI3),
        CommandKey::SelectInput(InputIndex::HDMI4),
        CommandKey::VolumeUp,
        CommandKey::VolumeDown,
        CommandKey::Mute,
        CommandKey::Scan,
        CommandKey::Status,
        CommandKey::DeviceInfo,
        CommandKey::FetchLog,
        CommandKey::ClearLog,
        CommandKey::Probe,
    ];
}

impl Action {
    /// Returns the table key, or `None` for [`Action::Custom`].
    pub fn key(&self) -> Option<CommandKey> {
        let key = match self {
            Action::PowerOn => CommandKey::PowerOn,
            Action::PowerOff => CommandKey::PowerOff,
            Action::SelectInput(index) => CommandKey::SelectInput(*index),
            Action::VolumeUp => CommandKey::VolumeUp,
            Action::VolumeDown => CommandKey::VolumeDown,
            Action::Mute => CommandKey::Mute,
            Action::Scan => CommandKey::Scan,
            Action::Status => CommandKey::Status,
            Action::DeviceInfo => CommandKey::DeviceInfo,
            Action::FetchLog => CommandKey::FetchLog,
            Action::ClearLog => CommandKey::ClearLog,
            Action::Probe => CommandKey::Probe,
            Action::Custom(_) => return None,
        };
        Some(key)
    }

    /// Short human readable name, used for logs and the command history.
    pub fn label(&self) -> &'static str {
        match self {
            Action::PowerOn => "Power ON",
            Action::PowerOff => "Power OFF",
            Action::SelectInput(index) => match index.get() {
                1 => "HDMI 1",
                2 => "HDMI 2",
                3 => "HDMI 3",
                _ => "HDMI 4",
            },
            Action::VolumeUp => "Volume +",
            Action::VolumeDown => "Volume -",
            Action::Mute => "Mute",
            Action::Scan => "Scan Devices",
            Action::Status => "Check Status",
            Action::DeviceInfo => "Device Info",
            Action::FetchLog => "Fetch Log",
            Action::ClearLog => "Clear Log",
            Action::Probe => "Ping",
            Action::Custom(_) => "Custom Command",
        }
    }

    /// Builds a custom action, truncating `text` to [`CUSTOM_COMMAND_MAX`] bytes.
    pub fn custom(text: &str) -> Self {
        Action::Custom(CustomText::truncated(text))
    }
}

impl From<CommandKey> for Action {
    fn from(key: CommandKey) -> Self {
        match key {
            CommandKey::PowerOn => Action::PowerOn,
            CommandKey::PowerOff => Action::PowerOff,
            CommandKey::SelectInput(index) => Action::SelectInput(index),
            CommandKey::VolumeUp => Action::VolumeUp,
            CommandKey::VolumeDown => Action::VolumeDown,
            CommandKey::Mute => Action::Mute,
            CommandKey::Scan => Action::Scan,
            CommandKey::Status => Action::Status,
            CommandKey::DeviceInfo => Action::DeviceInfo,
            CommandKey::FetchLog => Action::FetchLog,
            CommandKey::ClearLog => Action::ClearLog,
            CommandKey::Probe => Action::Probe,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Custom(text) => write!(f, "Custom({})", text),
            other => f.write_str(other.label()),
        }
    }
}
