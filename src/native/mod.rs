// src/native/mod.rs

//! Serial port transport for running the bridge on a desktop host.
//!
//! Talks to the companion host through any serial device the `serialport`
//! crate can open (USB adapters, `/dev/serial0`, `COM3`, ...), framed 8N1.

use std::io::{Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use serialport::{DataBits, ErrorKind, FlowControl, Parity, SerialPort, StopBits};

use crate::common::{
    error::OpenError,
    hal_traits::{ByteChannel, Transport},
    timing,
};

pub use crate::common::hal_traits::StdClock;

/// Port settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialConfig {
    pub baud_rate: u32,
    /// Upper bound on a single blocking write.
    pub write_timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        SerialConfig {
            baud_rate: timing::BAUD_RATE,
            write_timeout: Duration::from_millis(500),
        }
    }
}

/// [`Transport`] over a named serial device.
///
/// At most one [`SerialChannel`] per transport is alive at a time.
pub struct SerialTransport {
    path: String,
    config: SerialConfig,
    claimed: Arc<AtomicBool>,
}

impl SerialTransport {
    /// # Arguments
    /// * `path` - Serial port path (e.g., "/dev/ttyUSB0")
    pub fn new(path: impl Into<String>, config: SerialConfig) -> Self {
        SerialTransport {
            path: path.into(),
            config,
            claimed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Transport for SerialTransport {
    type Error = serialport::Error;
    type Channel = SerialChannel;

    fn open(&mut self) -> Result<SerialChannel, OpenError<serialport::Error>> {
        if self.claimed.swap(true, Ordering::AcqRel) {
            return Err(OpenError::InUse);
        }

        let opened = serialport::new(self.path.as_str(), self.config.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(self.config.write_timeout)
            .open();

        match opened {
            Ok(port) => {
                info!("opened serial port {} at {} baud", self.path, self.config.baud_rate);
                Ok(SerialChannel {
                    port,
                    claimed: Arc::clone(&self.claimed),
                })
            }
            Err(e) => {
                self.claimed.store(false, Ordering::Release);
                Err(map_open_error(e))
            }
        }
    }
}

// `NoDevice` is what the OS reports for a port held by another process.
fn map_open_error(e: serialport::Error) -> OpenError<serialport::Error> {
    match e.kind() {
        ErrorKind::NoDevice => OpenError::InUse,
        _ => OpenError::Init(e),
    }
}

/// An open serial port. Dropping it closes the port.
pub struct SerialChannel {
    port: Box<dyn SerialPort>,
    claimed: Arc<AtomicBool>,
}

impl ByteChannel for SerialChannel {
    type Error = serialport::Error;

    fn send(&mut self, bytes: &[u8]) -> Result<(), serialport::Error> {
        self.port.write_all(bytes)?;
        self.port.flush()?;
        Ok(())
    }

    fn try_recv(&mut self) -> nb::Result<u8, serialport::Error> {
        if self.port.bytes_to_read().map_err(nb::Error::Other)? == 0 {
            return Err(nb::Error::WouldBlock);
        }
        let mut byte = [0u8; 1];
        match self.port.read(&mut byte) {
            Ok(1) => Ok(byte[0]),
            Ok(_) => Err(nb::Error::WouldBlock),
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Err(nb::Error::WouldBlock),
            Err(e) => Err(nb::Error::Other(e.into())),
        }
    }
}

impl Drop for SerialChannel {
    fn drop(&mut self) {
        debug!("closing serial port");
        self.claimed.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_host_link() {
        let config = SerialConfig::default();
        assert_eq!(config.baud_rate, 115_200);
    }

    #[test]
    fn test_open_error_mapping() {
        let busy = serialport::Error::new(ErrorKind::NoDevice, "device busy");
        assert!(matches!(map_open_error(busy), OpenError::InUse));

        let bad = serialport::Error::new(ErrorKind::InvalidInput, "bad baud");
        assert!(matches!(map_open_error(bad), OpenError::Init(_)));
    }

    #[test]
    fn test_missing_port_releases_claim() {
        let mut transport = SerialTransport::new("/dev/does-not-exist-cec", SerialConfig::default());
        assert!(transport.open().is_err());
        assert!(!transport.claimed.load(Ordering::Acquire));
        assert_eq!(transport.path(), "/dev/does-not-exist-cec");
    }
}
