// Serial link carrying pose frames: 8N1, no flow control

use std::io::{ErrorKind, Read};

use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::info;

use crate::config::SerialConfig;
use crate::error::InputError;

/// Source of raw input bytes, read with a short timeout
pub trait ByteSource {
    /// Read whatever is available into `buf`. A timeout yields `Ok(0)`.
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, InputError>;
}

pub struct SerialSource {
    port: Box<dyn SerialPort>,
}

impl SerialSource {
    pub fn open(config: &SerialConfig) -> Result<Self, InputError> {
        info!(
            "Opening serial port {} at {} baud",
            config.port, config.baud_rate
        );
        let port = serialport::new(&config.port, config.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(config.read_timeout())
            .open()?;

        Ok(Self { port })
    }
}

impl ByteSource for SerialSource {
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, InputError> {
        match self.port.read(buf) {
            Ok(n) => Ok(n),
            Err(e) if e.kind() == ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(InputError::Io(e)),
        }
    }
}
