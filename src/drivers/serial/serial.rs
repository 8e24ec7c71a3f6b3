use crate::drivers;
use crate::error::DynResult;
use crate::protocol::frame::Frame;
use crate::utils::dyn_future::DynFuture;
use drivers::driver::{DriverInfo, OpenError, SiDriver};
use futures::FutureExt;
use log::debug;
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::str::FromStr;
use tokio::io::AsyncWriteExt;
use tokio_serial::{Parity, SerialStream};

pub const DEFAULT_PORT: &str = "/dev/ttyUSB0";
pub const DEFAULT_BAUD_RATE: u32 = 9600;

#[derive(Debug)]
enum DriverError {
    SerialError(tokio_serial::Error),
    IoError(std::io::Error),
}

impl Error for DriverError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DriverError::SerialError(err) => Some(err),
            DriverError::IoError(err) => Some(err),
        }
    }
}

impl From<tokio_serial::Error> for DriverError {
    fn from(err: tokio_serial::Error) -> DriverError {
        DriverError::SerialError(err)
    }
}

impl From<std::io::Error> for DriverError {
    fn from(err: std::io::Error) -> DriverError {
        DriverError::IoError(err)
    }
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::SerialError(err) => write!(f, "{}", err),
            DriverError::IoError(err) => write!(f, "Failed to write to serial device: {}", err),
        }
    }
}

pub struct SerialDriver {
    serial: SerialStream,
}

impl SerialDriver {
    fn new(port: &str, baud_rate: u32, parity: Parity) -> Result<SerialDriver, DriverError> {
        let serial = SerialStream::open(&tokio_serial::new(port, baud_rate).parity(parity))?;
        Ok(SerialDriver { serial })
    }

    async fn write_frame(&mut self, frame: Frame) -> DynResult<()> {
        debug!("Serial write: {}", frame);
        self.serial
            .write_all(frame.as_bytes())
            .await
            .map_err(DriverError::from)?;
        self.serial.flush().await.map_err(DriverError::from)?;
        Ok(())
    }
}

impl SiDriver for SerialDriver {
    fn send_frame(&mut self, frame: Frame) -> DynFuture<'_, DynResult<()>> {
        self.write_frame(frame).boxed()
    }
}

struct SerialParams<'a> {
    port: &'a str,
    baud_rate: u32,
    parity: Parity,
}

fn parse_params(params: &HashMap<String, String>) -> Result<SerialParams<'_>, OpenError> {
    let port = params
        .get("port")
        .map(|s| s.as_str())
        .unwrap_or(DEFAULT_PORT);
    let baud_rate = match params.get("baud_rate") {
        None => DEFAULT_BAUD_RATE,
        Some(s) => u32::from_str(s)
            .map_err(|_| OpenError::ParameterError("baud_rate has invalid value".to_string()))?,
    };
    let parity = match params.get("parity").and_then(|p| p.chars().next()) {
        Some('E' | 'e') => Parity::Even,
        Some('O' | 'o') => Parity::Odd,
        Some('N' | 'n') | None => Parity::None,
        Some(_) => {
            return Err(OpenError::ParameterError(
                "parity has invalid value".to_string(),
            ));
        }
    };
    Ok(SerialParams {
        port,
        baud_rate,
        parity,
    })
}

fn driver_open(params: HashMap<String, String>) -> Result<Box<dyn SiDriver>, OpenError> {
    let p = parse_params(&params)?;
    match SerialDriver::new(p.port, p.baud_rate, p.parity) {
        Err(e) => Err(OpenError::DriverError(Box::new(e))),
        Ok(d) => Ok(Box::new(d)),
    }
}

pub fn driver_info() -> DriverInfo {
    DriverInfo {
        name: "SERIAL".to_string(),
        description: "SI board on a serial port (parameters: port, baud_rate, parity)".to_string(),
        open: driver_open,
    }
}
