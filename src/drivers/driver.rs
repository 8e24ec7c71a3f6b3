use crate::error::DynResult;
use crate::protocol::frame::Frame;
use crate::utils::dyn_future::DynFuture;
use lazy_static::lazy_static;
use log::info;
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::sync::Mutex;

/// Name selecting the first registered driver
pub const DEFAULT_DRIVER: &str = "default";

pub trait SiDriver: Send {
    /// Write one frame to the board. Completes when the bytes are written,
    /// the board sends no reply.
    fn send_frame(&mut self, frame: Frame) -> DynFuture<'_, DynResult<()>>;
}

#[derive(Debug)]
pub enum OpenError {
    NotFound,
    ParameterError(String),
    DriverError(Box<dyn Error + Send + Sync>),
}

impl Error for OpenError {}

impl fmt::Display for OpenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpenError::NotFound => write!(f, "Driver not found"),
            OpenError::ParameterError(msg) => write!(f, "Invalid parameter: {}", msg),
            OpenError::DriverError(err) => write!(f, "{}", err),
        }
    }
}

pub type OpenFn = fn(HashMap<String, String>) -> Result<Box<dyn SiDriver>, OpenError>;

#[derive(Clone)]
pub struct DriverInfo {
    pub name: String,
    pub description: String,
    pub open: OpenFn,
}

lazy_static! {
    static ref DRIVERS: Mutex<Vec<DriverInfo>> = Mutex::new(Vec::new());
}

fn registry() -> std::sync::MutexGuard<'static, Vec<DriverInfo>> {
    // The list is only ever pushed to, a poisoned lock still holds valid data
    DRIVERS.lock().unwrap_or_else(|e| e.into_inner())
}

/// Register a driver. Replaces any driver with the same name.
pub fn add_driver(info: DriverInfo) {
    let mut drivers = registry();
    if let Some(old) = drivers
        .iter_mut()
        .find(|d| d.name.eq_ignore_ascii_case(&info.name))
    {
        *old = info;
    } else {
        drivers.push(info);
    }
}

pub fn driver_names() -> Vec<String> {
    registry().iter().map(|d| d.name.clone()).collect()
}

pub fn driver_descriptions() -> Vec<(String, String)> {
    registry()
        .iter()
        .map(|d| (d.name.clone(), d.description.clone()))
        .collect()
}

/// Split "NAME:key=value,key=value" into driver name and parameters
pub fn parse_device_name(device_name: &str) -> Result<(String, HashMap<String, String>), OpenError> {
    let (name, param_str) = match device_name.split_once(':') {
        Some((name, params)) => (name, params),
        None => (device_name, ""),
    };
    let mut params = HashMap::new();
    for param in param_str.split(',').filter(|p| !p.is_empty()) {
        let Some((key, value)) = param.split_once('=') else {
            return Err(OpenError::ParameterError(format!(
                "Expected key=value, got '{}'",
                param
            )));
        };
        params.insert(key.trim().to_string(), value.trim().to_string());
    }
    Ok((name.trim().to_string(), params))
}

/// Open a driver by name, with parameters
pub fn open_with_params(
    name: &str,
    params: HashMap<String, String>,
) -> Result<Box<dyn SiDriver>, OpenError> {
    let info = {
        let drivers = registry();
        if name.eq_ignore_ascii_case(DEFAULT_DRIVER) {
            drivers.first().cloned()
        } else {
            drivers
                .iter()
                .find(|d| d.name.eq_ignore_ascii_case(name))
                .cloned()
        }
    };
    let info = info.ok_or(OpenError::NotFound)?;
    info!("Opening driver {} {:?}", info.name, params);
    (info.open)(params)
}

/// Open a driver from a device name like "SERIAL:port=/dev/ttyUSB1"
pub fn open(device_name: &str) -> Result<Box<dyn SiDriver>, OpenError> {
    let (name, params) = parse_device_name(device_name)?;
    open_with_params(&name, params)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_device_name_test() {
        let (name, params) = parse_device_name("SERIAL:port=/dev/ttyUSB1,baud_rate=9600").unwrap();
        assert_eq!(name, "SERIAL");
        assert_eq!(params.get("port").map(String::as_str), Some("/dev/ttyUSB1"));
        assert_eq!(params.get("baud_rate").map(String::as_str), Some("9600"));

        let (name, params) = parse_device_name("default").unwrap();
        assert_eq!(name, "default");
        assert!(params.is_empty());

        let (name, params) = parse_device_name("DUMMY:").unwrap();
        assert_eq!(name, "DUMMY");
        assert!(params.is_empty());

        assert!(matches!(
            parse_device_name("SERIAL:port"),
            Err(OpenError::ParameterError(_))
        ));
    }

    #[test]
    fn open_unknown_test() {
        assert!(matches!(open("NO_SUCH_DRIVER"), Err(OpenError::NotFound)));
    }
}
