use crate::drivers;
use drivers::driver::add_driver;
use drivers::dummy::dummy;
#[cfg(feature = "serial_driver")]
use drivers::serial::serial;

/// Register the compiled-in drivers. The first one is the default.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    #[cfg(feature = "serial_driver")]
    add_driver(serial::driver_info());
    add_driver(dummy::driver_info());
    Ok(())
}
