pub mod driver;
pub mod driver_init;
pub use driver::driver_names;
pub use driver::open;
pub use driver_init::init;

pub mod command_utils;

pub mod dummy {
    pub mod dummy;
}

#[cfg(feature = "serial_driver")]
pub mod serial {
    pub mod serial;
}
