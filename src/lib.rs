pub mod error;
pub mod device;

pub mod protocol {
    pub mod cmd_defs;
    pub mod dim;
    pub mod frame;
}

pub mod drivers;

pub mod utils {
    pub mod decode;
    pub mod dyn_future;
}
