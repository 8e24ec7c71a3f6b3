use crate::drivers;
use crate::error::DynResult;
use crate::protocol::frame::Frame;
use crate::utils::decode;
use crate::utils::dyn_future::DynFuture;
use drivers::driver::{DriverInfo, OpenError, SiDriver};
use futures::future::{self, FutureExt};
use log::info;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Driver that keeps sent frames in memory instead of writing them
#[derive(Default)]
pub struct DummyDriver {
    sent: Arc<Mutex<Vec<Frame>>>,
    fail: bool,
}

impl DummyDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// A driver where every write fails
    pub fn failing() -> Self {
        DummyDriver {
            sent: Arc::default(),
            fail: true,
        }
    }

    /// Shared handle to the frames sent so far
    pub fn sent_frames(&self) -> Arc<Mutex<Vec<Frame>>> {
        self.sent.clone()
    }

    fn record(&mut self, frame: Frame) -> DynResult<()> {
        if self.fail {
            return Err("Dummy driver write failed".into());
        }
        info!("Dummy send: {} ({})", frame, decode::decode_frame(&frame));
        self.sent
            .lock()
            .map_err(|_| "Frame log poisoned")?
            .push(frame);
        Ok(())
    }
}

impl SiDriver for DummyDriver {
    fn send_frame(&mut self, frame: Frame) -> DynFuture<'_, DynResult<()>> {
        future::ready(self.record(frame)).boxed()
    }
}

fn driver_open(params: HashMap<String, String>) -> Result<Box<dyn SiDriver>, OpenError> {
    match params.get("fail").map(|s| s.as_str()) {
        None | Some("false") => Ok(Box::new(DummyDriver::new())),
        Some("true") => Ok(Box::new(DummyDriver::failing())),
        Some(_) => Err(OpenError::ParameterError(
            "fail has invalid value".to_string(),
        )),
    }
}

pub fn driver_info() -> DriverInfo {
    DriverInfo {
        name: "DUMMY".to_string(),
        description: "Dummy driver. Logs frames instead of sending them.".to_string(),
        open: driver_open,
    }
}
