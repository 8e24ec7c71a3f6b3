use super::driver::SiDriver;
use crate::device::{self, ResolvedCommand};
use crate::error::Error;
use crate::protocol::cmd_defs::Opcode;
use crate::protocol::frame::Frame;
use crate::utils::decode;
use log::debug;

/// Encode a resolved command and write it
///
/// Nothing is written if encoding fails.
///
/// # Arguments
/// * `driver` - Open driver
/// * `cmd` - Command to send
pub async fn send_command(driver: &mut dyn SiDriver, cmd: &ResolvedCommand) -> Result<Frame, Error> {
    let frame = cmd.encode()?;
    send_frame(driver, frame).await
}

/// Resolve a textual command and send it
///
/// # Arguments
/// * `target` - Target name, "light" or "audio"
/// * `command` - Command name
/// * `args` - Command arguments
pub async fn send_text(
    driver: &mut dyn SiDriver,
    target: &str,
    command: &str,
    args: &[&str],
) -> Result<Frame, Error> {
    let cmd = device::resolve(target, command, args)?;
    send_command(driver, &cmd).await
}

/// Send an opcode with arbitrary argument bytes
pub async fn send_raw(driver: &mut dyn SiDriver, opcode: Opcode, args: &[u8]) -> Result<Frame, Error> {
    let frame = Frame::encode(opcode, args)?;
    send_frame(driver, frame).await
}

/// Write an already encoded frame
pub async fn send_frame(driver: &mut dyn SiDriver, frame: Frame) -> Result<Frame, Error> {
    debug!("Sending {} ({})", frame, decode::decode_frame(&frame));
    driver
        .send_frame(frame)
        .await
        .map_err(Error::TransportFailure)?;
    Ok(frame)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::drivers::dummy::dummy::DummyDriver;

    #[tokio::test]
    async fn send_text_test() {
        let mut driver = DummyDriver::new();
        let sent = driver.sent_frames();
        let frame = send_text(&mut driver, "light", "dim", &["+10"]).await.unwrap();
        assert_eq!(frame.as_bytes(), &[b'S', b'I', 0x84, 10, 0, 0, 0, 0]);
        send_text(&mut driver, "audio", "toggle", &[]).await.unwrap();
        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], frame);
        assert_eq!(sent[1].as_bytes(), &[b'S', b'I', 0x73, 0, 0, 0, 0, 0]);
    }

    #[tokio::test]
    async fn nothing_sent_on_error_test() {
        let mut driver = DummyDriver::new();
        let sent = driver.sent_frames();
        assert!(matches!(
            send_text(&mut driver, "heater", "on", &[]).await,
            Err(Error::UnknownCommand { .. })
        ));
        assert!(matches!(
            send_text(&mut driver, "light", "dim", &["abc"]).await,
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            send_text(&mut driver, "light", "dim", &["300"]).await,
            Err(Error::ArgumentOutOfRange(_))
        ));
        assert!(matches!(
            send_raw(&mut driver, Opcode(0x83), &[1, 2, 3, 4, 5, 6]).await,
            Err(Error::FrameTooLong { .. })
        ));
        assert!(sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn transport_failure_test() {
        let mut driver = DummyDriver::failing();
        assert!(matches!(
            send_text(&mut driver, "light", "on", &[]).await,
            Err(Error::TransportFailure(_))
        ));
    }

    #[tokio::test]
    async fn send_raw_test() {
        let mut driver = DummyDriver::new();
        let frame = send_raw(&mut driver, Opcode(0x83), &[1, 2, 3, 4, 5]).await.unwrap();
        assert_eq!(frame.as_bytes(), &[b'S', b'I', 0x83, 1, 2, 3, 4, 5]);
    }
}
