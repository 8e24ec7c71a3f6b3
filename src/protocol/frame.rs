use super::cmd_defs::Opcode;
use crate::error::Error;
use serde_derive::Serialize;
use std::fmt;

/// Marker starting every frame
pub const MARKER: [u8; 2] = *b"SI";
/// Every frame is padded to this length
pub const FRAME_LEN: usize = 8;

const HEADER_LEN: usize = MARKER.len() + 1;
/// Maximum number of argument bytes in one frame
pub const MAX_ARGS: usize = FRAME_LEN - HEADER_LEN;

/// Fixed length command frame as sent to the board.
///
/// The receiver always reads exactly [`FRAME_LEN`] bytes per command so
/// there is no length byte or delimiter. Unused bytes are zero.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Frame([u8; FRAME_LEN]);

impl Frame {
    /// Build a frame from an opcode and its arguments
    ///
    /// # Arguments
    /// * `opcode` - Command opcode
    /// * `args` - Argument bytes, in the order the command defines them
    pub fn encode(opcode: Opcode, args: &[u8]) -> Result<Frame, Error> {
        let len = HEADER_LEN + args.len();
        if len > FRAME_LEN {
            return Err(Error::FrameTooLong {
                len,
                max: FRAME_LEN,
            });
        }
        let mut bytes = [0u8; FRAME_LEN];
        bytes[..MARKER.len()].copy_from_slice(&MARKER);
        bytes[MARKER.len()] = opcode.0;
        bytes[HEADER_LEN..len].copy_from_slice(args);
        Ok(Frame(bytes))
    }

    /// Wrap received or stored bytes. Returns None if the marker is wrong.
    pub fn from_bytes(bytes: [u8; FRAME_LEN]) -> Option<Frame> {
        if bytes[..MARKER.len()] == MARKER {
            Some(Frame(bytes))
        } else {
            None
        }
    }

    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }

    pub fn opcode(&self) -> Opcode {
        Opcode(self.0[MARKER.len()])
    }

    /// Argument area, including padding
    pub fn args(&self) -> &[u8] {
        &self.0[HEADER_LEN..]
    }
}

pub fn encode(opcode: Opcode, args: &[u8]) -> Result<Frame, Error> {
    Frame::encode(opcode, args)
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::device::Target;
    use crate::protocol::cmd_defs::{self, LIGHT_ADD, LIGHT_SET};

    #[test]
    fn no_arg_frames_test() {
        for target in Target::ALL {
            for def in cmd_defs::commands(target).iter().filter(|d| d.arg_count == 0) {
                let frame = encode(def.opcode, &[]).unwrap();
                assert_eq!(
                    frame.as_bytes(),
                    &[b'S', b'I', def.opcode.0, 0, 0, 0, 0, 0]
                );
            }
        }
    }

    #[test]
    fn arg_frame_test() {
        let frame = encode(LIGHT_SET, &[50]).unwrap();
        assert_eq!(frame.as_bytes(), &[0x53, 0x49, 0x83, 50, 0, 0, 0, 0]);
        assert_eq!(frame.opcode(), LIGHT_SET);
        assert_eq!(frame.args(), &[50, 0, 0, 0, 0]);
    }

    #[test]
    fn frame_length_test() {
        let frame = encode(LIGHT_ADD, &[1, 2, 3, 4, 5]).unwrap();
        assert_eq!(frame.as_bytes(), &[b'S', b'I', 0x84, 1, 2, 3, 4, 5]);
        match encode(LIGHT_ADD, &[1, 2, 3, 4, 5, 6]) {
            Err(Error::FrameTooLong { len, max }) => {
                assert_eq!(len, 9);
                assert_eq!(max, FRAME_LEN);
            }
            r => panic!("Expected FrameTooLong, got {:?}", r),
        }
    }

    #[test]
    fn idempotent_test() {
        let a = encode(LIGHT_SET, &[200]).unwrap();
        let b = encode(LIGHT_SET, &[200]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn from_bytes_test() {
        let frame = encode(LIGHT_SET, &[7]).unwrap();
        assert_eq!(Frame::from_bytes(*frame.as_bytes()), Some(frame));
        assert_eq!(Frame::from_bytes([0x53, 0x48, 0x83, 0, 0, 0, 0, 0]), None);
    }

    #[test]
    fn display_test() {
        let frame = encode(LIGHT_SET, &[0x32]).unwrap();
        assert_eq!(frame.to_string(), "53 49 83 32 00 00 00 00");
    }
}
