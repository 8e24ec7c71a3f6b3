use crate::protocol::cmd_defs;
use crate::protocol::dim::DimLevel;
use crate::protocol::frame::{Frame, FRAME_LEN};

fn hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Describe a frame as the command that would produce it
pub fn decode_frame(frame: &Frame) -> String {
    let opcode = frame.opcode();
    let args = frame.args();
    let Some((target, def)) = cmd_defs::describe(opcode) else {
        return format!("Unknown opcode {}: {}", opcode, hex_bytes(args));
    };
    let mut str = format!("{} ", target.name());
    let used = if let Some(level) = DimLevel::from_opcode(opcode, args[0]) {
        str += &format!("dim {}", level);
        1
    } else {
        str += def.name;
        for a in &args[..def.arg_count] {
            str += &format!(" {}", a);
        }
        def.arg_count
    };
    // Anything after the arguments should be padding
    let extra = &args[used..];
    if extra.iter().any(|b| *b != 0) {
        str += &format!(" (extra: {})", hex_bytes(extra));
    }
    str
}

/// Like [`decode_frame`] but for raw bytes
pub fn decode_packet(pkt: &[u8]) -> String {
    let Ok(bytes) = <[u8; FRAME_LEN]>::try_from(pkt) else {
        return "Invalid frame length".to_string();
    };
    match Frame::from_bytes(bytes) {
        Some(frame) => decode_frame(&frame),
        None => "Invalid marker".to_string(),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::device::resolve;
    use crate::protocol::cmd_defs::Opcode;
    use crate::protocol::frame::encode;

    fn decode_cmd(target: &str, command: &str, args: &[&str]) -> String {
        decode_frame(&resolve(target, command, args).unwrap().encode().unwrap())
    }

    #[test]
    fn decode_test() {
        assert_eq!(decode_cmd("light", "on", &[]), "light on");
        assert_eq!(decode_cmd("audio", "toggle", &[]), "audio toggle");
        assert_eq!(decode_cmd("light", "dim", &["50"]), "light dim 50");
        assert_eq!(decode_cmd("light", "dim", &["+10"]), "light dim +10");
        assert_eq!(decode_cmd("light", "sub", &["10"]), "light dim -10");
    }

    #[test]
    fn decode_raw_test() {
        assert_eq!(
            decode_frame(&encode(Opcode(0x10), &[1, 2]).unwrap()),
            "Unknown opcode 0x10: 01 02 00 00 00"
        );
        assert_eq!(
            decode_frame(&encode(Opcode(0x71), &[0, 3]).unwrap()),
            "audio on (extra: 00 03 00 00 00)"
        );
        assert_eq!(decode_packet(b"SI\x82\0\0\0\0\0"), "light off");
        assert_eq!(decode_packet(b"SI\x82"), "Invalid frame length");
        assert_eq!(decode_packet(b"XY\x82\0\0\0\0\0"), "Invalid marker");
    }
}
