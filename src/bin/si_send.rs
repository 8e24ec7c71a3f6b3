use si::drivers::command_utils;
use si::drivers::driver::OpenError;
use si::protocol::cmd_defs::Opcode;
use si::utils::decode;
use si_tools as si;
use std::process::ExitCode;

extern crate clap;
use clap::{Arg, ArgAction, Command};

/// Parse a hex string into bytes. Whitespace between bytes is ignored.
fn parse_hex(s: &str) -> Result<Vec<u8>, &'static str> {
    let digits = s
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_digit(16).ok_or("Invalid hex digit in command"))
        .collect::<Result<Vec<u32>, _>>()?;
    if digits.len() % 2 != 0 {
        return Err("Odd number of hex digits");
    }
    Ok(digits
        .chunks(2)
        .map(|d| ((d[0] << 4) | d[1]) as u8)
        .collect())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    if let Err(e) = si::drivers::init() {
        eprintln!("Failed to initialize drivers: {}", e);
    }
    let matches = Command::new("si_send")
        .about("Send an arbitrary opcode with argument bytes.")
        .arg(
            Arg::new("CMD")
                .required(true)
                .help("Hex string containing opcode followed by arguments, e.g. \"83 32\""),
        )
        .arg(
            Arg::new("DEVICE")
                .short('d')
                .long("device")
                .env("SI_DEVICE")
                .default_value("default")
                .help("Select driver, NAME[:key=value,...]"),
        )
        .arg(
            Arg::new("decode")
                .long("decode")
                .action(ArgAction::SetTrue)
                .help("Treat CMD as a complete 8 byte frame and print what it does"),
        )
        .arg(
            Arg::new("dry_run")
                .short('n')
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("Print the frame instead of sending it"),
        )
        .get_matches();

    let Some(cmd_string) = matches.get_one::<String>("CMD") else {
        eprintln!("No command given");
        return ExitCode::FAILURE;
    };
    let bytes = match parse_hex(cmd_string) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    if matches.get_flag("decode") {
        println!("{}", decode::decode_packet(&bytes));
        return ExitCode::SUCCESS;
    }
    let Some((&opcode, args)) = bytes.split_first() else {
        eprintln!("Command must contain an opcode");
        return ExitCode::FAILURE;
    };
    let opcode = Opcode(opcode);

    if *matches.get_one::<bool>("dry_run").unwrap_or(&false) {
        match si::protocol::frame::encode(opcode, args) {
            Ok(frame) => {
                println!("{}: {}", frame, decode::decode_frame(&frame));
                return ExitCode::SUCCESS;
            }
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    let device_name = matches
        .get_one::<String>("DEVICE")
        .map(String::as_str)
        .unwrap_or("default");
    let mut driver = match si::drivers::open(device_name) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Failed to open device: {}", e);
            if let OpenError::NotFound = e {
                eprintln!("Available drivers:");
                for name in si::drivers::driver_names() {
                    eprintln!("  {}", name);
                }
            }
            return ExitCode::FAILURE;
        }
    };
    match command_utils::send_raw(driver.as_mut(), opcode, args).await {
        Ok(frame) => {
            println!("Sent: {}", frame);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod test {
    use super::parse_hex;
    use si_tools::utils::decode::decode_packet;

    #[test]
    fn parse_hex_test() {
        assert_eq!(parse_hex("83 32").unwrap(), vec![0x83, 0x32]);
        assert_eq!(parse_hex("8132").unwrap(), vec![0x81, 0x32]);
        assert_eq!(parse_hex("").unwrap(), Vec::<u8>::new());
        assert!(parse_hex("8").is_err());
        assert!(parse_hex("zz").is_err());
    }

    #[test]
    fn decode_hex_frame_test() {
        let frame = parse_hex("53 49 84 0a 00 00 00 00").unwrap();
        assert_eq!(decode_packet(&frame), "light dim +10");
        let frame = parse_hex("53 49 73 00 00 00 00 00").unwrap();
        assert_eq!(decode_packet(&frame), "audio toggle");
        assert_eq!(decode_packet(&parse_hex("53 49 73").unwrap()), "Invalid frame length");
    }
}
