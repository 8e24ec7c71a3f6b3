use si::device::{self, Target};
use si::drivers::command_utils;
use si::drivers::driver::{self, OpenError};
use si::error::Error;
use si::protocol::cmd_defs;
use si::protocol::frame::Frame;
use si::utils::decode;
use si_tools as si;
use serde_derive::Serialize;
use std::process::ExitCode;

extern crate clap;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

#[derive(Serialize)]
struct Report<'a> {
    #[serde(flatten)]
    command: &'a device::ResolvedCommand,
    frame: Frame,
    decoded: String,
}

fn err_print(msg: impl std::fmt::Display) {
    println!("ERROR: {}", msg);
}

fn print_help(program: &str) {
    println!("Usage:");
    println!("{} [options] target command [argument]", program);
    println!("Available targets:");
    for target in Target::ALL {
        println!("\t {}", target.name());
        for def in cmd_defs::commands(target) {
            let usage = if def.arg_count > 0 {
                format!("{} <level>", def.name)
            } else {
                def.name.to_string()
            };
            println!("\t\t {:22} {}", usage, def.descr);
        }
        if target == Target::Light {
            println!(
                "\t\t {:22} {}",
                "dim <level>|+<n>|-<n>", "Set, increase or decrease dim level"
            );
        }
    }
    println!("Example:");
    println!("{} audio toggle", program);
    println!("{} light dim +50", program);
}

/// Options go before the target. Everything from the target on is taken
/// as command words, so dim levels like "-10" or "--5" reach the parser.
fn cli() -> Command {
    Command::new("si_cmd")
        .about("Send a command to the SI light and audio board.")
        .arg(
            Arg::new("WORDS")
                .num_args(0..)
                .trailing_var_arg(true)
                .allow_hyphen_values(true)
                .value_name("TARGET COMMAND [ARGUMENT]")
                .help("Target (light or audio), command and arguments, e.g. light dim -10"),
        )
        .arg(
            Arg::new("DEVICE")
                .short('d')
                .long("device")
                .env("SI_DEVICE")
                .default_value(driver::DEFAULT_DRIVER)
                .help("Select driver, NAME[:key=value,...]"),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .env("SI_PORT")
                .help("Serial port"),
        )
        .arg(
            Arg::new("baud_rate")
                .short('b')
                .long("baud-rate")
                .value_parser(value_parser!(u32))
                .help("Serial baud rate"),
        )
        .arg(
            Arg::new("dry_run")
                .short('n')
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("Print the frame instead of sending it"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print the command as JSON"),
        )
}

fn command_words(matches: &ArgMatches) -> Vec<&str> {
    matches
        .get_many::<String>("WORDS")
        .map(|v| v.map(String::as_str).collect())
        .unwrap_or_default()
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    if let Err(e) = si::drivers::init() {
        eprintln!("Failed to initialize drivers: {}", e);
    }
    let matches = cli().get_matches();

    let program = std::env::args()
        .next()
        .unwrap_or_else(|| "si_cmd".to_string());
    let words = command_words(&matches);
    let [target, command, args @ ..] = words.as_slice() else {
        err_print("Not enough arguments!");
        print_help(&program);
        return ExitCode::FAILURE;
    };
    if Target::from_name(target).is_none() {
        err_print(format!("Invalid target: {}!", target));
        print_help(&program);
        return ExitCode::FAILURE;
    }
    let cmd = match device::resolve(target, command, args) {
        Ok(cmd) => cmd,
        Err(e @ (Error::UnknownCommand { .. } | Error::MissingArgument(_))) => {
            err_print(e);
            print_help(&program);
            return ExitCode::FAILURE;
        }
        Err(e) => {
            err_print(e);
            return ExitCode::FAILURE;
        }
    };
    let frame = match cmd.encode() {
        Ok(f) => f,
        Err(e) => {
            err_print(e);
            return ExitCode::FAILURE;
        }
    };

    if *matches.get_one::<bool>("json").unwrap_or(&false) {
        let report = Report {
            command: &cmd,
            frame,
            decoded: decode::decode_frame(&frame),
        };
        match serde_json::to_string(&report) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                err_print(e);
                return ExitCode::FAILURE;
            }
        }
    }
    if *matches.get_one::<bool>("dry_run").unwrap_or(&false) {
        println!("{}", frame);
        return ExitCode::SUCCESS;
    }

    let device_name = matches
        .get_one::<String>("DEVICE")
        .map(String::as_str)
        .unwrap_or(driver::DEFAULT_DRIVER);
    let (driver_name, mut params) = match driver::parse_device_name(device_name) {
        Ok(p) => p,
        Err(e) => {
            err_print(e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(port) = matches.get_one::<String>("port") {
        params.insert("port".to_string(), port.clone());
    }
    if let Some(baud_rate) = matches.get_one::<u32>("baud_rate") {
        params.insert("baud_rate".to_string(), baud_rate.to_string());
    }
    let mut driver = match driver::open_with_params(&driver_name, params) {
        Ok(d) => d,
        Err(e) => {
            err_print(format!("Failed to open device '{}': {}", device_name, e));
            if let OpenError::NotFound = e {
                eprintln!("Available drivers:");
                for (name, descr) in driver::driver_descriptions() {
                    eprintln!("  {:8} {}", name, descr);
                }
            }
            return ExitCode::FAILURE;
        }
    };
    match command_utils::send_frame(driver.as_mut(), frame).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            err_print(e);
            ExitCode::FAILURE
        }
    }
}
