use crate::error::Error;
use crate::protocol::cmd_defs::{self, Opcode};
use crate::protocol::dim::{parse_argument, DimLevel};
use crate::protocol::frame::Frame;
use log::warn;
use serde_derive::Serialize;

/// Peripherals on the board, each with its own command set
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Cold-cathode light controller
    Light,
    /// Audio relay
    Audio,
}

impl Target {
    pub const ALL: [Target; 2] = [Target::Light, Target::Audio];

    pub fn name(&self) -> &'static str {
        match self {
            Target::Light => "light",
            Target::Audio => "audio",
        }
    }

    pub fn from_name(name: &str) -> Option<Target> {
        Target::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Turn a textual command into an opcode and argument bytes
    ///
    /// # Arguments
    /// * `command` - Command name, e.g. "on" or "dim"
    /// * `args` - Remaining words of the command line
    pub fn resolve(&self, command: &str, args: &[&str]) -> Result<ResolvedCommand, Error> {
        match self {
            Target::Light if command == "dim" => {
                let token = args
                    .first()
                    .ok_or_else(|| Error::MissingArgument("light dim".to_string()))?;
                warn_unused(self, command, &args[1..]);
                let level: DimLevel = token.parse()?;
                Ok(ResolvedCommand {
                    target: *self,
                    opcode: level.opcode(),
                    args: vec![level.value()],
                })
            }
            Target::Light | Target::Audio => self.resolve_table(command, args),
        }
    }

    fn resolve_table(&self, command: &str, args: &[&str]) -> Result<ResolvedCommand, Error> {
        let def = cmd_defs::find(*self, command)
            .ok_or_else(|| Error::unknown_command(self.name(), command))?;
        if args.len() < def.arg_count {
            return Err(Error::MissingArgument(format!(
                "{} {}",
                self.name(),
                command
            )));
        }
        warn_unused(self, command, &args[def.arg_count..]);
        let arg_bytes = args[..def.arg_count]
            .iter()
            .map(|a| parse_argument(a))
            .collect::<Result<Vec<u8>, Error>>()?;
        Ok(ResolvedCommand {
            target: *self,
            opcode: def.opcode,
            args: arg_bytes,
        })
    }
}

fn warn_unused(target: &Target, command: &str, unused: &[&str]) {
    if !unused.is_empty() {
        warn!(
            "Ignoring extra arguments for {} {}: {:?}",
            target.name(),
            command,
            unused
        );
    }
}

/// A command ready for encoding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedCommand {
    pub target: Target,
    pub opcode: Opcode,
    pub args: Vec<u8>,
}

impl ResolvedCommand {
    pub fn encode(&self) -> Result<Frame, Error> {
        Frame::encode(self.opcode, &self.args)
    }
}

/// Resolve a target name, a command and its arguments
pub fn resolve(target: &str, command: &str, args: &[&str]) -> Result<ResolvedCommand, Error> {
    let target_dev =
        Target::from_name(target).ok_or_else(|| Error::unknown_command(target, command))?;
    target_dev.resolve(command, args)
}
