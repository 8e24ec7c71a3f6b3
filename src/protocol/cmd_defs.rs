use crate::device::Target;
use crate::error::Error;
use serde_derive::Serialize;
use std::fmt;

/// One byte identifying a device action
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Opcode(pub u8);

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02x}", self.0)
    }
}

#[derive(Debug)]
pub struct CommandDef {
    pub name: &'static str,
    pub opcode: Opcode,
    /// Number of argument bytes following the opcode
    pub arg_count: usize,
    pub descr: &'static str,
}

macro_rules! opcode_def {
    ($sym: ident, $opcode: expr) => {
        pub const $sym: Opcode = Opcode($opcode);
    };
}

macro_rules! cmd_def {
    ($name: expr, $opcode: expr, $descr: expr $(, $args: expr)?) => {
        CommandDef {
            name: $name,
            opcode: $opcode,
            arg_count: 0 $(+ $args)?,
            descr: $descr,
        }
    };
}

// Cold-cathode light controller
opcode_def!(LIGHT_ON, 0x81);
opcode_def!(LIGHT_OFF, 0x82);
opcode_def!(LIGHT_SET, 0x83);
opcode_def!(LIGHT_ADD, 0x84);
opcode_def!(LIGHT_SUB, 0x85);
opcode_def!(LIGHT_TOGGLE, 0x86);

// Audio relay
opcode_def!(AUDIO_ON, 0x71);
opcode_def!(AUDIO_OFF, 0x72);
opcode_def!(AUDIO_TOGGLE, 0x73);

pub static LIGHT_COMMANDS: [CommandDef; 6] = [
    cmd_def!("on", LIGHT_ON, "Turn light on"),
    cmd_def!("off", LIGHT_OFF, "Turn light off"),
    cmd_def!("set", LIGHT_SET, "Set dim level", 1),
    cmd_def!("add", LIGHT_ADD, "Increase dim level", 1),
    cmd_def!("sub", LIGHT_SUB, "Decrease dim level", 1),
    cmd_def!("toggle", LIGHT_TOGGLE, "Toggle light"),
];

pub static AUDIO_COMMANDS: [CommandDef; 3] = [
    cmd_def!("on", AUDIO_ON, "Turn audio relay on"),
    cmd_def!("off", AUDIO_OFF, "Turn audio relay off"),
    cmd_def!("toggle", AUDIO_TOGGLE, "Toggle audio relay"),
];

/// All commands registered for a target
pub fn commands(target: Target) -> &'static [CommandDef] {
    match target {
        Target::Light => &LIGHT_COMMANDS,
        Target::Audio => &AUDIO_COMMANDS,
    }
}

pub fn find(target: Target, name: &str) -> Option<&'static CommandDef> {
    commands(target).iter().find(|def| def.name == name)
}

/// Look up the opcode for a command of a target
pub fn lookup(target: Target, name: &str) -> Result<Opcode, Error> {
    find(target, name)
        .map(|def| def.opcode)
        .ok_or_else(|| Error::unknown_command(target.name(), name))
}

/// Find the target and command an opcode belongs to
pub fn describe(opcode: Opcode) -> Option<(Target, &'static CommandDef)> {
    Target::ALL.into_iter().find_map(|target| {
        commands(target)
            .iter()
            .find(|def| def.opcode == opcode)
            .map(|def| (target, def))
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn lookup_test() {
        assert_eq!(lookup(Target::Light, "on").unwrap(), Opcode(0x81));
        assert_eq!(lookup(Target::Light, "off").unwrap(), Opcode(0x82));
        assert_eq!(lookup(Target::Light, "set").unwrap(), Opcode(0x83));
        assert_eq!(lookup(Target::Light, "add").unwrap(), Opcode(0x84));
        assert_eq!(lookup(Target::Light, "sub").unwrap(), Opcode(0x85));
        assert_eq!(lookup(Target::Light, "toggle").unwrap(), Opcode(0x86));
        assert_eq!(lookup(Target::Audio, "on").unwrap(), Opcode(0x71));
        assert_eq!(lookup(Target::Audio, "off").unwrap(), Opcode(0x72));
        assert_eq!(lookup(Target::Audio, "toggle").unwrap(), Opcode(0x73));
    }

    #[test]
    fn unknown_command_test() {
        assert!(matches!(
            lookup(Target::Audio, "set"),
            Err(Error::UnknownCommand { .. })
        ));
        assert!(matches!(
            lookup(Target::Light, "dim"),
            Err(Error::UnknownCommand { .. })
        ));
    }

    #[test]
    fn unique_opcodes_test() {
        let mut seen = HashSet::new();
        for target in Target::ALL {
            for def in commands(target) {
                assert!(seen.insert(def.opcode), "Duplicate opcode {}", def.opcode);
            }
        }
    }

    #[test]
    fn describe_test() {
        let (target, def) = describe(Opcode(0x84)).unwrap();
        assert_eq!(target, Target::Light);
        assert_eq!(def.name, "add");
        let (target, def) = describe(AUDIO_TOGGLE).unwrap();
        assert_eq!(target, Target::Audio);
        assert_eq!(def.name, "toggle");
        assert!(describe(Opcode(0x00)).is_none());
    }
}
