use super::cmd_defs::{Opcode, LIGHT_ADD, LIGHT_SET, LIGHT_SUB};
use crate::error::Error;
use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;

/// Requested light level change
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DimLevel {
    Absolute(u8),
    Increase(u8),
    Decrease(u8),
}

impl DimLevel {
    pub fn opcode(&self) -> Opcode {
        match self {
            DimLevel::Absolute(_) => LIGHT_SET,
            DimLevel::Increase(_) => LIGHT_ADD,
            DimLevel::Decrease(_) => LIGHT_SUB,
        }
    }

    pub fn value(&self) -> u8 {
        match *self {
            DimLevel::Absolute(v) | DimLevel::Increase(v) | DimLevel::Decrease(v) => v,
        }
    }

    pub fn from_opcode(opcode: Opcode, value: u8) -> Option<DimLevel> {
        match opcode {
            LIGHT_SET => Some(DimLevel::Absolute(value)),
            LIGHT_ADD => Some(DimLevel::Increase(value)),
            LIGHT_SUB => Some(DimLevel::Decrease(value)),
            _ => None,
        }
    }
}

/// Parses "50", "+10" or "-10"
impl FromStr for DimLevel {
    type Err = Error;
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        if let Some(rest) = token.strip_prefix('+') {
            Ok(DimLevel::Increase(parse_argument(rest)?))
        } else if let Some(rest) = token.strip_prefix('-') {
            Ok(DimLevel::Decrease(parse_argument(rest)?))
        } else if token.is_empty() {
            Err(Error::MissingArgument("dim level".to_string()))
        } else {
            Ok(DimLevel::Absolute(parse_argument(token)?))
        }
    }
}

impl fmt::Display for DimLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimLevel::Absolute(v) => write!(f, "{}", v),
            DimLevel::Increase(v) => write!(f, "+{}", v),
            DimLevel::Decrease(v) => write!(f, "-{}", v),
        }
    }
}

/// Parse a decimal integer that must fit in one argument byte
pub fn parse_argument(s: &str) -> Result<u8, Error> {
    match s.parse::<i64>() {
        Ok(v) => u8::try_from(v).map_err(|_| Error::ArgumentOutOfRange(s.to_string())),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                Err(Error::ArgumentOutOfRange(s.to_string()))
            }
            _ => Err(Error::InvalidArgument(s.to_string())),
        },
    }
}
