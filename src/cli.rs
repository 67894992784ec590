use clap::{Parser, Subcommand};

use crate::error::Result;
use crate::value::{HeapConfig, PrintOptions, Value};

/// Inspects the pointer tagged value representation of the soft backend.
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Options {
    /// Maximum number of objects the heap may hold.
    #[arg(long, global = true)]
    pub heap_capacity: Option<usize>,

    /// Maximum pair nesting the printer accepts.
    #[arg(long, global = true)]
    pub max_depth: Option<usize>,

    /// Escape quotes and backslashes when printing strings.
    #[arg(long, global = true)]
    pub escape_strings: bool,

    /// Logs at debug level unless TAGVAL_LOG says otherwise.
    #[arg(short, long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Classifies a raw word, given in decimal, 0x hex or 0b binary.
    Decode {
        #[arg(value_parser = parse_word)]
        word: u64,
    },

    /// Encodes an immediate and shows the resulting word.
    Encode {
        #[command(subcommand)]
        immediate: Immediate,
    },

    /// Starts a repl session. This is the default.
    Repl,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Immediate {
    Int {
        #[arg(allow_hyphen_values = true)]
        value: i64,
    },
    Char {
        value: char,
    },
    Bool {
        #[arg(action = clap::ArgAction::Set)]
        value: bool,
    },
    Null,
}

impl Options {
    pub fn heap_config(&self) -> HeapConfig {
        HeapConfig {
            capacity: self.heap_capacity,
        }
    }

    pub fn print_options(&self) -> PrintOptions {
        PrintOptions {
            max_depth: self.max_depth,
            escape_strings: self.escape_strings,
        }
    }
}

impl Immediate {
    pub fn encode(&self) -> Result<Value> {
        match self {
            Immediate::Int { value } => Value::int(*value),
            Immediate::Char { value } => Value::try_from(*value),
            Immediate::Bool { value } => Ok(Value::bool(*value)),
            Immediate::Null => Ok(Value::NULL),
        }
    }
}

/// Parses a raw machine word.
pub fn parse_word(text: &str) -> Result<u64, String> {
    let text = text.trim().replace('_', "");

    let parsed = if let Some(hex) = text.strip_prefix("0x") {
        u64::from_str_radix(hex, 16)
    } else if let Some(bin) = text.strip_prefix("0b") {
        u64::from_str_radix(bin, 2)
    } else {
        text.parse()
    };

    parsed.map_err(|err| format!("invalid word '{text}': {err}"))
}

/// One line summary of a word: its bits, its category and what it holds.
pub fn describe(value: Value) -> String {
    format!(
        "{:#x} ({:#05b}) {}: {}",
        value.to_bits(),
        value.to_bits() & crate::value::TAG_MASK,
        value.tag().name(),
        value.unpack()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_word() {
        assert_eq!(parse_word("20"), Ok(20));
        assert_eq!(parse_word("0x14"), Ok(0x14));
        assert_eq!(parse_word("0b110"), Ok(0b110));
        assert_eq!(parse_word("0xffff_ffff"), Ok(0xffff_ffff));
        assert!(parse_word("nope").is_err());
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe(Value::NULL), "0x14 (0b100) null: null");
        assert_eq!(describe(Value::int(42).unwrap()), "0x151 (0b001) integer: 42");
        assert_eq!(describe(Value::POISON), "0x7 (0b111) invalid value: <badval>");
    }

    #[test]
    fn test_encode() {
        assert_eq!(Immediate::Int { value: -1 }.encode().unwrap(), Value::int(-1).unwrap());
        assert_eq!(Immediate::Bool { value: true }.encode().unwrap(), Value::TRUE);
        assert_eq!(Immediate::Null.encode().unwrap(), Value::NULL);
        assert!(Immediate::Char { value: 'λ' }.encode().is_err());
    }

    #[test]
    fn test_options() {
        let options = Options::parse_from([
            "tagval",
            "--heap-capacity",
            "8",
            "--max-depth",
            "4",
            "--escape-strings",
            "decode",
            "0x14",
        ]);

        assert_eq!(options.heap_config().capacity, Some(8));
        assert_eq!(options.print_options().max_depth, Some(4));
        assert!(options.print_options().escape_strings);
        assert!(matches!(options.command, Some(Command::Decode { word: 0x14 })));
    }

    #[test]
    fn test_encode_negative_int() {
        let options = Options::parse_from(["tagval", "encode", "int", "-5"]);

        assert!(matches!(
            options.command,
            Some(Command::Encode {
                immediate: Immediate::Int { value: -5 }
            })
        ));
    }
}
