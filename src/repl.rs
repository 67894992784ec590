//! A small stack machine to poke at values by hand. Each line is one
//! command; constructors push onto the stack and `cons` pops two entries.
//!
//! ```text
//! > int 1
//! > int 2
//! > null
//! > cons
//! > cons
//! > print
//! (1 . (2 . null))
//! ```

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use thiserror::Error;

use crate::cli::{describe, parse_word, Options};
use crate::value::{Heap, PrintOptions, Value};

const HELP: &str = "\
int N | char C | double F | string TEXT | symbol NAME | true | false | null | word BITS
cons | print | classify | bits | stack | pop | clear | help";

#[derive(Error, miette::Diagnostic, Debug, Clone, PartialEq)]
pub enum ConsoleError {
    #[error("unknown command '{0}', try 'help'")]
    #[diagnostic(code(tagval::repl::unknown))]
    UnknownCommand(String),

    #[error("'{0}' needs an argument")]
    #[diagnostic(code(tagval::repl::missing_argument))]
    MissingArgument(&'static str),

    #[error("cannot read '{text}' as {expected}")]
    #[diagnostic(code(tagval::repl::bad_argument))]
    BadArgument { text: String, expected: &'static str },

    #[error("the stack is empty")]
    #[diagnostic(code(tagval::repl::empty_stack))]
    EmptyStack,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Runtime(#[from] crate::error::Error),
}

pub type Result<T, E = ConsoleError> = std::result::Result<T, E>;

pub struct Console {
    heap: Heap,
    stack: Vec<Value>,
    options: PrintOptions,
}

impl Console {
    pub fn new(options: &Options) -> Self {
        Self {
            heap: Heap::with_config(&options.heap_config()),
            stack: Vec::new(),
            options: options.print_options(),
        }
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn stack(&self) -> &[Value] {
        &self.stack
    }

    /// Runs one line. Returns the text to show, if any.
    pub fn eval(&mut self, line: &str) -> Result<Option<String>> {
        let line = line.trim();
        let (command, argument) = match line.split_once(char::is_whitespace) {
            Some((command, argument)) => (command, Some(argument.trim_start())),
            None => (line, None),
        };

        let pushed = match command {
            "" => return Ok(None),
            "int" => {
                let text = require("int", argument)?;
                let n = text.parse::<i64>().map_err(|_| bad(text, "an integer"))?;
                Value::int(n)?
            }
            "char" => {
                let text = require("char", argument)?;
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Value::try_from(c)?,
                    _ => return Err(bad(text, "a single character")),
                }
            }
            "double" => {
                let text = require("double", argument)?;
                let f = text.parse::<f64>().map_err(|_| bad(text, "a float"))?;
                self.heap.make_double(f)?
            }
            "string" => self.heap.make_string(argument.unwrap_or(""))?,
            "symbol" => self.heap.make_symbol(require("symbol", argument)?)?,
            "true" => Value::TRUE,
            "false" => Value::FALSE,
            "null" => Value::NULL,
            "word" => {
                let text = require("word", argument)?;
                Value::from_bits(parse_word(text).map_err(|_| bad(text, "a word"))?)
            }
            "cons" => {
                let cdr = self.pop()?;
                let car = match self.pop() {
                    Ok(car) => car,
                    Err(err) => {
                        self.stack.push(cdr);
                        return Err(err);
                    }
                };
                self.heap.make_pair(car, cdr)?
            }
            "print" => {
                let top = self.top()?;
                let text = self.heap.printer(self.options).print(top)?;
                return Ok(Some(text));
            }
            "classify" => {
                let top = self.top()?;
                return Ok(Some(self.heap.classify(top).name().to_string()));
            }
            "bits" => return Ok(Some(describe(self.top()?))),
            "stack" => {
                let lines = self
                    .stack
                    .iter()
                    .enumerate()
                    .map(|(i, value)| format!("{i}: {}", value.unpack()))
                    .collect::<Vec<_>>();
                return Ok(Some(lines.join("\n")));
            }
            "pop" => {
                self.pop()?;
                return Ok(None);
            }
            "clear" => {
                self.stack.clear();
                return Ok(None);
            }
            "help" => return Ok(Some(HELP.to_string())),
            other => return Err(ConsoleError::UnknownCommand(other.to_string())),
        };

        self.stack.push(pushed);
        Ok(None)
    }

    fn pop(&mut self) -> Result<Value> {
        self.stack.pop().ok_or(ConsoleError::EmptyStack)
    }

    fn top(&self) -> Result<Value> {
        self.stack.last().copied().ok_or(ConsoleError::EmptyStack)
    }
}

fn require<'a>(command: &'static str, argument: Option<&'a str>) -> Result<&'a str> {
    argument
        .filter(|text| !text.is_empty())
        .ok_or(ConsoleError::MissingArgument(command))
}

fn bad(text: &str, expected: &'static str) -> ConsoleError {
    ConsoleError::BadArgument {
        text: text.to_string(),
        expected,
    }
}

pub fn run(options: &Options) -> Result<(), ReadlineError> {
    let mut rl = DefaultEditor::new()?;
    let mut console = Console::new(options);

    loop {
        match rl.readline("> ") {
            Ok(line) => {
                rl.add_history_entry(line.as_str())?;

                match console.eval(&line) {
                    Ok(Some(text)) => println!("{text}"),
                    Ok(None) => {}
                    Err(err) => println!("error: {err}"),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("Bye bye...");
                break;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err),
        }
    }

    Ok(())
}
