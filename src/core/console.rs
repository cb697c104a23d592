//! Interactive console command parser
//!
//! Grammar (case-insensitive, surrounding whitespace ignored):
//!   start <instrument> | stop <instrument> | show <instrument>
//!   tab <name> | sensitivity <0..1> | sweep | status | help | quit

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::types::{EngineError, InstrumentKind, Tab};

lazy_static! {
    static ref RE_INSTRUMENT: Regex =
        Regex::new(r"(?i)^\s*(start|stop|show)\s+([a-z-]+)\s*$").unwrap();

    static ref RE_TAB: Regex = Regex::new(r"(?i)^\s*tab\s+([a-z-]+)\s*$").unwrap();

    static ref RE_SENSITIVITY: Regex =
        Regex::new(r"(?i)^\s*(?:sensitivity|sens)\s+([-+]?[0-9]*\.?[0-9]+)\s*$").unwrap();

    static ref RE_WORD: Regex = Regex::new(r"(?i)^\s*(status|sweep|help|\?|quit|exit)\s*$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Start(InstrumentKind),
    Stop(InstrumentKind),
    Show(InstrumentKind),
    Tab(Tab),
    Sensitivity(f64),
    /// Play a radar sweep cue
    Sweep,
    Status,
    Help,
    Quit,
}

#[derive(Debug, PartialEq, Error)]
pub enum ParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),
    /// Recognized verb with a bad argument
    #[error("{0}")]
    Invalid(String),
}

fn invalid(e: EngineError) -> ParseError {
    ParseError::Invalid(e.to_string())
}

pub fn parse_command(line: &str) -> Result<Command, ParseError> {
    if line.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    if let Some(caps) = RE_INSTRUMENT.captures(line) {
        let kind: InstrumentKind = caps[2].parse().map_err(invalid)?;
        return Ok(match caps[1].to_ascii_lowercase().as_str() {
            "start" => Command::Start(kind),
            "stop" => Command::Stop(kind),
            _ => Command::Show(kind),
        });
    }

    if let Some(caps) = RE_TAB.captures(line) {
        return Ok(Command::Tab(caps[1].parse().map_err(invalid)?));
    }

    if let Some(caps) = RE_SENSITIVITY.captures(line) {
        let value: f64 = caps[1]
            .parse()
            .map_err(|_| ParseError::Invalid(format!("bad number '{}'", &caps[1])))?;
        return Ok(Command::Sensitivity(value));
    }

    if let Some(caps) = RE_WORD.captures(line) {
        return Ok(match caps[1].to_ascii_lowercase().as_str() {
            "status" => Command::Status,
            "sweep" => Command::Sweep,
            "quit" | "exit" => Command::Quit,
            _ => Command::Help,
        });
    }

    Err(ParseError::Unknown(line.trim().to_string()))
}

pub const HELP: &str = "\
Commands:
  start <emf|radar|magnetometer>   start an instrument
  stop <emf|radar|magnetometer>    stop an instrument
  show <instrument>                print the latest frame
  tab <radar|emf|spirit-box|settings>
  sensitivity <0..1>               radar sensitivity
  sweep                            play a radar sweep cue (radar tab, sound on)
  status                           running instruments and tick counts
  quit";

// =============================================================================
// TESTS
// =============================================================================
