//! Line-oriented input source for headless runs
//!
//! Each stdin line is one device event:
//! `down <code>`, `up <code>`, `click <x> <y>`, `resize <w> <h>`, `status`, `quit`.

use super::InputEvent;

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Input(InputEvent),
    Status,
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConsoleError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("missing argument for {0}")]
    MissingArgument(&'static str),

    #[error("invalid number {value:?} for {command}")]
    InvalidNumber {
        command: &'static str,
        value: String,
    },
}

/// Parse one console line; blank lines yield `None`
pub fn parse_line(line: &str) -> Result<Option<ConsoleCommand>, ConsoleError> {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return Ok(None);
    };

    let command = match head {
        "down" => ConsoleCommand::Input(InputEvent::KeyDown(word(parts.next(), "down")?)),
        "up" => ConsoleCommand::Input(InputEvent::KeyUp(word(parts.next(), "up")?)),
        "click" => {
            let x = number(parts.next(), "click")?;
            let y = number(parts.next(), "click")?;
            ConsoleCommand::Input(InputEvent::Click { x, y })
        }
        "resize" => {
            let width = number(parts.next(), "resize")?;
            let height = number(parts.next(), "resize")?;
            ConsoleCommand::Input(InputEvent::Resize { width, height })
        }
        "status" => ConsoleCommand::Status,
        "quit" | "exit" => ConsoleCommand::Quit,
        other => return Err(ConsoleError::UnknownCommand(other.to_string())),
    };
    Ok(Some(command))
}

fn word(part: Option<&str>, command: &'static str) -> Result<String, ConsoleError> {
    part.map(str::to_string)
        .ok_or(ConsoleError::MissingArgument(command))
}

fn number(part: Option<&str>, command: &'static str) -> Result<f64, ConsoleError> {
    let raw = part.ok_or(ConsoleError::MissingArgument(command))?;
    let invalid = || ConsoleError::InvalidNumber {
        command,
        value: raw.to_string(),
    };
    let value: f64 = raw.parse().map_err(|_| invalid())?;
    // "nan" and "inf" parse as f64 but are not surface coordinates
    if !value.is_finite() {
        return Err(invalid());
    }
    Ok(value)
}
