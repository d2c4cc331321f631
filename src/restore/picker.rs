//! Console prompts for choosing and confirming a backup.

use std::io::{BufRead, Write};

use crate::backup::BackupFile;
use crate::error::{OpsError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Zero-based index into the listed backups.
    Chosen(usize),
    Quit,
}

pub fn print_backups<W: Write>(backups: &[BackupFile], output: &mut W) -> Result<()> {
    writeln!(output, "📋 Available backup files:")?;
    for (i, backup) in backups.iter().enumerate() {
        writeln!(output, "{}", backup.listing_line(i + 1))?;
    }
    Ok(())
}

/// Read one line; `None` on end of input.
fn read_answer<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Interpret a typed selection against `count` listed backups.
pub fn parse_selection(answer: &str, count: usize) -> Result<Selection> {
    let answer = answer.trim();
    if answer.eq_ignore_ascii_case("q") {
        return Ok(Selection::Quit);
    }

    let number: i64 = answer
        .parse()
        .map_err(|_| OpsError::Selection("Please enter a valid number".to_string()))?;

    if number < 1 || number > count as i64 {
        return Err(OpsError::Selection("Invalid selection".to_string()));
    }
    Ok(Selection::Chosen(number as usize - 1))
}

pub fn prompt_selection<R: BufRead, W: Write>(
    backups: &[BackupFile],
    input: &mut R,
    output: &mut W,
) -> Result<Selection> {
    write!(output, "\nEnter backup number to restore (or 'q' to quit): ")?;
    output.flush()?;

    match read_answer(input)? {
        Some(answer) => parse_selection(&answer, backups.len()),
        None => Ok(Selection::Quit),
    }
}

/// Only a literal `yes` (any case) confirms.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<bool> {
    write!(output, "Are you sure you want to restore this backup? (yes/no): ")?;
    output.flush()?;

    Ok(read_answer(input)?.is_some_and(|a| a.eq_ignore_ascii_case("yes")))
}
