//! Confirmation prompt for `--apply`.
//!
//! Only an explicit `y` or `yes` continues. Anything else, an empty line or
//! end of input included, aborts.

use std::io::{self, BufRead, Write};

/// Answer given at the confirmation prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    /// The user typed `y` or `yes`.
    Proceed(String),
    /// Anything else; carries what was typed.
    Abort(String),
}

impl Confirmation {
    /// Interpret one line of input.
    ///
    /// Only the line terminator is stripped; the rest must be exactly `y`
    /// or `yes`.
    #[must_use]
    pub fn from_answer(answer: &str) -> Self {
        let answer = answer
            .strip_suffix('\n')
            .map_or(answer, |line| line.strip_suffix('\r').unwrap_or(line));
        if answer == "y" || answer == "yes" {
            Self::Proceed(answer.to_string())
        } else {
            Self::Abort(answer.to_string())
        }
    }

    /// Whether the run should continue.
    #[must_use]
    pub fn proceeds(&self) -> bool {
        matches!(self, Self::Proceed(_))
    }
}

/// Warn that the file system will be modified and ask for confirmation.
///
/// # Errors
///
/// Returns an I/O error if writing the prompt or reading the answer fails.
pub fn confirm_apply<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<Confirmation> {
    writeln!(output, "Make changes is set to TRUE, the file system WILL be modified!")?;
    write!(output, "Do you wish to continue? [n]: ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let confirmation = Confirmation::from_answer(&answer);

    match &confirmation {
        Confirmation::Proceed(answer) => writeln!(output, "'{answer}' received, continuing...")?,
        Confirmation::Abort(answer) => writeln!(output, "Aborting! ({answer}) received.")?,
    }

    Ok(confirmation)
}
