//! Interactive yes/no prompt

use std::io::{self, BufRead, Write};

/// Ask a `[y/N]` question on stdout and read one line from stdin
///
/// Only a lone `y` or `Y` counts as yes; anything else, including EOF, is no.
pub fn confirm(question: &str) -> io::Result<bool> {
  let stdin = io::stdin();
  let mut stdout = io::stdout();
  confirm_with(question, &mut stdin.lock(), &mut stdout)
}

pub fn confirm_with(question: &str, input: &mut impl BufRead, output: &mut impl Write) -> io::Result<bool> {
  write!(output, "❓ {} [y/N] ", question)?;
  output.flush()?;

  let mut answer = String::new();
  input.read_line(&mut answer)?;
  Ok(is_affirmative(&answer))
}

fn is_affirmative(answer: &str) -> bool {
  matches!(answer.trim(), "y" | "Y")
}
