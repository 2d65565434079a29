use std::{
    fmt::Display,
    io::{BufRead, Write},
};

use anyhow::{Result, bail};

/// Asks for values on a line-oriented terminal, re-asking until one parses.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prompts for `label` until `parse` accepts the answer.
    ///
    /// Fails if the input ends before a valid value is given.
    pub fn ask<T, E: Display>(
        &mut self,
        label: &str,
        parse: impl Fn(&str) -> Result<T, E>,
    ) -> Result<T> {
        loop {
            write!(self.output, "{label}: ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                bail!("input ended before a value was given for {label}");
            }

            match parse(line.trim()) {
                Ok(value) => return Ok(value),
                Err(error) => writeln!(self.output, "  {error}; please try again")?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    fn number(s: &str) -> Result<u32, String> {
        s.parse().map_err(|_| format!("`{s}` is not a whole number"))
    }

    #[test]
    fn re_asks_until_valid() {
        let mut output = Vec::new();
        let mut prompter = Prompter::new(Cursor::new("ten\n\n 10 \n"), &mut output);

        assert_eq!(prompter.ask("count", number).unwrap(), 10);

        let transcript = String::from_utf8(output).unwrap();
        assert_eq!(transcript.matches("count: ").count(), 3);
        assert!(transcript.contains("`ten` is not a whole number; please try again"));
    }

    #[test]
    fn fails_at_end_of_input() {
        let mut prompter = Prompter::new(Cursor::new("x\n"), Vec::new());
        let error = prompter.ask("count", number).unwrap_err();
        assert!(error.to_string().contains("count"));
    }
}
