//! Prompt/answer helpers over any reader and writer.

use std::io::{self, BufRead, Write};

#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("input ended before answering {prompt:?}")]
    UnexpectedEof { prompt: String },
    #[error("could not convert {input:?} to a number")]
    InvalidNumber { input: String },
}

pub struct Console<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Prints `prompt` without a newline and returns the answer minus its line terminator.
    pub fn ask(&mut self, prompt: &str) -> Result<String, ConsoleError> {
        write!(self.writer, "{prompt}")?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(ConsoleError::UnexpectedEof {
                prompt: prompt.trim().to_string(),
            });
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(line)
    }

    /// Like [`Console::ask`] but the answer must parse as a number.
    pub fn ask_number(&mut self, prompt: &str) -> Result<f64, ConsoleError> {
        let answer = self.ask(prompt)?;
        let parsed = answer.trim().parse::<f64>();
        parsed.map_err(|_| ConsoleError::InvalidNumber { input: answer })
    }

    pub fn line(&mut self, text: impl std::fmt::Display) -> Result<(), ConsoleError> {
        writeln!(self.writer, "{text}")?;
        Ok(())
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn ask_strips_only_the_line_terminator() {
        let mut console = console(" Loamy \r\nnext\n");
        assert_eq!(console.ask("Soil: ").unwrap(), " Loamy ");
        assert_eq!(console.ask("Again: ").unwrap(), "next");
        let written = String::from_utf8(console.into_writer()).unwrap();
        assert_eq!(written, "Soil: Again: ");
    }

    #[test]
    fn last_line_without_newline_is_accepted() {
        let mut console = console("yes");
        assert_eq!(console.ask("Continue? ").unwrap(), "yes");
    }

    #[test]
    fn numbers_tolerate_surrounding_whitespace() {
        let mut console = console("  42.5 \n-3\n");
        assert_eq!(console.ask_number("N: ").unwrap(), 42.5);
        assert_eq!(console.ask_number("M: ").unwrap(), -3.0);
    }

    #[test]
    fn non_numeric_answer_is_an_error() {
        let mut console = console("plenty\n");
        let err = console.ask_number("N: ").unwrap_err();
        assert!(matches!(err, ConsoleError::InvalidNumber { input } if input == "plenty"));
    }

    #[test]
    fn eof_is_an_error() {
        let mut console = console("");
        assert!(matches!(
            console.ask("Location: "),
            Err(ConsoleError::UnexpectedEof { .. })
        ));
    }
}
