use std::io::{self, BufRead, Write};

use crate::gradient::GradientText;

/// A validator takes the raw answer and either accepts it or rejects it with
/// the message shown to the user before the prompt re-asks.
pub type Validator = fn(&str) -> Result<(), &'static str>;

pub fn not_empty(text: &str) -> Result<(), &'static str> {
    if text.trim().is_empty() {
        Err("This input can not be empty string!")
    } else {
        Ok(())
    }
}

pub fn digits(text: &str) -> Result<(), &'static str> {
    if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err("This input contains non-numeric characters!")
    }
}

pub fn any(_text: &str) -> Result<(), &'static str> {
    Ok(())
}

/// Splits a space separated answer into its tokens, dropping empty ones.
pub fn split_tokens(text: &str) -> Vec<String> {
    text.split_whitespace().map(String::from).collect()
}

/// Blocking question/answer loop over any buffered reader. The interactive
/// path hands it a locked stdin; tests feed it a `Cursor`.
pub struct Prompter<R> {
    input: R,
}

impl<R: BufRead> Prompter<R> {
    pub fn new(input: R) -> Self {
        Prompter { input }
    }

    /// Asks until the validator accepts the answer. Returns the answer with
    /// the line ending stripped; closed input is an error, not a retry.
    pub fn ask(&mut self, question: &str, validate: Validator) -> io::Result<String> {
        loop {
            print!("{}", GradientText::question(question));
            io::stdout().flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "input closed before the wizard finished",
                ));
            }

            let answer = line.trim_end_matches(['\r', '\n']).to_string();
            match validate(&answer) {
                Ok(()) => return Ok(answer),
                Err(message) => println!("{}", GradientText::error(&format!("! {}", message))),
            }
        }
    }

    pub fn ask_free(&mut self, question: &str) -> io::Result<String> {
        self.ask(question, any)
    }

    /// Asks until the answer matches one of the choices exactly.
    pub fn ask_choice(&mut self, question: &str, choices: &[&str]) -> io::Result<String> {
        loop {
            let answer = self.ask(question, not_empty)?;
            let answer = answer.trim();
            if choices.contains(&answer) {
                return Ok(answer.to_string());
            }
            println!(
                "{}",
                GradientText::error(&format!("! Expected one of: {}", choices.join(", ")))
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn not_empty_rejects_blank_input() {
        assert!(not_empty("").is_err());
        assert!(not_empty("   ").is_err());
        assert!(not_empty("\t \t").is_err());
        assert!(not_empty("right").is_ok());
        assert!(not_empty(" right ").is_ok());
    }

    #[test]
    fn digits_accepts_only_decimal_numbers() {
        assert!(digits("e").is_err());
        assert!(digits("").is_err());
        assert!(digits("12a").is_err());
        assert!(digits(" 3").is_err());
        assert!(digits("1994").is_ok());
        assert!(digits("0").is_ok());
    }

    #[test]
    fn split_tokens_drops_empty_tokens() {
        assert_eq!(split_tokens("a    b  c "), ["a", "b", "c"]);
        assert_eq!(split_tokens("   "), Vec::<String>::new());
    }

    #[test]
    fn split_tokens_is_idempotent_on_normalized_input() {
        let tokens = split_tokens("a    b  c ");
        let rejoined = tokens.join(" ");
        assert_eq!(split_tokens(&rejoined), tokens);
    }

    #[test]
    fn ask_reprompts_until_valid() {
        let mut prompter = Prompter::new(Cursor::new("\n   \nweb\n"));
        let answer = prompter.ask("? name: ", not_empty).unwrap();
        assert_eq!(answer, "web");
    }

    #[test]
    fn ask_keeps_the_answer_verbatim() {
        let mut prompter = Prompter::new(Cursor::new("nginx:latest\r\n"));
        let answer = prompter.ask("? image: ", not_empty).unwrap();
        assert_eq!(answer, "nginx:latest");
    }

    #[test]
    fn ask_fails_on_closed_input() {
        let mut prompter = Prompter::new(Cursor::new(""));
        let err = prompter.ask("? name: ", not_empty).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn ask_choice_rejects_unknown_values() {
        let mut prompter = Prompter::new(Cursor::new("pod\nservice\n"));
        let answer = prompter
            .ask_choice("? kind: ", &["deployment", "service", "ingress"])
            .unwrap();
        assert_eq!(answer, "service");
    }
}
