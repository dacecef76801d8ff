// src/exec/command_line.rs

//! Argument vectors for submission commands.
//!
//! Task commands are written as shell-like lines. They are split into words
//! the way a POSIX shell would (quotes removed, nothing expanded) and run
//! without a shell. `Display` quotes the words again so a printed command
//! can be pasted into a terminal.

use std::fmt;

/// A program followed by its arguments, already unquoted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine {
    argv: Vec<String>,
}

impl CommandLine {
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn program(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }

    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or_default()
    }

    pub fn into_argv(self) -> Vec<String> {
        self.argv
    }
}

impl From<Vec<String>> for CommandLine {
    fn from(argv: Vec<String>) -> Self {
        Self::new(argv)
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, word) in self.argv.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(&quote(word))?;
        }
        Ok(())
    }
}

/// Split a command line into words with POSIX shell quoting rules.
///
/// - Whitespace separates words.
/// - Inside `'...'` every character is literal.
/// - Inside `"..."` a backslash only escapes `"` and `\`.
/// - Outside quotes a backslash makes the next character literal.
///
/// An unterminated quote or a trailing backslash is an error.
pub fn split_words(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match quote {
            Some('\'') => {
                if c == '\'' {
                    quote = None;
                } else {
                    current.push(c);
                }
            }
            Some(_) => match c {
                '"' => quote = None,
                '\\' => match chars.peek() {
                    Some(&next) if next == '"' || next == '\\' => {
                        current.push(next);
                        chars.next();
                    }
                    _ => current.push('\\'),
                },
                _ => current.push(c),
            },
            None => match c {
                c if c.is_whitespace() => {
                    if in_word {
                        words.push(std::mem::take(&mut current));
                        in_word = false;
                    }
                }
                '\'' | '"' => {
                    quote = Some(c);
                    in_word = true;
                }
                '\\' => {
                    let next = chars
                        .next()
                        .ok_or_else(|| "trailing backslash in command".to_string())?;
                    current.push(next);
                    in_word = true;
                }
                _ => {
                    current.push(c);
                    in_word = true;
                }
            },
        }
    }

    if let Some(q) = quote {
        return Err(format!("unterminated {q} quote in command"));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

fn is_plain(c: char) -> bool {
    c.is_alphanumeric() || "_@%+=:,./-".contains(c)
}

/// Quote `word` for a POSIX shell if it needs it.
fn quote(word: &str) -> String {
    if word.is_empty() {
        return "''".to_string();
    }
    if word.chars().all(is_plain) {
        return word.to_string();
    }
    format!("'{}'", word.replace('\'', r#"'"'"'"#))
}
