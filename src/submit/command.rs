// src/submit/command.rs

//! Building `sbatch` argument vectors.

use tracing::warn;

use crate::exec::CommandLine;

const PARSABLE: &str = "--parsable";
const DEPENDENCY_LONG: &str = "--dependency";
const DEPENDENCY_SHORT: &str = "-d";

/// `true` for `program` itself or any path ending in it.
fn is_program(word: &str, program: &str) -> bool {
    word.rsplit('/').next() == Some(program)
}

/// Location of a dependency option already present in `words`: its index and
/// how many words it spans.
///
/// Recognised forms: `--dependency=X`, `--dependency X`, `-d X` and `-dX`.
fn find_dependency(words: &[String], from: usize) -> Option<(usize, usize)> {
    (from..words.len()).find_map(|i| {
        let word = words[i].as_str();
        if word == DEPENDENCY_LONG || word == DEPENDENCY_SHORT {
            Some((i, if i + 1 < words.len() { 2 } else { 1 }))
        } else if word.starts_with("--dependency=")
            || (word.starts_with(DEPENDENCY_SHORT) && !word.starts_with("--") && word.len() > 2)
        {
            Some((i, 1))
        } else {
            None
        }
    })
}

/// Turn the words of a user command into a complete submission command.
///
/// - `program` is prepended if the command does not already invoke it.
/// - `--parsable` is inserted right after the program unless present.
/// - With a `dependency`, `--dependency=<dependency>` goes right after
///   `--parsable`. A dependency option already in the command is replaced.
///
/// Running the result through this function again changes nothing.
pub fn build_command(words: Vec<String>, program: &str, dependency: Option<&str>) -> CommandLine {
    let mut parts = words;

    let pos = match parts.iter().position(|w| is_program(w, program)) {
        Some(pos) => pos,
        None => {
            parts.insert(0, program.to_string());
            0
        }
    };

    if !parts.iter().any(|w| w == PARSABLE) {
        parts.insert(pos + 1, PARSABLE.to_string());
    }

    if let Some(dependency) = dependency.filter(|d| !d.is_empty()) {
        let flag = format!("{DEPENDENCY_LONG}={dependency}");
        match find_dependency(&parts, pos + 1) {
            Some((at, span)) => {
                let old: Vec<String> = parts.drain(at..at + span).collect();
                if old != [flag.as_str()] {
                    warn!(
                        old = %old.join(" "),
                        new = %flag,
                        "replacing dependency option given in the task command"
                    );
                }
                parts.insert(at, flag);
            }
            None => {
                let at = if parts.get(pos + 1).map(String::as_str) == Some(PARSABLE) {
                    pos + 2
                } else {
                    pos + 1
                };
                parts.insert(at, flag);
            }
        }
    }

    CommandLine::new(parts)
}
