//! Console command protocol.
//!
//! A line whose first non-whitespace character is `/` is a command; any other
//! non-blank line is a question. Blank lines parse to `None`.

use std::path::PathBuf;

use super::selection::{Depth, RefinementMode, Style, Subject};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Pdf,
    /// Every record of the session, answers included.
    Csv,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ask(String),
    /// Re-ask with a refinement; `None` repeats the last question.
    Refine {
        mode: RefinementMode,
        question: Option<String>,
    },
    Subject(Subject),
    Depth(Depth),
    Style(Style),
    /// `None` clears the topic.
    Topic(Option<String>),
    History,
    Summary,
    Export {
        format: ExportFormat,
        path: Option<PathBuf>,
    },
    Reset,
    Status,
    Help,
    Exit,
}

pub const USAGE: &str = "\
commands:
  <question>                 ask a question
  /ask <question>            ask a question
  /simpler [question]        re-explain the last (or given) question more simply
  /examples [question]       re-explain with more examples
  /subject <name>            General | Math | Science | Computer Science | Economics
  /depth <name>              Basic | Intermediate | Detailed
  /style <name>              Simple | Step-by-Step | Concept Breakdown
  /topic [text]              set the topic (no text clears it)
  /history                   show this session's transcript
  /summary                   show the session summary
  /export text|pdf [path]    write the summary to a file
  /export csv [path]         write the session's questions and answers as CSV
  /reset                     start a new session
  /status                    show selections and counts
  /help                      show this help
  /exit                      quit";

pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let Some(cmdline) = trimmed.strip_prefix('/') else {
        return Ok(Some(Command::Ask(trimmed.to_string())));
    };

    let mut parts = cmdline.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or_default().trim();
    let rest = parts.next().unwrap_or_default().trim();

    match command.to_ascii_lowercase().as_str() {
        "ask" => Ok(Some(Command::Ask(rest.to_string()))),
        "simpler" => Ok(Some(refine(RefinementMode::Simpler, rest))),
        "examples" | "more" => Ok(Some(refine(RefinementMode::MoreExamples, rest))),
        "subject" => required(rest, "/subject <name>")?.parse().map(|s| Some(Command::Subject(s))),
        "depth" => required(rest, "/depth <name>")?.parse().map(|d| Some(Command::Depth(d))),
        "style" => required(rest, "/style <name>")?.parse().map(|s| Some(Command::Style(s))),
        "topic" => Ok(Some(Command::Topic(non_empty(rest)))),
        "history" => ensure_no_args(rest, Command::History),
        "summary" => ensure_no_args(rest, Command::Summary),
        "export" => parse_export(rest).map(Some),
        "reset" => ensure_no_args(rest, Command::Reset),
        "status" => ensure_no_args(rest, Command::Status),
        "help" => ensure_no_args(rest, Command::Help),
        "exit" | "quit" => ensure_no_args(rest, Command::Exit),
        "" => Err("usage: /<command> [args]".to_string()),
        other => Err(format!("unknown command: /{other} (try /help)")),
    }
}

fn refine(mode: RefinementMode, rest: &str) -> Command {
    Command::Refine { mode, question: non_empty(rest) }
}

fn parse_export(rest: &str) -> Result<Command, String> {
    let mut parts = rest.splitn(2, char::is_whitespace);
    let format = match parts.next().unwrap_or_default().to_ascii_lowercase().as_str() {
        "text" | "txt" => ExportFormat::Text,
        "pdf" => ExportFormat::Pdf,
        "csv" => ExportFormat::Csv,
        _ => return Err("usage: /export text|pdf|csv [path]".to_string()),
    };
    let path = non_empty(parts.next().unwrap_or_default()).map(PathBuf::from);
    Ok(Command::Export { format, path })
}

fn required<'a>(rest: &'a str, usage: &str) -> Result<&'a str, String> {
    if rest.is_empty() {
        Err(format!("usage: {usage}"))
    } else {
        Ok(rest)
    }
}

fn non_empty(rest: &str) -> Option<String> {
    let rest = rest.trim();
    (!rest.is_empty()).then(|| rest.to_string())
}

fn ensure_no_args(rest: &str, command: Command) -> Result<Option<Command>, String> {
    if rest.is_empty() {
        Ok(Some(command))
    } else {
        Err("unexpected arguments".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_line_is_none() {
        assert_eq!(parse_command("   "), Ok(None));
    }

    #[test]
    fn plain_text_is_a_question() {
        assert_eq!(
            parse_command("  Why do leaves look green? "),
            Ok(Some(Command::Ask("Why do leaves look green?".into())))
        );
    }

    #[test]
    fn ask_without_text_reaches_handler() {
        assert_eq!(parse_command("/ask"), Ok(Some(Command::Ask(String::new()))));
    }

    #[test]
    fn refine_with_and_without_question() {
        assert_eq!(
            parse_command("/simpler"),
            Ok(Some(Command::Refine { mode: RefinementMode::Simpler, question: None }))
        );
        assert_eq!(
            parse_command("/examples what is GDP?"),
            Ok(Some(Command::Refine {
                mode: RefinementMode::MoreExamples,
                question: Some("what is GDP?".into()),
            }))
        );
    }

    #[test]
    fn selections_parse_multi_word_names() {
        assert_eq!(
            parse_command("/subject computer science"),
            Ok(Some(Command::Subject(Subject::ComputerScience)))
        );
        assert_eq!(parse_command("/style step-by-step"), Ok(Some(Command::Style(Style::StepByStep))));
        assert_eq!(parse_command("/DEPTH detailed"), Ok(Some(Command::Depth(Depth::Detailed))));
    }

    #[test]
    fn selection_errors_are_reported() {
        assert!(parse_command("/subject").unwrap_err().starts_with("usage:"));
        assert!(parse_command("/depth expert").unwrap_err().contains("unknown depth"));
    }

    #[test]
    fn topic_set_and_clear() {
        assert_eq!(
            parse_command("/topic Photosynthesis"),
            Ok(Some(Command::Topic(Some("Photosynthesis".into()))))
        );
        assert_eq!(parse_command("/topic"), Ok(Some(Command::Topic(None))));
    }

    #[test]
    fn export_formats_and_paths() {
        assert_eq!(
            parse_command("/export pdf"),
            Ok(Some(Command::Export { format: ExportFormat::Pdf, path: None }))
        );
        assert_eq!(
            parse_command("/export text /tmp/my notes.txt"),
            Ok(Some(Command::Export {
                format: ExportFormat::Text,
                path: Some(PathBuf::from("/tmp/my notes.txt")),
            }))
        );
        assert_eq!(
            parse_command("/export CSV"),
            Ok(Some(Command::Export { format: ExportFormat::Csv, path: None }))
        );
        assert_eq!(
            parse_command("/export docx"),
            Err("usage: /export text|pdf|csv [path]".to_string())
        );
    }

    #[test]
    fn no_arg_commands_reject_arguments() {
        assert_eq!(parse_command("/reset"), Ok(Some(Command::Reset)));
        assert_eq!(parse_command("/status extra"), Err("unexpected arguments".to_string()));
    }

    #[test]
    fn unknown_and_bare_slash() {
        assert_eq!(parse_command("/"), Err("usage: /<command> [args]".to_string()));
        assert!(parse_command("/frobnicate").unwrap_err().contains("unknown command: /frobnicate"));
    }
}
