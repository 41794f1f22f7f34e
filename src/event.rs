// UI events and the interactive shell's line grammar

use eyre::{Result, eyre};

/// Events the UI surface emits
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    SubmitDraft(String),
    Toggle(i64),
    BeginEdit(i64),
    Delete(i64),
    DraftChanged(String),
}

/// One parsed line of shell input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellInput {
    Event(Event),
    /// Submit the current draft
    Submit,
    List,
    Help,
    Quit,
}

pub const SHELL_HELP: &str = "\
Commands:
  add <text>     submit <text> (adds, or updates the task under edit)
  draft <text>   replace the draft
  submit         submit the current draft
  edit <id>      load a task into the draft for editing
  toggle <id>    flip a task's completed flag
  rm <id>        delete a task
  list           show the list
  help           show this help
  quit           leave the shell";

/// Parse one line of shell input; blank lines yield `None`
pub fn parse_line(line: &str) -> Result<Option<ShellInput>> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    if trimmed.trim().is_empty() {
        return Ok(None);
    }

    let (cmd, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest),
        None => (trimmed, ""),
    };

    let input = match cmd {
        "add" | "a" => ShellInput::Event(Event::SubmitDraft(rest.to_string())),
        "draft" | "d" => ShellInput::Event(Event::DraftChanged(rest.to_string())),
        "submit" | "s" => ShellInput::Submit,
        "edit" | "e" => ShellInput::Event(Event::BeginEdit(parse_id(rest)?)),
        "toggle" | "t" => ShellInput::Event(Event::Toggle(parse_id(rest)?)),
        "rm" | "delete" => ShellInput::Event(Event::Delete(parse_id(rest)?)),
        "list" | "ls" => ShellInput::List,
        "help" | "?" => ShellInput::Help,
        "quit" | "exit" | "q" => ShellInput::Quit,
        other => return Err(eyre!("Unknown command: {} (try `help`)", other)),
    };

    Ok(Some(input))
}

fn parse_id(arg: &str) -> Result<i64> {
    let arg = arg.trim();
    if arg.is_empty() {
        return Err(eyre!("Missing task id"));
    }
    arg.parse().map_err(|_| eyre!("Invalid task id: {}", arg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add_keeps_text() {
        let input = parse_line("add Buy  milk ").unwrap();
        assert_eq!(input, Some(ShellInput::Event(Event::SubmitDraft("Buy  milk ".to_string()))));
    }

    #[test]
    fn test_parse_add_without_text() {
        let input = parse_line("add").unwrap();
        assert_eq!(input, Some(ShellInput::Event(Event::SubmitDraft(String::new()))));
    }

    #[test]
    fn test_parse_id_commands() {
        assert_eq!(
            parse_line("edit 2").unwrap(),
            Some(ShellInput::Event(Event::BeginEdit(2)))
        );
        assert_eq!(parse_line("t 3").unwrap(), Some(ShellInput::Event(Event::Toggle(3))));
        assert_eq!(
            parse_line("rm 1700000000000\n").unwrap(),
            Some(ShellInput::Event(Event::Delete(1_700_000_000_000)))
        );
    }

    #[test]
    fn test_parse_bad_id() {
        assert!(parse_line("toggle abc").is_err());
        assert!(parse_line("rm").is_err());
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(parse_line("list").unwrap(), Some(ShellInput::List));
        assert_eq!(parse_line("submit").unwrap(), Some(ShellInput::Submit));
        assert_eq!(parse_line("quit").unwrap(), Some(ShellInput::Quit));
        assert!(parse_line("frobnicate").is_err());
    }
}
