//! Line commands typed at the terminal prompt

use crate::model::{ChatId, ModelChoice};
use crate::store::STARTER_PROMPTS;
use crate::widget::UserAction;
use thiserror::Error;

pub const HELP: &str = "/new  /chats  /select <id>  /rename <id> <title>  /prompt <1-4>  \
/model gpt|gemini  /think  /next  /skip  /tour  /quit";

/// What one line of input asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Action(UserAction),
    /// Print the chat list; handled by the input side, not the widget
    ListChats,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command: /{0}")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),
}

/// Parse one input line. Blank lines yield `None`; anything not starting
/// with `/` is a message to send.
pub fn parse_command(line: &str) -> Option<Result<Command, CommandError>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Some(Ok(Command::Action(UserAction::SendMessage {
            text: line.to_string(),
        })));
    };

    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };

    Some(parse_named(name, args))
}

fn parse_named(name: &str, args: &str) -> Result<Command, CommandError> {
    let action = match name {
        "quit" | "exit" => return Ok(Command::Quit),
        "help" => return Ok(Command::Help),
        "chats" => return Ok(Command::ListChats),
        "new" => UserAction::NewChat,
        "think" => UserAction::ToggleThinking,
        "next" => UserAction::TourNext,
        "skip" => UserAction::TourSkip,
        "tour" => UserAction::ReplayTour,

        "select" => {
            if args.is_empty() {
                return Err(CommandError::Usage("/select <id>"));
            }
            UserAction::SelectChat {
                id: ChatId::new(args),
            }
        }

        "rename" => {
            let Some((id, title)) = args.split_once(char::is_whitespace) else {
                return Err(CommandError::Usage("/rename <id> <title>"));
            };
            UserAction::RenameChat {
                id: ChatId::new(id),
                title: title.trim().to_string(),
            }
        }

        "prompt" => {
            let prompt = args
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| STARTER_PROMPTS.get(i))
                .ok_or(CommandError::Usage("/prompt <1-4>"))?;
            UserAction::PromptSelected {
                text: (*prompt).to_string(),
            }
        }

        "model" => {
            let model =
                ModelChoice::parse(args).ok_or(CommandError::Usage("/model gpt|gemini"))?;
            UserAction::SelectModel { model }
        }

        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Command::Action(action))
}
