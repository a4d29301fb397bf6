//! Terminal host: stdin as the input source, stdout as the view

mod command;
mod render;

pub use command::{parse_command, Command, CommandError, HELP};
pub use render::TerminalRenderer;

use crate::widget::{InputSource, UserAction, WidgetHandle};
use async_trait::async_trait;
use crossterm::style::Stylize;
use std::io::{self, BufRead};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;

const COMMAND_QUEUE_SIZE: usize = 16;

/// Read commands from stdin on a plain thread.
///
/// A blocking Tokio stdin read cannot be cancelled and would hold up runtime
/// shutdown; this thread is abandoned at process exit instead.
pub fn spawn_stdin_reader() -> mpsc::Receiver<Command> {
    let (tx, rx) = mpsc::channel(COMMAND_QUEUE_SIZE);
    let spawned = std::thread::Builder::new()
        .name("ra-chat-stdin".to_string())
        .spawn(move || read_commands(io::stdin().lock(), &tx));
    if let Err(e) = spawned {
        // The sender was dropped with the closure, so the input just ends
        tracing::error!(error = %e, "Failed to start stdin reader");
    }
    rx
}

/// Parse lines from `reader` until `/quit`, end of input, or the receiving
/// side goes away. Must not be called from async code.
pub fn read_commands<R: BufRead>(reader: R, tx: &mpsc::Sender<Command>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read input");
                return;
            }
        };

        match parse_command(&line) {
            None => {}
            Some(Ok(command)) => {
                let quit = command == Command::Quit;
                if tx.blocking_send(command).is_err() || quit {
                    return;
                }
            }
            Some(Err(e)) => println!("{}", e.to_string().red()),
        }
    }
    tracing::debug!("End of input");
}

/// Turns parsed commands into widget actions; `/chats` and `/help` are
/// answered here without involving the widget
pub struct CommandInput {
    commands: ReceiverStream<Command>,
    handle: WidgetHandle,
}

impl CommandInput {
    pub fn new(commands: mpsc::Receiver<Command>, handle: WidgetHandle) -> Self {
        Self {
            commands: ReceiverStream::new(commands),
            handle,
        }
    }
}

async fn list_chats(handle: &WidgetHandle) {
    match handle.chats().await {
        Ok(chats) => {
            for chat in chats {
                println!(
                    "  {} {} ({} messages)",
                    chat.id.as_str().dim(),
                    chat.title,
                    chat.messages.len()
                );
            }
        }
        Err(e) => tracing::warn!(error = %e, "Cannot list chats"),
    }
}

#[async_trait]
impl InputSource for CommandInput {
    async fn next_action(&mut self) -> Option<UserAction> {
        while let Some(command) = self.commands.next().await {
            match command {
                Command::Action(action) => return Some(action),
                Command::ListChats => list_chats(&self.handle).await,
                Command::Help => println!("{}", HELP.dim()),
                Command::Quit => return None,
            }
        }
        None
    }
}
