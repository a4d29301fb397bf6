//! Line-oriented renderer writing styled text to a terminal

use crate::model::{
    Attachment, AttachmentKind, ChatId, ChatSession, ChatSummary, Message, ModelChoice, Role,
};
use crate::tour::{TargetRef, TourStepDefinition};
use crate::widget::ViewRenderer;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor, Stylize};
use std::io::{self, Stdout, Write};

/// Renders the widget as a scrolling transcript.
///
/// Redrawing the chat already on screen only prints the messages added since
/// the last draw. Output errors are logged and otherwise ignored; the widget
/// keeps running with a broken terminal.
pub struct TerminalRenderer<W: Write = Stdout> {
    container_id: String,
    out: W,
    typing: bool,
    /// Chat on screen and how many of its messages were printed
    shown: Option<(ChatId, usize)>,
}

impl TerminalRenderer<Stdout> {
    pub fn stdout(container_id: impl Into<String>) -> Self {
        Self::new(container_id, io::stdout())
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(container_id: impl Into<String>, out: W) -> Self {
        Self {
            container_id: container_id.into(),
            out,
            typing: false,
            shown: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, write: impl FnOnce(&mut W) -> io::Result<()>) {
        if let Err(e) = write(&mut self.out).and_then(|()| self.out.flush()) {
            tracing::warn!(error = %e, "Terminal write failed");
        }
    }
}

fn write_message<W: Write>(out: &mut W, message: &Message) -> io::Result<()> {
    let label = match message.role {
        Role::User => message.role.avatar_label().cyan().bold(),
        Role::Bot => message.role.avatar_label().green().bold(),
    };
    queue!(out, Print(label), Print("  "), Print(&message.text), Print("\n"))?;
    for attachment in &message.attachments {
        write_attachment(out, attachment)?;
    }
    Ok(())
}

fn write_attachment<W: Write>(out: &mut W, attachment: &Attachment) -> io::Result<()> {
    let tag = match attachment.kind {
        AttachmentKind::Chart => "[chart]",
        AttachmentKind::Article => "[article]",
    };
    queue!(
        out,
        Print("    "),
        Print(tag.magenta()),
        Print(" "),
        Print(attachment.title.as_str().bold()),
        Print("\n")
    )?;
    for line in [&attachment.meta, &attachment.src, &attachment.body]
        .into_iter()
        .flatten()
    {
        queue!(out, Print("      "), Print(line.as_str().dim()), Print("\n"))?;
    }
    Ok(())
}

impl<W: Write + Send + 'static> ViewRenderer for TerminalRenderer<W> {
    fn has_mount_point(&self, container_id: &str) -> bool {
        self.container_id == container_id
    }

    fn build_interface(&mut self, container_id: &str) {
        self.shown = None;
        let title = format!("RecessionAlert AI ({container_id})");
        self.emit(|out| {
            queue!(
                out,
                Print(title.bold()),
                Print("\n"),
                Print(super::HELP.dim()),
                Print("\n\n")
            )
        });
    }

    fn render_sidebar(&mut self, chats: &[ChatSummary]) {
        self.emit(|out| {
            queue!(out, Print("Chats".underlined()), Print("\n"))?;
            for chat in chats {
                let marker = if chat.active { "*" } else { " " };
                queue!(
                    out,
                    Print(format!(" {marker} {} ", chat.title)),
                    Print(chat.id.as_str().dim()),
                    Print("\n")
                )?;
            }
            Ok(())
        });
    }

    fn render_messages(&mut self, chat: &ChatSession) {
        let printed = match &self.shown {
            Some((id, count)) if *id == chat.id => *count,
            _ => 0,
        };
        self.shown = Some((chat.id.clone(), chat.messages.len()));

        let fresh = chat.messages.get(printed..).unwrap_or_default();
        self.emit(|out| {
            if printed == 0 {
                queue!(out, Print("\n"), Print(chat.title.as_str().bold()), Print("\n"))?;
            }
            for message in fresh {
                write_message(out, message)?;
            }
            Ok(())
        });
    }

    fn render_welcome(&mut self, prompts: &[&str]) {
        self.shown = None;
        self.emit(|out| {
            queue!(out, Print("\nHow can I help you today?\n".bold()))?;
            for (i, prompt) in prompts.iter().enumerate() {
                queue!(out, Print(format!("  {}. {prompt}\n", i + 1)))?;
            }
            Ok(())
        });
    }

    fn append_message(&mut self, message: &Message) {
        self.emit(|out| write_message(out, message));
    }

    fn append_chat_message(&mut self, chat_id: &ChatId, message: &Message) {
        if let Some((id, count)) = &mut self.shown {
            if id == chat_id {
                *count += 1;
            }
        }
        self.append_message(message);
    }

    fn show_typing_indicator(&mut self) {
        if self.typing {
            return;
        }
        self.typing = true;
        self.emit(|out| queue!(out, Print("AI is typing...".dim().italic()), Print("\n")));
    }

    fn hide_typing_indicator(&mut self) {
        self.typing = false;
    }

    fn render_model_info(&mut self, model: ModelChoice) {
        self.emit(|out| {
            queue!(
                out,
                Print("Model: ".dim()),
                Print(model.info_label()),
                Print("\n")
            )
        });
    }

    fn render_thinking(&mut self, enabled: bool) {
        let state = if enabled { "on" } else { "off" };
        self.emit(|out| queue!(out, Print(format!("Extended thinking {state}\n").dim())));
    }

    fn highlight(&mut self, target: TargetRef) {
        let region = match target {
            TargetRef::Sidebar => "chat list and model selector",
            TargetRef::InputArea => "message input",
        };
        self.emit(|out| {
            queue!(
                out,
                SetForegroundColor(Color::Yellow),
                Print(format!(">> {region}\n")),
                ResetColor
            )
        });
    }

    fn show_step_box(&mut self, step: &TourStepDefinition, is_last: bool) {
        let next = if is_last { "/next: Finish" } else { "/next: Next" };
        self.emit(|out| {
            queue!(
                out,
                SetForegroundColor(Color::Yellow),
                Print("+ "),
                ResetColor,
                Print(step.title.bold()),
                Print("\n| "),
                Print(step.text),
                Print(format!("\n+ [{next}] [/skip: Skip tour]\n").dim())
            )
        });
    }

    fn clear_tour_decorations(&mut self) {}
}
