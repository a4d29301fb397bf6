//! Demo conversations and starter prompts shown on first load

use crate::model::{Attachment, ChatId, ChatSession, Message};
use crate::responder::{
    RECESSION_REPLY, SUPERINDEX_CHART_SRC, SUPERINDEX_CHART_TITLE, SUPERINDEX_REPLY,
};

/// Prompts offered on the welcome screen
pub const STARTER_PROMPTS: [&str; 4] = [
    "Analyze current market trends",
    "Show me the SuperIndex history",
    "Is a recession likely in 2024?",
    "Explain the latest GDP report",
];

const SUPERINDEX_HISTORY_BODY: &str = "You can also view the long term history of the \
Leading SuperIndex and its associated probability of recession & recession calls. The \
leading SuperIndex below is representative of future U.S economic growth and when it drops \
below the red recession dating line, it warns of recession in 3-4 months time. The Leading \
SuperIndex forms the basis of our \u{201c}Short Leading\u{201d} recession and economic indicator.";

const SHUTDOWN_GUIDE_BODY: &str = "What\u{2019}s Really Happening and How to Protect Your \
Portfolio. Last Updated: October 27, 2025 (Day 24 of shutdown). The Bottom Line Up Front: The \
government shutdown is now in its 24th day, and it\u{2019}s different from past shutdowns in \
one critical way: Food stamp benefits (SNAP) will\u{2026}";

pub fn seed_chats() -> Vec<ChatSession> {
    vec![
        ChatSession::new(ChatId::from("chat-1"), "Recession Analysis 2024").with_messages([
            Message::user("Is a recession likely in 2024?"),
            Message::bot(RECESSION_REPLY),
        ]),
        ChatSession::new(ChatId::from("chat-2"), "SuperIndex History").with_messages([
            Message::user("Show me the historical performance of the SuperIndex."),
            Message::bot(SUPERINDEX_REPLY).with_attachments([Attachment::chart(
                SUPERINDEX_CHART_TITLE,
            )
            .with_src(SUPERINDEX_CHART_SRC)
            .with_body(SUPERINDEX_HISTORY_BODY)]),
            Message::user("What about the government shutdown?"),
            Message::bot("Here is the latest guide on the 2025 Government Shutdown:")
                .with_attachments([Attachment::article(
                    "The 2025 Government Shutdown Guide for Individual Investors",
                )
                .with_meta("By RecessionALERT on October 27, 2025")
                .with_body(SHUTDOWN_GUIDE_BODY)]),
        ]),
    ]
}
