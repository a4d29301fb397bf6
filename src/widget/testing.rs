//! Mock implementations for testing
//!
//! These mocks drive the real runtime without a host page or a database.

use super::traits::{FlagStore, ViewRenderer};
use super::{ChatWidget, UserAction, WidgetHandle};
use crate::config::WidgetConfig;
use crate::db::DbError;
use crate::model::{ChatId, ChatSession, ChatSummary, Message, ModelChoice};
use crate::responder::KeywordResponder;
use crate::store::SessionStore;
use crate::tour::{TargetRef, TourStepDefinition, TOUR_COMPLETED_KEY};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// Recording Renderer
// ============================================================================

/// One call made by the runtime into the view
#[derive(Debug, Clone, PartialEq)]
pub enum ViewCall {
    BuildInterface(String),
    Sidebar(Vec<ChatSummary>),
    Messages(ChatSession),
    Welcome(Vec<String>),
    Append(Message),
    ChatAppend(ChatId, Message),
    ShowTyping,
    HideTyping,
    ClearInput,
    ModelInfo(ModelChoice),
    Thinking(bool),
    Highlight(TargetRef),
    StepBox { title: String, is_last: bool },
    ClearTour,
}

/// Renderer that records every call; clones share the same log
#[derive(Clone, Default)]
pub struct RecordingRenderer {
    mount_points: Vec<String>,
    calls: Arc<Mutex<Vec<ViewCall>>>,
}

impl RecordingRenderer {
    pub fn with_mount_point(id: impl Into<String>) -> Self {
        Self {
            mount_points: vec![id.into()],
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> Vec<ViewCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Most recent full render of a chat
    pub fn last_messages(&self) -> Option<ChatSession> {
        self.calls().into_iter().rev().find_map(|c| match c {
            ViewCall::Messages(chat) => Some(chat),
            _ => None,
        })
    }

    pub fn last_sidebar(&self) -> Option<Vec<ChatSummary>> {
        self.calls().into_iter().rev().find_map(|c| match c {
            ViewCall::Sidebar(rows) => Some(rows),
            _ => None,
        })
    }

    pub fn count(&self, call: &ViewCall) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    pub fn step_titles(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ViewCall::StepBox { title, .. } => Some(title),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ViewCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl ViewRenderer for RecordingRenderer {
    fn has_mount_point(&self, container_id: &str) -> bool {
        self.mount_points.iter().any(|m| m == container_id)
    }

    fn build_interface(&mut self, container_id: &str) {
        self.record(ViewCall::BuildInterface(container_id.to_string()));
    }

    fn render_sidebar(&mut self, chats: &[ChatSummary]) {
        self.record(ViewCall::Sidebar(chats.to_vec()));
    }

    fn render_messages(&mut self, chat: &ChatSession) {
        self.record(ViewCall::Messages(chat.clone()));
    }

    fn render_welcome(&mut self, prompts: &[&str]) {
        self.record(ViewCall::Welcome(
            prompts.iter().map(ToString::to_string).collect(),
        ));
    }

    fn append_message(&mut self, message: &Message) {
        self.record(ViewCall::Append(message.clone()));
    }

    fn append_chat_message(&mut self, chat_id: &ChatId, message: &Message) {
        self.record(ViewCall::ChatAppend(chat_id.clone(), message.clone()));
    }

    fn show_typing_indicator(&mut self) {
        self.record(ViewCall::ShowTyping);
    }

    fn hide_typing_indicator(&mut self) {
        self.record(ViewCall::HideTyping);
    }

    fn clear_input(&mut self) {
        self.record(ViewCall::ClearInput);
    }

    fn render_model_info(&mut self, model: ModelChoice) {
        self.record(ViewCall::ModelInfo(model));
    }

    fn render_thinking(&mut self, enabled: bool) {
        self.record(ViewCall::Thinking(enabled));
    }

    fn highlight(&mut self, target: TargetRef) {
        self.record(ViewCall::Highlight(target));
    }

    fn show_step_box(&mut self, step: &TourStepDefinition, is_last: bool) {
        self.record(ViewCall::StepBox {
            title: step.title.to_string(),
            is_last,
        });
    }

    fn clear_tour_decorations(&mut self) {
        self.record(ViewCall::ClearTour);
    }
}

// ============================================================================
// In-Memory Flags
// ============================================================================

/// In-memory flag store for testing
#[derive(Default)]
pub struct InMemoryFlags {
    values: Mutex<HashMap<(String, String), String>>,
    writes: Mutex<usize>,
}

impl InMemoryFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with the tour already marked complete for `origin`
    pub fn tour_completed(origin: &str) -> Self {
        let flags = Self::new();
        flags
            .values
            .lock()
            .unwrap()
            .insert((origin.to_string(), TOUR_COMPLETED_KEY.to_string()), "true".to_string());
        flags
    }

    pub fn value(&self, origin: &str, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap()
            .get(&(origin.to_string(), key.to_string()))
            .cloned()
    }

    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap()
    }
}

impl FlagStore for InMemoryFlags {
    fn get_flag(&self, origin: &str, key: &str) -> Result<Option<String>, DbError> {
        Ok(self.value(origin, key))
    }

    fn set_flag(&self, origin: &str, key: &str, value: &str) -> Result<(), DbError> {
        self.values
            .lock()
            .unwrap()
            .insert((origin.to_string(), key.to_string()), value.to_string());
        *self.writes.lock().unwrap() += 1;
        Ok(())
    }

    fn clear_flag(&self, origin: &str, key: &str) -> Result<(), DbError> {
        self.values
            .lock()
            .unwrap()
            .remove(&(origin.to_string(), key.to_string()));
        Ok(())
    }
}

// ============================================================================
// Test Widget Builder
// ============================================================================

pub const TEST_CONTAINER: &str = "ra-chat-test";
pub const TEST_ORIGIN: &str = "test-origin";
pub const TEST_DELAY: Duration = Duration::from_millis(800);

pub type TestChatWidget = ChatWidget<RecordingRenderer, Arc<InMemoryFlags>, KeywordResponder>;

/// Helper for building initialized test widgets with minimal boilerplate
pub struct TestWidget {
    pub widget: TestChatWidget,
    pub view: RecordingRenderer,
    pub flags: Arc<InMemoryFlags>,
}

pub struct TestWidgetBuilder {
    flags: Option<Arc<InMemoryFlags>>,
    store: SessionStore,
    first_run: bool,
}

impl TestWidget {
    pub fn builder() -> TestWidgetBuilder {
        TestWidgetBuilder {
            flags: None,
            store: SessionStore::seeded(),
            first_run: false,
        }
    }

    pub fn config() -> WidgetConfig {
        WidgetConfig::new(TEST_CONTAINER)
            .with_reply_delay(TEST_DELAY)
            .with_origin(TEST_ORIGIN)
    }

    pub fn handle(&self) -> WidgetHandle {
        self.widget.handle().expect("widget not running")
    }

    pub async fn act(&self, action: UserAction) {
        self.handle()
            .dispatch(action)
            .await
            .expect("Failed to dispatch action");
    }

    pub async fn send(&self, text: &str) {
        self.act(UserAction::SendMessage {
            text: text.to_string(),
        })
        .await;
    }

    /// Every chat, after all previously queued events were handled
    pub async fn chats(&self) -> Vec<ChatSession> {
        self.handle().chats().await.expect("Failed to read chats")
    }

    pub async fn chat(&self, id: &str) -> ChatSession {
        self.chats()
            .await
            .into_iter()
            .find(|c| c.id.as_str() == id)
            .expect("chat not found")
    }

    pub fn tour_flag(&self) -> Option<String> {
        self.flags.value(TEST_ORIGIN, TOUR_COMPLETED_KEY)
    }
}

impl TestWidgetBuilder {
    /// Start without the completion flag so the tour runs
    pub fn first_run(mut self) -> Self {
        self.first_run = true;
        self
    }

    /// Share a flag store, e.g. to simulate a reload
    pub fn flags(mut self, flags: Arc<InMemoryFlags>) -> Self {
        self.flags = Some(flags);
        self
    }

    pub fn store(mut self, store: SessionStore) -> Self {
        self.store = store;
        self
    }

    /// Build and `init` the widget; must run inside a Tokio runtime
    pub fn build(self) -> TestWidget {
        let flags = self.flags.unwrap_or_else(|| {
            Arc::new(if self.first_run {
                InMemoryFlags::new()
            } else {
                InMemoryFlags::tour_completed(TEST_ORIGIN)
            })
        });
        let view = RecordingRenderer::with_mount_point(TEST_CONTAINER);

        let mut widget =
            ChatWidget::with_store(view.clone(), flags.clone(), KeywordResponder, self.store);
        widget.init(TestWidget::config());

        TestWidget {
            widget,
            view,
            flags,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AttachmentKind, Role};
    use crate::responder::{FALLBACK_REPLY, RECESSION_REPLY, SUPERINDEX_REPLY};
    use crate::store::STARTER_PROMPTS;
    use tokio::sync::mpsc;

    async fn settle() {
        tokio::time::sleep(TEST_DELAY + Duration::from_millis(100)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_init_without_mount_point_is_noop() {
        let view = RecordingRenderer::with_mount_point("somewhere-else");
        let flags = Arc::new(InMemoryFlags::new());
        let mut widget = ChatWidget::new(view.clone(), flags.clone(), KeywordResponder);

        widget.init(TestWidget::config());
        widget.init(TestWidget::config());

        assert!(!widget.is_running());
        assert!(view.calls().is_empty());
        assert_eq!(flags.write_count(), 0);

        // Retrying with a valid container still works
        widget.init(WidgetConfig::new("somewhere-else"));
        assert!(widget.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_init_builds_welcome_screen() {
        let w = TestWidget::builder().build();

        let calls = w.view.calls();
        assert_eq!(
            calls.first(),
            Some(&ViewCall::BuildInterface(TEST_CONTAINER.to_string()))
        );
        assert!(calls.contains(&ViewCall::Welcome(
            STARTER_PROMPTS.iter().map(ToString::to_string).collect()
        )));

        let sidebar = w.view.last_sidebar().unwrap();
        assert_eq!(sidebar.len(), 2);
        assert!(sidebar.iter().all(|row| !row.active));

        // Flag was present, so no tour
        assert!(w.view.step_titles().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_init_is_ignored() {
        let mut w = TestWidget::builder().build();
        w.widget.init(TestWidget::config());

        assert_eq!(
            w.view
                .count(&ViewCall::BuildInterface(TEST_CONTAINER.to_string())),
            1
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_run_walks_tour_to_end() {
        let w = TestWidget::builder().first_run().build();
        assert_eq!(w.view.step_titles(), vec!["Welcome to RecessionAlert AI"]);

        for _ in 0..3 {
            w.act(UserAction::TourNext).await;
        }
        w.chats().await;

        assert_eq!(
            w.view.step_titles(),
            vec![
                "Welcome to RecessionAlert AI",
                "Chat History & Models",
                "Ask Questions",
            ]
        );
        let calls = w.view.calls();
        assert!(calls.contains(&ViewCall::Highlight(TargetRef::Sidebar)));
        assert!(calls.contains(&ViewCall::Highlight(TargetRef::InputArea)));
        assert!(calls.contains(&ViewCall::StepBox {
            title: "Ask Questions".to_string(),
            is_last: true,
        }));
        assert_eq!(calls.last(), Some(&ViewCall::ClearTour));
        assert_eq!(w.tour_flag().as_deref(), Some("true"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_completed_tour_not_replayed_after_reload() {
        let first = TestWidget::builder().first_run().build();
        first.act(UserAction::TourSkip).await;
        first.chats().await;
        assert!(first.tour_flag().is_some());

        let reloaded = TestWidget::builder().flags(first.flags.clone()).build();
        assert!(reloaded.view.step_titles().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_skip_twice_keeps_flag() {
        let w = TestWidget::builder().first_run().build();
        w.act(UserAction::TourNext).await;
        w.act(UserAction::TourSkip).await;
        w.act(UserAction::TourSkip).await;
        w.chats().await;

        assert_eq!(w.tour_flag().as_deref(), Some("true"));
        assert_eq!(w.flags.write_count(), 2);
        assert_eq!(
            w.view.count(&ViewCall::StepBox {
                title: "Chat History & Models".to_string(),
                is_last: false,
            }),
            1
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_recession_reply_after_delay() {
        let w = TestWidget::builder().build();

        w.send("Is a recession likely?").await;
        let chats = w.chats().await;

        // User message is visible before the delay starts
        let new_chat = chats.last().unwrap();
        assert_eq!(new_chat.title, "Is a recession likely?");
        assert_eq!(new_chat.messages, vec![Message::user("Is a recession likely?")]);
        assert_eq!(w.view.last_messages().unwrap().messages.len(), 1);
        assert_eq!(w.view.calls().last(), Some(&ViewCall::ShowTyping));

        settle().await;

        let chat = w.chat(new_chat.id.as_str()).await;
        assert_eq!(chat.messages.len(), 2);
        let reply = &chat.messages[1];
        assert_eq!(reply.role, Role::Bot);
        assert_eq!(reply.text, RECESSION_REPLY);
        assert!(reply.attachments.is_empty());

        // Appended below the history rather than redrawn
        assert_eq!(w.view.last_messages().unwrap().messages.len(), 1);
        let expected = [
            ViewCall::HideTyping,
            ViewCall::ChatAppend(chat.id.clone(), reply.clone()),
        ];
        assert!(w.view.calls().ends_with(&expected));
    }

    #[tokio::test(start_paused = true)]
    async fn test_host_message_survives_reply() {
        let w = TestWidget::builder().build();
        w.send("hello").await;
        w.widget.add_message(Role::Bot, "Market closes early today");
        w.chats().await;

        settle().await;
        w.chats().await;

        let calls = w.view.calls();
        let injected = calls
            .iter()
            .position(|c| *c == ViewCall::Append(Message::bot("Market closes early today")))
            .unwrap();
        let after = calls.get(injected..).unwrap();
        assert!(after.iter().all(|c| !matches!(c, ViewCall::Messages(_))));
        assert!(after
            .iter()
            .any(|c| matches!(c, ViewCall::ChatAppend(_, m) if m.text == FALLBACK_REPLY)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_replay_tour_forgets_completion() {
        let w = TestWidget::builder().build();
        assert!(w.tour_flag().is_some());

        w.act(UserAction::ReplayTour).await;
        w.chats().await;

        assert_eq!(w.tour_flag(), None);
        assert_eq!(w.view.step_titles(), vec!["Welcome to RecessionAlert AI"]);

        w.act(UserAction::TourSkip).await;
        w.chats().await;
        assert_eq!(w.tour_flag().as_deref(), Some("true"));
    }

    #[test]
    fn test_init_outside_runtime_is_noop() {
        let view = RecordingRenderer::with_mount_point(TEST_CONTAINER);
        let mut widget = ChatWidget::new(view.clone(), InMemoryFlags::new(), KeywordResponder);

        widget.init(TestWidget::config());

        assert!(!widget.is_running());
        assert!(view.calls().is_empty());

        // Still usable once a runtime exists
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async {
            widget.init(TestWidget::config());
            assert!(widget.is_running());
            widget.shutdown().await;
        });
    }

    #[tokio::test(start_paused = true)]
    async fn test_superindex_reply_has_chart() {
        let w = TestWidget::builder().build();
        w.act(UserAction::SelectChat {
            id: ChatId::from("chat-1"),
        })
        .await;

        w.send("show me superindex data").await;
        settle().await;

        let chat = w.chat("chat-1").await;
        let reply = chat.messages.last().unwrap();
        assert_eq!(reply.text, SUPERINDEX_REPLY);
        assert_eq!(reply.attachments.len(), 1);
        assert_eq!(reply.attachments[0].kind, AttachmentKind::Chart);
        assert_eq!(reply.attachments[0].title, "SuperIndex History");
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_lands_in_original_chat_after_switch() {
        let w = TestWidget::builder().build();
        w.act(UserAction::SelectChat {
            id: ChatId::from("chat-1"),
        })
        .await;
        w.send("hello").await;
        w.act(UserAction::SelectChat {
            id: ChatId::from("chat-2"),
        })
        .await;
        w.chats().await;
        w.view.clear();

        settle().await;

        let chat_1 = w.chat("chat-1").await;
        assert_eq!(chat_1.messages.len(), 4);
        assert_eq!(chat_1.messages[3].text, FALLBACK_REPLY);
        assert_eq!(w.chat("chat-2").await.messages.len(), 4);

        // chat-2 stays on screen untouched
        assert!(w.view.last_messages().is_none());
        assert!(!w
            .view
            .calls()
            .iter()
            .any(|c| matches!(c, ViewCall::ChatAppend(..))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_send_is_rejected() {
        let w = TestWidget::builder().build();
        w.send("first").await;
        w.send("second").await;

        settle().await;

        let chat = w.chats().await.pop().unwrap();
        let texts: Vec<&str> = chat.messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["first", FALLBACK_REPLY]);

        // Accepted again once the reply has arrived
        w.send("third").await;
        settle().await;
        assert_eq!(w.chats().await.pop().unwrap().messages.len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_replies_in_two_chats() {
        let w = TestWidget::builder().build();
        w.act(UserAction::SelectChat {
            id: ChatId::from("chat-1"),
        })
        .await;
        w.send("recession").await;
        w.act(UserAction::SelectChat {
            id: ChatId::from("chat-2"),
        })
        .await;
        w.send("superindex").await;

        settle().await;

        assert_eq!(
            w.chat("chat-1").await.messages.last().unwrap().text,
            RECESSION_REPLY
        );
        assert_eq!(
            w.chat("chat-2").await.messages.last().unwrap().text,
            SUPERINDEX_REPLY
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_message_bypasses_store() {
        let w = TestWidget::builder().build();

        w.widget.add_message(Role::Bot, "Injected by host");
        let chats = w.chats().await;

        assert!(w
            .view
            .calls()
            .contains(&ViewCall::Append(Message::bot("Injected by host"))));
        assert!(chats
            .iter()
            .all(|c| c.messages.iter().all(|m| m.text != "Injected by host")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_unknown_chat_changes_nothing() {
        let w = TestWidget::builder().build();
        w.act(UserAction::SelectChat {
            id: ChatId::from("chat-2"),
        })
        .await;
        w.chats().await;
        w.view.clear();

        w.act(UserAction::SelectChat {
            id: ChatId::from("chat-missing"),
        })
        .await;
        w.send("still here?").await;
        w.chats().await;

        // The message went to chat-2, which is still active
        assert_eq!(w.chat("chat-2").await.messages.len(), 5);
        let sidebar = w.view.last_sidebar().unwrap();
        assert!(sidebar.iter().any(|r| r.active && r.id.as_str() == "chat-2"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rename_updates_sidebar() {
        let w = TestWidget::builder().build();
        w.act(UserAction::RenameChat {
            id: ChatId::from("chat-1"),
            title: "Outlook".to_string(),
        })
        .await;
        w.act(UserAction::RenameChat {
            id: ChatId::from("chat-2"),
            title: String::new(),
        })
        .await;
        w.chats().await;

        let titles: Vec<String> = w
            .view
            .last_sidebar()
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["Outlook", "SuperIndex History"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_model_selector_and_thinking() {
        let w = TestWidget::builder().build();
        w.act(UserAction::SelectModel {
            model: ModelChoice::Gemini,
        })
        .await;
        w.act(UserAction::ToggleThinking).await;
        w.chats().await;

        let calls = w.view.calls();
        assert!(calls.contains(&ViewCall::ModelInfo(ModelChoice::Gpt)));
        assert!(calls.contains(&ViewCall::ModelInfo(ModelChoice::Gemini)));
        assert!(calls.contains(&ViewCall::Thinking(true)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_drops_pending_reply() {
        let mut w = TestWidget::builder().build();
        let handle = w.handle();
        w.send("hello").await;
        w.chats().await;

        w.widget.shutdown().await;
        settle().await;

        assert!(!w.widget.is_running());
        assert!(handle.chats().await.is_err());
        assert!(w
            .view
            .last_messages()
            .is_some_and(|chat| chat.messages.len() == 1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_input_source_drives_widget() {
        let w = TestWidget::builder().build();
        let (tx, rx) = mpsc::channel(8);
        let pump = w.handle().attach_input(rx);

        tx.send(UserAction::PromptSelected {
            text: STARTER_PROMPTS[2].to_string(),
        })
        .await
        .unwrap();
        drop(tx);
        pump.await.unwrap();
        settle().await;

        let chat = w.chats().await.pop().unwrap();
        assert_eq!(chat.title, STARTER_PROMPTS[2]);
        assert_eq!(chat.messages.len(), 2);
        assert_eq!(chat.messages[1].text, RECESSION_REPLY);
    }

    #[tokio::test(start_paused = true)]
    async fn test_instances_are_independent() {
        let a = TestWidget::builder().build();
        let b = TestWidget::builder().store(SessionStore::new()).build();

        a.send("only in a").await;
        settle().await;

        assert_eq!(a.chats().await.len(), 3);
        assert!(b.chats().await.is_empty());
        assert_ne!(a.widget.instance_id(), b.widget.instance_id());
    }
}
