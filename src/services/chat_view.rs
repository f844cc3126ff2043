// src/services/chat_view.rs
use tracing::{debug, warn};

use super::proxy_client::{ChatTransport, TransportError};
use crate::message::{ChatResponse, Message};

pub const NO_RESPONSE: &str = "(no response)";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Enter,
    Backspace,
    Char(char),
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub shift: bool,
}

impl KeyPress {
    pub fn plain(key: Key) -> Self {
        Self { key, shift: false }
    }

    pub fn shifted(key: Key) -> Self {
        Self { key, shift: true }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// Caller should run [`ChatView::send`]. No newline was inserted.
    Submit,
    /// Enter was pressed while a request is in flight; nothing happened.
    Suppressed,
    Edited,
    Ignored,
}

/// A prompt that has been committed to the message list and is waiting on
/// the proxy.
#[derive(Debug, PartialEq, Eq)]
pub struct PendingSend {
    pub prompt: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// Draft was empty after trimming.
    Empty,
    /// A request is already in flight.
    Busy,
    Replied,
    Failed,
}

/// Client-side conversation state: messages, draft and the loading flag.
#[derive(Debug, Default)]
pub struct ChatView {
    messages: Vec<Message>,
    draft: String,
    loading: bool,
    revision: u64,
}

impl ChatView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the submit affordance should be enabled.
    pub fn can_submit(&self) -> bool {
        !self.loading
    }

    /// Bumped whenever the message list or the loading flag changes. A
    /// renderer scrolls to the newest message when this moves.
    pub fn scroll_revision(&self) -> u64 {
        self.revision
    }

    pub fn handle_key(&mut self, press: KeyPress) -> KeyAction {
        match press.key {
            Key::Enter if press.shift => {
                self.draft.push('\n');
                KeyAction::Edited
            }
            Key::Enter if self.loading => KeyAction::Suppressed,
            Key::Enter => KeyAction::Submit,
            Key::Backspace => {
                self.draft.pop();
                KeyAction::Edited
            }
            Key::Char(c) => {
                self.draft.push(c);
                KeyAction::Edited
            }
            Key::Other => KeyAction::Ignored,
        }
    }

    /// First half of a send: append the user message, clear the draft and
    /// enter the sending state. `None` leaves the view untouched.
    pub fn begin_send(&mut self) -> Option<PendingSend> {
        if self.loading {
            return None;
        }
        let text = self.draft.trim();
        if text.is_empty() {
            return None;
        }
        let prompt = text.to_string();

        self.push(Message::user(prompt.clone()));
        self.draft.clear();
        self.set_loading(true);
        Some(PendingSend { prompt })
    }

    /// Second half of a send. Always leaves the view idle.
    pub fn finish_send(&mut self, result: Result<ChatResponse, TransportError>) -> SendOutcome {
        let outcome = match result {
            Ok(response) => {
                let text = response.output.unwrap_or_else(|| NO_RESPONSE.to_string());
                self.push(Message::assistant(text));
                SendOutcome::Replied
            }
            Err(err) => {
                warn!(error = %err, "chat request failed");
                self.push(Message::assistant(format!("Error: {err}")));
                SendOutcome::Failed
            }
        };
        self.set_loading(false);
        outcome
    }

    pub async fn send<T>(&mut self, transport: &T) -> SendOutcome
    where
        T: ChatTransport + ?Sized,
    {
        if self.loading {
            return SendOutcome::Busy;
        }
        let Some(pending) = self.begin_send() else {
            return SendOutcome::Empty;
        };
        debug!(prompt_len = pending.prompt.len(), "sending prompt");
        let result = transport.send_prompt(&pending.prompt).await;
        self.finish_send(result)
    }

    fn push(&mut self, message: Message) {
        self.messages.push(message);
        self.revision += 1;
    }

    fn set_loading(&mut self, loading: bool) {
        if self.loading != loading {
            self.loading = loading;
            self.revision += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageRole;

    #[test]
    fn whitespace_draft_is_a_no_op() {
        let mut view = ChatView::new();
        view.set_draft("  \n\t ");
        assert_eq!(view.begin_send(), None);
        assert!(view.messages().is_empty());
        assert!(!view.is_loading());
        assert_eq!(view.scroll_revision(), 0);
    }

    #[test]
    fn begin_send_trims_and_clears() {
        let mut view = ChatView::new();
        view.set_draft("  hello  ");
        let pending = view.begin_send().unwrap();
        assert_eq!(pending.prompt, "hello");
        assert_eq!(view.draft(), "");
        assert!(view.is_loading());
        assert!(!view.can_submit());
        assert_eq!(view.messages()[0].role, MessageRole::User);
        assert_eq!(view.messages()[0].text, "hello");
    }

    #[test]
    fn second_send_refused_while_loading() {
        let mut view = ChatView::new();
        view.set_draft("one");
        assert!(view.begin_send().is_some());
        view.set_draft("two");
        assert_eq!(view.begin_send(), None);
        assert_eq!(view.messages().len(), 1);
        assert_eq!(view.draft(), "two");
    }

    #[test]
    fn failure_prefixes_error() {
        let mut view = ChatView::new();
        view.set_draft("hi");
        view.begin_send();
        let outcome = view.finish_send(Err(TransportError::Api("boom".into())));
        assert_eq!(outcome, SendOutcome::Failed);
        assert_eq!(view.messages()[1].text, "Error: boom");
        assert!(!view.is_loading());
    }

    #[test]
    fn enter_submits_shift_enter_inserts_newline() {
        let mut view = ChatView::new();
        view.handle_key(KeyPress::plain(Key::Char('a')));
        assert_eq!(view.handle_key(KeyPress::shifted(Key::Enter)), KeyAction::Edited);
        view.handle_key(KeyPress::plain(Key::Char('b')));
        assert_eq!(view.draft(), "a\nb");
        assert_eq!(view.handle_key(KeyPress::plain(Key::Enter)), KeyAction::Submit);
        assert_eq!(view.draft(), "a\nb");

        assert_eq!(view.handle_key(KeyPress::plain(Key::Backspace)), KeyAction::Edited);
        assert_eq!(view.draft(), "a\n");
        view.handle_key(KeyPress::plain(Key::Backspace));
        view.handle_key(KeyPress::plain(Key::Backspace));
        assert_eq!(view.handle_key(KeyPress::plain(Key::Backspace)), KeyAction::Edited);
        assert_eq!(view.draft(), "");
        assert_eq!(view.handle_key(KeyPress::plain(Key::Other)), KeyAction::Ignored);
    }

    #[test]
    fn enter_while_loading_is_suppressed() {
        let mut view = ChatView::new();
        view.set_draft("first");
        view.begin_send().unwrap();

        view.set_draft("second");
        let revision = view.scroll_revision();
        assert_eq!(view.handle_key(KeyPress::plain(Key::Enter)), KeyAction::Suppressed);
        assert_eq!(view.draft(), "second");
        assert_eq!(view.messages().len(), 1);
        assert_eq!(view.scroll_revision(), revision);

        // Shift+Enter still edits while a request is in flight.
        assert_eq!(view.handle_key(KeyPress::shifted(Key::Enter)), KeyAction::Edited);
        assert_eq!(view.draft(), "second\n");

        view.finish_send(Ok(ChatResponse::default()));
        assert!(view.can_submit());
        assert_eq!(view.handle_key(KeyPress::plain(Key::Enter)), KeyAction::Submit);
    }

    #[test]
    fn scroll_requested_after_each_change() {
        let mut view = ChatView::new();
        assert_eq!(view.scroll_revision(), 0);
        view.set_draft("hi");
        assert_eq!(view.scroll_revision(), 0);
        view.begin_send();
        // user message appended, loading raised
        assert_eq!(view.scroll_revision(), 2);
        view.finish_send(Ok(ChatResponse::default()));
        assert_eq!(view.scroll_revision(), 4);
        assert_eq!(view.messages()[1].text, NO_RESPONSE);
    }
}
