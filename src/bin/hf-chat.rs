// Terminal front-end for the chat proxy.
//
// Enter sends the draft. End a line with `\` to continue the draft on the
// next line (the terminal stand-in for Shift+Enter).
use hf_chat_proxy::{
    config::proxy_url_from_env,
    message::{Message, MessageRole},
    services::{
        chat_view::{ChatView, Key, KeyAction, KeyPress},
        proxy_client::{ChatTransport, ProxyClient},
    },
};
use std::io::{self, Write};

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

fn render_message(message: &Message) {
    let who = match message.role {
        MessageRole::User => "you",
        MessageRole::Assistant => "bot",
    };
    println!("{who}> {}", message.text);
}

/// What the terminal has already printed.
#[derive(Default)]
struct Screen {
    shown: usize,
    revision: u64,
}

impl Screen {
    /// Print whatever changed since the last call.
    fn render(&mut self, view: &ChatView) -> io::Result<()> {
        if view.scroll_revision() == self.revision {
            return Ok(());
        }
        self.revision = view.scroll_revision();

        for message in &view.messages()[self.shown..] {
            render_message(message);
        }
        self.shown = view.messages().len();
        if view.can_submit() {
            print!("> ");
        } else {
            println!("... thinking");
        }
        io::stdout().flush()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let client = ProxyClient::new(proxy_url_from_env());
    info!(proxy = client.base_url(), "starting terminal chat");

    let mut view = ChatView::new();
    let mut screen = Screen::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print!("> ");
    io::stdout().flush()?;

    while let Some(line) = lines.next_line().await? {
        let (text, continued) = match line.strip_suffix('\\') {
            Some(rest) => (rest, true),
            None => (line.as_str(), false),
        };
        for c in text.chars() {
            view.handle_key(KeyPress::plain(Key::Char(c)));
        }
        if continued {
            view.handle_key(KeyPress::shifted(Key::Enter));
            continue;
        }

        if view.handle_key(KeyPress::plain(Key::Enter)) != KeyAction::Submit {
            continue;
        }
        let Some(pending) = view.begin_send() else {
            continue;
        };
        screen.render(&view)?;

        let result = client.send_prompt(&pending.prompt).await;
        view.finish_send(result);
        screen.render(&view)?;
    }

    Ok(())
}
