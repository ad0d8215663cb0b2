//! Console relay demo
//!
//! Run with: cargo run --example console_relay [SUBSCRIPTIONS_FILE]
//!
//! Uses a fake transport that prints every delivery to stdout. Chats whose
//! title starts with `~` behave as if they kicked the bot, chats whose title
//! starts with `!` fail with a transient error.
//!
//! Set `RUST_LOG=chat_relay=debug` to see per-member logging.

use std::collections::HashMap;
use std::sync::Arc;

use chat_relay::registry::{ChatDescriptor, ChatKind, MemberId, RegistryConfig};
use chat_relay::transport::{Ack, MemberStatus, MessageRef, Transport, TransportError, UserId};
use chat_relay::{RelayConfig, RelayService};
use tracing_subscriber::EnvFilter;

/// Transport that "delivers" by printing
struct ConsoleTransport {
    titles: HashMap<MemberId, String>,
}

impl Transport for ConsoleTransport {
    async fn send_copy(
        &self,
        destination: MemberId,
        source: &MessageRef,
    ) -> Result<Ack, TransportError> {
        let title = self.titles.get(&destination).map(String::as_str).unwrap_or("");

        if title.starts_with('~') {
            return Err(TransportError::PermanentRevocation);
        }
        if title.starts_with('!') {
            return Err(TransportError::other("Too Many Requests: retry after 3"));
        }

        println!(
            "  -> copied message {} from {} into {} ({})",
            source.message_id, source.chat, title, destination
        );
        Ok(Ack {
            message_id: Some(source.message_id),
        })
    }

    async fn member_status(
        &self,
        _chat: MemberId,
        _user: UserId,
    ) -> Result<MemberStatus, TransportError> {
        Ok(MemberStatus::Administrator)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chat_relay=info")),
        )
        .init();

    let mut config = RelayConfig::from_env()?;
    if let Some(path) = std::env::args().nth(1) {
        config = config.registry(RegistryConfig::with_path(path));
    }

    let chats = vec![
        ChatDescriptor::new(-1001, ChatKind::Supergroup).title("Team Alpha"),
        ChatDescriptor::new(-1002, ChatKind::Group).title("~Beta Group"),
        ChatDescriptor::new(-1003, ChatKind::Channel).username("gamma_news"),
        ChatDescriptor::new(-1004, ChatKind::Group).title("!Delta"),
    ];

    let titles = chats
        .iter()
        .map(|chat| (chat.id, chat.display_name()))
        .collect();
    let relay = RelayService::open(config, Arc::new(ConsoleTransport { titles })).await?;
    let author = Some(UserId(1));

    println!("{}\n", relay.start(ChatKind::Private));

    for chat in &chats {
        let reply = relay.subscribe(author, chat).await?;
        println!("[{}] {}", chat.display_name(), reply);
    }

    println!("\n{}\n", relay.list().await);

    println!("Broadcasting...");
    let summary = relay.broadcast(author, &MessageRef::new(1, 100)).await;
    println!("{}\n", summary);

    println!("{}", relay.list().await);

    Ok(())
}
