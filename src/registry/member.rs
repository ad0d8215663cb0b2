//! Member types
//!
//! A member is a chat that asked to receive broadcasts. Its title and kind are
//! captured once at registration and only used for display afterwards.

use serde::{Deserialize, Serialize};

/// Unique identifier of a destination chat
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub i64);

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for MemberId {
    fn from(id: i64) -> Self {
        MemberId(id)
    }
}

/// Category of a chat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    /// One-to-one conversation with the bot
    Private,
    /// Basic group
    Group,
    /// Large group
    Supergroup,
    /// Broadcast channel
    Channel,
    /// Anything the transport reported that we don't recognize
    #[serde(other)]
    Unknown,
}

impl ChatKind {
    /// Lowercase name, as stored on disk
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatKind::Private => "private",
            ChatKind::Group => "group",
            ChatKind::Supergroup => "supergroup",
            ChatKind::Channel => "channel",
            ChatKind::Unknown => "unknown",
        }
    }

    /// Whether the chat can be subscribed at all
    pub fn is_private(&self) -> bool {
        matches!(self, ChatKind::Private)
    }
}

impl std::fmt::Display for ChatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whatever metadata the transport knows about a chat at registration time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatDescriptor {
    pub id: MemberId,
    pub kind: ChatKind,
    /// Group or channel title
    pub title: Option<String>,
    /// First and last name, for private chats
    pub full_name: Option<String>,
    /// Public handle without the leading `@`
    pub username: Option<String>,
}

impl ChatDescriptor {
    /// Create a descriptor with no name metadata
    pub fn new(id: impl Into<MemberId>, kind: ChatKind) -> Self {
        Self {
            id: id.into(),
            kind,
            title: None,
            full_name: None,
            username: None,
        }
    }

    /// Set the title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the full name
    pub fn full_name(mut self, name: impl Into<String>) -> Self {
        self.full_name = Some(name.into());
        self
    }

    /// Set the username
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Best available human-readable name
    ///
    /// Precedence: title, full name, `@username`, then the raw id. Blank
    /// values are skipped, so the result is never empty.
    pub fn display_name(&self) -> String {
        fn present(value: &Option<String>) -> Option<&str> {
            value.as_deref().map(str::trim).filter(|v| !v.is_empty())
        }

        if let Some(title) = present(&self.title) {
            return title.to_string();
        }
        if let Some(name) = present(&self.full_name) {
            return name.to_string();
        }
        if let Some(username) = present(&self.username) {
            return format!("@{}", username);
        }
        self.id.to_string()
    }
}

/// A registered destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: MemberId,
    pub title: String,
    pub kind: ChatKind,
}

impl Member {
    /// Create a member; an empty title falls back to the id
    pub fn new(id: impl Into<MemberId>, title: impl Into<String>, kind: ChatKind) -> Self {
        let id = id.into();
        let mut title = title.into();
        if title.trim().is_empty() {
            title = id.to_string();
        }
        Self { id, title, kind }
    }

    /// Build a member from transport metadata using the display-name chain
    pub fn from_descriptor(chat: &ChatDescriptor) -> Self {
        Self::new(chat.id, chat.display_name(), chat.kind)
    }

    pub(crate) fn from_record(id: MemberId, record: &MemberRecord) -> Self {
        Self::new(id, record.title.clone(), record.kind)
    }

    pub(crate) fn to_record(&self) -> MemberRecord {
        MemberRecord {
            title: self.title.clone(),
            kind: self.kind,
        }
    }

    /// Key used for display and dispatch ordering
    pub(crate) fn sort_key(&self) -> (String, MemberId) {
        (self.title.to_lowercase(), self.id)
    }
}

/// On-disk form of a member, keyed by id in the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ChatKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_title() {
        let chat = ChatDescriptor::new(-100, ChatKind::Group)
            .title("Team Alpha")
            .full_name("Someone")
            .username("alpha");

        assert_eq!(chat.display_name(), "Team Alpha");
    }

    #[test]
    fn test_display_name_fallback_chain() {
        let chat = ChatDescriptor::new(7, ChatKind::Private).full_name("Ada Lovelace");
        assert_eq!(chat.display_name(), "Ada Lovelace");

        let chat = ChatDescriptor::new(7, ChatKind::Private).username("ada");
        assert_eq!(chat.display_name(), "@ada");

        let chat = ChatDescriptor::new(-1001234, ChatKind::Channel);
        assert_eq!(chat.display_name(), "-1001234");
    }

    #[test]
    fn test_display_name_skips_blank_values() {
        let chat = ChatDescriptor::new(42, ChatKind::Group)
            .title("   ")
            .full_name("")
            .username("beta");

        assert_eq!(chat.display_name(), "@beta");
    }

    #[test]
    fn test_member_empty_title_falls_back_to_id() {
        let member = Member::new(5, "", ChatKind::Channel);
        assert_eq!(member.title, "5");
    }

    #[test]
    fn test_record_uses_type_field() {
        let record = Member::new(1, "Beta Group", ChatKind::Supergroup).to_record();
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["title"], "Beta Group");
        assert_eq!(json["type"], "supergroup");
    }

    #[test]
    fn test_unknown_kind_is_tolerated() {
        let record: MemberRecord =
            serde_json::from_str(r#"{"title":"x","type":"forum"}"#).unwrap();
        assert_eq!(record.kind, ChatKind::Unknown);
    }
}
