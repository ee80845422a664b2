// SPDX-FileCopyrightText: 2026 Snapdrift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authorization filtering and conversion of Telegram messages into
//! channel-agnostic [`InboundCommand`]s.

use snapdrift_core::{ChatId, InboundCommand, UserId};
use teloxide::types::Message;

/// Checks whether the message sender is authorized.
///
/// Authorization passes if the sender's user ID (as string) or username
/// matches any entry in the `allowed_users` list. If `allowed_users` is
/// empty, all messages are rejected.
///
/// Messages without a sender (e.g., channel posts) always return `false`.
pub fn is_authorized(msg: &Message, allowed_users: &[String]) -> bool {
    if allowed_users.is_empty() {
        return false;
    }

    let user = match msg.from.as_ref() {
        Some(u) => u,
        None => return false,
    };

    let user_id_str = user.id.0.to_string();

    for allowed in allowed_users {
        if *allowed == user_id_str {
            return true;
        }
        // Usernames match with or without the leading '@'.
        if let Some(ref username) = user.username {
            let allowed_clean = allowed.strip_prefix('@').unwrap_or(allowed);
            if username.eq_ignore_ascii_case(allowed_clean) {
                return true;
            }
        }
    }

    false
}

/// Text of a message, or `None` for stickers, photos without text, etc.
pub fn command_text(msg: &Message) -> Option<&str> {
    msg.text().map(str::trim).filter(|t| !t.is_empty())
}

/// Converts a Telegram message into an [`InboundCommand`].
pub fn to_inbound_command(msg: &Message, text: &str) -> InboundCommand {
    let sender_id = msg
        .from
        .as_ref()
        .map(|u| u.id.0.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    InboundCommand {
        id: msg.id.0.to_string(),
        chat_id: ChatId(msg.chat.id.0.to_string()),
        sender_id: UserId(sender_id),
        text: text.to_string(),
        timestamp: msg.date.to_rfc3339(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_private_message(user_id: u64, username: Option<&str>, text: &str) -> Message {
        let mut from = serde_json::json!({
            "id": user_id,
            "is_bot": false,
            "first_name": "Test",
        });
        if let Some(uname) = username {
            from["username"] = serde_json::json!(uname);
        }

        let json = serde_json::json!({
            "message_id": 7,
            "date": 1700000000i64,
            "chat": {
                "id": user_id as i64,
                "type": "private",
                "first_name": "Test",
            },
            "from": from,
            "text": text,
        });

        serde_json::from_value(json).expect("failed to deserialize mock message")
    }

    fn make_group_message(user_id: u64, text: &str) -> Message {
        let json = serde_json::json!({
            "message_id": 3,
            "date": 1700000000i64,
            "chat": {
                "id": -100123i64,
                "type": "supergroup",
                "title": "Family Photos",
            },
            "from": {
                "id": user_id,
                "is_bot": false,
                "first_name": "Test",
            },
            "text": text,
        });

        serde_json::from_value(json).expect("failed to deserialize mock group message")
    }

    fn make_no_sender_message(text: &str) -> Message {
        let json = serde_json::json!({
            "message_id": 1,
            "date": 1700000000i64,
            "chat": {
                "id": 12345i64,
                "type": "private",
                "first_name": "Test",
            },
            "text": text,
        });

        serde_json::from_value(json).expect("failed to deserialize mock message")
    }

    #[test]
    fn authorized_by_user_id() {
        let msg = make_private_message(12345, None, "/random");
        assert!(is_authorized(&msg, &["12345".into()]));
    }

    #[test]
    fn authorized_by_username_with_or_without_at() {
        let msg = make_private_message(12345, Some("TestUser"), "/random");
        assert!(is_authorized(&msg, &["testuser".into()]));
        assert!(is_authorized(&msg, &["@testuser".into()]));
    }

    #[test]
    fn not_authorized_wrong_user() {
        let msg = make_private_message(12345, Some("testuser"), "/random");
        assert!(!is_authorized(&msg, &["99999".into()]));
    }

    #[test]
    fn empty_allow_list_rejects_everyone() {
        let msg = make_private_message(12345, Some("testuser"), "/random");
        assert!(!is_authorized(&msg, &[]));
    }

    #[test]
    fn not_authorized_no_sender() {
        let msg = make_no_sender_message("/random");
        assert!(!is_authorized(&msg, &["12345".into()]));
    }

    #[test]
    fn command_text_trims_and_skips_blank() {
        let msg = make_private_message(1, None, "  /stats  ");
        assert_eq!(command_text(&msg), Some("/stats"));

        let msg = make_private_message(1, None, "   ");
        assert_eq!(command_text(&msg), None);
    }

    #[test]
    fn to_inbound_command_maps_fields() {
        let msg = make_private_message(12345, Some("testuser"), "/get abc");
        let inbound = to_inbound_command(&msg, "/get abc");

        assert_eq!(inbound.id, "7");
        assert_eq!(inbound.chat_id, ChatId("12345".into()));
        assert_eq!(inbound.sender_id, UserId("12345".into()));
        assert_eq!(inbound.text, "/get abc");
        assert!(inbound.timestamp.starts_with("2023-11-14"));
    }

    #[test]
    fn group_commands_use_group_chat_id() {
        let msg = make_group_message(42, "/random image");
        let inbound = to_inbound_command(&msg, "/random image");
        assert_eq!(inbound.chat_id, ChatId("-100123".into()));
        assert_eq!(inbound.sender_id, UserId("42".into()));
    }
}
