//! Chat Responder
//!
//! 模板化意图应答器。匹配 greeting / menu / reservation / hours 四类意图，
//! 无命中时回落到带菜单上下文的兜底回复。每次交互写入 chat_log。
//! 纯文本进出，无外部 AI 调用。

use chrono::Utc;
use rand::seq::SliceRandom;

use crate::core::config::RestaurantInfo;
use crate::db::models::ChatLog;
use crate::db::repository::{ChatLogRepository, MenuItemRepository, RepoResult};
use crate::utils::time::format_slot;

/// Matched intent categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Greeting,
    MenuInquiry,
    Reservation,
    Hours,
    Fallback,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::MenuInquiry => "menu_inquiry",
            Intent::Reservation => "reservation",
            Intent::Hours => "hours",
            Intent::Fallback => "fallback",
        }
    }
}

/// Keyword patterns per intent, checked in declaration order
const INTENT_PATTERNS: &[(Intent, &[&str])] = &[
    (
        Intent::Greeting,
        &["hello", "hi", "hey", "good morning", "good evening"],
    ),
    (
        Intent::MenuInquiry,
        &["menu", "food", "dishes", "what do you have", "recommendations"],
    ),
    (
        Intent::Reservation,
        &["book table", "reservation", "book", "table availability"],
    ),
    (
        Intent::Hours,
        &["timings", "hours", "open", "close", "when are you open"],
    ),
];

/// Chat reply with the intent that produced it
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub response: String,
    pub intent: Intent,
}

/// Templated chat responder
#[derive(Clone)]
pub struct ChatResponder {
    menu: MenuItemRepository,
    logs: ChatLogRepository,
    restaurant: RestaurantInfo,
}

impl ChatResponder {
    pub fn new(
        menu: MenuItemRepository,
        logs: ChatLogRepository,
        restaurant: RestaurantInfo,
    ) -> Self {
        Self {
            menu,
            logs,
            restaurant,
        }
    }

    /// Answer a guest message and log the exchange.
    ///
    /// Log-write failures are warned and swallowed so a storage hiccup
    /// never breaks the conversation.
    pub async fn respond(&self, message: &str) -> RepoResult<ChatReply> {
        let intent = match_intent(message);
        let response = match intent {
            Intent::Fallback => self.fallback_response().await?,
            other => self.templated_response(other),
        };

        let log = ChatLog {
            id: None,
            user_message: message.to_string(),
            bot_response: response.clone(),
            intent: intent.as_str().to_string(),
            timestamp: Utc::now(),
        };
        if let Err(e) = self.logs.insert(log).await {
            tracing::warn!(error = %e, "Failed to log chat exchange");
        }

        Ok(ChatReply { response, intent })
    }

    fn templated_response(&self, intent: Intent) -> String {
        let name = &self.restaurant.name;
        let phone = &self.restaurant.phone;
        let responses: Vec<String> = match intent {
            Intent::Greeting => vec![
                format!("Hello! Welcome to {name}. How can I help you today?"),
                "Hi there! I'm here to assist you with our menu and reservations.".to_string(),
                format!("Good day! What would you like to know about {name}?"),
            ],
            Intent::MenuInquiry => vec![
                "We have a diverse menu with Indian, Continental, and Chinese cuisines. \
                 Would you like recommendations for any specific category?"
                    .to_string(),
                "Our popular dishes include Butter Chicken, Biryani, and Paneer Tikka. \
                 What type of cuisine are you in the mood for?"
                    .to_string(),
            ],
            Intent::Reservation => vec![
                format!(
                    "I'd be happy to help you with a reservation! You can book a table \
                     through our website or call us at {phone}."
                ),
                "To make a reservation, please provide your preferred date, time, and \
                 number of guests."
                    .to_string(),
            ],
            Intent::Hours => vec![
                format!(
                    "We're open daily from {} to {}. Our kitchen closes at {}.",
                    format_slot(self.restaurant.opening_time),
                    format_slot(self.restaurant.closing_time),
                    format_slot(self.restaurant.kitchen_closing_time),
                ),
                format!(
                    "{name} is open every day from {} to {}. Last orders are taken at {}.",
                    format_slot(self.restaurant.opening_time),
                    format_slot(self.restaurant.closing_time),
                    format_slot(self.restaurant.kitchen_closing_time),
                ),
            ],
            Intent::Fallback => unreachable!("fallback is rendered asynchronously"),
        };
        responses
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_default()
    }

    /// Menu-aware catch-all when no intent matches
    async fn fallback_response(&self) -> RepoResult<String> {
        let items = self.menu.find_all(None).await?;
        let names: Vec<&str> = items.iter().take(10).map(|i| i.name.as_str()).collect();
        let response = if names.is_empty() {
            format!(
                "I can help with our menu, reservations, and opening hours. \
                 For anything else, call us at {}.",
                self.restaurant.phone
            )
        } else {
            format!(
                "I'm not sure about that, but I can tell you about our menu ({}, and more), \
                 help with reservations, or share our opening hours. You can also call us \
                 at {}.",
                names.join(", "),
                self.restaurant.phone
            )
        };
        Ok(response)
    }
}

/// Match a message to an intent by keyword lookup (first hit wins)
pub fn match_intent(message: &str) -> Intent {
    let normalized = message.to_lowercase();
    for (intent, patterns) in INTENT_PATTERNS {
        if patterns.iter().any(|p| normalized.contains(p)) {
            return *intent;
        }
    }
    Intent::Fallback
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use chrono::NaiveTime;

    fn test_restaurant() -> RestaurantInfo {
        RestaurantInfo {
            name: "DINE24".into(),
            phone: "+91 98765 43210".into(),
            email: "info@dine24.com".into(),
            opening_time: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
            closing_time: NaiveTime::from_hms_opt(23, 0, 0).unwrap(),
            kitchen_closing_time: NaiveTime::from_hms_opt(22, 30, 0).unwrap(),
        }
    }

    async fn test_responder() -> (ChatResponder, ChatLogRepository) {
        let db = DbService::new_in_memory().await.unwrap();
        let logs = ChatLogRepository::new(db.db.clone());
        let responder = ChatResponder::new(
            MenuItemRepository::new(db.db.clone()),
            logs.clone(),
            test_restaurant(),
        );
        (responder, logs)
    }

    #[test]
    fn intent_matching() {
        assert_eq!(match_intent("Hello there"), Intent::Greeting);
        assert_eq!(match_intent("show me the MENU"), Intent::MenuInquiry);
        assert_eq!(match_intent("can I book a table?"), Intent::Reservation);
        assert_eq!(match_intent("when are you open"), Intent::Hours);
        assert_eq!(match_intent("do you do birthdays?"), Intent::Fallback);
    }

    #[test]
    fn greeting_patterns_win_over_later_intents() {
        // "hi" appears before "book" in the pattern table
        assert_eq!(match_intent("hi, I want to book"), Intent::Greeting);
    }

    #[tokio::test]
    async fn responds_and_logs_the_exchange() {
        let (responder, logs) = test_responder().await;

        let reply = responder.respond("hello").await.unwrap();
        assert_eq!(reply.intent, Intent::Greeting);
        assert!(!reply.response.is_empty());

        let recent = logs.recent(5).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].intent, "greeting");
        assert_eq!(recent[0].user_message, "hello");
    }

    #[tokio::test]
    async fn fallback_mentions_the_phone_number() {
        let (responder, _) = test_responder().await;

        let reply = responder.respond("do you validate parking?").await.unwrap();
        assert_eq!(reply.intent, Intent::Fallback);
        assert!(reply.response.contains("+91 98765 43210"));
    }

    #[tokio::test]
    async fn hours_response_uses_configured_times() {
        let (responder, _) = test_responder().await;

        let reply = responder.respond("what are your hours").await.unwrap();
        assert_eq!(reply.intent, Intent::Hours);
        assert!(reply.response.contains("11:00"));
        assert!(reply.response.contains("23:00"));
    }
}
