//! Chat Log Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Logged chat exchange (user message + templated response)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatLog {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub user_message: String,
    pub bot_response: String,
    /// Matched intent name, "fallback" when nothing matched
    pub intent: String,
    pub timestamp: DateTime<Utc>,
}
