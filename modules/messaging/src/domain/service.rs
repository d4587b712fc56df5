use std::collections::HashMap;
use std::sync::Arc;

use api_core::{CallerContext, EventPublisher};
use chrono::Utc;
use directory::contract::{model::UserSummary, DirectoryApi};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::contract::events::MessageEvent;
use crate::contract::model::{Conversation, Message};
use crate::domain::error::DomainError;
use crate::domain::repo::MessagesRepository;

/// Messaging service: direct messages, read tracking and the conversation
/// projection. Mutations fail closed for anonymous callers; reads degrade
/// to empty/zero.
pub struct Service {
    repo: Arc<dyn MessagesRepository>,
    directory: Arc<dyn DirectoryApi>,
    events: Arc<dyn EventPublisher<MessageEvent>>,
}

impl Service {
    pub fn new(
        repo: Arc<dyn MessagesRepository>,
        directory: Arc<dyn DirectoryApi>,
        events: Arc<dyn EventPublisher<MessageEvent>>,
    ) -> Self {
        Self {
            repo,
            directory,
            events,
        }
    }

    /// Send a message. Content is trimmed; whitespace-only content is
    /// rejected before anything is written.
    #[instrument(name = "messaging.service.send", skip(self, caller, content), fields(receiver_id = %receiver_id))]
    pub async fn send_message(
        &self,
        caller: Option<&CallerContext>,
        receiver_id: Uuid,
        content: &str,
    ) -> Result<Uuid, DomainError> {
        let ctx = caller.ok_or_else(DomainError::unauthenticated)?;

        if receiver_id == ctx.user_id {
            return Err(DomainError::SelfMessage);
        }
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyContent);
        }

        let message = Message {
            id: Uuid::new_v4(),
            sender_id: ctx.user_id,
            receiver_id,
            content: trimmed.to_string(),
            sent_at: Utc::now(),
            is_read: false,
        };
        let message_id = message.id;

        self.repo
            .insert(message)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!(message_id = %message_id, "Sent message");
        self.events.publish(&MessageEvent::Sent {
            message_id,
            sender_id: ctx.user_id,
            receiver_id,
        });
        Ok(message_id)
    }

    /// Mark everything the caller has unread from `other_user_id` as read.
    /// Idempotent: a second call patches zero rows and succeeds.
    #[instrument(name = "messaging.service.mark_conversation_read", skip(self, caller), fields(other_user_id = %other_user_id))]
    pub async fn mark_conversation_read(
        &self,
        caller: Option<&CallerContext>,
        other_user_id: Uuid,
    ) -> Result<u64, DomainError> {
        let ctx = caller.ok_or_else(DomainError::unauthenticated)?;
        let patched = self
            .repo
            .mark_conversation_read(ctx.user_id, other_user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        debug!(patched, "Marked conversation read");
        Ok(patched)
    }

    /// Single-message variant kept for per-message read receipts.
    #[instrument(name = "messaging.service.mark_message_read", skip(self, caller), fields(message_id = %message_id))]
    pub async fn mark_message_read(
        &self,
        caller: Option<&CallerContext>,
        message_id: Uuid,
    ) -> Result<(), DomainError> {
        let ctx = caller.ok_or_else(DomainError::unauthenticated)?;

        let message = self
            .repo
            .find_by_id(message_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::message_not_found(message_id))?;

        if message.receiver_id != ctx.user_id {
            return Err(DomainError::Forbidden);
        }
        if message.is_read {
            return Ok(());
        }
        self.repo
            .mark_read(message_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    /// Both directions between the caller and `other_user_id`, oldest
    /// first. The ascending order is what chat UIs render directly.
    #[instrument(name = "messaging.service.get_conversation", skip(self, caller), fields(other_user_id = %other_user_id))]
    pub async fn get_conversation(
        &self,
        caller: Option<&CallerContext>,
        other_user_id: Uuid,
    ) -> Result<Vec<Message>, DomainError> {
        let Some(ctx) = caller else {
            return Ok(Vec::new());
        };
        self.repo
            .conversation(ctx.user_id, other_user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    /// All conversations of the caller, grouped by partner, most recent
    /// first.
    #[instrument(name = "messaging.service.get_conversations", skip(self, caller))]
    pub async fn get_user_conversations(
        &self,
        caller: Option<&CallerContext>,
    ) -> Result<Vec<Conversation>, DomainError> {
        let Some(ctx) = caller else {
            return Ok(Vec::new());
        };

        // Newest first, so the first message seen per partner is that
        // conversation's last message and partner order is already the
        // final order.
        let messages = self
            .repo
            .all_touching(ctx.user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        let mut partner_order: Vec<Uuid> = Vec::new();
        let mut last_message: HashMap<Uuid, Message> = HashMap::new();
        let mut unread: HashMap<Uuid, u64> = HashMap::new();

        for message in messages {
            let partner = if message.sender_id == ctx.user_id {
                message.receiver_id
            } else {
                message.sender_id
            };
            if !last_message.contains_key(&partner) {
                partner_order.push(partner);
                last_message.insert(partner, message.clone());
            }
            if message.receiver_id == ctx.user_id && !message.is_read {
                *unread.entry(partner).or_insert(0) += 1;
            }
        }

        if partner_order.is_empty() {
            return Ok(Vec::new());
        }

        let users = self
            .directory
            .get_users(&partner_order)
            .await
            .map_err(|_| DomainError::database("directory lookup failed"))?;
        let summaries: HashMap<Uuid, UserSummary> =
            users.iter().map(|u| (u.id, UserSummary::from(u))).collect();

        Ok(partner_order
            .into_iter()
            .filter_map(|partner| {
                let other_user = summaries.get(&partner)?.clone();
                Some(Conversation {
                    other_user,
                    last_message: last_message.remove(&partner)?,
                    unread_count: unread.get(&partner).copied().unwrap_or(0),
                })
            })
            .collect())
    }

    /// Badge counter: unread messages addressed to the caller.
    #[instrument(name = "messaging.service.unread_count", skip(self, caller))]
    pub async fn get_unread_count(
        &self,
        caller: Option<&CallerContext>,
    ) -> Result<u64, DomainError> {
        let Some(ctx) = caller else {
            return Ok(0);
        };
        self.repo
            .unread_count(ctx.user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }
}
