use std::collections::HashMap;
use std::sync::Arc;

use api_core::{CallerContext, EventPublisher};
use chrono::Utc;
use directory::contract::{error::DirectoryError, model::UserSummary, DirectoryApi};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::contract::events::ConnectionEvent;
use crate::contract::model::{
    Connection, ConnectionStatus, ConnectionStatusView, ConnectionWithUser, Direction, SendOutcome,
};
use crate::domain::error::DomainError;
use crate::domain::repo::{ConnectionsRepository, InsertOutcome};

/// Connection state machine.
///
/// Mutations fail closed on missing identity and re-validate every
/// precondition against freshly read state; the repository's conditional
/// writes close the remaining window between read and write. Reads degrade
/// to empty results for anonymous callers.
pub struct Service {
    repo: Arc<dyn ConnectionsRepository>,
    directory: Arc<dyn DirectoryApi>,
    events: Arc<dyn EventPublisher<ConnectionEvent>>,
}

impl Service {
    pub fn new(
        repo: Arc<dyn ConnectionsRepository>,
        directory: Arc<dyn DirectoryApi>,
        events: Arc<dyn EventPublisher<ConnectionEvent>>,
    ) -> Self {
        Self {
            repo,
            directory,
            events,
        }
    }

    /// Create a pending edge toward `receiver_id`, or auto-accept the
    /// opposite-direction pending request if one exists.
    #[instrument(name = "connections.service.send_request", skip(self, caller, message), fields(receiver_id = %receiver_id))]
    pub async fn send_connection_request(
        &self,
        caller: Option<&CallerContext>,
        receiver_id: Uuid,
        message: Option<String>,
    ) -> Result<SendOutcome, DomainError> {
        let ctx = caller.ok_or_else(DomainError::unauthenticated)?;

        if receiver_id == ctx.user_id {
            return Err(DomainError::SelfConnection);
        }

        // Receiver must exist before any edge is considered.
        match self.directory.get_user(receiver_id).await {
            Ok(_) => {}
            Err(DirectoryError::NotFound { id }) => return Err(DomainError::user_not_found(id)),
            Err(_) => return Err(DomainError::database("directory lookup failed")),
        }

        if let Some(forward) = self
            .repo
            .find_edge(ctx.user_id, receiver_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
        {
            return Err(match forward.status {
                ConnectionStatus::Accepted => DomainError::already_connected(),
                ConnectionStatus::Rejected => DomainError::request_rejected(),
                ConnectionStatus::Pending => DomainError::duplicate_request(),
            });
        }

        if let Some(reverse) = self
            .repo
            .find_edge(receiver_id, ctx.user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
        {
            if reverse.status != ConnectionStatus::Pending {
                return Err(DomainError::already_exists());
            }
            // Crossed requests: accept the original instead of creating a
            // second edge.
            let accepted = self
                .repo
                .set_status_if(
                    reverse.id,
                    ConnectionStatus::Pending,
                    ConnectionStatus::Accepted,
                    Utc::now(),
                )
                .await
                .map_err(|e| DomainError::database(e.to_string()))?;
            if !accepted {
                // Someone resolved the reverse edge between our read and
                // write; whatever it became, an edge already exists.
                return Err(DomainError::already_exists());
            }
            info!(connection_id = %reverse.id, "Auto-accepted crossed connection request");
            self.events.publish(&ConnectionEvent::AutoAccepted {
                connection_id: reverse.id,
                requester_id: reverse.requester_id,
                receiver_id: reverse.receiver_id,
            });
            return Ok(SendOutcome {
                connection_id: reverse.id,
                auto_accepted: true,
            });
        }

        let message = message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());
        let connection = Connection {
            id: Uuid::new_v4(),
            requester_id: ctx.user_id,
            receiver_id,
            status: ConnectionStatus::Pending,
            message: message.clone(),
            created_at: Utc::now(),
            responded_at: None,
        };
        let connection_id = connection.id;

        match self
            .repo
            .insert(connection)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
        {
            InsertOutcome::Inserted => {}
            InsertOutcome::DuplicateEdge => return Err(DomainError::duplicate_request()),
        }

        info!(connection_id = %connection_id, "Created connection request");
        self.events.publish(&ConnectionEvent::Requested {
            connection_id,
            requester_id: ctx.user_id,
            receiver_id,
            message,
        });
        Ok(SendOutcome {
            connection_id,
            auto_accepted: false,
        })
    }

    /// Receiver accepts a pending request.
    #[instrument(name = "connections.service.accept", skip(self, caller), fields(connection_id = %connection_id))]
    pub async fn accept_connection_request(
        &self,
        caller: Option<&CallerContext>,
        connection_id: Uuid,
    ) -> Result<(), DomainError> {
        let connection = self
            .respond(caller, connection_id, ConnectionStatus::Accepted)
            .await?;
        info!("Accepted connection request");
        self.events.publish(&ConnectionEvent::Accepted {
            connection_id,
            requester_id: connection.requester_id,
            receiver_id: connection.receiver_id,
        });
        Ok(())
    }

    /// Receiver rejects a pending request. The requester is not notified.
    #[instrument(name = "connections.service.reject", skip(self, caller), fields(connection_id = %connection_id))]
    pub async fn reject_connection_request(
        &self,
        caller: Option<&CallerContext>,
        connection_id: Uuid,
    ) -> Result<(), DomainError> {
        self.respond(caller, connection_id, ConnectionStatus::Rejected)
            .await?;
        info!("Rejected connection request");
        Ok(())
    }

    /// Shared accept/reject path: receiver-only, pending-only, conditional
    /// transition.
    async fn respond(
        &self,
        caller: Option<&CallerContext>,
        connection_id: Uuid,
        next: ConnectionStatus,
    ) -> Result<Connection, DomainError> {
        let ctx = caller.ok_or_else(DomainError::unauthenticated)?;

        let connection = self
            .repo
            .find_by_id(connection_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::connection_not_found(connection_id))?;

        if connection.receiver_id != ctx.user_id {
            return Err(DomainError::Forbidden);
        }
        if connection.status != ConnectionStatus::Pending {
            return Err(DomainError::invalid_state("pending"));
        }

        let updated = self
            .repo
            .set_status_if(connection_id, ConnectionStatus::Pending, next, Utc::now())
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        if !updated {
            warn!("Connection state changed between read and write");
            return Err(DomainError::invalid_state("pending"));
        }
        Ok(connection)
    }

    /// Requester withdraws a pending request. Hard delete, no trace.
    #[instrument(name = "connections.service.cancel", skip(self, caller), fields(connection_id = %connection_id))]
    pub async fn cancel_connection_request(
        &self,
        caller: Option<&CallerContext>,
        connection_id: Uuid,
    ) -> Result<(), DomainError> {
        let ctx = caller.ok_or_else(DomainError::unauthenticated)?;

        let connection = self
            .repo
            .find_by_id(connection_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::connection_not_found(connection_id))?;

        if connection.requester_id != ctx.user_id {
            return Err(DomainError::Forbidden);
        }
        if connection.status != ConnectionStatus::Pending {
            return Err(DomainError::invalid_state("pending"));
        }

        let deleted = self
            .repo
            .delete_if(connection_id, ConnectionStatus::Pending)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        if !deleted {
            return Err(DomainError::invalid_state("pending"));
        }
        info!("Cancelled connection request");
        Ok(())
    }

    /// Either party removes an accepted connection.
    #[instrument(name = "connections.service.remove", skip(self, caller), fields(connection_id = %connection_id))]
    pub async fn remove_connection(
        &self,
        caller: Option<&CallerContext>,
        connection_id: Uuid,
    ) -> Result<(), DomainError> {
        let ctx = caller.ok_or_else(DomainError::unauthenticated)?;

        let connection = self
            .repo
            .find_by_id(connection_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::connection_not_found(connection_id))?;

        if connection.requester_id != ctx.user_id && connection.receiver_id != ctx.user_id {
            return Err(DomainError::Forbidden);
        }
        if connection.status != ConnectionStatus::Accepted {
            return Err(DomainError::invalid_state("accepted"));
        }

        let deleted = self
            .repo
            .delete_if(connection_id, ConnectionStatus::Accepted)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        if !deleted {
            return Err(DomainError::invalid_state("accepted"));
        }

        info!("Removed connection");
        self.events.publish(&ConnectionEvent::Removed {
            connection_id,
            removed_by: ctx.user_id,
            other_user_id: connection.other_party(ctx.user_id),
        });
        Ok(())
    }

    /// Accepted connections of the caller, enriched with the other party.
    #[instrument(name = "connections.service.get_connections", skip(self, caller))]
    pub async fn get_connections(
        &self,
        caller: Option<&CallerContext>,
    ) -> Result<Vec<ConnectionWithUser>, DomainError> {
        let Some(ctx) = caller else {
            return Ok(Vec::new());
        };
        let rows = self
            .repo
            .list_accepted_for(ctx.user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        self.enrich(ctx.user_id, rows).await
    }

    /// Pending requests addressed to the caller.
    #[instrument(name = "connections.service.get_inbound", skip(self, caller))]
    pub async fn get_inbound_requests(
        &self,
        caller: Option<&CallerContext>,
    ) -> Result<Vec<ConnectionWithUser>, DomainError> {
        let Some(ctx) = caller else {
            return Ok(Vec::new());
        };
        let rows = self
            .repo
            .list_pending_to(ctx.user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        self.enrich(ctx.user_id, rows).await
    }

    /// Pending requests sent by the caller.
    #[instrument(name = "connections.service.get_outbound", skip(self, caller))]
    pub async fn get_outbound_requests(
        &self,
        caller: Option<&CallerContext>,
    ) -> Result<Vec<ConnectionWithUser>, DomainError> {
        let Some(ctx) = caller else {
            return Ok(Vec::new());
        };
        let rows = self
            .repo
            .list_pending_from(ctx.user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        self.enrich(ctx.user_id, rows).await
    }

    /// Relationship between the caller and `other_user_id`, checking both
    /// directions.
    #[instrument(name = "connections.service.get_status", skip(self, caller), fields(other_user_id = %other_user_id))]
    pub async fn get_connection_status(
        &self,
        caller: Option<&CallerContext>,
        other_user_id: Uuid,
    ) -> Result<ConnectionStatusView, DomainError> {
        let Some(ctx) = caller else {
            return Ok(ConnectionStatusView::default());
        };

        if let Some(forward) = self
            .repo
            .find_edge(ctx.user_id, other_user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
        {
            return Ok(ConnectionStatusView {
                status: Some(forward.status),
                connection_id: Some(forward.id),
                direction: Some(Direction::Outbound),
            });
        }
        if let Some(reverse) = self
            .repo
            .find_edge(other_user_id, ctx.user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
        {
            return Ok(ConnectionStatusView {
                status: Some(reverse.status),
                connection_id: Some(reverse.id),
                direction: Some(Direction::Inbound),
            });
        }
        Ok(ConnectionStatusView::default())
    }

    /// Badge counter: inbound pending requests.
    #[instrument(name = "connections.service.pending_count", skip(self, caller))]
    pub async fn get_pending_request_count(
        &self,
        caller: Option<&CallerContext>,
    ) -> Result<u64, DomainError> {
        let Some(ctx) = caller else {
            return Ok(0);
        };
        self.repo
            .count_pending_to(ctx.user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    /// Attach the other party's profile summary to each row via one batch
    /// directory lookup. Rows whose party vanished mid-flight are dropped.
    async fn enrich(
        &self,
        user_id: Uuid,
        rows: Vec<Connection>,
    ) -> Result<Vec<ConnectionWithUser>, DomainError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let other_ids: Vec<Uuid> = rows.iter().map(|c| c.other_party(user_id)).collect();
        let users = self
            .directory
            .get_users(&other_ids)
            .await
            .map_err(|_| DomainError::database("directory lookup failed"))?;
        let by_id: HashMap<Uuid, UserSummary> =
            users.iter().map(|u| (u.id, UserSummary::from(u))).collect();

        Ok(rows
            .into_iter()
            .filter_map(|connection| {
                let other = by_id.get(&connection.other_party(user_id))?.clone();
                Some(ConnectionWithUser {
                    connection,
                    other_user: other,
                })
            })
            .collect())
    }
}
