use std::sync::Arc;

use tracing::info;

use crate::domain::entities::{Booking, BookingPatch, BookingUpdate, Session};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::DispatchApi;
use crate::shared::events::{EventBus, SystemEvent};

/// Requested new owner for a booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentTarget {
    /// Hand the booking to a field agent chosen from the availability search.
    ToAgent {
        agent_id: i64,
        agent_name: Option<String>,
    },
    /// Clear the assignment entirely.
    Unassign,
    /// The dispatcher claims the booking for themselves.
    ToSelf,
}

impl AssignmentTarget {
    /// Wire body for the request. Exactly one assignment field is ever set;
    /// clearing the opposite role's assignment is the server's job.
    fn update(&self) -> BookingUpdate {
        match self {
            AssignmentTarget::ToAgent { agent_id, .. } => BookingUpdate {
                agent_id: Some(Some(*agent_id)),
                ..Default::default()
            },
            AssignmentTarget::Unassign => BookingUpdate {
                agent_id: Some(None),
                ..Default::default()
            },
            AssignmentTarget::ToSelf => BookingUpdate {
                assign_to_self: Some(true),
                ..Default::default()
            },
        }
    }

    /// Optimistic cache patch mirroring what the server will report on the
    /// next poll: the new assignee set and the other role's field cleared,
    /// in one step.
    fn patch(&self, session: &Session) -> BookingPatch {
        match self {
            AssignmentTarget::ToAgent {
                agent_id,
                agent_name,
            } => BookingPatch::assign_agent(*agent_id, agent_name.clone()),
            AssignmentTarget::Unassign => BookingPatch::unassign(),
            AssignmentTarget::ToSelf => BookingPatch::assign_dispatcher(session.user_id, None),
        }
    }
}

/// Service for the assignment protocol. The server enforces authorization;
/// this mirrors it so a session is never offered an action it cannot take.
#[derive(Clone)]
pub struct AssignmentService {
    api: Arc<dyn DispatchApi>,
    events: Arc<dyn EventBus>,
}

impl AssignmentService {
    pub fn new(api: Arc<dyn DispatchApi>, events: Arc<dyn EventBus>) -> Self {
        Self { api, events }
    }

    /// Reassign a booking. Returns the optimistic patch for the caller to
    /// apply to its polled cache; the next poll reconciles with the server.
    pub async fn assign(
        &self,
        session: &Session,
        booking: &Booking,
        target: AssignmentTarget,
    ) -> DomainResult<BookingPatch> {
        // 1. Capability mirror
        if !session.role.can_assign() {
            return Err(DomainError::Forbidden(format!(
                "Role {} may not change assignments",
                session.role
            )));
        }
        if matches!(target, AssignmentTarget::ToSelf) && !session.role.can_self_assign() {
            return Err(DomainError::Forbidden(
                "Only dispatchers may claim a booking for themselves".to_string(),
            ));
        }

        // 2. Single atomic request carrying exactly one assignment field
        let updated = self
            .api
            .update_booking(booking.booking_id, &target.update())
            .await?;

        info!(
            "booking {} assignment changed by user {}",
            booking.booking_id, session.user_id
        );

        // 3. Publish with the server's authoritative view of the new owner
        self.events.publish(SystemEvent::BookingAssigned {
            booking_id: booking.booking_id,
            agent_id: updated.agent_id,
            dispatcher_id: updated.dispatcher_id,
            assigned_by: session.user_id,
            timestamp: chrono::Utc::now().to_rfc3339(),
        });

        // 4. Hand back the patch for immediate local application
        Ok(target.patch(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_target_serializes_exactly_one_assignment_field() {
        let agent = AssignmentTarget::ToAgent {
            agent_id: 7,
            agent_name: None,
        };
        assert_eq!(
            serde_json::to_value(agent.update()).unwrap(),
            serde_json::json!({"agentId": 7})
        );

        assert_eq!(
            serde_json::to_value(AssignmentTarget::Unassign.update()).unwrap(),
            serde_json::json!({"agentId": null})
        );

        assert_eq!(
            serde_json::to_value(AssignmentTarget::ToSelf.update()).unwrap(),
            serde_json::json!({"assign_to_self": true})
        );
    }
}
