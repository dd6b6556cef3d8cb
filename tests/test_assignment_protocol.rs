mod helpers;

use std::sync::Arc;

use fielddesk::application::services::{AssignmentService, AssignmentTarget};
use fielddesk::domain::entities::{Assignee, BookingStatus};
use fielddesk::domain::errors::DomainError;
use fielddesk::shared::events::LocalEventBus;

use helpers::*;

fn service(api: Arc<FakeDispatchApi>) -> AssignmentService {
    AssignmentService::new(api, Arc::new(LocalEventBus::default()))
}

#[tokio::test]
async fn assigning_an_agent_clears_the_dispatcher_in_one_request() {
    let api = FakeDispatchApi::new();
    let mut owned = booking(1, BookingStatus::Scheduled);
    owned.dispatcher_id = Some(4);
    owned.dispatcher_name = Some("Dana".to_string());
    api.set_bookings(vec![owned.clone()]).await;

    let service = service(api.clone());
    let patch = service
        .assign(
            &dispatcher_session(),
            &owned,
            AssignmentTarget::ToAgent {
                agent_id: 7,
                agent_name: Some("Lisa Nguyen".to_string()),
            },
        )
        .await
        .unwrap();

    // Exactly one request went out, carrying only the agent field.
    let updates = api.recorded_updates.lock().await;
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].1, serde_json::json!({"agentId": 7}));

    // The server cleared the dispatcher as part of the same write.
    let stored = &api.bookings.lock().await[0];
    assert_eq!(stored.assignee(), Assignee::Agent(7));
    assert_eq!(stored.dispatcher_id, None);

    // The optimistic patch produces the same single-owner state locally,
    // with no intermediate both-assigned moment.
    let mut local = owned.clone();
    patch.apply(&mut local);
    assert_eq!(local.agent_id, Some(7));
    assert_eq!(local.agent_name.as_deref(), Some("Lisa Nguyen"));
    assert_eq!(local.dispatcher_id, None);
    assert_eq!(local.dispatcher_name, None);
}

#[tokio::test]
async fn unassigning_sends_an_explicit_null() {
    let api = FakeDispatchApi::new();
    let mut owned = booking(1, BookingStatus::Scheduled);
    owned.agent_id = Some(7);
    api.set_bookings(vec![owned.clone()]).await;

    let service = service(api.clone());
    let patch = service
        .assign(&dispatcher_session(), &owned, AssignmentTarget::Unassign)
        .await
        .unwrap();

    let updates = api.recorded_updates.lock().await;
    assert_eq!(updates[0].1, serde_json::json!({"agentId": null}));

    let mut local = owned.clone();
    patch.apply(&mut local);
    assert_eq!(local.assignee(), Assignee::Unassigned);
}

#[tokio::test]
async fn dispatcher_self_assignment_claims_the_booking() {
    let api = FakeDispatchApi::new();
    let mut owned = booking(1, BookingStatus::Scheduled);
    owned.agent_id = Some(7);
    api.set_bookings(vec![owned.clone()]).await;

    let service = service(api.clone());
    let patch = service
        .assign(&dispatcher_session(), &owned, AssignmentTarget::ToSelf)
        .await
        .unwrap();

    let updates = api.recorded_updates.lock().await;
    assert_eq!(updates[0].1, serde_json::json!({"assign_to_self": true}));

    let stored = &api.bookings.lock().await[0];
    assert_eq!(stored.assignee(), Assignee::Dispatcher(FAKE_SELF_ID));

    let mut local = owned.clone();
    patch.apply(&mut local);
    assert_eq!(local.dispatcher_id, Some(FAKE_SELF_ID));
    assert_eq!(local.agent_id, None);
}

#[tokio::test]
async fn self_assignment_is_not_offered_to_admins() {
    let api = FakeDispatchApi::new();
    let owned = booking(1, BookingStatus::Scheduled);
    api.set_bookings(vec![owned.clone()]).await;

    let service = service(api.clone());
    let result = service
        .assign(&admin_session(), &owned, AssignmentTarget::ToSelf)
        .await;

    assert!(matches!(result, Err(DomainError::Forbidden(_))));
    assert!(api.recorded_updates.lock().await.is_empty());
}

#[tokio::test]
async fn admins_may_still_assign_and_unassign() {
    let api = FakeDispatchApi::new();
    let owned = booking(1, BookingStatus::Scheduled);
    api.set_bookings(vec![owned.clone()]).await;

    let service = service(api.clone());
    service
        .assign(
            &admin_session(),
            &owned,
            AssignmentTarget::ToAgent {
                agent_id: 12,
                agent_name: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(api.bookings.lock().await[0].assignee(), Assignee::Agent(12));
}

#[tokio::test]
async fn field_agents_have_a_read_only_view_of_assignment() {
    let api = FakeDispatchApi::new();
    let owned = booking(1, BookingStatus::Scheduled);
    api.set_bookings(vec![owned.clone()]).await;

    let service = service(api.clone());
    for target in [
        AssignmentTarget::ToAgent {
            agent_id: 9,
            agent_name: None,
        },
        AssignmentTarget::Unassign,
        AssignmentTarget::ToSelf,
    ] {
        let result = service.assign(&field_agent_session(9), &owned, target).await;
        assert!(matches!(result, Err(DomainError::Forbidden(_))));
    }
    assert!(api.recorded_updates.lock().await.is_empty());
}
