//! Event lifecycle tests: creation validation, publishing, updates, and
//! deletion rules.

mod helpers;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use helpers::*;

use CampusHub::models::{CreateEventRequest, EventCategory, EventStatus, EventType, UpdateEventRequest};
use CampusHub::store::{EventFilter, EventStore};
use CampusHub::utils::errors::CampusHubError;

fn offline_request() -> CreateEventRequest {
    let now = Utc::now();
    CreateEventRequest {
        title: "Workshop Rust".to_string(),
        description: "Hands-on workshop".to_string(),
        category: EventCategory::Workshop,
        event_type: EventType::Offline,
        location: Some("Lab Terpadu".to_string()),
        join_link: None,
        start_date: now + Duration::days(7),
        end_date: now + Duration::days(7) + Duration::hours(4),
        registration_deadline: now + Duration::days(6),
        max_participants: 30,
        is_uii_only: false,
    }
}

#[tokio::test]
async fn created_events_start_as_drafts() {
    let backend = TestBackend::new();
    let organizer = backend.seed_organizer("orga").await;

    let event = backend
        .event_service
        .create_event(organizer.id, offline_request(), None)
        .await
        .unwrap();

    assert_eq!(event.status, EventStatus::Draft);
    assert_eq!(event.current_participants, 0);
    assert_eq!(event.organizer_id, organizer.id);
}

#[tokio::test]
async fn creation_validates_dates_and_capacity() {
    let backend = TestBackend::new();
    let organizer = backend.seed_organizer("orga").await;

    let mut past_start = offline_request();
    past_start.start_date = Utc::now() - Duration::hours(1);
    let err = backend
        .event_service
        .create_event(organizer.id, past_start, None)
        .await
        .unwrap_err();
    assert_matches!(err, CampusHubError::InvalidInput(_));

    let mut ends_before_start = offline_request();
    ends_before_start.end_date = ends_before_start.start_date - Duration::hours(1);
    let err = backend
        .event_service
        .create_event(organizer.id, ends_before_start, None)
        .await
        .unwrap_err();
    assert_matches!(err, CampusHubError::InvalidInput(_));

    let mut late_deadline = offline_request();
    late_deadline.registration_deadline = late_deadline.start_date + Duration::hours(1);
    let err = backend
        .event_service
        .create_event(organizer.id, late_deadline, None)
        .await
        .unwrap_err();
    assert_matches!(err, CampusHubError::InvalidInput(_));

    let mut no_capacity = offline_request();
    no_capacity.max_participants = 0;
    let err = backend
        .event_service
        .create_event(organizer.id, no_capacity, None)
        .await
        .unwrap_err();
    assert_matches!(err, CampusHubError::InvalidInput(_));
}

#[tokio::test]
async fn offline_needs_location_and_online_needs_link() {
    let backend = TestBackend::new();
    let organizer = backend.seed_organizer("orga").await;

    let mut no_location = offline_request();
    no_location.location = None;
    let err = backend
        .event_service
        .create_event(organizer.id, no_location, None)
        .await
        .unwrap_err();
    assert_matches!(err, CampusHubError::InvalidInput(_));

    let mut no_link = offline_request();
    no_link.event_type = EventType::Online;
    no_link.location = None;
    no_link.join_link = None;
    let err = backend
        .event_service
        .create_event(organizer.id, no_link, None)
        .await
        .unwrap_err();
    assert_matches!(err, CampusHubError::InvalidInput(_));
}

#[tokio::test]
async fn publishing_requires_a_poster() {
    let backend = TestBackend::new();
    let organizer = backend.seed_organizer("orga").await;

    let without_poster = backend
        .event_service
        .create_event(organizer.id, offline_request(), None)
        .await
        .unwrap();
    let err = backend
        .event_service
        .publish_event(organizer.id, without_poster.id)
        .await
        .unwrap_err();
    assert_matches!(err, CampusHubError::InvalidInput(_));

    let with_poster = backend
        .event_service
        .create_event(
            organizer.id,
            offline_request(),
            Some("/posters/workshop.png".to_string()),
        )
        .await
        .unwrap();
    backend
        .event_service
        .publish_event(organizer.id, with_poster.id)
        .await
        .unwrap();

    let refreshed = backend.events.get(with_poster.id).await.unwrap().unwrap();
    assert_eq!(refreshed.status, EventStatus::Published);

    // Publishing twice is rejected
    let err = backend
        .event_service
        .publish_event(organizer.id, with_poster.id)
        .await
        .unwrap_err();
    assert_matches!(err, CampusHubError::InvalidInput(_));
}

#[tokio::test]
async fn capacity_cannot_shrink_below_taken_seats() {
    let backend = TestBackend::new();
    let organizer = backend.seed_organizer("orga").await;
    let event = published_event(organizer.id, 3);
    backend.seed_event(&event).await;

    for name in ["a", "b", "c"] {
        let user = backend.seed_user(name).await;
        backend
            .registration_service
            .register_for_event(user.id, event.id)
            .await
            .unwrap();
    }

    let shrink = UpdateEventRequest {
        max_participants: Some(2),
        ..Default::default()
    };
    let err = backend
        .event_service
        .update_event(organizer.id, event.id, shrink, None)
        .await
        .unwrap_err();
    assert_matches!(err, CampusHubError::InvalidInput(_));

    let grow = UpdateEventRequest {
        max_participants: Some(10),
        ..Default::default()
    };
    let updated = backend
        .event_service
        .update_event(organizer.id, event.id, grow, None)
        .await
        .unwrap();
    assert_eq!(updated.max_participants, 10);
}

#[tokio::test]
async fn only_the_owner_can_touch_an_event() {
    let backend = TestBackend::new();
    let organizer = backend.seed_organizer("orga").await;
    let other = backend.seed_organizer("other").await;
    let event = published_event(organizer.id, 5);
    backend.seed_event(&event).await;

    let rename = UpdateEventRequest {
        title: Some("Hijacked".to_string()),
        ..Default::default()
    };
    let err = backend
        .event_service
        .update_event(other.id, event.id, rename, None)
        .await
        .unwrap_err();
    assert_matches!(err, CampusHubError::PermissionDenied(_));

    let err = backend
        .event_service
        .delete_event(other.id, event.id)
        .await
        .unwrap_err();
    assert_matches!(err, CampusHubError::PermissionDenied(_));
}

#[tokio::test]
async fn deleting_a_draft_removes_it_but_published_is_cancelled() {
    let backend = TestBackend::new();
    let organizer = backend.seed_organizer("orga").await;

    let draft = backend
        .event_service
        .create_event(organizer.id, offline_request(), None)
        .await
        .unwrap();
    backend
        .event_service
        .delete_event(organizer.id, draft.id)
        .await
        .unwrap();
    assert!(backend.events.get(draft.id).await.unwrap().is_none());

    let published = published_event(organizer.id, 5);
    backend.seed_event(&published).await;
    backend
        .event_service
        .delete_event(organizer.id, published.id)
        .await
        .unwrap();

    let refreshed = backend.events.get(published.id).await.unwrap().unwrap();
    assert_eq!(refreshed.status, EventStatus::Cancelled);
}

#[tokio::test]
async fn completed_events_are_frozen() {
    let backend = TestBackend::new();
    let organizer = backend.seed_organizer("orga").await;

    let mut event = published_event(organizer.id, 5);
    event.status = EventStatus::Completed;
    backend.seed_event(&event).await;

    let rename = UpdateEventRequest {
        title: Some("Too late".to_string()),
        ..Default::default()
    };
    let err = backend
        .event_service
        .update_event(organizer.id, event.id, rename, None)
        .await
        .unwrap_err();
    assert_matches!(err, CampusHubError::InvalidInput(_));
}

#[tokio::test]
async fn listing_defaults_to_published_events() {
    let backend = TestBackend::new();
    let organizer = backend.seed_organizer("orga").await;

    let mut draft = published_event(organizer.id, 5);
    draft.status = EventStatus::Draft;
    backend.seed_event(&draft).await;

    let published = published_event(organizer.id, 5);
    backend.seed_event(&published).await;

    let listed = backend
        .event_service
        .list_events(EventFilter::default())
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, published.id);

    let drafts = backend
        .event_service
        .list_events(EventFilter {
            status: Some(EventStatus::Draft),
            category: None,
        })
        .await
        .unwrap();
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].id, draft.id);
}
