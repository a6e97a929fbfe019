//! Background sweep tests: event status advancement and H-1 reminders.

mod helpers;

use chrono::{Duration, Utc};
use helpers::*;

use CampusHub::models::EventStatus;
use CampusHub::store::EventStore;

#[tokio::test]
async fn published_event_goes_ongoing_once_started() {
    let backend = TestBackend::new();
    let organizer = backend.seed_organizer("orga").await;

    let mut event = published_event(organizer.id, 5);
    event.start_date = Utc::now() - Duration::hours(1);
    event.end_date = Utc::now() + Duration::hours(2);
    backend.seed_event(&event).await;

    let updated = backend.reconciler.advance_event_statuses().await.unwrap();
    assert_eq!(updated, 1);

    let refreshed = backend.events.get(event.id).await.unwrap().unwrap();
    assert_eq!(refreshed.status, EventStatus::Ongoing);
}

#[tokio::test]
async fn ended_events_complete_from_either_state() {
    let backend = TestBackend::new();
    let organizer = backend.seed_organizer("orga").await;

    let mut published = published_event(organizer.id, 5);
    published.start_date = Utc::now() - Duration::hours(5);
    published.end_date = Utc::now() - Duration::hours(2);
    backend.seed_event(&published).await;

    let mut ongoing = published_event(organizer.id, 5);
    ongoing.start_date = Utc::now() - Duration::hours(5);
    ongoing.end_date = Utc::now() - Duration::hours(2);
    ongoing.status = EventStatus::Ongoing;
    backend.seed_event(&ongoing).await;

    let updated = backend.reconciler.advance_event_statuses().await.unwrap();
    assert_eq!(updated, 2);

    for id in [published.id, ongoing.id] {
        let refreshed = backend.events.get(id).await.unwrap().unwrap();
        assert_eq!(refreshed.status, EventStatus::Completed);
    }
}

#[tokio::test]
async fn draft_and_future_events_are_left_alone() {
    let backend = TestBackend::new();
    let organizer = backend.seed_organizer("orga").await;

    let mut draft = published_event(organizer.id, 5);
    draft.status = EventStatus::Draft;
    backend.seed_event(&draft).await;

    let future = published_event(organizer.id, 5);
    backend.seed_event(&future).await;

    let updated = backend.reconciler.advance_event_statuses().await.unwrap();
    assert_eq!(updated, 0);

    assert_eq!(
        backend.events.get(draft.id).await.unwrap().unwrap().status,
        EventStatus::Draft
    );
    assert_eq!(
        backend.events.get(future.id).await.unwrap().unwrap().status,
        EventStatus::Published
    );
}

#[tokio::test]
async fn reminders_go_out_once_in_the_h1_window() {
    let backend = TestBackend::new();
    let organizer = backend.seed_organizer("orga").await;
    let user = backend.seed_user("budi").await;

    let mut event = published_event(organizer.id, 5);
    event.event_type = CampusHub::models::EventType::Online;
    event.location = None;
    event.join_link = Some("https://meet.campus.test/seminar".to_string());
    backend.seed_event(&event).await;

    backend
        .registration_service
        .register_for_event(user.id, event.id)
        .await
        .unwrap();

    // Tomorrow: inside the 24..48h window
    let mut refreshed = backend.events.get(event.id).await.unwrap().unwrap();
    refreshed.start_date = Utc::now() + Duration::hours(30);
    refreshed.end_date = refreshed.start_date + Duration::hours(3);
    backend.events.update(&refreshed).await.unwrap();

    let sent = backend.reconciler.send_h1_reminders().await.unwrap();
    assert_eq!(sent, 1);

    // Online events reveal the join link in the reminder
    let mails = backend.notifier.sent().await;
    let reminders: Vec<_> = mails
        .iter()
        .filter_map(|m| match m {
            SentEmail::Reminder { to, join_link } => Some((to.clone(), join_link.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(reminders.len(), 1);
    assert_eq!(reminders[0].0, user.email);
    assert_eq!(
        reminders[0].1.as_deref(),
        Some("https://meet.campus.test/seminar")
    );

    // Second sweep is a no-op thanks to the reminder flag
    let sent_again = backend.reconciler.send_h1_reminders().await.unwrap();
    assert_eq!(sent_again, 0);
}

#[tokio::test]
async fn offline_event_reminders_carry_no_link() {
    let backend = TestBackend::new();
    let organizer = backend.seed_organizer("orga").await;
    let user = backend.seed_user("budi").await;

    // Offline event with a stale link left behind by an edit
    let mut event = published_event(organizer.id, 5);
    event.join_link = Some("https://meet.campus.test/old".to_string());
    event.start_date = Utc::now() + Duration::hours(30);
    event.end_date = event.start_date + Duration::hours(3);
    backend.seed_event(&event).await;

    backend
        .registration_service
        .register_for_event(user.id, event.id)
        .await
        .unwrap();

    let sent = backend.reconciler.send_h1_reminders().await.unwrap();
    assert_eq!(sent, 1);

    let mails = backend.notifier.sent().await;
    let reminder = mails
        .iter()
        .find_map(|m| match m {
            SentEmail::Reminder { join_link, .. } => Some(join_link.clone()),
            _ => None,
        })
        .expect("reminder sent");
    assert_eq!(reminder, None);
}

#[tokio::test]
async fn events_outside_the_window_get_no_reminder() {
    let backend = TestBackend::new();
    let organizer = backend.seed_organizer("orga").await;
    let user = backend.seed_user("budi").await;

    // Starts in a week, well outside 24..48h
    let event = published_event(organizer.id, 5);
    backend.seed_event(&event).await;
    backend
        .registration_service
        .register_for_event(user.id, event.id)
        .await
        .unwrap();

    let sent = backend.reconciler.send_h1_reminders().await.unwrap();
    assert_eq!(sent, 0);
}

#[tokio::test]
async fn waitlisted_rows_get_no_reminder() {
    let backend = TestBackend::new();
    let organizer = backend.seed_organizer("orga").await;
    let seated = backend.seed_user("seated").await;
    let waiting = backend.seed_user("waiting").await;

    let event = published_event(organizer.id, 1);
    backend.seed_event(&event).await;
    backend
        .registration_service
        .register_for_event(seated.id, event.id)
        .await
        .unwrap();
    backend
        .registration_service
        .register_for_event(waiting.id, event.id)
        .await
        .unwrap();

    let mut refreshed = backend.events.get(event.id).await.unwrap().unwrap();
    refreshed.start_date = Utc::now() + Duration::hours(30);
    refreshed.end_date = refreshed.start_date + Duration::hours(3);
    backend.events.update(&refreshed).await.unwrap();

    let sent = backend.reconciler.send_h1_reminders().await.unwrap();
    assert_eq!(sent, 1);

    let mails = backend.notifier.sent().await;
    let reminded: Vec<_> = mails
        .iter()
        .filter_map(|m| match m {
            SentEmail::Reminder { to, .. } => Some(to.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(reminded, vec![seated.email.clone()]);
}
