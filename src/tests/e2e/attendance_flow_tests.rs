use crate::modules::attendance::adapters::outbound::local_store::LocalRecordStore;
use crate::modules::attendance::adapters::outbound::projections_in_memory::InMemoryProjections;
use crate::modules::attendance::adapters::outbound::record_store::RecordStore;
use crate::modules::attendance::adapters::outbound::synchronized_store::SynchronizedRecordStore;
use crate::modules::attendance::core::events::AttendanceEvent;
use crate::modules::attendance::core::record::RecordScope;
use crate::modules::dashboard::core::renderer::TableBody;
use crate::modules::dashboard::core::view::Screen;
use crate::modules::dashboard::use_cases::dashboard::Dashboard;
use crate::modules::session::core::session::Credentials;
use crate::modules::session::use_cases::session_gate::SessionGate;
use crate::shared::infrastructure::event_store::in_memory::InMemoryEventStore;
use crate::shared::infrastructure::key_value::in_memory::InMemoryKeyValueStore;
use crate::shell::http::router;
use crate::shell::state::AppState;
use crate::tests::fixtures::clock::ManualClock;
use crate::tests::fixtures::context::{ALICE_EMAIL, BOB_EMAIL, PASSWORD, app_context, identity};
use crate::tests::fixtures::stores::{HeldListingStore, synchronized_store};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use rstest::rstest;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

enum Backend {
    Synchronized,
    Local,
}

fn store(backend: Backend, clock: Arc<ManualClock>) -> Arc<dyn RecordStore> {
    match backend {
        Backend::Synchronized => Arc::new(SynchronizedRecordStore::new(
            Arc::new(InMemoryEventStore::<AttendanceEvent>::new()),
            Arc::new(InMemoryProjections::new()),
            clock,
        )),
        Backend::Local => Arc::new(LocalRecordStore::new(
            Arc::new(InMemoryKeyValueStore::new()),
            clock,
        )),
    }
}

fn local_store() -> Arc<dyn RecordStore> {
    store(
        Backend::Local,
        Arc::new(ManualClock::starting_at(1_700_000_000_000)),
    )
}

async fn log_in(app: &Router) -> String {
    let login = app
        .clone()
        .oneshot(
            Request::post("/login")
                .header("content-type", "application/x-www-form-urlencoded")
                .body(Body::from(format!("email={ALICE_EMAIL}&password={PASSWORD}")))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(login.status(), StatusCode::SEE_OTHER);
    login
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn post_form(uri: &str, cookie: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .header(header::COOKIE, cookie)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str, cookie: &str) -> Request<Body> {
    Request::get(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

#[rstest]
#[case::synchronized(Backend::Synchronized)]
#[case::local(Backend::Local)]
#[tokio::test]
async fn marks_lists_and_deletes_attendance_through_the_dashboard(#[case] backend: Backend) {
    let clock = Arc::new(ManualClock::starting_at(1_700_000_000_000));
    let records = store(backend, clock.clone());
    let context = app_context(records.clone(), identity(), RecordScope::PerOwner);
    let app = router(AppState::new(context, Duration::from_millis(50)));

    let cookie = log_in(&app).await;

    let (_, page) = send(&app, get("/", &cookie)).await;
    assert!(page.contains("No records found"));

    let (status, _) = send(&app, post_form("/records", &cookie, "name=Alice")).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    clock.advance(60_000);
    let (status, _) = send(&app, post_form("/records", &cookie, "name=Bob")).await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let (_, page) = send(&app, get("/", &cookie)).await;
    let bob_at = page.find("<td>Bob</td>").expect("Bob missing");
    let alice_at = page.find("<td>Alice</td>").expect("Alice missing");
    assert!(bob_at < alice_at);
    assert!(page.contains("<td>Bob</td><td>14/11/2023</td><td>22:14:20</td>"));

    let alice_id = records
        .list_records(None)
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.display_name == "Alice")
        .unwrap()
        .id;
    let (status, _) = send(
        &app,
        post_form(
            &format!("/records/{alice_id}/delete"),
            &cookie,
            "confirmed=true",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let (_, page) = send(&app, get("/", &cookie)).await;
    assert!(page.contains("<td>Bob</td>"));
    assert!(!page.contains("<td>Alice</td>"));
}

#[tokio::test]
async fn drops_a_listing_that_returns_after_sign_out() {
    let identity = identity();
    let held = Arc::new(HeldListingStore::new(Arc::new(synchronized_store(
        ManualClock::starting_at(1_700_000_000_000),
    ))));
    let context = app_context(held.clone(), identity.clone(), RecordScope::Shared);

    let gate = SessionGate::open(identity, None).await.unwrap();
    let session = gate
        .sign_in(&Credentials::new(ALICE_EMAIL, PASSWORD))
        .await
        .unwrap();
    held.add_record(&session.owner(), "Alice").await.unwrap();

    held.hold();
    let dashboard = Dashboard::mount(context, gate);
    held.listing_in_flight().await;
    assert_eq!(dashboard.view().table, TableBody::Loading);

    dashboard.sign_out().await.unwrap();
    held.release();
    tokio::time::sleep(Duration::from_millis(20)).await;

    let view = dashboard.settled().await;
    assert_eq!(view.screen, Screen::Landing);
    assert_eq!(view.table, TableBody::Cleared);
    assert!(view.table.rows().is_empty());
}

#[tokio::test]
async fn shows_records_added_through_the_api_on_the_next_page_load() {
    let records = local_store();
    let context = app_context(records.clone(), identity(), RecordScope::PerOwner);
    let app = router(AppState::new(context, Duration::from_millis(50)));
    let cookie = log_in(&app).await;

    let (_, page) = send(&app, get("/", &cookie)).await;
    assert!(page.contains("No records found"));

    let (status, body) = send(
        &app,
        Request::post("/gql")
            .header("content-type", "application/json")
            .header(header::COOKIE, &cookie)
            .body(Body::from(
                r#"{"query":"mutation { addRecord(name: \"ViaApi\") { id } }"}"#,
            ))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.contains("errors"), "unexpected response {body}");
    let names: Vec<String> = records
        .list_records(None)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.display_name)
        .collect();
    assert_eq!(names, vec!["ViaApi"]);

    let (_, page) = send(&app, get("/", &cookie)).await;
    assert!(page.contains("<td>ViaApi</td>"));
    assert!(!page.contains("No records found"));
}

#[tokio::test]
async fn drops_a_refresh_that_returns_after_sign_out() {
    let identity = identity();
    let held = Arc::new(HeldListingStore::new(local_store()));
    let context = app_context(held.clone(), identity.clone(), RecordScope::PerOwner);
    let gate = SessionGate::open(identity, None).await.unwrap();
    gate.sign_in(&Credentials::new(ALICE_EMAIL, PASSWORD))
        .await
        .unwrap();
    let dashboard = Dashboard::mount(context, gate);
    assert_eq!(dashboard.settled().await.table, TableBody::Placeholder);

    held.hold();
    let submitting = tokio::spawn({
        let dashboard = dashboard.clone();
        async move { dashboard.submit("Alice").await }
    });
    held.listing_in_flight().await;

    dashboard.sign_out().await.unwrap();
    held.release();
    submitting.await.unwrap().unwrap();

    let view = dashboard.settled().await;
    assert_eq!(view.generation, 3);
    assert_eq!(view.screen, Screen::Landing);
    assert_eq!(view.table, TableBody::Cleared);
}

#[tokio::test]
async fn keeps_the_next_viewer_clear_of_a_refresh_from_the_previous_session() {
    let identity = identity();
    let held = Arc::new(HeldListingStore::new(local_store()));
    let context = app_context(held.clone(), identity.clone(), RecordScope::PerOwner);
    let gate = SessionGate::open(identity, None).await.unwrap();
    let alice = gate
        .sign_in(&Credentials::new(ALICE_EMAIL, PASSWORD))
        .await
        .unwrap();
    let dashboard = Dashboard::mount(context, gate.clone());
    dashboard.settled().await;

    held.hold_owner(&alice.user_id);
    let submitting = tokio::spawn({
        let dashboard = dashboard.clone();
        async move { dashboard.submit("Alice").await }
    });
    held.listing_in_flight().await;

    dashboard.sign_out().await.unwrap();
    gate.sign_in(&Credentials::new(BOB_EMAIL, PASSWORD))
        .await
        .unwrap();
    let view = dashboard.settled().await;
    assert_eq!(view.generation, 4);
    assert_eq!(view.table, TableBody::Placeholder);

    held.release();
    submitting.await.unwrap().unwrap();

    let view = dashboard.settled().await;
    assert_eq!(view.generation, 4);
    assert_eq!(
        view.screen,
        Screen::Dashboard {
            user_label: BOB_EMAIL.into()
        }
    );
    assert_eq!(view.table, TableBody::Placeholder);
}
