//! End-to-end request lifecycle over HTTP with in-memory adapters.
//!
//! Drives registration, assignment, manual status changes, the geofence and
//! the geofence watcher through the same wiring the server uses.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use chrono::{Duration, TimeZone, Utc};
use mockable::Clock;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use helpdesk::Trace;
use helpdesk::domain::ports::{
    AssignTechnicianRequest, FixedPositionSource, HelpRequestRepository, RegisterRequest,
    RequestCommand, RequestQuery, TechnicianRepository, UpdateStatusRequest,
};
use helpdesk::domain::{
    Assignment, Coordinates, GeofenceWatcher, RequestDetails, RequestStatus, RequestType,
    RequestWorkflowService, TechnicianDeduplicator, TechnicianDirectoryService, TechnicianName,
    WatchExit,
};
use helpdesk::inbound::http::configure;
use helpdesk::inbound::http::state::HttpState;
use helpdesk::test_support::{InMemoryStore, MutableClock};

/// Destination used by every geolocated request in this suite.
const DESTINATION: (f64, f64) = (4.710_989, -74.072_092);

struct Harness {
    store: Arc<InMemoryStore>,
    clock: MutableClock,
    workflow: Arc<RequestWorkflowService<InMemoryStore, InMemoryStore>>,
    state: HttpState,
}

#[fixture]
fn harness() -> Harness {
    let clock = MutableClock::new(
        Utc.with_ymd_and_hms(2024, 7, 1, 8, 0, 0)
            .single()
            .expect("valid timestamp"),
    );
    let shared_clock: Arc<dyn Clock> = Arc::new(clock.clone());
    let store = Arc::new(InMemoryStore::new(Arc::clone(&shared_clock)));
    let workflow = Arc::new(RequestWorkflowService::new(
        Arc::clone(&store),
        Arc::clone(&store),
        shared_clock,
    ));
    let directory = Arc::new(TechnicianDirectoryService::new(Arc::clone(&store)));
    let state = HttpState::new(workflow.clone(), workflow.clone(), directory);
    Harness {
        store,
        clock,
        workflow,
        state,
    }
}

impl Harness {
    async fn seed(&self) {
        TechnicianDirectoryService::new(Arc::clone(&self.store))
            .seed_default_roster()
            .await
            .expect("roster seeds");
    }

    fn app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(web::Data::new(self.state.clone()))
            .wrap(Trace)
            .configure(configure)
    }
}

async fn send(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    request: actix_test::TestRequest,
) -> (StatusCode, Value) {
    let response = actix_test::call_service(app, request.to_request()).await;
    let status = response.status();
    let body: Value = actix_test::read_body_json(response).await;
    (status, body)
}

fn geolocated_request() -> Value {
    json!({
        "companyName": "Droguería El Sol",
        "contactName": "Marta",
        "requestType": "Servicio Técnico",
        "faultDescription": "Impresora no enciende",
        "latitude": DESTINATION.0,
        "longitude": DESTINATION.1
    })
}

#[rstest]
#[actix_web::test]
async fn full_lifecycle_reaches_done(harness: Harness) {
    harness.seed().await;
    let app = actix_test::init_service(harness.app()).await;

    let (status, created) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/requests")
            .set_json(geolocated_request()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "Pendiente");
    let id = created["id"].as_i64().expect("numeric id");

    let (status, assigned) = send(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/requests/{id}/assign"))
            .set_json(json!({"technicianName": "  ANA ORTIZ "})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(assigned["status"], "Asignada");
    assert_eq!(assigned["assigned_to"], "ANA ORTIZ");
    let technician_id = assigned["technician_id"].as_i64().expect("technician id");

    let (status, en_route) = send(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/requests/{id}/status"))
            .set_json(json!({"status": "En camino"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(en_route["status"], "En camino");

    let (status, far) = send(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/requests/{id}/auto-status"))
            .set_json(json!({"latitude": 4.72, "longitude": -74.07})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(far["status"], "En camino");
    assert!(far["distance"].as_f64().expect("distance") > 50.0);

    let (status, arrived) = send(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/requests/{id}/auto-status"))
            .set_json(json!({"latitude": DESTINATION.0, "longitude": DESTINATION.1})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(arrived["status"], "En progreso");
    assert_eq!(arrived["request"]["status"], "En progreso");

    let (status, done) = send(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/requests/{id}/status"))
            .set_json(json!({"status": "Terminado"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["status"], "Terminado");

    let (status, mine) = send(
        &app,
        actix_test::TestRequest::get().uri(&format!("/requests/technician/{technician_id}")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().map(Vec::len), Some(1));
    assert_eq!(mine[0]["status"], "Terminado");
}

#[rstest]
#[actix_web::test]
async fn delivery_errand_runs_to_completion_and_geofence_stays_quiet(harness: Harness) {
    harness.seed().await;
    let app = actix_test::init_service(harness.app()).await;

    let (status, created) = send(
        &app,
        actix_test::TestRequest::post().uri("/requests").set_json(json!({
            "requestType": "Entrega",
            "taskToPerform": "Deliver invoice",
            "documentsToCarry": ["Invoice", "ID"],
            "latitude": 0.0,
            "longitude": 0.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["request_type"], "Entrega");
    assert_eq!(created["task_to_perform"], "Deliver invoice");
    assert_eq!(created["documents_to_carry"], json!(["Invoice", "ID"]));
    let id = created["id"].as_i64().expect("numeric id");

    let (status, assigned) = send(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/requests/{id}/assign"))
            .set_json(json!({"technicianName": "Pedro López"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(assigned["assigned_to"], "Pedro López");
    assert_eq!(assigned["status"], "Asignada");

    let (status, _) = send(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/requests/{id}/status"))
            .set_json(json!({"status": "En camino"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, far) = send(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/requests/{id}/auto-status"))
            .set_json(json!({"latitude": 1.0, "longitude": 1.0})),
    )
    .await;
    assert_eq!(far["status"], "En camino");
    let distance = far["distance"].as_f64().expect("distance");
    assert!((distance - 157_249.6).abs() < 1.0);

    let (_, arrived) = send(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/requests/{id}/auto-status"))
            .set_json(json!({"latitude": 0.0, "longitude": 0.0})),
    )
    .await;
    assert_eq!(arrived["status"], "En progreso");

    let (status, done) = send(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/requests/{id}/status"))
            .set_json(json!({"status": "Terminado"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["status"], "Terminado");

    for _ in 0..2 {
        let (status, after) = send(
            &app,
            actix_test::TestRequest::put()
                .uri(&format!("/requests/{id}/auto-status"))
                .set_json(json!({"latitude": 0.0, "longitude": 0.0})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(after["status"], "Terminado");
        assert!(after.get("request").is_none());
    }

    let (_, reloaded) = send(
        &app,
        actix_test::TestRequest::get().uri(&format!("/requests/{id}")),
    )
    .await;
    assert_eq!(reloaded, done);
}

#[rstest]
#[actix_web::test]
async fn assigning_the_same_technician_twice_is_idempotent(harness: Harness) {
    harness.seed().await;
    let app = actix_test::init_service(harness.app()).await;
    let (_, created) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/requests")
            .set_json(geolocated_request()),
    )
    .await;
    let id = created["id"].as_i64().expect("numeric id");
    let assign = || {
        actix_test::TestRequest::put()
            .uri(&format!("/requests/{id}/assign"))
            .set_json(json!({"technicianName": "CARLOS LUJAN"}))
    };

    let (first_status, first) = send(&app, assign()).await;
    let (second_status, second) = send(&app, assign()).await;

    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(first, second);
    assert_eq!(second["status"], "Asignada");
    assert_eq!(second["assigned_to"], "CARLOS LUJAN");
}

#[rstest]
#[actix_web::test]
async fn listings_are_newest_first(harness: Harness) {
    let app = actix_test::init_service(harness.app()).await;
    for company in ["Primera", "Segunda", "Tercera"] {
        let (status, _) = send(
            &app,
            actix_test::TestRequest::post()
                .uri("/requests")
                .set_json(json!({"companyName": company, "requestType": "Entrega"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        harness.clock.advance(Duration::minutes(5));
    }

    let (status, listed) = send(&app, actix_test::TestRequest::get().uri("/requests")).await;

    assert_eq!(status, StatusCode::OK);
    let companies: Vec<&str> = listed
        .as_array()
        .expect("array body")
        .iter()
        .filter_map(|row| row["company_name"].as_str())
        .collect();
    assert_eq!(companies, vec!["Tercera", "Segunda", "Primera"]);
}

#[rstest]
#[actix_web::test]
async fn status_changes_require_an_assignment(harness: Harness) {
    let app = actix_test::init_service(harness.app()).await;
    let (_, created) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/requests")
            .set_json(geolocated_request()),
    )
    .await;
    let id = created["id"].as_i64().expect("numeric id");

    let (status, body) = send(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/requests/{id}/status"))
            .set_json(json!({"status": "En camino"})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "precondition_failed");
    assert!(body["traceId"].is_string());
}

#[rstest]
#[actix_web::test]
async fn unknown_technicians_and_requests_are_not_found(harness: Harness) {
    harness.seed().await;
    let app = actix_test::init_service(harness.app()).await;

    let (status, body) = send(
        &app,
        actix_test::TestRequest::put()
            .uri("/requests/99/assign")
            .set_json(json!({"technician": "NADIE"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "technician not found");

    let (status, body) = send(
        &app,
        actix_test::TestRequest::put()
            .uri("/requests/99/assign")
            .set_json(json!({"technician": "ANA ORTIZ"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "request not found");
}

#[rstest]
#[actix_web::test]
async fn seeding_is_idempotent_and_listed_by_name(harness: Harness) {
    harness.seed().await;
    harness.seed().await;
    let app = actix_test::init_service(harness.app()).await;

    let (status, listed) = send(&app, actix_test::TestRequest::get().uri("/technicians")).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = listed
        .as_array()
        .expect("array body")
        .iter()
        .filter_map(|row| row["name"].as_str())
        .collect();
    assert_eq!(names.len(), 7);
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);
}

#[rstest]
#[tokio::test]
async fn deduplication_keeps_newest_and_repoints_requests(harness: Harness) {
    let older = harness.store.add_technician("LUIS PEREZ").expect("valid name");
    harness.clock.advance(Duration::hours(1));
    let newer = harness.store.add_technician("LUIS PEREZ").expect("valid name");
    let created = harness
        .workflow
        .register(RegisterRequest {
            details: RequestDetails::new(RequestType::Other),
            destination: None,
        })
        .await
        .expect("register");
    // Legacy rows may still reference the older duplicate.
    harness
        .store
        .assign(
            created.id(),
            &Assignment::new(older.id(), older.name().clone()),
        )
        .await
        .expect("assign to older row")
        .expect("request present");

    let report = TechnicianDeduplicator::new(Arc::clone(&harness.store))
        .run(false)
        .await
        .expect("dedup runs");

    assert!(report.applied);
    assert_eq!(report.plan.removed_ids(), vec![older.id()]);
    assert_eq!(harness.store.technician_count(), 1);
    let survivor = harness
        .store
        .find_by_name(&TechnicianName::new("LUIS PEREZ").expect("valid name"))
        .await
        .expect("lookup")
        .expect("survivor present");
    assert_eq!(survivor.id(), newer.id());
    let reassigned = harness
        .workflow
        .get_request(created.id())
        .await
        .expect("request present");
    assert_eq!(
        reassigned.assignment().map(Assignment::technician_id),
        Some(newer.id())
    );
    assert_eq!(reassigned.status(), RequestStatus::Assigned);
}

#[rstest]
#[tokio::test]
async fn dry_run_leaves_duplicates_in_place(harness: Harness) {
    harness.store.add_technician("ANA ORTIZ").expect("valid name");
    harness.store.add_technician("ANA ORTIZ").expect("valid name");

    let report = TechnicianDeduplicator::new(Arc::clone(&harness.store))
        .run(true)
        .await
        .expect("dry run");

    assert!(!report.applied);
    assert_eq!(report.plan.merges.len(), 1);
    assert_eq!(harness.store.technician_count(), 2);
}

#[rstest]
#[tokio::test]
async fn deleting_a_technician_unassigns_without_reverting_status(harness: Harness) {
    harness.seed().await;
    let created = harness
        .workflow
        .register(RegisterRequest {
            details: RequestDetails::new(RequestType::Pickup),
            destination: None,
        })
        .await
        .expect("register");
    let assigned = harness
        .workflow
        .assign_technician(AssignTechnicianRequest {
            request_id: created.id(),
            technician_name: "DANIEL DIAZ".to_owned(),
        })
        .await
        .expect("assign");
    let technician_id = assigned
        .assignment()
        .map(Assignment::technician_id)
        .expect("assigned");

    harness.store.delete_technician(technician_id);

    let reloaded = harness
        .workflow
        .get_request(created.id())
        .await
        .expect("request present");
    assert!(reloaded.assignment().is_none());
    assert_eq!(reloaded.status(), RequestStatus::Assigned);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn watcher_moves_en_route_requests_on_arrival(harness: Harness) {
    harness.seed().await;
    let destination = Coordinates::new(DESTINATION.0, DESTINATION.1).expect("valid destination");
    let created = harness
        .workflow
        .register(RegisterRequest {
            details: RequestDetails::new(
                RequestType::TechnicalService,
            ),
            destination: Some(destination),
        })
        .await
        .expect("register");
    harness
        .workflow
        .assign_technician(AssignTechnicianRequest {
            request_id: created.id(),
            technician_name: "ANA ORTIZ".to_owned(),
        })
        .await
        .expect("assign");
    harness
        .workflow
        .update_status(UpdateStatusRequest {
            request_id: created.id(),
            status: "En camino".to_owned(),
        })
        .await
        .expect("en route");

    let command: Arc<dyn RequestCommand> = harness.workflow.clone();
    let handle = GeofenceWatcher::spawn(
        command,
        Arc::new(FixedPositionSource(destination)),
        [created.id()],
        StdDuration::from_secs(30),
    );

    assert_eq!(handle.join().await, Some(WatchExit::Drained));
    let reloaded = harness
        .workflow
        .get_request(created.id())
        .await
        .expect("request present");
    assert_eq!(reloaded.status(), RequestStatus::InProgress);
}
