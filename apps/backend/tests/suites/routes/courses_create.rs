use actix_web::http::header::LOCATION;
use actix_web::http::StatusCode;
use actix_web::{test, HttpMessage};
use backend::db::require_db;
use backend::db::txn::SharedTxn;
use backend::repos::courses;
use backend::AppError;
use backend_test_support::problem_details::assert_problem_details_from_service_response;
use serde_json::{json, Value};

use crate::support::factory::create_students;
use crate::support::urls::{course_url, COURSES_URL};
use crate::support::{build_test_state, create_test_app};

#[actix_web::test]
async fn test_create_course_ignores_unknown_fields() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;

    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::post()
        .uri(COURSES_URL)
        .set_json(json!({"name": "some course", "srudents": [1, 2, 3]}))
        .to_request();
    req.extensions_mut().insert(shared.clone());
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let location = resp
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .expect("Location header should be present");

    let body: Value = test::read_body_json(resp).await;
    let id = body["id"].as_i64().expect("id should be an integer");
    assert_eq!(body["name"], "some course");
    assert_eq!(body["students"], json!([]));
    assert!(
        location.ends_with(&course_url(id)),
        "Location {location} should point at the new course"
    );

    let stored = courses::require(shared.transaction(), id).await?;
    assert_eq!(stored.name, "some course");
    assert!(stored.student_ids.is_empty());

    shared.rollback().await?;
    Ok(())
}

#[actix_web::test]
async fn test_create_course_with_students() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;

    let students = create_students(shared.transaction(), 2).await?;
    let (a, b) = (students[0].id, students[1].id);

    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::post()
        .uri(COURSES_URL)
        .set_json(json!({"name": "  Botany  ", "students": [b, a, b]}))
        .to_request();
    req.extensions_mut().insert(shared.clone());
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], "Botany");
    assert_eq!(body["students"], json!([b, a]));

    let id = body["id"].as_i64().expect("id should be an integer");
    let stored = courses::require(shared.transaction(), id).await?;
    assert_eq!(stored.student_ids, vec![b, a]);

    shared.rollback().await?;
    Ok(())
}

#[actix_web::test]
async fn test_create_with_unknown_student_is_rejected() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;

    let students = create_students(shared.transaction(), 1).await?;
    let known = students[0].id;
    let unknown = known + 1000;

    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::post()
        .uri(COURSES_URL)
        .set_json(json!({"name": "Zoology", "students": [known, unknown]}))
        .to_request();
    req.extensions_mut().insert(shared.clone());
    let resp = test::call_service(&app, req).await;

    assert_problem_details_from_service_response(
        resp,
        "UNKNOWN_STUDENT",
        StatusCode::BAD_REQUEST,
        Some(&unknown.to_string()),
    )
    .await;

    let all = courses::list(shared.transaction(), &Default::default()).await?;
    assert!(all.is_empty(), "no course should have been created");

    shared.rollback().await?;
    Ok(())
}

#[actix_web::test]
async fn test_create_rejects_bad_names() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let too_long = "x".repeat(257);
    for name in ["", "   ", too_long.as_str()] {
        let req = test::TestRequest::post()
            .uri(COURSES_URL)
            .set_json(json!({ "name": name }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_problem_details_from_service_response(
            resp,
            "VALIDATION_ERROR",
            StatusCode::BAD_REQUEST,
            Some("Course name"),
        )
        .await;
    }
    Ok(())
}

#[actix_web::test]
async fn test_create_with_malformed_json_is_bad_request() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::post()
        .uri(COURSES_URL)
        .insert_header(("content-type", "application/json"))
        .set_payload(r#"{"name": "#)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details_from_service_response(
        resp,
        "BAD_REQUEST",
        StatusCode::BAD_REQUEST,
        Some("Invalid JSON"),
    )
    .await;
    Ok(())
}

#[actix_web::test]
async fn test_create_without_name_is_bad_request() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::post()
        .uri(COURSES_URL)
        .set_json(json!({"students": []}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details_from_service_response(
        resp,
        "BAD_REQUEST",
        StatusCode::BAD_REQUEST,
        Some("wrong types"),
    )
    .await;
    Ok(())
}
