use actix_web::http::StatusCode;
use actix_web::{test, HttpMessage};
use backend::db::require_db;
use backend::db::txn::SharedTxn;
use backend::repos::courses;
use backend::AppError;
use backend_test_support::problem_details::assert_problem_details_from_service_response;
use serde_json::{json, Value};

use crate::support::factory::{create_course, create_course_named, create_students};
use crate::support::urls::course_url;
use crate::support::{build_test_state, create_test_app};

#[actix_web::test]
async fn test_patch_name_changes_only_name() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;

    let students = create_students(shared.transaction(), 2).await?;
    let ids: Vec<i64> = students.iter().map(|s| s.id).collect();
    let course = create_course_named(shared.transaction(), "History", &ids).await?;

    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::patch()
        .uri(&course_url(course.id))
        .set_json(json!({"name": "some course"}))
        .to_request();
    req.extensions_mut().insert(shared.clone());
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({"id": course.id, "name": "some course", "students": ids})
    );

    let stored = courses::require(shared.transaction(), course.id).await?;
    assert_eq!(stored.name, "some course");
    assert_eq!(stored.student_ids, ids);

    shared.rollback().await?;
    Ok(())
}

#[actix_web::test]
async fn test_patch_students_keeps_name() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;

    let students = create_students(shared.transaction(), 3).await?;
    let course =
        create_course_named(shared.transaction(), "Latin", &[students[0].id]).await?;

    let app = create_test_app(state).with_prod_routes().build().await?;

    let new_ids = [students[2].id, students[1].id];
    let req = test::TestRequest::patch()
        .uri(&course_url(course.id))
        .set_json(json!({ "students": new_ids }))
        .to_request();
    req.extensions_mut().insert(shared.clone());
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["name"], "Latin");
    assert_eq!(body["students"], json!(new_ids));

    shared.rollback().await?;
    Ok(())
}

#[actix_web::test]
async fn test_patch_with_empty_body_returns_unchanged_course() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;

    let course = create_course(shared.transaction()).await?;

    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::patch()
        .uri(&course_url(course.id))
        .set_json(json!({"srudents": [1]}))
        .to_request();
    req.extensions_mut().insert(shared.clone());
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], course.id);
    assert_eq!(body["name"], course.name.as_str());
    assert_eq!(body["students"], json!([]));

    shared.rollback().await?;
    Ok(())
}

#[actix_web::test]
async fn test_patch_missing_course_is_404() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::patch()
        .uri(&course_url(4242))
        .set_json(json!({"name": "nothing"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details_from_service_response(
        resp,
        "COURSE_NOT_FOUND",
        StatusCode::NOT_FOUND,
        Some("4242"),
    )
    .await;
    Ok(())
}

#[actix_web::test]
async fn test_patch_blank_name_is_rejected_and_course_unchanged() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;

    let course = create_course_named(shared.transaction(), "Music", &[]).await?;

    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::patch()
        .uri(&course_url(course.id))
        .set_json(json!({"name": "  "}))
        .to_request();
    req.extensions_mut().insert(shared.clone());
    let resp = test::call_service(&app, req).await;

    assert_problem_details_from_service_response(
        resp,
        "VALIDATION_ERROR",
        StatusCode::BAD_REQUEST,
        None,
    )
    .await;

    let stored = courses::require(shared.transaction(), course.id).await?;
    assert_eq!(stored.name, "Music");

    shared.rollback().await?;
    Ok(())
}

#[actix_web::test]
async fn test_put_replaces_name_and_clears_students_by_default() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;

    let students = create_students(shared.transaction(), 2).await?;
    let ids: Vec<i64> = students.iter().map(|s| s.id).collect();
    let course = create_course_named(shared.transaction(), "Drama", &ids).await?;

    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::put()
        .uri(&course_url(course.id))
        .set_json(json!({"name": "Theatre"}))
        .to_request();
    req.extensions_mut().insert(shared.clone());
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({"id": course.id, "name": "Theatre", "students": []})
    );

    let stored = courses::require(shared.transaction(), course.id).await?;
    assert!(stored.student_ids.is_empty());

    shared.rollback().await?;
    Ok(())
}

#[actix_web::test]
async fn test_put_with_students_sets_full_list() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;

    let students = create_students(shared.transaction(), 3).await?;
    let course =
        create_course_named(shared.transaction(), "Logic", &[students[0].id]).await?;

    let app = create_test_app(state).with_prod_routes().build().await?;

    let new_ids = [students[1].id, students[2].id];
    let req = test::TestRequest::put()
        .uri(&course_url(course.id))
        .set_json(json!({"name": "Logic II", "students": new_ids}))
        .to_request();
    req.extensions_mut().insert(shared.clone());
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["name"], "Logic II");
    assert_eq!(body["students"], json!(new_ids));

    shared.rollback().await?;
    Ok(())
}

#[actix_web::test]
async fn test_put_without_name_is_bad_request() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;

    let course = create_course(shared.transaction()).await?;

    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::put()
        .uri(&course_url(course.id))
        .set_json(json!({"students": []}))
        .to_request();
    req.extensions_mut().insert(shared.clone());
    let resp = test::call_service(&app, req).await;

    assert_problem_details_from_service_response(
        resp,
        "BAD_REQUEST",
        StatusCode::BAD_REQUEST,
        None,
    )
    .await;

    shared.rollback().await?;
    Ok(())
}
