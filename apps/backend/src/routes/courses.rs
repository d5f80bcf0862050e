//! Course resource routes.

use actix_web::error::QueryPayloadError;
use actix_web::http::header::LOCATION;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::{CourseId, ValidatedJson};
use crate::repos::courses::{Course, CourseFilter};
use crate::services::courses::{CoursePatch, CourseService};
use crate::state::app_state::AppState;

/// Route name of the course collection.
pub const COURSES_LIST: &str = "courses-list";
/// Route name of a single course.
pub const COURSES_DETAIL: &str = "courses-detail";

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CourseResponse {
    pub id: i64,
    pub name: String,
    pub students: Vec<i64>,
}

impl From<Course> for CourseResponse {
    fn from(course: Course) -> Self {
        Self {
            id: course.id,
            name: course.name,
            students: course.student_ids,
        }
    }
}

/// Body of POST and PUT.
#[derive(Debug, Deserialize)]
pub struct CourseWriteRequest {
    pub name: String,
    #[serde(default)]
    pub students: Vec<i64>,
}

/// Body of PATCH.
#[derive(Debug, Default, Deserialize)]
pub struct CoursePatchRequest {
    pub name: Option<String>,
    pub students: Option<Vec<i64>>,
}

/// Raw list filters; `id` is parsed like the `{course_id}` path segment.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub id: Option<String>,
    pub name: Option<String>,
}

impl ListQuery {
    fn into_filter(self) -> Result<CourseFilter, AppError> {
        let id = match self.id.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(CourseId::parse(raw)?.0),
        };
        let name = self.name.filter(|n| !n.is_empty());
        Ok(CourseFilter { id, name })
    }
}

/// GET /api/v1/courses
async fn list_courses(
    http_req: HttpRequest,
    query: web::Query<ListQuery>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<Vec<CourseResponse>>, AppError> {
    let filter = query.into_inner().into_filter()?;

    let courses = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(CourseService::new().list(txn, &filter).await?) })
    })
    .await?;

    Ok(web::Json(
        courses.into_iter().map(CourseResponse::from).collect(),
    ))
}

/// GET /api/v1/courses/{course_id}
async fn get_course(
    http_req: HttpRequest,
    course_id: CourseId,
    app_state: web::Data<AppState>,
) -> Result<web::Json<CourseResponse>, AppError> {
    let id = course_id.0;

    let course = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(CourseService::new().get(txn, id).await?) })
    })
    .await?;

    Ok(web::Json(course.into()))
}

/// POST /api/v1/courses
///
/// Responds 201 with the new course and a `Location` header pointing at it.
async fn create_course(
    http_req: HttpRequest,
    body: ValidatedJson<CourseWriteRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let CourseWriteRequest { name, students } = body.into_inner();

    let course = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(CourseService::new().create(txn, &name, &students).await?) })
    })
    .await?;

    let location = http_req
        .url_for(COURSES_DETAIL, [course.id.to_string()])
        .map_err(|e| AppError::internal(format!("Failed to build course URL: {e}")))?;

    info!(course_id = course.id, students = course.student_ids.len(), "course.created");

    Ok(HttpResponse::Created()
        .insert_header((LOCATION, location.as_str()))
        .json(CourseResponse::from(course)))
}

/// PUT /api/v1/courses/{course_id}
async fn replace_course(
    http_req: HttpRequest,
    course_id: CourseId,
    body: ValidatedJson<CourseWriteRequest>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<CourseResponse>, AppError> {
    let id = course_id.0;
    let CourseWriteRequest { name, students } = body.into_inner();

    let course = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            Ok(CourseService::new()
                .replace(txn, id, &name, &students)
                .await?)
        })
    })
    .await?;

    info!(course_id = id, "course.updated");
    Ok(web::Json(course.into()))
}

/// PATCH /api/v1/courses/{course_id}
async fn patch_course(
    http_req: HttpRequest,
    course_id: CourseId,
    body: ValidatedJson<CoursePatchRequest>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<CourseResponse>, AppError> {
    let id = course_id.0;
    let CoursePatchRequest { name, students } = body.into_inner();
    let patch = CoursePatch { name, students };

    let course = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(CourseService::new().patch(txn, id, patch).await?) })
    })
    .await?;

    info!(course_id = id, "course.updated");
    Ok(web::Json(course.into()))
}

/// DELETE /api/v1/courses/{course_id}
async fn delete_course(
    http_req: HttpRequest,
    course_id: CourseId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = course_id.0;

    with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(CourseService::new().delete(txn, id).await?) })
    })
    .await?;

    info!(course_id = id, "course.deleted");
    Ok(HttpResponse::NoContent().finish())
}

/// Query strings that do not fit `ListQuery` (e.g. a repeated `id`).
fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "Rejected course list query");
    AppError::bad_request(ErrorCode::BadRequest, err.to_string()).into()
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(query_error));
    cfg.service(
        web::resource("")
            .name(COURSES_LIST)
            .route(web::get().to(list_courses))
            .route(web::post().to(create_course)),
    );
    cfg.service(
        web::resource("/{course_id}")
            .name(COURSES_DETAIL)
            .route(web::get().to(get_course))
            .route(web::put().to(replace_course))
            .route(web::patch().to(patch_course))
            .route(web::delete().to(delete_course)),
    );
}
