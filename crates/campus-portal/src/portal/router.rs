use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, PathRejection},
        FromRequest, FromRequestParts, Multipart, Path, Request, State,
    },
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use super::accounts::AccountError;
use super::catalog::CatalogError;
use super::domain::{
    CompetitionDetails, CompetitionDraft, CompetitionId, EventDetails, EventDraft, EventId,
    EventRegistrationId, EventRegistrationRequest, LoginRequest, PlacementDetails, PlacementId,
    PlacementRegistrationId, PlacementRegistrationRequest, StatusUpdate, Student, StudentDraft,
    StudentId, StudentUpdate,
};
use super::notify::{DeliveryOutcome, Mailer};
use super::registration::RegistrationError;
use super::resumes::{ResumeError, ResumeFile};
use super::seed::SeedError;
use super::store::{PortalStore, StoreError};
use super::PortalServices;

type Services<S, M> = State<Arc<PortalServices<S, M>>>;

/// Router exposing the portal's JSON API under `/api/v1`.
pub fn portal_router<S, M>(services: Arc<PortalServices<S, M>>) -> Router
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    Router::new()
        .route(
            "/api/v1/students",
            post(sign_up::<S, M>).get(list_students::<S, M>),
        )
        .route("/api/v1/students/login", post(login::<S, M>))
        .route(
            "/api/v1/students/{id}",
            get(get_student::<S, M>)
                .patch(update_student::<S, M>)
                .delete(delete_student::<S, M>),
        )
        .route(
            "/api/v1/students/{id}/registrations",
            get(student_registrations::<S, M>),
        )
        .route(
            "/api/v1/placements",
            post(create_placement::<S, M>).get(list_placements::<S, M>),
        )
        .route(
            "/api/v1/placements/{id}",
            get(get_placement::<S, M>)
                .put(update_placement::<S, M>)
                .delete(delete_placement::<S, M>),
        )
        .route(
            "/api/v1/events",
            post(create_event::<S, M>).get(list_events::<S, M>),
        )
        .route(
            "/api/v1/events/{id}",
            get(get_event::<S, M>)
                .put(update_event::<S, M>)
                .delete(delete_event::<S, M>),
        )
        .route(
            "/api/v1/competitions",
            post(create_competition::<S, M>).get(list_competitions::<S, M>),
        )
        .route(
            "/api/v1/competitions/{id}",
            get(get_competition::<S, M>)
                .put(update_competition::<S, M>)
                .delete(delete_competition::<S, M>),
        )
        .route(
            "/api/v1/registrations/placements",
            post(register_placement::<S, M>).get(list_placement_registrations::<S, M>),
        )
        .route(
            "/api/v1/registrations/placements/{id}",
            get(get_placement_registration::<S, M>)
                .patch(update_placement_status::<S, M>)
                .delete(withdraw_placement::<S, M>),
        )
        .route(
            "/api/v1/registrations/placements/{id}/resume",
            get(placement_resume::<S, M>),
        )
        .route(
            "/api/v1/registrations/events",
            post(register_event::<S, M>).get(list_event_registrations::<S, M>),
        )
        .route(
            "/api/v1/registrations/events/{id}",
            get(get_event_registration::<S, M>).delete(withdraw_event::<S, M>),
        )
        .route("/api/v1/jobs/reminders", post(run_reminders::<S, M>))
        .route("/api/v1/jobs/seed", post(seed_demo::<S, M>))
        .with_state(services)
}

/// Error body shared by every endpoint: `{"error": "<message>"}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn bad_request(message: impl ToString) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message.to_string())
    }

    /// Extractor rejections keep their status, except that undecodable
    /// bodies are reported as plain validation failures.
    fn rejected(status: StatusCode, message: String) -> Self {
        if status == StatusCode::UNPROCESSABLE_ENTITY {
            Self::bad_request(message)
        } else {
            Self::new(status, message)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, error = %self.message, "request failed");
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::rejected(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::rejected(rejection.status(), rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::rejected(rejection.status(), rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::rejected(err.status(), err.body_text())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            StoreError::Conflict(_) => Self::bad_request(err),
            StoreError::Unavailable(_) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::UserNotFound => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            AccountError::InvalidCredentials | AccountError::Validation(_) => {
                Self::bad_request(err)
            }
            AccountError::Credential(_) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            AccountError::Store(store) => store.into(),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(validation) => Self::bad_request(validation),
            CatalogError::Store(store) => store.into(),
        }
    }
}

impl From<RegistrationError> for ApiError {
    fn from(err: RegistrationError) -> Self {
        match err {
            RegistrationError::DuplicateRegistration(_) | RegistrationError::Validation(_) => {
                Self::bad_request(err)
            }
            RegistrationError::NoResume(_) => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            RegistrationError::Resume(ResumeError::Empty) => Self::bad_request(err),
            RegistrationError::Resume(ResumeError::Unavailable(_)) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            RegistrationError::Store(store) => store.into(),
        }
    }
}

impl From<SeedError> for ApiError {
    fn from(err: SeedError) -> Self {
        match err {
            SeedError::Store(store) => store.into(),
            other => Self::new(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        }
    }
}

/// `Json` whose rejections render as [`ApiError`].
struct ApiJson<T>(T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// `Path` whose rejections render as [`ApiError`].
struct ApiPath<T>(T);

impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

#[derive(Debug, Serialize)]
pub struct SignUpResponse {
    #[serde(flatten)]
    pub student: Student,
    pub notification: DeliveryOutcome,
}

async fn sign_up<S, M>(
    State(services): Services<S, M>,
    ApiJson(draft): ApiJson<StudentDraft>,
) -> Response
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    match services.accounts.sign_up(draft).await {
        Ok((student, notification)) => (
            StatusCode::CREATED,
            Json(SignUpResponse {
                student,
                notification,
            }),
        )
            .into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

async fn login<S, M>(
    State(services): Services<S, M>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Response
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    match services.accounts.login(&request) {
        Ok(student) => (StatusCode::OK, Json(student)).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

async fn list_students<S, M>(State(services): Services<S, M>) -> Response
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    match services.accounts.list() {
        Ok(students) => (StatusCode::OK, Json(students)).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

async fn get_student<S, M>(
    State(services): Services<S, M>,
    ApiPath(id): ApiPath<StudentId>,
) -> Response
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    match services.accounts.get(id) {
        Ok(student) => (StatusCode::OK, Json(student)).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

async fn update_student<S, M>(
    State(services): Services<S, M>,
    ApiPath(id): ApiPath<StudentId>,
    ApiJson(update): ApiJson<StudentUpdate>,
) -> Response
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    match services.accounts.update(id, update) {
        Ok(student) => (StatusCode::OK, Json(student)).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

async fn delete_student<S, M>(
    State(services): Services<S, M>,
    ApiPath(id): ApiPath<StudentId>,
) -> Response
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    match services.accounts.delete(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

async fn student_registrations<S, M>(
    State(services): Services<S, M>,
    ApiPath(id): ApiPath<StudentId>,
) -> Response
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    match services.registrations.for_student(id) {
        Ok(registrations) => (StatusCode::OK, Json(registrations)).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

async fn create_placement<S, M>(
    State(services): Services<S, M>,
    ApiJson(details): ApiJson<PlacementDetails>,
) -> Response
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    match services.catalog.create_placement(details) {
        Ok(placement) => (StatusCode::CREATED, Json(placement)).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

async fn list_placements<S, M>(State(services): Services<S, M>) -> Response
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    match services.catalog.placements() {
        Ok(placements) => (StatusCode::OK, Json(placements)).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

async fn get_placement<S, M>(
    State(services): Services<S, M>,
    ApiPath(id): ApiPath<PlacementId>,
) -> Response
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    match services.catalog.placement(id) {
        Ok(placement) => (StatusCode::OK, Json(placement)).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

async fn update_placement<S, M>(
    State(services): Services<S, M>,
    ApiPath(id): ApiPath<PlacementId>,
    ApiJson(details): ApiJson<PlacementDetails>,
) -> Response
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    match services.catalog.update_placement(id, details) {
        Ok(placement) => (StatusCode::OK, Json(placement)).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

async fn delete_placement<S, M>(
    State(services): Services<S, M>,
    ApiPath(id): ApiPath<PlacementId>,
) -> Response
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    match services.catalog.delete_placement(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

async fn create_event<S, M>(
    State(services): Services<S, M>,
    ApiJson(draft): ApiJson<EventDraft>,
) -> Response
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    match services.catalog.create_event(draft) {
        Ok(event) => (StatusCode::CREATED, Json(event)).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

async fn list_events<S, M>(State(services): Services<S, M>) -> Response
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    match services.catalog.events() {
        Ok(events) => (StatusCode::OK, Json(events)).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

async fn get_event<S, M>(
    State(services): Services<S, M>,
    ApiPath(id): ApiPath<EventId>,
) -> Response
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    match services.catalog.event(id) {
        Ok(event) => (StatusCode::OK, Json(event)).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

async fn update_event<S, M>(
    State(services): Services<S, M>,
    ApiPath(id): ApiPath<EventId>,
    ApiJson(details): ApiJson<EventDetails>,
) -> Response
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    match services.catalog.update_event(id, details) {
        Ok(event) => (StatusCode::OK, Json(event)).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

async fn delete_event<S, M>(
    State(services): Services<S, M>,
    ApiPath(id): ApiPath<EventId>,
) -> Response
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    match services.catalog.delete_event(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

async fn create_competition<S, M>(
    State(services): Services<S, M>,
    ApiJson(draft): ApiJson<CompetitionDraft>,
) -> Response
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    match services.catalog.create_competition(draft) {
        Ok(competition) => (StatusCode::CREATED, Json(competition)).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

async fn list_competitions<S, M>(State(services): Services<S, M>) -> Response
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    match services.catalog.competitions() {
        Ok(competitions) => (StatusCode::OK, Json(competitions)).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

async fn get_competition<S, M>(
    State(services): Services<S, M>,
    ApiPath(id): ApiPath<CompetitionId>,
) -> Response
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    match services.catalog.competition(id) {
        Ok(competition) => (StatusCode::OK, Json(competition)).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

async fn update_competition<S, M>(
    State(services): Services<S, M>,
    ApiPath(id): ApiPath<CompetitionId>,
    ApiJson(details): ApiJson<CompetitionDetails>,
) -> Response
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    match services.catalog.update_competition(id, details) {
        Ok(competition) => (StatusCode::OK, Json(competition)).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

async fn delete_competition<S, M>(
    State(services): Services<S, M>,
    ApiPath(id): ApiPath<CompetitionId>,
) -> Response
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    match services.catalog.delete_competition(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

/// Accepts either a JSON body or the `multipart/form-data` form the student
/// dashboard posts, where an optional `resume` file part rides along.
async fn register_placement<S, M>(State(services): Services<S, M>, request: Request) -> Response
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    let outcome = if is_multipart(request.headers()) {
        match placement_form(request).await {
            Ok((registration, Some(resume))) => {
                services
                    .registrations
                    .register_with_resume(registration, resume)
                    .await
            }
            Ok((registration, None)) => {
                services
                    .registrations
                    .register_for_placement(registration)
                    .await
            }
            Err(err) => return err.into_response(),
        }
    } else {
        match ApiJson::<PlacementRegistrationRequest>::from_request(request, &()).await {
            Ok(ApiJson(registration)) => {
                services
                    .registrations
                    .register_for_placement(registration)
                    .await
            }
            Err(err) => return err.into_response(),
        }
    };

    match outcome {
        Ok(registered) => (StatusCode::CREATED, Json(registered)).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"))
}

async fn placement_form(
    request: Request,
) -> Result<(PlacementRegistrationRequest, Option<ResumeFile>), ApiError> {
    let mut multipart = Multipart::from_request(request, &()).await?;
    let mut student = None;
    let mut placement = None;
    let mut role_name = None;
    let mut resume_name = None;
    let mut resume = None;

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        match name.as_str() {
            "student" => student = Some(StudentId(form_id(&name, &field.text().await?)?)),
            "placement" => placement = Some(PlacementId(form_id(&name, &field.text().await?)?)),
            "role_name" => role_name = Some(field.text().await?),
            "resume_name" => {
                resume_name = Some(field.text().await?.trim().to_string())
                    .filter(|value| !value.is_empty());
            }
            "resume" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_owned);
                let bytes = field.bytes().await?;
                if !(file_name.is_empty() && bytes.is_empty()) {
                    resume = Some(ResumeFile {
                        file_name,
                        content_type,
                        bytes,
                    });
                }
            }
            _ => {}
        }
    }

    let registration = PlacementRegistrationRequest {
        student: student.ok_or_else(|| missing_field("student"))?,
        placement: placement.ok_or_else(|| missing_field("placement"))?,
        role_name: role_name.ok_or_else(|| missing_field("role_name"))?,
        resume: None,
        resume_name,
    };
    Ok((registration, resume))
}

fn form_id(field: &str, raw: &str) -> Result<u64, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::bad_request(format!("{field} must be a numeric id")))
}

fn missing_field(field: &str) -> ApiError {
    ApiError::bad_request(format!("missing field `{field}`"))
}

async fn placement_resume<S, M>(
    State(services): Services<S, M>,
    ApiPath(id): ApiPath<PlacementRegistrationId>,
) -> Response
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    match services.registrations.resume(id) {
        Ok(file) => {
            let content_type = file
                .content_type
                .unwrap_or_else(|| "application/octet-stream".to_string());
            let disposition = format!("attachment; filename=\"{}\"", file.file_name);
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, content_type),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                file.bytes,
            )
                .into_response()
        }
        Err(err) => ApiError::from(err).into_response(),
    }
}

async fn list_placement_registrations<S, M>(State(services): Services<S, M>) -> Response
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    match services.registrations.placement_registrations() {
        Ok(registrations) => (StatusCode::OK, Json(registrations)).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

async fn get_placement_registration<S, M>(
    State(services): Services<S, M>,
    ApiPath(id): ApiPath<PlacementRegistrationId>,
) -> Response
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    match services.registrations.placement_registration(id) {
        Ok(registration) => (StatusCode::OK, Json(registration)).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

async fn update_placement_status<S, M>(
    State(services): Services<S, M>,
    ApiPath(id): ApiPath<PlacementRegistrationId>,
    ApiJson(update): ApiJson<StatusUpdate>,
) -> Response
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    match services
        .registrations
        .update_placement_status(id, update.status)
    {
        Ok(registration) => (StatusCode::OK, Json(registration)).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

async fn withdraw_placement<S, M>(
    State(services): Services<S, M>,
    ApiPath(id): ApiPath<PlacementRegistrationId>,
) -> Response
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    match services.registrations.withdraw_placement(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

async fn register_event<S, M>(
    State(services): Services<S, M>,
    ApiJson(request): ApiJson<EventRegistrationRequest>,
) -> Response
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    match services.registrations.register_for_event(request).await {
        Ok(registered) => (StatusCode::CREATED, Json(registered)).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

async fn list_event_registrations<S, M>(State(services): Services<S, M>) -> Response
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    match services.registrations.event_registrations() {
        Ok(registrations) => (StatusCode::OK, Json(registrations)).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

async fn get_event_registration<S, M>(
    State(services): Services<S, M>,
    ApiPath(id): ApiPath<EventRegistrationId>,
) -> Response
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    match services.registrations.event_registration(id) {
        Ok(registration) => (StatusCode::OK, Json(registration)).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

async fn withdraw_event<S, M>(
    State(services): Services<S, M>,
    ApiPath(id): ApiPath<EventRegistrationId>,
) -> Response
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    match services.registrations.withdraw_event(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

#[derive(Debug, Default, Deserialize)]
struct ReminderRequest {
    #[serde(default)]
    today: Option<NaiveDate>,
}

/// Body is optional; an empty body runs for the local calendar date.
async fn run_reminders<S, M>(State(services): Services<S, M>, body: Bytes) -> Response
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        ReminderRequest::default()
    } else {
        match serde_json::from_slice::<ReminderRequest>(&body) {
            Ok(request) => request,
            Err(err) => return ApiError::bad_request(err).into_response(),
        }
    };

    let report = match request.today {
        Some(today) => services.reminders.run(today).await,
        None => services.reminders.run_for_today().await,
    };
    match report {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

async fn seed_demo<S, M>(State(services): Services<S, M>) -> Response
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    match services.seed_demo() {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}
