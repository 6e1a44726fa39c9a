//! Guarded admin HTTP surface
//!
//! | Route                    | Behaviour                                         |
//! |--------------------------|---------------------------------------------------|
//! | `GET /login`             | public landing for unauthenticated operators      |
//! | `GET /admin`             | listing placeholder                               |
//! | `GET /admin/pets/{id}`   | mounted edit form as JSON                         |
//! | `PUT /admin/pets/{id}`   | apply JSON edits, submit, `303` to the listing    |
//!
//! Every request passes the [`RouteGuard`] first. A `PUT` for a record whose
//! previous update is still in flight answers `409 Conflict`.

use crate::edits::{FormEdits, LogNavigator};
use crate::in_flight::InFlight;
use pet_admin_core::types::{sex_choices, weight_choices, SelectOption};
use pet_admin_core::{
    EditController, EditError, ImageField, RecordId, RecordStore, TaxonomyOption, TaxonomySource, ADMIN_PATH,
};
use pet_admin_guard::RouteGuard;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use warp::http::{header, StatusCode};
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

/// Shared server dependencies
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub taxonomy: Arc<dyn TaxonomySource>,
    pub guard: Arc<RouteGuard>,
    pub in_flight: InFlight,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, taxonomy: Arc<dyn TaxonomySource>, guard: Arc<RouteGuard>) -> Self {
        Self {
            store,
            taxonomy,
            guard,
            in_flight: InFlight::new(),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("guard", &self.guard)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct ValuesView<'a> {
    name: &'a str,
    age: &'a str,
    description: &'a str,
    breed: &'a str,
    #[serde(rename = "type")]
    sex: Option<&'static str>,
    weight: Option<&'static str>,
    image: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct EditView<'a> {
    id: &'a str,
    phase: String,
    loaded: bool,
    submitting: bool,
    values: ValuesView<'a>,
    preview_image: Option<&'a str>,
    breed_options: &'a [TaxonomyOption],
    sex_choices: Vec<SelectOption>,
    weight_choices: Vec<SelectOption>,
    errors: BTreeMap<&'static str, String>,
}

fn image_label(image: &ImageField) -> Option<&str> {
    match image {
        ImageField::Empty => None,
        ImageField::Stored(reference) => Some(reference.as_str()),
        ImageField::Picked(files) => files.first().map(|f| f.file_name.as_str()),
        ImageField::File(file) => Some(file.file_name.as_str()),
    }
}

fn render(controller: &EditController, submitting: bool) -> Response {
    let values = controller.form().values();
    let view = EditView {
        id: controller.record_id().as_str(),
        phase: format!("{:?}", controller.phase()),
        loaded: controller.loaded().is_some(),
        submitting,
        values: ValuesView {
            name: &values.name,
            age: &values.age,
            description: &values.description,
            breed: &values.breed,
            sex: values.sex.map(|s| s.as_str()),
            weight: values.weight.map(|w| w.as_str()),
            image: image_label(&values.image),
        },
        preview_image: controller.preview_image(),
        breed_options: controller.options(),
        sex_choices: sex_choices(),
        weight_choices: weight_choices(),
        errors: controller
            .form()
            .errors()
            .messages()
            .into_iter()
            .map(|(field, message)| (field.as_str(), message))
            .collect(),
    };
    warp::reply::json(&view).into_response()
}

fn error_body(status: StatusCode, message: String) -> Response {
    let body = serde_json::json!({ "error": message });
    warp::reply::with_status(warp::reply::json(&body), status).into_response()
}

async fn mount(state: &AppState, id: String) -> EditController {
    EditController::mount(
        RecordId::new(id),
        Arc::clone(&state.store),
        state.taxonomy.as_ref(),
        Arc::new(LogNavigator),
    )
    .await
}

async fn show_form(id: String, state: AppState) -> Result<Response, Rejection> {
    let controller = mount(&state, id).await;
    let submitting = state.in_flight.is_busy(controller.record_id());
    Ok(render(&controller, submitting))
}

async fn submit_form(id: String, edits: FormEdits, state: AppState) -> Result<Response, Rejection> {
    let mut controller = mount(&state, id).await;

    let events = match edits.into_events() {
        Ok(events) => events,
        Err(e) => return Ok(error_body(StatusCode::BAD_REQUEST, e.to_string())),
    };
    for event in events {
        if let Err(e) = controller.apply(event) {
            return Ok(error_body(StatusCode::CONFLICT, e.to_string()));
        }
    }

    let Some(_claim) = state.in_flight.claim(controller.record_id()) else {
        tracing::info!(record_id = %controller.record_id(), "update already in flight");
        return Ok(error_body(
            StatusCode::CONFLICT,
            format!("an update for record {} is already in flight", controller.record_id()),
        ));
    };

    let response = match controller.submit().await {
        Ok(navigation) => {
            warp::reply::with_header(StatusCode::SEE_OTHER, header::LOCATION, navigation.to).into_response()
        }
        Err(EditError::Validation(_)) => {
            warp::reply::with_status(render(&controller, false), StatusCode::UNPROCESSABLE_ENTITY).into_response()
        }
        Err(e @ EditError::Store(_)) => error_body(StatusCode::BAD_GATEWAY, e.to_string()),
        Err(e) => error_body(StatusCode::CONFLICT, e.to_string()),
    };
    Ok(response)
}

fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || state.clone())
}

/// Full application filter, guard included
pub fn routes(state: AppState) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let login = warp::path!("login")
        .and(warp::get())
        .map(|| warp::reply::html("<h1>Login</h1><p>Sign in to manage pet listings.</p>"));

    let listing = warp::path("admin")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| warp::reply::json(&serde_json::json!({ "page": ADMIN_PATH })));

    let show = warp::path!("admin" / "pets" / String)
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(show_form);

    let submit = warp::path!("admin" / "pets" / String)
        .and(warp::put())
        .and(warp::body::content_length_limit(64 * 1024))
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(submit_form);

    pet_admin_guard::filter(Arc::clone(&state.guard))
        .and(login.or(listing).or(show).or(submit))
        .recover(pet_admin_guard::recover)
        .with(warp::trace::request())
}
