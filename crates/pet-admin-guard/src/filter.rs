//! `warp` integration

use crate::decision::{GuardDecision, GuardRequest, Origin, RouteGuard};
use crate::session::session_token;
use std::sync::Arc;
use warp::http::{header, StatusCode};
use warp::path::FullPath;
use warp::{Filter, Rejection, Reply};

/// Rejection carrying the login redirect target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unauthenticated {
    pub location: String,
}

impl warp::reject::Reject for Unauthenticated {}

/// Filter running the guard on every request
///
/// Extracts nothing; put it in front of the routes with `.and(...)` and
/// finish the chain with `.recover(recover)`.
pub fn filter(guard: Arc<RouteGuard>) -> impl Filter<Extract = (), Error = Rejection> + Clone {
    warp::path::full()
        .and(warp::header::optional::<String>("host"))
        .and(warp::header::optional::<String>("x-forwarded-proto"))
        .and(warp::header::optional::<String>("cookie"))
        .and_then(
            move |path: FullPath, host: Option<String>, proto: Option<String>, cookie: Option<String>| {
                let guard = Arc::clone(&guard);
                async move {
                    let origin = Origin::from_headers(host.as_deref(), proto.as_deref(), guard.default_scheme());
                    let token = cookie
                        .as_deref()
                        .and_then(|c| session_token(c, guard.session_cookie()))
                        .map(str::to_string);
                    let request = GuardRequest::new(path.as_str()).with_origin(origin).with_token(token);

                    match guard.evaluate(&request).await {
                        GuardDecision::Proceed => Ok(()),
                        GuardDecision::Redirect { location } => Err(warp::reject::custom(Unauthenticated { location })),
                    }
                }
            },
        )
        .untuple_one()
}

/// Turn [`Unauthenticated`] into `302 Found`; pass other rejections on
///
/// # Errors
/// Any rejection that is not [`Unauthenticated`].
pub async fn recover(rejection: Rejection) -> Result<impl Reply, Rejection> {
    if let Some(Unauthenticated { location }) = rejection.find::<Unauthenticated>() {
        return Ok(warp::reply::with_header(
            StatusCode::FOUND,
            header::LOCATION,
            location.clone(),
        ));
    }
    Err(rejection)
}
