//! Request routing and wire formats for the HTTP API.
//!
//! Routing is a plain function from a decoded request to a status and an
//! optional JSON body. Socket handling lives in [`crate::serve`]; the pool's
//! lock is only taken inside the calls made from here, after the body has
//! been read.

use carpool_core::{
    DropOffOutcome, GroupId, GroupSpec, Location, Pool, PoolError, RequestOutcome, Vehicle,
    VehicleSpec,
};
use hyper::{Method, StatusCode};
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const JSON: &str = "application/json";
const FORM: &str = "application/x-www-form-urlencoded";
const FORM_ID_FIELD: &str = "ID";

/// A request with its body already collected.
#[derive(Debug)]
pub(crate) struct ApiRequest<'a> {
    pub(crate) method: &'a Method,
    pub(crate) path: &'a str,
    pub(crate) content_type: Option<&'a str>,
    pub(crate) body: &'a [u8],
}

/// Status plus an optional JSON payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ApiResponse {
    pub(crate) status: StatusCode,
    pub(crate) body: Option<Vec<u8>>,
}

impl ApiResponse {
    pub(crate) const fn empty(status: StatusCode) -> Self {
        Self { status, body: None }
    }

    fn json<T: Serialize>(status: StatusCode, payload: &T) -> Self {
        match serde_json::to_vec(payload) {
            Ok(body) => Self {
                status,
                body: Some(body),
            },
            Err(err) => {
                log::error!("failed to encode response: {err}");
                Self::empty(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

/// A vehicle as it appears in `PUT /cars` and in `POST /locate` answers.
///
/// Missing fields decode as zero so the core reports them as invalid input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub(crate) struct CarPayload {
    #[serde(default)]
    pub(crate) id: u64,
    #[serde(default)]
    pub(crate) seats: u8,
}

impl From<CarPayload> for VehicleSpec {
    fn from(car: CarPayload) -> Self {
        Self::new(car.id, car.seats)
    }
}

impl From<Vehicle> for CarPayload {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id.get(),
            seats: vehicle.seats,
        }
    }
}

/// A ride request as it appears in `POST /journey`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub(crate) struct JourneyPayload {
    #[serde(default)]
    pub(crate) id: u64,
    #[serde(default)]
    pub(crate) people: u8,
}

impl From<JourneyPayload> for GroupSpec {
    fn from(journey: JourneyPayload) -> Self {
        Self::new(journey.id, journey.people)
    }
}

/// Why a request never reached the pool.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
enum Malformed {
    #[error("expected content type {expected}")]
    ContentType { expected: &'static str },
    #[error("undecodable JSON body: {0}")]
    Json(String),
    #[error("form has no {FORM_ID_FIELD} field")]
    MissingId,
    #[error("{FORM_ID_FIELD} {0:?} is not a group id")]
    InvalidId(String),
}

impl Malformed {
    fn respond(self) -> ApiResponse {
        debug!("malformed request: {self}");
        ApiResponse::empty(StatusCode::BAD_REQUEST)
    }
}

/// Dispatch a request to the pool.
pub(crate) fn route(pool: &Pool, request: &ApiRequest<'_>) -> ApiResponse {
    let allowed = match request.path {
        "/status" => Method::GET,
        "/cars" => Method::PUT,
        "/journey" | "/dropoff" | "/locate" => Method::POST,
        _ => return ApiResponse::empty(StatusCode::NOT_FOUND),
    };
    if *request.method != allowed {
        return ApiResponse::empty(StatusCode::METHOD_NOT_ALLOWED);
    }

    let outcome = match request.path {
        "/status" => Ok(ApiResponse::empty(StatusCode::OK)),
        "/cars" => load_cars(pool, request),
        "/journey" => request_journey(pool, request),
        "/dropoff" => drop_off(pool, request),
        _ => locate(pool, request),
    };
    outcome.unwrap_or_else(Malformed::respond)
}

fn load_cars(pool: &Pool, request: &ApiRequest<'_>) -> Result<ApiResponse, Malformed> {
    require_content_type(request, JSON)?;
    let cars: Vec<CarPayload> =
        serde_json::from_slice(request.body).map_err(|err| Malformed::Json(err.to_string()))?;
    let specs: Vec<VehicleSpec> = cars.into_iter().map(VehicleSpec::from).collect();
    Ok(match pool.load_fleet(&specs) {
        Ok(()) => ApiResponse::empty(StatusCode::OK),
        Err(err) => error_response(&err),
    })
}

fn request_journey(pool: &Pool, request: &ApiRequest<'_>) -> Result<ApiResponse, Malformed> {
    require_content_type(request, JSON)?;
    let journey: JourneyPayload =
        serde_json::from_slice(request.body).map_err(|err| Malformed::Json(err.to_string()))?;
    Ok(match pool.request_ride(journey.into()) {
        Ok(RequestOutcome::Seated(_) | RequestOutcome::Waiting) => {
            ApiResponse::empty(StatusCode::ACCEPTED)
        }
        Err(err) => error_response(&err),
    })
}

fn drop_off(pool: &Pool, request: &ApiRequest<'_>) -> Result<ApiResponse, Malformed> {
    let id = form_group_id(request)?;
    Ok(match pool.drop_off(id) {
        Ok(DropOffOutcome::Released(_) | DropOffOutcome::Withdrawn) => {
            ApiResponse::empty(StatusCode::NO_CONTENT)
        }
        Err(err) => error_response(&err),
    })
}

fn locate(pool: &Pool, request: &ApiRequest<'_>) -> Result<ApiResponse, Malformed> {
    let id = form_group_id(request)?;
    Ok(match pool.locate(id) {
        Ok(Location::Assigned(vehicle)) => {
            ApiResponse::json(StatusCode::OK, &CarPayload::from(vehicle))
        }
        Ok(Location::Pending) => ApiResponse::empty(StatusCode::NO_CONTENT),
        Err(err) => error_response(&err),
    })
}

fn error_response(err: &PoolError) -> ApiResponse {
    match err {
        PoolError::InvalidInput(_) => ApiResponse::empty(StatusCode::BAD_REQUEST),
        PoolError::NotFound { .. } => ApiResponse::empty(StatusCode::NOT_FOUND),
    }
}

fn require_content_type(request: &ApiRequest<'_>, expected: &'static str) -> Result<(), Malformed> {
    let matches = request.content_type.is_some_and(|value| {
        value
            .split(';')
            .next()
            .is_some_and(|media| media.trim().eq_ignore_ascii_case(expected))
    });
    if matches {
        Ok(())
    } else {
        Err(Malformed::ContentType { expected })
    }
}

fn form_group_id(request: &ApiRequest<'_>) -> Result<GroupId, Malformed> {
    require_content_type(request, FORM)?;
    let raw = url::form_urlencoded::parse(request.body)
        .find(|(key, _)| key == FORM_ID_FIELD)
        .map(|(_, value)| value.into_owned())
        .ok_or(Malformed::MissingId)?;
    raw.trim()
        .parse::<u64>()
        .map(GroupId::new)
        .map_err(|_| Malformed::InvalidId(raw))
}
