//! Test helpers for layered serve configuration and in-process requests.

use super::*;
use crate::http::{ApiRequest, ApiResponse, route};
use carpool_core::Pool;
use hyper::Method;

/// Values a config file or the environment would contribute.
#[derive(Debug, Clone, Default)]
pub(super) struct LayerOverrides {
    pub(super) bind: Option<String>,
    pub(super) port: Option<u16>,
}

/// Resolve `cli_args` as if the environment and a config file had been read,
/// giving the environment precedence over the file and the CLI precedence
/// over both.
pub(super) fn merge_layers(
    mut cli_args: ServeArgs,
    file_layer: Option<LayerOverrides>,
    env_layer: Option<LayerOverrides>,
) -> Result<ServeConfig, CliError> {
    merge_field(
        &mut cli_args.bind,
        extract_field(&env_layer, |layer| &layer.bind),
        extract_field(&file_layer, |layer| &layer.bind),
    );
    merge_field(
        &mut cli_args.port,
        extract_field(&env_layer, |layer| &layer.port),
        extract_field(&file_layer, |layer| &layer.port),
    );
    ServeConfig::try_from(cli_args)
}

fn merge_field<T: Clone>(target: &mut Option<T>, env_value: Option<T>, file_value: Option<T>) {
    if target.is_none()
        && let Some(value) = env_value.or(file_value)
    {
        *target = Some(value);
    }
}

fn extract_field<T: Clone>(
    layer: &Option<LayerOverrides>,
    accessor: fn(&LayerOverrides) -> &Option<T>,
) -> Option<T> {
    layer.as_ref().and_then(|entry| accessor(entry).clone())
}

pub(super) const JSON: &str = "application/json";
pub(super) const FORM: &str = "application/x-www-form-urlencoded";

/// Route a request through the API without a socket.
pub(super) fn send(
    pool: &Pool,
    method: &Method,
    path: &str,
    content_type: Option<&str>,
    body: &[u8],
) -> ApiResponse {
    route(
        pool,
        &ApiRequest {
            method,
            path,
            content_type,
            body,
        },
    )
}

pub(super) fn post_journey(pool: &Pool, id: u64, people: u8) -> ApiResponse {
    let body = format!(r#"{{"id":{id},"people":{people}}}"#);
    send(pool, &Method::POST, "/journey", Some(JSON), body.as_bytes())
}

pub(super) fn post_form(pool: &Pool, path: &str, body: &str) -> ApiResponse {
    send(pool, &Method::POST, path, Some(FORM), body.as_bytes())
}
