//! Validation for the server and model sections.

use crate::schema::ParleyConfig;

use super::helpers::{validate_non_empty, validate_range, validate_range_f64};

/// Validate listener constraints.
pub(crate) fn validate_server(errors: &mut Vec<String>, config: &ParleyConfig) {
    validate_non_empty(errors, "server.host", &config.server.host);
    validate_range(errors, "server.port", config.server.port, 1, 65535);
}

/// Validate model provider constraints.
pub(crate) fn validate_model(errors: &mut Vec<String>, config: &ParleyConfig) {
    let model = &config.model;
    validate_non_empty(errors, "model.name", &model.name);
    validate_non_empty(errors, "model.api_key_env", &model.api_key_env);
    validate_range(errors, "model.max_tokens", model.max_tokens, 1, 65536);
    validate_range_f64(errors, "model.temperature", model.temperature, 0.0, 2.0);
    validate_range(
        errors,
        "model.request_timeout_secs",
        model.request_timeout_secs,
        1,
        600,
    );

    if !(model.api_base.starts_with("http://") || model.api_base.starts_with("https://")) {
        errors.push(format!(
            "model.api_base = {:?} must start with http:// or https://",
            model.api_base
        ));
    }
}
