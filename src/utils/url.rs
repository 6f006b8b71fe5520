//! URL helpers for the configured backend.
//!
//! The backend origin is configured without a path; every API call is made
//! against the origin plus the fixed `/api` suffix.

pub const API_PATH_SUFFIX: &str = "/api";

/// Strip trailing slashes so endpoint paths can be appended safely.
///
/// ```
/// use evolance::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("https://evolance.example/"), "https://evolance.example");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// The API base for a backend origin.
///
/// ```
/// use evolance::utils::url::api_base_url;
///
/// assert_eq!(api_base_url("http://localhost:8001/"), "http://localhost:8001/api");
/// ```
pub fn api_base_url(origin: &str) -> String {
    format!("{}{}", normalize_base_url(origin.trim()), API_PATH_SUFFIX)
}

/// Join an endpoint path onto an API base without doubling slashes.
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalize_base_url(base_url), endpoint)
}
