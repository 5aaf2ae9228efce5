//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/operations/{operation_id}', use [format_endpoint].

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The landing page showing stats for the selected period.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for browsing and searching a month of operations.
pub const HISTORY_VIEW: &str = "/history";
/// The page for registering a new operation.
pub const NEW_OPERATION_VIEW: &str = "/operations/new";
/// The page for editing an existing operation.
pub const EDIT_OPERATION_VIEW: &str = "/operations/{operation_id}/edit";
/// The page for choosing the active profile.
pub const PROFILES_VIEW: &str = "/profiles";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to create operations.
pub const OPERATIONS_API: &str = "/api/operations";
/// The route to update or delete a single operation.
pub const OPERATION: &str = "/api/operations/{operation_id}";
/// The route to get the stats for a period as JSON.
pub const STATS_API: &str = "/api/stats";
/// The route to create profiles.
pub const PROFILES_API: &str = "/api/profiles";
/// The route to make a profile the active one.
pub const SELECT_PROFILE: &str = "/api/profiles/{user_id}/select";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/operations/{operation_id}', '{operation_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
