//! Middleware that requires an active profile and hands its ID to route handlers.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    profile::{UserID, cookie::get_active_profile_id, core::get_profile},
};

/// The state needed for the active profile middleware.
#[derive(Clone)]
pub struct ActiveProfileState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The database connection for checking that the profile still exists.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ActiveProfileState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<ActiveProfileState> for Key {
    fn from_ref(state: &ActiveProfileState) -> Self {
        state.cookie_key.clone()
    }
}

/// Reads the active profile from the cookie and checks it still exists.
fn resolve_active_profile(
    state: &ActiveProfileState,
    jar: &PrivateCookieJar,
) -> Result<UserID, Error> {
    let user_id = get_active_profile_id(jar)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    match get_profile(user_id, &connection) {
        Ok(profile) => Ok(profile.id),
        Err(Error::NotFound) => {
            tracing::warn!("Active profile {user_id} no longer exists.");
            Err(Error::NoActiveProfile)
        }
        Err(error) => Err(error),
    }
}

#[inline]
async fn active_profile_guard_internal(
    state: ActiveProfileState,
    request: Request,
    next: Next,
    get_redirect: impl Fn() -> Response,
) -> Response {
    let (mut parts, body) = request.into_parts();
    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(err) => {
            tracing::error!("Error getting cookie jar: {err:?}. Redirecting to profiles page.");
            return get_redirect();
        }
    };

    let user_id = match resolve_active_profile(&state, &jar) {
        Ok(user_id) => user_id,
        Err(Error::NoActiveProfile) => return get_redirect(),
        Err(error) => return error.into_response(),
    };

    parts.extensions.insert(user_id);
    next.run(Request::from_parts(parts, body)).await
}

/// Middleware function that checks for an active profile cookie.
/// The profile's ID is placed into the request and then the request executed normally if the
/// cookie is valid, otherwise a redirect to the profiles page is returned.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserID>` to receive the profile ID.
pub async fn active_profile_guard(
    State(state): State<ActiveProfileState>,
    request: Request,
    next: Next,
) -> Response {
    active_profile_guard_internal(state, request, next, || {
        Redirect::to(endpoints::PROFILES_VIEW).into_response()
    })
    .await
}

/// Same as [active_profile_guard], but redirects with the `HX-Redirect`
/// header so HTMX requests navigate to the profiles page.
pub async fn active_profile_guard_hx(
    State(state): State<ActiveProfileState>,
    request: Request,
    next: Next,
) -> Response {
    active_profile_guard_internal(state, request, next, || {
        (
            HxRedirect(endpoints::PROFILES_VIEW.to_owned()),
            StatusCode::OK,
        )
            .into_response()
    })
    .await
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension, Router,
        extract::{Path, State},
        middleware,
        routing::{get, post},
    };
    use axum_extra::extract::{PrivateCookieJar, cookie::Key};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use sha2::Digest;

    use crate::{
        db::initialize,
        endpoints,
        profile::{
            UserID,
            cookie::{COOKIE_PROFILE_ID, set_active_profile_cookie},
            core::create_profile,
            middleware::{ActiveProfileState, active_profile_guard, active_profile_guard_hx},
        },
    };

    async fn test_handler(Extension(user_id): Extension<UserID>) -> String {
        format!("profile {user_id}")
    }

    async fn stub_select_route(
        State(_state): State<ActiveProfileState>,
        Path(user_id): Path<i64>,
        jar: PrivateCookieJar,
    ) -> PrivateCookieJar {
        set_active_profile_cookie(jar, UserID::new(user_id))
    }

    const TEST_SELECT_ROUTE: &str = "/select/{user_id}";
    const TEST_PROTECTED_ROUTE: &str = "/protected";
    const TEST_API_ROUTE: &str = "/api/protected";

    fn get_test_server() -> TestServer {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        create_profile("Ana", None, &connection).unwrap();

        let hash = sha2::Sha512::digest("nafstenoas");
        let state = ActiveProfileState {
            cookie_key: Key::from(&hash),
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let app = Router::new()
            .route(TEST_PROTECTED_ROUTE, get(test_handler))
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                active_profile_guard,
            ))
            .merge(
                Router::new()
                    .route(TEST_API_ROUTE, get(test_handler))
                    .route_layer(middleware::from_fn_with_state(
                        state.clone(),
                        active_profile_guard_hx,
                    )),
            )
            .route(TEST_SELECT_ROUTE, post(stub_select_route))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn passes_profile_id_to_handler() {
        let server = get_test_server();
        let response = server.post("/select/1").await;
        response.assert_status_ok();
        let cookie = response.cookie(COOKIE_PROFILE_ID);

        let response = server.get(TEST_PROTECTED_ROUTE).add_cookie(cookie).await;

        response.assert_status_ok();
        response.assert_text("profile 1");
    }

    #[tokio::test]
    async fn redirects_to_profiles_page_without_cookie() {
        let server = get_test_server();

        let response = server.get(TEST_PROTECTED_ROUTE).await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::PROFILES_VIEW);
    }

    #[tokio::test]
    async fn redirects_when_profile_no_longer_exists() {
        let server = get_test_server();
        let response = server.post("/select/99").await;
        let cookie = response.cookie(COOKIE_PROFILE_ID);

        let response = server.get(TEST_PROTECTED_ROUTE).add_cookie(cookie).await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::PROFILES_VIEW);
    }

    #[tokio::test]
    async fn htmx_routes_redirect_with_header() {
        let server = get_test_server();

        let response = server.get(TEST_API_ROUTE).await;

        response.assert_status_ok();
        assert_eq!(response.header("hx-redirect"), endpoints::PROFILES_VIEW);
    }
}
