//! Defines the endpoints for creating a profile and making a profile the active one.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{Form, PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, endpoints,
    profile::{
        UserID,
        cookie::set_active_profile_cookie,
        core::{create_profile, get_profile},
    },
};

/// The state needed to create or select a profile.
#[derive(Debug, Clone)]
pub struct ProfileState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The database connection for managing profiles.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ProfileState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<ProfileState> for Key {
    fn from_ref(state: &ProfileState) -> Self {
        state.cookie_key.clone()
    }
}

/// The form data for creating a profile.
#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    /// The display name.
    pub name: String,
    /// An optional contact email.
    #[serde(default)]
    pub email: Option<String>,
}

/// A route handler for creating a new profile.
///
/// The new profile becomes the active profile and the client is redirected
/// to the dashboard.
pub async fn create_profile_endpoint(
    State(state): State<ProfileState>,
    jar: PrivateCookieJar,
    Form(form): Form<ProfileForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let profile = match create_profile(&form.name, form.email.as_deref(), &connection) {
        Ok(profile) => profile,
        Err(error) => {
            tracing::warn!("could not create profile: {error}");
            return error.into_alert_response();
        }
    };

    tracing::info!("Created profile {}", profile.id);

    (
        set_active_profile_cookie(jar, profile.id),
        HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

/// A route handler for making an existing profile the active one.
pub async fn select_profile_endpoint(
    State(state): State<ProfileState>,
    Path(user_id): Path<i64>,
    jar: PrivateCookieJar,
) -> Response {
    let user_id = UserID::new(user_id);

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = get_profile(user_id, &connection) {
        tracing::warn!("could not select profile {user_id}: {error}");
        return error.into_alert_response();
    }

    tracing::info!("Switched active profile to {user_id}");

    (
        set_active_profile_cookie(jar, user_id),
        HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use axum_extra::extract::{Form, PrivateCookieJar};
    use rusqlite::Connection;

    use crate::{
        app_state::create_cookie_key,
        db::initialize,
        endpoints,
        profile::{
            UserID,
            cookie::COOKIE_PROFILE_ID,
            core::{create_profile, get_all_profiles},
            create_endpoint::{
                ProfileForm, ProfileState, create_profile_endpoint, select_profile_endpoint,
            },
        },
        test_utils::{assert_hx_redirect, get_header},
    };

    fn get_state() -> ProfileState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        ProfileState {
            cookie_key: create_cookie_key("foobar"),
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn create_profile_sets_cookie_and_redirects() {
        let state = get_state();
        let jar = PrivateCookieJar::new(state.cookie_key.clone());
        let form = ProfileForm {
            name: "Ana".to_owned(),
            email: None,
        };

        let response = create_profile_endpoint(State(state.clone()), jar, Form(form)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::DASHBOARD_VIEW);
        assert!(get_header(&response, "set-cookie").starts_with(COOKIE_PROFILE_ID));

        let connection = state.db_connection.lock().unwrap();
        let profiles = get_all_profiles(&connection).unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].name, "Ana");
    }

    #[tokio::test]
    async fn create_profile_with_blank_name_is_rejected() {
        let state = get_state();
        let jar = PrivateCookieJar::new(state.cookie_key.clone());
        let form = ProfileForm {
            name: " ".to_owned(),
            email: None,
        };

        let response = create_profile_endpoint(State(state), jar, Form(form)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn select_existing_profile() {
        let state = get_state();
        let profile = {
            let connection = state.db_connection.lock().unwrap();
            create_profile("Ana", None, &connection).unwrap()
        };
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        let response =
            select_profile_endpoint(State(state), Path(profile.id.as_i64()), jar).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::DASHBOARD_VIEW);
    }

    #[tokio::test]
    async fn select_missing_profile_returns_not_found() {
        let state = get_state();
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        let response =
            select_profile_endpoint(State(state), Path(UserID::new(3).as_i64()), jar).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
