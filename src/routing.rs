//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    dashboard::{get_dashboard_page, get_stats_endpoint},
    endpoints,
    history::get_history_page,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    operation::{
        create_operation_endpoint, delete_operation_endpoint, edit_operation_endpoint,
        get_edit_operation_page, get_new_operation_page,
    },
    profile::{
        active_profile_guard, active_profile_guard_hx, create_profile_endpoint,
        get_profiles_page, select_profile_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::PROFILES_VIEW, get(get_profiles_page))
        .route(endpoints::PROFILES_API, post(create_profile_endpoint))
        .route(endpoints::SELECT_PROFILE, post(select_profile_endpoint))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::HISTORY_VIEW, get(get_history_page))
        .route(endpoints::NEW_OPERATION_VIEW, get(get_new_operation_page))
        .route(endpoints::EDIT_OPERATION_VIEW, get(get_edit_operation_page))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            active_profile_guard,
        ));

    // These routes are called by HTMX, so they need the HX-Redirect header
    // for the redirect to the profiles page to work.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(endpoints::OPERATIONS_API, post(create_operation_endpoint))
            .route(
                endpoints::OPERATION,
                put(edit_operation_endpoint).delete(delete_operation_endpoint),
            )
            .route(endpoints::STATS_API, get(get_stats_endpoint))
            .layer(middleware::from_fn_with_state(
                state.clone(),
                active_profile_guard_hx,
            )),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}

#[cfg(test)]
mod root_route_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{endpoints, routing::get_index_page};

    #[tokio::test]
    async fn root_redirects_to_dashboard() {
        let response = get_index_page().await.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let location = response.headers().get("location").unwrap();
        assert_eq!(location, endpoints::DASHBOARD_VIEW);
    }
}

#[cfg(test)]
mod router_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use time::OffsetDateTime;

    use crate::{
        AppState,
        endpoints::{self, format_endpoint},
        operation::select_operations,
        profile::{UserID, create_profile},
        routing::build_router,
    };

    fn get_test_server() -> (TestServer, AppState) {
        let connection = Connection::open_in_memory().unwrap();
        let state = AppState::new(connection, "a test secret", "Etc/UTC").unwrap();
        {
            let connection = state.db_connection.lock().unwrap();
            create_profile("Ana", None, &connection).unwrap();
        }

        let mut server =
            TestServer::try_new(build_router(state.clone())).expect("Could not create test server.");
        server.save_cookies();

        (server, state)
    }

    async fn select_first_profile(server: &TestServer) {
        let response = server
            .post(&format_endpoint(endpoints::SELECT_PROFILE, 1))
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
    }

    fn operation_form(description: &str) -> [(&'static str, String); 6] {
        [
            ("kind", "expense".to_owned()),
            ("amount", "1200".to_owned()),
            ("description", description.to_owned()),
            ("account", "Itaú".to_owned()),
            ("date", OffsetDateTime::now_utc().date().to_string()),
            ("time", "08:00".to_owned()),
        ]
    }

    #[tokio::test]
    async fn pages_redirect_to_profiles_without_active_profile() {
        let (server, _) = get_test_server();

        for page in [
            endpoints::DASHBOARD_VIEW,
            endpoints::HISTORY_VIEW,
            endpoints::NEW_OPERATION_VIEW,
        ] {
            let response = server.get(page).await;

            response.assert_status_see_other();
            assert_eq!(response.header("location"), endpoints::PROFILES_VIEW);
        }
    }

    #[tokio::test]
    async fn api_routes_use_hx_redirect_without_active_profile() {
        let (server, state) = get_test_server();

        let response = server
            .post(endpoints::OPERATIONS_API)
            .form(&operation_form("Rent"))
            .await;

        assert_eq!(response.header("hx-redirect"), endpoints::PROFILES_VIEW);
        let connection = state.db_connection.lock().unwrap();
        assert!(
            select_operations(UserID::new(1), &connection)
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn profiles_page_is_public() {
        let (server, _) = get_test_server();

        server.get(endpoints::PROFILES_VIEW).await.assert_status_ok();
    }

    #[tokio::test]
    async fn create_then_list_operation() {
        let (server, _) = get_test_server();
        select_first_profile(&server).await;

        let response = server
            .post(endpoints::OPERATIONS_API)
            .form(&operation_form("Rent"))
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("hx-redirect"), endpoints::DASHBOARD_VIEW);

        let response = server.get(endpoints::HISTORY_VIEW).await;
        response.assert_status_ok();
        assert!(response.text().contains("Rent"));
    }

    #[tokio::test]
    async fn edit_and_delete_operation() {
        let (server, state) = get_test_server();
        select_first_profile(&server).await;
        server
            .post(endpoints::OPERATIONS_API)
            .form(&operation_form("Rent"))
            .await
            .assert_status(StatusCode::SEE_OTHER);
        let id = {
            let connection = state.db_connection.lock().unwrap();
            select_operations(UserID::new(1), &connection).unwrap()[0].id
        };

        let response = server
            .put(&format_endpoint(endpoints::OPERATION, id))
            .form(&operation_form("Rent and condo"))
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("hx-redirect"), endpoints::HISTORY_VIEW);

        let response = server
            .delete(&format_endpoint(endpoints::OPERATION, id))
            .await;
        response.assert_status_ok();

        let connection = state.db_connection.lock().unwrap();
        assert!(
            select_operations(UserID::new(1), &connection)
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn stats_endpoint_returns_json() {
        let (server, _) = get_test_server();
        select_first_profile(&server).await;

        let response = server
            .get(endpoints::STATS_API)
            .add_query_param("period", "15days")
            .await;

        response.assert_status_ok();
        let json = response.json::<serde_json::Value>();
        assert_eq!(json["period"], "Last 15 days");
        assert_eq!(json["stats"]["operation_count"], 0);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let (server, _) = get_test_server();

        let response = server.get("/no/such/page").await;

        response.assert_status_not_found();
    }
}
