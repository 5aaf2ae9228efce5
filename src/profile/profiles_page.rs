//! The page for listing, creating and selecting profiles.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, base, loading_spinner,
    },
    navigation::NavBar,
    profile::{Profile, UserID, cookie::get_active_profile_id, core::get_all_profiles},
};

/// The state needed for the profiles page.
#[derive(Debug, Clone)]
pub struct ProfilesPageState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The database connection for listing profiles.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ProfilesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<ProfilesPageState> for Key {
    fn from_ref(state: &ProfilesPageState) -> Self {
        state.cookie_key.clone()
    }
}

/// Renders the profiles page, highlighting the active profile if there is one.
pub async fn get_profiles_page(
    State(state): State<ProfilesPageState>,
    jar: PrivateCookieJar,
) -> Result<Response, Error> {
    let profiles = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_all_profiles(&connection)
            .inspect_err(|error| tracing::error!("could not get profiles: {error}"))?
    };

    let active_profile = get_active_profile_id(&jar).ok();

    Ok(profiles_view(&profiles, active_profile).into_response())
}

fn profiles_view(profiles: &[Profile], active_profile: Option<UserID>) -> Markup {
    let nav_bar = NavBar::new(endpoints::PROFILES_VIEW).into_html();
    let spinner = loading_spinner();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-md space-y-6"
            {
                section
                {
                    h2 class="text-xl font-bold mb-4" { "Profiles" }

                    @if profiles.is_empty() {
                        p class="text-gray-600 dark:text-gray-400"
                        {
                            "No profiles yet. Create one below to start recording operations."
                        }
                    }

                    ul class="space-y-2"
                    {
                        @for profile in profiles {
                            @let is_active = active_profile == Some(profile.id);

                            li
                                class=(CARD_STYLE)
                                data-profile-id=(profile.id)
                                aria-current=[is_active.then_some("true")]
                            {
                                div class="flex items-center justify-between gap-4"
                                {
                                    div
                                    {
                                        p class="font-semibold" { (profile.name) }

                                        @if let Some(email) = &profile.email {
                                            p class="text-sm text-gray-600 dark:text-gray-400" { (email) }
                                        }
                                    }

                                    @if is_active {
                                        span class="text-sm font-semibold text-blue-600 dark:text-blue-400"
                                        {
                                            "Active"
                                        }
                                    } @else {
                                        button
                                            type="button"
                                            hx-post=(format_endpoint(endpoints::SELECT_PROFILE, profile.id.as_i64()))
                                            hx-target-error="#alert-container"
                                            class=(BUTTON_SECONDARY_STYLE)
                                        {
                                            "Select"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }

                section
                {
                    form
                        hx-post=(endpoints::PROFILES_API)
                        hx-target-error="#alert-container"
                        class="w-full space-y-4"
                    {
                        h3 class="text-lg font-semibold" { "New Profile" }

                        div
                        {
                            label for="name" class=(FORM_LABEL_STYLE) { "Name" }

                            input
                                name="name"
                                id="name"
                                type="text"
                                placeholder="Name"
                                required
                                class=(FORM_TEXT_INPUT_STYLE);
                        }

                        div
                        {
                            label for="email" class=(FORM_LABEL_STYLE) { "Email" }

                            input
                                name="email"
                                id="email"
                                type="email"
                                placeholder="name@example.com"
                                class=(FORM_TEXT_INPUT_STYLE);
                        }

                        button type="submit" class=(BUTTON_PRIMARY_STYLE)
                        {
                            span id="indicator" class="inline htmx-indicator" { (spinner) }
                            " Create Profile"
                        }
                    }
                }
            }
        }
    };

    base("Profiles", &[], &content)
}
