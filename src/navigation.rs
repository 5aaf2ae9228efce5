//! The navigation bar shown at the top of every page (and at the bottom on small screens).

use maud::{Markup, html};

use crate::endpoints;

/// The pages reachable from the navigation bar, as (endpoint, label).
const SECTIONS: [(&str, &str); 4] = [
    (endpoints::DASHBOARD_VIEW, "Dashboard"),
    (endpoints::HISTORY_VIEW, "History"),
    (endpoints::NEW_OPERATION_VIEW, "New operation"),
    (endpoints::PROFILES_VIEW, "Profiles"),
];

const DESKTOP_LINK_STYLE: &str = "block py-2 px-3 text-gray-900 rounded-sm hover:bg-gray-100
    lg:hover:bg-transparent lg:border-0 lg:hover:text-blue-700 lg:p-0
    dark:text-white lg:dark:hover:text-blue-500 dark:hover:bg-gray-700
    dark:hover:text-white lg:dark:hover:bg-transparent";

const DESKTOP_CURRENT_LINK_STYLE: &str = "block py-2 px-3 text-white bg-blue-700 rounded-sm
    lg:bg-transparent lg:text-blue-700 lg:p-0 dark:text-white lg:dark:text-blue-500";

const MOBILE_LINK_STYLE: &str = "flex w-full min-w-0 items-center justify-center rounded-lg \
    px-2.5 py-2 text-xs font-semibold leading-tight text-gray-600 sm:px-4 sm:text-sm \
    hover:bg-blue-50/70 hover:text-blue-700 dark:text-gray-300 \
    dark:hover:bg-blue-900/20 dark:hover:text-blue-200";

const MOBILE_CURRENT_LINK_STYLE: &str = "flex w-full min-w-0 items-center justify-center \
    rounded-lg bg-blue-50 px-2.5 py-2 text-xs font-semibold leading-tight text-blue-700 \
    shadow-sm sm:px-4 sm:text-sm dark:bg-blue-900/30 dark:text-blue-200";

/// The site wide navigation links with the section of the current page highlighted.
pub struct NavBar {
    current_section: Option<&'static str>,
}

impl NavBar {
    /// Get the navigation bar for the page served at `endpoint`.
    ///
    /// Pages without their own link, like the edit form, highlight the
    /// section they belong to.
    pub fn new(endpoint: &str) -> Self {
        let endpoint = match endpoint {
            endpoints::EDIT_OPERATION_VIEW => endpoints::HISTORY_VIEW,
            endpoint => endpoint,
        };

        let current_section = SECTIONS
            .iter()
            .find(|(url, _)| *url == endpoint)
            .map(|(url, _)| *url);

        Self { current_section }
    }

    fn is_current(&self, url: &str) -> bool {
        self.current_section == Some(url)
    }

    /// Render the navigation bar.
    pub fn into_html(self) -> Markup {
        // Layout adapted from https://flowbite.com/docs/components/navbar/#default-navbar
        html!(
            nav class="bg-white border-gray-200 dark:bg-gray-900"
            {
                div
                    class="max-w-screen-xl flex flex-wrap items-center justify-between mx-auto p-4"
                {
                    a
                        href=(endpoints::ROOT)
                        class="flex items-center space-x-3 rtl:space-x-reverse"
                    {
                        img
                            src="/static/favicon-128x128.png"
                            alt="Cashbook Logo"
                            class="h-8"
                        ;

                        span
                            class="self-center text-2xl font-semibold whitespace-nowrap dark:text-white"
                        {
                            "Cashbook"
                        }
                    }

                    div class="hidden w-full lg:block lg:w-auto"
                    {
                        ul
                            class="font-medium flex flex-col p-4 lg:p-0 mt-4
                            border border-gray-100 rounded bg-gray-50
                            lg:flex-row lg:space-x-8 rtl:space-x-reverse lg:mt-0
                            lg:border-0 lg:bg-white dark:bg-gray-800
                            lg:dark:bg-gray-900 dark:border-gray-700"
                        {
                            @for (url, label) in SECTIONS {
                                @let is_current = self.is_current(url);
                                li
                                {
                                    a
                                        href=(url)
                                        class=(if is_current { DESKTOP_CURRENT_LINK_STYLE } else { DESKTOP_LINK_STYLE })
                                        aria-current=[is_current.then_some("page")]
                                    {
                                        (label)
                                    }
                                }
                            }
                        }
                    }
                }
            }

            nav class="fixed inset-x-0 bottom-0 z-40 lg:hidden"
            {
                div class="mx-auto max-w-screen-xl px-4 pb-4"
                {
                    div
                        class="rounded-xl border border-gray-200 bg-white/95
                        shadow-lg backdrop-blur dark:border-gray-700 dark:bg-gray-900/95"
                    {
                        ul
                            class="grid grid-cols-4 gap-2 px-4 py-3"
                            aria-label="Primary"
                        {
                            @for (url, label) in SECTIONS {
                                @let is_current = self.is_current(url);
                                li class="min-w-0"
                                {
                                    a
                                        href=(url)
                                        class=(if is_current { MOBILE_CURRENT_LINK_STYLE } else { MOBILE_LINK_STYLE })
                                        aria-current=[is_current.then_some("page")]
                                    {
                                        span class="truncate" { (label) }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        )
    }
}
