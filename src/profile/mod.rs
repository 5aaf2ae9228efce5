//! Profiles own operations. The active profile is kept in a private cookie
//! and every page that shows or changes operations requires one.

mod cookie;
mod core;
mod create_endpoint;
mod middleware;
mod profiles_page;

pub use core::{Profile, UserID, create_profile, create_profile_table};
pub use create_endpoint::{create_profile_endpoint, select_profile_endpoint};
pub use middleware::{active_profile_guard, active_profile_guard_hx};
pub use profiles_page::get_profiles_page;
