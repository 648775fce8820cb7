use std::fmt;

pub const APP_NAME: &str = "Advanced Crop and Soil Management System";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_TAG: Option<&str> = option_env!("GIT_TAG");
pub const USER_AGENT: &str = concat!("crop-advisor/", env!("CARGO_PKG_VERSION"));

pub fn version_label() -> String {
    if let Some(tag) = GIT_TAG {
        tag.to_string()
    } else {
        format!("v{}", APP_VERSION)
    }
}

/// Startup line printed before the first prompt.
pub struct Banner;

impl fmt::Display for Banner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Welcome to the {APP_NAME}")
    }
}
