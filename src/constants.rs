/// Storage format for every `created_at` column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub mod session {

    pub const USER_ID: &str = "user_id";

    pub const NOTICE: &str = "notice";
}

pub mod routes {

    pub const HOME: &str = "/";

    pub const LOGIN: &str = "/login";

    pub const REGISTER: &str = "/register";

    pub const SUBMIT: &str = "/submit";

    pub const PROFILE: &str = "/profile";

    pub const STORIES: &str = "/stories";

    pub const PENDING: &str = "/admin/pending";
}

pub mod uploads {

    /// Prefix stored in `stories.image_path`; the router mounts the upload dir here.
    pub const PUBLIC_PREFIX: &str = "uploads";

    pub const FALLBACK_EXTENSION: &str = "bin";

    pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];
}

/// Returns the current UTC time in [`TIMESTAMP_FORMAT`].
#[must_use]
pub fn now_timestamp() -> String {
    chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string()
}
