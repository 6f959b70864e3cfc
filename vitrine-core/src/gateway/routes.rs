//! Endpoint paths, relative to the API base URL.

pub const FETCH_PROFILE: &str = "user/profile";
pub const UPLOAD_IMAGE: &str = "app/upload-image";
pub const PERSIST_PROFILE: &str = "auth/set-profile";

/// Value of the `type` multipart field on image uploads.
pub const UPLOAD_KIND_PROFILE: &str = "profile";
