//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod app_center_endpoint;
mod http_app_center_release_host;

pub use app_center_endpoint::{APP_CENTER_API_BASE_URL, AppCenterEndpoint};
pub use http_app_center_release_host::{HttpAppCenterReleaseHost, build_http_client};
