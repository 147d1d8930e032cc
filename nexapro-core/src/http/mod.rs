//! Request pipeline for the NexaPro REST backend

mod client;
mod request;

pub use client::{ApiClient, ApiResponse, SESSION_EXPIRED_MESSAGE};
pub(crate) use client::{NO_REFRESH_TOKEN, REFRESH_PATH};
pub use request::{ApiRequest, FilePart, MultipartForm, RequestBody};
