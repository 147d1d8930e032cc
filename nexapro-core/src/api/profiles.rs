//! Profile endpoints

use super::ResourceClient;
use crate::domain::{Profile, Record};
use crate::error::Result;
use crate::http::{ApiRequest, FilePart, MultipartForm};
use serde::Serialize;
use std::fmt::Display;
use std::ops::Deref;

#[derive(Clone)]
pub struct ProfilesApi {
    inner: ResourceClient,
}

impl ProfilesApi {
    pub fn new(inner: ResourceClient) -> Self {
        Self { inner }
    }

    /// The logged-in user's profile. `GET /profiles/` returns a single object
    /// for ordinary users.
    pub async fn current(&self) -> Result<Profile> {
        self.inner
            .client()
            .send_json(ApiRequest::get(self.inner.collection_path()))
            .await
    }

    /// `PUT /profiles/update-owner/<owner_id>/`
    pub async fn update_owner<T: Serialize + ?Sized>(
        &self,
        owner_id: impl Display,
        data: &T,
    ) -> Result<Record> {
        let path = format!("/profiles/update-owner/{}/", owner_id);
        self.inner
            .client()
            .send_json(ApiRequest::put(path).json(data)?)
            .await
    }

    /// Multipart `PATCH /auth/profile/` with a new avatar image
    pub async fn update_avatar(&self, avatar: FilePart) -> Result<Record> {
        let form = MultipartForm::new().file(avatar);
        self.inner
            .client()
            .send_json(ApiRequest::patch("/auth/profile/").multipart(form))
            .await
    }
}

impl Deref for ProfilesApi {
    type Target = ResourceClient;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
