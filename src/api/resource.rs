use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{ApiClient, ApiError, FilePart};

/// A backend collection exposed as `GET/POST /<path>` and `GET/PATCH/DELETE /<path>/:id`.
pub trait Resource: DeserializeOwned {
    /// Collection path, e.g. `/students`.
    const PATH: &'static str;
    /// Users and roles are replaced with PUT; everything else is patched.
    const REPLACE_ON_UPDATE: bool = false;

    fn member_path(id: &str) -> String {
        format!("{}/{}", Self::PATH, id)
    }
}

impl ApiClient {
    pub async fn find_all<R: Resource>(&self) -> Result<Vec<R>, ApiError> {
        self.list(R::PATH).await
    }

    pub async fn find<R: Resource>(&self, id: &str) -> Result<R, ApiError> {
        self.get(&R::member_path(id)).await
    }

    pub async fn create<R, P>(&self, payload: &P) -> Result<R, ApiError>
    where
        R: Resource,
        P: Serialize + ?Sized,
    {
        self.post(R::PATH, payload).await
    }

    pub async fn update<R, P>(&self, id: &str, payload: &P) -> Result<R, ApiError>
    where
        R: Resource,
        P: Serialize + ?Sized,
    {
        let path = R::member_path(id);
        if R::REPLACE_ON_UPDATE {
            self.put(&path, payload).await
        } else {
            self.patch(&path, payload).await
        }
    }

    pub async fn remove<R: Resource>(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&R::member_path(id)).await
    }

    /// Multipart create for file-bearing collections.
    pub async fn create_with_file<R: Resource>(
        &self,
        fields: Vec<(String, String)>,
        file: Option<FilePart>,
    ) -> Result<R, ApiError> {
        self.send_multipart(reqwest::Method::POST, R::PATH, fields, file).await
    }

    /// Multipart update; the file is optional on edit.
    pub async fn update_with_file<R: Resource>(
        &self,
        id: &str,
        fields: Vec<(String, String)>,
        file: Option<FilePart>,
    ) -> Result<R, ApiError> {
        self.send_multipart(reqwest::Method::PATCH, &R::member_path(id), fields, file).await
    }
}
