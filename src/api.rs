//! Remote object operations: the trait seam the store talks through, plus
//! the HTTP implementation against the room server.
//!
//! All object routes are scoped under `/api/rooms/{room_id}/canvas-objects`.
//! Undo and redo are stateless server operations on the room's history; the
//! client never replays edits itself.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::object::{ObjectId, WireObject};

/// Error returned by remote object operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request could not be sent or the response body not read.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
}

impl ApiError {
    /// Whether this error is the server saying "nothing to restore" on redo.
    #[must_use]
    pub fn is_nothing_to_restore(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

/// The remote operations the store consumes, room-scoped.
///
/// Futures returned here are awaited inline on the UI task and are not
/// required to be `Send`.
#[allow(async_fn_in_trait)]
pub trait ObjectApi {
    /// Persist a new object; the server assigns its id.
    async fn create_object(
        &self,
        room_id: Uuid,
        object_type: &str,
        object_data: String,
    ) -> Result<WireObject, ApiError>;

    /// Fetch the room's full object list in creation order.
    async fn list_objects(&self, room_id: Uuid) -> Result<Vec<WireObject>, ApiError>;

    /// Remove one object. Idempotent in post-condition.
    async fn delete_object(&self, room_id: Uuid, id: ObjectId) -> Result<(), ApiError>;

    /// Replace an object's data payload.
    async fn update_object(
        &self,
        room_id: Uuid,
        id: ObjectId,
        object_data: String,
    ) -> Result<(), ApiError>;

    /// Remove the most-recently-created object in the room.
    async fn undo(&self, room_id: Uuid) -> Result<WireObject, ApiError>;

    /// Restore the most-recently-deleted object in the room.
    async fn redo(&self, room_id: Uuid) -> Result<WireObject, ApiError>;
}

#[derive(Serialize)]
struct CreateRequest<'a> {
    #[serde(rename = "type")]
    object_type: &'a str,
    data: String,
}

#[derive(Serialize)]
struct UpdateRequest {
    data: String,
}

/// [`ObjectApi`] over HTTP via `reqwest`.
pub struct HttpObjectApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpObjectApi {
    /// Create a client for the server at `base_url` (scheme + authority,
    /// trailing slash tolerated).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    fn objects_url(&self, room_id: Uuid) -> String {
        format!("{}/api/rooms/{room_id}/canvas-objects", self.base_url)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        // Error bodies carry a `message` field; anything else degrades to an
        // empty message rather than masking the status.
        let message = match response.json::<Value>().await {
            Ok(body) => body
                .get("message")
                .and_then(Value::as_str)
                .map(ToOwned::to_owned)
                .unwrap_or_default(),
            Err(_) => String::new(),
        };
        Err(ApiError::Status { status: status.as_u16(), message })
    }
}

impl ObjectApi for HttpObjectApi {
    async fn create_object(
        &self,
        room_id: Uuid,
        object_type: &str,
        object_data: String,
    ) -> Result<WireObject, ApiError> {
        let response = self
            .client
            .post(self.objects_url(room_id))
            .json(&CreateRequest { object_type, data: object_data })
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn list_objects(&self, room_id: Uuid) -> Result<Vec<WireObject>, ApiError> {
        let response = self.client.get(self.objects_url(room_id)).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn delete_object(&self, room_id: Uuid, id: ObjectId) -> Result<(), ApiError> {
        let url = format!("{}/{id}", self.objects_url(room_id));
        let response = self.client.delete(url).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn update_object(
        &self,
        room_id: Uuid,
        id: ObjectId,
        object_data: String,
    ) -> Result<(), ApiError> {
        let url = format!("{}/{id}", self.objects_url(room_id));
        let response = self
            .client
            .put(url)
            .json(&UpdateRequest { data: object_data })
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn undo(&self, room_id: Uuid) -> Result<WireObject, ApiError> {
        let url = format!("{}/undo", self.objects_url(room_id));
        let response = self.client.delete(url).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn redo(&self, room_id: Uuid) -> Result<WireObject, ApiError> {
        let url = format!("{}/redo", self.objects_url(room_id));
        let response = self.client.post(url).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }
}
