use uuid::Uuid;

use crate::{PhotoId, UserId};

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct VoteId(pub Uuid);

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub id: VoteId,
    pub user_id: UserId,
    pub content_id: PhotoId,
}

/// Response to both `POST` and `DELETE /api/photos/{id}/vote`
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct VoteStatus {
    /// Whether the user has a vote on the photo *after* the request
    pub voted: bool,
}
