use async_trait::async_trait;

use crate::{
    api::{Comment, CommentId, ContentRef, EditComment, NewComment, PhotoId, VoteStatus},
    Error,
};

/// The REST endpoints consumed by the engagement widgets
#[async_trait]
pub trait Api: Sync {
    /// `GET /api/comments?<kind>Id=<id>`
    async fn fetch_comments(&self, target: &ContentRef) -> Result<Vec<Comment>, Error>;

    /// `POST /api/comments`
    async fn post_comment(&self, comment: &NewComment) -> Result<Comment, Error>;

    /// `PUT /api/comments/{id}`
    async fn edit_comment(&self, id: CommentId, edit: &EditComment) -> Result<Comment, Error>;

    /// `DELETE /api/comments/{id}`
    async fn delete_comment(&self, id: CommentId) -> Result<(), Error>;

    /// `POST /api/photos/{id}/vote`
    async fn vote(&self, photo: PhotoId) -> Result<VoteStatus, Error>;

    /// `DELETE /api/photos/{id}/vote`
    async fn unvote(&self, photo: PhotoId) -> Result<VoteStatus, Error>;
}
