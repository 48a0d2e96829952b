use anyhow::anyhow;
use mtu_client::{
    api::{AuthToken, Comment, CommentId, ContentRef, EditComment, NewComment, PhotoId, VoteStatus},
    Api, Error,
};

use crate::SharedServer;

/// Talks to a `MockServer` directly, without going through HTTP
#[derive(Clone)]
pub struct MockClient {
    server: SharedServer,
    token: Option<AuthToken>,
}

impl MockClient {
    pub fn new(server: SharedServer, token: Option<AuthToken>) -> MockClient {
        MockClient { server, token }
    }

    pub fn anonymous(server: SharedServer) -> MockClient {
        MockClient::new(server, None)
    }

    async fn lock(&self) -> Result<tokio::sync::MutexGuard<'_, crate::MockServer>, Error> {
        let server = self.server.lock().await;
        if server.is_offline() {
            // Look like the network dropped rather than like an API error
            return Err(Error::Transport(anyhow!("connection refused")));
        }
        Ok(server)
    }
}

#[async_trait::async_trait]
impl Api for MockClient {
    async fn fetch_comments(&self, target: &ContentRef) -> Result<Vec<Comment>, Error> {
        Ok(self.lock().await?.fetch_comments(target)?)
    }

    async fn post_comment(&self, comment: &NewComment) -> Result<Comment, Error> {
        Ok(self.lock().await?.post_comment(self.token, comment.clone())?)
    }

    async fn edit_comment(&self, id: CommentId, edit: &EditComment) -> Result<Comment, Error> {
        Ok(self.lock().await?.edit_comment(self.token, id, edit.clone())?)
    }

    async fn delete_comment(&self, id: CommentId) -> Result<(), Error> {
        Ok(self.lock().await?.delete_comment(self.token, id)?)
    }

    async fn vote(&self, photo: PhotoId) -> Result<VoteStatus, Error> {
        Ok(self.lock().await?.vote(self.token, photo)?)
    }

    async fn unvote(&self, photo: PhotoId) -> Result<VoteStatus, Error> {
        Ok(self.lock().await?.unvote(self.token, photo)?)
    }
}
