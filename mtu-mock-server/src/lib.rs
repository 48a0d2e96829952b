use std::{
    collections::{btree_map, BTreeMap, HashMap},
    sync::Arc,
};

use chrono::Utc;
use mtu_client::api::{
    self, AuthToken, Comment, CommentId, ContentRef, EditComment, Error, NewComment, PhotoId, Time,
    User, UserId, Uuid, Vote, VoteId, VoteStatus,
};

mod client;
pub use client::MockClient;

mod http;
pub use http::{router, serve, Error as HttpError};

pub type SharedServer = Arc<tokio::sync::Mutex<MockServer>>;

/// In-memory stand-in for the Miss Tourism Uganda content API
pub struct MockServer {
    users: BTreeMap<UserId, DbUser>,
    /// Newest first, like the real listing
    comments: Vec<Comment>,
    votes: BTreeMap<PhotoId, Vec<Vote>>,
    offline: bool,
    fail_next: Option<Error>,
    num_requests: usize,
    last_time: Option<Time>,
}

#[derive(Debug)]
struct DbUser {
    user: User,
    sessions: Vec<AuthToken>,
}

impl MockServer {
    pub fn new() -> MockServer {
        MockServer {
            users: BTreeMap::new(),
            comments: Vec::new(),
            votes: BTreeMap::new(),
            offline: false,
            fail_next: None,
            num_requests: 0,
            last_time: None,
        }
    }

    pub fn shared(self) -> SharedServer {
        Arc::new(tokio::sync::Mutex::new(self))
    }

    /// Number of API calls that reached the server, rejected ones included
    pub fn test_num_requests(&self) -> usize {
        self.num_requests
    }

    pub fn test_num_users(&self) -> usize {
        self.users.len()
    }

    /// While offline, every request fails before reaching the data
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    pub fn is_offline(&self) -> bool {
        self.offline
    }

    /// Makes the next request fail with `err`
    pub fn fail_next(&mut self, err: Error) {
        self.fail_next = Some(err);
    }

    pub fn admin_create_user(&mut self, u: User) -> Result<(), Error> {
        api::validate_string(&u.display_name)?;
        match self.users.entry(u.id) {
            btree_map::Entry::Occupied(_) => Err(Error::Unknown(format!(
                "user {} already exists",
                u.id.0
            ))),
            btree_map::Entry::Vacant(entry) => {
                entry.insert(DbUser {
                    user: u,
                    sessions: Vec::new(),
                });
                Ok(())
            }
        }
    }

    pub fn login(&mut self, user: UserId) -> Result<AuthToken, Error> {
        let u = self.users.get_mut(&user).ok_or(Error::NotFound)?;
        let tok = AuthToken(Uuid::new_v4());
        u.sessions.push(tok);
        Ok(tok)
    }

    pub fn logout(&mut self, tok: AuthToken) {
        for u in self.users.values_mut() {
            u.sessions.retain(|s| *s != tok);
        }
    }

    fn resolve(&self, tok: Option<AuthToken>) -> Result<&User, Error> {
        let tok = tok.ok_or(Error::Unauthorized)?;
        self.users
            .values()
            .find(|u| u.sessions.contains(&tok))
            .map(|u| &u.user)
            .ok_or(Error::Unauthorized)
    }

    fn start_request(&mut self) -> Result<(), Error> {
        self.num_requests += 1;
        if self.offline {
            return Err(Error::Unknown(String::from("Service unavailable")));
        }
        match self.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Strictly increasing timestamps, so that ordering by date is stable
    fn now(&mut self) -> Time {
        let mut now = Utc::now();
        if let Some(last) = self.last_time {
            if now <= last {
                now = last + chrono::Duration::milliseconds(1);
            }
        }
        self.last_time = Some(now);
        now
    }

    pub fn fetch_comments(&mut self, target: &ContentRef) -> Result<Vec<Comment>, Error> {
        self.start_request()?;
        Ok(self
            .comments
            .iter()
            .filter(|c| c.target == *target)
            .cloned()
            .collect())
    }

    pub fn post_comment(
        &mut self,
        tok: Option<AuthToken>,
        c: NewComment,
    ) -> Result<Comment, Error> {
        self.start_request()?;
        let author = self.resolve(tok)?.clone();
        let content = String::from(c.validate()?);
        let now = self.now();
        let comment = Comment {
            id: CommentId(Uuid::new_v4()),
            content,
            created_at: now,
            updated_at: now,
            author_id: author.id,
            author_display_name: author.display_name,
            author_avatar_url: author.avatar_url,
            target: c.target,
        };
        tracing::info!(comment=?comment.id, item=%comment.target, "comment posted");
        self.comments.insert(0, comment.clone());
        Ok(comment)
    }

    pub fn edit_comment(
        &mut self,
        tok: Option<AuthToken>,
        id: CommentId,
        e: EditComment,
    ) -> Result<Comment, Error> {
        self.start_request()?;
        let user = self.resolve(tok)?.id;
        let content = String::from(e.validate()?);
        let now = self.now();
        let c = self
            .comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(Error::NotFound)?;
        if !c.is_authored_by(&user) {
            return Err(Error::PermissionDenied);
        }
        c.content = content;
        c.updated_at = now;
        Ok(c.clone())
    }

    pub fn delete_comment(&mut self, tok: Option<AuthToken>, id: CommentId) -> Result<(), Error> {
        self.start_request()?;
        let user = self.resolve(tok)?.id;
        let pos = self
            .comments
            .iter()
            .position(|c| c.id == id)
            .ok_or(Error::NotFound)?;
        if !self.comments[pos].is_authored_by(&user) {
            return Err(Error::PermissionDenied);
        }
        let removed = self.comments.remove(pos);
        tracing::info!(comment=?removed.id, item=%removed.target, "comment deleted");
        Ok(())
    }

    /// Idempotent: voting twice keeps a single vote
    pub fn vote(&mut self, tok: Option<AuthToken>, photo: PhotoId) -> Result<VoteStatus, Error> {
        self.start_request()?;
        let user = self.resolve(tok)?.id;
        let votes = self.votes.entry(photo).or_default();
        if !votes.iter().any(|v| v.user_id == user) {
            votes.push(Vote {
                id: VoteId(Uuid::new_v4()),
                user_id: user,
                content_id: photo,
            });
        }
        Ok(VoteStatus { voted: true })
    }

    pub fn unvote(&mut self, tok: Option<AuthToken>, photo: PhotoId) -> Result<VoteStatus, Error> {
        self.start_request()?;
        let user = self.resolve(tok)?.id;
        if let Some(votes) = self.votes.get_mut(&photo) {
            votes.retain(|v| v.user_id != user);
        }
        Ok(VoteStatus { voted: false })
    }

    /// The vote list that a photo listing embeds
    pub fn votes_for(&self, photo: PhotoId) -> Vec<Vote> {
        self.votes.get(&photo).cloned().unwrap_or_default()
    }

    pub fn test_comment_counts(&self) -> HashMap<ContentRef, usize> {
        let mut res = HashMap::new();
        for c in &self.comments {
            *res.entry(c.target).or_default() += 1;
        }
        res
    }
}

impl Default for MockServer {
    fn default() -> MockServer {
        MockServer::new()
    }
}
