use uuid::Uuid;

use crate::{ContentKeys, ContentRef, Error, Time, UserId};

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct CommentId(pub Uuid);

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(try_from = "WireComment", into = "WireComment")]
pub struct Comment {
    pub id: CommentId,
    pub content: String,
    pub created_at: Time,
    pub updated_at: Time,

    pub author_id: UserId,
    pub author_display_name: String,
    pub author_avatar_url: Option<String>,

    /// The content item this comment is attached to
    pub target: ContentRef,
}

impl Comment {
    pub fn is_authored_by(&self, user: &UserId) -> bool {
        self.author_id == *user
    }
}

#[derive(serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct WireComment {
    id: CommentId,
    content: String,
    created_at: Time,
    updated_at: Time,
    author_id: UserId,
    author_display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    author_avatar_url: Option<String>,
    #[serde(flatten)]
    target: ContentKeys,
}

impl TryFrom<WireComment> for Comment {
    type Error = Error;

    fn try_from(c: WireComment) -> Result<Comment, Error> {
        Ok(Comment {
            id: c.id,
            content: c.content,
            created_at: c.created_at,
            updated_at: c.updated_at,
            author_id: c.author_id,
            author_display_name: c.author_display_name,
            author_avatar_url: c.author_avatar_url,
            target: ContentRef::try_from(c.target)?,
        })
    }
}

impl From<Comment> for WireComment {
    fn from(c: Comment) -> WireComment {
        WireComment {
            id: c.id,
            content: c.content,
            created_at: c.created_at,
            updated_at: c.updated_at,
            author_id: c.author_id,
            author_display_name: c.author_display_name,
            author_avatar_url: c.author_avatar_url,
            target: c.target.to_keys(),
        }
    }
}

/// Body of `POST /api/comments`
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(try_from = "WireNewComment", into = "WireNewComment")]
pub struct NewComment {
    pub content: String,
    pub target: ContentRef,
}

impl NewComment {
    /// Returns the text to store
    pub fn validate(&self) -> Result<&str, Error> {
        crate::validate_comment_content(&self.content)
    }
}

#[derive(serde::Deserialize, serde::Serialize)]
struct WireNewComment {
    content: String,
    #[serde(flatten)]
    target: ContentKeys,
}

impl TryFrom<WireNewComment> for NewComment {
    type Error = Error;

    fn try_from(c: WireNewComment) -> Result<NewComment, Error> {
        Ok(NewComment {
            content: c.content,
            target: ContentRef::try_from(c.target)?,
        })
    }
}

impl From<NewComment> for WireNewComment {
    fn from(c: NewComment) -> WireNewComment {
        WireNewComment {
            content: c.content,
            target: c.target.to_keys(),
        }
    }
}

/// Body of `PUT /api/comments/{id}`
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct EditComment {
    pub content: String,
}

impl EditComment {
    pub fn validate(&self) -> Result<&str, Error> {
        crate::validate_comment_content(&self.content)
    }
}
