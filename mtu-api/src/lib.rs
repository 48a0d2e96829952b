use chrono::Utc;

pub use uuid::Uuid;
pub type Time = chrono::DateTime<Utc>;

mod comment;
pub use comment::{Comment, CommentId, EditComment, NewComment};

mod content;
pub use content::{
    ContentId, ContentKeys, ContentKind, ContentRef, MessageId, OutfitId, PhotoId, UpdateId,
};

mod error;
pub use error::{Error, GENERIC_ERROR_MESSAGE};

mod story;
pub use story::{Story, StoryId};

mod user;
pub use user::{AuthToken, User, UserId};

mod vote;
pub use vote::{Vote, VoteId, VoteStatus};

pub fn validate_string(s: &str) -> Result<(), Error> {
    if s.contains('\0') {
        return Err(Error::NullByteInString(String::from(s)));
    }
    Ok(())
}

/// Checks user-provided comment text, returning the text that should be
/// sent to the server
pub fn validate_comment_content(s: &str) -> Result<&str, Error> {
    validate_string(s)?;
    let s = s.trim();
    if s.is_empty() {
        return Err(Error::InvalidContent);
    }
    Ok(s)
}
