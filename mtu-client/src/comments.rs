use std::rc::Rc;

use crate::{
    api::{self, Comment, CommentId, ContentRef, EditComment, NewComment, UserId},
    Api, Error, Notifier, PendingMutation,
};

pub type CountCallback = Box<dyn FnMut(usize)>;

/// Comment list of one content item, with the mutations its viewer may
/// perform on it.
///
/// A section is bound to a single `ContentRef` for its whole lifetime:
/// showing another item means building another section. Local state only
/// ever changes once the server confirmed a mutation.
///
/// Every mutation comes in two forms. `begin_*` checks preconditions and
/// returns the request to send, or `None` if nothing should be sent;
/// `finish_*` applies the server's answer. The `async` forms chain both
/// around an `Api` call.
pub struct CommentSection {
    target: ContentRef,
    viewer: Option<UserId>,
    comments: Vec<Comment>,
    pending: PendingMutation,
    notifier: Rc<dyn Notifier>,
    on_count_change: Option<CountCallback>,
}

impl CommentSection {
    pub fn new(
        target: ContentRef,
        viewer: Option<UserId>,
        notifier: Rc<dyn Notifier>,
    ) -> CommentSection {
        CommentSection {
            target,
            viewer,
            comments: Vec::new(),
            pending: PendingMutation::Idle,
            notifier,
            on_count_change: None,
        }
    }

    /// Registers the callback told about the new comment count after every
    /// applied load or mutation
    pub fn on_count_change(mut self, cb: impl FnMut(usize) + 'static) -> CommentSection {
        self.on_count_change = Some(Box::new(cb));
        self
    }

    pub fn target(&self) -> &ContentRef {
        &self.target
    }

    pub fn viewer(&self) -> Option<UserId> {
        self.viewer
    }

    /// Comments, in the order they should be displayed
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn count(&self) -> usize {
        self.comments.len()
    }

    /// Whether the submit controls should currently be disabled
    pub fn is_pending(&self) -> bool {
        self.pending.is_pending()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.pending.last_error()
    }

    pub fn can_comment(&self) -> bool {
        self.viewer.is_some()
    }

    /// Whether edit and delete controls should be shown for `comment`
    pub fn can_modify(&self, comment: &Comment) -> bool {
        match &self.viewer {
            Some(viewer) => comment.is_authored_by(viewer),
            None => false,
        }
    }

    fn report_count(&mut self) {
        let count = self.comments.len();
        if let Some(cb) = &mut self.on_count_change {
            cb(count);
        }
    }

    fn failed(&mut self, action: &str, err: Error) -> Error {
        tracing::warn!(item=%self.target, ?err, "failed to {action}");
        let message = err.user_message();
        self.notifier.alert(&message);
        self.pending.fail(message);
        err
    }

    pub async fn load<A: Api + ?Sized>(&mut self, api: &A) {
        let res = api.fetch_comments(&self.target).await;
        self.finish_load(res)
    }

    /// Replaces the list with the fetched one. A failed fetch only gets
    /// logged, and the list is left as it was.
    pub fn finish_load(&mut self, res: Result<Vec<Comment>, Error>) {
        match res {
            Ok(mut comments) => {
                let target = self.target;
                comments.retain(|c| {
                    let ours = c.target == target;
                    if !ours {
                        tracing::warn!(
                            comment = ?c.id,
                            item = %target,
                            "dropping comment for another item"
                        );
                    }
                    ours
                });
                self.comments = comments;
                self.report_count();
            }
            Err(err) => {
                tracing::error!(item=%self.target, ?err, "failed to fetch comments");
            }
        }
    }

    pub fn begin_submit(&mut self, content: &str) -> Option<NewComment> {
        if self.viewer.is_none() {
            tracing::debug!(item=%self.target, "not submitting comment without a logged-in user");
            return None;
        }
        let content = match api::validate_comment_content(content) {
            Ok(c) => c,
            Err(err) => {
                tracing::debug!(?err, "not submitting invalid comment");
                return None;
            }
        };
        if !self.pending.begin() {
            tracing::debug!(item=%self.target, "comment mutation already in flight");
            return None;
        }
        Some(NewComment {
            content: String::from(content),
            target: self.target,
        })
    }

    /// Prepends the comment the server created. A reload that landed while
    /// the submission was in flight may already show it; it is then
    /// refreshed in place.
    pub fn finish_submit(&mut self, res: Result<Comment, Error>) -> Result<Comment, Error> {
        match res {
            Ok(comment) => {
                self.pending.succeed();
                match self.comments.iter_mut().find(|c| c.id == comment.id) {
                    Some(c) => *c = comment.clone(),
                    None => self.comments.insert(0, comment.clone()),
                }
                self.report_count();
                Ok(comment)
            }
            Err(err) => Err(self.failed("post comment", err)),
        }
    }

    /// Posts `content`. `Ok(None)` means nothing was sent: blank content,
    /// no logged-in user, or another mutation still in flight.
    pub async fn submit<A: Api + ?Sized>(
        &mut self,
        api: &A,
        content: &str,
    ) -> Result<Option<Comment>, Error> {
        let req = match self.begin_submit(content) {
            Some(req) => req,
            None => return Ok(None),
        };
        let res = api.post_comment(&req).await;
        self.finish_submit(res).map(Some)
    }

    pub fn begin_edit(&mut self, id: CommentId, content: &str) -> Option<EditComment> {
        match self.comments.iter().find(|c| c.id == id) {
            None => {
                tracing::debug!(comment=?id, "not editing comment that is not displayed");
                return None;
            }
            Some(c) if !self.can_modify(c) => {
                tracing::debug!(comment=?id, "not editing comment of another user");
                return None;
            }
            Some(_) => (),
        }
        let content = api::validate_comment_content(content).ok()?;
        if !self.pending.begin() {
            tracing::debug!(item=%self.target, "comment mutation already in flight");
            return None;
        }
        Some(EditComment {
            content: String::from(content),
        })
    }

    /// Swaps the edited comment in place
    pub fn finish_edit(&mut self, res: Result<Comment, Error>) -> Result<Comment, Error> {
        match res {
            Ok(comment) => {
                self.pending.succeed();
                match self.comments.iter_mut().find(|c| c.id == comment.id) {
                    Some(c) => *c = comment.clone(),
                    None => tracing::warn!(comment=?comment.id, "edited comment vanished"),
                }
                Ok(comment)
            }
            Err(err) => Err(self.failed("edit comment", err)),
        }
    }

    pub async fn edit<A: Api + ?Sized>(
        &mut self,
        api: &A,
        id: CommentId,
        content: &str,
    ) -> Result<Option<Comment>, Error> {
        let req = match self.begin_edit(id, content) {
            Some(req) => req,
            None => return Ok(None),
        };
        let res = api.edit_comment(id, &req).await;
        self.finish_edit(res).map(Some)
    }

    pub fn begin_delete(&mut self, id: CommentId) -> Option<CommentId> {
        let comment = self.comments.iter().find(|c| c.id == id)?;
        if !self.can_modify(comment) {
            tracing::debug!(comment=?id, "not deleting comment of another user");
            return None;
        }
        if !self.pending.begin() {
            tracing::debug!(item=%self.target, "comment mutation already in flight");
            return None;
        }
        Some(id)
    }

    /// Removes the deleted comment, returning whether it was still displayed
    pub fn finish_delete(&mut self, id: CommentId, res: Result<(), Error>) -> Result<bool, Error> {
        match res {
            Ok(()) => {
                self.pending.succeed();
                let removed = match self.comments.iter().position(|c| c.id == id) {
                    Some(pos) => {
                        self.comments.remove(pos);
                        true
                    }
                    None => false,
                };
                self.report_count();
                Ok(removed)
            }
            Err(err) => Err(self.failed("delete comment", err)),
        }
    }

    /// Deletes a comment. `Ok(false)` means nothing was deleted.
    pub async fn delete<A: Api + ?Sized>(&mut self, api: &A, id: CommentId) -> Result<bool, Error> {
        let id = match self.begin_delete(id) {
            Some(id) => id,
            None => return Ok(false),
        };
        let res = api.delete_comment(id).await;
        self.finish_delete(id, res)
    }
}
