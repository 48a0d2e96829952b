use std::{
    collections::{HashMap, HashSet},
    rc::Rc,
};

use crate::{
    api::{PhotoId, UserId, Vote, VoteStatus},
    Api, Error, Notifier, PendingMutation,
};

pub const LOGIN_TO_VOTE: &str = "Please log in to vote";

pub type VoteCountCallback = Box<dyn FnMut(PhotoId, usize)>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VoteRequest {
    /// `POST /api/photos/{id}/vote`
    Add(PhotoId),
    /// `DELETE /api/photos/{id}/vote`
    Remove(PhotoId),
}

impl VoteRequest {
    pub fn photo(&self) -> PhotoId {
        match self {
            VoteRequest::Add(p) | VoteRequest::Remove(p) => *p,
        }
    }
}

/// Votes of the photos in a gallery, and the viewer's own votes among them
pub struct VoteTracker {
    viewer: Option<UserId>,
    voters: HashMap<PhotoId, HashSet<UserId>>,
    voted: HashSet<PhotoId>,
    pending: HashMap<PhotoId, PendingMutation>,
    notifier: Rc<dyn Notifier>,
    on_count_change: Option<VoteCountCallback>,
}

impl VoteTracker {
    pub fn new(viewer: Option<UserId>, notifier: Rc<dyn Notifier>) -> VoteTracker {
        VoteTracker {
            viewer,
            voters: HashMap::new(),
            voted: HashSet::new(),
            pending: HashMap::new(),
            notifier,
            on_count_change: None,
        }
    }

    pub fn on_count_change(
        mut self,
        cb: impl FnMut(PhotoId, usize) + 'static,
    ) -> VoteTracker {
        self.on_count_change = Some(Box::new(cb));
        self
    }

    /// Records votes delivered along with the photo listing
    pub fn add_votes(&mut self, votes: impl IntoIterator<Item = Vote>) {
        for v in votes {
            if Some(v.user_id) == self.viewer {
                self.voted.insert(v.content_id);
            }
            if !self.voters.entry(v.content_id).or_default().insert(v.user_id) {
                tracing::warn!(vote=?v.id, photo=?v.content_id, "duplicate vote for user");
            }
        }
    }

    pub fn count(&self, photo: PhotoId) -> usize {
        self.voters.get(&photo).map(|v| v.len()).unwrap_or(0)
    }

    pub fn has_voted(&self, photo: PhotoId) -> bool {
        self.voted.contains(&photo)
    }

    /// Whether the vote button of `photo` should currently be disabled
    pub fn is_pending(&self, photo: PhotoId) -> bool {
        self.pending
            .get(&photo)
            .map(|p| p.is_pending())
            .unwrap_or(false)
    }

    pub fn begin_toggle(&mut self, photo: PhotoId) -> Option<VoteRequest> {
        if self.viewer.is_none() {
            self.notifier.alert(LOGIN_TO_VOTE);
            return None;
        }
        if !self.pending.entry(photo).or_default().begin() {
            tracing::debug!(?photo, "vote toggle already in flight");
            return None;
        }
        Some(match self.voted.contains(&photo) {
            true => VoteRequest::Remove(photo),
            false => VoteRequest::Add(photo),
        })
    }

    /// Applies the server's answer. The returned `voted` flag, not the
    /// direction that was requested, decides the new local state.
    pub fn finish_toggle(
        &mut self,
        req: VoteRequest,
        res: Result<VoteStatus, Error>,
    ) -> Result<bool, Error> {
        let photo = req.photo();
        let pending = self.pending.entry(photo).or_default();
        match res {
            Ok(VoteStatus { voted }) => {
                pending.succeed();
                if let Some(viewer) = self.viewer {
                    if voted {
                        self.voters.entry(photo).or_default().insert(viewer);
                        self.voted.insert(photo);
                    } else {
                        if let Some(voters) = self.voters.get_mut(&photo) {
                            voters.remove(&viewer);
                        }
                        self.voted.remove(&photo);
                    }
                }
                let count = self.count(photo);
                if let Some(cb) = &mut self.on_count_change {
                    cb(photo, count);
                }
                Ok(voted)
            }
            Err(err) => {
                tracing::warn!(?photo, ?req, ?err, "failed to toggle vote");
                let message = err.user_message();
                self.notifier.alert(&message);
                pending.fail(message);
                Err(err)
            }
        }
    }

    /// Toggles the viewer's vote on `photo`, returning whether the viewer has
    /// voted afterwards. `Ok(None)` means nothing was sent.
    pub async fn toggle_vote<A: Api + ?Sized>(
        &mut self,
        api: &A,
        photo: PhotoId,
    ) -> Result<Option<bool>, Error> {
        let req = match self.begin_toggle(photo) {
            Some(req) => req,
            None => return Ok(None),
        };
        let res = match req {
            VoteRequest::Add(p) => api.vote(p).await,
            VoteRequest::Remove(p) => api.unvote(p).await,
        };
        self.finish_toggle(req, res).map(Some)
    }
}
