use std::{cell::RefCell, rc::Rc};

use crate::{
    api::{ContentRef, PhotoId, UserId},
    CommentSection, Notifier,
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeedItem {
    pub target: ContentRef,
    pub title: String,
    pub comment_count: usize,
    pub vote_count: usize,
}

impl FeedItem {
    pub fn new(target: ContentRef, title: impl Into<String>) -> FeedItem {
        FeedItem {
            target,
            title: title.into(),
            comment_count: 0,
            vote_count: 0,
        }
    }
}

/// A listing of content items (gallery, fashion corner, fan wall...) with
/// one selected item whose comments are shown.
///
/// Counts reported by the mounted widgets flow back into the listing.
#[derive(Debug, Default)]
pub struct ContentFeed {
    items: Rc<RefCell<Vec<FeedItem>>>,
    selected: Option<ContentRef>,
}

impl ContentFeed {
    pub fn new(items: Vec<FeedItem>) -> ContentFeed {
        ContentFeed {
            items: Rc::new(RefCell::new(items)),
            selected: None,
        }
    }

    pub fn items(&self) -> Vec<FeedItem> {
        self.items.borrow().clone()
    }

    pub fn item(&self, target: &ContentRef) -> Option<FeedItem> {
        self.items
            .borrow()
            .iter()
            .find(|i| i.target == *target)
            .cloned()
    }

    pub fn selected(&self) -> Option<ContentRef> {
        self.selected
    }

    /// Selects `target` and mounts a fresh comment section for it, or
    /// returns `None` if the item is not part of this feed.
    ///
    /// The section is not loaded yet; callers load it right after mounting.
    pub fn open(
        &mut self,
        target: ContentRef,
        viewer: Option<UserId>,
        notifier: Rc<dyn Notifier>,
    ) -> Option<CommentSection> {
        if self.item(&target).is_none() {
            tracing::warn!(item=%target, "opening item not in feed");
            return None;
        }
        self.selected = Some(target);
        let items = self.items.clone();
        Some(
            CommentSection::new(target, viewer, notifier).on_count_change(move |count| {
                if let Some(item) = items.borrow_mut().iter_mut().find(|i| i.target == target) {
                    item.comment_count = count;
                }
            }),
        )
    }

    /// Deselects the current item. Sections mounted for it keep reporting
    /// counts until they are dropped.
    pub fn close(&mut self) {
        self.selected = None;
    }

    /// Callback to plug into a `VoteTracker`, keeping photo vote counts in
    /// sync with the listing
    pub fn vote_counter(&self) -> impl FnMut(PhotoId, usize) + 'static {
        let items = self.items.clone();
        move |photo, count| {
            let target = ContentRef::from(photo);
            if let Some(item) = items.borrow_mut().iter_mut().find(|i| i.target == target) {
                item.vote_count = count;
            }
        }
    }
}
