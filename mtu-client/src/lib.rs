mod comments;
pub use comments::{CommentSection, CountCallback};

mod config;
pub use config::ClientConfig;

mod error;
pub use error::Error;

mod feed;
pub use feed::{ContentFeed, FeedItem};

mod http;
pub use http::HttpApi;

mod notify;
pub use notify::{AlertLog, LogNotifier, Notifier};

mod pending;
pub use pending::PendingMutation;

pub mod speech;
pub use speech::{SpeechController, SpeechEngine};

mod transport;
pub use transport::Api;

mod votes;
pub use votes::{VoteCountCallback, VoteRequest, VoteTracker, LOGIN_TO_VOTE};

pub mod api {
    pub use mtu_api::*;
}
