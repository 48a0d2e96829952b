//! Fixtures shared by the end-to-end tests

use std::rc::Rc;

use mtu_client::{
    api::{AuthToken, ContentKind, ContentRef, User, UserId, Uuid},
    AlertLog, Notifier,
};
use mtu_mock_server::{MockClient, MockServer, SharedServer};

pub const USER_NAMES: [&str; 3] = ["Nakato", "Okello", "Achieng"];

/// Logs go to the test output only when asked for
pub fn init_tracing() {
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }
}

pub struct Fixture {
    pub server: SharedServer,
    pub users: Vec<(User, AuthToken)>,
    pub alerts: AlertLog,
}

impl Fixture {
    /// A server with one logged-in session per `USER_NAMES` entry
    pub fn new() -> Fixture {
        init_tracing();
        let mut server = MockServer::new();
        let mut users = Vec::new();
        for name in USER_NAMES {
            let user = User {
                id: UserId(Uuid::new_v4()),
                display_name: String::from(name),
                avatar_url: Some(format!("https://cdn.example.org/avatars/{name}.png")),
            };
            server
                .admin_create_user(user.clone())
                .expect("creating fixture user");
            let tok = server.login(user.id).expect("logging fixture user in");
            users.push((user, tok));
        }
        Fixture {
            server: server.shared(),
            users,
            alerts: AlertLog::new(),
        }
    }

    pub fn user(&self, i: usize) -> UserId {
        self.users[i].0.id
    }

    pub fn client(&self, i: usize) -> MockClient {
        MockClient::new(self.server.clone(), Some(self.users[i].1))
    }

    pub fn anonymous(&self) -> MockClient {
        MockClient::anonymous(self.server.clone())
    }

    pub fn notifier(&self) -> Rc<dyn Notifier> {
        Rc::new(self.alerts.clone())
    }
}

impl Default for Fixture {
    fn default() -> Fixture {
        Fixture::new()
    }
}

pub fn new_item(kind: ContentKind) -> ContentRef {
    ContentRef::new(kind, Uuid::new_v4())
}
