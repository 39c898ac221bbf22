//! Test context returned by [`TestBuilder`](crate::TestBuilder).
//!
//! The context holds an in-memory SQLite database, an in-memory session and a
//! mockito server standing in for the mail API.

use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};

use mockito::{Mock, Server, ServerGuard};
use sea_orm::{sea_query::TableCreateStatement, ConnectionTrait, Database, DatabaseConnection};
use tower_sessions::{MemoryStore, Session};

use crate::{
    constant::{TEST_APP_URL, TEST_MAIL_FROM, TEST_MAIL_PATH},
    error::TestError,
};

/// Test environment produced by `TestBuilder::build()`.
///
/// ```ignore
/// let test = TestBuilder::new().with_all_tables().build().await?;
///
/// let landlord = test.user().insert_landlord().await?;
/// let property = test.property().insert_property(landlord.id).await?;
///
/// test.assert_mocks();
/// ```
pub struct TestContext {
    /// Connection to the in-memory SQLite database
    pub db: DatabaseConnection,
    /// Session backed by a `MemoryStore`
    pub session: Session,

    pub(crate) server: ServerGuard,
    pub(crate) mocks: Vec<Mock>,
    sequence: AtomicU32,
}

impl TestContext {
    pub(crate) async fn new() -> Result<Self, TestError> {
        let server = Server::new_async().await;

        let store = Arc::new(MemoryStore::default());
        let session = Session::new(None, store, None);

        let db = Database::connect("sqlite::memory:").await?;

        Ok(TestContext {
            db,
            session,
            server,
            mocks: Vec::new(),
            sequence: AtomicU32::new(1),
        })
    }

    pub(crate) async fn with_tables(
        &self,
        stmts: Vec<TableCreateStatement>,
    ) -> Result<(), TestError> {
        for stmt in stmts {
            self.db.execute(&stmt).await?;
        }

        Ok(())
    }

    /// Next value of a per-context counter, used to keep fixture values unique.
    pub fn next_sequence(&self) -> u32 {
        self.sequence.fetch_add(1, Ordering::Relaxed)
    }

    /// URL of the mock mail API endpoint.
    pub fn mail_api_url(&self) -> String {
        format!("{}{}", self.server.url(), TEST_MAIL_PATH)
    }

    /// Public base URL used for links in e-mails.
    pub fn app_url(&self) -> String {
        TEST_APP_URL.to_string()
    }

    /// Sender address for test e-mails.
    pub fn mail_from(&self) -> String {
        TEST_MAIL_FROM.to_string()
    }

    /// Assert every mock endpoint was called the expected number of times.
    ///
    /// # Panics
    /// Panics if any mock endpoint was not called as expected
    pub fn assert_mocks(&self) {
        for mock in &self.mocks {
            mock.assert();
        }
    }
}
