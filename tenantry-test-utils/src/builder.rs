//! Declarative test builder for Phase 1 setup.
//!
//! `TestBuilder` queues tables and mock HTTP endpoints; everything is created
//! during the final `build()` call.

use mockito::Mock;
use sea_orm::{sea_query::TableCreateStatement, EntityTrait, Schema};

use crate::{constant::TEST_MAIL_PATH, error::TestError, TestContext};

/// Builder for declarative test initialization.
///
/// Methods can be chained together and finalized with `build()` to create a
/// complete [`TestContext`].
pub struct TestBuilder {
    tables: Vec<TableCreateStatement>,
    include_all_tables: bool,

    // Mock endpoints to create
    mock_builders: Vec<Box<dyn FnOnce(&mut mockito::ServerGuard) -> Mock>>,
    mail_endpoints: Vec<(usize, usize)>, // (status, expected_requests)
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestBuilder {
    /// Create an empty builder with no tables or mock endpoints configured.
    pub fn new() -> Self {
        Self {
            tables: Vec::new(),
            include_all_tables: false,
            mock_builders: Vec::new(),
            mail_endpoints: Vec::new(),
        }
    }

    /// Create every table of the schema, parents before children.
    ///
    /// Tables queued with [`TestBuilder::with_table`] are created afterwards, so
    /// do not combine both for the same entity.
    pub fn with_all_tables(mut self) -> Self {
        self.include_all_tables = true;
        self
    }

    /// Add a single entity table to the test database.
    ///
    /// Tables are created in the order they are added; SQLite enforces foreign
    /// keys so parent tables must be added first.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tenantry_test_utils::TestBuilder;
    /// use entity::prelude::*;
    ///
    /// # async fn example() -> Result<(), tenantry_test_utils::TestError> {
    /// let test = TestBuilder::new()
    ///     .with_table(AppUser)
    ///     .with_table(Notification)
    ///     .build()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        self.tables.push(schema.create_table_from_entity(entity));
        self
    }

    /// Add a mock mail API endpoint responding with `status`.
    ///
    /// The mock asserts it was called exactly `expected_requests` times when
    /// [`TestContext::assert_mocks`] runs.
    pub fn with_mail_endpoint(mut self, status: usize, expected_requests: usize) -> Self {
        self.mail_endpoints.push((status, expected_requests));
        self
    }

    /// Add a custom mock endpoint with full control over the mockito server.
    pub fn with_mock_endpoint<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut mockito::ServerGuard) -> Mock + 'static,
    {
        self.mock_builders.push(Box::new(setup));
        self
    }

    /// Build the test context by creating all configured tables and mock endpoints.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Fully initialized test context
    /// - `Err(TestError::DbErr)` - Table creation failed
    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut setup = TestContext::new().await?;

        let mut all_tables = Vec::new();
        if self.include_all_tables {
            all_tables.extend(all_table_statements());
        }
        all_tables.extend(self.tables);
        setup.with_tables(all_tables).await?;

        // Custom endpoints first so sequential matching on the same path works
        let mut mocks = Vec::new();
        for builder in self.mock_builders {
            mocks.push(builder(&mut setup.server));
        }

        for (status, expected) in self.mail_endpoints {
            mocks.push(
                setup
                    .server
                    .mock("POST", TEST_MAIL_PATH)
                    .with_status(status)
                    .with_header("content-type", "application/json")
                    .with_body(r#"{"id":"test-message"}"#)
                    .expect(expected)
                    .create(),
            );
        }

        setup.mocks = mocks;

        Ok(setup)
    }
}

/// CREATE TABLE statements for the full schema in foreign-key order.
fn all_table_statements() -> Vec<TableCreateStatement> {
    use entity::prelude::*;

    let schema = Schema::new(sea_orm::DbBackend::Sqlite);
    vec![
        schema.create_table_from_entity(AppUser),
        schema.create_table_from_entity(LoginCode),
        schema.create_table_from_entity(Property),
        schema.create_table_from_entity(Unit),
        schema.create_table_from_entity(Lease),
        schema.create_table_from_entity(LeaseTenant),
        schema.create_table_from_entity(RentPayment),
        schema.create_table_from_entity(MaintenanceRequest),
        schema.create_table_from_entity(MaintenanceComment),
        schema.create_table_from_entity(Document),
        schema.create_table_from_entity(DocumentVersion),
        schema.create_table_from_entity(Notification),
        schema.create_table_from_entity(Invitation),
        schema.create_table_from_entity(Expense),
    ]
}
