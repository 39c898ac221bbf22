//! Shared test harness for the tenantry workspace.
//!
//! Tests are written in two phases. Phase 1 configures the environment with
//! [`TestBuilder`] (tables, mock HTTP endpoints). Phase 2 runs against the
//! resulting [`TestContext`], inserting rows through the fixture helpers
//! (`test.user()`, `test.property()`, `test.lease()`, ...).

pub mod builder;
pub mod constant;
pub mod context;
pub mod error;
pub mod fixtures;
pub mod model;
pub mod redis;

pub use builder::TestBuilder;
pub use context::TestContext;
pub use error::TestError;

pub mod prelude {
    pub use crate::{
        fixtures::factory, model::*, redis::RedisTest, TestBuilder, TestContext, TestError,
    };
}
