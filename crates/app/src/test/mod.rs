//! Test support for service-level integration tests.

mod db;

pub(crate) use context::TestContext;
