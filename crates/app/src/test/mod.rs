//! Test Utilities


pub(crate) use context::TestContext;
