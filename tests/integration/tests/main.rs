//! End-to-end integration tests.
//!
//! These tests drive the session store, interceptor and route guard over the
//! real HTTP transport against the in-process backend stub.

mod interceptor;
mod resources;
