//! Common test utilities for telcotag integration tests.
//!
//! Provides `TestEnv`, which runs a mock server standing in for SSO, the
//! customer portal, and Bugzilla, and builds `telcotag` commands pointed at
//! it.

#![allow(dead_code)]

use assert_cmd::Command;
use httpmock::prelude::*;
use httpmock::Mock;
use serde_json::{Value, json};

pub const OFFLINE_TOKEN: &str = "offline-abc";
pub const BEARER_TOKEN: &str = "bearer-xyz";
pub const BZ_KEY: &str = "bz-key";

/// A test environment backed by a single mock HTTP server.
pub struct TestEnv {
    pub server: MockServer,
}

impl TestEnv {
    /// Start a mock server.
    pub fn new() -> Self {
        Self {
            server: MockServer::start(),
        }
    }

    /// Get a Command for the telcotag binary with every endpoint pointed at
    /// the mock server and credentials passed via environment variables.
    pub fn telcotag(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_telcotag"));
        cmd.env("TELCOTAG_OFFLINE_TOKEN", OFFLINE_TOKEN);
        cmd.env("TELCOTAG_BZ_KEY", BZ_KEY);
        cmd.env("TELCOTAG_SSO_URL", self.server.url("/token"));
        cmd.env("TELCOTAG_PORTAL_URL", self.server.base_url());
        cmd.env("TELCOTAG_BUGZILLA_URL", self.server.base_url());
        cmd.env("RUST_LOG", "info");
        cmd.env_remove("NO_COLOR");
        cmd
    }

    /// Mock the SSO token exchange.
    pub fn mock_token(&self) -> Mock<'_> {
        self.server.mock(|when, then| {
            when.method(POST)
                .path("/token")
                .body_includes("grant_type=refresh_token")
                .body_includes(format!("refresh_token={}", OFFLINE_TOKEN));
            then.status(200)
                .json_body(json!({"access_token": BEARER_TOKEN, "token_type": "Bearer"}));
        })
    }

    /// Mock the case search with the given docs.
    pub fn mock_search(&self, docs: Value) -> Mock<'_> {
        self.server.mock(|when, then| {
            when.method(GET)
                .path("/hydra/rest/search/cases")
                .header("authorization", format!("Bearer {}", BEARER_TOKEN))
                .query_param("rows", "5000");
            then.status(200)
                .json_body(json!({"response": {"docs": docs}}));
        })
    }

    /// Mock the bugzilla links of one case.
    pub fn mock_case(&self, case_number: &str, bugzillas: &[&str]) -> Mock<'_> {
        let links: Vec<Value> = bugzillas
            .iter()
            .map(|number| json!({"bugzillaNumber": number}))
            .collect();
        self.server.mock(|when, then| {
            when.method(GET)
                .path(format!("/hydra/rest/v1/cases/{}", case_number))
                .header("authorization", format!("Bearer {}", BEARER_TOKEN));
            then.status(200)
                .json_body(json!({"caseNumber": case_number, "bugzillas": links}));
        })
    }

    /// Mock a Bugzilla bug lookup.
    pub fn mock_bug(&self, id: u64, whiteboard: &str) -> Mock<'_> {
        self.server.mock(|when, then| {
            when.method(GET)
                .path(format!("/rest/bug/{}", id))
                .header("x-bugzilla-api-key", BZ_KEY);
            then.status(200).json_body(json!({
                "bugs": [{"id": id, "cf_internal_whiteboard": whiteboard}]
            }));
        })
    }

    /// Mock a Bugzilla update that must carry the given whiteboard.
    pub fn mock_update(&self, id: u64, whiteboard: &str) -> Mock<'_> {
        let field = format!(r#""cf_internal_whiteboard":"{}""#, whiteboard);
        self.server.mock(|when, then| {
            when.method(PUT)
                .path(format!("/rest/bug/{}", id))
                .header("x-bugzilla-api-key", BZ_KEY)
                .body_includes(field);
            then.status(200)
                .json_body(json!({"bugs": [{"id": id, "changes": {}}]}));
        })
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
