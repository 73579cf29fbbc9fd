//! Customer portal access: token exchange, case search, and per-case
//! bugzilla links.
//!
//! The [`Portal`] trait is the seam the pipeline talks to; [`PortalClient`]
//! is the blocking HTTP implementation.

pub mod auth;
pub mod cases;

use std::fmt;

use crate::Result;
use crate::config::Endpoints;
use crate::models::{BugReference, CaseRecord};

/// User-Agent header sent to the portal and Bugzilla.
pub(crate) const USER_AGENT: &str = concat!("telcotag/", env!("CARGO_PKG_VERSION"));

/// Short-lived bearer token obtained from the SSO endpoint.
///
/// Passed explicitly to every portal call; never cached across stages.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// Operations the pipeline needs from the customer portal.
pub trait Portal {
    /// Exchange the offline token for a fresh bearer token.
    fn access_token(&self, offline_token: &str) -> Result<BearerToken>;

    /// Run the fixed Telco case search, returning at most
    /// [`cases::MAX_CASES`] rows.
    fn search_cases(&self, token: &BearerToken) -> Result<Vec<CaseRecord>>;

    /// Bugzillas linked from one case.
    fn case_bugzillas(&self, token: &BearerToken, case_number: &str)
    -> Result<Vec<BugReference>>;
}

/// Blocking HTTP client for the customer portal and SSO.
#[derive(Clone)]
pub struct PortalClient {
    agent: ureq::Agent,
    endpoints: Endpoints,
}

impl PortalClient {
    pub fn new(endpoints: Endpoints) -> Self {
        let agent = ureq::AgentBuilder::new().user_agent(USER_AGENT).build();
        Self { agent, endpoints }
    }
}

impl Portal for PortalClient {
    fn access_token(&self, offline_token: &str) -> Result<BearerToken> {
        auth::exchange_offline_token(&self.agent, &self.endpoints.sso_token_url, offline_token)
    }

    fn search_cases(&self, token: &BearerToken) -> Result<Vec<CaseRecord>> {
        cases::search_cases(&self.agent, &self.endpoints.portal_base_url, token)
    }

    fn case_bugzillas(
        &self,
        token: &BearerToken,
        case_number: &str,
    ) -> Result<Vec<BugReference>> {
        cases::case_bugzillas(
            &self.agent,
            &self.endpoints.portal_base_url,
            token,
            case_number,
        )
    }
}
