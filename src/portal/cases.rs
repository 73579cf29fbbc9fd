//! Case search and per-case bugzilla lookups on the customer portal.

use serde::Deserialize;
use tracing::debug;

use super::BearerToken;
use crate::Result;
use crate::http::{decode_json, request_error};
use crate::models::{BugReference, CaseRecord, required_id};

/// Search expression selecting Telco-related cases.
pub const CASE_QUERY: &str =
    "(case_summary:*webscale* OR case_tags:*shift_telco5g* OR case_tags:*cnv*case)";

/// Fields requested from the case search.
pub const CASE_FIELDS: &[&str] = &["case_number", "case_status", "case_bugzillaNumber"];

/// Row cap for the case search. Cases beyond it are dropped.
pub const MAX_CASES: usize = 5000;

const SEARCH_PATH: &str = "/hydra/rest/search/cases";
const CASE_PATH: &str = "/hydra/rest/v1/cases";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    response: SearchDocs,
}

#[derive(Debug, Deserialize)]
struct SearchDocs {
    docs: Vec<CaseRecord>,
}

#[derive(Debug, Deserialize)]
struct CaseDetail {
    bugzillas: Vec<BugzillaLink>,
}

#[derive(Debug, Deserialize)]
struct BugzillaLink {
    #[serde(rename = "bugzillaNumber", deserialize_with = "required_id")]
    bugzilla_number: String,
}

/// Run the Telco case search.
pub fn search_cases(
    agent: &ureq::Agent,
    portal_base_url: &str,
    token: &BearerToken,
) -> Result<Vec<CaseRecord>> {
    let url = format!("{}{}", portal_base_url, SEARCH_PATH);
    let rows = MAX_CASES.to_string();
    let fields = CASE_FIELDS.join(",");

    let resp = agent
        .get(&url)
        .set("Accept", "application/json")
        .set("Authorization", &token.header_value())
        .query("q", CASE_QUERY)
        .query("partnerSearch", "false")
        .query("rows", &rows)
        .query("fl", &fields)
        .call()
        .map_err(|e| request_error("case search", e))?;

    let body: SearchResponse = decode_json("case search", resp)?;
    Ok(body.response.docs)
}

/// Fetch the bugzillas linked from a single case.
pub fn case_bugzillas(
    agent: &ureq::Agent,
    portal_base_url: &str,
    token: &BearerToken,
    case_number: &str,
) -> Result<Vec<BugReference>> {
    let url = format!("{}{}/{}", portal_base_url, CASE_PATH, case_number);
    debug!(case = case_number, "fetching case bugzillas");

    let resp = agent
        .get(&url)
        .set("Accept", "application/json")
        .set("Authorization", &token.header_value())
        .call()
        .map_err(|e| request_error(&format!("case {} lookup", case_number), e))?;

    let detail: CaseDetail = decode_json(&format!("case {} lookup", case_number), resp)?;
    Ok(detail
        .bugzillas
        .into_iter()
        .map(|link| BugReference {
            case_number: case_number.to_string(),
            bugzilla_number: link.bugzilla_number,
        })
        .collect())
}
