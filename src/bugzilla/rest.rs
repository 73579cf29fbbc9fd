//! Bugzilla REST API client (`/rest/bug`).

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::{Bug, BugTracker, BugUpdate, INTERNAL_WHITEBOARD};
use crate::http::{decode_json, request_error};
use crate::portal::USER_AGENT;
use crate::{Error, Result};

/// Header carrying the Bugzilla API key.
const API_KEY_HEADER: &str = "X-BUGZILLA-API-KEY";

/// Bugzilla's wire name for the internal whiteboard.
const WIRE_INTERNAL_WHITEBOARD: &str = "cf_internal_whiteboard";

#[derive(Debug, Deserialize)]
struct BugsResponse {
    bugs: Vec<RestBug>,
}

#[derive(Debug, Deserialize)]
struct RestBug {
    id: u64,
    #[serde(default)]
    cf_internal_whiteboard: Option<String>,
}

impl From<RestBug> for Bug {
    fn from(bug: RestBug) -> Self {
        Self {
            id: bug.id,
            internal_whiteboard: bug.cf_internal_whiteboard.unwrap_or_default(),
        }
    }
}

/// Blocking Bugzilla client authenticated with an API key.
#[derive(Clone)]
pub struct RestBugzilla {
    agent: ureq::Agent,
    base_url: String,
    api_key: String,
}

impl RestBugzilla {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().user_agent(USER_AGENT).build(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn bug_url(&self, id: &str) -> String {
        format!("{}/rest/bug/{}", self.base_url, id)
    }
}

/// Map a logical field name to the name Bugzilla expects on the wire.
fn wire_field(field: &str) -> &str {
    match field {
        INTERNAL_WHITEBOARD => WIRE_INTERNAL_WHITEBOARD,
        other => other,
    }
}

impl BugTracker for RestBugzilla {
    fn get_bug(&self, id: &str) -> Result<Bug> {
        debug!(bug = id, "fetching bugzilla");
        let operation = format!("bugzilla {} lookup", id);

        let resp = self
            .agent
            .get(&self.bug_url(id))
            .set("Accept", "application/json")
            .set(API_KEY_HEADER, &self.api_key)
            .query("include_fields", "id,cf_internal_whiteboard")
            .call()
            .map_err(|e| request_error(&operation, e))?;

        let body: BugsResponse = decode_json(&operation, resp)?;
        body.bugs
            .into_iter()
            .next()
            .map(Bug::from)
            .ok_or_else(|| Error::NotFound(format!("bugzilla {}", id)))
    }

    fn update_bugs(&self, ids: &[u64], update: &BugUpdate) -> Result<()> {
        let Some(first) = ids.first() else {
            return Ok(());
        };

        let mut payload = Map::new();
        payload.insert("ids".to_string(), Value::from(ids.to_vec()));
        for (field, value) in update.fields() {
            payload.insert(wire_field(field).to_string(), Value::from(value));
        }

        debug!(?ids, "updating bugzilla");
        let operation = format!("bugzilla {} update", first);
        self.agent
            .put(&self.bug_url(&first.to_string()))
            .set("Accept", "application/json")
            .set(API_KEY_HEADER, &self.api_key)
            .send_json(Value::Object(payload))
            .map_err(|e| request_error(&operation, e))?;
        Ok(())
    }
}
