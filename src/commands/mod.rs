//! The telcotag pipeline.
//!
//! Stages run strictly in order:
//! - `fetch_cases` - authenticate and run the Telco case search
//! - `find_untagged_bugs` - re-authenticate, resolve each open case's
//!   bugzillas, and keep the ones missing the `Telco` whiteboard tag
//! - `tag_bugs` - prepend `Telco ` to each untagged bug (only with `--modify`)
//!
//! Any error aborts the run; nothing is retried or checkpointed.

use serde::Serialize;
use std::io::Write;
use std::time::Instant;
use tracing::{debug, info};

use crate::Result;
use crate::bugzilla::{BugTracker, INTERNAL_WHITEBOARD};
use crate::config::{OutputFormat, Settings};
use crate::models::{BugReference, CaseMap, TELCO_TAG, has_telco_tag, with_telco_tag};
use crate::portal::Portal;
use crate::progress;

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

/// Bugzillas whose internal whiteboard lacks the `Telco` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UntaggedReport {
    pub untagged_bugs: Vec<u64>,
}

impl Output for UntaggedReport {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        format!("Untagged Bugzillas: {:?}", self.untagged_bugs)
    }
}

/// Number of bugzillas updated with the `Telco` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagReport {
    pub tagged: usize,
}

impl Output for TagReport {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        format!("Tagged {} bugzilla(s) with '{}'", self.tagged, TELCO_TAG)
    }
}

/// Outcome of a full run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Cases returned by the search
    pub cases: usize,
    pub untagged_bugs: Vec<u64>,
    /// Bugs updated; zero on a dry run
    pub tagged: usize,
}

/// Write one report line in the requested format.
pub fn write_output<W: Write, T: Output + ?Sized>(
    out: &mut W,
    result: &T,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Human => writeln!(out, "{}", result.to_human())?,
        OutputFormat::Json => writeln!(out, "{}", result.to_json())?,
    }
    out.flush()?;
    Ok(())
}

/// Run the whole pipeline, writing the untagged report to `out` as soon as it
/// is known and, with `--modify`, the tag report after tagging.
pub fn run<P, T, W>(
    settings: &Settings,
    portal: &P,
    tracker: &T,
    out: &mut W,
) -> Result<RunSummary>
where
    P: Portal + ?Sized,
    T: BugTracker + ?Sized,
    W: Write,
{
    let cases = fetch_cases(portal, &settings.offline_token)?;
    let untagged_bugs = find_untagged_bugs(&cases, portal, tracker, &settings.offline_token)?;

    let report = UntaggedReport {
        untagged_bugs: untagged_bugs.clone(),
    };
    write_output(out, &report, settings.output_format)?;

    let tagged = if settings.modify {
        let tagged = tag_bugs(tracker, &untagged_bugs)?;
        write_output(out, &TagReport { tagged }, settings.output_format)?;
        tagged
    } else {
        info!("dry run; pass --modify to add '{} ' to these bugzillas", TELCO_TAG);
        0
    };

    Ok(RunSummary {
        cases: cases.len(),
        untagged_bugs,
        tagged,
    })
}

/// Get relevant cases from the customer portal.
pub fn fetch_cases<P: Portal + ?Sized>(portal: &P, offline_token: &str) -> Result<CaseMap> {
    let token = portal.access_token(offline_token)?;

    info!("searching the portal for cases");
    let start = Instant::now();
    let records = portal.search_cases(&token)?;
    let elapsed = start.elapsed();

    info!(
        "found {} cases in {:.3} seconds",
        records.len(),
        elapsed.as_secs_f64()
    );
    Ok(CaseMap::from_records(records))
}

/// Get the bugzillas of open cases that haven't been tagged with `Telco`.
///
/// Ids are returned in case order, then link order. A bug linked from
/// several cases appears once per case.
pub fn find_untagged_bugs<P, T>(
    cases: &CaseMap,
    portal: &P,
    tracker: &T,
    offline_token: &str,
) -> Result<Vec<u64>>
where
    P: Portal + ?Sized,
    T: BugTracker + ?Sized,
{
    // Fresh token; the search token may have expired by now.
    let token = portal.access_token(offline_token)?;

    info!("getting all bugzillas");
    let open: Vec<_> = cases.needing_resolution().collect();
    let pb = progress::bar(open.len(), "cases");
    let mut references: Vec<BugReference> = Vec::new();
    for case in open {
        debug!(case = %case.case_number, status = %case.status, "resolving case");
        references.extend(portal.case_bugzillas(&token, &case.case_number)?);
        pb.inc(1);
    }
    pb.finish_and_clear();

    info!("getting untagged bugs via bugzilla API");
    let pb = progress::bar(references.len(), "bugzillas");
    let mut untagged = Vec::new();
    for reference in &references {
        let bug = tracker.get_bug(&reference.bugzilla_number)?;
        if !has_telco_tag(&bug.internal_whiteboard) {
            debug!(
                bug = bug.id,
                case = %reference.case_number,
                whiteboard = %bug.internal_whiteboard,
                "bugzilla is untagged"
            );
            untagged.push(bug.id);
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(untagged)
}

/// Add `Telco ` to the internal whiteboard of each bug, one update per bug.
///
/// Each bug is re-fetched so the prepend applies to its current whiteboard.
/// The first failure stops the batch; earlier updates stay applied.
pub fn tag_bugs<T: BugTracker + ?Sized>(tracker: &T, untagged: &[u64]) -> Result<usize> {
    info!("adding '{} ' to internal whiteboard of untagged bugs", TELCO_TAG);
    let pb = progress::bar(untagged.len(), "tagging");
    let mut tagged = 0;
    for id in untagged {
        let bug = tracker.get_bug(&id.to_string())?;
        let update =
            tracker.build_update(INTERNAL_WHITEBOARD, with_telco_tag(&bug.internal_whiteboard));
        tracker.update_bugs(&[bug.id], &update)?;
        debug!(bug = bug.id, "tagged bugzilla");
        tagged += 1;
        pb.inc(1);
    }
    pb.finish_and_clear();
    Ok(tagged)
}
