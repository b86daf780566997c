//! Version resolution
//!
//! Maps a loosely specified request ("latest", "1.9", "1.9.1") to a concrete
//! version advertised by the provider. Both lists are assumed to be sorted
//! by the provider, most recent first; the first qualifying entry always
//! wins and nothing here re-sorts them.
//!
//! Node versions are additionally capped by the control plane: a request
//! above the current master version never resolves.

use std::cmp::Ordering;

use tracing::{debug, info};

use crate::error::{CoreError, Result};

/// Request keyword meaning "most recent"
pub const LATEST: &str = "latest";

/// Segment count above which a version string is rejected
const MAX_SEGMENTS: usize = 4;

/// Components compared by the master ceiling check (major, minor, patch, build)
const CEILING_COMPONENTS: usize = MAX_SEGMENTS;

/// Resolve a master version request against `valid_master_versions`
///
/// `"latest"` returns the first entry. Any other request is matched as a
/// raw textual prefix, so `"1.9"` selects `"1.9.2-gke.1"`.
pub fn resolve_master_series(requested: &str, valid_master_versions: &[String]) -> Result<String> {
    if requested == LATEST {
        return valid_master_versions
            .first()
            .cloned()
            .ok_or_else(|| CoreError::version_not_found(requested, "no valid master versions"));
    }

    valid_master_versions
        .iter()
        .find(|v| v.starts_with(requested))
        .cloned()
        .ok_or_else(|| CoreError::version_not_found(requested, "no valid master version in series"))
}

/// Resolve a node version request against `valid_node_versions`, capped by `master_version`
///
/// `"latest"` tracks the master and returns `master_version` unchanged.
pub fn resolve_node_series(
    requested: &str,
    valid_node_versions: &[String],
    master_version: &str,
) -> Result<String> {
    if requested == LATEST {
        return Ok(master_version.to_string());
    }

    info!(
        master_version,
        requested_version = requested,
        "Determining if requested version is valid"
    );

    let requested_segments = parse_segments(requested)?;
    let master_segments = parse_segments(master_version)?;

    if exceeds_master(&requested_segments, &master_segments, requested, master_version)? {
        info!(
            requested_version = requested,
            master_version, "Requested version is greater than the current master version"
        );
        return Err(CoreError::version_not_found(
            requested,
            format!("exceeds current master version {master_version}"),
        ));
    }

    for candidate in valid_node_versions {
        let candidate_segments = parse_segments(candidate)?;
        let matches = requested_segments
            .iter()
            .enumerate()
            .all(|(i, segment)| candidate_segments.get(i) == Some(segment));

        debug!(
            valid_node_version = %candidate,
            requested_version = requested,
            matches,
            "Comparing valid node version against requested version"
        );

        if matches && exceeds_master(&candidate_segments, &master_segments, candidate, master_version)? {
            debug!(
                valid_node_version = %candidate,
                master_version, "Skipping valid node version newer than the master"
            );
            continue;
        }

        if matches {
            info!(valid_version = %candidate, "Found valid version");
            return Ok(candidate.clone());
        }
    }

    Err(CoreError::version_not_found(
        requested,
        "no valid node version in series",
    ))
}

/// Split a version into dotted segments with the patch suffix removed
///
/// `"1.9.2-gke.1"` becomes `["1", "9", "2", "1"]`; anything longer than
/// four segments is malformed.
fn parse_segments(version: &str) -> Result<Vec<&str>> {
    let mut segments: Vec<&str> = version.split('.').collect();

    if let Some(&patch) = segments.get(2)
        && let Some((number, _suffix)) = patch.split_once('-')
    {
        segments[2] = number;
    }

    if segments.len() > MAX_SEGMENTS {
        return Err(CoreError::malformed(version));
    }

    Ok(segments)
}

/// Numeric, component-wise comparison of major/minor/patch and build
///
/// Only the components present in the request are compared, so "1.9"
/// never exceeds a "1.9.x" master. The build number after the patch suffix
/// counts too: "1.9.2-gke.3" exceeds a "1.9.2-gke.1" master.
fn exceeds_master(
    requested: &[&str],
    master: &[&str],
    raw_requested: &str,
    raw_master: &str,
) -> Result<bool> {
    for (i, segment) in requested.iter().take(CEILING_COMPONENTS).enumerate() {
        let wanted = parse_component(segment, raw_requested)?;
        let Some(master_segment) = master.get(i) else {
            break;
        };
        let current = parse_component(master_segment, raw_master)?;

        match wanted.cmp(&current) {
            Ordering::Greater => return Ok(true),
            Ordering::Less => return Ok(false),
            Ordering::Equal => continue,
        }
    }

    Ok(false)
}

fn parse_component(segment: &str, raw: &str) -> Result<u64> {
    segment.parse().map_err(|_| CoreError::malformed(raw))
}
