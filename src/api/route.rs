// ABOUTME: Path parsing for the container endpoints.
// ABOUTME: Handles the optional version prefix and names containing slashes.

use crate::dispatch::Action;
use crate::types::ContainerRef;

/// A recognised container path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/containers/`
    Collection,
    /// `/containers/{name}/{action}`
    Container {
        reference: ContainerRef,
        action: Action,
    },
}

/// Parse a raw (still percent-encoded) request path.
///
/// The container name is everything between `/containers/` and the last
/// `/`, so references such as `project/web` survive as long as the action is
/// the final segment. Returns `None` for anything that is not a container
/// route.
pub fn parse_route(path: &str) -> Option<Route> {
    let path = strip_version(path);
    let rest = path.strip_prefix("/containers/")?;

    if rest.is_empty() {
        return Some(Route::Collection);
    }

    let (raw_name, segment) = rest.rsplit_once('/')?;
    let action = Action::from_segment(segment)?;
    let reference = ContainerRef::from_encoded(raw_name).ok()?;

    Some(Route::Container { reference, action })
}

/// Drop a leading `/v1.24`-style API version segment, if present.
fn strip_version(path: &str) -> &str {
    let Some(after_slash) = path.strip_prefix('/') else {
        return path;
    };
    let (segment, tail) = match after_slash.find('/') {
        Some(pos) => after_slash.split_at(pos),
        None => return path,
    };

    if is_version_segment(segment) {
        tail
    } else {
        path
    }
}

fn is_version_segment(segment: &str) -> bool {
    let Some(version) = segment.strip_prefix('v') else {
        return false;
    };
    let mut parts = version.split('.');
    let major_ok = parts
        .next()
        .is_some_and(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()));
    let minor_ok = parts
        .next()
        .map_or(true, |p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()));
    major_ok && minor_ok && parts.next().is_none()
}
