//! Searches over the newest-first, page-at-a-time release listing.
//!
//! The registry offers no lookup by version or by date, only ordered pages.
//! Both searches walk pages from the first one until the page that must hold
//! the answer, then binary-search inside that page. Pages are assumed to be
//! contiguous, non-overlapping, and ordered by creation time, with version
//! numbers increasing together with creation time.

use std::cmp::Ordering;

use tracing::debug;

use crate::error::{ResolveError, Result};
use crate::registry::{Release, ReleasePage, ReleasePages};
use crate::version::{CoreVersion, Precision};

const FIRST_PAGE: u32 = 1;

/// Cursor over the release listing holding only the current page.
pub struct ReleasePager<'a, P: ReleasePages + ?Sized> {
    pages: &'a P,
    page: u32,
    current: ReleasePage,
}

impl<'a, P: ReleasePages + ?Sized> ReleasePager<'a, P> {
    pub async fn start(pages: &'a P) -> Result<Self> {
        let current = pages.list_releases(FIRST_PAGE).await?;
        debug!(
            "Fetched release page {} ({} releases)",
            FIRST_PAGE,
            current.releases.len()
        );
        Ok(Self {
            pages,
            page: FIRST_PAGE,
            current,
        })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn releases(&self) -> &[Release] {
        &self.current.releases
    }

    /// Move to the next page. Returns `false` when already on the last page.
    pub async fn advance(&mut self) -> Result<bool> {
        let Some(next) = self.current.next_page else {
            return Ok(false);
        };
        self.current = self.pages.list_releases(next).await?;
        self.page = next;
        debug!(
            "Fetched release page {} ({} releases)",
            next,
            self.current.releases.len()
        );
        Ok(true)
    }

    fn versions(&self) -> Result<Vec<CoreVersion>> {
        self.current
            .releases
            .iter()
            .map(|release| CoreVersion::from_tag(release.name()))
            .collect()
    }
}

/// Find the highest release equal to `desired` at `precision`.
pub async fn find_highest_release<P: ReleasePages + ?Sized>(
    pages: &P,
    desired: &CoreVersion,
    precision: Precision,
) -> Result<Release> {
    let not_found = || ResolveError::VersionNotFound {
        requested: desired.prefix(precision),
        precision,
    };

    let mut pager = ReleasePager::start(pages).await?;
    loop {
        let versions = pager.versions()?;
        if let Some(oldest) = versions.last() {
            if desired.is_higher_or_equal(oldest, precision) {
                // first release that is not newer than the desired version
                let index = versions.partition_point(|version| {
                    version.compare(desired, precision) == Ordering::Greater
                });
                debug!(
                    "Version {} (on {}) brackets page {}, candidate index {}",
                    desired.prefix(precision),
                    precision,
                    pager.page(),
                    index
                );
                return match versions.get(index) {
                    Some(found) if found.matches(desired, precision) => {
                        Ok(pager.releases()[index].clone())
                    }
                    _ => Err(not_found()),
                };
            }
        }

        if !pager.advance().await? {
            return Err(not_found());
        }
    }
}

/// Find the release created immediately before `pointer`.
pub async fn find_previous_release<P: ReleasePages + ?Sized>(
    pages: &P,
    pointer: &Release,
) -> Result<Release> {
    let pointer_time = pointer.created_at();
    let not_found = || ResolveError::ReleaseNotFound {
        tag: pointer.tag_name().to_string(),
    };

    let mut pager = ReleasePager::start(pages).await?;
    loop {
        let brackets = pager
            .releases()
            .last()
            .is_some_and(|oldest| oldest.created_at() <= pointer_time);
        if brackets {
            break;
        }
        if !pager.advance().await? {
            return Err(not_found());
        }
    }

    let releases = pager.releases();
    let start = releases.partition_point(|release| release.created_at() > pointer_time);
    let index = releases[start..]
        .iter()
        .take_while(|release| release.created_at() == pointer_time)
        .position(|release| release.tag_name() == pointer.tag_name())
        .map(|offset| start + offset)
        .ok_or_else(not_found)?;
    debug!(
        "Located {} on page {} at index {}",
        pointer.tag_name(),
        pager.page(),
        index
    );

    if let Some(previous) = releases.get(index + 1) {
        return Ok(previous.clone());
    }

    let no_previous = || ResolveError::NoPreviousRelease {
        tag: pointer.tag_name().to_string(),
    };
    if !pager.advance().await? {
        return Err(no_previous());
    }
    pager.releases().first().cloned().ok_or_else(no_previous)
}
