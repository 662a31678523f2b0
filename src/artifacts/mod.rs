//! Session artifact download fan-out
//!
//! For a project, every session is listed; for every (session, category)
//! pair the session's artifacts of that category are listed; every artifact
//! is then written to
//! `<root>/<sessionId>/<browser>-<browserVersion>-<platform>/<category>/<filename>`.
//!
//! ```text
//! sessions (paged) ──┬─ (s1, VIDEO) ─ artifacts (paged) ─┬─ download
//!                    │                                   └─ download
//!                    ├─ (s1, LOG)   ─ artifacts (paged) ─── download
//!                    └─ (s2, VIDEO) ─ ...
//! ```
//!
//! Every branch starts as soon as the page that produced it arrives and runs
//! concurrently with its siblings and with the listing still in progress.
//! There is no concurrency limit. The first failure anywhere ends the whole
//! operation with that error; branches still in flight are dropped.

mod fetch;

pub use fetch::{ContentFetcher, HttpFetcher};

use futures::stream::{FuturesUnordered, StreamExt, TryStreamExt};
use futures::Stream;
use std::future::Future;
use std::path::PathBuf;
use std::pin::pin;

use crate::catalog::{Catalog, ListArtifactsRequest, ListSessionsRequest};
use crate::error::{Error, Result};
use crate::pagination::{Page, paginate};
use crate::types::{Arn, Artifact, ArtifactCategory, DownloadTarget, Session, expand_categories};

/// Downloads the artifacts of a project's sessions into a local folder
pub struct ArtifactDownloader<'a> {
    catalog: &'a dyn Catalog,
    fetcher: &'a dyn ContentFetcher,
    root: PathBuf,
}

impl<'a> ArtifactDownloader<'a> {
    /// Create a downloader writing under `root`
    pub fn new(
        catalog: &'a dyn Catalog,
        fetcher: &'a dyn ContentFetcher,
        root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            catalog,
            fetcher,
            root: root.into(),
        }
    }

    /// Download every artifact of the requested types for every session of
    /// `project`
    ///
    /// `artifact_types` of exactly `["ALL"]` means every known category; other
    /// values are sent to the catalog as given. Returns the number of files
    /// written.
    pub async fn download<S: AsRef<str>>(&self, project: &Arn, artifact_types: &[S]) -> Result<usize> {
        let categories = expand_categories(artifact_types);
        let categories = &categories;

        let branches = paginate(ListSessionsRequest::for_project(project.clone()), |request| {
            self.catalog.list_sessions(request)
        })
        .map_ok(move |page| {
            page.into_items()
                .into_iter()
                .flat_map(|session| {
                    categories
                        .iter()
                        .map(move |category| (session.clone(), category.clone()))
                })
                .collect::<Vec<_>>()
        });

        let written = join_fan_out(branches, |(session, category)| {
            self.download_category(session, category)
        })
        .await?;

        tracing::debug!(project = %project, files = written, "artifact download finished");
        Ok(written)
    }

    /// List and download the `category` artifacts of one session
    async fn download_category(&self, session: Session, category: ArtifactCategory) -> Result<usize> {
        let session_id = session.arn.session_id()?;
        tracing::info!("Listing artifacts of type {category} for session id {session_id}...");

        let request = ListArtifactsRequest::for_session(session.arn.clone(), category.clone());
        let artifacts = paginate(request, |request| {
            self.catalog.list_session_artifacts(request)
        })
        .map_ok(Page::into_items);

        let session = &session;
        let category = &category;
        join_fan_out(artifacts, move |artifact| {
            self.download_artifact(session, session_id, category, artifact)
        })
        .await
    }

    /// Write one artifact to its target path, replacing any existing file
    async fn download_artifact(
        &self,
        session: &Session,
        session_id: &str,
        requested: &ArtifactCategory,
        artifact: Artifact,
    ) -> Result<usize> {
        let properties = session.properties()?;
        // The folder is named after the type the catalog reports for the file
        let category = artifact.kind.as_deref().unwrap_or(requested.as_str());
        let target = DownloadTarget::new(
            &self.root,
            session_id,
            &properties,
            category,
            &artifact.filename,
        );

        tokio::fs::create_dir_all(&target.dir)
            .await
            .map_err(|e| Error::io_at(&target.dir, e))?;

        let content = self.fetcher.fetch(&artifact.url).await?;

        tracing::info!("Downloading {}...", target.path.display());
        tokio::fs::write(&target.path, &content)
            .await
            .map_err(|e| Error::io_at(&target.path, e))?;

        tracing::debug!(path = %target.path.display(), bytes = content.len(), "artifact written");
        Ok(1)
    }
}

/// Convenience wrapper around [`ArtifactDownloader::download`]
pub async fn download_artifacts<S: AsRef<str>>(
    catalog: &dyn Catalog,
    fetcher: &dyn ContentFetcher,
    project: &Arn,
    artifact_types: &[S],
    root: impl Into<PathBuf>,
) -> Result<usize> {
    ArtifactDownloader::new(catalog, fetcher, root)
        .download(project, artifact_types)
        .await
}

/// Start a branch for every item of every listed page and wait for all of them
///
/// Listing continues while branches run. Returns the sum of the branch
/// results, or the first error from either the listing or a branch; remaining
/// branches are dropped at that point.
async fn join_fan_out<L, T, F, Fut>(listing: L, mut start: F) -> Result<usize>
where
    L: Stream<Item = Result<Vec<T>>>,
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Result<usize>>,
{
    let mut listing = pin!(listing);
    let mut running = FuturesUnordered::new();
    let mut listing_done = false;
    let mut total = 0;

    loop {
        tokio::select! {
            page = listing.next(), if !listing_done => match page {
                Some(items) => running.extend(items?.into_iter().map(&mut start)),
                None => listing_done = true,
            },
            Some(done) = running.next(), if !running.is_empty() => total += done?,
            else => break,
        }
    }

    Ok(total)
}
