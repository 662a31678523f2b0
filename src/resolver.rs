//! Project resolution: pass through an ARN, find a project by name, or create it

use futures::TryStreamExt;
use std::pin::pin;

use crate::catalog::{Catalog, CreateProjectRequest, ListProjectsRequest};
use crate::error::Result;
use crate::pagination::{Page, paginate};
use crate::types::Arn;

/// Resolve a project input to a project ARN
///
/// - An input that already starts with `arn:` is returned as-is without any
///   remote call; it is not checked for existence.
/// - Otherwise projects are paged through until one whose name equals the
///   input exactly is found. Paging stops there; with duplicate names the
///   first one listed wins.
/// - When no project matches, exactly one project is created with the input
///   as its name.
///
/// Remote failures are returned unchanged.
pub async fn resolve_project(catalog: &dyn Catalog, identifier: &str) -> Result<Arn> {
    if Arn::is_qualified(identifier) {
        tracing::debug!(arn = identifier, "project ARN supplied, no lookup needed");
        return Ok(Arn::new(identifier));
    }

    if let Some(arn) = find_project(catalog, identifier).await? {
        tracing::info!("Existing project with name {identifier} found.");
        return Ok(arn);
    }

    tracing::info!(
        "Existing project with name {identifier} not found, so creating a new project..."
    );
    let project = catalog
        .create_project(CreateProjectRequest::named(identifier))
        .await?;
    tracing::debug!(arn = %project.arn, name = %project.name, "project created");
    Ok(project.arn)
}

/// First project named `name`, in listing order
async fn find_project(catalog: &dyn Catalog, name: &str) -> Result<Option<Arn>> {
    let mut pages = pin!(paginate(ListProjectsRequest::default(), |request| {
        catalog.list_projects(request)
    }));

    while let Some(page) = pages.try_next().await? {
        if let Some(project) = page.into_items().into_iter().find(|p| p.name == name) {
            return Ok(Some(project.arn));
        }
    }
    Ok(None)
}
