//! List command - print one page of a resource.

use std::collections::BTreeMap;
use std::sync::Arc;

use common::{AppResult, ClientConfig};

use crate::cli::{ListArgs, ResourceKind};
use crate::clients::ApiTransport;
use crate::list::SortDirection;
use crate::page::AdminPage;
use crate::resource::Resource;
use crate::resources::{Categories, Features, Places, Users};

/// Execute the list command
pub async fn execute(args: ListArgs, config: ClientConfig) -> AppResult<()> {
    let api = super::connect(&config)?;
    match args.resource {
        ResourceKind::Categories => run::<Categories>(api, &config, args).await,
        ResourceKind::Places => run::<Places>(api, &config, args).await,
        ResourceKind::Features => run::<Features>(api, &config, args).await,
        ResourceKind::Users => run::<Users>(api, &config, args).await,
    }
}

/// Load a resource, apply the query and print the resulting page as JSON
/// lines followed by a summary.
pub async fn run<R: Resource>(
    api: Arc<dyn ApiTransport>,
    config: &ClientConfig,
    args: ListArgs,
) -> AppResult<()> {
    let mut page = AdminPage::<R>::new(api, config);
    page.load().await?;

    let mut filters: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (key, value) in args.filters {
        filters.entry(key).or_default().push(value);
    }

    let list = page.list_mut();
    if let Some(search) = args.search {
        list.set_search(search);
    }
    for (key, values) in filters {
        list.set_filter(&key, values)?;
    }
    if let Some(sort) = args.sort {
        let direction = if args.desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        list.set_sort(&sort, direction)?;
    }
    if let Some(size) = args.page_size {
        list.set_page_size(size);
    }

    // First pass establishes the total the requested page is clamped to.
    page.view();
    page.list_mut().set_page(args.page);
    let view = page.view();

    for row in &view.rows {
        println!("{}", serde_json::to_string(row)?);
    }
    match (view.empty, view.showing()) {
        (Some(empty), _) => println!("{}", empty.message()),
        (None, Some((first, last))) => println!(
            "Showing {}-{} of {} {} (page {}/{})",
            first,
            last,
            view.total,
            R::NAME,
            view.page,
            view.total_pages
        ),
        (None, None) => {}
    }
    Ok(())
}
