//! Delete command - remove one entity after confirmation.

use std::sync::Arc;

use tracing::info;

use common::{AppResult, ClientConfig};
use domain::Entity;

use crate::cli::{DeleteArgs, ResourceKind};
use crate::clients::ApiTransport;
use crate::page::AdminPage;
use crate::resource::Resource;
use crate::resources::{Categories, Features, Places, Users};

/// What a delete run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    AlreadyGone,
    NotConfirmed,
}

/// Execute the delete command
pub async fn execute(args: DeleteArgs, config: ClientConfig) -> AppResult<()> {
    let api = super::connect(&config)?;
    let resource = args.resource;
    let id = args.id;
    let outcome = match resource {
        ResourceKind::Categories => run::<Categories>(api, &config, args).await,
        ResourceKind::Places => run::<Places>(api, &config, args).await,
        ResourceKind::Features => run::<Features>(api, &config, args).await,
        ResourceKind::Users => run::<Users>(api, &config, args).await,
    }?;

    let name = resource.name();
    match outcome {
        DeleteOutcome::Deleted => println!("Deleted {} {}", name, id),
        DeleteOutcome::AlreadyGone => println!("{} {} is already deleted", name, id),
        DeleteOutcome::NotConfirmed => {
            println!("Not deleted. Pass --yes to delete {} {}", name, id)
        }
    }
    Ok(())
}

/// Delete one entity. Without `--yes` the confirmation is dismissed and
/// nothing is sent; an id missing from the collection is a no-op.
pub async fn run<R>(
    api: Arc<dyn ApiTransport>,
    config: &ClientConfig,
    args: DeleteArgs,
) -> AppResult<DeleteOutcome>
where
    R: Resource,
    R::Entity: Entity<Id = i64>,
{
    let mut page = AdminPage::<R>::new(api, config);
    page.load().await?;
    if !page.request_delete(&args.id) {
        return Ok(DeleteOutcome::AlreadyGone);
    }

    if !args.yes {
        page.cancel_delete();
        return Ok(DeleteOutcome::NotConfirmed);
    }

    page.confirm_delete().await?;
    info!("Deleted {} {}", R::NAME, args.id);
    Ok(DeleteOutcome::Deleted)
}
