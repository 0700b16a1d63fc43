//! Side effects of core events.
//!
//! Account creations of a block are processed before any other event of the same block, so
//! that key, contract and balance changes never race the creation of their account.

use eyre::WrapErr;
use flow_client::{cadence, AccountStorageApi, ChainEvent, GatewayApi};
use flowdex_types::{CoreEvent, CoreEventKind};
use futures::future::try_join_all;

use crate::AccountsProcessor;

/// Recognizes the event and extracts the account it affects. Unrecognized events are `None`
/// and their payload is never looked at.
fn core_event(event: &ChainEvent) -> eyre::Result<Option<CoreEvent>> {
    let kind = CoreEventKind::from_type(&event.event_type);
    if kind == CoreEventKind::Unrecognized {
        return Ok(None);
    }

    let data = cadence::decode(&event.payload)
        .wrap_err_with(|| format!("failed to decode {} payload", event.event_type))?;

    Ok(Some(CoreEvent::from_payload(kind, &data)?))
}

pub(crate) async fn process_core_events<'a, G, S>(
    accounts: &AccountsProcessor<G, S>,
    events: impl IntoIterator<Item = &'a ChainEvent>,
    block_id: &str,
) -> eyre::Result<()>
where
    G: GatewayApi + 'static,
    S: AccountStorageApi + 'static,
{
    let core_events = events
        .into_iter()
        .filter_map(|event| core_event(event).transpose())
        .collect::<eyre::Result<Vec<_>>>()?;

    let (creations, others): (Vec<_>, Vec<_>) = core_events
        .into_iter()
        .partition(|event| event.kind.is_account_creation());

    try_join_all(
        creations
            .iter()
            .map(|event| process_core_event(accounts, event, block_id)),
    )
    .await
    .wrap_err("failed to process account creations")?;

    try_join_all(
        others
            .iter()
            .map(|event| process_core_event(accounts, event, block_id)),
    )
    .await?;

    Ok(())
}

async fn process_core_event<G, S>(
    accounts: &AccountsProcessor<G, S>,
    event: &CoreEvent,
    block_id: &str,
) -> eyre::Result<()>
where
    G: GatewayApi + 'static,
    S: AccountStorageApi + 'static,
{
    match event.kind {
        // Contract changes re-index the whole account too: the account row embeds the key list
        // and is rewritten in full.
        CoreEventKind::AccountCreated
        | CoreEventKind::AccountKeyAdded
        | CoreEventKind::AccountKeyRemoved
        | CoreEventKind::AccountContractAdded
        | CoreEventKind::AccountContractUpdated
        | CoreEventKind::AccountContractRemoved => {
            let Some(address) = &event.account else {
                tracing::warn!(block_id, "{:?} event without an address", event.kind);
                return Ok(());
            };

            accounts.reindex_account(address, block_id).await
        }
        CoreEventKind::TokensWithdrawn | CoreEventKind::TokensDeposited => {
            // Minting and burning move tokens from or to nowhere.
            let Some(address) = &event.account else {
                return Ok(());
            };

            accounts.reindex_account(address, block_id).await
        }
        CoreEventKind::Unrecognized => Ok(()),
    }
}
