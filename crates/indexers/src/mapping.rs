//! Conversions from chain data into indexed entities.
//!
//! Ids are derived here from each entity's natural key, so re-indexing the same chain data
//! always produces the same ids.

use eyre::WrapErr;
use flow_client::{
    cadence, ChainAccount, ChainBlock, ChainEvent, ChainTransaction, ChainTransactionStatus,
    StorageItem,
};
use flowdex_types::{
    Account, AccountKey, AccountStorage, Address, Block, CollectionGuarantee, Contract, Event,
    Transaction, TransactionArgument, TransactionStatus,
};
use serde_json::Value;

pub(crate) fn block(block: &ChainBlock) -> Block {
    Block {
        id: block.id.clone(),
        height: block.height,
        parent_id: block.parent_id.clone(),
        timestamp: block.timestamp,
        collection_guarantees: block
            .collection_guarantees
            .iter()
            .map(|guarantee| CollectionGuarantee {
                collection_id: guarantee.collection_id.clone(),
                signer_ids: guarantee.signer_ids.clone(),
            })
            .collect(),
        signatures: block.signatures.clone(),
    }
}

pub(crate) fn transaction_status(status: &ChainTransactionStatus) -> TransactionStatus {
    TransactionStatus::new(
        status.execution_status,
        status.status_code,
        status.error_message.clone(),
    )
}

fn transaction_argument(argument: &Value) -> eyre::Result<TransactionArgument> {
    Ok(TransactionArgument {
        type_id: cadence::type_of(argument)?.to_owned(),
        value: cadence::decode(argument)?,
    })
}

pub(crate) fn transaction(
    transaction: &ChainTransaction,
    status: &ChainTransactionStatus,
    block_id: &str,
) -> eyre::Result<Transaction> {
    let arguments = transaction
        .arguments
        .iter()
        .enumerate()
        .map(|(position, argument)| {
            transaction_argument(argument)
                .wrap_err_with(|| format!("failed to parse argument {position}"))
        })
        .collect::<eyre::Result<Vec<_>>>()?;

    Ok(Transaction {
        id: transaction.id.clone(),
        script: transaction.script.clone(),
        block_id: block_id.to_owned(),
        reference_block_id: transaction.reference_block_id.clone(),
        gas_limit: transaction.gas_limit,
        payer: transaction.payer.clone(),
        proposal_key: transaction.proposal_key.clone(),
        authorizers: transaction.authorizers.clone(),
        arguments,
        envelope_signatures: transaction.envelope_signatures.clone(),
        payload_signatures: transaction.payload_signatures.clone(),
        status: transaction_status(status),
    })
}

/// Maps an event emitted by `transaction_id`. The payload is decoded into a plain object.
pub(crate) fn event(
    event: &ChainEvent,
    transaction_id: &str,
    block_id: &str,
) -> eyre::Result<Event> {
    let data = cadence::decode(&event.payload).wrap_err("failed to decode event payload")?;

    Ok(Event {
        id: Event::make_id(transaction_id, event.event_index),
        event_type: event.event_type.clone(),
        transaction_id: transaction_id.to_owned(),
        block_id: block_id.to_owned(),
        transaction_index: event.transaction_index,
        event_index: event.event_index,
        data,
    })
}

pub(crate) fn account_keys(account: &ChainAccount, block_id: &str) -> Vec<AccountKey> {
    account
        .keys
        .iter()
        .map(|key| AccountKey {
            id: AccountKey::make_id(&account.address, key.index),
            index: key.index,
            address: account.address.clone(),
            public_key: key.public_key.clone(),
            sign_algo: key.sign_algo.clone(),
            hash_algo: key.hash_algo.clone(),
            weight: key.weight,
            sequence_number: key.sequence_number,
            revoked: key.revoked,
            block_id: block_id.to_owned(),
        })
        .collect()
}

pub(crate) fn account(account: &ChainAccount, keys: Vec<AccountKey>, block_id: &str) -> Account {
    Account {
        id: account.address.to_string(),
        address: account.address.clone(),
        balance: account.balance,
        code: account.code.clone(),
        keys,
        block_id: block_id.to_owned(),
    }
}

pub(crate) fn contracts(account: &ChainAccount, block_id: &str) -> Vec<Contract> {
    account
        .contracts
        .iter()
        .map(|(name, code)| Contract {
            id: Contract::make_id(&account.address, name),
            address: account.address.clone(),
            name: name.clone(),
            code: code.clone(),
            block_id: block_id.to_owned(),
        })
        .collect()
}

pub(crate) fn storage_item(address: &Address, item: StorageItem) -> AccountStorage {
    AccountStorage {
        id: AccountStorage::make_id(address, item.domain, &item.path),
        address: address.clone(),
        domain: item.domain,
        path: item.path,
        target_path: item.target_path,
        data: item.data,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use flow_client::ChainAccountKey;
    use flowdex_types::{ExecutionStatus, GrpcStatus, ProposalKey};
    use serde_json::json;

    use super::*;

    fn chain_transaction(arguments: Vec<Value>) -> ChainTransaction {
        let payer: Address = "0xf8d6e0586b0a20c7".parse().unwrap();

        ChainTransaction {
            id: "tx".to_owned(),
            script: "transaction {}".to_owned(),
            arguments,
            reference_block_id: "ref".to_owned(),
            gas_limit: 100,
            payer: payer.clone(),
            proposal_key: ProposalKey {
                address: payer,
                key_index: 0,
                sequence_number: 1,
            },
            authorizers: vec![],
            payload_signatures: vec![],
            envelope_signatures: vec![],
        }
    }

    fn status(code: i64) -> ChainTransactionStatus {
        ChainTransactionStatus {
            block_id: "block".to_owned(),
            execution_status: ExecutionStatus::Sealed,
            status_code: code,
            error_message: String::new(),
            events: vec![],
        }
    }

    #[test]
    fn test_transaction_arguments_keep_type_metadata() {
        let transaction = transaction(
            &chain_transaction(vec![
                json!({ "type": "UFix64", "value": "1.5" }),
                json!({ "type": "Optional", "value": null }),
            ]),
            &status(0),
            "block",
        )
        .unwrap();

        assert_eq!(transaction.arguments[0].type_id, "UFix64");
        assert_eq!(transaction.arguments[0].value, json!("1.5"));
        assert_eq!(transaction.arguments[1].type_id, "Optional");
        assert_eq!(transaction.arguments[1].value, Value::Null);
        assert_eq!(transaction.block_id, "block");
    }

    #[test]
    fn test_malformed_argument_fails_the_transaction() {
        let result = transaction(
            &chain_transaction(vec![json!({ "value": "untyped" })]),
            &status(0),
            "block",
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_status_code_is_remapped() {
        for (code, expected) in [
            (0, GrpcStatus::Ok),
            (1, GrpcStatus::Cancelled),
            (2, GrpcStatus::Failed),
            (99, GrpcStatus::Failed),
            (-1, GrpcStatus::Failed),
        ] {
            assert_eq!(transaction_status(&status(code)).grpc_status, expected);
        }
    }

    #[test]
    fn test_account_rows_share_the_normalized_address() {
        let account = ChainAccount {
            address: "0x01".parse().unwrap(),
            balance: 10,
            code: String::new(),
            keys: vec![ChainAccountKey {
                index: 0,
                public_key: "0xabc".to_owned(),
                sign_algo: "ECDSA_P256".to_owned(),
                hash_algo: "SHA3_256".to_owned(),
                weight: 1000,
                sequence_number: 0,
                revoked: false,
            }],
            contracts: BTreeMap::from([("Hello".to_owned(), "contract".to_owned())]),
        };

        let keys = account_keys(&account, "block");
        let contracts = contracts(&account, "block");
        let mapped = super::account(&account, keys.clone(), "block");

        assert_eq!(mapped.id, "0x0000000000000001");
        assert_eq!(keys[0].id, "0x0000000000000001.0");
        assert_eq!(contracts[0].id, "0x0000000000000001.Hello");
        assert_eq!(mapped.keys, keys);
    }
}
