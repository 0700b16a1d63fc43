use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use flow_client::{
    ApiStatus, ChainAccount, ChainAccountKey, ChainBlock, ChainCollection,
    ChainCollectionGuarantee, ChainEvent, ChainTransaction, ChainTransactionStatus, Error,
    MockAccountStorageApi, MockGatewayApi, StorageItem, TxStatusSubscription,
};
use flowdex_storage::{IndexStore, InMemoryIndex, ResourceIndex};
use flowdex_types::{Address, ExecutionStatus, ProposalKey, Resource, StorageDomain};
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use tokio::sync::watch;

use crate::{BlockchainIndexer, IndexingParams};


static ALICE: Lazy<Address> = Lazy::new(|| "0x01cf0e2f2f715450".parse().unwrap());
static BOB: Lazy<Address> = Lazy::new(|| "0x179b6b1cb6755e31".parse().unwrap());

type TestIndexer = BlockchainIndexer<MockGatewayApi, MockAccountStorageApi>;

/// State of the fake chain behind the mocked access API.
struct Chain {
    online: bool,
    latest_height: u64,
    blocks: HashMap<u64, ChainBlock>,
    collections: HashMap<String, ChainCollection>,
    transactions: HashMap<String, ChainTransaction>,
    statuses: HashMap<String, ChainTransactionStatus>,
    accounts: HashMap<Address, ChainAccount>,
    storage: HashMap<Address, Vec<StorageItem>>,
    /// Heights whose next request fails once.
    flaky_heights: HashSet<u64>,
    /// Every requested block height, in order.
    fetched_heights: Vec<u64>,
    /// Every requested account, in order.
    account_requests: Vec<Address>,
    latest_block_requests: usize,
}

type SharedChain = Arc<Mutex<Chain>>;

impl Chain {
    fn new() -> SharedChain {
        Arc::new(Mutex::new(Self {
            online: true,
            latest_height: 0,
            blocks: HashMap::new(),
            collections: HashMap::new(),
            transactions: HashMap::new(),
            statuses: HashMap::new(),
            accounts: HashMap::new(),
            storage: HashMap::new(),
            flaky_heights: HashSet::new(),
            fetched_heights: Vec::new(),
            account_requests: Vec::new(),
            latest_block_requests: 0,
        }))
    }

    /// Adds a block holding `transactions` in a single collection and makes it the latest one
    /// if it's the highest.
    fn add_block(
        &mut self,
        height: u64,
        transactions: Vec<(ChainTransaction, ChainTransactionStatus)>,
    ) {
        let id = block_id(height);
        let collection_id = format!("collection-{height}");

        let mut transaction_ids = Vec::new();
        for (transaction, mut status) in transactions {
            status.block_id = id.clone();
            transaction_ids.push(transaction.id.clone());
            self.statuses.insert(transaction.id.clone(), status);
            self.transactions.insert(transaction.id.clone(), transaction);
        }

        self.collections.insert(
            collection_id.clone(),
            ChainCollection {
                id: collection_id.clone(),
                transaction_ids,
            },
        );

        self.blocks.insert(
            height,
            ChainBlock {
                id,
                parent_id: block_id(height.saturating_sub(1)),
                height,
                timestamp: Utc.timestamp_opt(1_700_000_000 + height as i64, 0).unwrap(),
                collection_guarantees: vec![ChainCollectionGuarantee {
                    collection_id,
                    signer_ids: vec![],
                }],
                signatures: vec![],
            },
        );

        self.latest_height = self.latest_height.max(height);
    }

    fn add_empty_blocks(&mut self, heights: impl IntoIterator<Item = u64>) {
        for height in heights {
            self.add_block(height, vec![]);
        }
    }

    fn add_account(&mut self, account: ChainAccount) {
        self.accounts.insert(account.address.clone(), account);
    }
}

fn block_id(height: u64) -> String {
    format!("{height:064x}")
}

fn not_found(what: &str) -> Error {
    Error::Status {
        code: 404,
        message: format!("{what} not found"),
    }
}

fn gateway(chain: &SharedChain) -> MockGatewayApi {
    let mut gateway = MockGatewayApi::new();

    let c = chain.clone();
    gateway.expect_get_api_status().returning(move || {
        if c.lock().unwrap().online {
            ApiStatus::Online
        } else {
            ApiStatus::Offline
        }
    });

    let c = chain.clone();
    gateway.expect_get_latest_block().returning(move || {
        let mut chain = c.lock().unwrap();
        chain.latest_block_requests += 1;

        let latest = chain.latest_height;
        chain
            .blocks
            .get(&latest)
            .cloned()
            .ok_or_else(|| not_found("block"))
    });

    let c = chain.clone();
    gateway.expect_get_block_by_height().returning(move |height| {
        let mut chain = c.lock().unwrap();
        chain.fetched_heights.push(height);

        if chain.flaky_heights.remove(&height) {
            return Err(Error::UnexpectedStructure(format!("block {height} timed out")));
        }

        chain
            .blocks
            .get(&height)
            .cloned()
            .ok_or_else(|| not_found("block"))
    });

    let c = chain.clone();
    gateway.expect_get_collection_by_id().returning(move |id| {
        c.lock()
            .unwrap()
            .collections
            .get(id)
            .cloned()
            .ok_or_else(|| not_found("collection"))
    });

    let c = chain.clone();
    gateway.expect_get_transaction_by_id().returning(move |id| {
        c.lock()
            .unwrap()
            .transactions
            .get(id)
            .cloned()
            .ok_or_else(|| not_found("transaction"))
    });

    let c = chain.clone();
    gateway
        .expect_get_transaction_status_by_id()
        .returning(move |id| {
            c.lock()
                .unwrap()
                .statuses
                .get(id)
                .cloned()
                .ok_or_else(|| not_found("transaction result"))
        });

    let c = chain.clone();
    gateway.expect_get_account().returning(move |address| {
        let mut chain = c.lock().unwrap();
        chain.account_requests.push(address.clone());

        chain
            .accounts
            .get(address)
            .cloned()
            .ok_or_else(|| not_found("account"))
    });

    // Statuses are final when the block is indexed, the producer is gone right away.
    let c = chain.clone();
    gateway
        .expect_get_tx_status_subscription()
        .returning(move |id| {
            let status = c.lock().unwrap().statuses.get(id).cloned();
            let (_, receiver) = watch::channel(status);

            Ok(TxStatusSubscription::new(id, receiver))
        });

    gateway
}

fn storage_api(chain: &SharedChain) -> MockAccountStorageApi {
    let mut storage_api = MockAccountStorageApi::new();

    let c = chain.clone();
    storage_api
        .expect_get_account_storage_items()
        .returning(move |address| {
            Ok(c.lock()
                .unwrap()
                .storage
                .get(address)
                .cloned()
                .unwrap_or_default())
        });

    storage_api
}

fn indexer(chain: &SharedChain, params: IndexingParams) -> TestIndexer {
    BlockchainIndexer::new(
        Arc::new(gateway(chain)),
        Arc::new(storage_api(chain)),
        IndexStore::new(),
        params,
    )
}

/// Indexer for a chain it manages itself, so that no bootstrap request gets in the way.
fn managed_indexer(chain: &SharedChain) -> TestIndexer {
    indexer(
        chain,
        IndexingParams {
            managed_chain: true,
        },
    )
}

/// Resources of an index without their timestamps, sorted by id.
async fn resources<R: Resource>(index: &InMemoryIndex<R>) -> Vec<R> {
    let mut resources: Vec<R> = index
        .find_all()
        .await
        .into_iter()
        .map(|stored| stored.into_inner())
        .collect();
    resources.sort_by(|a, b| a.id().cmp(b.id()));

    resources
}

async fn indexed_heights(store: &IndexStore) -> Vec<u64> {
    let mut heights: Vec<u64> = store
        .blocks
        .find_all()
        .await
        .iter()
        .map(|block| block.height)
        .collect();
    heights.sort_unstable();

    heights
}

fn transaction(id: &str, arguments: Vec<Value>) -> ChainTransaction {
    ChainTransaction {
        id: id.to_owned(),
        script: "transaction { execute {} }".to_owned(),
        arguments,
        reference_block_id: block_id(0),
        gas_limit: 9999,
        payer: ALICE.clone(),
        proposal_key: ProposalKey {
            address: ALICE.clone(),
            key_index: 0,
            sequence_number: 0,
        },
        authorizers: vec![ALICE.clone()],
        payload_signatures: vec![],
        envelope_signatures: vec![],
    }
}

fn sealed(status_code: i64, events: Vec<ChainEvent>) -> ChainTransactionStatus {
    ChainTransactionStatus {
        block_id: String::new(),
        execution_status: ExecutionStatus::Sealed,
        status_code,
        error_message: String::new(),
        events,
    }
}

fn chain_event(event_type: &str, transaction_id: &str, index: u64, payload: Value) -> ChainEvent {
    ChainEvent {
        event_type: event_type.to_owned(),
        transaction_id: transaction_id.to_owned(),
        transaction_index: 0,
        event_index: index,
        payload,
    }
}

fn event_payload(event_type: &str, fields: Vec<Value>) -> Value {
    json!({ "type": "Event", "value": { "id": event_type, "fields": fields } })
}

fn address_field(name: &str, address: &Address) -> Value {
    json!({ "name": name, "value": { "type": "Address", "value": address.as_str() } })
}

/// Core account event (`flow.AccountCreated`, `flow.AccountKeyAdded`, ...) for `address`.
fn account_event(
    event_type: &str,
    transaction_id: &str,
    index: u64,
    address: &Address,
) -> ChainEvent {
    chain_event(
        event_type,
        transaction_id,
        index,
        event_payload(event_type, vec![address_field("address", address)]),
    )
}

/// Flow token event moving tokens from or to `account`, or from or to nowhere.
fn token_event(
    name: &str,
    field: &str,
    transaction_id: &str,
    index: u64,
    account: Option<&Address>,
) -> ChainEvent {
    let event_type = format!("A.0ae53cb6e3f42a79.FlowToken.{name}");
    let account = match account {
        Some(address) => json!({ "type": "Address", "value": address.as_str() }),
        None => Value::Null,
    };

    chain_event(
        &event_type,
        transaction_id,
        index,
        event_payload(
            &event_type,
            vec![
                json!({ "name": "amount", "value": { "type": "UFix64", "value": "1.00000000" } }),
                json!({ "name": field, "value": { "type": "Optional", "value": account } }),
            ],
        ),
    )
}

fn account_key(index: u32) -> ChainAccountKey {
    ChainAccountKey {
        index,
        public_key: format!("0x{index:0128x}"),
        sign_algo: "ECDSA_P256".to_owned(),
        hash_algo: "SHA3_256".to_owned(),
        weight: 1000,
        sequence_number: 0,
        revoked: false,
    }
}

fn chain_account(address: &Address, balance: u64, keys: u32, contracts: &[&str]) -> ChainAccount {
    ChainAccount {
        address: address.clone(),
        balance,
        code: String::new(),
        keys: (0..keys).map(account_key).collect(),
        contracts: contracts
            .iter()
            .map(|name| (name.to_string(), format!("access(all) contract {name} {{}}")))
            .collect::<BTreeMap<_, _>>(),
    }
}

fn storage_item(domain: StorageDomain, path: &str) -> StorageItem {
    StorageItem {
        domain,
        path: path.to_owned(),
        target_path: None,
        data: json!({ "type": "A.0ae53cb6e3f42a79.FlowToken.Vault" }),
    }
}
