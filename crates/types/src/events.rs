use serde_json::Value;

use crate::{Address, AddressError, WellKnownAccount};

const ACCOUNT_CREATED: &str = "flow.AccountCreated";
const ACCOUNT_KEY_ADDED: &str = "flow.AccountKeyAdded";
const ACCOUNT_KEY_REMOVED: &str = "flow.AccountKeyRemoved";
const ACCOUNT_CONTRACT_ADDED: &str = "flow.AccountContractAdded";
const ACCOUNT_CONTRACT_UPDATED: &str = "flow.AccountContractUpdated";
const ACCOUNT_CONTRACT_REMOVED: &str = "flow.AccountContractRemoved";

const TOKENS_WITHDRAWN: &str = "TokensWithdrawn";
const TOKENS_DEPOSITED: &str = "TokensDeposited";

/// Chain-level events the indexer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoreEventKind {
    AccountCreated,
    AccountKeyAdded,
    AccountKeyRemoved,
    AccountContractAdded,
    AccountContractUpdated,
    AccountContractRemoved,
    TokensWithdrawn,
    TokensDeposited,
    Unrecognized,
}

impl CoreEventKind {
    /// Matches a fully-qualified event type. Flow token events are matched against the Flow
    /// token address under both addressing schemes.
    pub fn from_type(event_type: &str) -> Self {
        match event_type {
            ACCOUNT_CREATED => return Self::AccountCreated,
            ACCOUNT_KEY_ADDED => return Self::AccountKeyAdded,
            ACCOUNT_KEY_REMOVED => return Self::AccountKeyRemoved,
            ACCOUNT_CONTRACT_ADDED => return Self::AccountContractAdded,
            ACCOUNT_CONTRACT_UPDATED => return Self::AccountContractUpdated,
            ACCOUNT_CONTRACT_REMOVED => return Self::AccountContractRemoved,
            _ => {}
        }

        for address in WellKnownAccount::FlowToken.addresses() {
            let Some(name) = event_type
                .strip_prefix("A.")
                .and_then(|rest| rest.strip_prefix(address.without_prefix()))
                .and_then(|rest| rest.strip_prefix(".FlowToken."))
            else {
                continue;
            };

            match name {
                TOKENS_WITHDRAWN => return Self::TokensWithdrawn,
                TOKENS_DEPOSITED => return Self::TokensDeposited,
                _ => {}
            }
        }

        Self::Unrecognized
    }

    /// Account creation must be handled before any other event of the same block.
    pub fn is_account_creation(&self) -> bool {
        matches!(self, Self::AccountCreated)
    }

    /// Name of the payload field holding the affected account.
    fn account_field(&self) -> Option<&'static str> {
        match self {
            Self::AccountCreated
            | Self::AccountKeyAdded
            | Self::AccountKeyRemoved
            | Self::AccountContractAdded
            | Self::AccountContractUpdated
            | Self::AccountContractRemoved => Some("address"),
            Self::TokensWithdrawn => Some("from"),
            Self::TokensDeposited => Some("to"),
            Self::Unrecognized => None,
        }
    }
}

/// A recognized event together with the account it affects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreEvent {
    pub kind: CoreEventKind,
    /// `None` when the event doesn't name an account, e.g. tokens minted from nowhere.
    pub account: Option<Address>,
}

impl CoreEvent {
    /// Extracts the affected account from a decoded event payload.
    pub fn from_payload(kind: CoreEventKind, data: &Value) -> Result<Self, AddressError> {
        let account = match kind.account_field().and_then(|field| data.get(field)) {
            Some(Value::String(address)) => Some(address.parse()?),
            _ => None,
        };

        Ok(Self { kind, account })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_account_events_are_recognized() {
        assert_eq!(
            CoreEventKind::from_type("flow.AccountCreated"),
            CoreEventKind::AccountCreated
        );
        assert_eq!(
            CoreEventKind::from_type("flow.AccountContractUpdated"),
            CoreEventKind::AccountContractUpdated
        );
        assert_eq!(
            CoreEventKind::from_type("flow.AccountSomethingElse"),
            CoreEventKind::Unrecognized
        );
    }

    #[test]
    fn test_flow_token_events_match_both_schemes() {
        assert_eq!(
            CoreEventKind::from_type("A.0ae53cb6e3f42a79.FlowToken.TokensWithdrawn"),
            CoreEventKind::TokensWithdrawn
        );
        assert_eq!(
            CoreEventKind::from_type("A.0000000000000003.FlowToken.TokensDeposited"),
            CoreEventKind::TokensDeposited
        );
        assert_eq!(
            CoreEventKind::from_type("A.0000000000000003.FlowToken.TokensMinted"),
            CoreEventKind::Unrecognized
        );
        assert_eq!(
            CoreEventKind::from_type("A.1234567890abcdef.FlowToken.TokensDeposited"),
            CoreEventKind::Unrecognized
        );
    }

    #[test]
    fn test_payload_account_extraction() {
        let created = CoreEvent::from_payload(
            CoreEventKind::AccountCreated,
            &json!({ "address": "0x01cf0e2f2f715450" }),
        )
        .unwrap();
        assert_eq!(created.account.unwrap().as_str(), "0x01cf0e2f2f715450");

        let minted = CoreEvent::from_payload(
            CoreEventKind::TokensWithdrawn,
            &json!({ "amount": "10.0", "from": null }),
        )
        .unwrap();
        assert_eq!(minted.account, None);
    }
}
