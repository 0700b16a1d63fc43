//! System accounts that exist before any block creates them.
//!
//! An emulator may generate addresses with either of two schemes and the indexer cannot know
//! in advance which one the target chain uses, so every well-known account has one address per
//! [`AddressScheme`].

use crate::Address;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressScheme {
    /// Sequential addresses (`0x01`, `0x02`, ...).
    Monotonic,
    /// Addresses generated by the default emulator chain.
    NonMonotonic,
}

impl AddressScheme {
    pub const ALL: [AddressScheme; 2] = [AddressScheme::Monotonic, AddressScheme::NonMonotonic];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WellKnownAccount {
    Service,
    FungibleToken,
    FlowToken,
    FlowFees,
}

impl WellKnownAccount {
    pub const ALL: [WellKnownAccount; 4] = [
        WellKnownAccount::Service,
        WellKnownAccount::FungibleToken,
        WellKnownAccount::FlowToken,
        WellKnownAccount::FlowFees,
    ];

    fn raw_address(&self, scheme: AddressScheme) -> &'static str {
        match (self, scheme) {
            (Self::Service, AddressScheme::Monotonic) => "0000000000000001",
            (Self::FungibleToken, AddressScheme::Monotonic) => "0000000000000002",
            (Self::FlowToken, AddressScheme::Monotonic) => "0000000000000003",
            (Self::FlowFees, AddressScheme::Monotonic) => "0000000000000004",
            (Self::Service, AddressScheme::NonMonotonic) => "f8d6e0586b0a20c7",
            (Self::FungibleToken, AddressScheme::NonMonotonic) => "ee82856bf20e2aa6",
            (Self::FlowToken, AddressScheme::NonMonotonic) => "0ae53cb6e3f42a79",
            (Self::FlowFees, AddressScheme::NonMonotonic) => "e5a8b7f23e8b548f",
        }
    }

    pub fn address(&self, scheme: AddressScheme) -> Address {
        Address::from_raw_unchecked(self.raw_address(scheme))
    }

    /// Addresses of this account under both schemes.
    pub fn addresses(&self) -> [Address; 2] {
        AddressScheme::ALL.map(|scheme| self.address(scheme))
    }
}

/// Every well-known address under every scheme.
pub fn all_addresses() -> Vec<Address> {
    WellKnownAccount::ALL
        .iter()
        .flat_map(|account| account.addresses())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addresses_are_normalized() {
        let monotonic = WellKnownAccount::Service.address(AddressScheme::Monotonic);
        let parsed: Address = "0x1".parse().unwrap();

        assert_eq!(monotonic, parsed);
        assert_eq!(all_addresses().len(), 8);
    }
}
