use std::fmt;

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::contracts::{FN_BALANCE_OF, FN_SAFE_MINT, FN_TRANSFER};

/// A single ABI-level argument or return value.
///
/// Only the shapes the wallet actually exchanges with the ledger are modelled;
/// richer encodings belong to the ledger client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum AbiValue {
    Address(Address),
    Uint(u128),
    Bool(bool),
    String(String),
}

impl AbiValue {
    pub fn as_uint(&self) -> Option<u128> {
        match self {
            AbiValue::Uint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<&Address> {
        match self {
            AbiValue::Address(a) => Some(a),
            _ => None,
        }
    }
}

impl From<Address> for AbiValue {
    fn from(address: Address) -> Self {
        AbiValue::Address(address)
    }
}

impl From<u128> for AbiValue {
    fn from(value: u128) -> Self {
        AbiValue::Uint(value)
    }
}

/// Everything the ledger needs to execute one state-changing call.
///
/// Built by the UI layer through the factory functions below and passed
/// through the core untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    pub contract: Address,
    pub function: String,
    pub args: Vec<AbiValue>,
    /// Native currency attached to the call, in base units.
    pub value: Option<u128>,
}

impl OperationDescriptor {
    pub fn new(contract: Address, function: impl Into<String>, args: Vec<AbiValue>) -> Self {
        Self {
            contract,
            function: function.into(),
            args,
            value: None,
        }
    }

    pub fn with_value(mut self, value: u128) -> Self {
        self.value = Some(value);
        self
    }

    /// ERC-20 `transfer(recipient, amount)`; `amount` is in token base units.
    pub fn transfer(token: Address, recipient: Address, amount: u128) -> Self {
        Self::new(
            token,
            FN_TRANSFER,
            vec![AbiValue::Address(recipient), AbiValue::Uint(amount)],
        )
    }

    /// ERC-721 `safeMint(to)`.
    pub fn safe_mint(contract: Address, to: Address) -> Self {
        Self::new(contract, FN_SAFE_MINT, vec![AbiValue::Address(to)])
    }
}

impl fmt::Display for OperationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}({} args)", self.contract, self.function, self.args.len())
    }
}

/// A side-effect-free query against ledger state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadQuery {
    pub contract: Address,
    pub function: String,
    pub args: Vec<AbiValue>,
}

impl ReadQuery {
    pub fn new(contract: Address, function: impl Into<String>, args: Vec<AbiValue>) -> Self {
        Self {
            contract,
            function: function.into(),
            args,
        }
    }

    /// `balanceOf(owner)`, shared by ERC-20 and ERC-721 contracts.
    pub fn balance_of(contract: Address, owner: Address) -> Self {
        Self::new(contract, FN_BALANCE_OF, vec![AbiValue::Address(owner)])
    }
}

impl fmt::Display for ReadQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}({} args)", self.contract, self.function, self.args.len())
    }
}

/// Handle returned by the ledger for an accepted write (the transaction hash).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(pub String);

impl TxHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(last: char) -> Address {
        Address::parse(&format!("0x{}{}", "0".repeat(39), last)).unwrap()
    }

    #[test]
    fn transfer_orders_recipient_then_amount() {
        let op = OperationDescriptor::transfer(addr('1'), addr('2'), 10);
        assert_eq!(op.function, "transfer");
        assert_eq!(op.args[0].as_address(), Some(&addr('2')));
        assert_eq!(op.args[1].as_uint(), Some(10));
        assert_eq!(op.value, None);
    }

    #[test]
    fn safe_mint_targets_owner() {
        let op = OperationDescriptor::safe_mint(addr('a'), addr('b'));
        assert_eq!(op.contract, addr('a'));
        assert_eq!(op.function, "safeMint");
        assert_eq!(op.args, vec![AbiValue::Address(addr('b'))]);
    }

    #[test]
    fn with_value_attaches_native_amount() {
        let op = OperationDescriptor::safe_mint(addr('a'), addr('b')).with_value(5);
        assert_eq!(op.value, Some(5));
    }

    #[test]
    fn balance_of_query() {
        let q = ReadQuery::balance_of(addr('c'), addr('d'));
        assert_eq!(q.function, "balanceOf");
        assert_eq!(q.args.len(), 1);
    }

    #[test]
    fn abi_value_accessors_reject_other_shapes() {
        assert_eq!(AbiValue::Bool(true).as_uint(), None);
        assert_eq!(AbiValue::Uint(3).as_address(), None);
    }

    #[test]
    fn descriptor_serializes_tagged_args() {
        let op = OperationDescriptor::transfer(addr('1'), addr('2'), 7);
        let json = serde_json::to_string(&op).unwrap();
        assert!(json.contains("\"type\":\"address\""));
        assert!(json.contains("\"type\":\"uint\""));
        let parsed: OperationDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, op);
    }
}
