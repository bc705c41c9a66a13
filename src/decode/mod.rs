//! Cardano-aware normalization of parsed CBOR.

mod address;
mod body;
mod certificate;
mod coin;
mod transaction;
mod utxo;
mod value;
mod withdrawal;

pub use address::{DecodedAddress, decode_address, encode_address, format_address};
pub use body::{BodyField, TransactionBody, format_body};
pub use certificate::{Certificate, DRep, StakeCredential, format_certificates};
pub use coin::{format_coin, lovelace_to_ada, parse_lovelace};
pub use transaction::{
    CardanoDecodedTransaction, DESERIALIZATION_FAILED, DecodeFailure, DecodedTransaction,
    Unrecognized, assemble, decode, decode_bytes,
};
pub use utxo::{Amount, TransactionInput, TransactionOutput};
pub use value::{Normalized, format_value};
pub use withdrawal::{Withdrawal, Withdrawals};
