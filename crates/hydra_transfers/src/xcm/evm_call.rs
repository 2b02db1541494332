//! Decoder for cross-chain transfers submitted through the EVM dispatch path.
//!
//! Withdrawal events triggered by EVM transactions carry the original
//! SCALE-encoded extrinsic in the transaction's `input` field. The extrinsic
//! wraps a cross-chain transfer call `(currency_id: u32, amount: u128, dest)`
//! where `dest` is a versioned location whose interior is
//! `X2(Parachain, AccountId32 | AccountKey20)`.
//!
//! Amounts are decoded as `u128`, never as floating point. Any structural
//! mismatch yields `None`; the caller treats that as an unusable record
//! rather than a zero-value transfer.

use parity_scale_codec::{Compact, Decode, Encode};

/// Extrinsic version byte accepted by the decoder (unsigned v4).
const EXTRINSIC_V4: u8 = 4;

#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub enum NetworkId {
    Any,
    Named(Vec<u8>),
    Polkadot,
    Kusama,
}

#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub enum Junction {
    Parachain(#[codec(compact)] u32),
    AccountId32 { network: NetworkId, id: [u8; 32] },
    AccountIndex64 {
        network: NetworkId,
        #[codec(compact)]
        index: u64,
    },
    AccountKey20 { network: NetworkId, key: [u8; 20] },
    PalletInstance(u8),
    GeneralIndex(#[codec(compact)] u128),
    GeneralKey(Vec<u8>),
    OnlyChild,
}

#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub enum Junctions {
    Here,
    X1(Junction),
    X2(Junction, Junction),
    X3(Junction, Junction, Junction),
    X4(Junction, Junction, Junction, Junction),
    X5(Junction, Junction, Junction, Junction, Junction),
    X6(Junction, Junction, Junction, Junction, Junction, Junction),
    X7(Junction, Junction, Junction, Junction, Junction, Junction, Junction),
    X8(Junction, Junction, Junction, Junction, Junction, Junction, Junction, Junction),
}

#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub struct Location {
    pub parents: u8,
    pub interior: Junctions,
}

/// Only the v2 location layout is in use on this call path; other version
/// indices fail to decode and the record stays unresolved.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub enum VersionedLocation {
    #[codec(index = 1)]
    V2(Location),
}

/// Beneficiary of a decoded transfer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Beneficiary {
    Id32([u8; 32]),
    Key20([u8; 20]),
}

/// Fields recovered from a wrapped cross-chain transfer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrappedTransfer {
    pub currency_id: u32,
    pub amount: u128,
    pub parachain_id: u32,
    /// `None` when the second junction is neither account variant.
    pub beneficiary: Option<Beneficiary>,
}

/// Decode the hex `input` of an EVM transaction as an unsigned v4 extrinsic
/// carrying a cross-chain transfer. `None` on any decode failure.
pub fn decode_wrapped_transfer(input_hex: &str) -> Option<WrappedTransfer> {
    let bytes = hex::decode(input_hex.trim().trim_start_matches("0x")).ok()?;
    let mut slice: &[u8] = &bytes;

    // A compact length prefix is present on opaque extrinsics; accept both
    // prefixed and bare encodings.
    {
        let mut probe = slice;
        if let Ok(len) = Compact::<u32>::decode(&mut probe) {
            if probe.len() == len.0 as usize {
                slice = probe;
            }
        }
    }

    let version = u8::decode(&mut slice).ok()?;
    if version != EXTRINSIC_V4 {
        return None;
    }
    let _pallet_index = u8::decode(&mut slice).ok()?;
    let _call_index = u8::decode(&mut slice).ok()?;

    let currency_id = u32::decode(&mut slice).ok()?;
    let amount = u128::decode(&mut slice).ok()?;
    let VersionedLocation::V2(location) = VersionedLocation::decode(&mut slice).ok()?;

    let (parachain_id, beneficiary) = match location.interior {
        Junctions::X2(Junction::Parachain(id), second) => {
            let beneficiary = match second {
                Junction::AccountId32 { id, .. } => Some(Beneficiary::Id32(id)),
                Junction::AccountKey20 { key, .. } => Some(Beneficiary::Key20(key)),
                _ => None,
            };
            (id, beneficiary)
        }
        _ => return None,
    };

    Some(WrappedTransfer {
        currency_id,
        amount,
        parachain_id,
        beneficiary,
    })
}
