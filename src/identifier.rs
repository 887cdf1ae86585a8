//! Hold-identifier derivation and confirmation-code encoding.
//!
//! Both are pure functions of their inputs — no mutex, no clock read — so
//! they're exercised directly by the fixtures in spec §8 without needing a
//! running `TicketService`.

use sha1::{Digest, Sha1};

use crate::hold::HoldId;

/// Folds a SHA-1 digest of `(email, salt, millis)` into a 32-bit identifier.
///
/// Every 4-byte group of the digest is folded via `id = (id << 4) ^ (b0 |
/// b1 | b2 | b3)` — bitwise OR, not concatenation, preserved literally to
/// stay byte-compatible with the confirmation-code fixture (spec §4.1,
/// §9). SHA-1's 20 bytes yield 5 groups of 4.
pub fn derive_hold_id(email: &str, salt: u64, millis: i64) -> HoldId {
    let mut hasher = Sha1::new();
    hasher.update(email.as_bytes());
    hasher.update(salt.to_be_bytes());
    hasher.update(millis.to_be_bytes());
    let digest = hasher.finalize();

    let mut id: i32 = 0;
    for group in digest.chunks_exact(4) {
        let folded = (group[0] | group[1] | group[2] | group[3]) as i32;
        id = (id << 4) ^ folded;
    }
    id
}

const CONFIRMATION_XOR_MASK: i32 = 0xCAFEBABEu32 as i32;

/// `code = holdId XOR 0xCAFEBABE`; checksum XORs four of its bytes.
/// Reversible: `decode_confirmation(encode_confirmation(id)).0 == id`.
pub fn encode_confirmation(hold_id: HoldId) -> String {
    let code = hold_id ^ CONFIRMATION_XOR_MASK;
    let checksum = checksum_of(code);
    format!("{:08X}-{:02X}", code as u32, checksum)
}

/// Recovers the originating hold identifier from a confirmation code,
/// without needing any bookkeeping beyond the code itself.
pub fn decode_confirmation(code: &str) -> Option<HoldId> {
    let (code_hex, checksum_hex) = code.split_once('-')?;
    let code = i64::from_str_radix(code_hex, 16).ok()? as u32 as i32;
    let checksum = u8::from_str_radix(checksum_hex, 16).ok()?;
    if checksum_of(code) != checksum {
        return None;
    }
    Some(code ^ CONFIRMATION_XOR_MASK)
}

fn checksum_of(code: i32) -> u8 {
    let code = code as u32;
    ((code & 0xff) ^ ((code >> 4) & 0xff) ^ ((code >> 16) & 0xff) ^ ((code >> 24) & 0xff)) as u8
}
