//! Blake2b-256, the hash behind address checksums and Fiat-Shamir challenges.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

type Blake2b256 = Blake2b<U32>;

/// Length of the checksum suffix on an encoded address.
pub const CHECKSUM_LEN: usize = 4;

/// Blake2b-256 of `data`.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    blake2b_256_multi(&[data])
}

/// Blake2b-256 over the concatenation of `parts`, without building it.
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Address checksum: the leading bytes of the body's digest.
pub fn checksum(body: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = blake2b_256(body);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest[..CHECKSUM_LEN]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_input_hashes_like_joined_input() {
        assert_eq!(
            blake2b_256(b"ergo-mobile-proof"),
            blake2b_256_multi(&[b"ergo-", b"mobile", b"-proof"])
        );
    }

    #[test]
    fn empty_input_has_known_digest() {
        assert_eq!(
            hex::encode(blake2b_256(b"")),
            "0e5751c026e543b2e8ab2eb06099daa1d1e5df47778f7787faab45cdf12fe3a8"
        );
    }

    #[test]
    fn checksum_is_digest_prefix() {
        let body = [0x01u8, 0x02, 0x03];
        assert_eq!(checksum(&body)[..], blake2b_256(&body)[..CHECKSUM_LEN]);
    }
}
