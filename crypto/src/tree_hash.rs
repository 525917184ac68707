use crate::hash::{CNFastHash, Hash256};

// Largest power of two strictly below `count` (for `count >= 3`)
fn tree_hash_cnt(count: usize) -> usize {
    debug_assert!(count >= 3);
    debug_assert!(count <= 0x1000_0000);

    let mut pow: usize = 2;
    while pow < count {
        pow <<= 1;
    }
    pow >> 1
}

fn hash_pair(left: &Hash256, right: &Hash256) -> Hash256 {
    let mut buf = [0; 64];
    buf[..32].copy_from_slice(left.data());
    buf[32..].copy_from_slice(right.data());
    Hash256::from(CNFastHash::digest(&buf))
}

/// Computes the Merkle-style tree hash over a list of transaction hashes
///
/// This is the unbalanced tree used in the block hashing blob: leaves beyond
/// the largest power of two are paired first, then the tree is folded level
/// by level.
pub fn tree_hash(hashes: &[Hash256]) -> Hash256 {
    assert!(!hashes.is_empty());
    match hashes.len() {
        1 => hashes[0],
        2 => hash_pair(&hashes[0], &hashes[1]),
        _ => {
            let mut cnt = tree_hash_cnt(hashes.len());
            let mut row: Vec<Hash256> = Vec::with_capacity(cnt);

            // Leaves that fit above the power-of-two boundary pass through
            let passthrough = 2 * cnt - hashes.len();
            row.extend_from_slice(&hashes[..passthrough]);

            // The overflow is paired down into the same row
            let mut i = passthrough;
            while i < hashes.len() {
                row.push(hash_pair(&hashes[i], &hashes[i + 1]));
                i += 2;
            }
            debug_assert_eq!(row.len(), cnt);

            while cnt > 2 {
                cnt >>= 1;
                for j in 0..cnt {
                    row[j] = hash_pair(&row[2 * j], &row[2 * j + 1]);
                }
                row.truncate(cnt);
            }

            hash_pair(&row[0], &row[1])
        }
    }
}
