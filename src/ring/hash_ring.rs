//! Hash Ring Module
//!
//! Consistent hashing with virtual replicas.

use std::collections::HashMap;

/// Hash function mapping bytes onto the ring.
pub type HashFn = fn(&[u8]) -> u32;

/// Virtual replicas per node used when none is configured.
pub const DEFAULT_REPLICAS: usize = 50;

// == Hash Ring ==
/// Maps keys to node names.
///
/// Every node occupies `replicas` positions on the ring, hashed from
/// `"{replica_index}{node}"`. A key belongs to the node owning the first
/// position at or after the key's hash, wrapping to the first position.
#[derive(Debug, Clone)]
pub struct HashRing {
    hash: HashFn,
    replicas: usize,
    /// Sorted ring positions
    positions: Vec<u32>,
    /// Position to node name
    owners: HashMap<u32, String>,
}

impl HashRing {
    // == Constructor ==
    /// Creates an empty ring. `hash` defaults to CRC-32 (IEEE).
    pub fn new(replicas: usize, hash: Option<HashFn>) -> Self {
        Self {
            hash: hash.unwrap_or(crc32fast::hash),
            replicas,
            positions: Vec::new(),
            owners: HashMap::new(),
        }
    }

    // == Add ==
    /// Places `replicas` positions for each node on the ring.
    pub fn add<I, S>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for node in nodes {
            let node = node.as_ref();
            for i in 0..self.replicas {
                let position = (self.hash)(format!("{}{}", i, node).as_bytes());
                self.positions.push(position);
                self.owners.insert(position, node.to_string());
            }
        }
        self.positions.sort_unstable();
    }

    // == Get ==
    /// Returns the node owning `key`, or `None` when the ring is empty.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.positions.is_empty() {
            return None;
        }

        let hash = (self.hash)(key.as_bytes());
        let idx = self.positions.partition_point(|&p| p < hash);
        let position = self.positions[idx % self.positions.len()];
        self.owners.get(&position).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of positions on the ring.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn replicas(&self) -> usize {
        self.replicas
    }
}

impl Default for HashRing {
    fn default() -> Self {
        Self::new(DEFAULT_REPLICAS, None)
    }
}
