//! Records and mutations.

use crate::error::{ProtocolError, ProtocolResult};
use crate::operation::Operation;

/// Size of the value MAC that trails every value blob.
pub const VALUE_MAC_SIZE: usize = 32;

/// A value MAC, the fingerprint accumulated into the collection hash.
pub type ValueMac = [u8; VALUE_MAC_SIZE];

/// One keyed record as carried by the server.
///
/// The value blob is `content || value MAC`, where content is the encrypted
/// action and the value MAC is its 32-byte content MAC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncdRecord {
    index: Vec<u8>,
    value: Vec<u8>,
    key_id: Vec<u8>,
}

impl SyncdRecord {
    /// Creates a record.
    ///
    /// # Arguments
    ///
    /// * `index` - The index MAC blob identifying the record
    /// * `value` - The value blob (`content || value MAC`)
    /// * `key_id` - ID of the key the record was encrypted and MAC'd with
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::ValueTooShort`] if `value` is shorter than
    /// [`VALUE_MAC_SIZE`].
    pub fn new(index: Vec<u8>, value: Vec<u8>, key_id: Vec<u8>) -> ProtocolResult<Self> {
        if value.len() < VALUE_MAC_SIZE {
            return Err(ProtocolError::ValueTooShort {
                expected: VALUE_MAC_SIZE,
                actual: value.len(),
            });
        }
        Ok(Self {
            index,
            value,
            key_id,
        })
    }

    /// Returns the index MAC blob.
    pub fn index_mac(&self) -> &[u8] {
        &self.index
    }

    /// Returns the full value blob.
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Returns the key ID.
    pub fn key_id(&self) -> &[u8] {
        &self.key_id
    }

    /// Returns the value blob without its trailing value MAC.
    pub fn content(&self) -> &[u8] {
        &self.value[..self.value.len() - VALUE_MAC_SIZE]
    }

    /// Returns the trailing 32 bytes of the value blob.
    pub fn value_mac(&self) -> ValueMac {
        let mut mac = [0u8; VALUE_MAC_SIZE];
        mac.copy_from_slice(&self.value[self.value.len() - VALUE_MAC_SIZE..]);
        mac
    }
}

/// A record together with the operation applied to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncdMutation {
    /// The operation.
    pub operation: Operation,
    /// The affected record.
    pub record: SyncdRecord,
}

impl SyncdMutation {
    /// Creates a mutation.
    pub fn new(operation: Operation, record: SyncdRecord) -> Self {
        Self { operation, record }
    }

    /// Creates a SET mutation.
    pub fn set(record: SyncdRecord) -> Self {
        Self::new(Operation::Set, record)
    }

    /// Creates a REMOVE mutation.
    pub fn remove(record: SyncdRecord) -> Self {
        Self::new(Operation::Remove, record)
    }

    /// Returns the index MAC of the record.
    pub fn index_mac(&self) -> &[u8] {
        self.record.index_mac()
    }

    /// Returns the value MAC of the record.
    pub fn value_mac(&self) -> ValueMac {
        self.record.value_mac()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob(content: &[u8], mac: u8) -> Vec<u8> {
        let mut value = content.to_vec();
        value.extend_from_slice(&[mac; VALUE_MAC_SIZE]);
        value
    }

    #[test]
    fn splits_value_blob() {
        let record = SyncdRecord::new(vec![1, 2], blob(b"cipher", 9), vec![0, 1]).unwrap();

        assert_eq!(record.index_mac(), &[1, 2]);
        assert_eq!(record.key_id(), &[0, 1]);
        assert_eq!(record.content(), b"cipher");
        assert_eq!(record.value_mac(), [9u8; VALUE_MAC_SIZE]);
        assert_eq!(record.value().len(), 6 + VALUE_MAC_SIZE);
    }

    #[test]
    fn value_of_exactly_mac_size() {
        let record = SyncdRecord::new(vec![], vec![3u8; VALUE_MAC_SIZE], vec![]).unwrap();
        assert!(record.content().is_empty());
        assert_eq!(record.value_mac(), [3u8; VALUE_MAC_SIZE]);
    }

    #[test]
    fn rejects_short_value() {
        let err = SyncdRecord::new(vec![], vec![0u8; 31], vec![]).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::ValueTooShort {
                expected: 32,
                actual: 31
            }
        );
    }

    #[test]
    fn mutation_constructors() {
        let record = SyncdRecord::new(vec![7], blob(b"", 1), vec![]).unwrap();

        let set = SyncdMutation::set(record.clone());
        assert_eq!(set.operation, Operation::Set);
        assert_eq!(set.index_mac(), &[7]);

        let remove = SyncdMutation::remove(record);
        assert_eq!(remove.operation, Operation::Remove);
        assert_eq!(remove.value_mac(), [1u8; VALUE_MAC_SIZE]);
    }
}
