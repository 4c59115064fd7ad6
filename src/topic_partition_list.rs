//! A data structure representing topic, partitions and offsets, as handed to
//! rebalance and offset commit callbacks.

use std::fmt;

use crate::error::ErrorCode;

/// Partition value of a topic that has no assigned partition.
pub const PARTITION_UNASSIGNED: i32 = -1;

/// A Kafka offset.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Offset {
    /// Start consuming from the beginning of the partition.
    Beginning,
    /// Start consuming from the end of the partition.
    End,
    /// Start consuming from the stored offset.
    Stored,
    /// Offset not assigned or invalid.
    Invalid,
    /// A specific offset to consume from.
    Offset(i64),
}

/// One element of a [`TopicPartitionList`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopicPartitionListElem {
    topic: String,
    partition: i32,
    offset: Offset,
    error: Option<ErrorCode>,
}

impl TopicPartitionListElem {
    /// Returns the topic name.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Returns the partition number.
    pub fn partition(&self) -> i32 {
        self.partition
    }

    /// Returns the offset.
    pub fn offset(&self) -> Offset {
        self.offset
    }

    /// Returns the per-partition error, if any.
    pub fn error(&self) -> Option<ErrorCode> {
        self.error
    }
}

/// A list of topics and partitions with optional offsets.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TopicPartitionList {
    elems: Vec<TopicPartitionListElem>,
}

impl TopicPartitionList {
    /// Creates a new empty list.
    pub fn new() -> TopicPartitionList {
        TopicPartitionList::default()
    }

    /// Returns the number of elements in the list.
    pub fn count(&self) -> usize {
        self.elems.len()
    }

    /// Adds a topic with unassigned partitions to the list.
    pub fn add_topic_unassigned(&mut self, topic: &str) -> &mut TopicPartitionListElem {
        self.add_partition(topic, PARTITION_UNASSIGNED)
    }

    /// Adds a topic and partition to the list. An element already present
    /// for the same pair is returned unchanged.
    pub fn add_partition(&mut self, topic: &str, partition: i32) -> &mut TopicPartitionListElem {
        let index = match self.position(topic, partition) {
            Some(index) => index,
            None => {
                self.elems.push(TopicPartitionListElem {
                    topic: topic.to_string(),
                    partition,
                    offset: Offset::Invalid,
                    error: None,
                });
                self.elems.len() - 1
            }
        };
        &mut self.elems[index]
    }

    /// Sets the offset of an existing element. Returns `false` if the
    /// element is not in the list.
    pub fn set_partition_offset(&mut self, topic: &str, partition: i32, offset: Offset) -> bool {
        match self.position(topic, partition) {
            Some(index) => {
                self.elems[index].offset = offset;
                true
            }
            None => false,
        }
    }

    /// Adds a topic and partition with the given offset.
    pub fn add_partition_offset(&mut self, topic: &str, partition: i32, offset: Offset) {
        self.add_partition(topic, partition).offset = offset;
    }

    /// Records a per-partition error.
    pub fn set_partition_error(&mut self, topic: &str, partition: i32, error: ErrorCode) -> bool {
        match self.position(topic, partition) {
            Some(index) => {
                self.elems[index].error = Some(error);
                true
            }
            None => false,
        }
    }

    /// Returns the element for the given topic and partition, if any.
    pub fn find_partition(&self, topic: &str, partition: i32) -> Option<&TopicPartitionListElem> {
        self.position(topic, partition).map(|i| &self.elems[i])
    }

    /// Returns all the elements of the list.
    pub fn elements(&self) -> &[TopicPartitionListElem] {
        &self.elems
    }

    fn position(&self, topic: &str, partition: i32) -> Option<usize> {
        self.elems
            .iter()
            .position(|e| e.topic == topic && e.partition == partition)
    }
}

impl fmt::Debug for TopicPartitionList {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.elems.iter()).finish()
    }
}
