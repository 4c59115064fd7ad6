//! Messages handed to delivery report and consume callbacks.

use std::fmt;

use crate::error::ErrorCode;

/// An owned message, as seen by the callbacks registered in a configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct Message {
    topic: String,
    partition: i32,
    offset: i64,
    key: Option<Vec<u8>>,
    payload: Option<Vec<u8>>,
    error: Option<ErrorCode>,
}

impl Message {
    /// Creates a message without key or payload.
    pub fn new(topic: &str, partition: i32, offset: i64) -> Message {
        Message {
            topic: topic.to_string(),
            partition,
            offset,
            key: None,
            payload: None,
            error: None,
        }
    }

    /// Sets the key.
    pub fn with_key<K: ToBytes + ?Sized>(mut self, key: &K) -> Message {
        self.key = Some(key.to_bytes().to_vec());
        self
    }

    /// Sets the payload.
    pub fn with_payload<P: ToBytes + ?Sized>(mut self, payload: &P) -> Message {
        self.payload = Some(payload.to_bytes().to_vec());
        self
    }

    /// Marks the message as failed.
    pub fn with_error(mut self, error: ErrorCode) -> Message {
        self.error = Some(error);
        self
    }

    /// Returns the topic of the message.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Returns the partition of the message.
    pub fn partition(&self) -> i32 {
        self.partition
    }

    /// Returns the offset of the message.
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Returns the key of the message, or None if there is no key.
    pub fn key(&self) -> Option<&[u8]> {
        self.key.as_deref()
    }

    /// Returns the payload of the message, or None if there is no payload.
    pub fn payload(&self) -> Option<&[u8]> {
        self.payload.as_deref()
    }

    /// The delivery error, if the message failed.
    pub fn error(&self) -> Option<ErrorCode> {
        self.error
    }

    /// Returns `true` if the message was delivered.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Message")
            .field("topic", &self.topic)
            .field("partition", &self.partition)
            .field("offset", &self.offset)
            .field("key_len", &self.key.as_ref().map(Vec::len))
            .field("payload_len", &self.payload.as_ref().map(Vec::len))
            .field("error", &self.error)
            .finish()
    }
}

/// Given some data, returns the byte representation of that data.
/// No copy of the data should be performed.
pub trait ToBytes {
    /// Converts the provided data to bytes.
    fn to_bytes(&self) -> &[u8];
}

impl ToBytes for [u8] {
    fn to_bytes(&self) -> &[u8] {
        self
    }
}

impl ToBytes for str {
    fn to_bytes(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl ToBytes for Vec<u8> {
    fn to_bytes(&self) -> &[u8] {
        self.as_slice()
    }
}

impl ToBytes for String {
    fn to_bytes(&self) -> &[u8] {
        self.as_bytes()
    }
}
