//! The application-level payload unit.

use std::fmt::{self, Display};

/// The largest number of bytes a [`Message`] may carry, and therefore the
/// largest payload that fits in a single packet.
pub const MAX_PAYLOAD: usize = 20;

/// A bounded payload submitted by the application for transmission.
///
/// A message is immutable once handed to the engine; the engine copies it
/// into packets and back out, never mutating it.
///
/// # Examples
///
/// ```
/// # use otis_core::message::Message;
/// let message = Message::new("Body").unwrap();
/// assert_eq!(message.len(), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Message {
    bytes: Vec<u8>,
}

impl Message {
    /// Creates a new message with the given body content. Fails if the body
    /// exceeds [`MAX_PAYLOAD`] bytes.
    pub fn new(body: impl Into<Vec<u8>>) -> Result<Self, MessageTooLong> {
        let bytes = body.into();
        if bytes.len() > MAX_PAYLOAD {
            return Err(MessageTooLong(bytes.len()));
        }
        Ok(Self { bytes })
    }

    /// The length of the message.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the message contains no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns an iterator over the bytes of the message.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.bytes.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.iter() {
            write!(f, "{byte:x} ")?;
        }
        Ok(())
    }
}

/// The body handed to [`Message::new`] was longer than [`MAX_PAYLOAD`].
#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
#[error("payload of {0} bytes exceeds the maximum of {}", MAX_PAYLOAD)]
pub struct MessageTooLong(pub usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_message() {
        let body = b"body";
        let message = Message::new(*body).unwrap();
        assert_eq!(message.len(), body.len());
        assert_eq!(&message.to_vec(), body);
    }

    #[test]
    fn empty_message() {
        let message = Message::new("").unwrap();
        assert!(message.is_empty());
        assert_eq!(&message.to_vec(), b"");
    }

    #[test]
    fn at_the_bound() {
        let message = Message::new([7u8; MAX_PAYLOAD]).unwrap();
        assert_eq!(message.len(), MAX_PAYLOAD);
    }

    #[test]
    fn over_the_bound() {
        let result = Message::new([7u8; MAX_PAYLOAD + 1]);
        assert_eq!(result, Err(MessageTooLong(MAX_PAYLOAD + 1)));
    }
}
