//! Tweet account layout.
//!
//! Off-chain readers filter tweets with `memcmp` at [`AUTHOR_OFFSET`] and
//! [`TOPIC_OFFSET`], so field order and the widths of the fixed fields are
//! part of the public contract. Changing either needs a new account type
//! (and therefore a new discriminator).

use anchor_lang::prelude::*;
use anchor_lang::Discriminator;

use crate::error::ErrorCode;

pub const DISCRIMINATOR_LENGTH: usize = 8;
pub const PUBLIC_KEY_LENGTH: usize = std::mem::size_of::<Pubkey>();
pub const TIMESTAMP_LENGTH: usize = std::mem::size_of::<i64>();
pub const STRING_LENGTH_PREFIX: usize = std::mem::size_of::<u32>();

/// Topic limit, in bytes.
pub const MAX_TOPIC_LENGTH: usize = 50;
/// Content limit, in bytes.
pub const MAX_CONTENT_LENGTH: usize = 280;

pub const AUTHOR_OFFSET: usize = DISCRIMINATOR_LENGTH;
pub const TIMESTAMP_OFFSET: usize = AUTHOR_OFFSET + PUBLIC_KEY_LENGTH;
/// Offset of the topic's length prefix.
pub const TOPIC_OFFSET: usize = TIMESTAMP_OFFSET + TIMESTAMP_LENGTH;

const HEADER_LENGTH: usize = TOPIC_OFFSET;

#[account]
#[derive(Debug, PartialEq, Eq)]
pub struct Tweet {
    pub author: Pubkey,
    pub timestamp: i64,
    pub topic: String,
    pub content: String,
}

impl Tweet {
    /// Account size when both strings are at their limits.
    pub const MAX_LEN: usize = HEADER_LENGTH
        + STRING_LENGTH_PREFIX
        + MAX_TOPIC_LENGTH
        + STRING_LENGTH_PREFIX
        + MAX_CONTENT_LENGTH;

    /// Exact encoded size of a tweet carrying `topic` and `content`.
    pub fn size_of(topic: &str, content: &str) -> usize {
        HEADER_LENGTH + STRING_LENGTH_PREFIX + topic.len() + STRING_LENGTH_PREFIX + content.len()
    }

    /// Encodes the account exactly as Anchor's `AccountSerialize` would:
    /// discriminator, author, timestamp, then the two borsh strings.
    pub fn encode(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(Self::size_of(&self.topic, &self.content));
        data.extend_from_slice(&Self::discriminator());
        data.extend_from_slice(self.author.as_ref());
        data.extend_from_slice(&self.timestamp.to_le_bytes());
        put_string(&mut data, &self.topic);
        put_string(&mut data, &self.content);
        data
    }

    /// Decodes account data. Bytes after the content are ignored, since a
    /// slot may have been allocated larger than the record it holds.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let discriminator = data
            .get(..DISCRIMINATOR_LENGTH)
            .ok_or(ErrorCode::DiscriminatorMismatch)?;
        require!(
            discriminator == &Self::discriminator()[..],
            ErrorCode::DiscriminatorMismatch
        );

        let mut reader = Reader {
            data,
            offset: AUTHOR_OFFSET,
        };
        Ok(Self {
            author: Pubkey::new_from_array(reader.array()?),
            timestamp: i64::from_le_bytes(reader.array()?),
            topic: reader.string()?,
            content: reader.string()?,
        })
    }
}

fn put_string(data: &mut Vec<u8>, value: &str) {
    data.extend_from_slice(&(value.len() as u32).to_le_bytes());
    data.extend_from_slice(value.as_bytes());
}

struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .offset
            .checked_add(len)
            .ok_or(ErrorCode::FieldOutOfBounds)?;
        let bytes = self
            .data
            .get(self.offset..end)
            .ok_or(ErrorCode::FieldOutOfBounds)?;
        self.offset = end;
        Ok(bytes)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn string(&mut self) -> Result<String> {
        let len = u32::from_le_bytes(self.array()?) as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| error!(ErrorCode::InvalidUtf8))
    }
}
