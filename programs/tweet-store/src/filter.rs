//! Byte-offset filters over raw tweet accounts, the same predicate an RPC
//! node applies to `getProgramAccounts` memcmp filters.

use anchor_lang::prelude::*;
use anchor_lang::Discriminator;

use crate::state::{Tweet, AUTHOR_OFFSET, TOPIC_OFFSET};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memcmp {
    pub offset: usize,
    pub bytes: Vec<u8>,
}

impl Memcmp {
    pub fn new(offset: usize, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            offset,
            bytes: bytes.into(),
        }
    }

    pub fn discriminator() -> Self {
        Self::new(0, Tweet::discriminator().to_vec())
    }

    /// Tweets written by `author`.
    pub fn author(author: &Pubkey) -> Self {
        Self::new(AUTHOR_OFFSET, author.to_bytes().to_vec())
    }

    /// Tweets whose topic is exactly `topic`. The length prefix is part of
    /// the match, so the empty topic is four zero bytes.
    pub fn topic(topic: &str) -> Self {
        let mut bytes = (topic.len() as u32).to_le_bytes().to_vec();
        bytes.extend_from_slice(topic.as_bytes());
        Self::new(TOPIC_OFFSET, bytes)
    }

    pub fn matches(&self, data: &[u8]) -> bool {
        self.offset
            .checked_add(self.bytes.len())
            .and_then(|end| data.get(self.offset..end))
            .map_or(false, |window| window == self.bytes.as_slice())
    }
}

/// Keys of the tweet accounts that satisfy every filter. Accounts of other
/// types are skipped, as Anchor clients do when fetching `tweet.all()`.
pub fn scan<'a, I>(accounts: I, filters: &[Memcmp]) -> Vec<Pubkey>
where
    I: IntoIterator<Item = (&'a Pubkey, &'a [u8])>,
{
    let kind = Memcmp::discriminator();
    accounts
        .into_iter()
        .filter(|(_, data)| kind.matches(data) && filters.iter().all(|f| f.matches(data)))
        .map(|(key, _)| *key)
        .collect()
}
