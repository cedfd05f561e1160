use anchor_lang::prelude::*;

use crate::error::ErrorCode;
use crate::runtime::{Allocator, Authorizer, Clock};
use crate::state::{Tweet, MAX_CONTENT_LENGTH, MAX_TOPIC_LENGTH};

/// A request to create a tweet at a fresh slot.
#[derive(Debug, Clone)]
pub struct SendTweetRequest {
    pub slot: Pubkey,
    pub author: Pubkey,
    pub topic: String,
    pub content: String,
}

/// Validates `request` and persists the new tweet at `request.slot`.
///
/// Checks run in a fixed order and the first failure is returned:
/// author signature, slot vacancy (the author's own key never qualifies),
/// topic length, then content length.
/// Nothing is allocated unless every check passes.
pub fn create_tweet<C, A, L>(
    clock: &C,
    authorizer: &A,
    allocator: &mut L,
    request: SendTweetRequest,
) -> Result<Tweet>
where
    C: Clock + ?Sized,
    A: Authorizer + ?Sized,
    L: Allocator + ?Sized,
{
    let SendTweetRequest {
        slot,
        author,
        topic,
        content,
    } = request;

    require!(authorizer.has_signed(&author), ErrorCode::Unauthorized);
    // The author's wallet is never a fresh slot, even though it looks vacant.
    require_keys_neq!(slot, author, ErrorCode::AlreadyInitialized);
    require!(allocator.is_vacant(&slot), ErrorCode::AlreadyInitialized);
    validate(&topic, &content)?;

    let tweet = Tweet {
        author,
        timestamp: clock.unix_timestamp()?,
        topic,
        content,
    };
    let data = tweet.encode();
    allocator.allocate(&slot, &data)?;

    msg!("Tweet {} sent by {} ({} bytes)", slot, author, data.len());
    Ok(tweet)
}

/// Field limits, measured in bytes.
pub fn validate(topic: &str, content: &str) -> Result<()> {
    require!(topic.len() <= MAX_TOPIC_LENGTH, ErrorCode::TopicTooLong);
    require!(!content.is_empty(), ErrorCode::ContentEmpty);
    require!(content.len() <= MAX_CONTENT_LENGTH, ErrorCode::ContentTooLong);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use proptest::prelude::*;

    struct FixedClock(i64);

    impl Clock for FixedClock {
        fn unix_timestamp(&self) -> Result<i64> {
            Ok(self.0)
        }
    }

    struct Signers(Vec<Pubkey>);

    impl Authorizer for Signers {
        fn has_signed(&self, identity: &Pubkey) -> bool {
            self.0.contains(identity)
        }
    }

    #[derive(Default)]
    struct Slots(BTreeMap<Pubkey, Vec<u8>>);

    impl Allocator for Slots {
        fn is_vacant(&self, slot: &Pubkey) -> bool {
            !self.0.contains_key(slot)
        }

        fn allocate(&mut self, slot: &Pubkey, data: &[u8]) -> Result<()> {
            self.0.insert(*slot, data.to_vec());
            Ok(())
        }
    }

    fn request(author: Pubkey, topic: &str, content: &str) -> SendTweetRequest {
        SendTweetRequest {
            slot: Pubkey::new_unique(),
            author,
            topic: topic.to_string(),
            content: content.to_string(),
        }
    }

    fn send(signers: &[Pubkey], slots: &mut Slots, request: SendTweetRequest) -> Result<Tweet> {
        create_tweet(
            &FixedClock(1_650_000_000),
            &Signers(signers.to_vec()),
            slots,
            request,
        )
    }

    #[test]
    fn stores_exactly_the_encoded_tweet() {
        let author = Pubkey::new_unique();
        let mut slots = Slots::default();
        let req = request(author, "Crypto", "WGMI!!");
        let slot = req.slot;

        let tweet = send(&[author], &mut slots, req).unwrap();

        assert_eq!(tweet.author, author);
        assert_eq!(tweet.timestamp, 1_650_000_000);
        let stored = &slots.0[&slot];
        assert_eq!(stored.len(), Tweet::size_of("Crypto", "WGMI!!"));
        assert_eq!(Tweet::decode(stored).unwrap(), tweet);
    }

    #[test]
    fn limits_are_inclusive() {
        let author = Pubkey::new_unique();
        let mut slots = Slots::default();
        let topic = "x".repeat(MAX_TOPIC_LENGTH);
        let content = "x".repeat(MAX_CONTENT_LENGTH);

        send(&[author], &mut slots, request(author, &topic, &content)).unwrap();
        send(&[author], &mut slots, request(author, "", "x")).unwrap();
        assert_eq!(slots.0.len(), 2);
    }

    #[test]
    fn limits_count_bytes_not_characters() {
        // 26 two-byte characters: 52 bytes.
        let topic = "é".repeat(26);
        assert_eq!(
            validate(&topic, "hi").unwrap_err(),
            error!(ErrorCode::TopicTooLong)
        );
    }

    #[test]
    fn rejects_over_limit_and_empty_fields() {
        let topic_51 = "x".repeat(51);
        let content_281 = "x".repeat(281);

        assert_eq!(
            validate(&topic_51, "hi").unwrap_err(),
            error!(ErrorCode::TopicTooLong)
        );
        assert_eq!(
            validate("", &content_281).unwrap_err(),
            error!(ErrorCode::ContentTooLong)
        );
        assert_eq!(
            validate("", "").unwrap_err(),
            error!(ErrorCode::ContentEmpty)
        );
    }

    #[test]
    fn unsigned_author_is_unauthorized() {
        let author = Pubkey::new_unique();
        let someone_else = Pubkey::new_unique();
        let mut slots = Slots::default();

        let err = send(&[someone_else], &mut slots, request(author, "", "hi")).unwrap_err();
        assert_eq!(err, error!(ErrorCode::Unauthorized));
        assert!(slots.0.is_empty());
    }

    #[test]
    fn occupied_slot_is_never_overwritten() {
        let author = Pubkey::new_unique();
        let mut slots = Slots::default();
        let first = request(author, "first", "one");
        let slot = first.slot;
        send(&[author], &mut slots, first).unwrap();
        let before = slots.0[&slot].clone();

        let second = SendTweetRequest {
            slot,
            ..request(author, "second", "two")
        };
        let err = send(&[author], &mut slots, second).unwrap_err();

        assert_eq!(err, error!(ErrorCode::AlreadyInitialized));
        assert_eq!(slots.0[&slot], before);
    }

    #[test]
    fn author_wallet_is_not_a_slot() {
        let author = Pubkey::new_unique();
        let mut slots = Slots::default();
        let req = SendTweetRequest {
            slot: author,
            ..request(author, "Crypto", "WGMI!!")
        };

        let err = send(&[author], &mut slots, req).unwrap_err();

        assert_eq!(err, error!(ErrorCode::AlreadyInitialized));
        assert!(slots.0.is_empty());
    }

    #[test]
    fn first_failed_check_wins() {
        let author = Pubkey::new_unique();
        let mut slots = Slots::default();
        let bad = request(author, &"x".repeat(51), &"x".repeat(281));
        let slot = bad.slot;

        let err = send(&[], &mut slots, bad.clone()).unwrap_err();
        assert_eq!(err, error!(ErrorCode::Unauthorized));

        slots.0.insert(slot, vec![0]);
        let err = send(&[author], &mut slots, bad.clone()).unwrap_err();
        assert_eq!(err, error!(ErrorCode::AlreadyInitialized));

        slots.0.clear();
        let err = send(&[author], &mut slots, bad).unwrap_err();
        assert_eq!(err, error!(ErrorCode::TopicTooLong));
        assert!(slots.0.is_empty());
    }

    proptest! {
        #[test]
        fn valid_inputs_are_always_accepted(topic in ".{0,12}", content in ".{1,70}") {
            let author = Pubkey::new_unique();
            let mut slots = Slots::default();
            let req = request(author, &topic, &content);
            let slot = req.slot;

            let tweet = send(&[author], &mut slots, req).unwrap();

            prop_assert_eq!(&tweet.topic, &topic);
            prop_assert_eq!(&tweet.content, &content);
            prop_assert_eq!(Tweet::decode(&slots.0[&slot]).unwrap(), tweet);
        }
    }
}
