use anchor_lang::prelude::*;

pub mod error;
pub mod filter;
pub mod processor;
pub mod runtime;
pub mod state;

use processor::SendTweetRequest;
use runtime::{SignerSet, SysvarClock, SystemAllocator};

declare_id!("H4FBVtcR7yKNWJWnwK6wwEtREYaF5Vi6w9R1uHZXRw7F");

#[program]
pub mod tweet_store {
    use super::*;

    pub fn send_tweet(ctx: Context<SendTweet>, topic: String, content: String) -> Result<()> {
        let author = ctx.accounts.author.to_account_info();
        let tweet = ctx.accounts.tweet.to_account_info();
        let system_program = ctx.accounts.system_program.to_account_info();

        let request = SendTweetRequest {
            slot: tweet.key(),
            author: author.key(),
            topic,
            content,
        };
        let signers = [author, tweet];
        let mut allocator = SystemAllocator {
            payer: &signers[0],
            slot: &signers[1],
            system_program: &system_program,
            owner: ctx.program_id,
        };

        processor::create_tweet(&SysvarClock, &SignerSet::new(&signers), &mut allocator, request)?;
        Ok(())
    }
}

#[derive(Accounts)]
pub struct SendTweet<'info> {
    /// CHECK: must be vacant; created and written by `processor::create_tweet`.
    #[account(mut)]
    pub tweet: UncheckedAccount<'info>,
    /// CHECK: signature is verified by `processor::create_tweet`, which pays
    /// rent from this account.
    #[account(mut)]
    pub author: UncheckedAccount<'info>,
    pub system_program: Program<'info, System>,
}
