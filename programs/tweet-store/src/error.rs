use anchor_lang::prelude::*;

// Variant order fixes the on-chain error codes (6000, 6001, ...). Append only.
#[error_code]
pub enum ErrorCode {
    #[msg("Topic length can't be more than 50")]
    TopicTooLong,
    #[msg("Content length can't be more than 280")]
    ContentTooLong,
    #[msg("Content can't be empty")]
    ContentEmpty,
    #[msg("Author must sign the transaction")]
    Unauthorized,
    #[msg("Tweet account is already in use")]
    AlreadyInitialized,
    #[msg("Account data is not a tweet")]
    DiscriminatorMismatch,
    #[msg("Tweet field runs past the end of the account data")]
    FieldOutOfBounds,
    #[msg("Tweet text is not valid UTF-8")]
    InvalidUtf8,
}
