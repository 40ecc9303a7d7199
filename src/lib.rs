//! Issue and verify compact JSON Web Tokens signed with a shared secret.
//!
//! A [TokenCodec] binds a [Signer] and a [Secret] and turns claims into
//! `<header>.<claims>.<signature>` tokens and back, rejecting forged, malformed or expired ones.

pub mod clock;
pub mod commands;
pub mod config;
pub mod jwt;
pub mod parameters;
pub mod secret;

pub use clock::{Clock, SystemClock};
pub use jwt::{
    Algorithm, Claim, HmacSigner, MapClaims, RegisteredClaims, Signer, TokenCodec, TokenError,
};
pub use secret::Secret;
