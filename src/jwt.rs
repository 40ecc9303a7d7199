pub mod claims;
pub mod codec;
pub mod error;
pub mod header;
pub mod signer;

pub use claims::{Claim, MapClaims, RegisteredClaims};
pub use codec::TokenCodec;
pub use error::TokenError;
pub use signer::{Algorithm, HmacSigner, Signer};
