use crate::clock::Clock;
use crate::commands::CommandError;
use crate::jwt::claims::MapClaims;
use crate::jwt::codec::TokenCodec;
use crate::jwt::signer::HmacSigner;

pub struct EncodeCommand<'s, K>
where
    K: Clock,
{
    codec: TokenCodec<'s, MapClaims, HmacSigner, K>,
}

impl<'s, K> EncodeCommand<'s, K>
where
    K: Clock,
{
    pub fn new(codec: TokenCodec<'s, MapClaims, HmacSigner, K>) -> Self {
        Self { codec }
    }

    pub fn encode(&self, claims: &MapClaims) -> Result<String, CommandError> {
        Ok(self.codec.encode(claims)?)
    }
}
