use crate::clock::Clock;
use crate::commands::CommandError;
use crate::jwt::claims::MapClaims;
use crate::jwt::codec::TokenCodec;
use crate::jwt::signer::HmacSigner;

pub struct DecodeCommand<'s, K>
where
    K: Clock,
{
    codec: TokenCodec<'s, MapClaims, HmacSigner, K>,
}

impl<'s, K> DecodeCommand<'s, K>
where
    K: Clock,
{
    pub fn new(codec: TokenCodec<'s, MapClaims, HmacSigner, K>) -> Self {
        Self { codec }
    }

    /// Verifies `token` and returns its claims as pretty printed JSON.
    pub fn decode(&self, token: &str) -> Result<String, CommandError> {
        let claims = self.codec.decode(token.trim())?;
        serde_json::to_string_pretty(&claims).map_err(|e| CommandError::Output(e.to_string()))
    }
}
