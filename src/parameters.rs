use chrono::{DateTime, TimeDelta, Utc};
use clap::{Args, Subcommand, ValueEnum};
use serde_json::Value;
use std::path::PathBuf;

use crate::config::SecretConfig;
use crate::jwt::claims::{ClaimsError, MapClaims, RegisteredClaims};
use crate::jwt::signer::Algorithm;

pub const DEFAULT_TTL_SECONDS: u32 = 3600;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Issues a token signed with the shared secret.
    Encode {
        #[command(flatten)]
        signing: SigningArgs,

        #[command(flatten)]
        claims: ClaimArgs,
    },
    /// Verifies a token and prints its claims as JSON.
    ///
    /// Fails if the signature does not match, the token is malformed or it has expired.
    Decode {
        /// Token to verify
        token: String,

        #[command(flatten)]
        signing: SigningArgs,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum AlgorithmArg {
    /// HMAC using SHA-256
    #[value(name = "HS256")]
    HS256,
    /// HMAC using SHA-384
    #[value(name = "HS384")]
    HS384,
    /// HMAC using SHA-512
    #[value(name = "HS512")]
    HS512,
}

impl From<AlgorithmArg> for Algorithm {
    fn from(value: AlgorithmArg) -> Self {
        match value {
            AlgorithmArg::HS256 => Algorithm::HS256,
            AlgorithmArg::HS384 => Algorithm::HS384,
            AlgorithmArg::HS512 => Algorithm::HS512,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct SigningArgs {
    /// Keyed-hash algorithm used to sign or verify
    #[arg(long, short, value_enum, default_value_t = AlgorithmArg::HS256)]
    algorithm: AlgorithmArg,

    /// Shared secret. Prefer `--secret-file` or `NR_JWT_SECRET` to keep it out of the shell history
    #[arg(long, conflicts_with = "secret_file")]
    secret: Option<String>,

    /// Path to a file holding the shared secret
    #[arg(long)]
    secret_file: Option<PathBuf>,
}

impl SigningArgs {
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm.into()
    }

    pub fn secret_config(&self) -> SecretConfig {
        SecretConfig::new(self.secret.clone(), self.secret_file.clone())
    }
}

#[derive(Args, Debug, Clone)]
pub struct ClaimArgs {
    /// Subject of the token (`sub`)
    #[arg(long, short)]
    subject: Option<String>,

    /// Issuer of the token (`iss`)
    #[arg(long, short)]
    issuer: Option<String>,

    /// Intended audience of the token (`aud`)
    #[arg(long)]
    audience: Option<String>,

    /// Seconds until the token expires
    #[arg(long, default_value_t = DEFAULT_TTL_SECONDS)]
    ttl: u32,

    /// Additional claim as `key=value`. The value is parsed as JSON, falling back to a plain string
    #[arg(long = "claim", value_parser = parse_claim)]
    claims: Vec<(String, Value)>,
}

impl ClaimArgs {
    /// Builds the claim set of a token issued at `now`, with a fresh `jti`.
    pub fn build(self, now: DateTime<Utc>) -> Result<MapClaims, ClaimsError> {
        let mut registered = RegisteredClaims::issued_at(now, TimeDelta::seconds(self.ttl.into()))?;
        registered.iss = self.issuer;
        registered.sub = self.subject;
        registered.aud = self.audience;

        let mut claims = MapClaims::from_claims(&registered)?;
        for (key, value) in self.claims {
            claims.insert(key, value)?;
        }
        Ok(claims)
    }
}

fn parse_claim(s: &str) -> Result<(String, Value), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid claim `{s}`: expected `key=value`"))?;
    if key.is_empty() {
        return Err(format!("invalid claim `{s}`: empty key"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::claims::Claim;
    use assert_matches::assert_matches;
    use clap::Parser;
    use rstest::rstest;
    use serde_json::json;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(subcommand)]
        command: Commands,
    }

    #[rstest]
    #[case("admin=true", "admin", json!(true))]
    #[case("level=3", "level", json!(3))]
    #[case("roles=[\"a\",\"b\"]", "roles", json!(["a", "b"]))]
    #[case("team=platform", "team", json!("platform"))]
    #[case("expr=a=b", "expr", json!("a=b"))]
    #[case("empty=", "empty", json!(""))]
    fn parse_claims(#[case] input: &str, #[case] key: &str, #[case] value: Value) {
        assert_eq!(parse_claim(input).unwrap(), (key.to_string(), value));
    }

    #[rstest]
    #[case("no-separator")]
    #[case("=value")]
    fn parse_invalid_claims(#[case] input: &str) {
        assert!(parse_claim(input).is_err());
    }

    #[test]
    fn encode_arguments() {
        let cli = TestCli::try_parse_from([
            "nr-jwt", "encode", "--algorithm", "HS512", "--secret", "secret", "--subject", "1",
            "--ttl", "10", "--claim", "admin=true",
        ])
        .unwrap();

        assert_matches!(cli.command, Commands::Encode { signing, claims } => {
            assert_eq!(signing.algorithm(), Algorithm::HS512);

            let now = DateTime::from_timestamp(1700000000, 0).unwrap();
            let claims = claims.build(now).unwrap();
            assert_eq!(claims.expires_at(), 1700000010);
            assert_eq!(claims.get("sub"), Some(&json!("1")));
            assert_eq!(claims.get("iat"), Some(&json!(1700000000)));
            assert_eq!(claims.get("admin"), Some(&json!(true)));
            assert!(claims.get("jti").is_some());
            assert!(claims.get("iss").is_none());
        });
    }

    #[test]
    fn decode_arguments_default_algorithm() {
        let cli = TestCli::try_parse_from(["nr-jwt", "decode", "a.b.c", "--secret-file", "/tmp/s"])
            .unwrap();

        assert_matches!(cli.command, Commands::Decode { token, signing } => {
            assert_eq!(token, "a.b.c");
            assert_eq!(signing.algorithm(), Algorithm::HS256);
        });
    }

    #[test]
    fn secret_sources_conflict() {
        let result = TestCli::try_parse_from([
            "nr-jwt", "decode", "a.b.c", "--secret", "s", "--secret-file", "/tmp/s",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_algorithm() {
        let result =
            TestCli::try_parse_from(["nr-jwt", "decode", "a.b.c", "--algorithm", "none"]);
        assert!(result.is_err());
    }

    #[test]
    fn expiry_cannot_be_overridden() {
        let cli = TestCli::try_parse_from(["nr-jwt", "encode", "--claim", "exp=0"]).unwrap();

        assert_matches!(cli.command, Commands::Encode { claims, .. } => {
            assert_matches!(claims.build(Utc::now()), Err(ClaimsError::ReservedClaim(_)));
        });
    }
}
