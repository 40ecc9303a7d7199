use chrono::Utc;
use clap::Parser;
use nr_jwt::commands::decode::DecodeCommand;
use nr_jwt::commands::encode::EncodeCommand;
use nr_jwt::jwt::codec::TokenCodec;
use nr_jwt::jwt::signer::HmacSigner;
use nr_jwt::parameters::Commands;
use std::error::Error;
use std::io;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "nr-jwt", about = "Issue and verify HMAC signed JSON Web Tokens")]
struct Cli {
    /// Print debug logs to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            Level::DEBUG
        } else {
            Level::WARN
        })
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Encode { signing, claims } => {
            let secret = signing.secret_config().resolve()?;
            let claims = claims.build(Utc::now())?;
            let codec = TokenCodec::new(HmacSigner::new(signing.algorithm()), &secret);
            let token = EncodeCommand::new(codec).encode(&claims)?;
            println!("{token}");
            Ok(())
        }
        Commands::Decode { token, signing } => {
            let secret = signing.secret_config().resolve()?;
            let codec = TokenCodec::new(HmacSigner::new(signing.algorithm()), &secret);
            let claims = DecodeCommand::new(codec).decode(&token)?;
            println!("{claims}");
            Ok(())
        }
    }
}
