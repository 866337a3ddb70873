use clap::Parser;
use skerry_cid::{Cid, MultibaseEncoding, Version};
use std::process::ExitCode;
use tracing::error;

/// `skerry-inspect` decodes a CID and prints its fields
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The CID to decode, as multibase text (e.g. "bafy...", "Qm...")
    /// or as hexadecimal CID bytes with --hex
    cid: String,

    /// Treat the input as hex-encoded raw CID bytes rather than text
    #[arg(long)]
    hex: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    setup_logging();

    let result = if args.hex {
        Cid::from_hex(&args.cid)
    } else {
        args.cid.parse()
    };

    let cid = match result {
        Ok(cid) => cid,
        Err(err) => {
            error!("Could not decode {:?}: {}", args.cid, err);
            return ExitCode::FAILURE;
        }
    };

    if !args.hex {
        let (encoding, _) = MultibaseEncoding::classify(&args.cid);
        println!("Multibase:     {:?}", encoding);
    }
    println!("Version:       {}", u64::from(cid.version()));
    println!("Codec:         {}", describe(cid.codec(), codec_name(cid.codec())));
    println!(
        "Hash function: {}",
        describe(cid.hash_function(), hash_name(cid.hash_function()))
    );
    println!("Digest length: {} bytes", cid.digest_len());
    println!("Digest:        {}", hex::encode(cid.digest()));
    println!("Raw CID bytes: {}", cid.to_hex());
    if cid.version() == Version::V0 {
        println!("Note:          legacy v0 CID, codec and hash are implicit");
    }

    ExitCode::SUCCESS
}

fn describe(code: u64, name: Option<&str>) -> String {
    match name {
        Some(name) => format!("0x{:02x} ({})", code, name),
        None => format!("0x{:02x}", code),
    }
}

/// Well-known multicodec ids, for readable output
fn codec_name(code: u64) -> Option<&'static str> {
    match code {
        0x55 => Some("raw"),
        0x70 => Some("dag-pb"),
        0x71 => Some("dag-cbor"),
        0x0129 => Some("dag-json"),
        0x0200 => Some("json"),
        _ => None,
    }
}

/// Well-known multihash ids, for readable output
fn hash_name(code: u64) -> Option<&'static str> {
    match code {
        0x00 => Some("identity"),
        0x11 => Some("sha1"),
        0x12 => Some("sha2-256"),
        0x13 => Some("sha2-512"),
        0x1E => Some("blake3"),
        0xB220 => Some("blake2b-256"),
        _ => None,
    }
}

fn setup_logging() {
    use tracing_subscriber::FmtSubscriber;

    const DEFAULT_LOGGING: &str = "skerry_inspect=info,warn";

    let rust_log = std::env::var("RUST_LOG")
        .ok()
        .and_then(|s| if s.is_empty() { None } else { Some(s) })
        .unwrap_or_else(|| DEFAULT_LOGGING.to_owned());

    tracing::subscriber::set_global_default(
        FmtSubscriber::builder().with_env_filter(rust_log).finish(),
    )
    .expect("tracing setup failed");
}
