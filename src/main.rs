use std::process::ExitCode;

use anyhow::Result;
use clap::{error::ErrorKind, Parser};
use log::debug;
use randmac_lib::{
    generate_mac, seeded_rng, AddressFlags, MacConfig, PrefixSource, RANDOM_DEVICE,
};

/// Generate a random MAC address or EUI-64 identifier
#[derive(Parser, Debug)]
#[command(version, about, long_about = None, args_override_self = true)]
struct Args {
    /// Locally administered address
    #[arg(short, long)]
    local: bool,

    /// Globally unique address
    #[arg(short, long)]
    global: bool,

    /// Unicast address
    #[arg(short, long)]
    unicast: bool,

    /// Multicast address
    #[arg(short, long)]
    multicast: bool,

    /// Print hex digits in uppercase
    #[arg(short = 'U', long)]
    uppercase: bool,

    /// Generate an EUI-64 identifier
    #[arg(short, long)]
    eui64: bool,

    /// Use the qemu OUI 52:54:00
    #[arg(short, long, overrides_with_all = ["xen", "oui"])]
    qemu: bool,

    /// Use the xen OUI 00:16:3e
    #[arg(short, long, overrides_with_all = ["qemu", "oui"])]
    xen: bool,

    /// Use this OUI (xx:xx:xx, 1-6 hex digits, qemu or xen)
    #[arg(short, long, value_name = "OUI_ADDR", overrides_with_all = ["qemu", "xen"])]
    oui: Option<String>,

    /// Pick an OUI registered to a vendor whose name starts with VENDOR
    #[arg(short, long)]
    vendor: Option<String>,
}

impl From<Args> for MacConfig {
    fn from(args: Args) -> Self {
        let oui = if args.qemu {
            Some("qemu".to_owned())
        } else if args.xen {
            Some("xen".to_owned())
        } else {
            args.oui
        };

        MacConfig {
            prefix: PrefixSource::new(oui, args.vendor),
            flags: AddressFlags {
                local: args.local,
                global: args.global,
                unicast: args.unicast,
                multicast: args.multicast,
                eui64: args.eui64,
            },
            uppercase: args.uppercase,
            ..Default::default()
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = MacConfig::from(args);
    debug!("{config:?}");

    let mut rng = seeded_rng(RANDOM_DEVICE)?;
    let mac = generate_mac(&config, &mut rng)?;
    println!("{mac}");
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("warn"));

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code: u8 = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            // Nowhere left to report a failed write to stderr.
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("randmac: {e:#}");
            ExitCode::from(2)
        }
    }
}
