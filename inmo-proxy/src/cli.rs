use std::env;
use std::net::SocketAddr;
use std::process;

use getopts::Options;
use tokio::time::Duration;
use url::Url;

pub struct Args {
    pub address: SocketAddr,
    pub upstream: String,
    pub enable_cache: bool,
    pub cache_ttl: Duration,
    pub refresh_delay: Duration,
}

fn opts() -> Options {
    let mut opts = Options::new();
    opts.optflag(
        "h",
        "help",
        concat!("Print the help output of ", env!("CARGO_PKG_NAME")),
    );
    opts.optopt(
        "a",
        "address",
        "Socket address (IP and port) to listen on [Default: 127.0.0.1:8080]",
        "SOCKET_ADDRESS",
    );
    opts.optopt(
        "u",
        "upstream",
        "Base URL of the CRM backend [Default: http://127.0.0.1:8000]",
        "URL",
    );
    opts.optflag(
        "c",
        "enable-cache",
        "Enable caching of backend snapshots [Default: false]",
    );
    opts.optopt(
        "t",
        "cache-ttl",
        "Time-to-live for cached snapshots [Default: 60]",
        "SECONDS",
    );
    opts.optopt(
        "d",
        "refresh-delay",
        "Trailing-edge delay before a /refresh burst hits the backend [Default: 500]",
        "MILLISECONDS",
    );
    opts
}

pub fn parse(args: Vec<String>) -> Args {
    let opts = opts();

    let matches = match opts.parse(args) {
        Ok(matches) => matches,
        Err(fail) => {
            eprintln!("{fail}");
            process::exit(1);
        }
    };

    if matches.opt_present("help") {
        println!("{}", opts.usage(&opts.short_usage(env!("CARGO_PKG_NAME"))));
        process::exit(0);
    }

    let address = match matches.opt_get_default("address", SocketAddr::from(([127, 0, 0, 1], 8080)))
    {
        Ok(address) => address,
        Err(err) => {
            eprintln!("Provided value for option 'address' is invalid: {err}");
            process::exit(1);
        }
    };

    let upstream = matches
        .opt_str("upstream")
        .unwrap_or_else(|| "http://127.0.0.1:8000".to_string());

    if let Err(err) = Url::parse(&upstream) {
        eprintln!("Provided value for option 'upstream' is invalid: {err}");
        process::exit(1);
    }

    let enable_cache = matches.opt_present("enable-cache");

    let cache_ttl = match matches.opt_get_default("cache-ttl", 60) {
        Ok(secs) => Duration::from_secs(secs),
        Err(err) => {
            eprintln!("Provided value for option 'cache-ttl' is invalid: {err}");
            process::exit(1);
        }
    };

    let refresh_delay = match matches.opt_get_default("refresh-delay", 500) {
        Ok(millis) => Duration::from_millis(millis),
        Err(err) => {
            eprintln!("Provided value for option 'refresh-delay' is invalid: {err}");
            process::exit(1);
        }
    };

    Args {
        address,
        upstream,
        enable_cache,
        cache_ttl,
        refresh_delay,
    }
}
