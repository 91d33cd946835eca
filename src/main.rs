//! Domain WHOIS - look up registration dates and registrars from the command line

use domain_whois::{
    domain::default_lookup,
    types::DomainRecord,
    update_whois_servers, WhoisError,
};
use std::env;
use std::process;
use tracing_subscriber::EnvFilter;

/// How lookup results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Pretty,
    Json,
    Raw,
}

#[tokio::main]
async fn main() {
    // Initialize the library
    if let Err(e) = domain_whois::init() {
        eprintln!("❌ Failed to initialize: {}", e);
        process::exit(1);
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();

    let mut mode = OutputMode::Pretty;
    let mut update_servers = false;
    let mut domains = Vec::new();

    for arg in &args {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                return;
            }
            "--json" => mode = OutputMode::Json,
            "--raw" => mode = OutputMode::Raw,
            "--update-servers" => update_servers = true,
            flag if flag.starts_with('-') => {
                eprintln!("❌ Unknown option: {}", flag);
                print_usage();
                process::exit(2);
            }
            domain => domains.push(domain.to_string()),
        }
    }

    if update_servers {
        let config = default_lookup().config();
        if update_whois_servers(config).await {
            println!("✅ WHOIS server list saved to {}", config.servers_path.display());
            return;
        }
        eprintln!("⚠️  Failed to refresh the WHOIS server list from {}", config.servers_list_url);
        process::exit(1);
    }

    if domains.is_empty() {
        print_usage();
        process::exit(2);
    }

    let failed = match mode {
        OutputMode::Raw => print_raw(&domains).await,
        OutputMode::Json => print_json(&domains).await,
        OutputMode::Pretty => print_pretty(&domains).await,
    };

    if failed {
        process::exit(1);
    }
}

/// Print raw WHOIS text; returns whether any lookup failed
async fn print_raw(domains: &[String]) -> bool {
    let mut failed = false;
    for domain in domains {
        match default_lookup().get_raw_whois(domain).await {
            Ok(raw) => {
                if domains.len() > 1 {
                    println!("── {} ──", domain);
                }
                println!("{}", raw.trim_end());
            }
            Err(e) => {
                eprintln!("{}: {}", domain, e.user_message());
                failed = true;
            }
        }
    }
    failed
}

async fn print_json(domains: &[String]) -> bool {
    let results = default_lookup().get_domain_infos(domains).await;
    let failed = results.iter().any(|(_, r)| r.is_err());

    let entries: Vec<serde_json::Value> = results
        .into_iter()
        .map(|(domain, result)| match result {
            Ok(record) => serde_json::json!({ "input": domain, "record": record }),
            Err(e) => serde_json::json!({ "input": domain, "error": e.to_string() }),
        })
        .collect();

    match serde_json::to_string_pretty(&entries) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("{}", WhoisError::from(e).user_message());
            return true;
        }
    }
    failed
}

async fn print_pretty(domains: &[String]) -> bool {
    let check_start = std::time::Instant::now();
    let results = default_lookup().get_domain_infos(domains).await;
    let mut failed = false;

    for (domain, result) in &results {
        match result {
            Ok(Some(record)) => display_record(record),
            Ok(None) => println!("❔ {} - no registration dates in WHOIS response", domain),
            Err(e) => {
                eprintln!("{}: {}", domain, e.user_message());
                failed = true;
            }
        }
        println!();
    }

    if results.len() > 1 {
        println!("📊 Total checked: {}", results.len());
        println!("⏱️  Total time: {:.2}s", check_start.elapsed().as_secs_f32());
    }
    failed
}

fn display_record(record: &DomainRecord) {
    println!("🌐 {}", record.domain);
    println!("   🛰️  Server:     {}", record.whois_server);
    if let Some(start) = record.start_time {
        println!("   📅 Registered: {}", start);
    }
    if let Some(expire) = record.expire_time {
        print!("   ⌛ Expires:    {}", expire);
        if let Some(days) = record.days_until_expiry(chrono::Local::now().naive_local()) {
            if days < 0 {
                print!(" (expired {} days ago)", -days);
            } else {
                print!(" ({} days left)", days);
            }
        }
        println!();
    }
    if let Some(registrar) = &record.registrar {
        println!("   🏢 Registrar:  {}", registrar);
    }
    if let Some(url) = &record.registrar_url {
        println!("   🔗 URL:        {}", url);
    }
}

fn print_usage() {
    eprintln!("USAGE:");
    eprintln!("    domain-whois [OPTIONS] <DOMAIN>...");
    eprintln!();
    eprintln!("Run `domain-whois --help` for more information.");
}

/// Print help information
fn print_help() {
    println!("🔎 Domain WHOIS - registration dates and registrars over WHOIS");
    println!("═══════════════════════════════════════════════════════════════");
    println!();
    println!("USAGE:");
    println!("    domain-whois [OPTIONS] <DOMAIN>...");
    println!();
    println!("OPTIONS:");
    println!("    --json             Print records as JSON");
    println!("    --raw              Print the raw WHOIS response");
    println!("    --update-servers   Refresh the TLD to WHOIS server list and exit");
    println!("    -h, --help         Print this help");
    println!();
    println!("EXAMPLES:");
    println!("    domain-whois baidu.com");
    println!("    domain-whois https://www.example.co.uk/path --json");
    println!("    domain-whois 例子.中国 --raw");
    println!();
    println!("ENVIRONMENT VARIABLES:");
    println!("    WHOIS_TIMEOUT_SECS     Per-query timeout in seconds (default: 10)");
    println!("    WHOIS_ROOT_SERVER      Root referral server (default: whois.iana.org)");
    println!("    WHOIS_SERVERS_PATH     Local server list file");
    println!("    WHOIS_SERVERS_URL      Server list download URL");
    println!("    WHOIS_OVERRIDES_PATH   JSON file of per-TLD overrides");
    println!("    WHOIS_CONCURRENCY      Parallel lookups (default: 10)");
    println!("    WHOIS_CACHE_REFERRALS  Remember root referrals (default: false)");
    println!("    RUST_LOG               Log filter (default: warn)");
}
