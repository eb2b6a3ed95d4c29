use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use mxprovider_lib::ResolverOptions;
use mxprovider_lib::patterns::DEFAULT_PATTERNS_FILE;

#[derive(Parser)]
#[command(
    name = "mxprovider-cli",
    about = "Classe des domaines par fournisseur MX (enregistrements MX de meilleure priorité)"
)]
pub struct Cli {
    /// fichier source (e-mails et/ou domaines); demandé sur stdin si absent
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// table CSV des motifs fournisseurs (par défaut provider_patterns.csv à côté du binaire)
    #[arg(long)]
    pub patterns: Option<PathBuf>,

    /// serveur DNS à interroger (ex: 8.8.8.8, 1.1.1.1:53, dns.example.net)
    #[arg(long)]
    pub nameserver: Option<String>,

    /// timeout DNS en secondes, par requête
    #[arg(long, default_value = "4.0", value_parser = parse_timeout)]
    pub timeout: Duration,

    /// nombre de résolutions simultanées
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u16).range(1..))]
    pub workers: u16,

    /// répertoire des rapports CSV
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// format du résumé: human|json
    #[arg(long, default_value = "human", value_parser = ["human", "json"])]
    pub format: String,

    /// verbosité des logs (-v info, -vv debug); RUST_LOG prend le pas
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn resolver_options(&self) -> ResolverOptions {
        let options = ResolverOptions::new()
            .with_timeout(self.timeout)
            .with_workers(usize::from(self.workers));
        match &self.nameserver {
            Some(nameserver) => options.with_nameserver(nameserver.clone()),
            None => options,
        }
    }

    pub fn patterns_path(&self) -> PathBuf {
        self.patterns.clone().unwrap_or_else(default_patterns_path)
    }

    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

/// Next to the executable when present there, else the working directory.
fn default_patterns_path() -> PathBuf {
    let colocated = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_PATTERNS_FILE)));
    match colocated {
        Some(path) if path.is_file() => path,
        _ => PathBuf::from(DEFAULT_PATTERNS_FILE),
    }
}

fn parse_timeout(value: &str) -> Result<Duration, String> {
    let secs: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{value}' is not a number of seconds"))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(format!("timeout must be > 0, got {value}"));
    }
    Duration::try_from_secs_f64(secs).map_err(|err| err.to_string())
}
