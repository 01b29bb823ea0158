//! hdrguard-cli/src/lib.rs — CLI lib pour hdrguard
//!
//! Sous-commandes :
//!   - wrap  : encadre un header généré de la garde `extern "C"` (en place)
//!   - check : vérifie, sans rien modifier, qu'un header est déjà encadré
//!
//! Le chemin du header est toujours un argument explicite — pas de chemin
//! relatif câblé en dur, pas de répertoire courant implicite.

use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

use hdrguard_core::{inject_file, is_wrapped, InjectOptions, OnWrapped, Outcome, Settle};

/// Point d'entrée du binaire (à appeler depuis src/main.rs)
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Wrap(args) => cmd_wrap(args),
        Cmd::Check { header } => cmd_check(header),
    }
}

#[derive(Parser, Debug)]
#[command(name = "hdrguard", version, about = "Garde de linkage extern \"C\" pour headers C générés")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Encadre un header de la garde (réécriture en place par défaut)
    Wrap(WrapArgs),
    /// Vérifie qu'un header porte déjà la garde (lecture seule)
    Check {
        /// Header à inspecter
        header: PathBuf,
    },
}

#[derive(Args, Debug)]
struct WrapArgs {
    /// Header généré à encadrer
    header: PathBuf,

    /// Immobilité exigée avant lecture (le générateur peut encore écrire)
    #[arg(long, default_value = "200ms")]
    settle: humantime::Duration,

    /// Intervalle entre deux stat pendant l'attente
    #[arg(long, default_value = "20ms")]
    poll: humantime::Duration,

    /// Borne totale de l'attente (apparition du fichier comprise)
    #[arg(long, default_value = "2s")]
    timeout: humantime::Duration,

    /// Lecture directe, sans attente de stabilité
    #[arg(long)]
    no_wait: bool,

    /// Délai de grâce avant écriture
    #[arg(long, default_value = "100ms")]
    grace: humantime::Duration,

    /// Empile une garde même si une est déjà posée (comportement historique)
    #[arg(long, conflicts_with = "strict")]
    force: bool,

    /// Échoue si la garde est déjà posée
    #[arg(long)]
    strict: bool,

    /// Écrit le résultat ici au lieu de réécrire en place
    #[arg(short, long)]
    out: Option<PathBuf>,
}

fn cmd_wrap(a: WrapArgs) -> Result<()> {
    let header = into_utf8(a.header)?;
    let out = a.out.map(into_utf8).transpose()?;

    let settle = (!a.no_wait).then(|| Settle {
        poll: a.poll.into(),
        quiet: a.settle.into(),
        timeout: a.timeout.into(),
    });
    let opts = InjectOptions {
        settle,
        grace: a.grace.into(),
        on_wrapped: if a.force {
            OnWrapped::Rewrap
        } else if a.strict {
            OnWrapped::Fail
        } else {
            OnWrapped::Skip
        },
        out: out.clone(),
    };

    match inject_file(&header, &opts).with_context(|| format!("encadrement {header}"))? {
        Outcome::Wrapped { bytes } => {
            let target = out.as_deref().unwrap_or(&header);
            println!("✅ écrit {target} ({bytes} octets)");
        }
        Outcome::Skipped => println!("ℹ️  garde déjà présente: {header} — rien à faire"),
    }
    Ok(())
}

fn cmd_check(header: PathBuf) -> Result<()> {
    let header = into_utf8(header)?;
    let content = fs::read_to_string(&header).with_context(|| format!("lecture {header}"))?;
    if is_wrapped(&content) {
        println!("✅ garde présente: {header}");
        Ok(())
    } else {
        Err(anyhow!("garde absente: {header}"))
    }
}

fn into_utf8(p: PathBuf) -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(p).map_err(|p| anyhow!("chemin non UTF-8: {}", p.display()))
}
