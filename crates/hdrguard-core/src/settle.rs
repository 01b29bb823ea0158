//! hdrguard-core/src/settle.rs — Attente de stabilité du fichier cible.
//!
//! Le générateur amont écrit le header hors de tout verrou. Plutôt qu'un
//! sommeil aveugle, on re-stat le fichier jusqu'à ce que sa signature
//! (taille, mtime) reste immobile pendant `quiet`, le tout borné par
//! `timeout`. Meilleur effort : aucune garantie dure contre un écrivain qui
//! repasserait après nous.

use std::fs;
use std::io::ErrorKind;
use std::thread;
use std::time::{Duration, Instant, SystemTime};

use camino::Utf8Path;

use crate::{Error, Result};

/// Politique d'attente avant lecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settle {
    /// Intervalle entre deux stat.
    pub poll: Duration,
    /// Durée d'immobilité exigée avant de déclarer le fichier stable.
    pub quiet: Duration,
    /// Borne totale de l'attente (apparition comprise).
    pub timeout: Duration,
}

impl Default for Settle {
    fn default() -> Self {
        // 200 ms d'immobilité exigée — le délai historique avant lecture.
        Self {
            poll: Duration::from_millis(20),
            quiet: Duration::from_millis(200),
            timeout: Duration::from_secs(2),
        }
    }
}

/// Signature observable d'un fichier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Sig {
    len: u64,
    mtime: SystemTime,
}

fn stat(path: &Utf8Path) -> Result<Option<Sig>> {
    match fs::metadata(path) {
        Ok(md) => Ok(Some(Sig { len: md.len(), mtime: md.modified()? })),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::Io(e)),
    }
}

/// Attend que `path` existe et se stabilise.
///
/// - le fichier n'apparaît jamais avant `timeout` → [`Error::NotFound`] ;
/// - il continue de changer au-delà de `timeout` → [`Error::Unstable`].
pub fn wait_for_stable(path: &Utf8Path, settle: &Settle) -> Result<()> {
    let start = Instant::now();
    let mut seen: Option<(Sig, Instant)> = None;

    loop {
        match stat(path)? {
            Some(sig) => match seen {
                Some((prev, since)) if prev == sig => {
                    if since.elapsed() >= settle.quiet {
                        log::debug!("{path}: stable ({} octets)", sig.len);
                        return Ok(());
                    }
                }
                _ => {
                    log::debug!("{path}: signature changée, on réarme l'attente");
                    seen = Some((sig, Instant::now()));
                }
            },
            None => seen = None,
        }

        if start.elapsed() >= settle.timeout {
            return match seen {
                None => Err(Error::NotFound(path.to_owned())),
                Some(_) => Err(Error::Unstable { path: path.to_owned(), waited: start.elapsed() }),
            };
        }
        thread::sleep(settle.poll);
    }
}

// ==============================
// Tests
// ==============================
