//! hdrguard-core/src/inject.rs — L'opération d'encadrement.
//!
//! Séquence : attente de stabilité → lecture → politique de garde → délai de
//! grâce → écriture unique. Pas de rollback : un échec entre la lecture et
//! l'écriture laisse le fichier d'origine intact, un échec après l'écriture
//! laisse le contenu encadré en place.

use std::fs;
use std::io::ErrorKind;
use std::thread;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};

use crate::guard;
use crate::settle::{self, Settle};
use crate::{Error, Result};

/// Conduite à tenir quand le header porte déjà la garde.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnWrapped {
    /// Ne rien réécrire (défaut, idempotent).
    #[default]
    Skip,
    /// Échouer proprement.
    Fail,
    /// Empiler une garde de plus (comportement historique).
    Rewrap,
}

/// Options de l'opération.
#[derive(Debug, Clone)]
pub struct InjectOptions {
    /// Attente de stabilité avant lecture ; `None` = lecture directe.
    pub settle: Option<Settle>,
    /// Délai de grâce avant écriture, pour laisser passer une éventuelle
    /// écriture traînante du générateur. Meilleur effort.
    pub grace: Duration,
    /// Politique si la garde est déjà présente.
    pub on_wrapped: OnWrapped,
    /// Destination ; `None` = réécriture en place.
    pub out: Option<Utf8PathBuf>,
}

impl Default for InjectOptions {
    fn default() -> Self {
        Self {
            settle: Some(Settle::default()),
            // le délai historique avant écriture
            grace: Duration::from_millis(100),
            on_wrapped: OnWrapped::Skip,
            out: None,
        }
    }
}

/// Issue de l'opération.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Garde posée ; taille écrite, en octets.
    Wrapped {
        /// Octets écrits (contenu d'origine + surcoût de la garde).
        bytes: usize,
    },
    /// Garde déjà présente, fichier laissé tel quel.
    Skipped,
}

/// Encadre le header à `path` selon `opts`.
pub fn inject_file(path: &Utf8Path, opts: &InjectOptions) -> Result<Outcome> {
    if let Some(settle) = &opts.settle {
        settle::wait_for_stable(path, settle)?;
    }

    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound { Error::NotFound(path.to_owned()) } else { Error::Io(e) }
    })?;

    if guard::is_wrapped(&content) {
        match opts.on_wrapped {
            OnWrapped::Skip => {
                log::info!("{path}: garde déjà présente, rien à faire");
                return Ok(Outcome::Skipped);
            }
            OnWrapped::Fail => return Err(Error::AlreadyWrapped(path.to_owned())),
            OnWrapped::Rewrap => log::warn!("{path}: garde déjà présente, on empile"),
        }
    }

    let wrapped = guard::wrap(&content);

    if !opts.grace.is_zero() {
        thread::sleep(opts.grace);
    }

    let target = opts.out.as_deref().unwrap_or(path);
    fs::write(target, &wrapped)?;
    log::debug!("{target}: {} octets écrits", wrapped.len());
    Ok(Outcome::Wrapped { bytes: wrapped.len() })
}
