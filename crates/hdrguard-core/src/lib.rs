//! hdrguard-core — Cœur de l'outil hdrguard
//!
//! Encadre un header C généré d'une garde de linkage `extern "C"`, pour que
//! le même fichier s'inclue proprement depuis des unités C et C++. Le header
//! est produit par un générateur externe ; nous ne faisons que le relire et
//! le réécrire une fois, encadré.
//!
//! ## Modules
//! - `guard`  : gabarit de la garde, `wrap` / `is_wrapped`.
//! - `settle` : attente de stabilité du fichier cible (le générateur amont
//!              écrit hors de tout verrou).
//! - `inject` : l'opération complète — attente → lecture → garde → écriture.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms, unused_must_use)]

use std::time::Duration;

use camino::Utf8PathBuf;
use thiserror::Error;

pub mod guard;
pub mod inject;
pub mod settle;

// ---------- Reexports de confort ----------
pub use guard::{is_wrapped, wrap, GUARD_CLOSE, GUARD_OPEN, GUARD_OVERHEAD};
pub use inject::{inject_file, InjectOptions, OnWrapped, Outcome};
pub use settle::{wait_for_stable, Settle};

// ---------- Version ----------
/// Version du crate (lisible, via Cargo).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Jolie bannière de version (utile pour logs/outils).
pub fn version() -> String {
    format!("hdrguard-core {VERSION}")
}

// ---------- Erreurs & Résultat ----------
#[derive(Debug, Error)]
pub enum Error {
    /// I/O générique (lecture, écriture, stat).
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// Le header cible n'existe pas (et n'est jamais apparu).
    #[error("introuvable: {0}")]
    NotFound(Utf8PathBuf),

    /// Le fichier n'a jamais cessé de changer dans le délai imparti.
    #[error("jamais stabilisé après {waited:?}: {path}")]
    Unstable {
        /// Header surveillé.
        path: Utf8PathBuf,
        /// Temps total d'attente avant abandon.
        waited: Duration,
    },

    /// La garde est déjà posée (mode strict).
    #[error("déjà encadré: {0}")]
    AlreadyWrapped(Utf8PathBuf),
}

/// Résultat standard du crate.
pub type Result<T> = std::result::Result<T, Error>;
