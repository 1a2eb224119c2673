// src/noyau/format.rs
//
// Mise en forme du résultat :
// - arrondi optionnel (0 à 8 décimales), réglage de processus persisté
// - conversion nombre -> texte
// - approximation en fraction "sympathique" (fractions continues)
//
// Le réglage d'arrondi est passé EXPLICITEMENT (pas de global) : le
// formateur reste pur et testable.

use num_rational::Rational64;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

/// Précision d'arrondi : aucune, ou 0..=8 décimales.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrecisionArrondi {
    #[default]
    Aucune,
    Decimales(u8),
}

impl PrecisionArrondi {
    pub const MAX_DECIMALES: u8 = 8;

    /// Libellé pour le panneau de réglages.
    pub fn libelle(&self) -> String {
        match self {
            PrecisionArrondi::Aucune => "Aucune".to_string(),
            PrecisionArrondi::Decimales(p) => p.to_string(),
        }
    }
}

/// Arrondit à p décimales via un aller-retour texte (même sémantique que
/// parseFloat(x.toFixed(p)) : les zéros de queue disparaissent au re-parse).
pub fn arrondir(valeur: f64, precision: PrecisionArrondi) -> f64 {
    match precision {
        PrecisionArrondi::Aucune => valeur,
        PrecisionArrondi::Decimales(p) => {
            let p = p.min(PrecisionArrondi::MAX_DECIMALES) as usize;
            format!("{valeur:.p$}").parse().unwrap_or(valeur)
        }
    }
}

/// Nombre -> texte d'affichage (pas de ".0" sur les entiers).
pub fn nombre_en_texte(valeur: f64) -> String {
    format!("{valeur}")
}

/// Meilleure approximation rationnelle par fractions continues
/// (convergents de Stern–Brocot), tolérance 1e-9 RELATIVE.
///
/// On refuse (None) :
/// - |x| > 1e9 (fraction sans intérêt)
/// - x déjà entier
/// - dénominateur > 10000 (le nombre n'est pas un rationnel "sympathique")
///
/// Le signe est porté par le numérateur.
pub fn decimale_en_fraction(valeur: f64) -> Option<Rational64> {
    if !valeur.is_finite() || valeur.abs() > 1.0e9 || valeur.fract() == 0.0 {
        return None;
    }

    const TOLERANCE: f64 = 1.0e-9;
    let absolu = valeur.abs();

    // convergents h/k : h1/k1 courant, h2/k2 précédent
    let (mut h1, mut h2, mut k1, mut k2) = (1.0_f64, 0.0_f64, 0.0_f64, 1.0_f64);
    let mut b = absolu;

    // Les dénominateurs croissent au moins comme Fibonacci, la boucle est
    // courte ; la borne évite de boucler sur un b devenu non fini.
    for _ in 0..64 {
        let a = b.floor();

        let aux = h1;
        h1 = a * h1 + h2;
        h2 = aux;

        let aux = k1;
        k1 = a * k1 + k2;
        k2 = aux;

        if (absolu - h1 / k1).abs() <= absolu * TOLERANCE {
            break;
        }

        b = 1.0 / (b - a);
        if !b.is_finite() {
            break;
        }
    }

    if k1 > 10000.0 {
        return None;
    }

    let num = h1 as i64;
    let den = k1 as i64;
    if den.is_zero() {
        return None;
    }

    let signe = if valeur < 0.0 { -1 } else { 1 };
    Some(Rational64::new(signe * num, den))
}

/// Fraction -> "p/q" (signe sur le numérateur).
pub fn fraction_en_texte(r: &Rational64) -> String {
    format!("{}/{}", r.numer(), r.denom())
}
