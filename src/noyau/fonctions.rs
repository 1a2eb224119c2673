// src/noyau/fonctions.rs
//
// Fonctions nommées de la grammaire.
//
// Convention : une violation de domaine retourne NaN (jamais de panique).
// C'est eval.rs qui transforme NaN / non-fini en "Domain Error".
// sin/cos/tan prennent leur argument en DEGRÉS. log est en base 10.

/// n! par produit itératif 2·3·…·n.
/// NaN si n < 0 ou n non entier ; 1 pour 0 et 1.
pub fn factorielle(n: f64) -> f64 {
    if n < 0.0 || n.fract() != 0.0 || !n.is_finite() {
        return f64::NAN;
    }
    if n == 0.0 || n == 1.0 {
        return 1.0;
    }
    let mut resultat = 1.0_f64;
    let mut i = 2.0_f64;
    while i <= n {
        resultat *= i;
        i += 1.0;
    }
    resultat
}

/// Arrangements : n!/(n-r)!. Exige des entiers non négatifs avec n ≥ r.
pub fn npr(n: f64, r: f64) -> f64 {
    if n < r || n < 0.0 || r < 0.0 || n.fract() != 0.0 || r.fract() != 0.0 {
        return f64::NAN;
    }
    factorielle(n) / factorielle(n - r)
}

/// Combinaisons : n!/(r!(n-r)!). Mêmes exigences que npr.
pub fn ncr(n: f64, r: f64) -> f64 {
    if n < r || n < 0.0 || r < 0.0 || n.fract() != 0.0 || r.fract() != 0.0 {
        return f64::NAN;
    }
    factorielle(n) / (factorielle(r) * factorielle(n - r))
}

/// sin en degrés.
pub fn sin_deg(deg: f64) -> f64 {
    (deg * std::f64::consts::PI / 180.0).sin()
}

/// cos en degrés.
pub fn cos_deg(deg: f64) -> f64 {
    (deg * std::f64::consts::PI / 180.0).cos()
}

/// tan en degrés.
pub fn tan_deg(deg: f64) -> f64 {
    (deg * std::f64::consts::PI / 180.0).tan()
}

/// log base 10 (NaN hors domaine, via la primitive IEEE).
pub fn log10(n: f64) -> f64 {
    n.log10()
}

/// racine d-ième de n : n^(1/d).
pub fn racine(d: f64, n: f64) -> f64 {
    n.powf(1.0 / d)
}
