// src/noyau/erreur.rs
//
// Ensemble FERMÉ d'étiquettes d'erreur.
//
// Contrat : l'affichage (Display) de chaque variante est EXACTEMENT le texte
// montré à l'écran à la place du tampon. Ces textes servent aussi de
// sentinelles : un tampon égal à l'une d'elles est "en état d'erreur" et la
// prochaine touche non-opérateur repart de zéro.

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ErreurCalc {
    /// Flot de jetons malformé détecté AVANT l'évaluation (échec structurel).
    #[error("Syntax Error")]
    Syntaxe,

    /// Compte de '(' différent du compte de ')'.
    #[error("Mismatched Parentheses")]
    ParenthesesDesequilibrees,

    /// Résultat NaN ou non fini après évaluation d'un arbre bien formé.
    #[error("Domain Error")]
    Domaine,

    /// root/nPr/nCr sans exactement deux arguments non vides.
    #[error("Invalid Function Args")]
    ArgumentsFonction,

    /// Arbre bien formé mais évaluation impossible (identifiant inconnu...).
    #[error("Malformed Expression")]
    Malformee,

    /// "Solve" demandé sans variable ou sans '='.
    #[error("Invalid Equation")]
    EquationInvalide,

    /// Le collaborateur distant a échoué (réseau, API). Sentinelle dédiée,
    /// distincte des erreurs locales.
    #[error("Solver Failed")]
    SolveurEchoue,
}

/// Sentinelles reconnues comme "état d'erreur" du tampon d'affichage.
pub const ETATS_ERREUR: [&str; 7] = [
    "Syntax Error",
    "Mismatched Parentheses",
    "Domain Error",
    "Invalid Function Args",
    "Malformed Expression",
    "Invalid Equation",
    "Solver Failed",
];

/// Le tampon affiché est-il une sentinelle d'erreur ?
pub fn est_etat_erreur(affichage: &str) -> bool {
    ETATS_ERREUR.contains(&affichage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn etiquettes_exactes() {
        assert_eq!(ErreurCalc::Syntaxe.to_string(), "Syntax Error");
        assert_eq!(
            ErreurCalc::ParenthesesDesequilibrees.to_string(),
            "Mismatched Parentheses"
        );
        assert_eq!(ErreurCalc::Domaine.to_string(), "Domain Error");
        assert_eq!(
            ErreurCalc::ArgumentsFonction.to_string(),
            "Invalid Function Args"
        );
        assert_eq!(ErreurCalc::Malformee.to_string(), "Malformed Expression");
        assert_eq!(ErreurCalc::SolveurEchoue.to_string(), "Solver Failed");
    }

    #[test]
    fn detection_etat_erreur() {
        assert!(est_etat_erreur("Domain Error"));
        assert!(est_etat_erreur(&ErreurCalc::EquationInvalide.to_string()));
        assert!(!est_etat_erreur("0"));
        assert!(!est_etat_erreur("1+2"));
    }
}
