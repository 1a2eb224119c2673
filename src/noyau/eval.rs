//! Noyau — évaluation (pipeline réel)
//!
//! tampon -> opérateur final retiré -> validation structurelle
//!        -> forme canonique -> jetons -> RPN -> Expr -> f64
//!        -> classement domaine -> arrondi -> texte + fraction
//!
//! Classement des échecs :
//! - AVANT évaluation (inspection statique) : parenthèses, arité root/nPr/nCr,
//!   flot de jetons malformé => erreurs STRUCTURELLES.
//! - APRÈS évaluation : NaN / non-fini => erreur de DOMAINE.
//! - Arbre bien formé mais non calculable (identifiant non lié) =>
//!   "Malformed Expression".

use num_rational::Rational64;

use super::erreur::ErreurCalc;
use super::expr::Expr;
use super::format::{arrondir, decimale_en_fraction, nombre_en_texte, PrecisionArrondi};
use super::jetons::tokenize;
use super::pretraitement::{
    arguments_fonction_invalides, canonicaliser, parentheses_equilibrees,
    retirer_operateur_final,
};
use super::rpn::{depuis_rpn, vers_rpn};

/// Résultat d'une évaluation réussie.
#[derive(Clone, Debug)]
pub struct Evaluation {
    /// L'expression réellement évaluée (opérateur final éventuel retiré),
    /// telle qu'on l'inscrit dans l'historique.
    pub expression: String,
    /// Valeur numérique, APRÈS arrondi éventuel.
    pub valeur: f64,
    /// Texte d'affichage.
    pub texte: String,
    /// Approximation en fraction de la valeur affichée, si "sympathique".
    pub fraction: Option<Rational64>,
}

/// API publique : évalue le tampon d'affichage et retourne le résultat mis
/// en forme, ou une étiquette d'erreur de l'ensemble fermé.
pub fn eval_expression(
    tampon: &str,
    precision: PrecisionArrondi,
) -> Result<Evaluation, ErreurCalc> {
    // Un opérateur binaire en fin de tampon est une saisie incomplète, pas
    // une erreur : on le retire avant tout.
    let expression = retirer_operateur_final(tampon);
    if expression.is_empty() {
        return Err(ErreurCalc::Syntaxe);
    }

    // Échec rapide, avant toute arithmétique.
    if !parentheses_equilibrees(expression) {
        return Err(ErreurCalc::ParenthesesDesequilibrees);
    }
    if arguments_fonction_invalides(expression) {
        return Err(ErreurCalc::ArgumentsFonction);
    }

    let arbre = analyser(expression)?;

    // Arbre bien formé : un échec ici n'est plus structurel.
    let brut = arbre
        .evaluer(None)
        .map_err(|_| ErreurCalc::Malformee)?;

    if brut.is_nan() || !brut.is_finite() {
        return Err(ErreurCalc::Domaine);
    }

    let valeur = arrondir(brut, precision);

    Ok(Evaluation {
        expression: expression.to_string(),
        valeur,
        texte: nombre_en_texte(valeur),
        fraction: decimale_en_fraction(valeur),
    })
}

/// Forme canonique -> arbre. Tout échec ici est STRUCTUREL.
fn analyser(expression: &str) -> Result<Expr, ErreurCalc> {
    let canonique = canonicaliser(expression);
    let jetons = tokenize(&canonique).map_err(|_| ErreurCalc::Syntaxe)?;
    let rpn = vers_rpn(&jetons).map_err(|_| ErreurCalc::Syntaxe)?;
    depuis_rpn(&rpn).map_err(|_| ErreurCalc::Syntaxe)
}

/// Compile l'expression du tampon pour le traçage de courbe : mêmes
/// validations structurelles, mais l'identifiant "x" reste libre et sera
/// lié point par point via `Expr::evaluer(Some(x))`.
pub fn compiler_courbe(tampon: &str) -> Result<Expr, ErreurCalc> {
    let expression = retirer_operateur_final(tampon);
    if expression.is_empty() || !parentheses_equilibrees(expression) {
        return Err(ErreurCalc::Syntaxe);
    }
    analyser(expression)
}
