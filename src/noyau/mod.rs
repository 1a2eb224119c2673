//! Noyau de calcul
//!
//! Organisation interne :
//! - erreur.rs        : ensemble fermé d'étiquettes d'erreur
//! - pretraitement.rs : % / constantes / factorielle + validation structurelle
//! - jetons.rs        : tokenisation de la forme canonique
//! - rpn.rs           : shunting-yard + construction Expr
//! - expr.rs          : AST restreint + évaluation f64
//! - fonctions.rs     : factorielle, nPr, nCr, trig (degrés), log10, root
//! - format.rs        : arrondi + texte + fraction (fractions continues)
//! - eval.rs          : pipeline complet

pub mod erreur;
pub mod eval;
pub mod expr;
pub mod fonctions;
pub mod format;
pub mod jetons;
pub mod pretraitement;
pub mod rpn;

#[cfg(test)]
mod tests_proprietes;

// API publique minimale
pub use erreur::{est_etat_erreur, ErreurCalc};
pub use eval::{compiler_courbe, eval_expression, Evaluation};
pub use format::PrecisionArrondi;
