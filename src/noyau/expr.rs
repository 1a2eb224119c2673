// src/noyau/expr.rs
//
// AST de la grammaire restreinte + évaluation f64.
//
// Invariant de sécurité : SEULS les nœuds ci-dessous existent. Aucune
// évaluation d'hôte, aucun identifiant libre hormis la liaison explicite
// passée par l'appelant (x pour le traçage de courbe).

use super::fonctions;

/// Fonctions nommées reconnues par la grammaire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fonction {
    Sin,
    Cos,
    Tan,
    Log,
    Factorielle,
    Racine,
    Npr,
    Ncr,
}

impl Fonction {
    /// Résolution d'un identifiant (déjà en minuscules) vers une fonction.
    pub fn depuis_nom(nom: &str) -> Option<Fonction> {
        match nom {
            "sin" => Some(Fonction::Sin),
            "cos" => Some(Fonction::Cos),
            "tan" => Some(Fonction::Tan),
            "log" => Some(Fonction::Log),
            "factorial" => Some(Fonction::Factorielle),
            "root" => Some(Fonction::Racine),
            "npr" => Some(Fonction::Npr),
            "ncr" => Some(Fonction::Ncr),
            _ => None,
        }
    }

    /// Nombre d'arguments attendus.
    pub fn arite(self) -> usize {
        match self {
            Fonction::Racine | Fonction::Npr | Fonction::Ncr => 2,
            _ => 1,
        }
    }
}

#[derive(Clone, Debug)]
pub enum Expr {
    Num(f64),
    /// Identifiant libre (x), lié au moment de l'évaluation.
    Var(String),
    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Appel(Fonction, Vec<Expr>),
}

impl Expr {
    /// Évalue l'arbre en double précision.
    ///
    /// `x` : liaison optionnelle de l'identifiant "x" (traçage de courbe).
    /// Un identifiant non lié est une erreur d'évaluation (arbre bien formé
    /// mais non calculable) — PAS une erreur de syntaxe.
    ///
    /// Les indéfinis mathématiques (division par zéro, log(-1), racine paire
    /// d'un négatif...) suivent IEEE-754 : NaN / ±inf remontent tels quels,
    /// le classement en "Domain Error" est fait par l'appelant.
    pub fn evaluer(&self, x: Option<f64>) -> Result<f64, String> {
        match self {
            Expr::Num(v) => Ok(*v),

            Expr::Var(nom) => {
                if nom == "x" {
                    if let Some(v) = x {
                        return Ok(v);
                    }
                }
                Err(format!("identifiant non lié: {nom}"))
            }

            Expr::Neg(a) => Ok(-a.evaluer(x)?),

            Expr::Add(a, b) => Ok(a.evaluer(x)? + b.evaluer(x)?),
            Expr::Sub(a, b) => Ok(a.evaluer(x)? - b.evaluer(x)?),
            Expr::Mul(a, b) => Ok(a.evaluer(x)? * b.evaluer(x)?),
            Expr::Div(a, b) => Ok(a.evaluer(x)? / b.evaluer(x)?),
            Expr::Pow(a, b) => Ok(a.evaluer(x)?.powf(b.evaluer(x)?)),

            Expr::Appel(f, args) => {
                if args.len() != f.arite() {
                    return Err("mauvaise arité".into());
                }
                let a = args[0].evaluer(x)?;
                match f {
                    Fonction::Sin => Ok(fonctions::sin_deg(a)),
                    Fonction::Cos => Ok(fonctions::cos_deg(a)),
                    Fonction::Tan => Ok(fonctions::tan_deg(a)),
                    Fonction::Log => Ok(fonctions::log10(a)),
                    Fonction::Factorielle => Ok(fonctions::factorielle(a)),
                    Fonction::Racine => Ok(fonctions::racine(a, args[1].evaluer(x)?)),
                    Fonction::Npr => Ok(fonctions::npr(a, args[1].evaluer(x)?)),
                    Fonction::Ncr => Ok(fonctions::ncr(a, args[1].evaluer(x)?)),
                }
            }
        }
    }

    /// L'arbre contient-il l'identifiant "x" ? (le graphe exige une courbe
    /// réellement paramétrée)
    pub fn depend_de_x(&self) -> bool {
        match self {
            Expr::Num(_) => false,
            Expr::Var(nom) => nom == "x",
            Expr::Neg(a) => a.depend_de_x(),
            Expr::Add(a, b)
            | Expr::Sub(a, b)
            | Expr::Mul(a, b)
            | Expr::Div(a, b)
            | Expr::Pow(a, b) => a.depend_de_x() || b.depend_de_x(),
            Expr::Appel(_, args) => args.iter().any(Expr::depend_de_x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(v: f64) -> Box<Expr> {
        Box::new(Expr::Num(v))
    }

    #[test]
    fn arithmetique_simple() {
        let e = Expr::Add(num(2.0), Box::new(Expr::Mul(num(3.0), num(4.0))));
        assert_eq!(e.evaluer(None).unwrap(), 14.0);
    }

    #[test]
    fn puissance_et_negation() {
        // (-3)^2 = 9 : le moins unaire lie plus fort que ^
        let e = Expr::Pow(Box::new(Expr::Neg(num(3.0))), num(2.0));
        assert_eq!(e.evaluer(None).unwrap(), 9.0);
    }

    #[test]
    fn variable_liee_et_non_liee() {
        let e = Expr::Mul(Box::new(Expr::Var("x".into())), num(2.0));
        assert_eq!(e.evaluer(Some(3.0)).unwrap(), 6.0);
        assert!(e.evaluer(None).is_err());
        assert!(e.depend_de_x());

        let y = Expr::Var("y".into());
        assert!(y.evaluer(Some(1.0)).is_err());
        assert!(!y.depend_de_x());
    }

    #[test]
    fn division_par_zero_suit_ieee() {
        let e = Expr::Div(num(1.0), num(0.0));
        assert!(e.evaluer(None).unwrap().is_infinite());
    }
}
