// src/noyau/rpn.rs
//
// Shunting-yard -> RPN -> AST
// Objectif :
// - Convertir une suite de Jeton en RPN (postfix)
// - Puis reconstruire Expr
//
// Règles :
// - Ident(nom) :
//    - si nom est une fonction connue (sin/cos/.../root/npr/ncr) => elle
//      reste collée à ses arguments et sort après la parenthèse fermante
//    - sinon => identifiant libre (x), sortie directe
// - Moins unaire :
//    - un '-' qui arrive quand on n'attend PAS une valeur devient Jeton::Neg,
//      précédence AU-DESSUS de '^' (associatif à droite) :
//      -3^2 = (-3)^2 et 3^-2 = 3^(-2)
// - Virgule : sépare les arguments, dépile jusqu'à '(' sans la sortir.

use super::expr::{Expr, Fonction};
use super::jetons::Jeton;

fn precedence(t: &Jeton) -> i32 {
    match t {
        Jeton::Plus | Jeton::Moins => 1,
        Jeton::Etoile | Jeton::Barre => 2,
        Jeton::Circonflexe => 3,
        Jeton::Neg => 4,
        _ => 0,
    }
}

fn est_associatif_droite(t: &Jeton) -> bool {
    matches!(t, Jeton::Circonflexe | Jeton::Neg)
}

fn est_fonction(nom: &str) -> bool {
    Fonction::depuis_nom(nom).is_some()
}

/// Dépile les opérateurs dominants avant d'empiler `tok`.
/// On ne traverse jamais '(' ni une fonction en attente.
fn depiler_dominants(ops: &mut Vec<Jeton>, out: &mut Vec<Jeton>, tok: &Jeton) {
    while let Some(haut) = ops.last() {
        if matches!(haut, Jeton::ParG) {
            break;
        }
        if let Jeton::Ident(nom) = haut {
            if est_fonction(nom.as_str()) {
                break;
            }
        }

        let p_haut = precedence(haut);
        let p_tok = precedence(tok);

        let doit_sortir = if est_associatif_droite(tok) {
            p_haut > p_tok
        } else {
            p_haut >= p_tok
        };

        if doit_sortir {
            out.push(ops.pop().expect("pile non vide"));
        } else {
            break;
        }
    }
}

/// Convertit une suite de jetons en RPN (notation polonaise inversée).
///
/// Exemple :
///   jetons : [Ident("root"), ParG, Num(3), Virgule, Num(27), ParD]
///   rpn    : [Num(3), Num(27), Ident("root")]
pub fn vers_rpn(jetons: &[Jeton]) -> Result<Vec<Jeton>, String> {
    let mut out: Vec<Jeton> = Vec::new();
    let mut ops: Vec<Jeton> = Vec::new();

    // "valeur" = un atome ou une expression fermée.
    // Sert à distinguer le moins unaire du moins binaire.
    let mut prec_etait_valeur = false;

    for tok in jetons.iter().cloned() {
        match tok {
            Jeton::Num(_) => {
                out.push(tok);
                prec_etait_valeur = true;
            }

            Jeton::Ident(nom) => {
                if est_fonction(&nom) {
                    ops.push(Jeton::Ident(nom));
                    prec_etait_valeur = false;
                } else {
                    out.push(Jeton::Ident(nom));
                    prec_etait_valeur = true;
                }
            }

            Jeton::ParG => {
                ops.push(tok);
                prec_etait_valeur = false;
            }

            Jeton::ParD => {
                // dépile jusqu'à '('
                let mut ouvrante_vue = false;
                while let Some(haut) = ops.pop() {
                    if matches!(haut, Jeton::ParG) {
                        ouvrante_vue = true;
                        break;
                    }
                    out.push(haut);
                }
                if !ouvrante_vue {
                    return Err("parenthèse fermante sans ouvrante".into());
                }

                // si une fonction attend au sommet, elle sort aussi
                if let Some(Jeton::Ident(nom)) = ops.last() {
                    if est_fonction(nom.as_str()) {
                        out.push(ops.pop().expect("sommet vérifié"));
                    }
                }

                prec_etait_valeur = true;
            }

            Jeton::Virgule => {
                // sépare deux arguments : dépile jusqu'à '(' SANS la sortir
                loop {
                    match ops.last() {
                        Some(Jeton::ParG) => break,
                        Some(_) => out.push(ops.pop().expect("sommet vérifié")),
                        None => return Err("virgule hors d'un appel de fonction".into()),
                    }
                }
                prec_etait_valeur = false;
            }

            Jeton::Plus | Jeton::Etoile | Jeton::Barre | Jeton::Circonflexe => {
                depiler_dominants(&mut ops, &mut out, &tok);
                ops.push(tok);
                prec_etait_valeur = false;
            }

            Jeton::Moins => {
                if prec_etait_valeur {
                    // soustraction binaire
                    depiler_dominants(&mut ops, &mut out, &Jeton::Moins);
                    ops.push(Jeton::Moins);
                } else {
                    // moins unaire : lie plus fort que '^', associatif à droite
                    depiler_dominants(&mut ops, &mut out, &Jeton::Neg);
                    ops.push(Jeton::Neg);
                }
                prec_etait_valeur = false;
            }

            Jeton::Neg => return Err("jeton unaire inattendu en entrée".into()),
        }
    }

    // vide la pile ops
    while let Some(op) = ops.pop() {
        if matches!(op, Jeton::ParG) {
            return Err("parenthèses non fermées".into());
        }
        out.push(op);
    }

    Ok(out)
}

/// Construit une Expr à partir d'une RPN.
pub fn depuis_rpn(rpn: &[Jeton]) -> Result<Expr, String> {
    let mut pile: Vec<Expr> = Vec::new();

    for tok in rpn.iter().cloned() {
        match tok {
            Jeton::Num(v) => pile.push(Expr::Num(v)),

            Jeton::Neg => {
                let a = pile.pop().ok_or("expression invalide")?;
                pile.push(Expr::Neg(Box::new(a)));
            }

            Jeton::Plus | Jeton::Moins | Jeton::Etoile | Jeton::Barre | Jeton::Circonflexe => {
                let b = pile.pop().ok_or("expression invalide")?;
                let a = pile.pop().ok_or("expression invalide")?;

                let e = match tok {
                    Jeton::Plus => Expr::Add(Box::new(a), Box::new(b)),
                    Jeton::Moins => Expr::Sub(Box::new(a), Box::new(b)),
                    Jeton::Etoile => Expr::Mul(Box::new(a), Box::new(b)),
                    Jeton::Barre => Expr::Div(Box::new(a), Box::new(b)),
                    Jeton::Circonflexe => Expr::Pow(Box::new(a), Box::new(b)),
                    _ => unreachable!(),
                };
                pile.push(e);
            }

            Jeton::Ident(nom) => {
                if let Some(f) = Fonction::depuis_nom(nom.as_str()) {
                    let n = f.arite();
                    if pile.len() < n {
                        return Err("fonction sans assez d'arguments".into());
                    }
                    let mut args = pile.split_off(pile.len() - n);
                    debug_assert_eq!(args.len(), n);
                    // split_off garde l'ordre de gauche à droite
                    pile.push(Expr::Appel(f, std::mem::take(&mut args)));
                } else {
                    pile.push(Expr::Var(nom));
                }
            }

            Jeton::ParG | Jeton::ParD | Jeton::Virgule => {
                return Err("jeton inattendu en RPN".into())
            }
        }
    }

    if pile.len() != 1 {
        return Err("expression invalide".into());
    }
    Ok(pile.pop().expect("taille vérifiée"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::jetons::tokenize;

    fn eval(s: &str) -> Result<f64, String> {
        let jetons = tokenize(s)?;
        let rpn = vers_rpn(&jetons)?;
        depuis_rpn(&rpn)?.evaluer(None)
    }

    #[test]
    fn precedence_classique() {
        assert_eq!(eval("2+3*4").unwrap(), 14.0);
        assert_eq!(eval("(2+3)*4").unwrap(), 20.0);
        assert_eq!(eval("10-4-3").unwrap(), 3.0); // gauche-droite
        assert_eq!(eval("20/2/5").unwrap(), 2.0);
    }

    #[test]
    fn puissance_associative_droite() {
        assert_eq!(eval("2^3^2").unwrap(), 512.0); // 2^(3^2)
    }

    #[test]
    fn moins_unaire_au_dessus_de_puissance() {
        assert_eq!(eval("-3^2").unwrap(), 9.0); // (-3)^2
        assert_eq!(eval("3^-2").unwrap(), 1.0 / 9.0);
        assert_eq!(eval("--5").unwrap(), 5.0);
        assert_eq!(eval("2*-3").unwrap(), -6.0);
    }

    #[test]
    fn fonctions_unaires_et_binaires() {
        assert_eq!(eval("root(3,27)").unwrap(), 3.0);
        assert_eq!(eval("nPr(5,2)").unwrap(), 20.0);
        assert_eq!(eval("nCr(5,2)").unwrap(), 10.0);
        assert!((eval("sin(30)").unwrap() - 0.5).abs() < 1e-12);
        assert!((eval("log(100)").unwrap() - 2.0).abs() < 1e-12);
        assert_eq!(eval("factorial(5)").unwrap(), 120.0);
    }

    #[test]
    fn structurellement_invalide() {
        assert!(eval("2+").is_err());
        assert!(eval("(2").is_err());
        assert!(eval("2)").is_err());
        assert!(eval("1,2").is_err());
        assert!(eval("2 3").is_err()); // deux valeurs sans opérateur
    }
}
