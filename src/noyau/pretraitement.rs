// src/noyau/pretraitement.rs
//
// Prétraitement : réécrit la syntaxe de surface (suffixe %, constantes,
// suffixe !) vers la forme canonique évaluable par la grammaire restreinte,
// et valide la structure AVANT toute évaluation (échec rapide).
//
// Les motifs % et root/nPr/nCr sont volontairement littéraux : les cas
// imbriqués/enchaînés hors de leur portée ne sont pas réécrits et échouent
// plus loin à la tokenisation. On ne devine pas.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // <base> (+|-) <pct>%  =>  <base> op (<base> * <pct> / 100)
    static ref POURCENT_BASE: Regex =
        Regex::new(r"(\d+(?:\.\d+)?)\s*([+\-])\s*(\d+(?:\.\d+)?)%").expect("regex valide");

    // <n>%  =>  (<n>/100)
    static ref POURCENT_SEUL: Regex =
        Regex::new(r"(\d+(?:\.\d+)?)%").expect("regex valide");

    // <n>!  =>  factorial(<n>)  — le signe est traité à la main (voir plus bas)
    static ref FACTORIELLE: Regex =
        Regex::new(r"(-?\d+(?:\.\d+)?)!").expect("regex valide");

    // root/nPr/nCr avec un argument vide : "f(a,)" ou "f(,b)"
    static ref ARGUMENT_VIDE: Regex =
        Regex::new(r"(root|nPr|nCr)\s*\(([^,)]*,\s*|,\s*[^,)]*)\)").expect("regex valide");

    // root/nPr/nCr avec zéro ou deux virgules : "f(a)" ou "f(a,b,c)"
    static ref ARITE_FAUSSE: Regex =
        Regex::new(r"(root|nPr|nCr)\s*\(([^,)]*|[^,)]*,[^,)]*,[^,)]*)\)").expect("regex valide");
}

/// Pourcentages, dans cet ordre :
/// 1. "100+10%" => "100 + (100 * 10 / 100)" (le % est relatif à la base)
/// 2. "50%" restant => "(50/100)"
pub fn reecrire_pourcentages(expr: &str) -> String {
    let etape1 = POURCENT_BASE.replace_all(expr, |c: &regex::Captures| {
        format!("{} {} ({} * {} / 100)", &c[1], &c[2], &c[1], &c[3])
    });
    POURCENT_SEUL.replace_all(&etape1, "($1/100)").into_owned()
}

/// "<n>!" => "factorial(<n>)".
///
/// Le motif capture un '-' collé au nombre, mais on ne l'inclut dans
/// l'argument QUE s'il est en position unaire (début de chaîne, ou après un
/// opérateur / '(' / ','). Ainsi "-1!" => factorial(-1) => NaN (erreur de
/// domaine), alors que "5-1!" garde la soustraction : "5-factorial(1)".
pub fn reecrire_factorielles(expr: &str) -> String {
    let mut sortie = String::with_capacity(expr.len() + 16);
    let mut fin_precedente = 0usize;

    for c in FACTORIELLE.captures_iter(expr) {
        let m = c.get(0).expect("groupe 0 toujours présent");
        let nombre = &c[1];

        sortie.push_str(&expr[fin_precedente..m.start()]);

        if let Some(reste) = nombre.strip_prefix('-') {
            let avant = expr[..m.start()].chars().next_back();
            let unaire = match avant {
                None => true,
                Some(ch) => matches!(ch, '+' | '-' | '*' | '/' | '^' | '(' | ',' | ' '),
            };
            if unaire {
                sortie.push_str(&format!("factorial({nombre})"));
            } else {
                sortie.push_str(&format!("-factorial({reste})"));
            }
        } else {
            sortie.push_str(&format!("factorial({nombre})"));
        }

        fin_precedente = m.end();
    }

    sortie.push_str(&expr[fin_precedente..]);
    sortie
}

/// Forme canonique complète : pourcentages, constantes, factorielles.
/// ('^' est déjà l'opérateur puissance de la grammaire ; "pi" et "e" sont
/// résolus par le tokenizeur.)
pub fn canonicaliser(expr: &str) -> String {
    let etape = reecrire_pourcentages(expr);
    let etape = etape.replace('π', "pi");
    reecrire_factorielles(&etape)
}

/* ------------------------ Validation structurelle ------------------------ */

/// Compte de '(' == compte de ')' ?
pub fn parentheses_equilibrees(expr: &str) -> bool {
    let ouvrantes = expr.chars().filter(|&c| c == '(').count();
    let fermantes = expr.chars().filter(|&c| c == ')').count();
    ouvrantes == fermantes
}

/// root/nPr/nCr sans exactement deux arguments non vides ?
pub fn arguments_fonction_invalides(expr: &str) -> bool {
    ARGUMENT_VIDE.is_match(expr) || ARITE_FAUSSE.is_match(expr)
}

/// Retire UN opérateur binaire final (saisie incomplète, pas une erreur).
pub fn retirer_operateur_final(expr: &str) -> &str {
    match expr.chars().next_back() {
        Some('+' | '-' | '*' | '/' | '^') => &expr[..expr.len() - 1],
        _ => expr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pourcentage_relatif_a_la_base() {
        assert_eq!(
            reecrire_pourcentages("100+10%"),
            "100 + (100 * 10 / 100)"
        );
        assert_eq!(
            reecrire_pourcentages("200 - 25%"),
            "200 - (200 * 25 / 100)"
        );
    }

    #[test]
    fn pourcentage_seul() {
        assert_eq!(reecrire_pourcentages("50%"), "(50/100)");
        assert_eq!(reecrire_pourcentages("2*50%"), "2*(50/100)");
    }

    #[test]
    fn factorielle_simple() {
        assert_eq!(reecrire_factorielles("5!"), "factorial(5)");
        assert_eq!(reecrire_factorielles("3!+2"), "factorial(3)+2");
    }

    #[test]
    fn factorielle_et_signe() {
        // unaire : le signe entre dans l'argument
        assert_eq!(reecrire_factorielles("-1!"), "factorial(-1)");
        assert_eq!(reecrire_factorielles("(-1!)"), "(factorial(-1))");
        assert_eq!(reecrire_factorielles("2*-3!"), "2*factorial(-3)");
        // binaire : le signe reste une soustraction
        assert_eq!(reecrire_factorielles("5-1!"), "5-factorial(1)");
    }

    #[test]
    fn constantes_canonicalisees() {
        assert_eq!(canonicaliser("2π"), "2pi");
        assert_eq!(canonicaliser("π+1"), "pi+1");
    }

    #[test]
    fn equilibre_parentheses() {
        assert!(parentheses_equilibrees("(1+2)"));
        assert!(!parentheses_equilibrees("(1+2"));
        assert!(!parentheses_equilibrees("1+2)"));
        // simple égalité des comptes, l'ordre est vérifié plus loin à l'analyse
        assert!(parentheses_equilibrees(")1+2("));
    }

    #[test]
    fn arite_des_fonctions_binaires() {
        assert!(!arguments_fonction_invalides("root(3,27)"));
        assert!(!arguments_fonction_invalides("nPr(5,2)+nCr(5,2)"));
        assert!(arguments_fonction_invalides("root(27)"));
        assert!(arguments_fonction_invalides("nPr(5,)"));
        assert!(arguments_fonction_invalides("nCr(,2)"));
        assert!(arguments_fonction_invalides("root(1,2,3)"));
    }

    #[test]
    fn operateur_final_retire() {
        assert_eq!(retirer_operateur_final("5+"), "5");
        assert_eq!(retirer_operateur_final("5"), "5");
        assert_eq!(retirer_operateur_final("+"), "");
        // un seul opérateur retiré
        assert_eq!(retirer_operateur_final("5+*"), "5+");
    }
}
