// src/app/saisie.rs
//
// Politique d'ajout au tampon d'affichage (saisie pavé), SANS évaluation.
//
// Fonctions pures chaîne -> chaîne : l'état UI (etat.rs) ne fait que les
// appliquer. Règles :
// - un seul point décimal par segment numérique
// - un opérateur binaire remplace l'opérateur final, SAUF un '-' après
//   * / ^ ( qui s'ajoute (argument signé) ; deux opérateurs finaux
//   s'effondrent sur le dernier tapé
// - depuis "0" : opérateurs ignorés, sauf '-' qui remplace le tampon
// - fonctions / '(' / constantes : '*' implicite après chiffre, ')' ou
//   constante ; le nom de fonction s'ajoute avec sa parenthèse ouvrante
// - depuis un état d'erreur : tout jeton non-opérateur repart de zéro,
//   les opérateurs sont ignorés

use crate::noyau::est_etat_erreur;

const OPERATEURS: [&str; 5] = ["+", "-", "*", "/", "^"];

/// Touches du pavé qui sont des noms de fonction (ajoutées avec leur '(').
pub fn est_fonction_pave(valeur: &str) -> bool {
    matches!(valeur, "sin" | "cos" | "tan" | "log" | "root" | "nPr" | "nCr")
}

/// Touches du pavé qui sont des constantes.
pub fn est_constante_pave(valeur: &str) -> bool {
    matches!(valeur, "π" | "e")
}

fn est_operateur(valeur: &str) -> bool {
    OPERATEURS.contains(&valeur)
}

fn est_char_operateur(c: char) -> bool {
    matches!(c, '+' | '-' | '*' | '/' | '^')
}

/// Le segment numérique courant (depuis le dernier opérateur, parenthèse,
/// virgule ou '=') contient-il déjà un point ?
fn segment_courant_a_un_point(affichage: &str) -> bool {
    let segment = affichage
        .rsplit(|c: char| matches!(c, '+' | '-' | '*' | '/' | '^' | '(' | ')' | '=' | ','))
        .next()
        .unwrap_or("");
    segment.contains('.')
}

/// Retire le dernier caractère (UTF-8), sans retomber sous "0".
pub fn effacer_dernier(affichage: &str) -> String {
    let mut chars: Vec<char> = affichage.chars().collect();
    if chars.len() > 1 {
        chars.pop();
        chars.into_iter().collect()
    } else {
        "0".to_string()
    }
}

fn sans_derniers_chars(affichage: &str, n: usize) -> String {
    let chars: Vec<char> = affichage.chars().collect();
    chars[..chars.len().saturating_sub(n)].iter().collect()
}

/// Ajoute un jeton simple (chiffre, point, opérateur, virgule...) au tampon.
pub fn ajouter(affichage: &str, valeur: &str) -> String {
    let dernier = affichage.chars().next_back();
    let en_erreur = est_etat_erreur(affichage);

    // un seul point par segment numérique
    if valeur == "." && segment_courant_a_un_point(affichage) {
        return affichage.to_string();
    }

    if est_operateur(valeur) {
        // depuis un état d'erreur, les opérateurs sont ignorés
        if en_erreur {
            return affichage.to_string();
        }

        // depuis "0" : ignoré, sauf '-' (début d'un nombre signé)
        if affichage == "0" {
            if valeur == "-" {
                return "-".to_string();
            }
            return affichage.to_string();
        }

        if let Some(d) = dernier {
            if est_char_operateur(d) {
                // '-' après * / ^ : argument signé, on ajoute
                if valeur == "-" && matches!(d, '*' | '/' | '^') {
                    return format!("{affichage}{valeur}");
                }

                // deux opérateurs finaux -> seul le nouveau survit
                let avant_dernier = affichage.chars().rev().nth(1);
                if avant_dernier.is_some_and(est_char_operateur) {
                    return format!("{}{valeur}", sans_derniers_chars(affichage, 2));
                }

                // sinon l'opérateur final est remplacé
                return format!("{}{valeur}", sans_derniers_chars(affichage, 1));
            }
        }
    }

    // "0" ou état d'erreur : le jeton (non-opérateur) repart de zéro
    if (affichage == "0" && valeur != ".") || en_erreur {
        return valeur.to_string();
    }

    format!("{affichage}{valeur}")
}

/// Ajoute une fonction (avec sa parenthèse ouvrante), une constante ou '(',
/// en insérant un '*' implicite si le caractère précédent est un chiffre,
/// une ')' ou une constante.
pub fn inserer_fonction_ou_constante(affichage: &str, valeur: &str) -> String {
    let a_ajouter = if est_fonction_pave(valeur) {
        format!("{valeur}(")
    } else {
        valeur.to_string()
    };

    if affichage == "0" || est_etat_erreur(affichage) {
        return a_ajouter;
    }

    let mult_implicite = affichage
        .chars()
        .next_back()
        .is_some_and(|c| c.is_ascii_digit() || c == ')' || c == 'π' || c == 'e');

    if mult_implicite {
        format!("{affichage}*{a_ajouter}")
    } else {
        format!("{affichage}{a_ajouter}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_unique_par_segment() {
        assert_eq!(ajouter("3.14", "."), "3.14");
        assert_eq!(ajouter("3.1+2", "."), "3.1+2.");
        assert_eq!(ajouter("nCr(1.5", "."), "nCr(1.5");
        assert_eq!(ajouter("root(1.5,2", "."), "root(1.5,2.");
    }

    #[test]
    fn remplacement_d_operateur() {
        assert_eq!(ajouter("5+", "-"), "5-");
        assert_eq!(ajouter("5*", "/"), "5/");
    }

    #[test]
    fn effondrement_de_deux_operateurs() {
        // "5" puis "+" puis "-" puis "3" => "5-3"
        let mut t = "5".to_string();
        for v in ["+", "-", "3"] {
            t = ajouter(&t, v);
        }
        assert_eq!(t, "5-3");

        // signe en attente après * : le nouvel opérateur écrase tout
        assert_eq!(ajouter("5*-", "+"), "5+");
    }

    #[test]
    fn moins_signe_apres_mult_div_puissance() {
        assert_eq!(ajouter("5*", "-"), "5*-");
        assert_eq!(ajouter("5/", "-"), "5/-");
        assert_eq!(ajouter("5^", "-"), "5^-");
        // mais après '+' c'est un remplacement
        assert_eq!(ajouter("5+", "-"), "5-");
    }

    #[test]
    fn depuis_zero() {
        assert_eq!(ajouter("0", "7"), "7");
        assert_eq!(ajouter("0", "+"), "0");
        assert_eq!(ajouter("0", "-"), "-");
        assert_eq!(ajouter("0", "."), "0.");
    }

    #[test]
    fn depuis_un_etat_erreur() {
        assert_eq!(ajouter("Domain Error", "7"), "7");
        assert_eq!(ajouter("Syntax Error", "+"), "Syntax Error");
        assert_eq!(ajouter("Solver Failed", "-"), "Solver Failed");
    }

    #[test]
    fn multiplication_implicite() {
        assert_eq!(inserer_fonction_ou_constante("2", "("), "2*(");
        assert_eq!(inserer_fonction_ou_constante("(1+2)", "sin"), "(1+2)*sin(");
        assert_eq!(inserer_fonction_ou_constante("2", "π"), "2*π");
        assert_eq!(inserer_fonction_ou_constante("π", "e"), "π*e");
        // pas de '*' après un opérateur ou une ouvrante
        assert_eq!(inserer_fonction_ou_constante("2+", "cos"), "2+cos(");
        assert_eq!(inserer_fonction_ou_constante("(", "("), "((");
    }

    #[test]
    fn fonction_depuis_zero_ou_erreur() {
        assert_eq!(inserer_fonction_ou_constante("0", "sin"), "sin(");
        assert_eq!(
            inserer_fonction_ou_constante("Mismatched Parentheses", "nPr"),
            "nPr("
        );
    }

    #[test]
    fn effacement() {
        assert_eq!(effacer_dernier("123"), "12");
        assert_eq!(effacer_dernier("7"), "0");
        assert_eq!(effacer_dernier("0"), "0");
        assert_eq!(effacer_dernier("2*π"), "2*");
    }
}
