// src/noyau/jetons.rs

#[derive(Clone, Debug, PartialEq)]
pub enum Jeton {
    Num(f64),

    // Identifiants (fonctions nommées). Le parse (RPN->Expr) décide si c'est
    // une fonction connue ou un identifiant libre (x pour le graphe).
    Ident(String),

    Plus,
    Moins,
    Etoile,
    Barre,
    Circonflexe, // ^ (ou **)

    // Moins UNAIRE : jamais produit ici, injecté par rpn.rs quand un '-'
    // arrive en position de préfixe.
    Neg,

    Virgule,
    ParG,
    ParD,
}

/// Tokenize la forme canonique (sortie du prétraitement) en jetons.
/// Supporte :
/// - littéraux décimaux (12, 3.5, 2e3, 1.5e-2)
/// - opérateurs + - * / ^ (et ** comme synonyme de ^)
/// - parenthèses et virgule (arguments de fonction)
/// - pi / π (constante), e SEUL (constante d'Euler)
/// - identifiants [a-zA-Z_][a-zA-Z0-9_]* (normalisés en minuscules)
pub fn tokenize(s: &str) -> Result<Vec<Jeton>, String> {
    let mut out = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if c == '(' {
            out.push(Jeton::ParG);
            i += 1;
            continue;
        }
        if c == ')' {
            out.push(Jeton::ParD);
            i += 1;
            continue;
        }
        if c == ',' {
            out.push(Jeton::Virgule);
            i += 1;
            continue;
        }

        match c {
            '+' => {
                out.push(Jeton::Plus);
                i += 1;
                continue;
            }
            '-' => {
                out.push(Jeton::Moins);
                i += 1;
                continue;
            }
            '*' => {
                // ** == ^
                if i + 1 < chars.len() && chars[i + 1] == '*' {
                    out.push(Jeton::Circonflexe);
                    i += 2;
                } else {
                    out.push(Jeton::Etoile);
                    i += 1;
                }
                continue;
            }
            '/' => {
                out.push(Jeton::Barre);
                i += 1;
                continue;
            }
            '^' => {
                out.push(Jeton::Circonflexe);
                i += 1;
                continue;
            }
            _ => {}
        }

        // π résiduel (normalement déjà réécrit en "pi" par le prétraitement)
        if c == 'π' {
            out.push(Jeton::Num(std::f64::consts::PI));
            i += 1;
            continue;
        }

        // Identifiants ASCII : [a-zA-Z_][a-zA-Z0-9_]*
        if c.is_ascii_alphabetic() || c == '_' {
            let debut = i;
            i += 1;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let mot: String = chars[debut..i].iter().collect();
            let m = mot.to_lowercase();

            // Constantes résolues dès ici. "e" seul est Euler ; un "e" collé
            // à un nombre est la notation scientifique, consommée plus bas
            // par le lexeur numérique.
            match m.as_str() {
                "pi" => out.push(Jeton::Num(std::f64::consts::PI)),
                "e" => out.push(Jeton::Num(std::f64::consts::E)),
                _ => out.push(Jeton::Ident(m)),
            }
            continue;
        }

        // Littéral numérique : chiffres, point décimal optionnel,
        // suffixe scientifique optionnel (e/E [+-] chiffres).
        if c.is_ascii_digit() || (c == '.' && i + 1 < chars.len() && chars[i + 1].is_ascii_digit())
        {
            let debut = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            if i < chars.len() && chars[i] == '.' {
                i += 1;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
            }
            // suffixe scientifique : seulement si un chiffre suit bien
            if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                let mut j = i + 1;
                if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                    j += 1;
                }
                if j < chars.len() && chars[j].is_ascii_digit() {
                    i = j;
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                }
            }
            let texte: String = chars[debut..i].iter().collect();
            let n: f64 = texte
                .parse()
                .map_err(|_| format!("nombre invalide: {texte:?}"))?;
            out.push(Jeton::Num(n));
            continue;
        }

        return Err(format!("caractère inattendu: '{c}'"));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nombres_et_operateurs() {
        let j = tokenize("1.5+2*3").unwrap();
        assert_eq!(
            j,
            vec![
                Jeton::Num(1.5),
                Jeton::Plus,
                Jeton::Num(2.0),
                Jeton::Etoile,
                Jeton::Num(3.0),
            ]
        );
    }

    #[test]
    fn double_etoile_egale_circonflexe() {
        assert_eq!(tokenize("2**3").unwrap(), tokenize("2^3").unwrap());
    }

    #[test]
    fn constantes() {
        assert_eq!(
            tokenize("pi").unwrap(),
            vec![Jeton::Num(std::f64::consts::PI)]
        );
        assert_eq!(
            tokenize("e").unwrap(),
            vec![Jeton::Num(std::f64::consts::E)]
        );
        // e collé à un nombre = notation scientifique, pas Euler
        assert_eq!(tokenize("2e3").unwrap(), vec![Jeton::Num(2000.0)]);
        assert_eq!(tokenize("1.5e-2").unwrap(), vec![Jeton::Num(0.015)]);
    }

    #[test]
    fn fonction_et_virgule() {
        let j = tokenize("nPr(5,2)").unwrap();
        assert_eq!(
            j,
            vec![
                Jeton::Ident("npr".into()),
                Jeton::ParG,
                Jeton::Num(5.0),
                Jeton::Virgule,
                Jeton::Num(2.0),
                Jeton::ParD,
            ]
        );
    }

    #[test]
    fn caractere_inconnu() {
        assert!(tokenize("5#2").is_err());
        assert!(tokenize("5%2").is_err()); // % est consommé par le prétraitement
    }
}
