//! Tests de propriétés : robustesse + déterminisme + bornes contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - budget temps global
//! - toute sortie est soit un nombre fini, soit une étiquette de l'ensemble
//!   fermé (jamais de panique, jamais de NaN affiché)

use std::time::{Duration, Instant};

use super::erreur::{est_etat_erreur, ErreurCalc};
use super::eval::eval_expression;
use super::format::{decimale_en_fraction, fraction_en_texte, PrecisionArrondi};

/* ------------------------ RNG déterministe minimal ------------------------ */

struct Rng {
    etat: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { etat: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.etat = self.etat.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.etat >> 32) as u32
    }
    fn pioche(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(debut: Instant, max: Duration) {
    if debut.elapsed() > max {
        panic!("budget temps dépassé: {max:?}");
    }
}

/* ------------------------ Génération d'expressions (bornée) ------------------------ */

fn gen_atome(rng: &mut Rng) -> String {
    match rng.pioche(7) {
        0 => "0".to_string(),
        1 => format!("{}", rng.pioche(100)),
        2 => format!("{}.{}", rng.pioche(50), rng.pioche(100)),
        3 => "π".to_string(),
        4 => format!("{}!", rng.pioche(10)),
        5 => format!("{}%", rng.pioche(200)),
        _ => format!("nCr({},{})", rng.pioche(8), rng.pioche(8)),
    }
}

fn gen_expr(rng: &mut Rng, profondeur: usize) -> String {
    if profondeur == 0 {
        return gen_atome(rng);
    }
    let a = gen_expr(rng, profondeur - 1);
    let b = gen_expr(rng, profondeur - 1);
    match rng.pioche(8) {
        0 => format!("({a}+{b})"),
        1 => format!("({a}-{b})"),
        2 => format!("({a}*{b})"),
        3 => format!("({a}/{b})"),
        4 => format!("({a}^{})", rng.pioche(4)),
        5 => format!("sin({a})"),
        6 => format!("root({},{a})", 1 + rng.pioche(4)),
        _ => gen_atome(rng),
    }
}

/* ------------------------ Tests ------------------------ */

#[test]
fn proprietes_jamais_de_panique_ni_de_nan_affiche() {
    let t0 = Instant::now();
    let max = Duration::from_millis(400);

    let mut rng = Rng::new(0xC0FFEE_u64);

    let mut succes = 0usize;
    let mut erreurs = 0usize;

    for _ in 0..200 {
        budget(t0, max);

        let expr = gen_expr(&mut rng, 3);

        match eval_expression(&expr, PrecisionArrondi::Aucune) {
            Ok(ev) => {
                assert!(ev.valeur.is_finite(), "valeur non finie pour {expr:?}");
                assert!(!ev.texte.is_empty());
                succes += 1;
            }
            Err(e) => {
                // chaque échec doit porter une étiquette de l'ensemble fermé
                assert!(est_etat_erreur(&e.to_string()), "étiquette hors ensemble: {e}");
                erreurs += 1;
            }
        }
    }

    // Le générateur doit balayer les deux côtés, sinon il ne teste rien.
    assert!(succes > 20, "trop peu de succès: {succes}");
    assert!(erreurs > 0, "aucune erreur vue: générateur trop sage");
}

#[test]
fn proprietes_addition_entiere_exacte() {
    let t0 = Instant::now();
    let max = Duration::from_millis(200);

    let mut rng = Rng::new(0xBADC0DE_u64);

    for _ in 0..100 {
        budget(t0, max);

        let a = rng.pioche(1_000_000) as i64 - 500_000;
        let b = rng.pioche(1_000_000) as i64 - 500_000;
        // le '-' de tête est un moins unaire valide pour la grammaire
        let expr = format!("{a}+{b}");

        let ev = eval_expression(&expr, PrecisionArrondi::Aucune)
            .unwrap_or_else(|e| panic!("{expr:?}: {e}"));
        assert_eq!(ev.valeur, (a + b) as f64, "pour {expr:?}");
    }
}

#[test]
fn proprietes_aller_retour_fraction() {
    let t0 = Instant::now();
    let max = Duration::from_millis(200);

    let mut rng = Rng::new(0xFACADE_u64);

    for _ in 0..150 {
        budget(t0, max);

        let q = 2 + rng.pioche(9_999) as i64; // 2..=10000
        let mut p = rng.pioche(50_000) as i64 + 1;
        if rng.pioche(2) == 1 {
            p = -p;
        }
        let x = p as f64 / q as f64;
        if x.fract() == 0.0 {
            continue; // entier : refus attendu, rien à vérifier
        }

        let r = match decimale_en_fraction(x) {
            Some(r) => r,
            None => continue, // |x| hors bornes ou convergent > 10000 après réduction
        };

        // le texte "p/q" doit re-parser vers la même valeur à 1e-9 près
        let texte = fraction_en_texte(&r);
        let (num, den) = texte.split_once('/').expect("forme p/q");
        let re: f64 = num.parse::<f64>().expect("numérateur") / den.parse::<f64>().expect("dénominateur");
        assert!(
            (re - x).abs() <= x.abs() * 1e-9,
            "aller-retour raté pour {p}/{q}: {texte}"
        );
        assert!(*r.denom() <= 10_000, "dénominateur hors borne: {texte}");
    }
}

#[test]
fn proprietes_classement_stable() {
    // Les trois familles d'échec ne se mélangent pas.
    for (expr, attendu) in [
        ("(((1+2", ErreurCalc::ParenthesesDesequilibrees),
        ("root(1,2,3)+nPr(4)", ErreurCalc::ArgumentsFonction),
        ("1/0+5", ErreurCalc::Domaine),
        ("*", ErreurCalc::Syntaxe),
    ] {
        match eval_expression(expr, PrecisionArrondi::Aucune) {
            Err(e) => assert_eq!(e, attendu, "pour {expr:?}"),
            Ok(ev) => panic!("succès inattendu pour {expr:?}: {}", ev.texte),
        }
    }
}
