// src/app/etat.rs
//
// État de l'application + dispatch des touches du pavé.
//
// Le noyau (crate::noyau) fait tout le calcul local ; le solveur distant
// (crate::solveur) traite équations, division posée et assistant. Les appels
// distants partent dans un thread dédié et reviennent par canal mpsc, sondé à
// chaque trame par `sonder_canaux`.

use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use num_rational::Rational64;

use crate::noyau::{self, ErreurCalc};
use crate::solveur::{EvenementChat, MessageChat, RoleChat, Solveur, SolveurGemini};

use super::reglages::Reglages;
use super::saisie;
use super::theme::CouleursTheme;

/// Onglets du panneau de fonctions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OngletFonctions {
    #[default]
    Scientifique,
    Probabilites,
    Algebre,
    Constantes,
    Utilitaires,
}

/// Une ligne d'historique : "expr = résultat" ou "équation => solution".
#[derive(Clone, Debug)]
pub struct EntreeHistorique {
    pub entree: String,
    pub horodatage: String,
}

const SALUTATION_ASSISTANT: &str = "Hello! How can I help you with math today?";
const EXCUSE_ASSISTANT: &str = "Sorry, I encountered an error. Please try again.";

pub struct AppCalc {
    // --- calculatrice ---
    pub affichage: String,
    pub fraction: Option<Rational64>,
    pub historique: Vec<EntreeHistorique>, // plus récent en tête
    pub reglages: Reglages,

    // --- fenêtres ---
    pub panneau_fonctions: bool,
    pub onglet_fonctions: OngletFonctions,
    pub fenetre_historique: bool,
    pub fenetre_reglages: bool,
    pub fenetre_theme_perso: bool,
    pub fenetre_assistant: bool,
    pub fenetre_division: bool,
    pub fenetre_graphe: bool,
    pub fenetre_formules: bool,

    /// Expression tracée, éditable dans la fenêtre graphique.
    pub expression_graphe: String,

    /// Brouillon de l'éditeur de thème (validé par "Enregistrer").
    pub brouillon_theme: CouleursTheme,

    // --- solveur distant ---
    solveur: Option<Arc<dyn Solveur>>,
    pub en_resolution: bool,
    canal_resolution: Option<Receiver<(String, Result<String, String>)>>,

    // --- assistant ---
    pub messages_chat: Vec<MessageChat>,
    pub saisie_chat: String,
    pub chat_en_attente: bool,
    canal_chat: Option<Receiver<EvenementChat>>,

    // --- division posée ---
    pub dividende: String,
    pub diviseur: String,
    pub resultat_division: String,
    pub division_en_cours: bool,
    canal_division: Option<Receiver<Result<String, String>>>,
}

impl AppCalc {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let reglages = Reglages::charger(cc.storage);
        let brouillon_theme = reglages.couleurs();
        Self {
            affichage: "0".to_string(),
            fraction: None,
            historique: Vec::new(),
            reglages,
            panneau_fonctions: false,
            onglet_fonctions: OngletFonctions::default(),
            fenetre_historique: false,
            fenetre_reglages: false,
            fenetre_theme_perso: false,
            fenetre_assistant: false,
            fenetre_division: false,
            fenetre_graphe: false,
            fenetre_formules: false,
            expression_graphe: String::new(),
            brouillon_theme,
            solveur: SolveurGemini::depuis_env().map(|s| Arc::new(s) as Arc<dyn Solveur>),
            en_resolution: false,
            canal_resolution: None,
            messages_chat: vec![MessageChat {
                role: RoleChat::Modele,
                texte: SALUTATION_ASSISTANT.to_string(),
            }],
            saisie_chat: String::new(),
            chat_en_attente: false,
            canal_chat: None,
            dividende: String::new(),
            diviseur: String::new(),
            resultat_division: String::new(),
            division_en_cours: false,
            canal_division: None,
        }
    }

    /* ------------------------ Dispatch du pavé ------------------------ */

    /// Point d'entrée unique des touches (pavé ET clavier physique).
    pub fn touche(&mut self, valeur: &str) {
        if saisie::est_fonction_pave(valeur) || saisie::est_constante_pave(valeur) || valeur == "("
        {
            self.affichage = saisie::inserer_fonction_ou_constante(&self.affichage, valeur);
            self.fraction = None;
            return;
        }

        match valeur {
            "Fn" => self.panneau_fonctions = !self.panneau_fonctions,
            "Réglages" => self.fenetre_reglages = true,
            "Solve" => self.lancer_resolution(),
            "Graphe" => {
                self.expression_graphe = graine_graphe(&self.affichage);
                self.fenetre_graphe = true;
            }
            "Formules" => self.fenetre_formules = true,
            "Division" => self.fenetre_division = true,
            "Assistant" => self.fenetre_assistant = true,
            "Hist" => self.fenetre_historique = true,
            "C" => {
                self.affichage = "0".to_string();
                self.fraction = None;
            }
            "DEL" => {
                self.affichage = saisie::effacer_dernier(&self.affichage);
                self.fraction = None;
            }
            "=" => self.egal(),
            "%" | "!" => self.affichage.push_str(valeur),
            _ => self.affichage = saisie::ajouter(&self.affichage, valeur),
        }
    }

    /// '=' : équation complète => solveur, équation entamée => on ajoute '=',
    /// sinon évaluation locale.
    fn egal(&mut self) {
        if contient_inconnue(&self.affichage) {
            let parts: Vec<&str> = self.affichage.split('=').collect();
            if parts.len() == 2 && !parts[0].trim().is_empty() && !parts[1].trim().is_empty() {
                self.lancer_resolution();
            } else if parts.len() == 1 {
                self.affichage.push('=');
            }
            return;
        }
        self.evaluer();
    }

    /// Évaluation locale du tampon, inscription dans l'historique.
    fn evaluer(&mut self) {
        match noyau::eval_expression(&self.affichage, self.reglages.precision) {
            Ok(ev) => {
                self.historique.insert(
                    0,
                    EntreeHistorique {
                        entree: format!("{} = {}", ev.expression, ev.texte),
                        horodatage: heure_locale(),
                    },
                );
                self.affichage = ev.texte;
                self.fraction = ev.fraction;
            }
            Err(e) => {
                self.affichage = e.to_string();
                self.fraction = None;
            }
        }
    }

    /* ------------------------ Solveur d'équations ------------------------ */

    fn lancer_resolution(&mut self) {
        if self.en_resolution {
            return;
        }
        if !contient_inconnue(&self.affichage) || !self.affichage.contains('=') {
            self.affichage = ErreurCalc::EquationInvalide.to_string();
            self.fraction = None;
            return;
        }
        let Some(solveur) = self.solveur.clone() else {
            log::warn!("résolution demandée sans clé d'API");
            self.affichage = ErreurCalc::SolveurEchoue.to_string();
            self.fraction = None;
            return;
        };

        let equation = self.affichage.clone();
        self.en_resolution = true;
        self.fraction = None;

        let (tx, rx) = channel();
        self.canal_resolution = Some(rx);
        thread::spawn(move || {
            let resultat = solveur.resoudre(&equation).map_err(|e| e.to_string());
            let _ = tx.send((equation, resultat));
        });
    }

    /* ------------------------ Assistant ------------------------ */

    pub fn envoyer_chat(&mut self, texte: &str) {
        let texte = texte.trim().to_string();
        if texte.is_empty() || self.chat_en_attente {
            return;
        }
        let Some(solveur) = self.solveur.clone() else {
            self.messages_chat.push(MessageChat {
                role: RoleChat::Modele,
                texte: EXCUSE_ASSISTANT.to_string(),
            });
            return;
        };

        // l'historique envoyé s'arrête AVANT le nouveau tour
        let historique = self.messages_chat.clone();

        self.messages_chat.push(MessageChat {
            role: RoleChat::Utilisateur,
            texte: texte.clone(),
        });
        // le tour du modèle se remplit au fil des fragments
        self.messages_chat.push(MessageChat {
            role: RoleChat::Modele,
            texte: String::new(),
        });
        self.chat_en_attente = true;
        self.saisie_chat.clear();

        let (tx, rx) = channel();
        self.canal_chat = Some(rx);
        thread::spawn(move || {
            let fin = match solveur.chat(&historique, &texte, &tx) {
                Ok(()) => EvenementChat::Fin,
                Err(e) => {
                    log::error!("assistant: {e}");
                    EvenementChat::Echec
                }
            };
            let _ = tx.send(fin);
        });
    }

    /* ------------------------ Division posée ------------------------ */

    pub fn lancer_division(&mut self) {
        if self.division_en_cours {
            return;
        }
        let dividende = self.dividende.trim().to_string();
        let diviseur = self.diviseur.trim().to_string();

        let entiers = !dividende.is_empty()
            && !diviseur.is_empty()
            && dividende.chars().all(|c| c.is_ascii_digit())
            && diviseur.chars().all(|c| c.is_ascii_digit());
        if !entiers {
            self.resultat_division =
                "Entrée invalide : entiers non négatifs seulement.".to_string();
            return;
        }
        if diviseur.chars().all(|c| c == '0') {
            self.resultat_division = "Erreur : division par zéro impossible.".to_string();
            return;
        }
        let Some(solveur) = self.solveur.clone() else {
            self.resultat_division = ErreurCalc::SolveurEchoue.to_string();
            return;
        };

        self.division_en_cours = true;
        self.resultat_division.clear();

        let (tx, rx) = channel();
        self.canal_division = Some(rx);
        thread::spawn(move || {
            let resultat = solveur
                .division_longue(&dividende, &diviseur)
                .map_err(|e| e.to_string());
            let _ = tx.send(resultat);
        });
    }

    /* ------------------------ Sonde des canaux ------------------------ */

    /// Relève les résultats des threads distants. Appelé à chaque trame.
    pub fn sonder_canaux(&mut self) {
        if let Some(rx) = &self.canal_resolution {
            match rx.try_recv() {
                Ok((equation, Ok(reponse))) => {
                    let reponse = reponse.trim().to_string();
                    self.historique.insert(
                        0,
                        EntreeHistorique {
                            entree: format!("{equation} => {reponse}"),
                            horodatage: heure_locale(),
                        },
                    );
                    self.affichage = reponse;
                    self.en_resolution = false;
                    self.canal_resolution = None;
                }
                Ok((_, Err(e))) => {
                    log::error!("solveur: {e}");
                    self.affichage = ErreurCalc::SolveurEchoue.to_string();
                    self.en_resolution = false;
                    self.canal_resolution = None;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    self.affichage = ErreurCalc::SolveurEchoue.to_string();
                    self.en_resolution = false;
                    self.canal_resolution = None;
                }
            }
        }

        if let Some(rx) = &self.canal_chat {
            loop {
                match rx.try_recv() {
                    Ok(EvenementChat::Jeton(fragment)) => {
                        if let Some(dernier) = self.messages_chat.last_mut() {
                            dernier.texte.push_str(&fragment);
                        }
                    }
                    Ok(EvenementChat::Fin) => {
                        self.chat_en_attente = false;
                        self.canal_chat = None;
                        break;
                    }
                    Ok(EvenementChat::Echec) | Err(TryRecvError::Disconnected) => {
                        if let Some(dernier) = self.messages_chat.last_mut() {
                            dernier.texte = EXCUSE_ASSISTANT.to_string();
                        }
                        self.chat_en_attente = false;
                        self.canal_chat = None;
                        break;
                    }
                    Err(TryRecvError::Empty) => break,
                }
            }
        }

        if let Some(rx) = &self.canal_division {
            match rx.try_recv() {
                Ok(Ok(texte)) => {
                    self.resultat_division = texte;
                    self.division_en_cours = false;
                    self.canal_division = None;
                }
                Ok(Err(e)) => {
                    log::error!("division posée: {e}");
                    self.resultat_division =
                        "Une erreur est survenue pendant le calcul. Réessayez.".to_string();
                    self.division_en_cours = false;
                    self.canal_division = None;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    self.division_en_cours = false;
                    self.canal_division = None;
                }
            }
        }
    }

    pub fn solveur_disponible(&self) -> bool {
        self.solveur.is_some()
    }

    #[cfg(test)]
    pub fn pour_tests() -> Self {
        Self {
            affichage: "0".to_string(),
            fraction: None,
            historique: Vec::new(),
            reglages: Reglages::default(),
            panneau_fonctions: false,
            onglet_fonctions: OngletFonctions::default(),
            fenetre_historique: false,
            fenetre_reglages: false,
            fenetre_theme_perso: false,
            fenetre_assistant: false,
            fenetre_division: false,
            fenetre_graphe: false,
            fenetre_formules: false,
            expression_graphe: String::new(),
            brouillon_theme: CouleursTheme::default(),
            solveur: None,
            en_resolution: false,
            canal_resolution: None,
            messages_chat: Vec::new(),
            saisie_chat: String::new(),
            chat_en_attente: false,
            canal_chat: None,
            dividende: String::new(),
            diviseur: String::new(),
            resultat_division: String::new(),
            division_en_cours: false,
            canal_division: None,
        }
    }
}

/// Le tampon contient-il une inconnue algébrique ?
fn contient_inconnue(affichage: &str) -> bool {
    affichage.chars().any(|c| matches!(c, 'x' | 'y' | 'z'))
}

/// Expression initiale de la fenêtre graphique : "y=" de tête retiré, tampon
/// vide si l'affichage est "0" ou une étiquette (que des lettres/espaces).
fn graine_graphe(affichage: &str) -> String {
    if let Some(reste) = affichage.strip_prefix("y=") {
        return reste.to_string();
    }
    let que_des_lettres = affichage
        .chars()
        .all(|c| c.is_ascii_alphabetic() || c == ' ');
    if affichage == "0" || que_des_lettres {
        String::new()
    } else {
        affichage.to_string()
    }
}

fn heure_locale() -> String {
    chrono::Local::now().format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taper(app: &mut AppCalc, touches: &[&str]) {
        for t in touches {
            app.touche(t);
        }
    }

    #[test]
    fn calcul_simple_et_historique() {
        let mut app = AppCalc::pour_tests();
        taper(&mut app, &["2", "+", "3", "="]);
        assert_eq!(app.affichage, "5");
        assert_eq!(app.historique.len(), 1);
        assert_eq!(app.historique[0].entree, "2+3 = 5");
    }

    #[test]
    fn remplacement_puis_calcul() {
        let mut app = AppCalc::pour_tests();
        taper(&mut app, &["5", "+", "-", "3", "="]);
        assert_eq!(app.affichage, "2");
    }

    #[test]
    fn erreur_puis_reprise() {
        let mut app = AppCalc::pour_tests();
        taper(&mut app, &["1", "/", "0", "="]);
        assert_eq!(app.affichage, "Domain Error");
        // opérateur ignoré depuis un état d'erreur
        app.touche("+");
        assert_eq!(app.affichage, "Domain Error");
        // chiffre : on repart de zéro
        app.touche("7");
        assert_eq!(app.affichage, "7");
    }

    #[test]
    fn equation_entamee_puis_complete() {
        let mut app = AppCalc::pour_tests();
        taper(&mut app, &["2", "*", "x", "="]);
        // une seule partie : '=' s'ajoute au tampon
        assert_eq!(app.affichage, "2*x=");
        taper(&mut app, &["8", "="]);
        // équation complète sans solveur disponible
        assert_eq!(app.affichage, "Solver Failed");
    }

    #[test]
    fn solve_sans_egal_est_invalide() {
        let mut app = AppCalc::pour_tests();
        taper(&mut app, &["x", "+", "1"]);
        app.touche("Solve");
        assert_eq!(app.affichage, "Invalid Equation");
    }

    #[test]
    fn solve_sans_inconnue_est_invalide() {
        let mut app = AppCalc::pour_tests();
        taper(&mut app, &["1", "+", "1"]);
        app.touche("Solve");
        assert_eq!(app.affichage, "Invalid Equation");
    }

    #[test]
    fn pourcent_et_factorielle_s_ajoutent_brut() {
        let mut app = AppCalc::pour_tests();
        taper(&mut app, &["5", "0", "%", "="]);
        assert_eq!(app.affichage, "0.5");
        assert_eq!(app.fraction, Some(Rational64::new(1, 2)));

        taper(&mut app, &["C", "5", "!", "="]);
        assert_eq!(app.affichage, "120");
        assert_eq!(app.fraction, None);
    }

    #[test]
    fn effacement_et_remise_a_zero() {
        let mut app = AppCalc::pour_tests();
        taper(&mut app, &["1", "2", "DEL"]);
        assert_eq!(app.affichage, "1");
        app.touche("C");
        assert_eq!(app.affichage, "0");
    }

    #[test]
    fn fonction_et_constante_depuis_le_pave() {
        let mut app = AppCalc::pour_tests();
        taper(&mut app, &["2", "sin"]);
        assert_eq!(app.affichage, "2*sin(");
        taper(&mut app, &["3", "0", ")", "="]);
        assert_eq!(app.affichage, "1");
    }

    #[test]
    fn graine_de_la_fenetre_graphique() {
        assert_eq!(graine_graphe("y=x^2"), "x^2");
        assert_eq!(graine_graphe("0"), "");
        assert_eq!(graine_graphe("Syntax Error"), "");
        assert_eq!(graine_graphe("x+1"), "x+1");
    }

    #[test]
    fn division_posee_validation_locale() {
        let mut app = AppCalc::pour_tests();
        app.dividende = "12.5".to_string();
        app.diviseur = "3".to_string();
        app.lancer_division();
        assert!(app.resultat_division.contains("Entrée invalide"));
        assert!(!app.division_en_cours);

        app.dividende = "10".to_string();
        app.diviseur = "0".to_string();
        app.lancer_division();
        assert!(app.resultat_division.contains("division par zéro"));
    }
}
