//! Solveur distant (API generative-language, REST v1beta).
//!
//! Trois opérations :
//! - `resoudre`        : équations algébriques ("x = 3"), réponse complète
//! - `division_longue` : division posée, mise en page monospace
//! - `chat`            : assistant conversationnel, réponse en flux SSE
//!
//! Les appels sont BLOQUANTS (reqwest::blocking) : l'état UI les lance dans
//! un thread dédié et récupère le résultat par canal mpsc.

use std::io::{BufRead, BufReader};
use std::sync::mpsc::Sender;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const MODELE: &str = "gemini-2.5-flash";

const INSTRUCTION_RESOLUTION: &str = "You are an algebra solver. When given an equation, \
solve for the variable(s). Your response must only be the final answer for the variable, \
for example: 'x = 3'. If there are multiple solutions, separate them with a comma, for \
example: 'x = 2, x = -2'. Do not include any explanations, apologies, or conversational \
text. Only provide the result.";

const INSTRUCTION_DIVISION: &str = "You are a math tutor. Your task is to provide the full \
step-by-step process of long division as you would write it on paper. Use monospaced \
formatting, ensuring all numbers, subtraction lines, and the final remainder are perfectly \
aligned. Do not include any other explanations, conversational text, or introductions. \
Only provide the formatted long division calculation.";

const INSTRUCTION_ASSISTANT: &str = "You are a helpful and friendly math assistant. Your \
goal is to help users understand mathematical concepts. When asked to solve a problem, \
provide a clear, step-by-step explanation. Format your answers clearly, using markdown for \
things like code blocks for equations or lists for steps. Use **text** for bolding.";

/* ------------------------ Erreurs ------------------------ */

#[derive(Debug, Error)]
pub enum ErreurSolveur {
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("flux interrompu: {0}")]
    Flux(#[from] std::io::Error),
    #[error("réponse sans texte")]
    ReponseVide,
}

/* ------------------------ Messages ------------------------ */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoleChat {
    Utilisateur,
    Modele,
}

impl RoleChat {
    fn nom_api(self) -> &'static str {
        match self {
            RoleChat::Utilisateur => "user",
            RoleChat::Modele => "model",
        }
    }
}

#[derive(Clone, Debug)]
pub struct MessageChat {
    pub role: RoleChat,
    pub texte: String,
}

/// Événement émis pendant un chat en flux.
#[derive(Debug)]
pub enum EvenementChat {
    /// Un fragment de texte du modèle.
    Jeton(String),
    /// Fin normale du flux.
    Fin,
    /// Échec (déjà journalisé côté solveur).
    Echec,
}

/* ------------------------ Contrat ------------------------ */

pub trait Solveur: Send + Sync {
    /// Résout une équation ("2x+5=15") et retourne la réponse brute du modèle.
    fn resoudre(&self, equation: &str) -> Result<String, ErreurSolveur>;

    /// Division posée, mise en page monospace.
    fn division_longue(&self, dividende: &str, diviseur: &str) -> Result<String, ErreurSolveur>;

    /// Conversation en flux : chaque fragment part sur `jetons` au fil de
    /// l'eau. `historique` est la conversation AVANT `message`.
    fn chat(
        &self,
        historique: &[MessageChat],
        message: &str,
        jetons: &Sender<EvenementChat>,
    ) -> Result<(), ErreurSolveur>;
}

/* ------------------------ Protocole JSON ------------------------ */

#[derive(Serialize)]
struct Corps {
    #[serde(rename = "system_instruction")]
    instruction: Contenu,
    contents: Vec<Contenu>,
}

#[derive(Serialize)]
struct Contenu {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

impl Contenu {
    fn systeme(texte: &str) -> Self {
        Contenu {
            role: None,
            parts: vec![Part {
                text: texte.to_string(),
            }],
        }
    }

    fn tour(role: RoleChat, texte: &str) -> Self {
        Contenu {
            role: Some(role.nom_api()),
            parts: vec![Part {
                text: texte.to_string(),
            }],
        }
    }
}

#[derive(Deserialize)]
struct Reponse {
    candidates: Option<Vec<Candidat>>,
}

#[derive(Deserialize)]
struct Candidat {
    content: Option<ContenuRecu>,
}

#[derive(Deserialize)]
struct ContenuRecu {
    parts: Option<Vec<PartRecue>>,
}

#[derive(Deserialize)]
struct PartRecue {
    text: Option<String>,
}

/// Concatène le texte du premier candidat, None si la réponse est creuse.
fn extraire_texte(reponse: Reponse) -> Option<String> {
    let texte: String = reponse
        .candidates?
        .into_iter()
        .next()?
        .content?
        .parts?
        .into_iter()
        .filter_map(|p| p.text)
        .collect();
    if texte.is_empty() {
        None
    } else {
        Some(texte)
    }
}

/// Extrait le texte d'une ligne SSE ("data: {...}"), None sinon.
fn texte_de_ligne_sse(ligne: &str) -> Option<String> {
    let json = ligne.strip_prefix("data: ")?;
    let reponse: Reponse = serde_json::from_str(json).ok()?;
    extraire_texte(reponse)
}

/* ------------------------ Implémentation Gemini ------------------------ */

pub struct SolveurGemini {
    client: reqwest::blocking::Client,
    cle: String,
}

impl SolveurGemini {
    pub fn new(cle: String) -> Self {
        SolveurGemini {
            client: reqwest::blocking::Client::new(),
            cle,
        }
    }

    /// Lit la clé d'API dans l'environnement (GEMINI_API_KEY).
    pub fn depuis_env() -> Option<Self> {
        match std::env::var("GEMINI_API_KEY") {
            Ok(cle) if !cle.is_empty() => Some(Self::new(cle)),
            _ => {
                log::warn!("GEMINI_API_KEY absente: solveur distant désactivé");
                None
            }
        }
    }

    fn url(&self, operation: &str) -> String {
        // l'opération peut déjà porter une query (alt=sse)
        let separateur = if operation.contains('?') { '&' } else { '?' };
        format!(
            "{BASE_URL}/models/{MODELE}:{operation}{separateur}key={}",
            self.cle
        )
    }

    /// Appel simple (non-flux) : une instruction système + un tour utilisateur.
    fn generer(&self, instruction: &str, demande: &str) -> Result<String, ErreurSolveur> {
        let corps = Corps {
            instruction: Contenu::systeme(instruction),
            contents: vec![Contenu::tour(RoleChat::Utilisateur, demande)],
        };

        let reponse: Reponse = self
            .client
            .post(self.url("generateContent"))
            .json(&corps)
            .send()?
            .error_for_status()?
            .json()?;

        extraire_texte(reponse).ok_or(ErreurSolveur::ReponseVide)
    }
}

impl Solveur for SolveurGemini {
    fn resoudre(&self, equation: &str) -> Result<String, ErreurSolveur> {
        self.generer(
            INSTRUCTION_RESOLUTION,
            &format!("Solve this equation: {equation}"),
        )
    }

    fn division_longue(&self, dividende: &str, diviseur: &str) -> Result<String, ErreurSolveur> {
        self.generer(
            INSTRUCTION_DIVISION,
            &format!("Solve the long division problem: {dividende} / {diviseur}."),
        )
    }

    fn chat(
        &self,
        historique: &[MessageChat],
        message: &str,
        jetons: &Sender<EvenementChat>,
    ) -> Result<(), ErreurSolveur> {
        let mut contents: Vec<Contenu> = historique
            .iter()
            .map(|m| Contenu::tour(m.role, &m.texte))
            .collect();
        contents.push(Contenu::tour(RoleChat::Utilisateur, message));

        let corps = Corps {
            instruction: Contenu::systeme(INSTRUCTION_ASSISTANT),
            contents,
        };

        let reponse = self
            .client
            .post(self.url("streamGenerateContent?alt=sse"))
            .json(&corps)
            .send()?
            .error_for_status()?;

        for ligne in BufReader::new(reponse).lines() {
            let ligne = ligne?;
            if let Some(texte) = texte_de_ligne_sse(&ligne) {
                // le rendu n'interprète pas LaTeX : on retire les '$'
                let texte = texte.replace('$', "");
                if jetons.send(EvenementChat::Jeton(texte)).is_err() {
                    break; // récepteur parti, inutile de continuer
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corps_json_attendu() {
        let corps = Corps {
            instruction: Contenu::systeme("sois bref"),
            contents: vec![Contenu::tour(RoleChat::Utilisateur, "2+2 ?")],
        };
        let json = serde_json::to_string(&corps).expect("sérialisable");
        assert!(json.contains(r#""system_instruction""#));
        assert!(json.contains(r#""role":"user""#));
        assert!(json.contains(r#""text":"2+2 ?""#));
        // pas de rôle sur l'instruction système
        assert!(!json.contains(r#""role":null"#));
    }

    #[test]
    fn extraction_de_texte() {
        let brut = r#"{"candidates":[{"content":{"parts":[{"text":"x = "},{"text":"3"}]}}]}"#;
        let reponse: Reponse = serde_json::from_str(brut).expect("relisible");
        assert_eq!(extraire_texte(reponse).as_deref(), Some("x = 3"));

        let creux: Reponse = serde_json::from_str(r#"{"candidates":[]}"#).expect("relisible");
        assert!(extraire_texte(creux).is_none());
    }

    #[test]
    fn urls_avec_cle() {
        let s = SolveurGemini::new("k".to_string());
        assert!(s.url("generateContent").ends_with(":generateContent?key=k"));
        assert!(s
            .url("streamGenerateContent?alt=sse")
            .ends_with("streamGenerateContent?alt=sse&key=k"));
    }

    #[test]
    fn lignes_sse() {
        let ligne = r#"data: {"candidates":[{"content":{"parts":[{"text":"bon"}]}}]}"#;
        assert_eq!(texte_de_ligne_sse(ligne).as_deref(), Some("bon"));
        assert!(texte_de_ligne_sse("").is_none());
        assert!(texte_de_ligne_sse(": keep-alive").is_none());
        assert!(texte_de_ligne_sse("data: {pas du json}").is_none());
    }
}
