// src/app/reglages.rs
//
// Préférences persistées (thème + précision d'arrondi), via le stockage
// d'eframe. Toute valeur absente ou illisible retombe sur le défaut.

use serde::{Deserialize, Serialize};

use crate::noyau::PrecisionArrondi;

use super::theme::{theme_clair, theme_sombre, ChoixTheme, CouleursTheme};

/// Clé unique dans le stockage eframe.
pub const CLE_STOCKAGE: &str = "reglages";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Reglages {
    pub theme: ChoixTheme,
    /// Thème personnalisé enregistré, s'il existe.
    pub theme_perso: Option<CouleursTheme>,
    pub precision: PrecisionArrondi,
}

impl Reglages {
    /// Relit les préférences du stockage ; défauts si absentes ou illisibles.
    pub fn charger(stockage: Option<&dyn eframe::Storage>) -> Self {
        stockage
            .and_then(|s| eframe::get_value(s, CLE_STOCKAGE))
            .unwrap_or_default()
    }

    pub fn sauver(&self, stockage: &mut dyn eframe::Storage) {
        eframe::set_value(stockage, CLE_STOCKAGE, self);
    }

    /// Palette effective. "Perso" sans thème enregistré retombe sur sombre.
    pub fn couleurs(&self) -> CouleursTheme {
        match self.theme {
            ChoixTheme::Clair => theme_clair(),
            ChoixTheme::Sombre => theme_sombre(),
            ChoixTheme::Perso => self.theme_perso.clone().unwrap_or_else(theme_sombre),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defauts() {
        let r = Reglages::default();
        assert_eq!(r.theme, ChoixTheme::Sombre);
        assert!(r.theme_perso.is_none());
        assert_eq!(r.precision, PrecisionArrondi::Aucune);
    }

    #[test]
    fn perso_sans_theme_retombe_sur_sombre() {
        let r = Reglages {
            theme: ChoixTheme::Perso,
            ..Reglages::default()
        };
        assert_eq!(r.couleurs(), theme_sombre());
    }

    #[test]
    fn aller_retour_serde() {
        let r = Reglages {
            theme: ChoixTheme::Clair,
            theme_perso: Some(theme_clair()),
            precision: PrecisionArrondi::Decimales(4),
        };
        let json = serde_json::to_string(&r).expect("sérialisable");
        let relu: Reglages = serde_json::from_str(&json).expect("relisible");
        assert_eq!(relu.theme, ChoixTheme::Clair);
        assert_eq!(relu.precision, PrecisionArrondi::Decimales(4));
    }

    #[test]
    fn champ_manquant_prend_le_defaut() {
        let relu: Reglages = serde_json::from_str(r#"{"theme":"Clair"}"#).expect("relisible");
        assert_eq!(relu.theme, ChoixTheme::Clair);
        assert_eq!(relu.precision, PrecisionArrondi::Aucune);
    }
}
