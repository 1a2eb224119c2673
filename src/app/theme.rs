// src/app/theme.rs
//
// Palettes de couleurs : clair / sombre intégrées + thème personnalisé.
// La palette est un simple dictionnaire de couleurs sérialisable ; elle est
// projetée sur egui::Visuals à chaque trame.

use eframe::egui;
use serde::{Deserialize, Serialize};

/// Choix de thème persisté. "Perso" n'est proposé que si un thème
/// personnalisé a été enregistré.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChoixTheme {
    Clair,
    #[default]
    Sombre,
    Perso,
}

/// Carte de couleurs d'un thème (fond, écran, familles de boutons).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CouleursTheme {
    pub fond: egui::Color32,
    pub corps: egui::Color32,
    pub ecran: egui::Color32,
    pub fenetre: egui::Color32,
    pub texte: egui::Color32,
    pub texte_ecran: egui::Color32,
    pub texte_ecran_secondaire: egui::Color32,
    pub bordure: egui::Color32,

    pub btn_defaut: egui::Color32,
    pub btn_defaut_texte: egui::Color32,
    pub btn_operateur: egui::Color32,
    pub btn_operateur_texte: egui::Color32,
    pub btn_fonction: egui::Color32,
    pub btn_fonction_texte: egui::Color32,
    pub btn_resoudre: egui::Color32,
    pub btn_resoudre_texte: egui::Color32,
    pub btn_effacer: egui::Color32,
    pub btn_effacer_texte: egui::Color32,
    pub btn_egal: egui::Color32,
    pub btn_egal_texte: egui::Color32,
}

const BLANC: egui::Color32 = egui::Color32::from_rgb(0xff, 0xff, 0xff);

/// Palette claire.
pub fn theme_clair() -> CouleursTheme {
    let encre = egui::Color32::from_rgb(0x11, 0x18, 0x27);
    CouleursTheme {
        fond: egui::Color32::from_rgb(0xf3, 0xf4, 0xf6),
        corps: egui::Color32::from_rgb(0xe5, 0xe7, 0xeb),
        ecran: egui::Color32::from_rgb(0xd1, 0xd5, 0xdb),
        fenetre: BLANC,
        texte: encre,
        texte_ecran: encre,
        texte_ecran_secondaire: egui::Color32::from_rgb(0x6b, 0x72, 0x80),
        bordure: egui::Color32::from_rgb(0xd1, 0xd5, 0xdb),
        btn_defaut: egui::Color32::from_rgb(0xd1, 0xd5, 0xdb),
        btn_defaut_texte: encre,
        btn_operateur: egui::Color32::from_rgb(0xfb, 0x92, 0x3c),
        btn_operateur_texte: BLANC,
        btn_fonction: egui::Color32::from_rgb(0xd1, 0xd5, 0xdb),
        btn_fonction_texte: encre,
        btn_resoudre: egui::Color32::from_rgb(0x60, 0xa5, 0xfa),
        btn_resoudre_texte: BLANC,
        btn_effacer: egui::Color32::from_rgb(0xf8, 0x71, 0x71),
        btn_effacer_texte: BLANC,
        btn_egal: egui::Color32::from_rgb(0x4a, 0xde, 0x80),
        btn_egal_texte: BLANC,
    }
}

/// Palette sombre (défaut).
pub fn theme_sombre() -> CouleursTheme {
    let papier = egui::Color32::from_rgb(0xf9, 0xfa, 0xfb);
    CouleursTheme {
        fond: egui::Color32::from_rgb(0x11, 0x18, 0x27),
        corps: egui::Color32::from_rgb(0x1f, 0x29, 0x37),
        ecran: egui::Color32::from_rgb(0x37, 0x41, 0x51),
        fenetre: egui::Color32::from_rgb(0x1f, 0x29, 0x37),
        texte: papier,
        texte_ecran: papier,
        texte_ecran_secondaire: egui::Color32::from_rgb(0x9c, 0xa3, 0xaf),
        bordure: egui::Color32::from_rgb(0x4b, 0x55, 0x63),
        btn_defaut: egui::Color32::from_rgb(0x4b, 0x55, 0x63),
        btn_defaut_texte: BLANC,
        btn_operateur: egui::Color32::from_rgb(0xf9, 0x73, 0x16),
        btn_operateur_texte: BLANC,
        btn_fonction: egui::Color32::from_rgb(0x4b, 0x55, 0x63),
        btn_fonction_texte: BLANC,
        btn_resoudre: egui::Color32::from_rgb(0x3b, 0x82, 0xf6),
        btn_resoudre_texte: BLANC,
        btn_effacer: egui::Color32::from_rgb(0xef, 0x44, 0x44),
        btn_effacer_texte: BLANC,
        btn_egal: egui::Color32::from_rgb(0x22, 0xc5, 0x5e),
        btn_egal_texte: BLANC,
    }
}

impl Default for CouleursTheme {
    fn default() -> Self {
        theme_sombre()
    }
}

impl CouleursTheme {
    /// Projette la palette sur egui::Visuals.
    pub fn visuals(&self) -> egui::Visuals {
        // base claire ou sombre selon la luminance du fond
        let [r, g, b, _] = self.fond.to_array();
        let sombre = (r as u32 + g as u32 + b as u32) < 3 * 128;

        let mut v = if sombre {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };

        v.panel_fill = self.fond;
        v.window_fill = self.fenetre;
        v.extreme_bg_color = self.ecran;
        v.override_text_color = Some(self.texte);
        v.widgets.noninteractive.bg_stroke.color = self.bordure;
        v.widgets.noninteractive.fg_stroke.color = self.texte;
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sombre_par_defaut() {
        assert_eq!(ChoixTheme::default(), ChoixTheme::Sombre);
        assert_eq!(CouleursTheme::default(), theme_sombre());
    }

    #[test]
    fn visuals_suivent_la_luminance() {
        assert!(theme_sombre().visuals().dark_mode);
        assert!(!theme_clair().visuals().dark_mode);
    }
}
