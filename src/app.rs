// src/app.rs
//
// Racine du module applicatif :
// - etat.rs     : état + dispatch des touches
// - saisie.rs   : politique d'ajout au tampon (pur)
// - reglages.rs : préférences persistées
// - theme.rs    : palettes + projection sur egui
// - vue.rs      : rendu egui (écran, pavé, fenêtres)

pub mod etat;
pub mod reglages;
pub mod saisie;
pub mod theme;
pub mod vue;

pub use etat::AppCalc;

use eframe::egui;

impl eframe::App for AppCalc {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // résultats des threads distants, AVANT le rendu de la trame
        self.sonder_canaux();
        if self.en_resolution || self.chat_en_attente || self.division_en_cours {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        ctx.set_visuals(self.reglages.couleurs().visuals());

        self.clavier(ctx);

        egui::CentralPanel::default().show(ctx, |ui| self.ui(ui));
        self.fenetres(ctx);
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.reglages.sauver(storage);
    }
}
