// src/main.rs
//
// Calculatrice Sciences — point d'entrée natif
// --------------------------------------------
// - eframe::run_native + NativeOptions (persistance des réglages)
// - Polices embarquées : anti "carrés" (π, ≈, accents)
//
// IMPORTANT (structure projet):
// - `impl eframe::App for AppCalc` vit dans src/app.rs
// - Ici: point d'entrée seulement

use eframe::egui;

mod app;
mod noyau;
mod solveur;

use app::AppCalc;

const TITRE_APP: &str = "Calculatrice Sciences";

/* ------------------------ Polices ------------------------ */

fn installer_polices(ctx: &egui::Context) {
    use egui::{FontData, FontDefinitions, FontFamily};

    let mut fonts = FontDefinitions::default();

    // Polices embarquées (anti-"carrés" garanti)
    fonts.font_data.insert(
        "dejavu_sans".to_string(),
        FontData::from_static(include_bytes!("../assets/fonts/DejaVuSans.ttf")).into(),
    );
    fonts.font_data.insert(
        "dejavu_mono".to_string(),
        FontData::from_static(include_bytes!("../assets/fonts/DejaVuSansMono.ttf")).into(),
    );

    // Proportional (labels, boutons)
    fonts
        .families
        .entry(FontFamily::Proportional)
        .or_default()
        .insert(0, "dejavu_sans".to_string());

    // Monospace (écran, historique, division posée)
    fonts
        .families
        .entry(FontFamily::Monospace)
        .or_default()
        .insert(0, "dejavu_mono".to_string());

    ctx.set_fonts(fonts);
}

/* ------------------------ Entrée ------------------------ */

fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITRE_APP)
            .with_inner_size([420.0, 680.0])
            .with_min_inner_size([380.0, 560.0]),
        ..Default::default()
    };

    eframe::run_native(
        TITRE_APP,
        options,
        Box::new(|cc| {
            // Contexte egui prêt => polices avant la première frame.
            installer_polices(&cc.egui_ctx);
            Ok(Box::new(AppCalc::new(cc)))
        }),
    )
}
