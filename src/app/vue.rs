// src/app/vue.rs
//
// Vue (UI egui)
// -------------
// - Écran : ligne secondaire (fraction ou "Résolution…") + tampon
// - Pavé 5 colonnes + panneau de fonctions à onglets
// - Fenêtres : historique, réglages, thème personnalisé, assistant,
//   division posée, graphique, formules
// - Clavier physique : mappé sur les mêmes touches que le pavé
//
// Toute touche passe par AppCalc::touche (etat.rs) ; ici on ne fait que
// dessiner et router.

use eframe::egui;

use crate::noyau;
use crate::solveur::RoleChat;

use super::etat::{AppCalc, OngletFonctions};
use super::theme::{ChoixTheme, CouleursTheme};

const LARGEUR_TOUCHE: f32 = 58.0;
const HAUTEUR_TOUCHE: f32 = 38.0;

/// Familles de boutons (couleur de fond + couleur de texte).
#[derive(Clone, Copy)]
enum Famille {
    Defaut,
    Operateur,
    Fonction,
    Resoudre,
    Effacer,
    Egal,
}

fn famille_de(label: &str) -> Famille {
    match label {
        "+" | "-" | "*" | "/" | "^" => Famille::Operateur,
        "C" | "DEL" => Famille::Effacer,
        "Solve" => Famille::Resoudre,
        "=" => Famille::Egal,
        "Fn" | "(" | ")" => Famille::Fonction,
        _ => Famille::Defaut,
    }
}

fn couleurs_de(famille: Famille, c: &CouleursTheme) -> (egui::Color32, egui::Color32) {
    match famille {
        Famille::Defaut => (c.btn_defaut, c.btn_defaut_texte),
        Famille::Operateur => (c.btn_operateur, c.btn_operateur_texte),
        Famille::Fonction => (c.btn_fonction, c.btn_fonction_texte),
        Famille::Resoudre => (c.btn_resoudre, c.btn_resoudre_texte),
        Famille::Effacer => (c.btn_effacer, c.btn_effacer_texte),
        Famille::Egal => (c.btn_egal, c.btn_egal_texte),
    }
}

impl AppCalc {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);
        let couleurs = self.reglages.couleurs();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                self.ui_ecran(ui, &couleurs);
                ui.add_space(8.0);
                self.ui_pave(ui, &couleurs);

                if self.panneau_fonctions {
                    ui.add_space(8.0);
                    ui.separator();
                    self.ui_fonctions(ui, &couleurs);
                }
            });
    }

    /* ------------------------ Écran ------------------------ */

    fn ui_ecran(&mut self, ui: &mut egui::Ui, couleurs: &CouleursTheme) {
        // ligne secondaire : progression ou approximation en fraction
        let secondaire = if self.en_resolution {
            "Résolution…".to_string()
        } else if let Some(fraction) = &self.fraction {
            format!("≈ {}", noyau::format::fraction_en_texte(fraction))
        } else {
            String::new()
        };

        egui::Frame::group(ui.style())
            .fill(couleurs.ecran)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.with_layout(egui::Layout::top_down(egui::Align::Max), |ui| {
                    ui.label(
                        egui::RichText::new(if secondaire.is_empty() { " " } else { &secondaire })
                            .size(14.0)
                            .color(couleurs.texte_ecran_secondaire),
                    );
                    ui.label(
                        egui::RichText::new(&self.affichage)
                            .size(30.0)
                            .monospace()
                            .color(couleurs.texte_ecran),
                    );
                });
            });
    }

    /* ------------------------ Pavé ------------------------ */

    /// Une touche du pavé : couleur selon la famille, dispatch via touche().
    fn touche_pave(
        &mut self,
        ui: &mut egui::Ui,
        couleurs: &CouleursTheme,
        label: &str,
        taille: [f32; 2],
    ) {
        let (fond, texte) = couleurs_de(famille_de(label), couleurs);
        let bouton = egui::Button::new(egui::RichText::new(label).color(texte)).fill(fond);
        if ui.add_sized(taille, bouton).clicked() {
            self.touche(label);
        }
    }

    fn ui_pave(&mut self, ui: &mut egui::Ui, couleurs: &CouleursTheme) {
        let t = [LARGEUR_TOUCHE, HAUTEUR_TOUCHE];
        let large = [2.0 * LARGEUR_TOUCHE + 6.0, HAUTEUR_TOUCHE];

        for rangee in [
            ["Fn", "(", ")", "DEL", "C"],
            ["7", "8", "9", "/", "*"],
            ["4", "5", "6", "-", "+"],
            ["1", "2", "3", ".", "Solve"],
        ] {
            ui.horizontal(|ui| {
                for label in rangee {
                    self.touche_pave(ui, couleurs, label, t);
                }
            });
        }

        // dernière rangée : 0 et = en double largeur
        ui.horizontal(|ui| {
            self.touche_pave(ui, couleurs, "0", large);
            self.touche_pave(ui, couleurs, ",", t);
            self.touche_pave(ui, couleurs, "=", large);
        });
    }

    /* ------------------------ Panneau de fonctions ------------------------ */

    fn ui_fonctions(&mut self, ui: &mut egui::Ui, couleurs: &CouleursTheme) {
        ui.horizontal_wrapped(|ui| {
            for (onglet, nom) in [
                (OngletFonctions::Scientifique, "Scientifique"),
                (OngletFonctions::Probabilites, "Probabilités"),
                (OngletFonctions::Algebre, "Algèbre"),
                (OngletFonctions::Constantes, "Constantes"),
                (OngletFonctions::Utilitaires, "Utilitaires"),
            ] {
                ui.selectable_value(&mut self.onglet_fonctions, onglet, nom);
            }
        });

        ui.add_space(4.0);

        let touches: &[&str] = match self.onglet_fonctions {
            OngletFonctions::Scientifique => &["sin", "cos", "tan", "log", "^", "root", "!"],
            OngletFonctions::Probabilites => &["nPr", "nCr", "%"],
            OngletFonctions::Algebre => &["x", "y", "z"],
            OngletFonctions::Constantes => &["π", "e"],
            OngletFonctions::Utilitaires => &[
                "Graphe",
                "Formules",
                "Hist",
                "Division",
                "Assistant",
                "Réglages",
            ],
        };

        ui.horizontal_wrapped(|ui| {
            for label in touches {
                let (fond, texte) = couleurs_de(Famille::Fonction, couleurs);
                let bouton =
                    egui::Button::new(egui::RichText::new(*label).color(texte)).fill(fond);
                if ui
                    .add_sized([LARGEUR_TOUCHE * 1.2, HAUTEUR_TOUCHE * 0.85], bouton)
                    .clicked()
                {
                    self.touche(label);
                }
            }
        });
    }

    /* ------------------------ Fenêtres ------------------------ */

    pub fn fenetres(&mut self, ctx: &egui::Context) {
        self.fenetre_historique(ctx);
        self.fenetre_reglages(ctx);
        self.fenetre_theme_perso(ctx);
        self.fenetre_assistant(ctx);
        self.fenetre_division(ctx);
        self.fenetre_graphe(ctx);
        self.fenetre_formules(ctx);
    }

    fn fenetre_historique(&mut self, ctx: &egui::Context) {
        let mut ouvert = self.fenetre_historique;
        egui::Window::new("Historique")
            .open(&mut ouvert)
            .resizable(true)
            .show(ctx, |ui| {
                if ui.button("Effacer l'historique").clicked() {
                    self.historique.clear();
                }
                ui.separator();
                egui::ScrollArea::vertical()
                    .max_height(260.0)
                    .show(ui, |ui| {
                        if self.historique.is_empty() {
                            ui.label("Aucun calcul pour l'instant.");
                        }
                        for entree in &self.historique {
                            ui.horizontal(|ui| {
                                ui.small(&entree.horodatage);
                                ui.monospace(&entree.entree);
                            });
                        }
                    });
            });
        self.fenetre_historique = ouvert;
    }

    fn fenetre_reglages(&mut self, ctx: &egui::Context) {
        let mut ouvert = self.fenetre_reglages;
        let mut ouvrir_editeur = false;

        egui::Window::new("Réglages")
            .open(&mut ouvert)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label("Thème");
                ui.horizontal(|ui| {
                    ui.selectable_value(&mut self.reglages.theme, ChoixTheme::Clair, "Clair");
                    ui.selectable_value(&mut self.reglages.theme, ChoixTheme::Sombre, "Sombre");
                    if self.reglages.theme_perso.is_some() {
                        ui.selectable_value(
                            &mut self.reglages.theme,
                            ChoixTheme::Perso,
                            "Personnalisé",
                        );
                    }
                });
                if ui.button("Créer un thème personnalisé").clicked() {
                    self.brouillon_theme = self
                        .reglages
                        .theme_perso
                        .clone()
                        .unwrap_or_else(|| self.reglages.couleurs());
                    ouvrir_editeur = true;
                }

                ui.separator();

                ui.label("Arrondi du résultat (décimales)");
                egui::ComboBox::from_label("")
                    .selected_text(self.reglages.precision.libelle())
                    .show_ui(ui, |ui| {
                        ui.selectable_value(
                            &mut self.reglages.precision,
                            noyau::PrecisionArrondi::Aucune,
                            "Aucune",
                        );
                        for p in 0..=noyau::PrecisionArrondi::MAX_DECIMALES {
                            ui.selectable_value(
                                &mut self.reglages.precision,
                                noyau::PrecisionArrondi::Decimales(p),
                                p.to_string(),
                            );
                        }
                    });
            });

        self.fenetre_reglages = ouvert;
        if ouvrir_editeur {
            self.fenetre_theme_perso = true;
            self.fenetre_reglages = false;
        }
    }

    fn fenetre_theme_perso(&mut self, ctx: &egui::Context) {
        let mut ouvert = self.fenetre_theme_perso;
        let mut fermer = false;

        egui::Window::new("Thème personnalisé")
            .open(&mut ouvert)
            .resizable(false)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .max_height(320.0)
                    .show(ui, |ui| {
                        egui::Grid::new("editeur_theme")
                            .num_columns(2)
                            .spacing([12.0, 6.0])
                            .show(ui, |ui| {
                                let b = &mut self.brouillon_theme;
                                for (nom, couleur) in [
                                    ("Fond", &mut b.fond),
                                    ("Corps", &mut b.corps),
                                    ("Écran", &mut b.ecran),
                                    ("Fenêtres", &mut b.fenetre),
                                    ("Texte", &mut b.texte),
                                    ("Texte écran", &mut b.texte_ecran),
                                    ("Texte écran (2e ligne)", &mut b.texte_ecran_secondaire),
                                    ("Bordure", &mut b.bordure),
                                    ("Touches", &mut b.btn_defaut),
                                    ("Touches (texte)", &mut b.btn_defaut_texte),
                                    ("Opérateurs", &mut b.btn_operateur),
                                    ("Opérateurs (texte)", &mut b.btn_operateur_texte),
                                    ("Fonctions", &mut b.btn_fonction),
                                    ("Fonctions (texte)", &mut b.btn_fonction_texte),
                                    ("Solve", &mut b.btn_resoudre),
                                    ("Solve (texte)", &mut b.btn_resoudre_texte),
                                    ("Effacement", &mut b.btn_effacer),
                                    ("Effacement (texte)", &mut b.btn_effacer_texte),
                                    ("Égal", &mut b.btn_egal),
                                    ("Égal (texte)", &mut b.btn_egal_texte),
                                ] {
                                    ui.label(nom);
                                    ui.color_edit_button_srgba(couleur);
                                    ui.end_row();
                                }
                            });
                    });

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Enregistrer").clicked() {
                        self.reglages.theme_perso = Some(self.brouillon_theme.clone());
                        self.reglages.theme = ChoixTheme::Perso;
                        fermer = true;
                    }
                    if ui.button("Annuler").clicked() {
                        fermer = true;
                    }
                });
            });

        self.fenetre_theme_perso = ouvert && !fermer;
    }

    fn fenetre_assistant(&mut self, ctx: &egui::Context) {
        const QUESTIONS_RAPIDES: [&str; 4] = [
            "What is the quadratic formula?",
            "Solve 2x + 5 = 15 for x.",
            "Explain the Pythagorean theorem.",
            "How do I calculate the area of a circle?",
        ];

        let mut ouvert = self.fenetre_assistant;
        let mut a_envoyer: Option<String> = None;

        egui::Window::new("Assistant")
            .open(&mut ouvert)
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| {
                if !self.solveur_disponible() {
                    ui.colored_label(
                        ui.visuals().warn_fg_color,
                        "GEMINI_API_KEY absente : assistant hors ligne.",
                    );
                    ui.separator();
                }
                egui::ScrollArea::vertical()
                    .max_height(280.0)
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for message in &self.messages_chat {
                            let alignement = match message.role {
                                RoleChat::Utilisateur => egui::Align::Max,
                                RoleChat::Modele => egui::Align::Min,
                            };
                            ui.with_layout(egui::Layout::top_down(alignement), |ui| {
                                egui::Frame::group(ui.style())
                                    .fill(ui.visuals().extreme_bg_color)
                                    .show(ui, |ui| {
                                        ui.set_max_width(260.0);
                                        if message.texte.is_empty() {
                                            ui.spinner();
                                        } else {
                                            ui.label(&message.texte);
                                        }
                                    });
                            });
                        }
                    });

                // suggestions tant que la conversation n'a pas commencé
                if self.messages_chat.len() <= 1 {
                    ui.separator();
                    for question in QUESTIONS_RAPIDES {
                        if ui.small_button(question).clicked() {
                            a_envoyer = Some(question.to_string());
                        }
                    }
                }

                ui.separator();
                ui.horizontal(|ui| {
                    let champ = ui.add(
                        egui::TextEdit::singleline(&mut self.saisie_chat)
                            .desired_width(240.0)
                            .hint_text("Posez une question de maths…"),
                    );
                    let entree = champ.lost_focus()
                        && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    let clic = ui
                        .add_enabled(!self.chat_en_attente, egui::Button::new("Envoyer"))
                        .clicked();
                    if (entree || clic) && !self.chat_en_attente {
                        a_envoyer = Some(self.saisie_chat.clone());
                    }
                });
            });

        if let Some(texte) = a_envoyer {
            self.envoyer_chat(&texte);
        }
        self.fenetre_assistant = ouvert;
    }

    fn fenetre_division(&mut self, ctx: &egui::Context) {
        let mut ouvert = self.fenetre_division;
        egui::Window::new("Division posée")
            .open(&mut ouvert)
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Dividende");
                    let r = ui.add(
                        egui::TextEdit::singleline(&mut self.dividende).desired_width(90.0),
                    );
                    if r.changed() {
                        self.dividende.retain(|c| c.is_ascii_digit());
                    }
                    ui.label("Diviseur");
                    let r = ui.add(
                        egui::TextEdit::singleline(&mut self.diviseur).desired_width(90.0),
                    );
                    if r.changed() {
                        self.diviseur.retain(|c| c.is_ascii_digit());
                    }
                });

                if ui
                    .add_enabled(!self.division_en_cours, egui::Button::new("Calculer"))
                    .clicked()
                {
                    self.lancer_division();
                }

                ui.separator();
                if self.division_en_cours {
                    ui.spinner();
                } else if !self.resultat_division.is_empty() {
                    egui::ScrollArea::vertical()
                        .max_height(240.0)
                        .show(ui, |ui| {
                            ui.monospace(&self.resultat_division);
                        });
                }
            });
        self.fenetre_division = ouvert;
    }

    fn fenetre_graphe(&mut self, ctx: &egui::Context) {
        let mut ouvert = self.fenetre_graphe;
        egui::Window::new("Graphique")
            .open(&mut ouvert)
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("y =");
                    ui.add(
                        egui::TextEdit::singleline(&mut self.expression_graphe)
                            .desired_width(240.0)
                            .hint_text("x^2, sin(x), root(2,x)…"),
                    );
                });
                ui.add_space(4.0);
                dessiner_courbe(ui, &self.expression_graphe, &self.reglages.couleurs());
            });
        self.fenetre_graphe = ouvert;
    }

    fn fenetre_formules(&mut self, ctx: &egui::Context) {
        const FORMULES: [(&str, &[(&str, &str)]); 3] = [
            (
                "Algèbre",
                &[
                    ("Formule quadratique", "x = [-b ± sqrt(b²-4ac)] / 2a"),
                    ("Théorème de Pythagore", "a² + b² = c²"),
                ],
            ),
            (
                "Géométrie",
                &[
                    ("Aire d'un disque", "A = πr²"),
                    ("Circonférence d'un cercle", "C = 2πr"),
                    ("Aire d'un triangle", "A = (1/2)bh"),
                ],
            ),
            (
                "Trigonométrie",
                &[
                    ("Sinus", "sin(θ) = opposé / hypoténuse"),
                    ("Cosinus", "cos(θ) = adjacent / hypoténuse"),
                    ("Tangente", "tan(θ) = opposé / adjacent"),
                ],
            ),
        ];

        let mut ouvert = self.fenetre_formules;
        egui::Window::new("Formules usuelles")
            .open(&mut ouvert)
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .max_height(300.0)
                    .show(ui, |ui| {
                        for (categorie, liste) in FORMULES {
                            ui.heading(categorie);
                            for (nom, formule) in liste {
                                ui.label(*nom);
                                ui.monospace(*formule);
                                ui.add_space(4.0);
                            }
                            ui.separator();
                        }
                    });
            });
        self.fenetre_formules = ouvert;
    }

    /* ------------------------ Clavier physique ------------------------ */

    /// Mappe le clavier physique sur le pavé, sauf quand un champ texte a le
    /// focus (les fenêtres assistant/division gardent leur saisie normale).
    pub fn clavier(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let evenements = ctx.input(|i| i.events.clone());
        for evenement in evenements {
            match evenement {
                egui::Event::Text(texte) => {
                    for c in texte.chars() {
                        if "0123456789.+-*/^(),%!=xyz".contains(c) || c == 'π' {
                            self.touche(&c.to_string());
                        }
                    }
                }
                egui::Event::Key {
                    key, pressed: true, ..
                } => match key {
                    egui::Key::Enter => self.touche("="),
                    egui::Key::Backspace => self.touche("DEL"),
                    egui::Key::Escape => self.touche("C"),
                    _ => {}
                },
                _ => {}
            }
        }
    }
}

/* ------------------------ Traceur de courbe ------------------------ */

/// Trace y = f(x) sur une grille fixe (20 px par unité, origine au centre).
/// Les segments non finis coupent la polyligne.
fn dessiner_courbe(ui: &mut egui::Ui, expression: &str, couleurs: &CouleursTheme) {
    const TAILLE: egui::Vec2 = egui::vec2(360.0, 280.0);
    const ECHELLE: f32 = 20.0;
    const COULEUR_COURBE: egui::Color32 = egui::Color32::from_rgb(0xec, 0x48, 0x99);

    let (rect, _) = ui.allocate_exact_size(TAILLE, egui::Sense::hover());
    let peintre = ui.painter_at(rect);
    peintre.rect_filled(rect, 4, couleurs.ecran);

    let origine = rect.center();

    // grille
    let trait_grille = egui::Stroke::new(0.5, couleurs.bordure);
    let mut x = origine.x % ECHELLE;
    while x < rect.right() {
        if x >= rect.left() {
            peintre.line_segment(
                [egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())],
                trait_grille,
            );
        }
        x += ECHELLE;
    }
    let mut y = origine.y % ECHELLE;
    while y < rect.bottom() {
        if y >= rect.top() {
            peintre.line_segment(
                [egui::pos2(rect.left(), y), egui::pos2(rect.right(), y)],
                trait_grille,
            );
        }
        y += ECHELLE;
    }

    // axes
    let trait_axe = egui::Stroke::new(1.0, couleurs.texte_ecran_secondaire);
    peintre.line_segment(
        [
            egui::pos2(rect.left(), origine.y),
            egui::pos2(rect.right(), origine.y),
        ],
        trait_axe,
    );
    peintre.line_segment(
        [
            egui::pos2(origine.x, rect.top()),
            egui::pos2(origine.x, rect.bottom()),
        ],
        trait_axe,
    );

    if expression.trim().is_empty() {
        return;
    }
    let courbe = match noyau::compiler_courbe(expression) {
        Ok(c) => c,
        Err(_) => {
            ui.colored_label(ui.visuals().error_fg_color, "Expression non traçable.");
            return;
        }
    };
    // une courbe doit être réellement paramétrée par x
    if !courbe.depend_de_x() {
        ui.colored_label(
            ui.visuals().warn_fg_color,
            "La courbe requiert la variable x.",
        );
        return;
    }

    let trait_courbe = egui::Stroke::new(2.0, COULEUR_COURBE);
    let mut points: Vec<egui::Pos2> = Vec::new();
    let mut px = rect.left();
    while px <= rect.right() {
        let x = ((px - origine.x) / ECHELLE) as f64;
        let fini = match courbe.evaluer(Some(x)) {
            Ok(y) if y.is_finite() => {
                let py = origine.y - (y as f32) * ECHELLE;
                points.push(egui::pos2(px, py));
                true
            }
            _ => false,
        };
        if !fini && points.len() > 1 {
            peintre.add(egui::Shape::line(std::mem::take(&mut points), trait_courbe));
        } else if !fini {
            points.clear();
        }
        px += 1.0;
    }
    if points.len() > 1 {
        peintre.add(egui::Shape::line(points, trait_courbe));
    }
}
