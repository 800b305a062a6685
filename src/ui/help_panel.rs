use eframe::egui;

use crate::model::story_elements::StoryElements;

pub fn draw_help_panel(ui: &mut egui::Ui, elements: &StoryElements) {
    ui.heading("How to Use The Austen Experience");
    ui.add_space(8.0);

    section(ui, "Getting Started", &[
        "Fill in the details for your heroine and hero.",
        "Pick a theme and a setting for your story.",
        "Click \"Generate Story\" and watch it unfold.",
    ]);

    section(ui, "Character Creation", &[
        "Every character needs a name, a personality and a social status.",
        "Personalities and statuses come from the lists in the drop-downs.",
    ]);

    ui.collapsing("Story Elements", |ui| {
        ui.label("Themes change the story, the background and the music.");
        ui.label("Need inspiration? Try weaving in one of these:");
        for element in &elements.plot_elements {
            ui.label(format!("• {element}"));
        }
    });

    section(ui, "Controls", &[
        "Generate Story: write a new story from the form.",
        "Read Aloud / Stop Reading: narrate the current story.",
        "Export: save the story as a document.",
        "Toggle Music: play or stop the theme's music.",
        "Clear: start again with an empty form.",
    ]);
}

fn section(ui: &mut egui::Ui, title: &str, lines: &[&str]) {
    egui::CollapsingHeader::new(title)
        .default_open(true)
        .show(ui, |ui| {
            for line in lines {
                ui.label(format!("• {line}"));
            }
        });
}
