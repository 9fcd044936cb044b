#![forbid(unsafe_code)]
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]

#[cfg(target_arch = "wasm32")]
compile_error!("notejot is a native desktop app; web/wasm builds are not supported.");

use std::{ffi::OsString, path::PathBuf};

use eframe::egui;
use notejot_core::{
    NoteError, PreferenceStore, SaveOutcome,
    prefs::{CONFIG_FILE_NAME, LAST_DIR_KEY},
};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct LaunchOptions {
    show_preview: bool,
    capture_lines: bool,
}

fn parse_launch_options<I, S>(args: I) -> LaunchOptions
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut options = LaunchOptions::default();
    for arg in args {
        let arg = arg.into();
        if arg == "-p" {
            options.show_preview = true;
        } else if arg == "-l" {
            options.capture_lines = true;
        }
    }
    options
}

fn main() -> eframe::Result {
    init_logging();

    let launch_options = parse_launch_options(std::env::args_os().skip(1));
    let store = PreferenceStore::default_location().unwrap_or_else(|err| {
        tracing::warn!(%err, "falling back to a preference file in the working directory");
        PreferenceStore::at(CONFIG_FILE_NAME)
    });
    let app = NotejotApp::new(store, launch_options);

    // Viewport sizes are in points, so they scale with the OS DPI factor.
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("notejot")
            .with_inner_size([600.0, 450.0])
            .with_min_inner_size([400.0, 350.0]),
        ..Default::default()
    };
    eframe::run_native("notejot", options, Box::new(move |_cc| Ok(Box::new(app))))
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Status {
    Info(String),
    Error(String),
}

struct NotejotApp {
    store: PreferenceStore,
    directory: PathBuf,
    filename: String,
    body: String,
    capture_lines: bool,
    show_preview: bool,
    /// Cleared whenever the previewed file may have changed.
    preview: Option<String>,
    status: Option<Status>,
}

impl eframe::App for NotejotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let save = ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::S));
        if save {
            self.save_all();
        }

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| self.show_status(ui));

        egui::TopBottomPanel::top("controls").show(ctx, |ui| self.show_controls(ui));

        if self.show_preview {
            egui::SidePanel::right("preview")
                .resizable(true)
                .min_width(200.0)
                .default_width(280.0)
                .show(ctx, |ui| self.show_preview_panel(ui));
        }

        egui::CentralPanel::default().show(ctx, |ui| self.show_editor(ui));
    }
}

impl NotejotApp {
    fn new(store: PreferenceStore, options: LaunchOptions) -> Self {
        let prefs = store.snapshot();
        Self {
            directory: prefs.save_directory(),
            filename: prefs.last_filename(notejot_core::today()),
            store,
            body: String::new(),
            capture_lines: options.capture_lines,
            show_preview: options.show_preview,
            preview: None,
            status: None,
        }
    }

    fn show_controls(&mut self, ui: &mut egui::Ui) {
        ui.add_space(6.0);
        ui.label("Filename:");
        let filename = ui.add(
            egui::TextEdit::singleline(&mut self.filename)
                .hint_text("2024-01-01-Note")
                .desired_width(f32::INFINITY),
        );
        if filename.changed() {
            self.preview = None;
        }

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            if ui.button("Save Note as Markdown").clicked() {
                self.save_all();
            }
            if ui.button("Change Save Folder").clicked() {
                self.change_directory();
            }
        });
        ui.label(
            egui::RichText::new(format!("Saving to: {}", self.directory.display()))
                .italics()
                .small(),
        );

        ui.horizontal(|ui| {
            ui.checkbox(&mut self.capture_lines, "Save each line on Enter");
            ui.checkbox(&mut self.show_preview, "Show file");
        });
        ui.add_space(4.0);
    }

    fn show_editor(&mut self, ui: &mut egui::Ui) {
        ui.label("Note content:");
        let newlines_before = newline_count(&self.body);
        let editor = egui::TextEdit::multiline(&mut self.body)
            .desired_width(f32::INFINITY)
            .font(egui::TextStyle::Body)
            .id(egui::Id::new("note-body"));
        let response = ui.add_sized(ui.available_size(), editor);

        if response.changed() {
            self.body_edited(newlines_before);
        }
    }

    /// In line capture mode, save the lines this edit finished. Edits that
    /// add no newline never save.
    fn body_edited(&mut self, newlines_before: usize) {
        if !self.capture_lines {
            return;
        }
        let added = newline_count(&self.body).saturating_sub(newlines_before);
        if added > 0 {
            self.save_new_lines(added);
        }
    }

    fn show_preview_panel(&mut self, ui: &mut egui::Ui) {
        let text = self.preview.get_or_insert_with(|| {
            notejot_core::read_preview(&self.directory, &self.filename)
        });

        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                ui.add(
                    egui::TextEdit::multiline(&mut text.as_str())
                        .desired_width(f32::INFINITY)
                        .font(egui::TextStyle::Monospace),
                );
            });
    }

    fn show_status(&mut self, ui: &mut egui::Ui) {
        let mut clear = false;
        ui.horizontal(|ui| match &self.status {
            Some(Status::Error(msg)) => {
                if ui.button("x").clicked() {
                    clear = true;
                }
                ui.colored_label(ui.visuals().error_fg_color, msg);
            }
            Some(Status::Info(msg)) => {
                if ui.button("x").clicked() {
                    clear = true;
                }
                ui.label(msg);
            }
            None => {
                ui.weak(if self.capture_lines {
                    "Each line is saved when you press Enter."
                } else {
                    "Ctrl+S saves the note."
                });
            }
        });
        if clear {
            self.status = None;
        }
    }

    fn change_directory(&mut self) {
        let Some(dir) = rfd::FileDialog::new()
            .set_title("Select New Permanent Save Folder")
            .set_directory(&self.directory)
            .pick_folder()
        else {
            return;
        };

        self.status = Some(
            match self.store.save(LAST_DIR_KEY, &dir.to_string_lossy()) {
                Ok(()) => Status::Info(format!("Notes will now be saved to {}", dir.display())),
                Err(err) => Status::Error(format!(
                    "Saving to {} for now, but it will not be remembered: {err}",
                    dir.display()
                )),
            },
        );
        self.directory = dir;
        self.preview = None;
    }

    fn save_all(&mut self) {
        let result = notejot_core::save_all(
            &self.store,
            &self.directory,
            &self.filename,
            &mut self.body,
            notejot_core::today(),
        );
        self.finish_save(result);
    }

    fn save_new_lines(&mut self, added: usize) {
        let result = notejot_core::save_new_lines(
            &self.store,
            &self.directory,
            &self.filename,
            &mut self.body,
            added,
            notejot_core::today(),
        );
        match result {
            Ok(outcomes) => {
                for outcome in outcomes {
                    self.finish_save(Ok(outcome));
                }
            }
            Err(err) => {
                // Earlier lines of the same edit may already be on disk.
                self.preview = None;
                self.finish_save(Err(err));
            }
        }
    }

    fn finish_save(&mut self, result: Result<SaveOutcome, NoteError>) {
        match result {
            Ok(outcome) => {
                self.preview = None;
                self.status = Some(match outcome.preference_error {
                    Some(err) => Status::Error(format!(
                        "Saved to {}, but the filename will not be remembered: {err}",
                        outcome.path.display()
                    )),
                    None => Status::Info(format!("Saved to {}", outcome.path.display())),
                });
            }
            Err(err) => self.status = Some(Status::Error(err.to_string())),
        }
    }
}

fn newline_count(text: &str) -> usize {
    text.bytes().filter(|&b| b == b'\n').count()
}
