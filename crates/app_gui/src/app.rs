use eframe::{App, Frame, egui};
use labeler_core::{Command, LabelRef, Session, command_from_keystroke};

use crate::view::{self, MAX_IMAGE_SIZE};

/// Window over a [`Session`]; all state lives in the session and is pulled
/// back out each frame.
pub struct LabelerApp {
    session: Session,
    shortcut: String,
    status: String,
    shown: Option<Shown>,
    focus_requested: bool,
}

/// What the window last handed to egui's image cache.
struct Shown {
    revision: u64,
    uri: String,
    detail: Option<String>,
}

impl LabelerApp {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            shortcut: String::new(),
            status: String::new(),
            shown: None,
            focus_requested: false,
        }
    }

    fn run(&mut self, command: Command) {
        let saving = command == Command::Save;
        match self.session.dispatch(command) {
            Ok(()) if saving => {
                self.status = format!("Saved to {}", self.session.labels_path().display());
            }
            Ok(()) => self.status.clear(),
            Err(e) => {
                tracing::error!("{e}");
                self.status = format!("Error: {e}");
            }
        }
    }

    /// Pick up a new revision, dropping the previous texture when the file changed.
    fn sync_image(&mut self, ctx: &egui::Context) {
        let revision = self.session.revision();
        if self.shown.as_ref().is_some_and(|s| s.revision == revision) {
            return;
        }
        let uri = view::image_uri(self.session.current_file());
        let detail = match self.shown.take() {
            Some(old) if old.uri == uri => old.detail,
            Some(old) => {
                ctx.forget_image(&old.uri);
                view::describe_image(&self.session.image_bytes())
            }
            None => view::describe_image(&self.session.image_bytes()),
        };
        self.shown = Some(Shown {
            revision,
            uri,
            detail,
        });
    }
}

impl App for LabelerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.sync_image(ctx);
        let mut pending: Option<Command> = None;

        egui::TopBottomPanel::top("nav").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let input = ui.add(
                    egui::TextEdit::singleline(&mut self.shortcut)
                        .desired_width(50.0)
                        .hint_text("0-9"),
                );
                if !self.focus_requested {
                    input.request_focus();
                    self.focus_requested = true;
                }
                if input.changed() {
                    pending = command_from_keystroke(&self.shortcut);
                    self.shortcut.clear();
                }
                if input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    pending = Some(Command::Next);
                    input.request_focus();
                }

                if ui.button("◀").on_hover_text("previous").clicked() {
                    pending = Some(Command::Previous);
                }
                if ui.button("Save").on_hover_text("save to csv").clicked() {
                    pending = Some(Command::Save);
                }
                if ui.button("▶").on_hover_text("next").clicked() {
                    pending = Some(Command::Next);
                }
            });

            ui.horizontal_wrapped(|ui| {
                for (i, class, active) in self.session.class_states() {
                    let button =
                        egui::Button::new(view::button_text(i, class)).fill(view::button_fill(active));
                    if ui.add(button).on_hover_text(class).clicked() {
                        pending = Some(Command::Toggle(LabelRef::Name(class.to_string())));
                    }
                }
            });
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let detail = self.shown.as_ref().and_then(|s| s.detail.as_deref());
                ui.label(view::position_line(&self.session, detail));
                if !self.status.is_empty() {
                    ui.separator();
                    ui.label(&self.status);
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(shown) = &self.shown {
                ui.vertical_centered(|ui| {
                    ui.add(
                        egui::Image::from_bytes(shown.uri.clone(), self.session.image_bytes())
                            .max_size(MAX_IMAGE_SIZE.into()),
                    );
                });
            }
        });

        if let Some(command) = pending {
            self.run(command);
            ctx.request_repaint();
        }
    }
}
