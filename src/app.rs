use bitext_align_gui::alignment::{
    BlockPair, BlockRef, Caret, EditGesture, EditKey, EditorSession, KeyModifiers, ViewState,
};
use bitext_align_gui::config::Config;
use bitext_align_gui::storage::{
    export_sessions_to_file, import_sessions_from_file, session_title, FileStore, SaveChoice,
    SaveOutcome, SavedSession, SessionRepository, DEFAULT_EXPORT_FILE_NAME,
};
use bitext_align_gui::types::document::{Column, FontSize, Layout};
use eframe::{egui, App};
use std::collections::HashMap;
use std::path::PathBuf;

/// Base point size that the font multiplier scales.
const BASE_FONT_POINTS: f32 = 14.0;

/// Key bindings checked inside a focused block. A press only matches a
/// binding whose modifiers are exactly the ones held.
const BINDINGS: [(egui::Modifiers, egui::Key, EditKey); 4] = [
    (egui::Modifiers::SHIFT, egui::Key::Enter, EditKey::Enter),
    (egui::Modifiers::NONE, egui::Key::Enter, EditKey::Enter),
    (egui::Modifiers::NONE, egui::Key::Backspace, EditKey::Backspace),
    (egui::Modifiers::COMMAND, egui::Key::Z, EditKey::Z),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Sessions,
    Editor,
}

struct Notice {
    text: String,
    is_error: bool,
}

/// The editor screen's view of the document: the text blocks egui edits in
/// place, plus the last caret seen in each block.
struct EditorState {
    session: EditorSession,
    blocks: Vec<BlockPair>,
    carets: HashMap<BlockRef, Caret>,
    focus_request: Option<BlockRef>,
}

impl EditorState {
    fn new(session: EditorSession) -> Self {
        let blocks = session.render_pairs();
        Self {
            session,
            blocks,
            carets: HashMap::new(),
            focus_request: None,
        }
    }

    fn rerender(&mut self) {
        self.blocks = self.session.render_pairs();
        self.carets.clear();
    }
}

pub struct BitextApp {
    config: Config,
    repository: SessionRepository<FileStore>,
    screen: Screen,
    font_size: FontSize,
    sessions: Vec<SavedSession>,
    input_a: String,
    input_b: String,
    transfer_path: String,
    editor: Option<EditorState>,
    pending_save_title: Option<String>,
    notice: Option<Notice>,
}

impl BitextApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: Config, data_dir: PathBuf) -> Self {
        let repository = SessionRepository::new(FileStore::new(&data_dir));
        let mut notice = None;
        let font_size = match repository.load_font_size() {
            Ok(Some(size)) => size,
            Ok(None) => FontSize::new(config.default_font_size),
            Err(e) => {
                log::error!("failed to read font size preference: {}", e);
                notice = Some(Notice {
                    text: e.to_string(),
                    is_error: true,
                });
                FontSize::new(config.default_font_size)
            }
        };

        let mut app = Self {
            config,
            repository,
            screen: Screen::Sessions,
            font_size,
            sessions: Vec::new(),
            input_a: String::new(),
            input_b: String::new(),
            transfer_path: data_dir
                .join(DEFAULT_EXPORT_FILE_NAME)
                .to_string_lossy()
                .into_owned(),
            editor: None,
            pending_save_title: None,
            notice,
        };
        app.refresh_sessions();
        app
    }

    fn info(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            text: text.into(),
            is_error: false,
        });
    }

    fn error(&mut self, text: impl Into<String>) {
        let text = text.into();
        log::warn!("{}", text);
        self.notice = Some(Notice {
            text,
            is_error: true,
        });
    }

    fn refresh_sessions(&mut self) {
        match self.repository.list_newest_first() {
            Ok(sessions) => self.sessions = sessions,
            Err(e) => self.error(format!("Failed to read saved sessions: {}", e)),
        }
    }

    fn initial_view(&self) -> ViewState {
        ViewState {
            font_size: self.font_size,
            masked: self.config.mask_second_column,
            ..ViewState::default()
        }
    }

    fn open_editor(&mut self, session: EditorSession) {
        self.editor = Some(EditorState::new(session));
        self.screen = Screen::Editor;
        self.notice = None;
    }

    fn back_to_sessions(&mut self) {
        self.editor = None;
        self.pending_save_title = None;
        self.screen = Screen::Sessions;
        self.refresh_sessions();
    }

    fn start_from_input(&mut self) {
        match EditorSession::from_raw(
            &self.input_a,
            &self.input_b,
            self.config.labels(),
            self.initial_view(),
            self.config.history_depth,
        ) {
            Ok(session) => {
                self.input_a.clear();
                self.input_b.clear();
                self.open_editor(session);
            }
            Err(e) => self.error(e.to_string()),
        }
    }

    fn load_session(&mut self, id: i64) {
        match self.repository.load(id) {
            Ok(Some(document)) => {
                let session = EditorSession::new(
                    document,
                    self.initial_view(),
                    self.config.labels(),
                    self.config.history_depth,
                );
                self.open_editor(session);
            }
            Ok(None) => self.error(format!("Session {} no longer exists.", id)),
            Err(e) => self.error(format!("Failed to load session: {}", e)),
        }
    }

    fn delete_session(&mut self, id: i64) {
        if let Err(e) = self.repository.delete(id) {
            self.error(format!("Failed to delete session: {}", e));
        }
        self.refresh_sessions();
    }

    fn export_sessions(&mut self) {
        let path = PathBuf::from(self.transfer_path.trim());
        match export_sessions_to_file(&self.repository, &path) {
            Ok(count) => self.info(format!("Exported {} session(s) to {}.", count, path.display())),
            Err(e) => self.error(format!("Export failed: {}", e)),
        }
    }

    fn import_sessions(&mut self) {
        let path = PathBuf::from(self.transfer_path.trim());
        match import_sessions_from_file(&mut self.repository, &path) {
            Ok(report) if report.added > 0 => {
                self.info(format!("{} new session(s) imported!", report.added));
                self.refresh_sessions();
            }
            Ok(_) => self.info("No new sessions found in the file to import."),
            Err(e) => self.error(format!("Error importing file: {}", e)),
        }
    }

    /// Starts the save flow; a title clash asks before writing anything.
    fn request_save(&mut self) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        editor.session.synchronize_from_view(&editor.blocks);
        let title = session_title(editor.session.document());
        match self.repository.find_by_title(&title) {
            Ok(Some(_)) => self.pending_save_title = Some(title),
            Ok(None) => self.finish_save(SaveChoice::NewCopy),
            Err(e) => self.error(format!("Failed to read saved sessions: {}", e)),
        }
    }

    fn finish_save(&mut self, choice: SaveChoice) {
        self.pending_save_title = None;
        let Some(editor) = self.editor.as_ref() else {
            return;
        };
        match self.repository.save_document(editor.session.document(), choice) {
            Ok(SaveOutcome::Updated { title, .. }) => {
                self.back_to_sessions();
                self.info(format!("Session \"{}\" updated!", title));
            }
            Ok(SaveOutcome::Created { title, .. }) => {
                self.back_to_sessions();
                self.info(format!("New session \"{}\" saved!", title));
            }
            Err(e) => self.error(format!("Failed to save session: {}", e)),
        }
    }

    fn change_font_size(&mut self, delta: f32) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        self.font_size = editor.session.adjust_font_size(delta);
        if let Err(e) = self.repository.save_font_size(self.font_size) {
            self.error(format!("Failed to store font size: {}", e));
        }
    }

    fn show_notice(&mut self, ui: &mut egui::Ui) {
        let mut dismiss = false;
        if let Some(notice) = &self.notice {
            ui.horizontal(|ui| {
                let color = if notice.is_error {
                    egui::Color32::RED
                } else {
                    egui::Color32::GREEN
                };
                ui.colored_label(color, &notice.text);
                dismiss = ui.small_button("✕").clicked();
            });
            ui.separator();
        }
        if dismiss {
            self.notice = None;
        }
    }

    fn sessions_screen(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_notice(ui);
            ui.heading("New Session");
            let labels = self.config.labels();
            ui.columns(2, |columns| {
                columns[0].label(format!("{} text", labels.a));
                egui::ScrollArea::vertical()
                    .id_source("input_a_scroll")
                    .max_height(220.0)
                    .show(&mut columns[0], |ui| {
                        ui.add(
                            egui::TextEdit::multiline(&mut self.input_a)
                                .desired_rows(10)
                                .desired_width(f32::INFINITY),
                        );
                    });
                columns[1].label(format!("{} text", labels.b));
                egui::ScrollArea::vertical()
                    .id_source("input_b_scroll")
                    .max_height(220.0)
                    .show(&mut columns[1], |ui| {
                        ui.add(
                            egui::TextEdit::multiline(&mut self.input_b)
                                .desired_rows(10)
                                .desired_width(f32::INFINITY),
                        );
                    });
            });
            if ui.button("Parse & Align").clicked() {
                self.start_from_input();
            }
            ui.separator();

            ui.heading("Saved Sessions");
            ui.horizontal(|ui| {
                ui.label("Backup file:");
                ui.add(egui::TextEdit::singleline(&mut self.transfer_path).desired_width(360.0));
                if ui.button("Export").clicked() {
                    self.export_sessions();
                }
                if ui.button("Import").clicked() {
                    self.import_sessions();
                }
            });
            ui.add_space(5.0);

            if self.sessions.is_empty() {
                ui.label("No saved sessions yet. Start a new session above or import a backup!");
                return;
            }
            let mut load_id = None;
            let mut delete_id = None;
            egui::ScrollArea::vertical()
                .id_source("sessions_scroll")
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for session in &self.sessions {
                        ui.horizontal(|ui| {
                            ui.strong(&session.title);
                            ui.small(&session.date);
                            if ui.button("Load").clicked() {
                                load_id = Some(session.id);
                            }
                            if ui.button("Delete").clicked() {
                                delete_id = Some(session.id);
                            }
                        });
                    }
                });
            if let Some(id) = load_id {
                self.load_session(id);
            } else if let Some(id) = delete_id {
                self.delete_session(id);
            }
        });
    }

    fn editor_toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("editor_toolbar").show(ctx, |ui| {
            let Some(editor) = self.editor.as_mut() else {
                return;
            };
            let mut back = false;
            let mut save = false;
            let mut font_delta = 0.0;
            ui.horizontal(|ui| {
                if ui.button("⬅ Sessions").clicked() {
                    back = true;
                }
                if ui.button("Save Session").clicked() {
                    save = true;
                }
                ui.separator();

                let labels = editor.session.labels().clone();
                let mut swapped = editor.session.view().order.is_swapped();
                if ui
                    .checkbox(&mut swapped, format!("{} first", labels.b))
                    .changed()
                {
                    editor.session.record_input(&editor.blocks);
                    let order = editor.session.view().order.toggled();
                    editor.session.set_order(order);
                    editor.rerender();
                }

                let layout_text = match editor.session.view().layout {
                    Layout::Horizontal => "Switch to Vertical Layout",
                    Layout::Vertical => "Switch to Horizontal Layout",
                };
                if ui.button(layout_text).clicked() {
                    editor.session.toggle_layout();
                }

                let mask_text = if editor.session.view().masked {
                    "Unmask Content (Space)"
                } else {
                    "Mask Content (Space)"
                };
                if ui.button(mask_text).clicked() {
                    editor.session.toggle_mask();
                }
                ui.separator();

                if ui.button("A−").clicked() {
                    font_delta = -FontSize::STEP;
                }
                ui.label(format!("{}em", editor.session.view().font_size.value()));
                if ui.button("A+").clicked() {
                    font_delta = FontSize::STEP;
                }
            });

            let (first, second) = editor.session.headings();
            ui.columns(2, |columns| {
                columns[0].heading(first);
                columns[1].heading(second);
            });

            if font_delta != 0.0 {
                self.change_font_size(font_delta);
            }
            if save {
                self.request_save();
            } else if back {
                self.back_to_sessions();
            }
        });
    }

    fn editor_blocks(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_notice(ui);
            let Some(editor) = self.editor.as_mut() else {
                return;
            };
            let view = editor.session.view().clone();
            let mut frame = BlockFrame {
                carets: &mut editor.carets,
                focus_request: editor.focus_request.take(),
                font: egui::FontId::proportional(BASE_FONT_POINTS * view.font_size.value()),
                masked: view.masked,
                gesture: None,
                changed: false,
            };

            egui::ScrollArea::vertical()
                .id_source("blocks_scroll")
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for (row, pair) in editor.blocks.iter_mut().enumerate() {
                        let BlockPair { first, second } = pair;
                        match view.layout {
                            Layout::Horizontal => ui.columns(2, |columns| {
                                frame.show(&mut columns[0], BlockRef::new(row, Column::First), first);
                                frame.show(&mut columns[1], BlockRef::new(row, Column::Second), second);
                            }),
                            Layout::Vertical => {
                                frame.show(ui, BlockRef::new(row, Column::First), first);
                                frame.show(ui, BlockRef::new(row, Column::Second), second);
                            }
                        }
                        ui.separator();
                    }
                });

            let (gesture, changed) = (frame.gesture, frame.changed);
            if let Some((gesture, target)) = gesture {
                let outcome = editor.session.apply(gesture, target, &editor.blocks);
                if outcome.rerender {
                    editor.rerender();
                    editor.focus_request = focus_after(gesture, target, editor.blocks.len());
                }
            } else if changed {
                editor.session.record_input(&editor.blocks);
            }
        });
    }
}

/// Where the caret should land after a structural edit.
fn focus_after(gesture: EditGesture, target: BlockRef, rows: usize) -> Option<BlockRef> {
    let row = match gesture {
        EditGesture::Split { .. } => target.row + 1,
        EditGesture::MergeBackward => target.row.saturating_sub(1),
        EditGesture::MergeForward => target.row,
        EditGesture::Undo => return None,
    };
    (row < rows).then(|| BlockRef::new(row, target.column))
}

/// Per-frame state shared by every block while the editor draws.
struct BlockFrame<'a> {
    carets: &'a mut HashMap<BlockRef, Caret>,
    focus_request: Option<BlockRef>,
    font: egui::FontId,
    masked: bool,
    gesture: Option<(EditGesture, BlockRef)>,
    changed: bool,
}

impl BlockFrame<'_> {
    fn show(&mut self, ui: &mut egui::Ui, target: BlockRef, text: &mut String) {
        let column_index = match target.column {
            Column::First => 0,
            Column::Second => 1,
        };
        let id = egui::Id::new(("block", target.row, column_index));
        if self.focus_request == Some(target) {
            ui.memory_mut(|m| m.request_focus(id));
        }

        // Gestures must be taken before the TextEdit sees the key.
        if self.gesture.is_none() && ui.memory(|m| m.has_focus(id)) {
            let caret = self.carets.get(&target).copied().unwrap_or_default();
            if let Some(gesture) = ui.input_mut(|input| capture_gesture(input, caret)) {
                self.gesture = Some((gesture, target));
            }
        }

        let output = egui::TextEdit::multiline(text)
            .id(id)
            .font(self.font.clone())
            .desired_rows(1)
            .desired_width(f32::INFINITY)
            .password(self.masked && target.column == Column::Second)
            .show(ui);

        if output.response.changed() {
            self.changed = true;
        }
        if let Some(range) = output.cursor_range {
            self.carets.insert(
                target,
                Caret {
                    offset: range.primary.ccursor.index,
                    has_selection: !range.is_empty(),
                },
            );
        }
    }
}

fn capture_gesture(input: &mut egui::InputState, caret: Caret) -> Option<EditGesture> {
    let (mods, key, edit_key) = input.events.iter().find_map(|event| match event {
        egui::Event::Key {
            key,
            pressed: true,
            modifiers,
            ..
        } => BINDINGS
            .into_iter()
            .find(|(mods, bound, _)| bound == key && modifiers.matches_exact(*mods))
            .map(|(_, key, edit_key)| (*modifiers, key, edit_key)),
        _ => None,
    })?;

    let modifiers = KeyModifiers {
        shift: mods.shift,
        command: mods.command,
    };
    let gesture = EditGesture::classify(edit_key, modifiers, caret)?;
    input.consume_key(mods, key).then_some(gesture)
}

impl App for BitextApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        match self.screen {
            Screen::Sessions => self.sessions_screen(ctx),
            Screen::Editor => {
                let typing = ctx.memory(|m| m.focused().is_some());
                if !typing && ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::Space)) {
                    if let Some(editor) = self.editor.as_mut() {
                        editor.session.toggle_mask();
                    }
                }
                self.editor_toolbar(ctx);
                self.editor_blocks(ctx);
            }
        }

        if let Some(title) = self.pending_save_title.clone() {
            let mut choice = None;
            let mut cancel = false;
            egui::Window::new("Session already exists")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(format!(
                        "A session named \"{}\" already exists. Update it with your changes, or save a new copy?",
                        title
                    ));
                    ui.horizontal(|ui| {
                        if ui.button("Update").clicked() {
                            choice = Some(SaveChoice::UpdateExisting);
                        }
                        if ui.button("Save as New Copy").clicked() {
                            choice = Some(SaveChoice::NewCopy);
                        }
                        if ui.button("Cancel").clicked() {
                            cancel = true;
                        }
                    });
                });
            if let Some(choice) = choice {
                self.finish_save(choice);
            } else if cancel {
                self.pending_save_title = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CTRL: egui::Modifiers = egui::Modifiers {
        alt: false,
        ctrl: true,
        shift: false,
        mac_cmd: false,
        command: true,
    };

    fn pressed(key: egui::Key, modifiers: egui::Modifiers) -> egui::InputState {
        let mut input = egui::InputState::default();
        input.events.push(egui::Event::Key {
            key,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers,
        });
        input
    }

    #[test]
    fn ctrl_shift_z_is_left_to_the_text_edit() {
        let ctrl_shift = egui::Modifiers {
            shift: true,
            ..CTRL
        };
        let mut input = pressed(egui::Key::Z, ctrl_shift);
        assert_eq!(capture_gesture(&mut input, Caret::default()), None);
        assert_eq!(input.events.len(), 1);

        let mut input = pressed(egui::Key::Z, CTRL);
        assert_eq!(capture_gesture(&mut input, Caret::default()), Some(EditGesture::Undo));
        assert!(input.events.is_empty());
    }

    #[test]
    fn enter_and_backspace_use_the_real_modifiers() {
        let mut input = pressed(egui::Key::Enter, egui::Modifiers::NONE);
        assert_eq!(
            capture_gesture(&mut input, Caret::at(3)),
            Some(EditGesture::Split { caret: 3 })
        );

        let mut input = pressed(egui::Key::Enter, egui::Modifiers::SHIFT);
        assert_eq!(
            capture_gesture(&mut input, Caret::at(3)),
            Some(EditGesture::MergeForward)
        );

        let mut input = pressed(egui::Key::Enter, CTRL);
        assert_eq!(capture_gesture(&mut input, Caret::at(3)), None);

        let mut input = pressed(egui::Key::Backspace, egui::Modifiers::NONE);
        assert_eq!(capture_gesture(&mut input, Caret::at(2)), None);
        assert_eq!(input.events.len(), 1);
        assert_eq!(
            capture_gesture(&mut input, Caret::at(0)),
            Some(EditGesture::MergeBackward)
        );
    }

    #[test]
    fn focus_follows_the_edit() {
        let target = BlockRef::new(2, Column::Second);
        assert_eq!(
            focus_after(EditGesture::Split { caret: 0 }, target, 5),
            Some(BlockRef::new(3, Column::Second))
        );
        assert_eq!(
            focus_after(EditGesture::MergeBackward, target, 5),
            Some(BlockRef::new(1, Column::Second))
        );
        assert_eq!(focus_after(EditGesture::Split { caret: 0 }, target, 3), None);
        assert_eq!(focus_after(EditGesture::Undo, target, 5), None);
    }
}
