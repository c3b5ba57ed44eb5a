use crate::config::Config;
use crate::controller::{FormController, PreviewOutcome};
use crate::draft::{Collection, EntryRef, ScalarField, Section};
use crate::draft::{EducationField, ExperienceField};
use crate::image::ImageStore;
use crate::print::PrintSurface;
use crate::render::{ResumeDocument, document_html};
use std::path::Path;

/// Which view is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Form,
    Preview,
}

/// Input mode for the focused field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// One focusable row of the active section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    Scalar(ScalarField),
    PortraitPath,
    Entry(EntryRef),
}

/// Rows eaten by chrome around the form field list.
pub const FORM_OVERHEAD: u16 = 6;

/// Main application state. Wraps the form controller with everything the
/// terminal needs: focus, edit mode, scroll, status line.
pub struct App {
    pub controller: FormController,
    images: Box<dyn ImageStore>,
    printer: Box<dyn PrintSurface>,

    pub should_quit: bool,
    pub view: View,
    pub show_help: bool,
    pub input_mode: InputMode,

    /// Focused row within the active section.
    pub focus: usize,
    /// Buffer for the portrait-path field, committed on Enter. Every other
    /// field writes through the controller on each keystroke.
    pub path_buffer: String,

    pub form_scroll: u16,
    pub preview_scroll: u16,
    /// Visible form rows, updated on terminal resize.
    pub page_size: u16,

    pub status_msg: String,
}

impl App {
    pub fn new(
        controller: FormController,
        images: Box<dyn ImageStore>,
        printer: Box<dyn PrintSurface>,
    ) -> Self {
        Self {
            controller,
            images,
            printer,
            should_quit: false,
            view: View::Form,
            show_help: false,
            input_mode: InputMode::Normal,
            focus: 0,
            path_buffer: String::new(),
            form_scroll: 0,
            preview_scroll: 0,
            page_size: 20,
            status_msg: "Fill in the form, then press g to generate".to_string(),
        }
    }

    pub fn from_config(
        controller: FormController,
        images: Box<dyn ImageStore>,
        config: &Config,
    ) -> Self {
        let printer = Box::new(crate::print::SystemPrintSurface::new(
            config.print_dir.clone(),
        ));
        Self::new(controller, images, printer)
    }

    /// Focusable rows of the active section, in display order.
    pub fn focus_targets(&self) -> Vec<FocusTarget> {
        let draft = self.controller.draft();
        match self.controller.section() {
            Section::Personal => vec![
                FocusTarget::Scalar(ScalarField::Name),
                FocusTarget::Scalar(ScalarField::Title),
                FocusTarget::Scalar(ScalarField::Email),
                FocusTarget::Scalar(ScalarField::Phone),
                FocusTarget::Scalar(ScalarField::Summary),
                FocusTarget::PortraitPath,
            ],
            Section::Experience => (0..draft.experience.len())
                .flat_map(|i| {
                    [
                        FocusTarget::Entry(EntryRef::Experience(i, ExperienceField::Company)),
                        FocusTarget::Entry(EntryRef::Experience(i, ExperienceField::Position)),
                        FocusTarget::Entry(EntryRef::Experience(i, ExperienceField::Description)),
                    ]
                })
                .collect(),
            Section::Education => (0..draft.education.len())
                .flat_map(|i| {
                    [
                        FocusTarget::Entry(EntryRef::Education(i, EducationField::Institution)),
                        FocusTarget::Entry(EntryRef::Education(i, EducationField::Degree)),
                        FocusTarget::Entry(EntryRef::Education(i, EducationField::Year)),
                        FocusTarget::Entry(EntryRef::Education(i, EducationField::Gpa)),
                    ]
                })
                .collect(),
            Section::Skills => (0..draft.skills.len())
                .map(|i| FocusTarget::Entry(EntryRef::Skill(i)))
                .collect(),
        }
    }

    pub fn focused(&self) -> Option<FocusTarget> {
        self.focus_targets().get(self.focus).copied()
    }

    pub fn focus_next(&mut self) {
        let len = self.focus_targets().len();
        if len > 0 && self.focus + 1 < len {
            self.focus += 1;
        }
        self.ensure_focus_visible();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.saturating_sub(1);
        self.ensure_focus_visible();
    }

    fn clamp_focus(&mut self) {
        let len = self.focus_targets().len();
        self.focus = self.focus.min(len.saturating_sub(1));
        self.ensure_focus_visible();
    }

    /// Update the form viewport based on terminal height.
    pub fn update_page_size(&mut self, terminal_height: u16) {
        self.page_size = terminal_height.saturating_sub(FORM_OVERHEAD).max(1);
        self.ensure_focus_visible();
    }

    fn ensure_focus_visible(&mut self) {
        let page = self.page_size.max(1) as usize;
        let focus = self.focus;
        if focus < self.form_scroll as usize {
            self.form_scroll = focus as u16;
        } else if focus >= self.form_scroll as usize + page {
            self.form_scroll = (focus + 1 - page) as u16;
        }
    }

    /// Switch sections and bring the new one into view from the top.
    pub fn go_to_section(&mut self, section: Section) {
        self.controller.go_to_section(section);
        self.after_section_change();
    }

    pub fn next_section(&mut self) {
        self.controller.next_section();
        self.after_section_change();
    }

    pub fn previous_section(&mut self) {
        self.controller.previous_section();
        self.after_section_change();
    }

    fn after_section_change(&mut self) {
        self.focus = 0;
        self.form_scroll = 0;
        self.input_mode = InputMode::Normal;
        self.status_msg.clear();
    }

    /// Collection edited by the active section, if any.
    pub fn active_collection(&self) -> Option<Collection> {
        match self.controller.section() {
            Section::Personal => None,
            Section::Experience => Some(Collection::Experience),
            Section::Education => Some(Collection::Education),
            Section::Skills => Some(Collection::Skills),
        }
    }

    /// Append an entry to the active section's collection and focus its
    /// first field.
    pub fn add_entry_here(&mut self) {
        let Some(collection) = self.active_collection() else {
            return;
        };
        self.controller.add_entry(collection);
        let per = match collection {
            Collection::Experience => 3,
            Collection::Education => 4,
            Collection::Skills => 1,
        };
        self.focus = self.focus_targets().len().saturating_sub(per);
        self.ensure_focus_visible();
        self.status_msg = "Entry added".to_string();
    }

    /// Remove the entry under the focus.
    pub fn remove_entry_here(&mut self) {
        let Some(FocusTarget::Entry(at)) = self.focused() else {
            return;
        };
        let (collection, index) = match at {
            EntryRef::Experience(i, _) => (Collection::Experience, i),
            EntryRef::Education(i, _) => (Collection::Education, i),
            EntryRef::Skill(i) => (Collection::Skills, i),
        };
        self.controller.remove_entry(collection, index);
        self.clamp_focus();
        self.status_msg = "Entry removed".to_string();
    }

    /// Start editing the focused row.
    pub fn begin_edit(&mut self) {
        match self.focused() {
            Some(FocusTarget::PortraitPath) => {
                self.path_buffer = self
                    .controller
                    .draft()
                    .image
                    .as_ref()
                    .map(|i| i.source.display().to_string())
                    .unwrap_or_default();
                self.input_mode = InputMode::Editing;
            }
            Some(_) => self.input_mode = InputMode::Editing,
            None => {}
        }
    }

    /// Finish editing. The portrait path commits here; text fields already
    /// wrote through on every keystroke.
    pub fn end_edit(&mut self, commit: bool) {
        if self.input_mode != InputMode::Editing {
            return;
        }
        self.input_mode = InputMode::Normal;
        if matches!(self.focused(), Some(FocusTarget::PortraitPath)) && commit {
            self.commit_portrait();
        }
        self.path_buffer.clear();
    }

    pub fn edit_push(&mut self, c: char) {
        match self.focused() {
            Some(FocusTarget::PortraitPath) => self.path_buffer.push(c),
            Some(FocusTarget::Scalar(field)) => {
                let mut value = self.controller.draft().scalar(field).to_string();
                value.push(c);
                self.controller.update_field(field, value);
            }
            Some(FocusTarget::Entry(at)) => {
                let mut value = self.controller.draft().entry(at).to_string();
                value.push(c);
                self.controller.update_entry(at, value);
            }
            None => {}
        }
    }

    pub fn edit_backspace(&mut self) {
        match self.focused() {
            Some(FocusTarget::PortraitPath) => {
                self.path_buffer.pop();
            }
            Some(FocusTarget::Scalar(field)) => {
                let mut value = self.controller.draft().scalar(field).to_string();
                value.pop();
                self.controller.update_field(field, value);
            }
            Some(FocusTarget::Entry(at)) => {
                let mut value = self.controller.draft().entry(at).to_string();
                value.pop();
                self.controller.update_entry(at, value);
            }
            None => {}
        }
    }

    /// Acquire the image named in the path buffer and swap it into the
    /// draft, releasing the displaced copy. An empty path clears the
    /// portrait. Invalid images leave the draft untouched.
    fn commit_portrait(&mut self) {
        let path = self.path_buffer.trim().to_string();
        if path.is_empty() {
            if let Some(old) = self.controller.set_image(None) {
                self.images.release(&old);
                self.status_msg = "Portrait removed".to_string();
            }
            return;
        }
        match self.images.acquire(Path::new(&path)) {
            Ok(image) => {
                self.status_msg = format!("Portrait set: {path}");
                if let Some(old) = self.controller.set_image(Some(image)) {
                    self.images.release(&old);
                }
            }
            Err(e) => {
                tracing::warn!("rejected portrait {path}: {}", e.user_message());
                self.status_msg = e.user_message();
            }
        }
    }

    /// Generate the preview, or warn when nothing changed yet.
    pub fn request_preview(&mut self) {
        match self.controller.request_preview() {
            PreviewOutcome::Shown => {
                self.view = View::Preview;
                self.preview_scroll = 0;
                self.status_msg = "Preview generated".to_string();
            }
            PreviewOutcome::NoChanges => {
                self.status_msg = "Make some changes before generating the preview".to_string();
            }
        }
    }

    pub fn close_preview(&mut self) {
        self.view = View::Form;
    }

    /// Render the current draft and hand it to the print surface. Failure
    /// is logged and shown on the status line, nothing more.
    pub fn print_preview(&mut self) {
        let doc = ResumeDocument::project(self.controller.draft());
        let html = document_html(&doc, self.images.as_ref());
        match self.printer.open(&html) {
            Ok(path) => {
                self.status_msg = format!("Opened {} for printing", path.display());
            }
            Err(e) => {
                tracing::error!("print surface failed: {e}");
                self.status_msg = e.user_message();
            }
        }
    }

    pub fn scroll_down(&mut self) {
        self.preview_scroll = self.preview_scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.preview_scroll = self.preview_scroll.saturating_sub(1);
    }

    pub fn scroll_page_down(&mut self) {
        self.preview_scroll = self.preview_scroll.saturating_add(20);
    }

    pub fn scroll_page_up(&mut self) {
        self.preview_scroll = self.preview_scroll.saturating_sub(20);
    }

    /// Release the held image copy before the process exits.
    pub fn quit(&mut self) {
        if let Some(image) = self.controller.take_image() {
            self.images.release(&image);
        }
        self.should_quit = true;
    }
}
