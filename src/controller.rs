use crate::draft::{
    Collection, EducationEntry, EntryRef, ExperienceEntry, ImageRef, ResumeDraft, ScalarField,
    Section,
};

/// Result of a preview request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewOutcome {
    /// The draft has changes; the preview is now visible.
    Shown,
    /// Nothing changed since startup; the preview stays hidden and the
    /// caller should warn the user once.
    NoChanges,
}

/// Single writer for the resume draft. Owns the draft, the immutable
/// snapshot taken at construction, and the wizard navigation state.
/// Readers get `&ResumeDraft`; nothing else mutates the draft.
pub struct FormController {
    draft: ResumeDraft,
    initial: ResumeDraft,
    modified: bool,
    preview_visible: bool,
    section: Section,
}

impl FormController {
    pub fn new(draft: ResumeDraft) -> Self {
        let initial = draft.clone();
        Self {
            draft,
            initial,
            modified: false,
            preview_visible: false,
            section: Section::Personal,
        }
    }

    pub fn draft(&self) -> &ResumeDraft {
        &self.draft
    }

    pub fn modified(&self) -> bool {
        self.modified
    }

    pub fn preview_visible(&self) -> bool {
        self.preview_visible
    }

    pub fn section(&self) -> Section {
        self.section
    }

    /// Recompute the modified flag after a mutation. A draft that differs
    /// from the startup snapshot invalidates any generated preview.
    fn touch(&mut self) {
        self.modified = self.draft != self.initial;
        if self.modified {
            self.preview_visible = false;
        }
    }

    /// Replace one scalar field.
    pub fn update_field(&mut self, field: ScalarField, value: String) {
        match field {
            ScalarField::Name => self.draft.name = value,
            ScalarField::Title => self.draft.title = value,
            ScalarField::Email => self.draft.email = value,
            ScalarField::Phone => self.draft.phone = value,
            ScalarField::Summary => self.draft.summary = value,
        }
        self.touch();
    }

    /// Replace the portrait reference, returning the displaced one so the
    /// caller can release it through the image store.
    pub fn set_image(&mut self, image: Option<ImageRef>) -> Option<ImageRef> {
        let displaced = std::mem::replace(&mut self.draft.image, image);
        self.touch();
        displaced
    }

    /// Take the current portrait reference for release on teardown.
    pub fn take_image(&mut self) -> Option<ImageRef> {
        self.draft.image.take()
    }

    /// Replace one field of one entry. An out-of-bounds index is a
    /// programming error and panics.
    pub fn update_entry(&mut self, at: EntryRef, value: String) {
        match at {
            EntryRef::Experience(i, f) => {
                use crate::draft::ExperienceField::*;
                let entry = &mut self.draft.experience[i];
                match f {
                    Company => entry.company = value,
                    Position => entry.position = value,
                    Description => entry.description = value,
                }
            }
            EntryRef::Education(i, f) => {
                use crate::draft::EducationField::*;
                let entry = &mut self.draft.education[i];
                match f {
                    Institution => entry.institution = value,
                    Degree => entry.degree = value,
                    Year => entry.year = value,
                    Gpa => entry.gpa = value,
                }
            }
            EntryRef::Skill(i) => self.draft.skills[i] = value,
        }
        self.touch();
    }

    /// Append an empty entry to the collection.
    pub fn add_entry(&mut self, collection: Collection) {
        match collection {
            Collection::Experience => self.draft.experience.push(ExperienceEntry::default()),
            Collection::Education => self.draft.education.push(EducationEntry::default()),
            Collection::Skills => self.draft.skills.push(String::new()),
        }
        self.touch();
    }

    /// Remove the entry at `index`, shifting later entries down.
    pub fn remove_entry(&mut self, collection: Collection, index: usize) {
        match collection {
            Collection::Experience => {
                self.draft.experience.remove(index);
            }
            Collection::Education => {
                self.draft.education.remove(index);
            }
            Collection::Skills => {
                self.draft.skills.remove(index);
            }
        }
        self.touch();
    }

    pub fn entry_count(&self, collection: Collection) -> usize {
        match collection {
            Collection::Experience => self.draft.experience.len(),
            Collection::Education => self.draft.education.len(),
            Collection::Skills => self.draft.skills.len(),
        }
    }

    pub fn go_to_section(&mut self, section: Section) {
        self.section = section;
    }

    pub fn next_section(&mut self) {
        self.section = self.section.next();
    }

    pub fn previous_section(&mut self) {
        self.section = self.section.prev();
    }

    /// Show the preview if the draft has changes since startup.
    pub fn request_preview(&mut self) -> PreviewOutcome {
        if self.modified {
            self.preview_visible = true;
            PreviewOutcome::Shown
        } else {
            PreviewOutcome::NoChanges
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{EducationField, ExperienceField};
    use proptest::prelude::*;

    fn controller() -> FormController {
        FormController::new(ResumeDraft::default())
    }

    #[test]
    fn test_modified_false_at_init() {
        let c = controller();
        assert!(!c.modified());
        assert!(!c.preview_visible());
    }

    #[test]
    fn test_update_field_sets_modified() {
        let mut c = controller();
        c.update_field(ScalarField::Name, "Ada".into());
        assert!(c.modified());
        assert_eq!(c.draft().name, "Ada");
    }

    #[test]
    fn test_modified_clears_on_return_to_snapshot() {
        let mut c = controller();
        c.update_field(ScalarField::Phone, "555".into());
        assert!(c.modified());
        c.update_field(ScalarField::Phone, String::new());
        assert!(!c.modified());
    }

    #[test]
    fn test_noop_update_keeps_modified_consistent() {
        let mut c = controller();
        c.update_field(ScalarField::Name, "Ada".into());
        let before = c.modified();
        c.update_field(ScalarField::Name, "Ada".into());
        assert_eq!(c.modified(), before);
    }

    #[test]
    fn test_skills_scenario() {
        let mut c = controller();
        c.add_entry(Collection::Skills);
        c.add_entry(Collection::Skills);
        c.update_entry(EntryRef::Skill(0), "Go".into());
        c.update_entry(EntryRef::Skill(1), "Rust".into());
        assert_eq!(c.draft().skills, vec!["Go", "Rust"]);
        c.remove_entry(Collection::Skills, 0);
        assert_eq!(c.draft().skills, vec!["Rust"]);
    }

    #[test]
    fn test_update_entry_touches_only_target() {
        let mut c = controller();
        c.add_entry(Collection::Experience);
        c.add_entry(Collection::Experience);
        c.update_entry(
            EntryRef::Experience(0, ExperienceField::Company),
            "Initech".into(),
        );
        assert_eq!(c.draft().experience[0].company, "Initech");
        assert_eq!(c.draft().experience[0].position, "");
        assert_eq!(c.draft().experience[1], Default::default());
    }

    #[test]
    fn test_education_entry_update() {
        let mut c = controller();
        c.add_entry(Collection::Education);
        c.update_entry(
            EntryRef::Education(0, EducationField::Degree),
            "BSc".into(),
        );
        c.update_entry(EntryRef::Education(0, EducationField::Gpa), "3.9".into());
        assert_eq!(c.draft().education[0].degree, "BSc");
        assert_eq!(c.draft().education[0].gpa, "3.9");
        assert_eq!(c.draft().education[0].institution, "");
    }

    #[test]
    fn test_section_navigation_clamps() {
        let mut c = controller();
        assert_eq!(c.section(), Section::Personal);
        c.previous_section();
        assert_eq!(c.section(), Section::Personal);
        c.go_to_section(Section::Skills);
        c.next_section();
        assert_eq!(c.section(), Section::Skills);
    }

    #[test]
    fn test_preview_warns_without_changes() {
        let mut c = controller();
        assert_eq!(c.request_preview(), PreviewOutcome::NoChanges);
        assert!(!c.preview_visible());
    }

    #[test]
    fn test_preview_shows_after_change() {
        let mut c = controller();
        c.update_field(ScalarField::Name, "Ada".into());
        assert_eq!(c.request_preview(), PreviewOutcome::Shown);
        assert!(c.preview_visible());
    }

    #[test]
    fn test_mutation_hides_generated_preview() {
        let mut c = controller();
        c.update_field(ScalarField::Name, "Ada".into());
        c.request_preview();
        assert!(c.preview_visible());
        c.add_entry(Collection::Skills);
        assert!(!c.preview_visible());
    }

    #[test]
    fn test_add_remove_sets_modified() {
        let mut c = controller();
        c.add_entry(Collection::Education);
        assert!(c.modified());
        c.remove_entry(Collection::Education, 0);
        assert!(!c.modified());
    }

    #[test]
    fn test_set_image_returns_displaced() {
        use crate::draft::{ImageFormat, ImageRef};
        let mut c = controller();
        let first = ImageRef {
            source: "a.png".into(),
            cached: "/tmp/a.png".into(),
            format: ImageFormat::Png,
        };
        assert_eq!(c.set_image(Some(first.clone())), None);
        assert!(c.modified());
        let displaced = c.set_image(None);
        assert_eq!(displaced, Some(first));
        assert!(!c.modified());
    }

    #[derive(Debug, Clone)]
    enum SkillOp {
        Add,
        Remove(usize),
    }

    fn skill_ops() -> impl Strategy<Value = Vec<SkillOp>> {
        prop::collection::vec(
            prop_oneof![
                3 => Just(SkillOp::Add),
                1 => (0usize..8).prop_map(SkillOp::Remove),
            ],
            0..32,
        )
    }

    proptest! {
        /// Length after any add/remove sequence equals adds minus applied
        /// removes, and surviving entries keep their relative order.
        #[test]
        fn prop_add_remove_length_and_order(ops in skill_ops()) {
            let mut c = controller();
            let mut model: Vec<String> = Vec::new();
            let mut counter = 0u32;

            for op in ops {
                match op {
                    SkillOp::Add => {
                        c.add_entry(Collection::Skills);
                        let tag = format!("s{counter}");
                        counter += 1;
                        let last = c.entry_count(Collection::Skills) - 1;
                        c.update_entry(EntryRef::Skill(last), tag.clone());
                        model.push(tag);
                    }
                    SkillOp::Remove(i) => {
                        if i < model.len() {
                            c.remove_entry(Collection::Skills, i);
                            model.remove(i);
                        }
                    }
                }
            }

            prop_assert_eq!(&c.draft().skills, &model);
        }

        /// Updating entry `i` never aliases into any other entry.
        #[test]
        fn prop_update_entry_isolated(n in 1usize..6, i in 0usize..6, value in ".*") {
            prop_assume!(i < n);
            let mut c = controller();
            for _ in 0..n {
                c.add_entry(Collection::Experience);
            }
            c.update_entry(
                EntryRef::Experience(i, ExperienceField::Position),
                value.clone(),
            );
            for (j, entry) in c.draft().experience.iter().enumerate() {
                if j == i {
                    prop_assert_eq!(&entry.position, &value);
                } else {
                    prop_assert_eq!(&entry.position, "");
                }
                prop_assert_eq!(&entry.company, "");
            }
        }
    }
}
