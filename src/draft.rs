use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Image formats accepted by the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }

    /// MIME type used in the data URI of the printed document.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }
}

/// Reference to a validated portrait image: the source the user named,
/// the private cached copy owned by the store, and the sniffed format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub source: PathBuf,
    pub cached: PathBuf,
    pub format: ImageFormat,
}

/// One work experience entry. Insertion order is display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub company: String,
    pub position: String,
    pub description: String,
}

/// One education entry. Insertion order is display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub year: String,
    pub gpa: String,
}

/// The in-memory resume being edited. Compared structurally against the
/// snapshot taken at startup to derive the modified flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeDraft {
    pub name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub image: Option<ImageRef>,
    pub summary: String,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<String>,
}

impl ResumeDraft {
    pub fn scalar(&self, field: ScalarField) -> &str {
        match field {
            ScalarField::Name => &self.name,
            ScalarField::Title => &self.title,
            ScalarField::Email => &self.email,
            ScalarField::Phone => &self.phone,
            ScalarField::Summary => &self.summary,
        }
    }

    /// Current value of the entry field `at` points to. Panics on an
    /// out-of-bounds index, same as the write path.
    pub fn entry(&self, at: EntryRef) -> &str {
        match at {
            EntryRef::Experience(i, f) => {
                let e = &self.experience[i];
                match f {
                    ExperienceField::Company => &e.company,
                    ExperienceField::Position => &e.position,
                    ExperienceField::Description => &e.description,
                }
            }
            EntryRef::Education(i, f) => {
                let e = &self.education[i];
                match f {
                    EducationField::Institution => &e.institution,
                    EducationField::Degree => &e.degree,
                    EducationField::Year => &e.year,
                    EducationField::Gpa => &e.gpa,
                }
            }
            EntryRef::Skill(i) => &self.skills[i],
        }
    }
}

/// Scalar top-level fields of the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarField {
    Name,
    Title,
    Email,
    Phone,
    Summary,
}

impl ScalarField {
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Title => "Title",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Summary => "Professional Summary",
        }
    }
}

/// Fields of an experience entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExperienceField {
    Company,
    Position,
    Description,
}

impl ExperienceField {
    pub fn label(self) -> &'static str {
        match self {
            Self::Company => "Company",
            Self::Position => "Position",
            Self::Description => "Job Description",
        }
    }
}

/// Fields of an education entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EducationField {
    Institution,
    Degree,
    Year,
    Gpa,
}

impl EducationField {
    pub fn label(self) -> &'static str {
        match self {
            Self::Institution => "Institution",
            Self::Degree => "Degree",
            Self::Year => "Year",
            Self::Gpa => "GPA",
        }
    }
}

/// Address of one editable field inside the three collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryRef {
    Experience(usize, ExperienceField),
    Education(usize, EducationField),
    Skill(usize),
}

/// The three entry collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Experience,
    Education,
    Skills,
}

/// One step of the form wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Personal,
    Experience,
    Education,
    Skills,
}

impl Section {
    /// Advance one step. Clamped at the last section, no wrap-around.
    pub fn next(self) -> Self {
        match self {
            Self::Personal => Self::Experience,
            Self::Experience => Self::Education,
            Self::Education => Self::Skills,
            Self::Skills => Self::Skills,
        }
    }

    /// Step back. Clamped at the first section, no wrap-around.
    pub fn prev(self) -> Self {
        match self {
            Self::Personal => Self::Personal,
            Self::Experience => Self::Personal,
            Self::Education => Self::Experience,
            Self::Skills => Self::Education,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Personal => "Personal Info",
            Self::Experience => "Experience",
            Self::Education => "Education",
            Self::Skills => "Skills",
        }
    }

    pub const ALL: [Section; 4] = [
        Self::Personal,
        Self::Experience,
        Self::Education,
        Self::Skills,
    ];
}

/// Errors reading a draft JSON file given on the command line.
#[derive(Error, Debug)]
pub enum DraftFileError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed draft {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Load a draft saved as JSON.
pub fn load_draft(path: &Path) -> Result<ResumeDraft, DraftFileError> {
    let raw = std::fs::read_to_string(path).map_err(|source| DraftFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| DraftFileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
