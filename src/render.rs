use crate::draft::{ImageRef, ResumeDraft};
use crate::image::ImageStore;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

/// Portrait slot of the rendered document.
#[derive(Debug, Clone, PartialEq)]
pub enum Portrait {
    Image(ImageRef),
    Placeholder,
}

/// One rendered experience block.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperienceBlock {
    pub position: String,
    pub company: String,
    pub description: String,
}

/// One rendered education block.
#[derive(Debug, Clone, PartialEq)]
pub struct EducationBlock {
    pub degree: String,
    pub institution: String,
    pub year: String,
    pub gpa: String,
}

/// Read-only projection of a draft, in display order. This is what both the
/// preview pane and the printed document are built from.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeDocument {
    pub name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub portrait: Portrait,
    pub summary: String,
    pub experience: Vec<ExperienceBlock>,
    pub education: Vec<EducationBlock>,
    pub skills: Vec<String>,
}

impl ResumeDocument {
    /// Pure projection; stored order is display order.
    pub fn project(draft: &ResumeDraft) -> Self {
        Self {
            name: draft.name.clone(),
            title: draft.title.clone(),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
            portrait: match &draft.image {
                Some(image) => Portrait::Image(image.clone()),
                None => Portrait::Placeholder,
            },
            summary: draft.summary.clone(),
            experience: draft
                .experience
                .iter()
                .map(|e| ExperienceBlock {
                    position: e.position.clone(),
                    company: e.company.clone(),
                    description: e.description.clone(),
                })
                .collect(),
            education: draft
                .education
                .iter()
                .map(|e| EducationBlock {
                    degree: e.degree.clone(),
                    institution: e.institution.clone(),
                    year: e.year.clone(),
                    gpa: e.gpa.clone(),
                })
                .collect(),
            skills: draft.skills.clone(),
        }
    }
}

/// Print stylesheet, inlined so the document stands alone.
const PRINT_STYLE: &str = "body{font-family: Arial, sans-serif; margin: 18px;}\
.resume-wrapper{max-width: 600px; margin: 0 auto;}\
h1, h2, h3, h4{font-weight: bold; color: #4CAF50;}\
p{font-size: 14px;}\
.portrait{width: 128px; height: 128px; border-radius: 50%; object-fit: cover;}\
.portrait-placeholder{width: 128px; height: 128px; border-radius: 50%; background: #d1d5db;}\
.skill{display: inline-block; background: #eef2ff; border-radius: 9999px; \
padding: 4px 12px; margin: 2px; font-size: 13px;}\
@media print {body{font-size: 14px;}}";

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape and turn textarea newlines into breaks.
fn escape_multiline(text: &str) -> String {
    escape_html(text).replace('\n', "<br>")
}

/// Portrait markup. An image that cannot be read back, or that no longer
/// sniffs as an image, degrades to the placeholder with a logged warning.
fn portrait_html(portrait: &Portrait, images: &dyn ImageStore) -> String {
    if let Portrait::Image(image) = portrait {
        match images.read(image) {
            Ok(bytes) => {
                return format!(
                    "<img class=\"portrait\" alt=\"Profile\" src=\"data:{};base64,{}\">",
                    image.format.mime(),
                    BASE64.encode(&bytes)
                );
            }
            Err(e) => {
                tracing::warn!("invalid portrait image, using placeholder: {}", e.user_message());
            }
        }
    }
    "<div class=\"portrait-placeholder\"></div>".to_string()
}

/// Serialize the document as a minimal standalone HTML page, ready to hand
/// to a print surface.
pub fn document_html(doc: &ResumeDocument, images: &dyn ImageStore) -> String {
    let mut html = String::new();
    html.push_str("<html><head><title>Resume</title><style>");
    html.push_str(PRINT_STYLE);
    html.push_str("</style></head><body><div class=\"resume-wrapper\">");

    html.push_str(&portrait_html(&doc.portrait, images));
    html.push_str(&format!("<h1>{}</h1>", escape_html(&doc.name)));
    html.push_str(&format!("<p>{}</p>", escape_html(&doc.title)));
    html.push_str(&format!(
        "<p><a href=\"mailto:{0}\">{0}</a></p>",
        escape_html(&doc.email)
    ));
    html.push_str(&format!("<p>{}</p>", escape_html(&doc.phone)));

    html.push_str("<section><h2>Professional Summary</h2>");
    html.push_str(&format!("<p>{}</p></section>", escape_multiline(&doc.summary)));

    html.push_str("<section><h2>Work Experience</h2>");
    for exp in &doc.experience {
        html.push_str(&format!(
            "<div><h3>{}</h3><h4>{}</h4><ul><li>{}</li></ul></div>",
            escape_html(&exp.position),
            escape_html(&exp.company),
            escape_multiline(&exp.description)
        ));
    }
    html.push_str("</section>");

    html.push_str("<section><h2>Education</h2>");
    for edu in &doc.education {
        html.push_str(&format!(
            "<div><h3>{}</h3><p>{}</p><p>Graduated: {}</p><p>GPA: {}</p></div>",
            escape_html(&edu.degree),
            escape_html(&edu.institution),
            escape_html(&edu.year),
            escape_html(&edu.gpa)
        ));
    }
    html.push_str("</section>");

    html.push_str("<section><h2>Skills</h2><div>");
    for skill in &doc.skills {
        html.push_str(&format!("<span class=\"skill\">{}</span>", escape_html(skill)));
    }
    html.push_str("</div></section>");

    html.push_str("</div></body></html>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{EducationEntry, ExperienceEntry, ImageFormat};
    use crate::image::testing::MemoryImageStore;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n data";

    fn draft_with_name(name: &str) -> ResumeDraft {
        ResumeDraft {
            name: name.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_title_block_contains_name() {
        let doc = ResumeDocument::project(&draft_with_name("Ada"));
        let html = document_html(&doc, &MemoryImageStore::default());
        assert!(html.contains("<h1>Ada</h1>"));
    }

    #[test]
    fn test_missing_image_uses_placeholder() {
        let doc = ResumeDocument::project(&ResumeDraft::default());
        assert_eq!(doc.portrait, Portrait::Placeholder);
        let html = document_html(&doc, &MemoryImageStore::default());
        assert!(html.contains("portrait-placeholder"));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_valid_image_is_inlined() {
        let store = MemoryImageStore::with_file("me.png", PNG_MAGIC.to_vec());
        let mut draft = ResumeDraft::default();
        draft.image = Some(store.acquire(std::path::Path::new("me.png")).unwrap());
        let html = document_html(&ResumeDocument::project(&draft), &store);
        assert!(html.contains("data:image/png;base64,"));
    }

    #[test]
    fn test_unreadable_image_falls_back_to_placeholder() {
        let mut draft = ResumeDraft::default();
        draft.image = Some(ImageRef {
            source: "gone.png".into(),
            cached: "gone.png".into(),
            format: ImageFormat::Png,
        });
        let html = document_html(&ResumeDocument::project(&draft), &MemoryImageStore::default());
        assert!(html.contains("portrait-placeholder"));
    }

    #[test]
    fn test_blocks_keep_stored_order() {
        let mut draft = ResumeDraft::default();
        for company in ["First Corp", "Second Corp", "Third Corp"] {
            draft.experience.push(ExperienceEntry {
                company: company.into(),
                ..Default::default()
            });
        }
        draft.skills = vec!["Go".into(), "Rust".into()];
        let doc = ResumeDocument::project(&draft);
        let companies: Vec<&str> = doc.experience.iter().map(|e| e.company.as_str()).collect();
        assert_eq!(companies, ["First Corp", "Second Corp", "Third Corp"]);

        let html = document_html(&doc, &MemoryImageStore::default());
        let first = html.find("First Corp").unwrap();
        let second = html.find("Second Corp").unwrap();
        let third = html.find("Third Corp").unwrap();
        assert!(first < second && second < third);
        assert!(html.find("Go").unwrap() < html.find("Rust").unwrap());
    }

    #[test]
    fn test_user_text_is_escaped() {
        let mut draft = draft_with_name("<script>alert(1)</script>");
        draft.skills = vec!["C & C++".into()];
        let html = document_html(&ResumeDocument::project(&draft), &MemoryImageStore::default());
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("C &amp; C++"));
    }

    #[test]
    fn test_education_block_renders_gpa() {
        let mut draft = ResumeDraft::default();
        draft.education.push(EducationEntry {
            institution: "MIT".into(),
            degree: "BSc".into(),
            year: "2019".into(),
            gpa: "3.9".into(),
        });
        let html = document_html(&ResumeDocument::project(&draft), &MemoryImageStore::default());
        assert!(html.contains("Graduated: 2019"));
        assert!(html.contains("GPA: 3.9"));
    }

    #[test]
    fn test_summary_newlines_become_breaks() {
        let mut draft = ResumeDraft::default();
        draft.summary = "line one\nline two".into();
        let html = document_html(&ResumeDocument::project(&draft), &MemoryImageStore::default());
        assert!(html.contains("line one<br>line two"));
    }
}
