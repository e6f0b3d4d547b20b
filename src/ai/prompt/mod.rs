//! Prompt Builder System
//!
//! Standardized prompt construction for deck generation.
//!
//! ## Sections
//!
//! 1. **Role**: presentation designer persona
//! 2. **Objectives**: numbered per-slide requirements
//! 3. **Context**: request parameters, in insertion order
//! 4. **Focus**: keep the content on the requested topic
//! 5. **Output**: JSON shape the response parser expects

use crate::types::PresentationRequest;

/// System instruction sent with every deck completion
pub const SYSTEM_INSTRUCTION: &str = "You are a professional presentation designer. \
Create the structure and content of a presentation, writing text with correct spacing \
between words. Always answer with valid JSON only.";

/// Prompt section types
#[derive(Debug, Clone)]
pub enum PromptSection {
    /// Role definition with expertise area
    Role { expertise: String, task: String },
    /// Numbered objectives
    Objectives(Vec<String>),
    /// Ordered key-value pairs
    Context(Vec<(String, String)>),
    /// Headed free-text section
    Text { header: String, content: String },
    /// Focus enforcement with restrictions
    Focus {
        target: String,
        restrictions: Vec<String>,
    },
}

/// Prompt builder for consistent prompt construction
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    sections: Vec<PromptSection>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn role(mut self, expertise: &str, task: &str) -> Self {
        self.sections.push(PromptSection::Role {
            expertise: expertise.to_string(),
            task: task.to_string(),
        });
        self
    }

    pub fn objectives(mut self, objectives: Vec<&str>) -> Self {
        self.sections.push(PromptSection::Objectives(
            objectives.into_iter().map(String::from).collect(),
        ));
        self
    }

    /// Add a context item, appending to the existing context section
    pub fn context_item(mut self, key: &str, value: &str) -> Self {
        let item = (key.to_string(), value.to_string());
        for section in &mut self.sections {
            if let PromptSection::Context(ctx) = section {
                ctx.push(item);
                return self;
            }
        }
        self.sections.push(PromptSection::Context(vec![item]));
        self
    }

    pub fn section(mut self, header: &str, content: &str) -> Self {
        self.sections.push(PromptSection::Text {
            header: header.to_string(),
            content: content.to_string(),
        });
        self
    }

    pub fn focus(mut self, target: &str, restrictions: Vec<&str>) -> Self {
        self.sections.push(PromptSection::Focus {
            target: target.to_string(),
            restrictions: restrictions.into_iter().map(String::from).collect(),
        });
        self
    }

    pub fn build(self) -> String {
        let mut prompt = String::new();

        for section in self.sections {
            match section {
                PromptSection::Role { expertise, task } => {
                    prompt.push_str("<ROLE>\n");
                    prompt.push_str(&format!(
                        "You are an expert {} specializing in {}.\n",
                        expertise, task
                    ));
                    prompt.push_str("</ROLE>\n\n");
                }
                PromptSection::Objectives(objectives) => {
                    prompt.push_str("<OBJECTIVES>\n");
                    for (i, obj) in objectives.iter().enumerate() {
                        prompt.push_str(&format!("{}. {}\n", i + 1, obj));
                    }
                    prompt.push_str("</OBJECTIVES>\n\n");
                }
                PromptSection::Context(ctx) => {
                    prompt.push_str("# Context\n\n");
                    for (key, value) in ctx {
                        prompt.push_str(&format!("**{}**: {}\n", key, value));
                    }
                    prompt.push('\n');
                }
                PromptSection::Text { header, content } => {
                    prompt.push_str(&format!("# {}\n\n", header));
                    prompt.push_str(&content);
                    prompt.push_str("\n\n");
                }
                PromptSection::Focus {
                    target,
                    restrictions,
                } => {
                    prompt.push_str("<FOCUS>\n");
                    prompt.push_str(&format!("IMPORTANT: Focus EXCLUSIVELY on: {}\n", target));
                    for restriction in restrictions {
                        prompt.push_str(&format!("- {}\n", restriction));
                    }
                    prompt.push_str("</FOCUS>\n\n");
                }
            }
        }

        prompt.trim_end().to_string()
    }
}

const OUTPUT_SHAPE: &str = r#"Respond with a single JSON object of this shape:
{
  "title": "Presentation title",
  "slides": [
    {"type": "title", "title": "...", "subtitle": "..."},
    {
      "type": "content",
      "title": "...",
      "bulletPoints": ["...", "..."],
      "visualElements": [{"type": "image" | "chart" | "diagram", "description": "..."}]
    }
  ]
}"#;

/// Preset prompt templates
pub struct PromptTemplates;

impl PromptTemplates {
    /// User prompt for generating a whole deck
    pub fn deck(request: &PresentationRequest) -> String {
        let slide_count = request.slide_count().to_string();
        let additional = if request.additional_info().trim().is_empty() {
            "none"
        } else {
            request.additional_info()
        };

        PromptBuilder::new()
            .role("presentation designer", "clear, well-structured slide decks")
            .context_item("Topic", request.theme())
            .context_item("Number of slides", &slide_count)
            .context_item("Audience", request.audience())
            .context_item("Additional information", additional)
            .objectives(vec![
                "Give every slide a short, specific title",
                "Give content slides key points as a bulleted list",
                "Describe the visual elements each slide needs (charts, diagrams, images)",
            ])
            .section(
                "Structure",
                "- Title slide\n- Introduction / overview\n- Main content split into logical sections\n- Conclusion / takeaways",
            )
            .focus(
                request.theme(),
                vec![
                    "Produce exactly the requested number of slides",
                    "Keep wording suitable for the stated audience",
                ],
            )
            .section("Output", OUTPUT_SHAPE)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_prompt() {
        let prompt = PromptBuilder::new()
            .role("presentation designer", "decks")
            .objectives(vec!["Plan slides", "Write bullets"])
            .build();

        assert!(prompt.contains("<ROLE>"));
        assert!(prompt.contains("presentation designer"));
        assert!(prompt.contains("1. Plan slides"));
        assert!(prompt.contains("2. Write bullets"));
    }

    #[test]
    fn test_context_items_keep_order() {
        let prompt = PromptBuilder::new()
            .context_item("Topic", "Rust")
            .section("Notes", "between")
            .context_item("Audience", "Engineers")
            .build();

        let topic = prompt.find("**Topic**: Rust").unwrap();
        let audience = prompt.find("**Audience**: Engineers").unwrap();
        assert!(topic < audience);
        assert!(audience < prompt.find("between").unwrap());
    }

    #[test]
    fn test_deck_prompt_embeds_request() {
        let request = PresentationRequest::new("Climate Change")
            .unwrap()
            .with_slide_count(3)
            .unwrap()
            .with_audience("Students")
            .with_additional_info("Focus on oceans");
        let prompt = PromptTemplates::deck(&request);

        assert!(prompt.contains("**Topic**: Climate Change"));
        assert!(prompt.contains("**Number of slides**: 3"));
        assert!(prompt.contains("**Audience**: Students"));
        assert!(prompt.contains("**Additional information**: Focus on oceans"));
        assert!(prompt.contains("Conclusion"));
        assert!(prompt.contains("bulletPoints"));
    }

    #[test]
    fn test_deck_prompt_without_additional_info() {
        let request = PresentationRequest::new("Bees").unwrap();
        let prompt = PromptTemplates::deck(&request);
        assert!(prompt.contains("**Additional information**: none"));
    }
}
