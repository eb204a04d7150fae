//! LLM prompt engineering for branch variants

use branchcast_domain::{BranchId, BranchVariant};

/// Response schema passed to structured-output backends
pub const RESPONSE_SCHEMA: &str = r#"{
  "type": "OBJECT",
  "properties": {
    "shortForm": { "type": "STRING" },
    "longForm": { "type": "STRING" }
  },
  "required": ["shortForm", "longForm"]
}"#;

/// Builds the prompt for one branch's variant
pub struct PromptBuilder<'a> {
    article: &'a str,
    directive: &'a str,
    branch: &'a BranchId,
    short_form_max_chars: usize,
    prior_variants: &'a [BranchVariant],
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    ///
    /// `article` should already be cut to the configured prefix.
    pub fn new(article: &'a str, directive: &'a str, branch: &'a BranchId) -> Self {
        Self {
            article,
            directive,
            branch,
            short_form_max_chars: branchcast_domain::DEFAULT_SHORT_FORM_MAX_CHARS,
            prior_variants: &[],
        }
    }

    /// Set the short-form cap stated in the prompt
    pub fn with_short_form_cap(mut self, max_chars: usize) -> Self {
        self.short_form_max_chars = max_chars;
        self
    }

    /// Add variants already written in this batch
    pub fn with_prior_variants(mut self, variants: &'a [BranchVariant]) -> Self {
        self.prior_variants = variants;
        self
    }

    /// Build the complete prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        // 1. Task and tone
        prompt.push_str(&format!(
            "Based on the following news article text, write two social media posts for the branch \"{}\".\n",
            self.branch
        ));
        prompt.push_str(&format!(
            "The tone must be {} towards the main subject of the article.\n\n",
            self.directive
        ));

        // 2. The two registers
        prompt.push_str("Write two distinct pieces in different registers:\n");
        prompt.push_str(&format!(
            "- \"shortForm\": a short, casual post of at most {} characters, like a tweet.\n",
            self.short_form_max_chars
        ));
        prompt.push_str(
            "- \"longForm\": a longer post of several sentences, like a Facebook post. \
             It must not simply repeat the short form.\n\n",
        );

        // 3. Anti-repetition context
        if !self.prior_variants.is_empty() {
            prompt.push_str(
                "Posts already written for other branches from this same article \
                 (do not reuse their wording, opening, hashtags or angle; make this one clearly different):\n",
            );
            for (idx, variant) in self.prior_variants.iter().enumerate() {
                prompt.push_str(&format!(
                    "{}. [{}]\n   shortForm: {}\n   longForm: {}\n",
                    idx + 1,
                    variant.branch_id(),
                    variant.short_form(),
                    variant.long_form()
                ));
            }
            prompt.push('\n');
        }

        // 4. The article
        prompt.push_str("Article text:\n\"\"\"\n");
        prompt.push_str(self.article);
        prompt.push_str("\n\"\"\"\n\n");

        // 5. Output format reminder
        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

const OUTPUT_FORMAT_REMINDER: &str = r#"Output format (JSON object only, no additional text):
{"shortForm": "...", "longForm": "..."}

Remember: Return ONLY valid JSON with exactly these two keys, no markdown code blocks, no explanations."#;
