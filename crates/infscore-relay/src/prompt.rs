use std::borrow::Cow;

const SYSTEM_PROMPT: &str = "You are an expert influencer marketing analyst. Provide detailed analysis.";

const SYSTEM_PROMPT_STRUCTURED: &str = "You are an expert influencer marketing analyst. Provide detailed analysis and always respond in valid JSON format when requested.";

const SCHEMA_INSTRUCTIONS: &str = r#"Please provide your response in the following JSON format:
{
  "credibilityScore": (number between 0-10, or null),
  "audienceAuthenticity": {
    "score": (number between 0-10, or null),
    "analysis": "(text summary)"
  },
  "contentQuality": {
    "score": (number between 0-10, or null),
    "analysis": "(text summary)"
  },
  "brandAlignmentPotential": {
    "score": (number between 0-10, or null),
    "analysis": "(text summary)"
  },
  "engagementMetrics": {
    "score": (number between 0-10, or null),
    "analysis": "(text summary)"
  },
  "overallAnalysis": "(detailed text summary)"
}

If you don't have specific information about this influencer, set scores to null and provide general information in the analysis fields."#;

pub(crate) fn system_prompt(structured: bool) -> &'static str {
    if structured {
        SYSTEM_PROMPT_STRUCTURED
    } else {
        SYSTEM_PROMPT
    }
}

/// The user message sent upstream; structured mode appends the schema.
pub(crate) fn user_prompt(prompt: &str, structured: bool) -> Cow<'_, str> {
    if structured {
        Cow::Owned(format!("{prompt}\n\n{SCHEMA_INSTRUCTIONS}"))
    } else {
        Cow::Borrowed(prompt)
    }
}

/// Prompt the CLI sends for a named influencer.
#[must_use]
pub fn influencer_prompt(name: &str) -> String {
    format!(
        "Analyze the social media influencer \"{name}\" across major platforms like Instagram, YouTube, TikTok, and Twitter.
If you don't have specific information about this influencer, please state that clearly and provide general information about what makes influencers credible in their niche.

For influencers you do have information about, please provide:
1. Credibility score (0-10)
2. Audience authenticity assessment
3. Content quality evaluation
4. Brand alignment potential
5. Engagement metrics analysis

Also estimate their niche category, primary platform, and audience size based on your analysis."
    )
}
