//! Multi-step narration script generation.
//!
//! A narration is built in stages: topic analysis, structure, detail
//! research, hooks, full-script synthesis, then a rewrite into natural
//! spoken narration. Two quality passes follow: expansion when the result
//! is too short and re-paragraphing when it reads as a wall of text.

use tracing::{debug, info};

use crate::client::ChatClient;
use crate::error::LlmResult;

/// Minimum words for a publishable narration.
pub const MIN_WORD_COUNT: usize = 1500;

/// Minimum paragraph count before the re-paragraphing pass kicks in.
const MIN_PARAGRAPHS: usize = 10;

const SYSTEM_PROMPT: &str = "You are a professional video script writer. You help create \
engaging, insightful, and interesting content in English.";

/// Count whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Count nonempty paragraphs (separated by blank lines).
pub fn paragraph_count(text: &str) -> usize {
    text.split("\n\n").filter(|p| !p.trim().is_empty()).count()
}

/// Narration script writer driving the prompt chain.
pub struct ScriptWriter<'a> {
    client: &'a ChatClient,
}

impl<'a> ScriptWriter<'a> {
    pub fn new(client: &'a ChatClient) -> Self {
        Self { client }
    }

    /// Generate a complete narration for one video title.
    pub async fn generate_narration(&self, title: &str) -> LlmResult<String> {
        info!("Generating narration for: {}", title);

        let analysis = self.step(&analysis_prompt(title), 0.7).await?;
        debug!("Topic analysis completed");

        let structure = self.step(&structure_prompt(title, &analysis), 0.7).await?;
        debug!("Content structure completed");

        let details = self.step(&details_prompt(title, &structure), 0.7).await?;
        debug!("Content details completed");

        let hooks = self.step(&hooks_prompt(title, &details), 0.7).await?;
        debug!("Hooks and questions completed");

        let script = self
            .step(
                &script_prompt(title, &analysis, &structure, &details, &hooks),
                0.8,
            )
            .await?;
        debug!("Full script completed");

        let mut narration = self.step(&narration_prompt(&script), 0.7).await?;
        debug!(
            "Narration rewrite completed ({} words, {} paragraphs)",
            word_count(&narration),
            paragraph_count(&narration)
        );

        if word_count(&narration) < MIN_WORD_COUNT {
            info!(
                "Narration too short ({} words), expanding",
                word_count(&narration)
            );
            narration = self.step(&expand_prompt(&narration), 0.7).await?;
        }

        if paragraph_count(&narration) < MIN_PARAGRAPHS {
            info!(
                "Narration has too few paragraphs ({}), re-paragraphing",
                paragraph_count(&narration)
            );
            narration = self.step(&reparagraph_prompt(&narration), 0.7).await?;
        }

        Ok(narration)
    }

    async fn step(&self, prompt: &str, temperature: f32) -> LlmResult<String> {
        self.client
            .complete(Some(SYSTEM_PROMPT), prompt, temperature)
            .await
    }
}

fn target_word_count() -> usize {
    std::cmp::max(2500, MIN_WORD_COUNT * 12 / 10)
}

fn analysis_prompt(title: &str) -> String {
    format!(
        r#"Analyze the topic: "{title}"

1. Identify 5-7 potential viewer groups for this video.
2. For each group, list 3-5 questions they typically ask about this topic.
3. Identify the 10 most important knowledge points to convey.
4. Suggest 5 unique approaches to make this topic engaging.

Please provide a detailed and well-structured response."#
    )
}

fn structure_prompt(title: &str, analysis: &str) -> String {
    format!(
        r#"Based on the following analysis of the topic "{title}":

{analysis}

Create a detailed structure for the video script with:

1. A shocking/surprising introduction to immediately capture viewers' attention (30-45 seconds)
2. Divide the main content into 5-7 sections with specific titles
3. For each section, list:
   - Specific statistics and dates to mention
   - Visual examples or comparisons to explain concepts
   - Open-ended questions to maintain curiosity
4. A conclusion with an impactful message (not just "like & subscribe")

Please provide a detailed, information-rich structure."#
    )
}

fn details_prompt(title: &str, structure: &str) -> String {
    format!(
        r#"Based on the following script structure for the topic "{title}":

{structure}

Research and add details to each section with:

1. Factual information, accurate and reliable statistics
2. Engaging stories about the topic
3. Visual examples, easy-to-understand comparisons for complex concepts
4. Connections to modern discoveries and their impact on our understanding
5. Surprising or little-known points

Please provide detailed, accurate, and interesting information."#
    )
}

fn hooks_prompt(title: &str, details: &str) -> String {
    format!(
        r#"Based on the structure and details of the video script about "{title}":

{details}

Create:

1. 5 different shocking/surprising opening sentences to immediately capture attention
2. 10 open-ended questions to place throughout the video, stimulating curiosity
3. 5 natural transitions between sections
4. 5 different conclusions, each powerful and memorable

Ensure these elements are tightly connected to the content and create coherence."#
    )
}

fn script_prompt(
    title: &str,
    analysis: &str,
    structure: &str,
    details: &str,
    hooks: &str,
) -> String {
    let target = target_word_count();
    format!(
        r#"Synthesize a complete, detailed video script about the topic "{title}" based on the following parts:

TOPIC ANALYSIS:
{analysis}

CONTENT STRUCTURE:
{structure}

CONTENT DETAILS:
{details}

HOOKS AND QUESTIONS:
{hooks}

Requirements:
1. Create a long, detailed script (minimum {target} words)
2. Use a friendly, accessible but professional tone
3. Incorporate hooks and open-ended questions throughout to continuously engage
4. Provide specific data, statistics, and examples
5. Create a coherent story from beginning to end
6. Avoid formulaic endings like "like & subscribe"

This should be a complete script, ready for video production."#
    )
}

fn narration_prompt(script: &str) -> String {
    format!(
        r####"Convert the following video script into a NATURAL English NARRATION with natural formatting:

{script}

IMPORTANT REQUIREMENTS:
1. Keep paragraphs natural as you would normally write, DO NOT force line breaks after each sentence
2. However, DIVIDE INTO MULTIPLE PARAGRAPHS (about 5-7 sentences each) to create natural pauses
3. DO NOT use marking symbols like "**", "-", "###", "*" or any special formatting
4. DO NOT mention "images", "narration", "examples", or any editing instructions
5. ESPECIALLY IMPORTANT: Create narration as if you're speaking directly to the viewer
6. DO NOT end with phrases like "Hope you...", "Thanks for watching...", or "Like and subscribe..."
7. Use open-ended questions within the content to create natural connections
8. Create long content (minimum {MIN_WORD_COUNT} words)

The result should be multiple natural paragraphs, with spaces between paragraphs, without too much special formatting."####
    )
}

fn expand_prompt(narration: &str) -> String {
    let upper = MIN_WORD_COUNT + 500;
    format!(
        r#"Here is a narration:

{narration}

Please expand this narration to at least {MIN_WORD_COUNT} words by:
1. Adding more details to each existing paragraph
2. Delving deeper into examples and applications
3. Adding information about history and related research
4. Including more findings and debates
5. Expanding explanations of complex concepts

Please ensure:
- Still divided into natural paragraphs
- Each paragraph has space between it and others (double line break between paragraphs)
- Content remains continuous and coherent
- Total word count EXACTLY between {MIN_WORD_COUNT} and {upper} words"#
    )
}

fn reparagraph_prompt(narration: &str) -> String {
    format!(
        r#"Here is a narration:

{narration}

Please divide it into more paragraphs for easier reading. Each paragraph should contain only 4-6 related sentences.

Need at least 15-20 separate paragraphs.

Please ensure:
- Each paragraph has space from others (double line break between paragraphs)
- Content remains continuous and coherent
- No titles or numbering for paragraphs
- Everything is still one continuous piece, just divided into more paragraphs for readability
- Word count remains the same, content not changed"#
    )
}
