//! Image search keyword extraction.
//!
//! One keyword per narration paragraph, used to find an illustration
//! image. The prompt asks for the most visually representative concept in
//! the paragraph; when the call fails, the paragraph's first words stand
//! in so the image stage never stalls on keyword extraction.

use tracing::warn;

use crate::client::ChatClient;

fn keyword_prompt(text: &str) -> String {
    format!(
        r#"You are helping a video editor find the best possible illustration image for a narration.
Given a paragraph from the video script, your task is to extract the most visually representative and specific concept from that paragraph.

This concept should be used as a concise image search keyword. Focus on the most central visual idea in the paragraph — something that could be shown as a background or main visual to accompany the narration.

Avoid abstract concepts, non-visual metaphors, or generic keywords. Instead, choose a specific, vivid subject that would return clear and relevant image results (e.g., "black hole in space", "supernova explosion", "neutron star collision", "Milky Way core", "falling man in sky", etc).

---

Examples:
1. "In 1969, humanity set foot on the Moon for the first time."
→ surface of the Moon

2. "Armstrong's famous words as he stepped down were: 'This is one small step for a man, but one giant leap for mankind.'"
→ Neil Armstrong on the Moon

3. "Have you ever imagined falling from over 10,000 meters without a parachute and surviving?"
→ man falling from sky

4. "On January 26, 1972, Vesna Vulović, a Yugoslavian flight attendant, was on duty aboard JAT Flight 367 when the plane suddenly exploded mid-air."
→ mid-air plane explosion

5. "As you can see, this line of reasoning leads us to Zeno's second paradox, known as the Dichotomy Paradox."
→ Dichotomy Paradox

6. "Finally, we encounter the Arrow Paradox, which posits that a flying arrow is motionless at every instant in time."
→ Arrow Paradox
---

Now, based on the following paragraph from a video script, suggest the best possible image keyword to illustrate it:

"""{text}"""

Return only the keyword phrase without any explanation or quotation marks."#
    )
}

/// Fallback keyword when the LLM call fails: the paragraph's first words.
pub fn fallback_keyword(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().take(3).collect();
    if words.is_empty() {
        "generic concept".to_string()
    } else {
        words.join(" ")
    }
}

/// Derive an image search keyword for one narration paragraph.
pub async fn extract_keyword(client: &ChatClient, text: &str) -> String {
    match client.complete(None, &keyword_prompt(text), 0.7).await {
        Ok(keyword) => keyword.trim().replace('"', ""),
        Err(e) => {
            warn!("Keyword extraction failed, using fallback: {}", e);
            fallback_keyword(text)
        }
    }
}
