pub mod engine;
mod parse;
mod prompt;

use orator_core::{AiSettings, OutlineCard, Slide};

/// Generate a presentation outline for a topic via the configured LLM.
///
/// Returns the outline as ordered cards (dense `order` starting at 0). Fails
/// with a readable message when the provider errors or returns something
/// that does not contain an outline.
pub async fn generate_outline(
    settings: &AiSettings,
    topic: &str,
) -> Result<Vec<OutlineCard>, String> {
    let system = prompt::outline_system_prompt();
    let user_msg = prompt::outline_user_message(topic);

    log::debug!(
        "generating outline via {} ({})",
        settings.provider,
        settings.model
    );

    let raw = engine::generate(settings, system, &user_msg, engine::GenOptions::outline()).await?;
    let cards = parse::parse_outline(&raw);
    if cards.is_empty() {
        log::warn!("no outline points in LLM output: {raw}");
        return Err("LLM returned no outline points".to_string());
    }
    Ok(cards)
}

/// Generate a full slide batch from an outline via the configured LLM.
///
/// Each returned slide carries a fresh id and a dense `slideOrder`, so the
/// batch satisfies the slide store's `load_slides` precondition as-is.
pub async fn generate_slides(
    settings: &AiSettings,
    outlines: &[String],
) -> Result<Vec<Slide>, String> {
    let system = prompt::layouts_system_prompt();
    let user_msg = prompt::layouts_user_message(outlines);

    log::debug!(
        "generating {} slides via {} ({})",
        outlines.len(),
        settings.provider,
        settings.model
    );

    let raw = engine::generate(settings, system, &user_msg, engine::GenOptions::layouts()).await?;
    let slides = parse::parse_slide_batch(&raw);
    if slides.is_empty() {
        log::warn!("no usable slides in LLM output: {raw}");
        return Err("LLM returned no usable slides".to_string());
    }
    log::debug!("parsed {} slides", slides.len());
    Ok(slides)
}
