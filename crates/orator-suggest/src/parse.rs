use orator_core::{new_id, OutlineCard, Slide};

#[derive(serde::Deserialize)]
struct OutlineEnvelope {
    outlines: Vec<String>,
}

/// Parse raw LLM output into outline cards with dense ordering.
/// Returns empty vec on total parse failure (graceful degradation).
pub fn parse_outline(raw: &str) -> Vec<OutlineCard> {
    let cleaned = strip_code_fences(raw);

    // Expected shape: {"outlines": ["...", ...]}
    let titles: Vec<String> = extract_json_object(&cleaned)
        .and_then(|obj| serde_json::from_str::<OutlineEnvelope>(&obj).ok())
        .map(|env| env.outlines)
        // Some models skip the envelope and answer with a bare array
        .or_else(|| {
            extract_json_array(&cleaned)
                .and_then(|arr| serde_json::from_str::<Vec<String>>(&arr).ok())
        })
        .unwrap_or_default();

    titles
        .into_iter()
        .filter(|t| !t.trim().is_empty())
        .enumerate()
        .map(|(i, title)| OutlineCard {
            id: new_id(),
            title,
            order: i,
        })
        .collect()
}

/// Parse raw LLM output into a slide batch ready for `load_slides`: every
/// slide gets a fresh id (the model is not trusted to keep ids unique) and a
/// dense `slideOrder` by position. Returns empty vec on total parse failure.
pub fn parse_slide_batch(raw: &str) -> Vec<Slide> {
    let cleaned = strip_code_fences(raw);
    let json_str = match extract_json_array(&cleaned) {
        Some(s) => s,
        None => return vec![],
    };

    // Try full array parse first
    let mut slides: Vec<Slide> = match serde_json::from_str(&json_str) {
        Ok(s) => s,
        Err(e) => {
            // Fall back to object-by-object recovery
            log::debug!("slide batch array parse failed ({e}), recovering per object");
            parse_objects_individually(&json_str)
        }
    };

    for (i, slide) in slides.iter_mut().enumerate() {
        slide.id = new_id();
        slide.order = i;
    }
    slides
}

/// Remove markdown code fences the model may wrap the JSON in.
fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "")
}

/// Extract the JSON object substring from raw LLM output.
fn extract_json_object(raw: &str) -> Option<String> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(raw[start..=end].to_string())
}

/// Extract the JSON array substring from raw LLM output.
fn extract_json_array(raw: &str) -> Option<String> {
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    if end <= start {
        return None;
    }
    Some(raw[start..=end].to_string())
}

/// Try to parse individual slide objects from a malformed JSON array,
/// keeping the ones that parse and dropping the rest.
fn parse_objects_individually(json_str: &str) -> Vec<Slide> {
    let inner = json_str
        .trim()
        .strip_prefix('[')
        .unwrap_or(json_str)
        .strip_suffix(']')
        .unwrap_or(json_str);

    let mut slides = Vec::new();
    let mut depth = 0;
    let mut start = None;

    for (i, ch) in inner.char_indices() {
        match ch {
            '{' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' => {
                depth -= 1;
                if depth == 0 {
                    if let Some(s) = start {
                        let obj_str = &inner[s..=i];
                        match serde_json::from_str::<Slide>(obj_str) {
                            Ok(slide) => slides.push(slide),
                            Err(e) => log::debug!("dropping unparseable slide: {e}"),
                        }
                    }
                    start = None;
                }
            }
            _ => {}
        }
    }

    slides
}
