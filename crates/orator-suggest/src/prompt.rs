use std::sync::Arc;

use orator_core::{ContentKind, ContentNode, NodeValue, Slide};

pub fn outline_system_prompt() -> &'static str {
    "You are a helpful AI that generates outlines for presentations."
}

pub fn outline_user_message(topic: &str) -> String {
    format!(
        "Create a coherent and relevant outline for the following prompt: {topic}\n\n\
The outline should consist of more than 5 points, with each point written as a \
single sentence.\n\
Ensure the outline is well-structured and directly related to the topic.\n\
Return the output in the following JSON format:\n\n\
{{\n  \"outlines\": [\n    \"Point 1\",\n    \"Point 2\",\n    \"Point 3\",\n    \
\"Point 4\",\n    \"Point 5\"\n  ]\n}}\n\n\
Ensure that the JSON is valid and properly formatted. Do not include any other \
text or explanations outside the JSON."
    )
}

pub fn layouts_system_prompt() -> &'static str {
    "You generate JSON layouts for presentations."
}

/// A minimal but complete example slide, serialized into the prompt so the
/// model sees the exact field names and nesting the parser expects.
fn example_slide() -> Slide {
    let mut title = ContentNode::with_value(
        ContentKind::Title,
        "Title",
        NodeValue::Text(String::new()),
    );
    title.placeholder = Some("Untitled Card".to_string());
    let column = ContentNode::with_value(
        ContentKind::Column,
        "Column",
        NodeValue::Nodes(vec![Arc::new(title)]),
    );
    let mut slide = Slide::new("Blank card", "blank-card", column);
    slide.class_name =
        Some("p-8 mx-auto flex justify-center items-center min-h-[200px]".to_string());
    slide
}

pub fn layouts_user_message(outlines: &[String]) -> String {
    let outlines_json = serde_json::to_string(outlines).unwrap_or_else(|_| "[]".to_string());
    let example = serde_json::to_string_pretty(&vec![example_slide()])
        .unwrap_or_else(|_| "[]".to_string());

    format!(
        "### Guidelines\n\n\
You are a highly creative AI that generates JSON-based layouts for presentations. \
For each outline point below, generate one unique slide layout with creative \
content, and return all of them as a single JSON array.\n\n\
The available SLIDE TYPES are: \"accentLeft\", \"accentRight\", \"imageAndText\", \
\"textAndImage\", \"twoColumns\", \"twoColumnsWithHeading\", \"fourColumns\", \
\"twoImageColumns\", \"threeImageColumns\", \"fourImageColumns\", \"tableLayout\", \
\"blank-card\".\n\n\
The available CONTENT TYPES are: \"heading1\", \"heading2\", \"heading3\", \
\"heading4\", \"title\", \"paragraph\", \"table\", \"resizable-column\", \"image\", \
\"blockquote\", \"numberedList\", \"bulletList\", \"todoList\", \"calloutBox\", \
\"tableOfContents\", \"divider\", \"column\".\n\n\
Use these outline points as the content of the presentation:\n{outlines_json}\n\n\
Rules:\n\
1. Generate one slide per outline point, in outline order.\n\
2. Ensure each layout is unique and creative.\n\
3. The content property of each slide must be a single \"column\" node. Only \
\"column\" and \"resizable-column\" nodes may contain nested nodes; their content \
is always an array of nodes. Static elements like title and paragraph have a \
string content. Lists (numberedList, bulletList, todoList) have an array of \
strings as content, and table has an array of string rows.\n\
4. Fill placeholder data into content fields where required.\n\
5. For image nodes, set content to a placeholder image URL and write alt text \
that describes the image clearly and concisely, aligned with the slide topic. \
Avoid phrases like \"image of\".\n\
6. Give every slide and every nested node a unique id.\n\n\
Here is an example of one slide with one column and one title inside, showing \
the exact JSON shape expected:\n{example}\n\n\
Output ONLY the JSON array of slides, nothing else. Ensure there are no \
duplicate layouts across the array."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outline_prompt_names_the_topic() {
        let msg = outline_user_message("the history of tea");
        assert!(msg.contains("the history of tea"));
        assert!(msg.contains("\"outlines\""));
    }

    #[test]
    fn layouts_prompt_embeds_outline_and_example() {
        let outlines = vec!["Why tea matters".to_string(), "Tea trade routes".to_string()];
        let msg = layouts_user_message(&outlines);
        assert!(msg.contains("Why tea matters"));
        // the serialized example must use the wire field names
        assert!(msg.contains("\"slideName\""));
        assert!(msg.contains("\"slideOrder\""));
        assert!(msg.contains("\"column\""));
    }
}
