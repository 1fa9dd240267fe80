pub mod autosave;
pub mod store;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

// --- Types (matching the persisted JSON shape of the web editor) ---

/// Content kinds a slide tree can hold. `column` and `resizable-column` are
/// the container kinds: their value is always a list of child nodes. Every
/// other kind holds a leaf (text, string list, or string grid).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ContentKind {
    Column,
    #[serde(rename = "resizable-column")]
    ResizableColumn,
    Text,
    Paragraph,
    Image,
    Table,
    MultiColumn,
    Blank,
    ImageAndText,
    Heading1,
    Heading2,
    Heading3,
    Heading4,
    Title,
    Blockquote,
    NumberedList,
    BulletedList,
    BulletList,
    Code,
    CodeBlock,
    Link,
    Quote,
    Divider,
    CalloutBox,
    TodoList,
    CustomButton,
    TableOfContents,
}

impl ContentKind {
    /// Container kinds hold child nodes; everything else holds a leaf.
    pub fn is_container(&self) -> bool {
        matches!(self, ContentKind::Column | ContentKind::ResizableColumn)
    }

    fn is_list(&self) -> bool {
        matches!(
            self,
            ContentKind::NumberedList
                | ContentKind::BulletedList
                | ContentKind::BulletList
                | ContentKind::TodoList
        )
    }

    /// The empty value a freshly created node of this kind starts with.
    pub fn empty_value(&self) -> NodeValue {
        if self.is_container() {
            NodeValue::Nodes(Vec::new())
        } else if self.is_list() {
            NodeValue::Items(Vec::new())
        } else if *self == ContentKind::Table {
            NodeValue::Grid(Vec::new())
        } else {
            NodeValue::Text(String::new())
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CalloutKind {
    Success,
    Warning,
    Info,
    Question,
    Caution,
}

/// Value of a content node. Which variant is legal is decided by the owning
/// node's kind, so serialization is transparent (no tag in the JSON) and
/// deserialization resolves the raw value against the kind — an empty
/// container comes back as `Nodes([])`, never as an empty string list.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum NodeValue {
    Text(String),
    Items(Vec<String>),
    Grid(Vec<Vec<String>>),
    Nodes(Vec<Arc<ContentNode>>),
}

impl NodeValue {
    pub fn as_nodes(&self) -> Option<&[Arc<ContentNode>]> {
        match self {
            NodeValue::Nodes(nodes) => Some(nodes),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            NodeValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Resolve a raw JSON value against the owning node's kind.
    fn from_json(kind: ContentKind, raw: serde_json::Value) -> Result<Self, String> {
        if kind.is_container() {
            let nodes: Vec<Arc<ContentNode>> = serde_json::from_value(raw)
                .map_err(|e| format!("container value must be a node list: {e}"))?;
            return Ok(NodeValue::Nodes(nodes));
        }
        match raw {
            serde_json::Value::Null => Ok(kind.empty_value()),
            serde_json::Value::String(s) => Ok(NodeValue::Text(s)),
            serde_json::Value::Array(items) if items.is_empty() => Ok(kind.empty_value()),
            arr @ serde_json::Value::Array(_) => {
                // Depth discriminates: ["a","b"] is a list, [["a"],["b"]] a grid.
                serde_json::from_value::<Vec<String>>(arr.clone())
                    .map(NodeValue::Items)
                    .or_else(|_| {
                        serde_json::from_value::<Vec<Vec<String>>>(arr).map(NodeValue::Grid)
                    })
                    .map_err(|e| format!("leaf value is neither string list nor grid: {e}"))
            }
            other => Err(format!("unsupported leaf value: {other}")),
        }
    }
}

/// One node of a slide's content tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", try_from = "RawContentNode")]
pub struct ContentNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub name: String,
    #[serde(rename = "content")]
    pub value: NodeValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(rename = "callOutType", skip_serializing_if = "Option::is_none")]
    pub callout: Option<CalloutKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_rows: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_columns: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restricted_to_drop: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_transparent: Option<bool>,
}

/// Deserialization intermediate: the `content` field stays raw JSON until the
/// kind is known, because `[]` is an empty container for a column but an
/// empty string list for a bulleted list.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawContentNode {
    id: String,
    #[serde(rename = "type")]
    kind: ContentKind,
    name: String,
    #[serde(rename = "content", default)]
    value: serde_json::Value,
    #[serde(default)]
    placeholder: Option<String>,
    #[serde(default)]
    class_name: Option<String>,
    #[serde(default)]
    alt: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(rename = "callOutType", default)]
    callout: Option<CalloutKind>,
    #[serde(default)]
    initial_rows: Option<u32>,
    #[serde(default)]
    initial_columns: Option<u32>,
    #[serde(default)]
    columns: Option<u32>,
    #[serde(default)]
    restricted_to_drop: Option<bool>,
    #[serde(default)]
    bg_color: Option<String>,
    #[serde(default)]
    is_transparent: Option<bool>,
}

impl TryFrom<RawContentNode> for ContentNode {
    type Error = String;

    fn try_from(raw: RawContentNode) -> Result<Self, Self::Error> {
        let value = NodeValue::from_json(raw.kind, raw.value)
            .map_err(|e| format!("node {}: {e}", raw.id))?;
        Ok(ContentNode {
            id: raw.id,
            kind: raw.kind,
            name: raw.name,
            value,
            placeholder: raw.placeholder,
            class_name: raw.class_name,
            alt: raw.alt,
            link: raw.link,
            code: raw.code,
            language: raw.language,
            callout: raw.callout,
            initial_rows: raw.initial_rows,
            initial_columns: raw.initial_columns,
            columns: raw.columns,
            restricted_to_drop: raw.restricted_to_drop,
            bg_color: raw.bg_color,
            is_transparent: raw.is_transparent,
        })
    }
}

impl ContentNode {
    /// New node with a fresh id and the empty value for its kind.
    pub fn new(kind: ContentKind, name: impl Into<String>) -> Self {
        Self::with_value(kind, name, kind.empty_value())
    }

    pub fn with_value(kind: ContentKind, name: impl Into<String>, value: NodeValue) -> Self {
        ContentNode {
            id: new_id(),
            kind,
            name: name.into(),
            value,
            placeholder: None,
            class_name: None,
            alt: None,
            link: None,
            code: None,
            language: None,
            callout: None,
            initial_rows: None,
            initial_columns: None,
            columns: None,
            restricted_to_drop: None,
            bg_color: None,
            is_transparent: None,
        }
    }
}

/// Persistent find-and-rewrite over a content tree.
///
/// Applies `transform` on a depth-first walk; a node where it returns `Some`
/// is replaced by the returned node. Returns `None` when nothing under `node`
/// changed, so callers (and recursive calls) keep the original `Arc` —
/// siblings off the rewrite path stay pointer-identical, which is what a
/// reactive rendering layer diffs on.
///
/// Descends only into `Nodes` values; list and grid leaves are opaque here.
pub fn rewrite_node<F>(node: &Arc<ContentNode>, transform: &F) -> Option<Arc<ContentNode>>
where
    F: Fn(&ContentNode) -> Option<ContentNode>,
{
    if let Some(replaced) = transform(node) {
        return Some(Arc::new(replaced));
    }
    let NodeValue::Nodes(children) = &node.value else {
        return None;
    };
    let mut changed = false;
    let mut rewritten = Vec::with_capacity(children.len());
    for child in children {
        match rewrite_node(child, transform) {
            Some(new_child) => {
                changed = true;
                rewritten.push(new_child);
            }
            None => rewritten.push(Arc::clone(child)),
        }
    }
    if !changed {
        return None;
    }
    Some(Arc::new(ContentNode {
        value: NodeValue::Nodes(rewritten),
        ..(**node).clone()
    }))
}

/// One slide of a deck. Display order is derived from `order`, never from
/// array position; the store keeps `order` dense after every mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub id: String,
    #[serde(rename = "slideName")]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub content: Arc<ContentNode>,
    #[serde(rename = "slideOrder")]
    pub order: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

impl Slide {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, content: ContentNode) -> Self {
        Slide {
            id: new_id(),
            name: name.into(),
            kind: kind.into(),
            content: Arc::new(content),
            order: 0,
            class_name: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub name: String,
    pub font_family: String,
    pub font_color: String,
    pub background_color: String,
    pub slide_background_color: String,
    pub accent_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient_background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidebar_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navbar_color: Option<String>,
    #[serde(rename = "type")]
    pub mode: ThemeMode,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            name: "Default".to_string(),
            font_family: "'Inter', sans-serif".to_string(),
            font_color: "#000000".to_string(),
            background_color: "#f0f0f0".to_string(),
            slide_background_color: "#ffffff".to_string(),
            accent_color: "#3b82f6".to_string(),
            gradient_background: None,
            sidebar_color: Some("#f0f0f0".to_string()),
            navbar_color: Some("#ffffff".to_string()),
            mode: ThemeMode::Light,
        }
    }
}

/// Unit of deck serialization: theme plus the slide set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    #[serde(default)]
    pub theme: Theme,
    pub slides: Vec<Slide>,
}

/// One outline point produced by AI generation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutlineCard {
    pub id: String,
    pub title: String,
    pub order: usize,
}

/// A remembered generation prompt with the outline it produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub id: String,
    pub created_at: String,
    pub title: String,
    #[serde(default)]
    pub outlines: Vec<OutlineCard>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AiSettings {
    pub provider: String,
    pub api_key: String,
    pub model: String,
}

pub fn ai_configured(settings: &AiSettings) -> bool {
    !settings.provider.is_empty()
        && !settings.model.is_empty()
        && (settings.provider == "ollama" || !settings.api_key.is_empty())
}

/// Fresh globally unique id for slides and content nodes.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

// --- Storage ---
//
// One pretty-printed JSON file per deck under a base directory. All functions
// take the directory explicitly so tests run against a temp dir; `decks_dir()`
// is the default location.

/// Resolve the default deck directory (~/.orator).
pub fn decks_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".orator")
}

/// List all deck names (without .deck extension), sorted.
pub fn list_decks(dir: &Path) -> Result<Vec<String>, String> {
    if !dir.exists() {
        return Ok(vec![]);
    }
    let mut names: Vec<String> = fs::read_dir(dir)
        .map_err(|e| e.to_string())?
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let name = entry.file_name().to_string_lossy().to_string();
            name.strip_suffix(".deck").map(|n| n.to_string())
        })
        .collect();
    names.sort();
    Ok(names)
}

/// Read a deck as raw JSON string.
pub fn read_deck_raw(dir: &Path, name: &str) -> Result<String, String> {
    let path = dir.join(format!("{}.deck", name));
    fs::read_to_string(&path).map_err(|e| e.to_string())
}

/// Read a deck as typed data.
pub fn read_deck(dir: &Path, name: &str) -> Result<Deck, String> {
    let raw = read_deck_raw(dir, name)?;
    serde_json::from_str(&raw).map_err(|e| e.to_string())
}

/// Write a deck from raw JSON string.
///
/// Uses atomic write (temp file + rename) so an external file watcher sees a
/// single event instead of truncate + write.
pub fn write_deck_raw(dir: &Path, name: &str, data: &str) -> Result<(), String> {
    fs::create_dir_all(dir).map_err(|e| e.to_string())?;
    let tmp = dir.join(format!(".{}.deck.tmp", name));
    let path = dir.join(format!("{}.deck", name));
    fs::write(&tmp, data).map_err(|e| e.to_string())?;
    fs::rename(&tmp, &path).map_err(|e| e.to_string())
}

/// Write a deck from typed data.
pub fn write_deck(dir: &Path, name: &str, deck: &Deck) -> Result<(), String> {
    let json = serde_json::to_string_pretty(deck).map_err(|e| e.to_string())?;
    write_deck_raw(dir, name, &json)
}

/// Delete a deck by name. Missing files are not an error.
pub fn delete_deck(dir: &Path, name: &str) -> Result<(), String> {
    let path = dir.join(format!("{}.deck", name));
    if path.exists() {
        fs::remove_file(&path).map_err(|e| e.to_string())
    } else {
        Ok(())
    }
}

// --- AI settings ---

fn settings_path(dir: &Path) -> PathBuf {
    dir.join("settings.json")
}

pub fn read_settings(dir: &Path) -> AiSettings {
    let path = settings_path(dir);
    if !path.exists() {
        return AiSettings::default();
    }
    fs::read_to_string(&path)
        .ok()
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

pub fn write_settings(dir: &Path, settings: &AiSettings) -> Result<(), String> {
    fs::create_dir_all(dir).map_err(|e| e.to_string())?;
    let json = serde_json::to_string_pretty(settings).map_err(|e| e.to_string())?;
    fs::write(settings_path(dir), json).map_err(|e| e.to_string())
}

// --- Prompt history ---

fn prompts_path(dir: &Path) -> PathBuf {
    dir.join("prompts.json")
}

/// Read the recent-prompt history, newest first. Missing file means empty.
pub fn read_prompts(dir: &Path) -> Vec<Prompt> {
    let path = prompts_path(dir);
    if !path.exists() {
        return vec![];
    }
    fs::read_to_string(&path)
        .ok()
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

pub fn write_prompts(dir: &Path, prompts: &[Prompt]) -> Result<(), String> {
    fs::create_dir_all(dir).map_err(|e| e.to_string())?;
    let json = serde_json::to_string_pretty(prompts).map_err(|e| e.to_string())?;
    fs::write(prompts_path(dir), json).map_err(|e| e.to_string())
}

/// Prepend a prompt to the history.
pub fn add_prompt(dir: &Path, prompt: Prompt) -> Result<(), String> {
    let mut prompts = read_prompts(dir);
    prompts.insert(0, prompt);
    write_prompts(dir, &prompts)
}

/// Remove a prompt by id. Unknown ids are not an error.
pub fn remove_prompt(dir: &Path, id: &str) -> Result<(), String> {
    let mut prompts = read_prompts(dir);
    prompts.retain(|p| p.id != id);
    write_prompts(dir, &prompts)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn column_with(children: Vec<ContentNode>) -> ContentNode {
        ContentNode::with_value(
            ContentKind::Column,
            "Column",
            NodeValue::Nodes(children.into_iter().map(Arc::new).collect()),
        )
    }

    #[test]
    fn empty_container_deserializes_as_nodes() {
        let json = r#"{"id":"c1","type":"column","name":"Column","content":[]}"#;
        let node: ContentNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.value, NodeValue::Nodes(vec![]));
    }

    #[test]
    fn empty_list_deserializes_as_items() {
        let json = r#"{"id":"l1","type":"bulletList","name":"Bullets","content":[]}"#;
        let node: ContentNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.value, NodeValue::Items(vec![]));
    }

    #[test]
    fn empty_table_deserializes_as_grid() {
        let json = r#"{"id":"t1","type":"table","name":"Table","content":[]}"#;
        let node: ContentNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.value, NodeValue::Grid(vec![]));
    }

    #[test]
    fn list_leaf_is_not_mistaken_for_children() {
        let json = r#"{"id":"l1","type":"numberedList","name":"List","content":["one","two"]}"#;
        let node: ContentNode = serde_json::from_str(json).unwrap();
        assert_eq!(
            node.value,
            NodeValue::Items(vec!["one".to_string(), "two".to_string()])
        );
    }

    #[test]
    fn table_grid_round_trips() {
        let json = r#"{"id":"t1","type":"table","name":"Table","content":[["a","b"],["c","d"]],"initialRows":2,"initialColumns":2}"#;
        let node: ContentNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.initial_rows, Some(2));
        let NodeValue::Grid(grid) = &node.value else {
            panic!("expected grid");
        };
        assert_eq!(grid[1][0], "c");

        let back = serde_json::to_value(&node).unwrap();
        assert_eq!(back["content"][0][1], "b");
        assert_eq!(back["type"], "table");
    }

    #[test]
    fn nested_tree_round_trips_through_json() {
        let title = ContentNode::with_value(
            ContentKind::Title,
            "Title",
            NodeValue::Text("Hello".to_string()),
        );
        let root = column_with(vec![column_with(vec![title])]);
        let json = serde_json::to_string(&root).unwrap();
        let back: ContentNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, root);
    }

    #[test]
    fn container_with_non_node_children_is_rejected() {
        let json = r#"{"id":"c1","type":"column","name":"Column","content":["loose string"]}"#;
        assert!(serde_json::from_str::<ContentNode>(json).is_err());
    }

    #[test]
    fn missing_content_defaults_by_kind() {
        let json = r#"{"id":"p1","type":"paragraph","name":"Paragraph"}"#;
        let node: ContentNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.value, NodeValue::Text(String::new()));
    }

    #[test]
    fn slide_json_uses_original_field_names() {
        let slide = Slide::new("Blank card", "blank-card", column_with(vec![]));
        let val = serde_json::to_value(&slide).unwrap();
        assert!(val.get("slideName").is_some());
        assert!(val.get("slideOrder").is_some());
        assert_eq!(val["type"], "blank-card");
        assert_eq!(val["content"]["type"], "column");
    }

    #[test]
    fn rewrite_returns_none_when_target_absent() {
        let root = Arc::new(column_with(vec![ContentNode::new(
            ContentKind::Paragraph,
            "Paragraph",
        )]));
        let result = rewrite_node(&root, &|n: &ContentNode| {
            (n.id == "nope").then(|| n.clone())
        });
        assert!(result.is_none());
    }

    #[test]
    fn deck_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let deck = Deck {
            theme: Theme::default(),
            slides: vec![Slide::new("Intro", "blank-card", column_with(vec![]))],
        };
        write_deck(dir.path(), "talk", &deck).unwrap();
        assert_eq!(list_decks(dir.path()).unwrap(), vec!["talk".to_string()]);
        let back = read_deck(dir.path(), "talk").unwrap();
        assert_eq!(back, deck);

        delete_deck(dir.path(), "talk").unwrap();
        delete_deck(dir.path(), "talk").unwrap();
        assert!(list_decks(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn settings_default_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let settings = read_settings(dir.path());
        assert!(settings.provider.is_empty());
        assert!(!ai_configured(&settings));

        let configured = AiSettings {
            provider: "ollama".to_string(),
            api_key: String::new(),
            model: "llama3".to_string(),
        };
        write_settings(dir.path(), &configured).unwrap();
        assert!(ai_configured(&read_settings(dir.path())));
    }

    #[test]
    fn prompt_history_prepends_and_removes() {
        let dir = tempfile::tempdir().unwrap();
        let first = Prompt {
            id: "p1".to_string(),
            created_at: "2025-01-01T00:00:00Z".to_string(),
            title: "Rust talk".to_string(),
            outlines: vec![],
        };
        let second = Prompt {
            id: "p2".to_string(),
            created_at: "2025-01-02T00:00:00Z".to_string(),
            title: "Kickoff deck".to_string(),
            outlines: vec![],
        };
        add_prompt(dir.path(), first).unwrap();
        add_prompt(dir.path(), second).unwrap();

        let prompts = read_prompts(dir.path());
        assert_eq!(prompts.len(), 2);
        assert_eq!(prompts[0].id, "p2");

        remove_prompt(dir.path(), "p1").unwrap();
        let prompts = read_prompts(dir.path());
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].id, "p2");
    }
}
