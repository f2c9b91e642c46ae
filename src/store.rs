//! Shared view state: the current view mode, which node is selected and which
//! is focused, and the node collection.

use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::FocusError;

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov", "mkv", "avi", "m4v"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Orbit,
    Focus,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Media {
    Image { path: PathBuf },
    Video { url: String },
}

impl Media {
    pub fn from_path(path: &Path) -> Self {
        let is_video = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            .unwrap_or(false);
        if is_video {
            Media::Video {
                url: path.display().to_string(),
            }
        } else {
            Media::Image {
                path: path.to_path_buf(),
            }
        }
    }

    pub fn is_video(&self) -> bool {
        matches!(self, Media::Video { .. })
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            Media::Image { .. } => "image",
            Media::Video { .. } => "video",
        }
    }

    pub fn source(&self) -> String {
        match self {
            Media::Image { path } => path.display().to_string(),
            Media::Video { url } => url.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub media: Media,
}

#[derive(Clone, Debug, Default)]
pub struct AppStore {
    view_mode: ViewMode,
    focused_node_id: Option<String>,
    active_node_id: Option<String>,
    nodes: Vec<Node>,
    next_id: usize,
}

impl AppStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn focused_node_id(&self) -> Option<&str> {
        self.focused_node_id.as_deref()
    }

    pub fn active_node_id(&self) -> Option<&str> {
        self.active_node_id.as_deref()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn focused_node(&self) -> Option<&Node> {
        self.focused_node_id().and_then(|id| self.node(id))
    }

    /// Appends a node with a generated `n<k>` id and returns that id.
    pub fn add_node(&mut self, label: impl Into<String>, media: Media) -> String {
        self.next_id += 1;
        let id = format!("n{}", self.next_id);
        self.nodes.push(Node {
            id: id.clone(),
            label: label.into(),
            media,
        });
        id
    }

    pub fn add_path(&mut self, path: &Path) -> String {
        let label = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("media")
            .to_string();
        self.add_node(label, Media::from_path(path))
    }

    pub fn set_active_node(&mut self, id: Option<&str>) {
        self.active_node_id = id.map(str::to_string);
    }

    pub fn set_orbit_mode(&mut self) {
        if self.view_mode == ViewMode::Focus {
            info!(node = ?self.focused_node_id, "leaving focus mode");
        }
        self.view_mode = ViewMode::Orbit;
        self.focused_node_id = None;
    }

    pub fn set_focus_mode(&mut self, id: &str) -> Result<(), FocusError> {
        if id.is_empty() {
            return Err(FocusError::NoActiveNode);
        }
        if self.node(id).is_none() {
            return Err(FocusError::UnknownNode(id.to_string()));
        }
        info!(node = id, "entering focus mode");
        self.view_mode = ViewMode::Focus;
        self.focused_node_id = Some(id.to_string());
        Ok(())
    }

    /// Focuses the currently selected node. Leaves state untouched on error.
    pub fn focus_active(&mut self) -> Result<(), FocusError> {
        let id = self.active_node_id.clone().ok_or(FocusError::NoActiveNode)?;
        self.set_focus_mode(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_nodes() -> AppStore {
        let mut store = AppStore::new();
        store.add_path(Path::new("shots/portrait.png"));
        store.add_path(Path::new("clips/intro.MP4"));
        store
    }

    #[test]
    fn media_kind_follows_extension() {
        assert!(Media::from_path(Path::new("a/b.webm")).is_video());
        assert!(Media::from_path(Path::new("a/b.MOV")).is_video());
        assert!(!Media::from_path(Path::new("a/b.jpg")).is_video());
        assert!(!Media::from_path(Path::new("noext")).is_video());
    }

    #[test]
    fn node_ids_are_sequential() {
        let store = store_with_nodes();
        let ids: Vec<_> = store.nodes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["n1", "n2"]);
        assert_eq!(store.node("n1").map(|n| n.label.as_str()), Some("portrait.png"));
    }

    #[test]
    fn focus_without_selection_is_refused() {
        let mut store = store_with_nodes();
        assert_eq!(store.focus_active(), Err(FocusError::NoActiveNode));
        assert_eq!(store.view_mode(), ViewMode::Orbit);
        assert_eq!(store.focused_node_id(), None);
    }

    #[test]
    fn focus_with_empty_or_unknown_id_is_refused() {
        let mut store = store_with_nodes();
        assert_eq!(store.set_focus_mode(""), Err(FocusError::NoActiveNode));
        assert_eq!(
            store.set_focus_mode("n99"),
            Err(FocusError::UnknownNode("n99".into()))
        );
        assert_eq!(store.view_mode(), ViewMode::Orbit);
    }

    #[test]
    fn focus_and_back_to_orbit() {
        let mut store = store_with_nodes();
        store.set_active_node(Some("n2"));
        store.focus_active().expect("n2 exists");
        assert_eq!(store.view_mode(), ViewMode::Focus);
        assert_eq!(store.focused_node().map(|n| n.id.as_str()), Some("n2"));

        store.set_orbit_mode();
        assert_eq!(store.view_mode(), ViewMode::Orbit);
        assert_eq!(store.focused_node_id(), None);
        assert_eq!(store.active_node_id(), Some("n2"));
    }

    #[test]
    fn orbit_is_unconditional() {
        let mut store = AppStore::new();
        store.set_orbit_mode();
        store.set_orbit_mode();
        assert_eq!(store.view_mode(), ViewMode::Orbit);
    }
}
