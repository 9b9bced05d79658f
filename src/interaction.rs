//! Selection and hover state, and the callbacks that report it to the host
//!
//! [`InteractionState`] is the only mutable state shared between engine
//! components. It is written exclusively by [`InteractionState::apply`],
//! which the engine calls from pointer dispatch; every other component only
//! reads it.

use std::fmt;

/// Currently selected and hovered node ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionState {
    selected: Option<String>,
    hovered: Option<String>,
}

impl InteractionState {
    /// Selected node id, if any
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Hovered node id, if any
    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    /// Whether `node_id` is the selected node
    pub fn is_selected(&self, node_id: &str) -> bool {
        self.selected() == Some(node_id)
    }

    /// Whether `node_id` is the hovered node
    pub fn is_hovered(&self, node_id: &str) -> bool {
        self.hovered() == Some(node_id)
    }

    #[cfg(test)]
    pub(crate) fn set_selected(&mut self, node_id: Option<String>) {
        self.selected = node_id;
    }

    #[cfg(test)]
    pub(crate) fn set_hovered(&mut self, node_id: Option<String>) {
        self.hovered = node_id;
    }

    /// Apply a resolved pointer event.
    ///
    /// Returns `false` when the event does not change the state (hovering
    /// the node that is already hovered), in which case no callback fires.
    pub fn apply(&mut self, event: &NodeEvent) -> bool {
        match event {
            NodeEvent::Hover(node_id) => {
                if self.hovered == *node_id {
                    return false;
                }
                self.hovered = node_id.clone();
                true
            }
            NodeEvent::Click(node_id) => {
                self.selected = Some(node_id.clone());
                true
            }
        }
    }

    /// Forget ids that no longer exist after the graph was replaced
    pub fn retain(&mut self, exists: impl Fn(&str) -> bool) {
        if self.selected.as_deref().is_some_and(|id| !exists(id)) {
            self.selected = None;
        }
        if self.hovered.as_deref().is_some_and(|id| !exists(id)) {
            self.hovered = None;
        }
    }
}

/// A pointer interaction resolved to a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeEvent {
    /// The pointer entered a node (`Some`) or left all nodes (`None`)
    Hover(Option<String>),
    /// A node was clicked
    Click(String),
}

type ClickCallback = Box<dyn FnMut(&str)>;
type HoverCallback = Box<dyn FnMut(Option<&str>)>;

/// Host callbacks invoked when interaction state changes
#[derive(Default)]
pub struct GraphCallbacks {
    on_node_click: Option<ClickCallback>,
    on_node_hover: Option<HoverCallback>,
}

impl GraphCallbacks {
    /// Callbacks that do nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the click callback
    pub fn on_node_click(mut self, callback: impl FnMut(&str) + 'static) -> Self {
        self.on_node_click = Some(Box::new(callback));
        self
    }

    /// Set the hover callback (receives `None` when the pointer leaves)
    pub fn on_node_hover(mut self, callback: impl FnMut(Option<&str>) + 'static) -> Self {
        self.on_node_hover = Some(Box::new(callback));
        self
    }

    /// Invoke the callback matching `event`
    pub fn notify(&mut self, event: &NodeEvent) {
        match event {
            NodeEvent::Hover(node_id) => {
                if let Some(callback) = self.on_node_hover.as_mut() {
                    callback(node_id.as_deref());
                }
            }
            NodeEvent::Click(node_id) => {
                if let Some(callback) = self.on_node_click.as_mut() {
                    callback(node_id);
                }
            }
        }
    }
}

impl fmt::Debug for GraphCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphCallbacks")
            .field("on_node_click", &self.on_node_click.is_some())
            .field("on_node_hover", &self.on_node_hover.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_hover_enter_and_leave() {
        let mut state = InteractionState::default();
        assert!(state.apply(&NodeEvent::Hover(Some("a".into()))));
        assert_eq!(state.hovered(), Some("a"));

        assert!(!state.apply(&NodeEvent::Hover(Some("a".into()))));

        assert!(state.apply(&NodeEvent::Hover(None)));
        assert_eq!(state.hovered(), None);
    }

    #[test]
    fn test_click_selects() {
        let mut state = InteractionState::default();
        assert!(state.apply(&NodeEvent::Click("b".into())));
        assert!(state.is_selected("b"));
        assert!(!state.is_selected("a"));
    }

    #[test]
    fn test_retain_drops_missing_ids() {
        let mut state = InteractionState::default();
        state.set_selected(Some("gone".into()));
        state.set_hovered(Some("kept".into()));

        state.retain(|id| id == "kept");
        assert_eq!(state.selected(), None);
        assert_eq!(state.hovered(), Some("kept"));
    }

    #[test]
    fn test_callbacks_receive_ids() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let clicks = Rc::clone(&log);
        let hovers = Rc::clone(&log);
        let mut callbacks = GraphCallbacks::new()
            .on_node_click(move |id| clicks.borrow_mut().push(format!("click:{id}")))
            .on_node_hover(move |id| {
                hovers
                    .borrow_mut()
                    .push(format!("hover:{}", id.unwrap_or("null")))
            });

        callbacks.notify(&NodeEvent::Hover(Some("n1".into())));
        callbacks.notify(&NodeEvent::Click("n1".into()));
        callbacks.notify(&NodeEvent::Hover(None));

        assert_eq!(
            *log.borrow(),
            vec!["hover:n1", "click:n1", "hover:null"]
        );
    }

    #[test]
    fn test_missing_callbacks_are_ignored() {
        let mut callbacks = GraphCallbacks::new();
        callbacks.notify(&NodeEvent::Click("n1".into()));
        assert_eq!(
            format!("{callbacks:?}"),
            "GraphCallbacks { on_node_click: false, on_node_hover: false }"
        );
    }
}
