//! Native Events
//!
//! The raw event object the host hands to listeners. Every property a
//! legacy engine may omit is optional; consumers are expected to normalize.

use crate::NodeId;

/// Native event as delivered by the host
#[derive(Debug, Clone, Default)]
pub struct NativeEvent {
    pub event_type: String,

    // Targets
    pub target: Option<NodeId>,
    pub src_element: Option<NodeId>,
    pub current_target: Option<NodeId>,
    pub related_target: Option<NodeId>,
    pub from_element: Option<NodeId>,
    pub to_element: Option<NodeId>,
    pub related_node: Option<NodeId>,

    // Flags
    pub bubbles: Option<bool>,
    pub cancelable: Option<bool>,
    pub event_phase: u8,
    pub alt_key: bool,
    pub ctrl_key: bool,
    pub shift_key: bool,
    pub meta_key: bool,

    // Keys and buttons
    pub button: Option<u16>,
    pub which: Option<u32>,
    pub char_code: Option<u32>,
    pub key_code: Option<u32>,

    // Coordinates
    pub client_x: Option<f64>,
    pub client_y: Option<f64>,
    pub page_x: Option<f64>,
    pub page_y: Option<f64>,
    pub screen_x: Option<f64>,
    pub screen_y: Option<f64>,
    pub offset_x: Option<f64>,
    pub offset_y: Option<f64>,
    pub layer_x: Option<f64>,
    pub layer_y: Option<f64>,
    pub wheel_delta: Option<f64>,

    // Payload
    pub detail: Option<i64>,
    pub data: Option<String>,
    pub attr_name: Option<String>,
    pub attr_change: Option<u16>,
    pub prev_value: Option<String>,
    pub new_value: Option<String>,

    /// Engine without `preventDefault`/`stopPropagation`
    pub legacy: bool,
    /// Legacy prevention flag (`returnValue`)
    pub return_value: Option<bool>,
    /// Legacy propagation flag (`cancelBubble`)
    pub cancel_bubble: bool,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl NativeEvent {
    /// Create a bubbling, cancelable event of the given type
    pub fn new(event_type: &str) -> Self {
        Self {
            event_type: event_type.to_string(),
            bubbles: Some(true),
            cancelable: Some(true),
            ..Self::default()
        }
    }

    /// Create a mouse event at client coordinates
    pub fn mouse(event_type: &str, target: NodeId, client_x: f64, client_y: f64) -> Self {
        Self {
            target: Some(target),
            client_x: Some(client_x),
            client_y: Some(client_y),
            button: Some(0),
            ..Self::new(event_type)
        }
    }

    /// Create a keyboard event
    pub fn key(event_type: &str, target: NodeId, key_code: u32) -> Self {
        Self {
            target: Some(target),
            key_code: Some(key_code),
            ..Self::new(event_type)
        }
    }

    /// Set the target
    pub fn with_target(mut self, target: NodeId) -> Self {
        self.target = Some(target);
        self
    }

    /// Set the related target
    pub fn with_related(mut self, related: NodeId) -> Self {
        self.related_target = Some(related);
        self
    }

    /// Mark as non-bubbling
    pub fn non_bubbling(mut self) -> Self {
        self.bubbles = Some(false);
        self
    }

    /// Strip the standard methods, like an old engine would
    pub fn legacy(mut self) -> Self {
        self.legacy = true;
        self
    }

    /// Whether `prevent_default`/`stop_propagation` are available
    #[inline]
    pub fn has_standard_methods(&self) -> bool {
        !self.legacy
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.legacy {
            return;
        }
        if self.cancelable != Some(false) {
            self.default_prevented = true;
        }
    }

    /// Stop propagation
    pub fn stop_propagation(&mut self) {
        if !self.legacy {
            self.propagation_stopped = true;
        }
    }

    /// Check if default was prevented, by either mechanism
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented || self.return_value == Some(false)
    }

    /// Check if propagation was stopped, by either mechanism
    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped || self.cancel_bubble
    }
}
