//! Event Normalization
//!
//! Turns a host [`NativeEvent`] into a uniform event value. Properties that
//! older engines leave out (target, related target, page coordinates,
//! `which`) are derived from what is present.

use std::ops::Deref;

use del_dom::{Document, NativeEvent, NodeData, NodeId, ScrollMetrics};

/// Normalized view of one native event occurrence
///
/// Created per occurrence by the dispatcher and dropped when dispatch ends.
/// The event type is only reachable as [`canonical_type`](Self::canonical_type);
/// handlers see their binding's own name through [`DelegatedEvent::event_type`].
#[derive(Debug)]
pub struct NormalizedEvent<'n> {
    original: &'n mut NativeEvent,

    event_type: String,
    pub target: NodeId,
    pub src_element: Option<NodeId>,
    pub related_target: Option<NodeId>,
    pub from_element: Option<NodeId>,
    pub to_element: Option<NodeId>,
    pub related_node: Option<NodeId>,

    pub bubbles: Option<bool>,
    pub cancelable: Option<bool>,
    pub event_phase: u8,
    pub alt_key: bool,
    pub ctrl_key: bool,
    pub shift_key: bool,
    pub meta_key: bool,

    pub button: Option<u16>,
    pub which: Option<u32>,
    pub char_code: Option<u32>,
    pub key_code: Option<u32>,

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

    pub detail: Option<i64>,
    pub data: Option<String>,
    pub attr_name: Option<String>,
    pub attr_change: Option<u16>,
    pub prev_value: Option<String>,
    pub new_value: Option<String>,

    default_prevented: bool,
    propagation_stopped: bool,
    immediate_propagation_stopped: bool,
}

impl<'n> NormalizedEvent<'n> {
    /// Normalize `native` against the document it was fired in
    pub fn new(native: &'n mut NativeEvent, document: &Document) -> Self {
        let mut event = Self {
            event_type: native.event_type.clone(),
            target: native.target.or(native.src_element).unwrap_or_else(|| document.root()),
            src_element: native.src_element,
            related_target: native.related_target,
            from_element: native.from_element,
            to_element: native.to_element,
            related_node: native.related_node,
            bubbles: native.bubbles,
            cancelable: native.cancelable,
            event_phase: native.event_phase,
            alt_key: native.alt_key,
            ctrl_key: native.ctrl_key,
            shift_key: native.shift_key,
            meta_key: native.meta_key,
            button: native.button,
            which: native.which,
            char_code: native.char_code,
            key_code: native.key_code,
            client_x: native.client_x,
            client_y: native.client_y,
            page_x: native.page_x,
            page_y: native.page_y,
            screen_x: native.screen_x,
            screen_y: native.screen_y,
            offset_x: native.offset_x,
            offset_y: native.offset_y,
            layer_x: native.layer_x,
            layer_y: native.layer_y,
            wheel_delta: native.wheel_delta,
            detail: native.detail,
            data: native.data.clone(),
            attr_name: native.attr_name.clone(),
            attr_change: native.attr_change,
            prev_value: native.prev_value.clone(),
            new_value: native.new_value.clone(),
            default_prevented: false,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
            original: native,
        };

        // Delegation only ever matches elements
        if let Some(node) = document.tree().get(event.target) {
            if matches!(node.data, NodeData::Text(_)) && node.parent.is_valid() {
                event.target = node.parent;
            }
        }

        if event.related_target.is_none() {
            if let Some(from) = event.from_element {
                event.related_target = if from == event.target { event.to_element } else { Some(from) };
            }
        }

        if event.page_x.is_none() {
            if let Some(client_x) = event.client_x {
                let html = document.metrics(document.document_element());
                let body = document.metrics(document.body());
                let offset = |pick: fn(&ScrollMetrics) -> f64| first_non_zero(pick(&html), pick(&body));

                event.page_x = Some(client_x + offset(|m| m.scroll_left) - offset(|m| m.client_left));
                event.page_y = event.client_y
                    .map(|y| y + offset(|m| m.scroll_top) - offset(|m| m.client_top));
            }
        }

        if event.which.is_none() && (event.char_code.is_some() || event.key_code.is_some()) {
            event.which = event.char_code.or(event.key_code);
        }

        if !event.meta_key && event.ctrl_key {
            event.meta_key = true;
        }

        if event.which.unwrap_or(0) == 0 {
            if let Some(button) = event.button {
                event.which = Some(which_from_buttons(button));
            }
        }

        event
    }

    /// Canonical name of the native event (e.g. `mouseover`)
    pub fn canonical_type(&self) -> &str {
        &self.event_type
    }

    /// The native event this was built from
    pub fn original(&self) -> &NativeEvent {
        &*self.original
    }

    /// Prevent the default action, natively or through `return_value`
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
        if self.original.has_standard_methods() {
            self.original.prevent_default();
        } else {
            self.original.return_value = Some(false);
        }
    }

    /// Stop propagation for this occurrence
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
        if self.original.has_standard_methods() {
            self.original.stop_propagation();
        }
        self.original.cancel_bubble = true;
    }

    /// Stop propagation and any further handler on the current node
    pub fn stop_immediate_propagation(&mut self) {
        self.immediate_propagation_stopped = true;
        self.stop_propagation();
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub fn is_immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped
    }
}

fn first_non_zero(a: f64, b: f64) -> f64 {
    if a != 0.0 { a } else { b }
}

/// Map a `button` bit-field to `which`: 1 = primary, 3 = secondary, 2 = auxiliary
fn which_from_buttons(button: u16) -> u32 {
    if button & 1 != 0 {
        1
    } else if button & 2 != 0 {
        3
    } else if button & 4 != 0 {
        2
    } else {
        0
    }
}

/// What a handler receives: the normalized event seen through one binding.
///
/// Carries the binding's original event name and the matched element, so the
/// shared normalized event never has its type rewritten.
#[derive(Debug)]
pub struct DelegatedEvent<'a, 'n> {
    event: &'a mut NormalizedEvent<'n>,
    event_type: &'a str,
    current_target: NodeId,
    document: &'a Document,
}

impl<'a, 'n> DelegatedEvent<'a, 'n> {
    pub(crate) fn new(
        event: &'a mut NormalizedEvent<'n>,
        event_type: &'a str,
        current_target: NodeId,
        document: &'a Document,
    ) -> Self {
        Self { event, event_type, current_target, document }
    }

    /// Event name the handler was registered with (e.g. `mouseenter`)
    pub fn event_type(&self) -> &str {
        self.event_type
    }

    /// Canonical name of the native event (e.g. `mouseover`)
    pub fn canonical_type(&self) -> &str {
        &self.event.event_type
    }

    /// Element the binding matched
    pub fn current_target(&self) -> NodeId {
        self.current_target
    }

    /// Document the event is travelling through
    pub fn document(&self) -> &Document {
        self.document
    }

    pub fn prevent_default(&mut self) {
        self.event.prevent_default();
    }

    pub fn stop_propagation(&mut self) {
        self.event.stop_propagation();
    }

    pub fn stop_immediate_propagation(&mut self) {
        self.event.stop_immediate_propagation();
    }
}

impl<'n> Deref for DelegatedEvent<'_, 'n> {
    type Target = NormalizedEvent<'n>;

    fn deref(&self) -> &Self::Target {
        &*self.event
    }
}
