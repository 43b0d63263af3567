//! Dispatcher
//!
//! Runs once per native event occurrence on a container:
//!
//! 1. normalize the native event,
//! 2. take a snapshot of the bindings for its canonical type,
//! 3. walk from the target up to the container (both included), skipping
//!    non-elements,
//! 4. at each element run the matching, enabled, gate-approved bindings in
//!    registration order,
//! 5. abort as soon as a handler stops propagation.

use del_dom::{Document, NativeEvent, NodeId};

use crate::{DelegatedEvent, Delegator, NormalizedEvent, Propagation};

/// Summary of one dispatch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Handlers invoked
    pub invoked: usize,
    /// A handler stopped propagation
    pub stopped: bool,
}

impl Delegator {
    /// Native listener body for the container `registered`
    pub fn handle_native(&self, document: &Document, registered: NodeId, native: &mut NativeEvent) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();
        let mut event = NormalizedEvent::new(native, document);

        // Bindings added from here on wait for the next occurrence
        let bindings = match self.registry.borrow().get(registered) {
            Some(entry) => entry.snapshot(event.canonical_type()),
            None => return outcome,
        };
        if bindings.is_empty() {
            return outcome;
        }

        let mut candidate = Some(event.target);
        while let Some(node) = candidate {
            if document.tree().is_element(node) {
                for binding in &bindings {
                    // Paused or removed by an earlier handler of this walk
                    if !binding.is_live() || !binding.selector.matches(document, node) {
                        continue;
                    }

                    let gate = self.taxonomy.borrow().gate(&binding.event_name);
                    if let Some(gate) = gate {
                        if !gate(&event, node, document) {
                            continue;
                        }
                    }

                    let result = {
                        let mut view = DelegatedEvent::new(&mut event, &binding.event_name, node, document);
                        binding.handler.call(&mut view)
                    };
                    outcome.invoked += 1;
                    tracing::trace!("{} handler for `{}` fired on {:?}", binding.event_name, binding.selector_text, node);

                    if result == Propagation::Cancel {
                        event.prevent_default();
                        event.stop_propagation();
                    }
                    if event.is_propagation_stopped() {
                        outcome.stopped = true;
                        return outcome;
                    }
                }
            }

            if node == registered {
                break;
            }
            candidate = document.tree().parent(node);
        }

        outcome
    }

    /// Deliver `native` through the document, routing this delegator's
    /// native listeners into [`handle_native`](Self::handle_native).
    ///
    /// Returns `false` if the default action was prevented.
    pub fn fire(&self, document: &Document, native: &mut NativeEvent) -> bool {
        document.dispatch_event(native, |node, listener, event| {
            if self.listener_id(node) == Some(listener) {
                self.handle_native(document, node, event);
            }
        })
    }
}
