//! Declarative Rules
//!
//! A rule key names the event set and the selectors in one string:
//!
//! ```text
//! "[mouseup mousedown] .my-elm, a"   // two events, two selectors
//! "div.item"                         // default event
//! ```
//!
//! A key maps either to a single handler or to a table of
//! `event names -> handler`.

use std::str::FromStr;

use crate::selector::clean;
use crate::{Handler, RuleError, Taxonomy};

/// Parsed rule key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleKey {
    /// Raw contents of the `[...]` prefix
    pub events: Option<String>,
    /// Selector texts, whitespace removed
    pub selectors: Vec<String>,
}

impl FromStr for RuleKey {
    type Err = RuleError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let trimmed = key.trim_start();

        let (events, rest) = match trimmed.strip_prefix('[') {
            Some(open) => {
                let close = open.find(']')
                    .ok_or_else(|| RuleError::UnterminatedEventList(key.to_string()))?;
                let events = open[..close].trim();
                if events.is_empty() {
                    return Err(RuleError::EmptyEventList(key.to_string()));
                }
                (Some(events.to_string()), &open[close + 1..])
            }
            None => (None, trimmed),
        };

        let selectors: Vec<String> = rest.split(',').map(clean).collect();
        if selectors.len() > 1 && selectors.iter().any(String::is_empty) {
            return Err(RuleError::EmptySelector(key.to_string()));
        }

        Ok(Self { events, selectors })
    }
}

impl RuleKey {
    /// Best-effort parse: a malformed key becomes a single literal selector
    /// with no event list, so it falls back to the default event and
    /// matches nothing sensible.
    pub fn lenient(key: &str) -> Self {
        match key.parse::<Self>() {
            Ok(parsed) => parsed,
            Err(err @ RuleError::EmptySelector(_)) => {
                tracing::warn!("{}; dropping the empty entries", err);
                let mut parsed = Self::literal(key);
                if let Some(open) = key.trim_start().strip_prefix('[') {
                    if let Some(close) = open.find(']') {
                        parsed.events = Some(open[..close].trim().to_string());
                        parsed.selectors = open[close + 1..].split(',')
                            .map(clean)
                            .filter(|s| !s.is_empty())
                            .collect();
                    }
                } else {
                    parsed.selectors = key.split(',')
                        .map(clean)
                        .filter(|s| !s.is_empty())
                        .collect();
                }
                parsed
            }
            Err(err) => {
                tracing::warn!("{}; treating it as a plain selector", err);
                Self::literal(key)
            }
        }
    }

    fn literal(key: &str) -> Self {
        Self { events: None, selectors: vec![clean(key)] }
    }
}

/// What a rule key maps to
#[derive(Debug, Clone)]
pub enum RuleTarget {
    /// One handler for the key's own events (or the default event)
    Handler(Handler),
    /// Event names -> handler, for the key's selectors
    Events(Vec<(String, Handler)>),
}

/// Ordered set of rules
#[derive(Debug, Clone, Default)]
pub struct Rules {
    entries: Vec<(String, RuleTarget)>,
}

/// One binding produced by expanding rules
#[derive(Debug, Clone)]
pub(crate) struct Expanded {
    pub event_name: String,
    pub selector: String,
    pub handler: Handler,
}

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `key -> handler`
    pub fn rule(mut self, key: &str, handler: Handler) -> Self {
        self.entries.push((key.to_string(), RuleTarget::Handler(handler)));
        self
    }

    /// Add `selectors -> { events -> handler }`
    pub fn rule_map<'a, I>(mut self, selectors: &str, events: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Handler)>,
    {
        let events = events.into_iter().map(|(names, h)| (names.to_string(), h)).collect();
        self.entries.push((selectors.to_string(), RuleTarget::Events(events)));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleTarget)> {
        self.entries.iter().map(|(k, t)| (k.as_str(), t))
    }

    /// Flatten into (event name, selector, handler) triples, in registration
    /// order. Event names are expanded but not canonicalized.
    pub(crate) fn expand(&self, taxonomy: &Taxonomy, default_event: &str) -> Vec<Expanded> {
        let mut out = Vec::new();

        for (key, target) in &self.entries {
            let parsed = RuleKey::lenient(key);

            match target {
                RuleTarget::Handler(handler) => {
                    let names = match &parsed.events {
                        Some(events) => taxonomy.expand(events),
                        None => taxonomy.expand(default_event),
                    };
                    for event_name in names {
                        for selector in &parsed.selectors {
                            out.push(Expanded {
                                event_name: event_name.clone(),
                                selector: selector.clone(),
                                handler: handler.clone(),
                            });
                        }
                    }
                }
                RuleTarget::Events(events) => {
                    if parsed.events.is_some() {
                        tracing::warn!("Rule `{}` has both an event prefix and an event table; using the table", key);
                    }
                    for (names, handler) in events {
                        for selector in &parsed.selectors {
                            for event_name in taxonomy.expand(names) {
                                out.push(Expanded {
                                    event_name,
                                    selector: selector.clone(),
                                    handler: handler.clone(),
                                });
                            }
                        }
                    }
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_with_events() {
        let key: RuleKey = "[mouseup mousedown] .my-elm, div.item".parse().unwrap();
        assert_eq!(key.events.as_deref(), Some("mouseup mousedown"));
        assert_eq!(key.selectors, vec![".my-elm", "div.item"]);
    }

    #[test]
    fn test_parse_key_without_events() {
        let key: RuleKey = "a".parse().unwrap();
        assert_eq!(key.events, None);
        assert_eq!(key.selectors, vec!["a"]);

        let empty: RuleKey = "".parse().unwrap();
        assert_eq!(empty.selectors, vec![""]);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!("[click div".parse::<RuleKey>(), Err(RuleError::UnterminatedEventList(_))));
        assert!(matches!("[ ] div".parse::<RuleKey>(), Err(RuleError::EmptyEventList(_))));
        assert!(matches!("a, ,b".parse::<RuleKey>(), Err(RuleError::EmptySelector(_))));
    }

    #[test]
    fn test_lenient_fallbacks() {
        let broken = RuleKey::lenient("[click div");
        assert_eq!(broken.events, None);
        assert_eq!(broken.selectors, vec!["[clickdiv"]);

        let trailing = RuleKey::lenient("[click] a,");
        assert_eq!(trailing.events.as_deref(), Some("click"));
        assert_eq!(trailing.selectors, vec!["a"]);
    }

    #[test]
    fn test_expand_order() {
        let taxonomy = Taxonomy::new();
        let h = Handler::new(|_| ());
        let rules = Rules::new()
            .rule("[hover] a, b", h.clone())
            .rule("li", h.clone())
            .rule_map("p", [("keyup keydown", h.clone())]);

        let triples: Vec<_> = rules.expand(&taxonomy, "click")
            .into_iter()
            .map(|e| (e.event_name, e.selector))
            .collect();

        let expected: Vec<(String, String)> = [
            ("mouseenter", "a"), ("mouseenter", "b"),
            ("mouseleave", "a"), ("mouseleave", "b"),
            ("click", "li"),
            ("keyup", "p"), ("keydown", "p"),
        ].iter().map(|(e, s)| (e.to_string(), s.to_string())).collect();
        assert_eq!(triples, expected);
    }
}
