//! Example: delegated clicks and hover on a small list
//!
//! Run with `RUST_LOG=del_delegate=debug` to see listener attachment.

use del_delegate::{Config, Delegator, Document, Filter, Handler, NativeEvent, Rules};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config: Config = serde_json::from_str(r#"{ "default_event": "click" }"#)?;
    let delegator = Delegator::with_config(config);

    // <ul><li><div class="item"><span>…</span></div></li></ul>
    let mut doc = Document::new();
    let list = doc.append_element(doc.body(), "ul")?;
    let row = doc.append_element(list, "li")?;
    let item = doc.append_element(row, "div")?;
    doc.set_attribute(item, "class", "item")?;
    let label = doc.append_element(item, "span")?;
    doc.append_text(label, "First")?;

    let on_item = Handler::new(|ev| {
        println!("{} on {:?} (target {:?})", ev.event_type(), ev.current_target(), ev.target);
    });
    let on_hover = Handler::new(|ev| {
        println!("{} via native {}", ev.event_type(), ev.canonical_type());
    });

    delegator.register(&doc, [list], &Rules::new()
        .rule("div.item", on_item.clone())
        .rule("[hover] li", on_hover));

    delegator.fire(&doc, &mut NativeEvent::mouse("click", label, 10.0, 10.0));
    delegator.fire(&doc, &mut NativeEvent::new("mouseover").with_target(label).with_related(doc.body()));

    delegator.pause(&doc, [list], Filter::new().handler(&on_item));
    delegator.fire(&doc, &mut NativeEvent::mouse("click", label, 10.0, 10.0));
    println!("paused: click ignored");

    delegator.unregister(&doc, [list], &Filter::new());
    let stats = doc.listener_stats();
    println!("native listeners added {}, removed {}", stats.added, stats.removed);

    Ok(())
}
