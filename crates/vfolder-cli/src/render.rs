use std::fmt::Write;

use vfolder_core::{EntityId, IconHandle, Store};

const INDENT: &str = "  ";

/// Renders the whole tree, one entity per line, children indented under
/// their parent. Each line shows the icon, the display name and the key
/// needed for `add`/`remove`.
pub fn render_tree(store: &Store) -> String {
    let mut out = String::new();
    match store.root() {
        Some(root) => render_node(store, root, 0, &mut out),
        None => out.push_str("(empty)\n"),
    }
    out
}

fn render_node(store: &Store, id: EntityId, depth: usize, out: &mut String) {
    let Some(entity) = store.entity(id) else {
        return;
    };
    let icon = entity
        .icon()
        .and_then(|index| store.icons().icon(index))
        .map_or("", IconHandle::as_str);

    let _ = writeln!(
        out,
        "{}{}{}  [{}]",
        INDENT.repeat(depth),
        icon,
        entity.display_name(),
        entity.key()
    );
    for child in entity.children() {
        render_node(store, *child, depth + 1, out);
    }
}
