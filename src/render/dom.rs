//! Retained-mode DOM renderer
//!
//! Subscribes to engine snapshots and keeps one absolutely-positioned
//! element per live entity. Elements are created when an entity first
//! appears in a snapshot, moved while it lives, and removed when it
//! disappears or the renderer is dropped - cleanup is guaranteed on reset,
//! unmount and natural hazard expiry.

use std::collections::{HashMap, HashSet};

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement};

use crate::consts::{FALLING_SIZE, PLAYER_SIZE, WALL_HAZARD_RADIUS};
use crate::sim::Snapshot;

/// Owns the player and hazard elements inside the arena container
pub struct DomRenderer {
    document: Document,
    root: HtmlElement,
    player: HtmlElement,
    falling: HashMap<u32, HtmlElement>,
    walls: HashMap<u32, HtmlElement>,
}

impl DomRenderer {
    /// Create the renderer and its player element inside `root`
    pub fn new(root: HtmlElement) -> Result<Self, JsValue> {
        let document = web_sys::window()
            .ok_or_else(|| JsValue::from_str("no window"))?
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let player = make_circle(&document, PLAYER_SIZE, "#ffffff", "4px solid rgb(0, 0, 0)")?;
        root.append_child(&player)?;

        Ok(Self {
            document,
            root,
            player,
            falling: HashMap::new(),
            walls: HashMap::new(),
        })
    }

    /// Paint one snapshot: move the player, sync hazard elements to the
    /// snapshot's entity lists.
    pub fn apply(&mut self, snap: &Snapshot) -> Result<(), JsValue> {
        set_pos(&self.player, snap.player_pos.x, snap.player_pos.y)?;

        // Falling hazards: top-left positioned, turn green once collected
        let mut live: HashSet<u32> = HashSet::with_capacity(snap.falling.len());
        for view in &snap.falling {
            live.insert(view.id);
            let el = match self.falling.get(&view.id) {
                Some(el) => el.clone(),
                None => {
                    let el = make_circle(
                        &self.document,
                        FALLING_SIZE,
                        "#ff0000",
                        "4px solid rgb(0, 0, 0)",
                    )?;
                    el.style()
                        .set_property("transition", "background-color 0.2s ease-in-out")?;
                    self.root.append_child(&el)?;
                    self.falling.insert(view.id, el.clone());
                    el
                }
            };
            set_pos(&el, view.pos.x, view.pos.y)?;
            el.style()
                .set_property("background", if view.collected { "#00ff00" } else { "#ff0000" })?;
        }
        self.falling.retain(|id, el| {
            let keep = live.contains(id);
            if !keep {
                el.remove();
            }
            keep
        });

        // Wall patrols: center positioned, fixed population per run
        let mut live: HashSet<u32> = HashSet::with_capacity(snap.walls.len());
        for view in &snap.walls {
            live.insert(view.id);
            let el = match self.walls.get(&view.id) {
                Some(el) => el.clone(),
                None => {
                    let el = make_circle(
                        &self.document,
                        WALL_HAZARD_RADIUS * 2.0,
                        "#000000",
                        "2px solid #333333",
                    )?;
                    el.style().set_property("z-index", "10")?;
                    self.root.append_child(&el)?;
                    self.walls.insert(view.id, el.clone());
                    el
                }
            };
            set_pos(
                &el,
                view.pos.x - WALL_HAZARD_RADIUS,
                view.pos.y - WALL_HAZARD_RADIUS,
            )?;
        }
        self.walls.retain(|id, el| {
            let keep = live.contains(id);
            if !keep {
                el.remove();
            }
            keep
        });

        Ok(())
    }
}

impl Drop for DomRenderer {
    fn drop(&mut self) {
        self.player.remove();
        for el in self.falling.values() {
            el.remove();
        }
        for el in self.walls.values() {
            el.remove();
        }
    }
}

fn make_circle(
    document: &Document,
    size: f32,
    background: &str,
    border: &str,
) -> Result<HtmlElement, JsValue> {
    let el: HtmlElement = document.create_element("div")?.dyn_into()?;
    let style = el.style();
    style.set_property("position", "absolute")?;
    style.set_property("width", &format!("{size}px"))?;
    style.set_property("height", &format!("{size}px"))?;
    style.set_property("background", background)?;
    style.set_property("border", border)?;
    style.set_property("border-radius", "50%")?;
    style.set_property("pointer-events", "none")?;
    Ok(el)
}

fn set_pos(el: &HtmlElement, x: f32, y: f32) -> Result<(), JsValue> {
    let style = el.style();
    style.set_property("left", &format!("{x}px"))?;
    style.set_property("top", &format!("{y}px"))?;
    Ok(())
}
