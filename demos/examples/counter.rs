// Copyright 2025 the tuicore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A minimal counter app wired end to end through [`tuicore::engine::Engine`]:
//! a view function, a `+`/`-` keybinding, and a draw callback that renders
//! the laid-out tree to a drawlist.
//!
//! This stands in for a real terminal backend (out of scope for this
//! crate, per its own scoping) with an in-memory one that replays a fixed
//! script of ZREV event batches, so the example runs and prints its frame
//! reports without a TTY.
//!
//! Run: `cargo run -p tuicore_examples --example counter`

use tuicore::backend::{Backend, BackendEventBatch, Caps};
use tuicore::config::RuntimeConfig;
use tuicore::engine::Engine;
use tuicore::error::EngineError;
use tuicore::vnode::{Kind, PropValue, VNode};
use tuicore_drawlist::Builder;
use tuicore_layout::{LaidOutNode, LayoutProps, Size};
use tuicore_router::types::{Binding, ChordKey, Mods};

struct State {
    count: i64,
}

/// Replays a fixed sequence of raw ZREV batches, one per `poll_events` call.
struct ScriptedBackend {
    batches: std::collections::VecDeque<Vec<u8>>,
}

impl Backend for ScriptedBackend {
    fn start(&mut self) -> Result<(), EngineError> {
        Ok(())
    }
    fn stop(&mut self) {}
    fn dispose(&mut self) {}
    fn caps(&self) -> Caps {
        Caps { cols: 40, rows: 10, ..Caps::default() }
    }
    fn poll_events(&mut self) -> Option<BackendEventBatch> {
        self.batches.pop_front().map(|bytes| BackendEventBatch { bytes, dropped_batches: 0 })
    }
    fn request_frame(&mut self, drawlist: &[u8]) -> Result<(), EngineError> {
        println!("frame submitted: {} bytes", drawlist.len());
        Ok(())
    }
    fn post_user_event(&mut self, _tag: &str, _payload: Vec<u8>) {}
}

fn resize_batch(cols: u16, rows: u16) -> Vec<u8> {
    zrev_batch(3, |buf| {
        buf.extend_from_slice(&0u64.to_le_bytes());
        buf.extend_from_slice(&cols.to_le_bytes());
        buf.extend_from_slice(&rows.to_le_bytes());
    })
}

fn key_batch(codepoint: char) -> Vec<u8> {
    zrev_batch(1, |buf| {
        buf.extend_from_slice(&0u64.to_le_bytes());
        buf.extend_from_slice(&(codepoint as u32).to_le_bytes());
        buf.push(0); // Mods::empty()
        buf.push(0); // KeyAction::Down
        buf.extend_from_slice(&[0, 0]); // pad to a 4-byte record boundary
    })
}

/// Builds one single-event ZREV v1 batch: 24-byte header, then a 4-byte tag
/// header (tag plus 3 reserved bytes) and the record `body` writes.
fn zrev_batch(tag: u8, body: impl FnOnce(&mut Vec<u8>)) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(&tuicore::zrev::MAGIC.to_le_bytes());
    buf.extend_from_slice(&tuicore::zrev::VERSION.to_le_bytes());
    let total_pos = buf.len();
    buf.extend_from_slice(&0u32.to_le_bytes()); // total_size, patched below
    buf.extend_from_slice(&1u32.to_le_bytes()); // event_count
    buf.extend_from_slice(&0u32.to_le_bytes()); // flags
    buf.extend_from_slice(&0u32.to_le_bytes()); // reserved
    buf.push(tag);
    buf.extend_from_slice(&[0, 0, 0]);
    body(&mut buf);
    let total = buf.len() as u32;
    buf[total_pos..total_pos + 4].copy_from_slice(&total.to_le_bytes());
    buf
}

fn view(state: &State, _theme: &()) -> VNode {
    let label = VNode::leaf(Kind::Text, LayoutProps::default())
        .prop("text", PropValue::Str(format!("count: {}", state.count)));

    let mut button_layout = LayoutProps::default();
    button_layout.width = Size::Cells(12);
    button_layout.height = Size::Cells(1);
    let button = VNode::leaf(Kind::Button, button_layout)
        .prop("text", PropValue::Str("+1 / -1".to_string()))
        .keyed("increment");

    VNode::with_children(Kind::Column, LayoutProps::default(), vec![Some(label), Some(button)])
}

fn draw(builder: &mut Builder, laid_out: &LaidOutNode, state: &State, _theme: &()) {
    builder.clear(0);
    let text = format!("count: {}", state.count);
    let id = builder.intern_string(text.as_bytes());
    builder.draw_text(laid_out.rect.x, laid_out.rect.y, id, 0, text.len() as u32);
}

fn main() {
    env_logger::init();

    let backend = ScriptedBackend {
        batches: [resize_batch(40, 10), key_batch('+'), key_batch('+'), key_batch('-')].into(),
    };
    let config = RuntimeConfig::new(State { count: 0 }, ());
    let mut engine = Engine::new(backend, config, view);
    engine.draw(draw);
    engine.keys(vec![
        Binding {
            sequence: vec![ChordKey { key_code: '+' as u32, mods: Mods::empty() }],
            action: "increment".to_string(),
        },
        Binding {
            sequence: vec![ChordKey { key_code: '-' as u32, mods: Mods::empty() }],
            action: "decrement".to_string(),
        },
    ]);
    engine.on_action(|action, ctx| match action {
        "increment" => ctx.update(|s: &mut State| s.count += 1),
        "decrement" => ctx.update(|s: &mut State| s.count -= 1),
        _ => {}
    });

    engine.start().unwrap();
    for turn in 0..4u64 {
        let report = engine.pump(turn * 16).unwrap();
        println!(
            "turn {turn}: events={} rendered={} laid_out={} submitted={}",
            report.events_processed, report.rendered_view, report.laid_out, report.submitted_frame
        );
    }
    engine.stop();
}
